//! Route definitions for asset metadata and collections.
//!
//! ```text
//! /assets                              list, create
//! /assets/{id}                         get, update, delete
//!
//! /collections                         list, create
//! /collections/{id}                    get, update, delete
//! /collections/{id}/assets             list, add
//! /collections/{id}/assets/{asset_id}  remove
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{asset, collection};
use crate::state::AppState;

/// `/assets` routes.
pub fn assets_router() -> Router<AppState> {
    Router::new()
        .route("/", get(asset::list).post(asset::create))
        .route(
            "/{id}",
            get(asset::get_by_id)
                .put(asset::update)
                .delete(asset::delete),
        )
}

/// `/collections` routes.
pub fn collections_router() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::list).post(collection::create))
        .route(
            "/{id}",
            get(collection::get_by_id)
                .put(collection::update)
                .delete(collection::delete),
        )
        .route(
            "/{id}/assets",
            get(collection::list_assets).post(collection::add_asset),
        )
        .route(
            "/{id}/assets/{asset_id}",
            delete(collection::remove_asset),
        )
}
