//! Route definitions for articles, translations, and translation requests.
//!
//! ```text
//! /articles                                 list (staff), create (staff)
//! /articles/by-slug/{slug}                  public resolved read (?locale=)
//! /articles/{id}                            get, update, delete (staff)
//! /articles/{id}/translations               list (staff)
//! /articles/{id}/translations/{locale}      upsert (PUT), delete (staff)
//!
//! /translation-requests                     list, create (staff)
//! /translation-requests/{id}                get (staff)
//! /translation-requests/{id}/assign         assign to user (POST)
//! /translation-requests/{id}/status         workflow transition (PUT)
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{article, translation};
use crate::state::AppState;

/// `/articles` routes.
pub fn articles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(article::list).post(article::create))
        .route("/by-slug/{slug}", get(article::get_resolved))
        .route(
            "/{id}",
            get(article::get_by_id)
                .put(article::update)
                .delete(article::delete),
        )
        .route("/{id}/translations", get(article::list_translations))
        .route(
            "/{id}/translations/{locale}",
            put(article::upsert_translation).delete(article::delete_translation),
        )
}

/// `/translation-requests` routes.
pub fn translation_requests_router() -> Router<AppState> {
    Router::new()
        .route("/", get(translation::list).post(translation::create))
        .route("/{id}", get(translation::get_by_id))
        .route("/{id}/assign", post(translation::assign))
        .route("/{id}/status", put(translation::update_status))
}
