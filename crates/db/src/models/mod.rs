//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod article;
pub mod asset;
pub mod audit;
pub mod collection;
pub mod company;
pub mod event;
pub mod lead;
pub mod meeting;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod role_template;
pub mod session;
pub mod task;
pub mod translation_request;
pub mod user;
