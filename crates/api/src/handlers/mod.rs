//! HTTP request handlers, one module per resource.

pub mod article;
pub mod asset;
pub mod audit;
pub mod auth;
pub mod collection;
pub mod company;
pub mod lead;
pub mod meeting;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod role_template;
pub mod task;
pub mod translation;
pub mod users;
