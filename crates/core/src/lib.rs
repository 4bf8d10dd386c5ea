//! Domain logic for the Atelier platform.
//!
//! This crate has no I/O: it holds the role/permission model, the milestone
//! approval state machine, translation resolution, audit constants, and the
//! project access policy. Everything here is unit-testable without a
//! database, and is shared by the repository and API layers.

pub mod audit;
pub mod error;
pub mod milestone;
pub mod permissions;
pub mod policy;
pub mod roles;
pub mod translation;
pub mod types;
