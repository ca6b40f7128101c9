//! Business records management core.
//!
//! The interesting pieces live in [`filters`] (condition trees, operator
//! catalog, compiler, compact codec, validator) and [`search`] (relevance
//! scoring and multi-entity fan-out). [`state`] provides the repository seam
//! the persistence layer plugs into, [`api`] exposes everything over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod search;
pub mod state;

pub use error::{AppError, Result};
