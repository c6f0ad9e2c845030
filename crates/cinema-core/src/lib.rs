//! Core types and trait definitions for the cinema booking backend.
//!
//! Holds the hall grid, the seat ledger types and the [`store::CinemaStore`]
//! trait that backends implement. No HTTP or database code lives here.

#![allow(async_fn_in_trait)]

pub mod catalogue;
pub mod error;
pub mod hall;
pub mod ledger;
pub mod order;
pub mod session;
pub mod store;

pub use error::{AsCoreError, Entity, Error, Result};
