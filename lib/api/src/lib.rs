//! REST API for the Likewise recommender.
//!
//! [`RestApi`] serves the routes registered by [`rest::configure`] over a
//! shared [`IndexHandle`].

pub mod handle;
pub mod rest;

pub use handle::{CatalogSource, IndexHandle};
pub use rest::RestApi;
