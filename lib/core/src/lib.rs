//! # Likewise Core
//!
//! Core library for the Likewise recommender.
//!
//! This crate provides the catalog model and the similarity pipeline:
//!
//! - [`Catalog`] - Ordered items loaded from CSV or built in memory
//! - [`TfIdfVectorizer`] - Fits a vocabulary and weights every item
//! - [`SparseVector`] - L2-normalized rows compared by cosine similarity
//! - [`FuzzyMatcher`] - Resolves imprecise queries to catalog names
//! - [`RecommendationIndex`] - Immutable index answering `recommend` queries
//!
//! ## Example
//!
//! ```rust
//! use likewise_core::{Catalog, CatalogItem, RecommendationIndex, RecommenderConfig};
//!
//! let catalog = Catalog::new(vec![
//!     CatalogItem::new("Yesterday", "The Beatles", "all my troubles seemed so far away", "link1"),
//!     CatalogItem::new("Let It Be", "The Beatles", "when I find myself in times of trouble", "link2"),
//!     CatalogItem::new("Help", "The Beatles", "help I need somebody", "link3"),
//! ]);
//! let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
//!
//! let result = index.recommend("yesterday");
//! assert_eq!(result.matched_name(), Some("Yesterday"));
//! assert_eq!(result.recommendations().len(), 2);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod sparse;
pub mod tokenizer;
pub mod vectorizer;

pub use catalog::{Catalog, CatalogItem, ColumnMapping};
pub use config::{RecommenderConfig, DEFAULT_CUTOFF, DEFAULT_TOP_K};
pub use error::{Error, Result};
pub use index::{Recommendation, RecommendationIndex, RecommendationResult};
pub use matcher::{CloseMatch, FuzzyMatcher, SequenceMatcher};
pub use sparse::SparseVector;
pub use vectorizer::{TfIdfVectorizer, Vocabulary};
