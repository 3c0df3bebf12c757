//! # Likewise
//!
//! Content-based item recommendation: resolve an imprecise query to a catalog
//! item, then rank the rest of the catalog by TF-IDF cosine similarity.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! likewise --catalog ./songs.csv --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use likewise::prelude::*;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogItem::new("Yesterday", "The Beatles", "all my troubles seemed so far away", "link1"),
//!     CatalogItem::new("Help", "The Beatles", "help I need somebody", "link3"),
//! ]);
//! let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
//!
//! match index.recommend("Yesterdy") {
//!     RecommendationResult::Found { matched_name, recommendations } => {
//!         assert_eq!(matched_name, "Yesterday");
//!         assert_eq!(recommendations[0].payload, "link3");
//!     }
//!     RecommendationResult::NotFound => unreachable!(),
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `likewise-core` - Catalog, tokenizer, TF-IDF vectors, fuzzy matching, ranking
//! - `likewise-api` - REST API and the reloadable index handle

// Re-export core types
pub use likewise_core::{
    Catalog, CatalogItem, ColumnMapping,
    RecommendationIndex, RecommendationResult, Recommendation, RecommenderConfig,
    TfIdfVectorizer, Vocabulary, SparseVector,
    FuzzyMatcher, CloseMatch,
    Error, Result,
    DEFAULT_CUTOFF, DEFAULT_TOP_K,
};

// Re-export API
pub use likewise_api::{CatalogSource, IndexHandle, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogItem, ColumnMapping,
        RecommendationIndex, RecommendationResult, Recommendation, RecommenderConfig,
        Error, Result,
        CatalogSource, IndexHandle, RestApi,
    };
}
