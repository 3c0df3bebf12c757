use likewise_core::{Catalog, ColumnMapping, RecommendationIndex, RecommenderConfig, Result};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Where the index was built from, so it can be rebuilt on demand
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub path: PathBuf,
    pub columns: ColumnMapping,
    pub config: RecommenderConfig,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping, config: RecommenderConfig) -> Self {
        Self {
            path: path.into(),
            columns,
            config,
        }
    }

    /// Read the CSV and build a fresh index
    pub fn load(&self) -> Result<RecommendationIndex> {
        let catalog = Catalog::from_csv_path(&self.path, &self.columns)?;
        info!("Loaded {} catalog items from {:?}", catalog.len(), self.path);
        RecommendationIndex::build(catalog, self.config)
    }
}

/// Shared handle to the live index.
///
/// Readers take a snapshot `Arc` and never hold the lock while querying.
/// A reload builds the replacement first and only then swaps the pointer.
pub struct IndexHandle {
    current: RwLock<Arc<RecommendationIndex>>,
    source: Option<CatalogSource>,
}

impl IndexHandle {
    pub fn new(index: RecommendationIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            source: None,
        }
    }

    pub fn from_source(source: CatalogSource) -> Result<Self> {
        let index = source.load()?;
        Ok(Self {
            current: RwLock::new(Arc::new(index)),
            source: Some(source),
        })
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<RecommendationIndex> {
        self.current.read().clone()
    }

    #[inline]
    pub fn source(&self) -> Option<&CatalogSource> {
        self.source.as_ref()
    }

    /// Install a prebuilt index
    pub fn swap(&self, index: RecommendationIndex) -> Arc<RecommendationIndex> {
        let next = Arc::new(index);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Rebuild from the configured source. On failure the live index stays.
    ///
    /// Returns `Ok(None)` when the handle has no source to reload from.
    pub fn reload(&self) -> Result<Option<usize>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        match source.load() {
            Ok(index) => {
                let items = index.len();
                self.swap(index);
                info!("Catalog reloaded: {} items", items);
                Ok(Some(items))
            }
            Err(e) => {
                warn!("Catalog reload failed, keeping current index: {}", e);
                Err(e)
            }
        }
    }
}
