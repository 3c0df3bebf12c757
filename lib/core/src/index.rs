use crate::catalog::Catalog;
use crate::config::RecommenderConfig;
use crate::matcher::{CloseMatch, FuzzyMatcher};
use crate::sparse::SparseVector;
use crate::vectorizer::{TfIdfVectorizer, Vocabulary};
use crate::Result;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

/// One ranked item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub payload: String,
    /// Cosine similarity to the resolved item; not part of the wire format
    #[serde(skip_serializing, default)]
    pub score: f32,
}

/// Outcome of a recommendation query
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResult {
    Found {
        matched_name: String,
        recommendations: Vec<Recommendation>,
    },
    NotFound,
}

impl RecommendationResult {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, RecommendationResult::Found { .. })
    }

    pub fn matched_name(&self) -> Option<&str> {
        match self {
            RecommendationResult::Found { matched_name, .. } => Some(matched_name),
            RecommendationResult::NotFound => None,
        }
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            RecommendationResult::Found { recommendations, .. } => recommendations,
            RecommendationResult::NotFound => &[],
        }
    }
}

// {"matched_name", "recommendations"} or {"error": "not found"}
impl Serialize for RecommendationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RecommendationResult::Found {
                matched_name,
                recommendations,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("matched_name", matched_name)?;
                map.serialize_entry("recommendations", recommendations)?;
                map.end()
            }
            RecommendationResult::NotFound => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", "not found")?;
                map.end()
            }
        }
    }
}

/// Immutable recommendation index over one catalog.
///
/// Holds the catalog, the fitted vocabulary and one TF-IDF row per item.
/// Nothing is mutated after [`build`](Self::build), so a shared reference can
/// serve any number of concurrent queries.
#[derive(Debug)]
pub struct RecommendationIndex {
    catalog: Catalog,
    vectorizer: TfIdfVectorizer,
    vectors: Vec<SparseVector>,
    matcher: FuzzyMatcher,
    config: RecommenderConfig,
}

impl RecommendationIndex {
    pub fn build(catalog: Catalog, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let (vectorizer, vectors) = TfIdfVectorizer::fit(&catalog)?;
        info!(
            "Recommendation index ready: {} items, cutoff {}, top_k {}",
            catalog.len(),
            config.cutoff,
            config.top_k
        );
        Ok(Self {
            catalog,
            vectorizer,
            vectors,
            matcher: FuzzyMatcher::new(config.cutoff),
            config,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        self.vectorizer.vocabulary()
    }

    #[inline]
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    #[inline]
    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    #[inline]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.catalog.iter().map(|item| item.name.as_str())
    }

    /// Up to `n` catalog names approximately matching `query`, best first
    pub fn close_matches(&self, query: &str, n: usize) -> Vec<CloseMatch> {
        if query.is_empty() {
            return Vec::new();
        }
        self.matcher.close_matches(query, self.names(), n)
    }

    /// Row of the catalog item `query` resolves to
    pub fn resolve(&self, query: &str) -> Option<usize> {
        if query.is_empty() {
            return None;
        }
        // Ties keep catalog order, so duplicate names resolve to their first row
        self.matcher.best_match(query, self.names()).map(|best| best.index)
    }

    /// Cosine similarity of row `index` against every row, in catalog order
    pub fn scores(&self, index: usize) -> Vec<f32> {
        match self.vectors.get(index) {
            Some(target) => self
                .vectors
                .par_iter()
                .map(|row| target.cosine_similarity(row))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Rows most similar to `index`, excluding `index` itself.
    ///
    /// Sorted by score descending with catalog order breaking ties; at most
    /// `top_k` entries.
    pub fn rank(&self, index: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self.scores(index).into_iter().enumerate().collect();
        scored.sort_by(|a, b| OrderedFloat(b.1).cmp(&OrderedFloat(a.1)));
        scored
            .into_iter()
            .filter(|&(row, _)| row != index)
            .take(self.config.top_k)
            .collect()
    }

    pub fn recommend(&self, query: &str) -> RecommendationResult {
        let Some(index) = self.resolve(query) else {
            debug!("No catalog name matches {:?}", query);
            return RecommendationResult::NotFound;
        };

        let recommendations = self
            .rank(index)
            .into_iter()
            .filter_map(|(row, score)| {
                self.catalog.get(row).map(|item| Recommendation {
                    name: item.name.clone(),
                    payload: item.payload.clone(),
                    score,
                })
            })
            .collect::<Vec<_>>();

        let matched_name = self.catalog.get(index).map(|item| item.name.clone()).unwrap_or_default();
        debug!(
            "Query {:?} resolved to {:?} with {} recommendations",
            query,
            matched_name,
            recommendations.len()
        );
        RecommendationResult::Found {
            matched_name,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::Error;

    fn beatles() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("Yesterday", "The Beatles", "yesterday all my troubles seemed so far away", "link1"),
            CatalogItem::new("Let It Be", "The Beatles", "when I find myself in times of trouble", "link2"),
            CatalogItem::new("Help", "The Beatles", "help I need somebody", "link3"),
        ])
    }

    fn numbered(n: usize) -> Catalog {
        (0..n)
            .map(|i| {
                CatalogItem::new(
                    format!("Track {i:03}"),
                    format!("artist{}", i % 4),
                    format!("shared words plus marker{} and group{}", i, i % 7),
                    format!("/track/{i}"),
                )
            })
            .collect()
    }

    #[test]
    fn test_recommend_beatles() {
        let index = RecommendationIndex::build(beatles(), RecommenderConfig::default()).unwrap();
        let result = index.recommend("yesterday");

        assert_eq!(result.matched_name(), Some("Yesterday"));
        let recs = result.recommendations();
        assert_eq!(recs.len(), 2);
        let mut pairs: Vec<(&str, &str)> =
            recs.iter().map(|r| (r.name.as_str(), r.payload.as_str())).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("Help", "link3"), ("Let It Be", "link2")]);
    }

    #[test]
    fn test_not_found() {
        let index = RecommendationIndex::build(beatles(), RecommenderConfig::default()).unwrap();
        assert_eq!(index.recommend("zzzxyqq_not_a_song"), RecommendationResult::NotFound);
        assert_eq!(index.recommend(""), RecommendationResult::NotFound);
        assert!(index.close_matches("", 5).is_empty());
    }

    #[test]
    fn test_window_is_bounded() {
        let index = RecommendationIndex::build(numbered(50), RecommenderConfig::default()).unwrap();
        let result = index.recommend("Track 007");
        assert_eq!(result.matched_name(), Some("Track 007"));
        assert_eq!(result.recommendations().len(), 19);
        assert!(result.recommendations().iter().all(|r| r.name != "Track 007"));
        assert!(result
            .recommendations()
            .windows(2)
            .all(|w| w[0].score >= w[1].score));

        let config = RecommenderConfig { top_k: 3, ..Default::default() };
        let small = RecommendationIndex::build(numbered(50), config).unwrap();
        assert_eq!(small.recommend("Track 007").recommendations().len(), 3);
    }

    #[test]
    fn test_single_item_catalog() {
        let catalog = Catalog::new(vec![CatalogItem::new("Solo", "", "lonely tune", "x")]);
        let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
        let result = index.recommend("Solo");
        assert_eq!(result.matched_name(), Some("Solo"));
        assert!(result.recommendations().is_empty());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_row() {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Angel", "Artist A", "wings heaven", "a"),
            CatalogItem::new("Other", "Artist B", "roads cars", "b"),
            CatalogItem::new("Angel", "Artist C", "wings heaven", "c"),
        ]);
        let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
        assert_eq!(index.resolve("Angel"), Some(0));

        let ranked = index.rank(0);
        assert!(ranked.iter().all(|&(row, _)| row != 0));
        assert_eq!(ranked[0].0, 2);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Seed", "", "alpha", ""),
            CatalogItem::new("Zeta", "", "beta", ""),
            CatalogItem::new("Eta", "", "gamma", ""),
        ]);
        let index = RecommendationIndex::build(catalog, RecommenderConfig::default()).unwrap();
        let ranked = index.rank(0);
        assert_eq!(ranked, vec![(1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn test_self_score_is_maximal() {
        let index = RecommendationIndex::build(numbered(20), RecommenderConfig::default()).unwrap();
        let scores = index.scores(5);
        assert_eq!(scores.len(), 20);
        let own = scores[5];
        assert!(scores.iter().all(|&s| s <= own + 1e-6));
        assert!(index.scores(99).is_empty());
    }

    #[test]
    fn test_build_errors() {
        let err = RecommendationIndex::build(Catalog::default(), RecommenderConfig::default())
            .unwrap_err();
        assert!(err.is_build_error());

        let config = RecommenderConfig { top_k: 0, ..Default::default() };
        let err = RecommendationIndex::build(beatles(), config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let index = RecommendationIndex::build(beatles(), RecommenderConfig::default()).unwrap();
        let found = serde_json::to_value(index.recommend("Help")).unwrap();
        assert_eq!(found["matched_name"], "Help");
        assert_eq!(found["recommendations"].as_array().unwrap().len(), 2);
        assert!(found["recommendations"][0]["payload"].is_string());
        assert!(found["recommendations"][0].get("score").is_none());

        let missing = serde_json::to_value(RecommendationResult::NotFound).unwrap();
        assert_eq!(missing, serde_json::json!({"error": "not found"}));
    }
}
