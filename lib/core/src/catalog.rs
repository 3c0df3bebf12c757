use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// A single item in the catalog.
///
/// Identity is the row index inside its [`Catalog`]. Textual fields are never
/// absent: missing values are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    /// Creator, author, artist...
    #[serde(default)]
    pub secondary_attribute: String,
    #[serde(default)]
    pub description: String,
    /// Opaque value passed through to recommendations (e.g. a link)
    #[serde(default)]
    pub payload: String,
}

impl CatalogItem {
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        secondary_attribute: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            secondary_attribute: secondary_attribute.into(),
            description: description.into(),
            payload: payload.into(),
        }
    }

    /// Name, secondary attribute and description joined by single spaces.
    pub fn combined_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.secondary_attribute.len() + self.description.len() + 2,
        );
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(&self.secondary_attribute);
        text.push(' ');
        text.push_str(&self.description);
        text
    }
}

/// Column names used to read a catalog from CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: String,
    pub secondary_attribute: String,
    pub description: String,
    pub payload: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "song".to_string(),
            secondary_attribute: "artist".to_string(),
            description: "text".to_string(),
            payload: "link".to_string(),
        }
    }
}

/// Ordered, read-only set of catalog items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Load a catalog from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, columns: &ColumnMapping) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading catalog from {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, columns)
    }

    /// Load a catalog from any CSV source with a header row.
    ///
    /// The name column is required. Other mapped columns may be absent, in
    /// which case the field is empty for every item. Empty cells and short
    /// rows also yield empty fields.
    pub fn from_csv_reader<R: Read>(source: R, columns: &ColumnMapping) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let position = |column: &str| headers.iter().position(|h| h.trim() == column);

        let name_idx = position(&columns.name)
            .ok_or_else(|| Error::MissingColumn(columns.name.clone()))?;
        let optional = |column: &str| {
            let idx = position(column);
            if idx.is_none() {
                warn!("Catalog column {:?} not found, using empty values", column);
            }
            idx
        };
        let attribute_idx = optional(&columns.secondary_attribute);
        let description_idx = optional(&columns.description);
        let payload_idx = optional(&columns.payload);

        let mut items = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i)).unwrap_or_default().to_string()
            };
            items.push(CatalogItem {
                name: field(Some(name_idx)),
                secondary_attribute: field(attribute_idx),
                description: field(description_idx),
                payload: field(payload_idx),
            });
        }

        debug!("Read {} catalog rows", items.len());
        Ok(Self { items })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    #[inline]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Row index of the first item carrying exactly this name
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
