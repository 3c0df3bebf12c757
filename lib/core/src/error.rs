use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog is empty: no items to index")]
    EmptyCatalog,

    #[error("Vocabulary is empty: no tokens survived stopword filtering")]
    EmptyVocabulary,

    #[error("Missing catalog column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error comes from building the index rather than reading input.
    ///
    /// Build errors mean no usable vectors exist and the service must not start.
    #[inline]
    pub fn is_build_error(&self) -> bool {
        matches!(self, Error::EmptyCatalog | Error::EmptyVocabulary)
    }
}
