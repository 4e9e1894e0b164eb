use catalog_core::LanguagePackError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no title column among {headers:?}; set COLUMN_MAP_JSON, e.g. {{\"title\": \"product_name\"}}")]
    MissingTitle { headers: Vec<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no .csv, .json or .jsonl input found at {0}")]
    NoInput(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid JSON in {path} (line {line}): {source}")]
    Json { path: PathBuf, line: usize, source: serde_json::Error },

    #[error("invalid CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("language pack {path}: {source}")]
    LanguagePack { path: PathBuf, source: LanguagePackError },
}
