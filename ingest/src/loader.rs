use crate::error::{LoadError, SchemaError};
use crate::schema::resolve_schema;
use catalog_core::{BuildError, CatalogRecord, LanguagePack, SearchEngine, Tokenizer};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

type Row = Map<String, Value>;

fn is_catalog_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("csv" | "json" | "jsonl"))
}

fn input_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_catalog_file(e.path()))
        .map(|e| e.into_path())
        .collect()
}

fn push_row(rows: &mut Vec<Row>, value: Value, file: &Path) {
    match value {
        Value::Object(row) => rows.push(row),
        other => tracing::warn!(file = %file.display(), kind = ?other, "skipping non-object entry"),
    }
}

fn read_jsonl(file: &Path, rows: &mut Vec<Row>) -> Result<(), LoadError> {
    let f = File::open(file).map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
    for (n, line) in BufReader::new(f).lines().enumerate() {
        let line = line.map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .map_err(|source| LoadError::Json { path: file.to_path_buf(), line: n + 1, source })?;
        push_row(rows, value, file);
    }
    Ok(())
}

fn read_json(file: &Path, rows: &mut Vec<Row>) -> Result<(), LoadError> {
    let text = fs::read_to_string(file).map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
    let json: Value = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: file.to_path_buf(),
        line: source.line(),
        source,
    })?;
    match json {
        Value::Array(values) => values.into_iter().for_each(|v| push_row(rows, v, file)),
        other => push_row(rows, other, file),
    }
    Ok(())
}

/// Rows of a CSV file with a header line, each keyed by header. Short rows
/// simply lack the trailing keys.
fn read_csv(file: &Path, rows: &mut Vec<Row>) -> Result<(), LoadError> {
    let csv_error = |source| LoadError::Csv { path: file.to_path_buf(), source };
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(file).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        tracing::warn!(file = %file.display(), "csv file has no header line");
        return Ok(());
    }
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(())
}

/// Keys across all rows, in first-seen order.
fn header_union(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .flat_map(|row| row.keys())
        .filter(|key| seen.insert(key.as_str()))
        .cloned()
        .collect()
}

/// Load a catalog snapshot from a `.csv`, `.json` or `.jsonl` file, or a
/// directory of them.
///
/// Rows without a usable title are kept as title-less records; the index
/// skips them at build time.
pub fn load_records(
    input: &Path,
    overrides: &HashMap<String, String>,
) -> Result<Vec<CatalogRecord>, LoadError> {
    let files = input_files(input);
    if files.is_empty() {
        return Err(LoadError::NoInput(input.to_path_buf()));
    }

    let mut rows = Vec::new();
    for file in &files {
        match file.extension().and_then(|s| s.to_str()) {
            Some("csv") => read_csv(file, &mut rows)?,
            Some("jsonl") => read_jsonl(file, &mut rows)?,
            _ => read_json(file, &mut rows)?,
        }
    }
    if rows.is_empty() {
        tracing::warn!(input = %input.display(), "catalog has no rows");
        return Ok(Vec::new());
    }

    let columns = resolve_schema(&header_union(&rows), overrides)?;
    let records: Vec<CatalogRecord> = rows.iter().map(|row| columns.record(row)).collect();
    tracing::info!(files = files.len(), records = records.len(), "loaded catalog");
    Ok(records)
}

/// The built-in French/English tokenizer, or one using the pack at `path`.
pub fn load_tokenizer(path: Option<&Path>) -> Result<Tokenizer, LoadError> {
    let Some(path) = path else {
        return Ok(Tokenizer::default());
    };
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let pack = LanguagePack::from_json_str(&text)
        .map_err(|source| LoadError::LanguagePack { path: path.to_path_buf(), source })?;
    tracing::info!(
        path = %path.display(),
        stopwords = pack.stopword_count(),
        synonyms = pack.synonym_count(),
        "loaded language pack"
    );
    Ok(Tokenizer::new(pack))
}

/// Load the snapshot and wrap it in an engine that has not been built yet.
///
/// A catalog without a title column is not a load error: the engine comes
/// back already failed with [`BuildError::MissingTitle`], so a server can keep
/// answering with that error.
pub fn open_engine(
    input: &Path,
    overrides: &HashMap<String, String>,
    language_pack: Option<&Path>,
) -> Result<SearchEngine, LoadError> {
    let tokenizer = load_tokenizer(language_pack)?;
    match load_records(input, overrides) {
        Ok(records) => Ok(SearchEngine::new(records, tokenizer)),
        Err(LoadError::Schema(err @ SchemaError::MissingTitle { .. })) => {
            tracing::warn!(error = %err, "catalog has no title column");
            Ok(SearchEngine::failed(BuildError::MissingTitle))
        }
        Err(err) => Err(err),
    }
}
