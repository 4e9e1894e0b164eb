//! Maps arbitrary source keys onto the normalized catalog record.
//!
//! Each canonical field has a list of candidate header names. Headers and
//! candidates are compared after text normalization with spaces removed, so
//! `"Product Name"`, `product_name` and `productName` all match. Explicit
//! overrides win when the header they name exists.

use crate::error::SchemaError;
use crate::numeric::parse_numeric;
use catalog_core::tokenizer::normalize_text;
use catalog_core::CatalogRecord;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Title,
    Description,
    Price,
    Rating,
    ImageUrl,
    Category,
    Brand,
    Url,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Id,
        Field::Title,
        Field::Description,
        Field::Price,
        Field::Rating,
        Field::ImageUrl,
        Field::Category,
        Field::Brand,
        Field::Url,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::ImageUrl => "image_url",
            Field::Category => "category",
            Field::Brand => "brand",
            Field::Url => "url",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key.trim())
    }

    fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["id", "sku", "product_id", "uniq_id"],
            Field::Title => &["title", "name", "product_name", "nom", "titre", "product"],
            Field::Description => &["description", "desc", "details", "content"],
            Field::Price => &["price", "selling_price", "prix", "amount", "cost"],
            Field::Rating => &["rating", "average_rating", "note", "stars"],
            Field::ImageUrl => &["image_url", "image", "images", "thumbnail", "photo"],
            Field::Category => &["category", "categorie", "sub_category", "type", "department"],
            Field::Brand => &["brand", "marque", "maker"],
            Field::Url => &["url", "product_url", "link", "href"],
        }
    }
}

fn compact_key(header: &str) -> String {
    normalize_text(header).replace(' ', "")
}

/// Resolved source key for each canonical field that could be matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: BTreeMap<Field, String>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Build a normalized record from one source object.
    pub fn record(&self, row: &Map<String, Value>) -> CatalogRecord {
        CatalogRecord {
            id: self.text(row, Field::Id),
            title: self.text(row, Field::Title),
            description: self.text(row, Field::Description),
            category: self.text(row, Field::Category),
            brand: self.text(row, Field::Brand),
            price: self.number(row, Field::Price),
            rating: self.number(row, Field::Rating),
            image_url: self.text(row, Field::ImageUrl),
            url: self.text(row, Field::Url),
        }
    }

    fn value<'a>(&self, row: &'a Map<String, Value>, field: Field) -> Option<&'a Value> {
        self.get(field).and_then(|key| row.get(key))
    }

    fn text(&self, row: &Map<String, Value>, field: Field) -> Option<String> {
        match self.value(row, field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(values) => {
                let joined: Vec<String> =
                    values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
                (!joined.is_empty()).then(|| joined.join(" "))
            }
            Value::Null | Value::Object(_) => None,
        }
    }

    fn number(&self, row: &Map<String, Value>, field: Field) -> Option<f64> {
        match self.value(row, field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_numeric(s),
            _ => None,
        }
    }
}

/// Resolve canonical fields from the available headers.
///
/// `overrides` maps canonical keys (`"title"`, `"price"`, ...) to header names.
pub fn resolve_schema<S: AsRef<str>>(
    headers: &[S],
    overrides: &HashMap<String, String>,
) -> Result<ColumnMap, SchemaError> {
    let available: Vec<&str> =
        headers.iter().map(|h| h.as_ref().trim()).filter(|h| !h.is_empty()).collect();
    let by_compact_key: HashMap<String, &str> =
        available.iter().map(|h| (compact_key(h), *h)).collect();

    let mut columns: BTreeMap<Field, String> = BTreeMap::new();
    for (canonical, chosen) in overrides {
        match Field::from_key(canonical) {
            Some(field) if available.contains(&chosen.trim()) => {
                columns.insert(field, chosen.trim().to_string());
            }
            Some(_) => tracing::warn!(field = %canonical, header = %chosen, "override names a missing header"),
            None => tracing::warn!(field = %canonical, "override for unknown field"),
        }
    }

    for field in Field::ALL {
        if columns.contains_key(&field) {
            continue;
        }
        let found = field
            .candidates()
            .iter()
            .find_map(|candidate| by_compact_key.get(&compact_key(candidate)));
        if let Some(header) = found {
            columns.insert(field, header.to_string());
        }
    }

    if !columns.contains_key(&Field::Title) {
        return Err(SchemaError::MissingTitle {
            headers: available.iter().map(|h| h.to_string()).collect(),
        });
    }
    tracing::debug!(?columns, "resolved schema");
    Ok(ColumnMap { columns })
}

/// Parse a JSON object of overrides. Anything else means "no overrides".
pub fn parse_column_map(raw: &str) -> HashMap<String, String> {
    if raw.trim().is_empty() {
        return HashMap::new();
    }
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(object) => object
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring invalid column map");
            HashMap::new()
        }
    }
}
