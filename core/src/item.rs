use crate::DocId;
use serde::{Deserialize, Serialize};

/// A normalized catalog record as handed over by the schema resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

impl CatalogRecord {
    /// Shorthand for fixtures and callers that only know a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// An indexed item. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub doc_id: DocId,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image_url: String,
    pub url: String,
}

impl Item {
    /// Convert a record into an item, or `None` when it has no usable title.
    pub fn from_record(doc_id: DocId, record: CatalogRecord) -> Option<Self> {
        let title = trimmed(record.title);
        if title.is_empty() {
            return None;
        }
        Some(Self {
            doc_id,
            external_id: record.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            title,
            description: trimmed(record.description),
            category: trimmed(record.category),
            brand: trimmed(record.brand),
            price: record.price.filter(|p| p.is_finite()),
            rating: record.rating.filter(|r| r.is_finite()),
            image_url: trimmed(record.image_url),
            url: trimmed(record.url),
        })
    }

    /// Text the item is indexed under: title, description, category and brand.
    pub fn searchable_text(&self) -> String {
        [&self.title, &self.description, &self.category, &self.brand]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn trimmed(field: Option<String>) -> String {
    field.map(|s| s.trim().to_string()).unwrap_or_default()
}
