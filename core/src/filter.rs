//! Numeric and categorical constraints applied before scoring.
//!
//! An item with no price fails any active price bound, and an item with no
//! rating fails an active rating bound. Category comparison is exact up to case
//! and surrounding whitespace.

use crate::error::ValidationError;
use crate::item::Item;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub category: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_rating.is_none()
            && self.category.is_none()
    }

    /// Reject bounds that cannot be compared meaningfully.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("min_rating", self.min_rating),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ValidationError::NonFinite { field });
                }
                if v < 0.0 {
                    return Err(ValidationError::NegativeBound { field });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::InvertedPriceRange { min, max });
            }
        }
        Ok(())
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(min) = self.min_price {
            if !item.price.is_some_and(|p| p >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !item.price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if !item.rating.is_some_and(|r| r >= min) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if item.category.trim().to_lowercase() != category.trim().to_lowercase() {
                return false;
            }
        }
        true
    }

    /// Items that satisfy every bound, in their original order.
    pub fn apply<'a, I>(&'a self, items: I) -> impl Iterator<Item = &'a Item> + 'a
    where
        I: IntoIterator<Item = &'a Item>,
        I::IntoIter: 'a,
    {
        items.into_iter().filter(move |item| self.matches(item))
    }
}
