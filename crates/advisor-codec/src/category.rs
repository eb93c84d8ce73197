//! # Category Codec
//!
//! Bidirectional mapping between a categorical field's labels and the integer
//! indices the classifier sees. Index order is lexicographic by label.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use advisor_core::UnknownCategoryError;

/// Label↔index mapping for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCodec {
    field: String,
    classes: Vec<String>,
}

impl CategoryCodec {
    /// Fit over every observed label. Duplicates collapse; order is sorted.
    pub fn fit<I, S>(field: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = labels
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        Self {
            field: field.into(),
            classes: unique.into_iter().collect(),
        }
    }

    /// The field this codec encodes.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Known labels in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of `label`.
    pub fn encode(&self, label: &str) -> Result<usize, UnknownCategoryError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| self.unknown(label))
    }

    /// Label at `index`.
    pub fn decode(&self, index: usize) -> Result<&str, UnknownCategoryError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.unknown(&index.to_string()))
    }

    /// Label→index mapping, for reports.
    pub fn mapping(&self) -> BTreeMap<String, usize> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect()
    }

    fn unknown(&self, category: &str) -> UnknownCategoryError {
        UnknownCategoryError {
            field: self.field.clone(),
            category: category.to_string(),
            known: self.classes.clone(),
        }
    }

    /// Sortedness and uniqueness hold for anything built by `fit`; a bundle
    /// read from disk is re-checked with this.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.classes.windows(2).all(|w| w[0] < w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sorted_by_label() {
        let codec = CategoryCodec::fit("severity", ["Medium", "Low", "High", "Low"]);
        assert_eq!(codec.classes(), &["High", "Low", "Medium"]);
        assert_eq!(codec.encode("High").unwrap(), 0);
        assert_eq!(codec.encode("Medium").unwrap(), 2);
    }

    #[test]
    fn fit_is_independent_of_row_order() {
        let a = CategoryCodec::fit("risk_factor", ["low", "high", "medium"]);
        let b = CategoryCodec::fit("risk_factor", ["medium", "low", "high"]);
        assert_eq!(a, b);
    }

    #[test]
    fn unseen_category_is_an_error() {
        let codec = CategoryCodec::fit("claim_type", ["Auto", "Property"]);
        let err = codec.encode("Health").unwrap_err();
        assert_eq!(err.field, "claim_type");
        assert_eq!(err.category, "Health");
        assert_eq!(err.known, vec!["Auto".to_string(), "Property".to_string()]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let codec = CategoryCodec::fit("severity", ["High", "Low"]);
        assert_eq!(codec.decode(1).unwrap(), "Low");
        let err = codec.decode(5).unwrap_err();
        assert_eq!(err.category, "5");
    }

    #[test]
    fn mapping_lists_every_class() {
        let codec = CategoryCodec::fit("risk_factor", ["low", "high"]);
        let m = codec.mapping();
        assert_eq!(m["high"], 0);
        assert_eq!(m["low"], 1);
    }

    #[test]
    fn hand_edited_codec_is_not_well_formed() {
        let codec: CategoryCodec =
            serde_json::from_str(r#"{"field":"severity","classes":["Low","High"]}"#).unwrap();
        assert!(!codec.is_well_formed());
    }
}
