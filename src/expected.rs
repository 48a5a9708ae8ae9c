//! Expected values the catalog service is checked against.

use serde::{Deserialize, Serialize};

/// Fields every single-item response must carry.
pub const PRODUCT_KEYS: [&str; 7] = [
    "id",
    "title",
    "price",
    "description",
    "category",
    "image",
    "rating",
];

/// Identifiers that must never resolve to an item.
pub const INVALID_IDS: [&str; 5] = ["-1", "0", "10000", "abc", "!@#"];

/// Status codes, content type, schema keys and error texts the service is
/// expected to produce. Loaded as part of [`crate::config::SuiteConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedValues {
    pub status_ok: u16,
    pub status_bad_request: u16,
    pub status_not_found: u16,
    pub status_method_not_allowed: u16,
    pub content_type_json: String,
    pub product_keys: Vec<String>,
    /// Trimmed body returned for an identifier that does not exist.
    pub invalid_id_text: String,
    /// Prefix of the error body for a POST to a single-item endpoint; the
    /// identifier is appended to it.
    pub wrong_method_message: String,
    pub image_scheme_prefix: String,
    pub invalid_ids: Vec<String>,
}

impl Default for ExpectedValues {
    fn default() -> Self {
        Self {
            status_ok: 200,
            status_bad_request: 400,
            status_not_found: 404,
            status_method_not_allowed: 405,
            content_type_json: "application/json; charset=utf-8".to_string(),
            product_keys: PRODUCT_KEYS.iter().map(|key| key.to_string()).collect(),
            invalid_id_text: String::new(),
            wrong_method_message: "Cannot POST /products/".to_string(),
            image_scheme_prefix: "http".to_string(),
            invalid_ids: INVALID_IDS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl ExpectedValues {
    /// Statuses accepted for an unknown identifier.
    pub fn invalid_id_statuses(&self) -> [u16; 2] {
        [self.status_not_found, self.status_bad_request]
    }

    pub fn wrong_method_text(&self, id: i64) -> String {
        format!("{}{id}", self.wrong_method_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_product_schema() {
        let expected = ExpectedValues::default();
        assert_eq!(expected.product_keys.len(), 7);
        assert!(expected.product_keys.iter().any(|key| key == "rating"));
        assert_eq!(expected.invalid_ids, vec!["-1", "0", "10000", "abc", "!@#"]);
    }

    #[test]
    fn wrong_method_text_appends_identifier() {
        let expected = ExpectedValues::default();
        assert_eq!(expected.wrong_method_text(5), "Cannot POST /products/5");
    }

    #[test]
    fn invalid_id_statuses_are_not_found_then_bad_request() {
        assert_eq!(ExpectedValues::default().invalid_id_statuses(), [404, 400]);
    }
}
