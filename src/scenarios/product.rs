//! Shape and type checks for a single catalog item.

use serde_json::Value;

use crate::expected::ExpectedValues;
use crate::sampler::ItemId;
use crate::testing::{CheckResult, Failure, check};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn field<'a>(item: &'a Value, name: &str) -> CheckResult<&'a Value> {
    item.get(name)
        .ok_or_else(|| Failure::new(format!("Missing `{name}` field")))
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn non_empty_string(item: &Value, name: &str) -> CheckResult {
    let value = field(item, name)?;
    check(value.as_str().is_some_and(|s| !s.is_empty()), || {
        format!("`{name}` should be a non-empty string, got {value}")
    })
}

/// The body is an object carrying every expected key and the requested id.
pub fn check_structure(item: &Value, expected: &ExpectedValues, id: ItemId) -> CheckResult {
    let object = item.as_object().ok_or_else(|| {
        Failure::new(format!("Response should be a JSON object, got {}", kind(item)))
    })?;

    let missing: Vec<&str> = expected
        .product_keys
        .iter()
        .map(String::as_str)
        .filter(|key| !object.contains_key(*key))
        .collect();
    check(missing.is_empty(), || {
        format!("Missing keys in response: {}", missing.join(", "))
    })?;

    let actual = object
        .get("id")
        .ok_or_else(|| Failure::new(format!("Missing `id` field, expected id {id}")))?;
    check(actual.as_i64() == Some(id), || {
        format!("Incorrect item loaded: expected id {id}, got {actual}")
    })
}

/// Field types and value ranges. Returns the image URL for the reachability
/// check that follows.
pub fn check_data_types<'a>(item: &'a Value, expected: &ExpectedValues) -> CheckResult<&'a str> {
    let id = field(item, "id")?;
    check(is_integer(id), || format!("`id` should be an integer, got {id}"))?;

    non_empty_string(item, "title")?;

    let price = field(item, "price")?;
    check(price.as_f64().is_some_and(|p| p > 0.0), || {
        format!("`price` should be a positive number, got {price}")
    })?;

    non_empty_string(item, "description")?;
    non_empty_string(item, "category")?;

    let image = field(item, "image")?;
    let image_url = image
        .as_str()
        .filter(|url| url.starts_with(&expected.image_scheme_prefix))
        .ok_or_else(|| {
            Failure::new(format!(
                "`image` should be a string starting with `{}`, got {image}",
                expected.image_scheme_prefix
            ))
        })?;

    let rating = field(item, "rating")?;
    check(rating.is_object(), || {
        format!("`rating` should be an object, got {}", kind(rating))
    })?;

    let rate = field(rating, "rate")?;
    check(rate.is_number(), || {
        format!("`rating.rate` should be a number, got {rate}")
    })?;
    check(rate.as_f64().is_some_and(|r| r >= 0.0), || {
        format!("`rating.rate` should be >= 0, got {rate}")
    })?;

    let count = field(rating, "count")?;
    check(is_integer(count), || {
        format!("`rating.count` should be an integer, got {count}")
    })?;
    check(count.is_u64() || count.as_i64().is_some_and(|c| c >= 0), || {
        format!("`rating.count` should be >= 0, got {count}")
    })?;

    Ok(image_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Value {
        json!({
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        })
    }

    fn expected() -> ExpectedValues {
        ExpectedValues::default()
    }

    #[test]
    fn well_formed_item_passes_both_checks() {
        let item = item();
        check_structure(&item, &expected(), 1).unwrap();
        let image = check_data_types(&item, &expected()).unwrap();
        assert!(image.ends_with(".jpg"));
    }

    #[test]
    fn structure_rejects_non_object() {
        let failure = check_structure(&json!([1, 2]), &expected(), 1).unwrap_err();
        assert!(failure.message.contains("got array"));
    }

    #[test]
    fn structure_lists_missing_keys() {
        let mut item = item();
        item.as_object_mut().unwrap().remove("category");
        item.as_object_mut().unwrap().remove("rating");

        let failure = check_structure(&item, &expected(), 1).unwrap_err();
        assert!(failure.message.contains("category"));
        assert!(failure.message.contains("rating"));
    }

    #[test]
    fn structure_rejects_id_mismatch() {
        let failure = check_structure(&item(), &expected(), 2).unwrap_err();
        assert!(failure.message.contains("expected id 2, got 1"));
    }

    #[test]
    fn structure_without_id_fails_when_keys_omit_id() {
        let expected = ExpectedValues {
            product_keys: vec!["title".to_string()],
            ..ExpectedValues::default()
        };
        let failure = check_structure(&json!({ "title": "no id here" }), &expected, 2).unwrap_err();
        assert_eq!(failure.message, "Missing `id` field, expected id 2");
    }

    #[test]
    fn data_types_reject_bad_fields() {
        let cases = [
            ("id", json!("1"), "`id` should be an integer"),
            ("id", json!(1.5), "`id` should be an integer"),
            ("title", json!(""), "`title` should be a non-empty string"),
            ("price", json!(0), "`price` should be a positive number"),
            ("price", json!("9.99"), "`price` should be a positive number"),
            ("description", json!(null), "`description` should be a non-empty string"),
            ("category", json!(3), "`category` should be a non-empty string"),
            ("image", json!("ftp://host/x.png"), "`image` should be a string starting with `http`"),
            ("rating", json!(4.5), "`rating` should be an object"),
        ];

        for (name, value, message) in cases {
            let mut item = item();
            item[name] = value;
            let failure = check_data_types(&item, &expected()).unwrap_err();
            assert!(
                failure.message.contains(message),
                "{name}: unexpected message {}",
                failure.message
            );
        }
    }

    #[test]
    fn data_types_check_rating_ranges() {
        let mut item = item();
        item["rating"]["rate"] = json!(-0.5);
        let failure = check_data_types(&item, &expected()).unwrap_err();
        assert!(failure.message.contains("`rating.rate` should be >= 0"));

        let mut item = self::item();
        item["rating"]["count"] = json!(-1);
        let failure = check_data_types(&item, &expected()).unwrap_err();
        assert!(failure.message.contains("`rating.count` should be >= 0"));

        let mut item = self::item();
        item["rating"]["count"] = json!(12.5);
        let failure = check_data_types(&item, &expected()).unwrap_err();
        assert!(failure.message.contains("`rating.count` should be an integer"));
    }

    #[test]
    fn data_types_accept_integer_price_and_zero_rating() {
        let mut item = item();
        item["price"] = json!(15);
        item["rating"] = json!({ "rate": 0, "count": 0 });
        check_data_types(&item, &expected()).unwrap();
    }

    #[test]
    fn data_types_report_missing_rating_field() {
        let mut item = item();
        item["rating"] = json!({ "rate": 4.1 });
        let failure = check_data_types(&item, &expected()).unwrap_err();
        assert_eq!(failure.message, "Missing `count` field");
    }
}
