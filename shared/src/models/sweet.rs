//! Sweet Model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const MIN_SWEET_NAME_LEN: usize = 2;
pub const MAX_SWEET_NAME_LEN: usize = 100;
pub const MIN_CATEGORY_LEN: usize = 2;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Upper bound for a single purchase / restock
pub const MAX_STOCK_CHANGE: i64 = 1_000_000;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const MAX_SWEET_ID_LEN: usize = 64;

/// Sweet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC 3339 UTC
    pub created_at: String,
    /// RFC 3339 UTC
    pub updated_at: String,
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(error("name", "Sweet name is required"));
    }
    if !(MIN_SWEET_NAME_LEN..=MAX_SWEET_NAME_LEN).contains(&len) {
        return Err(error(
            "name",
            "Sweet name must be between 2 and 100 characters",
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    let len = category.trim().chars().count();
    if len == 0 {
        return Err(error("category", "Category is required"));
    }
    if !(MIN_CATEGORY_LEN..=MAX_CATEGORY_LEN).contains(&len) {
        return Err(error(
            "category",
            "Category must be between 2 and 50 characters",
        ));
    }
    Ok(())
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(error("price", "Price must be a finite number"))
    }
}

/// Stand-in for a quantity that is not a whole number
///
/// Lies below every accepted range, so validation reports the field's own
/// message instead of a JSON parse error.
const NOT_A_WHOLE_NUMBER: i64 = i64::MIN;

/// Largest float that still converts to `i64` exactly (2^53)
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn whole_number(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT)
                    .map(|f| f as i64)
            })
            .unwrap_or(NOT_A_WHOLE_NUMBER),
        _ => NOT_A_WHOLE_NUMBER,
    }
}

/// Optional quantity: `null` or missing is `None`, anything else must be a whole number
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.map(|v| whole_number(&v)))
}

fn lenient_stock_change<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_quantity(deserializer)?.unwrap_or(0))
}

/// Create sweet payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SweetCreate {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    #[validate(
        required(message = "Price must be a positive number"),
        range(exclusive_min = 0.0, message = "Price must be a positive number")
    )]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    #[validate(
        required(message = "Quantity must be a non-negative integer"),
        range(min = 0, message = "Quantity must be a non-negative integer")
    )]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl SweetCreate {
    /// Trim text fields, drop a blank description
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.description = normalize_description(self.description);
        self
    }
}

/// Update sweet payload, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SweetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0, message = "Quantity must be a non-negative integer"))]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl SweetUpdate {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.category = self.category.map(|c| c.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.description.is_none()
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn validate_price_range(search: &SweetSearch) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (search.min_price, search.max_price)
        && min > max
    {
        return Err(error(
            "price_range",
            "minPrice must be less than or equal to maxPrice",
        ));
    }
    Ok(())
}

/// Search query (`GET /api/sweets/search`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_price_range"))]
pub struct SweetSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "validate_finite"),
        range(min = 0.0, message = "minPrice must be a non-negative number")
    )]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "validate_finite"),
        range(min = 0.0, message = "maxPrice must be a non-negative number")
    )]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl SweetSearch {
    /// Lowercased name needle, `None` when blank
    pub fn name_filter(&self) -> Option<String> {
        text_filter(self.name.as_deref())
    }

    /// Lowercased category needle, `None` when blank
    pub fn category_filter(&self) -> Option<String> {
        text_filter(self.category.as_deref())
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Number of records to skip for the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

fn text_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// Purchase / restock payload
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
pub struct StockChange {
    #[serde(default, deserialize_with = "lenient_stock_change")]
    #[validate(range(min = 1, max = 1_000_000, message = "Quantity must be a positive integer"))]
    pub quantity: i64,
}

/// Whether a path id can be a sweet key: 1..=64 ASCII alphanumerics
pub fn is_valid_sweet_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SWEET_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, category: &str, price: f64, quantity: i64) -> SweetCreate {
        SweetCreate {
            name: name.into(),
            category: category.into(),
            price: Some(price),
            quantity: Some(quantity),
            description: None,
        }
    }

    fn messages(err: validator::ValidationErrors) -> Vec<String> {
        err.field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_create() {
        assert!(create("Gummy Bears", "Candy", 2.5, 10).validate().is_ok());
        assert!(create("Gummy Bears", "Candy", 2.5, 0).validate().is_ok());
    }

    #[test]
    fn test_create_requires_positive_price() {
        let msgs = messages(create("Gummy Bears", "Candy", 0.0, 10).validate().unwrap_err());
        assert_eq!(msgs, vec!["Price must be a positive number".to_string()]);
    }

    #[test]
    fn test_create_rejects_negative_quantity() {
        let msgs = messages(create("Gummy Bears", "Candy", 1.0, -1).validate().unwrap_err());
        assert_eq!(msgs, vec!["Quantity must be a non-negative integer".to_string()]);
    }

    #[test]
    fn test_create_missing_fields() {
        let req: SweetCreate = serde_json::from_str("{}").unwrap();
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Sweet name is required".to_string()));
        assert!(msgs.contains(&"Category is required".to_string()));
        assert!(msgs.contains(&"Price must be a positive number".to_string()));
        assert!(msgs.contains(&"Quantity must be a non-negative integer".to_string()));
    }

    #[test]
    fn test_name_length_counts_trimmed_chars() {
        assert!(create(" A ", "Candy", 1.0, 1).validate().is_err());
        assert!(create(&"x".repeat(101), "Candy", 1.0, 1).validate().is_err());
        assert!(create("Ab", "Cd", 1.0, 1).validate().is_ok());
    }

    #[test]
    fn test_description_limit() {
        let mut req = create("Gummy Bears", "Candy", 1.0, 1);
        req.description = Some("d".repeat(501));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalized_trims() {
        let mut req = create("  Toffee  ", " Chewy ", 1.0, 1);
        req.description = Some("   ".into());
        let req = req.normalized();
        assert_eq!(req.name, "Toffee");
        assert_eq!(req.category, "Chewy");
        assert_eq!(req.description, None);
    }

    #[test]
    fn test_update_allows_zero_price_and_empty_body() {
        let update = SweetUpdate {
            price: Some(0.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert!(SweetUpdate::default().validate().is_ok());
        assert!(SweetUpdate::default().is_empty());

        let bad = SweetUpdate {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_search_defaults() {
        let search = SweetSearch::default();
        assert_eq!(search.page(), 1);
        assert_eq!(search.limit(), 10);
        assert_eq!(search.offset(), 0);

        let search = SweetSearch {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(search.offset(), 40);
    }

    #[test]
    fn test_search_validation() {
        let inverted = SweetSearch {
            min_price: Some(5.0),
            max_price: Some(1.0),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let nan = SweetSearch {
            min_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let big_limit = SweetSearch {
            limit: Some(101),
            ..Default::default()
        };
        assert!(big_limit.validate().is_err());

        let zero_page = SweetSearch {
            page: Some(0),
            ..Default::default()
        };
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_search_text_filters() {
        let search = SweetSearch {
            name: Some("  ChoCo ".into()),
            category: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(search.name_filter().as_deref(), Some("choco"));
        assert_eq!(search.category_filter(), None);
    }

    #[test]
    fn test_stock_change_bounds() {
        assert!(StockChange { quantity: 0 }.validate().is_err());
        assert!(StockChange { quantity: 1 }.validate().is_ok());
        assert!(StockChange { quantity: MAX_STOCK_CHANGE }.validate().is_ok());
        assert!(StockChange { quantity: MAX_STOCK_CHANGE + 1 }.validate().is_err());

        let missing: StockChange = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_stock_change_non_integer_reaches_validation() {
        for body in [
            r#"{"quantity":1.5}"#,
            r#"{"quantity":"2"}"#,
            r#"{"quantity":true}"#,
            r#"{"quantity":1e300}"#,
        ] {
            let change: StockChange = serde_json::from_str(body).unwrap();
            let msgs = messages(change.validate().unwrap_err());
            assert_eq!(msgs, vec!["Quantity must be a positive integer".to_string()], "{body}");
        }

        let null: StockChange = serde_json::from_str(r#"{"quantity":null}"#).unwrap();
        assert!(null.validate().is_err());

        let whole_float: StockChange = serde_json::from_str(r#"{"quantity":3.0}"#).unwrap();
        assert_eq!(whole_float.quantity, 3);
        assert!(whole_float.validate().is_ok());
    }

    #[test]
    fn test_create_and_update_non_integer_quantity() {
        let req: SweetCreate = serde_json::from_str(
            r#"{"name":"Toffee","category":"Chewy","price":1.0,"quantity":2.5}"#,
        )
        .unwrap();
        let msgs = messages(req.validate().unwrap_err());
        assert_eq!(msgs, vec!["Quantity must be a non-negative integer".to_string()]);

        let update: SweetUpdate = serde_json::from_str(r#"{"quantity":"7"}"#).unwrap();
        assert!(!update.is_empty());
        assert!(update.validate().is_err());

        let update: SweetUpdate = serde_json::from_str(r#"{"price":2.0}"#).unwrap();
        assert_eq!(update.quantity, None);
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_sweet_id_shape() {
        assert!(is_valid_sweet_id("4f1c2a7e9b8d4c6aa1b2c3d4e5f60718"));
        assert!(!is_valid_sweet_id(""));
        assert!(!is_valid_sweet_id("abc-def"));
        assert!(!is_valid_sweet_id("sweet:abc"));
        assert!(!is_valid_sweet_id(&"a".repeat(65)));
    }

    #[test]
    fn test_sweet_json_shape() {
        let sweet = Sweet {
            id: "abc".into(),
            name: "Toffee".into(),
            category: "Chewy".into(),
            price: 1.25,
            quantity: 3,
            description: None,
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&sweet).unwrap();
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("description").is_none());
    }
}
