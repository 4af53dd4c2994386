use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// JSON body as extracted, rejection included
pub type Body = Result<Json<Value>, JsonRejection>;

/// `:id` segment as extracted; fails on segments that do not decode to UTF-8
pub type IdParam = Result<Path<String>, PathRejection>;

/// Parse an item route's `{id}` segment. Only positive integers are accepted.
pub fn parse_id(raw: &str) -> ApiResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_id()),
    }
}

/// `parse_id` over the extractor result; an undecodable segment is just another invalid id
pub fn path_id(param: IdParam) -> ApiResult<i32> {
    match param {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => {
            tracing::debug!("Rejected id segment: {}", rejection.body_text());
            Err(ApiError::invalid_id())
        }
    }
}

/// JavaScript-style truthiness, used to coerce loosely typed flags
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Leading integer of `s` after optional whitespace and sign; `"12abc"` yields 12
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    let magnitude = digits.parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Request body fields. A missing, malformed or non-object body reads as `{}`.
#[derive(Debug, Default)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Any other rejection (an oversized body, a failed read) keeps its own status
    pub fn from_body(body: Body) -> ApiResult<Self> {
        match body {
            Ok(Json(Value::Object(map))) => Ok(Payload(map)),
            Ok(_) => Ok(Payload::default()),
            Err(JsonRejection::MissingJsonContentType(_))
            | Err(JsonRejection::JsonSyntaxError(_))
            | Err(JsonRejection::JsonDataError(_)) => Ok(Payload::default()),
            Err(rejection) => Err(rejection.into()),
        }
    }

    /// Tri-state string field: absent → `None`, `null` → `Some(None)`
    pub fn string(&self, key: &str) -> ApiResult<Option<Option<String>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
            Some(other) => Err(ApiError::internal_server_error(format!(
                "Invalid value for {}: expected a string, got {}",
                key, other
            ))),
        }
    }

    /// Field that must be present and non-empty
    pub fn required_string(&self, key: &str, message: &str) -> ApiResult<String> {
        match self.string(key)? {
            Some(Some(s)) if !s.is_empty() => Ok(s),
            _ => Err(ApiError::bad_request(message)),
        }
    }

    /// Required field on an update: may be omitted, but not blanked
    pub fn required_string_change(&self, key: &str, message: &str) -> ApiResult<Option<String>> {
        match self.string(key)? {
            None => Ok(None),
            Some(Some(s)) if !s.is_empty() => Ok(Some(s)),
            Some(_) => Err(ApiError::bad_request(message)),
        }
    }

    /// Boolean coerced by truthiness; `None` when absent or null
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).filter(|v| !v.is_null()).map(truthy)
    }

    /// `categoryId`: falsy means no category, truthy values must hold an integer
    pub fn category_id(&self) -> ApiResult<Option<i32>> {
        let value = match self.0.get("categoryId") {
            Some(v) if truthy(v) => v,
            _ => return Ok(None),
        };

        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Value::String(s) => leading_int(s),
            _ => None,
        };

        parsed
            .and_then(|id| i32::try_from(id).ok())
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("Category not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        Payload::from_body(Ok(Json(value))).unwrap()
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id("abc"), Err(ApiError::invalid_id()));
        assert_eq!(parse_id("0"), Err(ApiError::invalid_id()));
        assert_eq!(parse_id("-3"), Err(ApiError::invalid_id()));
        assert_eq!(parse_id("12abc"), Err(ApiError::invalid_id()));
        assert_eq!(parse_id("99999999999"), Err(ApiError::invalid_id()));
    }

    #[test]
    fn truthiness_matches_loose_coercion() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(false)));
        assert!(truthy(&json!("false")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!([])));
    }

    #[test]
    fn missing_body_reads_as_empty() {
        let p = Payload::default();
        assert_eq!(
            p.required_string("title", "Title is required"),
            Err(ApiError::bad_request("Title is required"))
        );
        let p = payload(json!([1, 2]));
        assert_eq!(p.string("title"), Ok(None));
    }

    #[test]
    fn string_fields_are_tri_state() {
        let p = payload(json!({"content": null, "title": "x"}));
        assert_eq!(p.string("content"), Ok(Some(None)));
        assert_eq!(p.string("title"), Ok(Some(Some("x".into()))));
        assert_eq!(p.string("missing"), Ok(None));
    }

    #[test]
    fn non_string_text_field_is_server_error() {
        let err = payload(json!({"title": 5})).string("title").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Invalid value for title: expected a string, got 5");

        let err = payload(json!({"name": ["a"]}))
            .required_string("name", "Name is required")
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn blank_required_field_on_update_is_rejected() {
        let p = payload(json!({"name": ""}));
        assert!(p.required_string_change("name", "Name is required").is_err());
        let p = payload(json!({}));
        assert_eq!(p.required_string_change("name", "Name is required"), Ok(None));
    }

    #[test]
    fn category_id_coercion() {
        assert_eq!(payload(json!({})).category_id(), Ok(None));
        assert_eq!(payload(json!({"categoryId": null})).category_id(), Ok(None));
        assert_eq!(payload(json!({"categoryId": 0})).category_id(), Ok(None));
        assert_eq!(payload(json!({"categoryId": ""})).category_id(), Ok(None));
        assert_eq!(payload(json!({"categoryId": 7})).category_id(), Ok(Some(7)));
        assert_eq!(payload(json!({"categoryId": "12"})).category_id(), Ok(Some(12)));
        assert_eq!(payload(json!({"categoryId": " 3px"})).category_id(), Ok(Some(3)));
        assert_eq!(payload(json!({"categoryId": 2.9})).category_id(), Ok(Some(2)));
        assert!(payload(json!({"categoryId": "abc"})).category_id().is_err());
        assert!(payload(json!({"categoryId": true})).category_id().is_err());
    }

    #[test]
    fn flags_ignore_null() {
        assert_eq!(payload(json!({"published": null})).flag("published"), None);
        assert_eq!(payload(json!({"published": "yes"})).flag("published"), Some(true));
        assert_eq!(payload(json!({"published": 0})).flag("published"), Some(false));
    }
}
