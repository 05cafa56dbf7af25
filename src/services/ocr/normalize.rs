//! Map whatever the OCR server returned onto `OcrResult`.
//!
//! Servers answer in a few shapes:
//!
//! - `{ "fields": { "tckn": ... }, "warnings": [...], "avatar_base64": ... }`
//! - the same wrapped in `{ "success": true, "data": { ... } }`
//! - a flat object with the field keys at the top level
//!
//! Errors come back as `{ "detail": ... }` or `{ "error": ... }`.

use crate::error::SubmitError;
use crate::messages;
use crate::models::ocr_result::{value_to_string, OcrFields, OcrResult, FIELD_KEYS};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Media keys and the aliases older servers use
const AVATAR_KEYS: &[&str] = &["avatar_base64", "photo"];
const FRONT_CROP_KEYS: &[&str] = &["cropped_card_base64", "card_crop_front"];
const BACK_CROP_KEYS: &[&str] = &["cropped_card_back_base64", "card_crop_back"];

/// Interpret a parsed response body
///
/// `ok` is whether the HTTP status was 2xx.
pub fn interpret(ok: bool, body: Value) -> Result<OcrResult, SubmitError> {
    let payload = unwrap_envelope(body);

    if !ok {
        return Err(SubmitError::Server(error_message(&payload)));
    }

    let Value::Object(map) = payload else {
        return Err(SubmitError::NoData);
    };

    let fields = match map.get("fields") {
        Some(fields @ Value::Object(_)) => parse_fields(fields)?,
        _ if has_flat_fields(&map) => parse_fields(&Value::Object(map.clone()))?,
        _ => return Err(SubmitError::NoData),
    };

    Ok(OcrResult {
        fields,
        warnings: warnings(&map),
        avatar_image: media(&map, AVATAR_KEYS),
        front_cropped_image: media(&map, FRONT_CROP_KEYS),
        back_cropped_image: media(&map, BACK_CROP_KEYS),
        raw_front_text: media(&map, &["ocr_raw_front"]),
        raw_back_text: media(&map, &["ocr_raw_back"]),
    })
}

/// Error text for a non-2xx response
pub fn error_message(payload: &Value) -> String {
    ["detail", "error"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| messages::OCR_FAILED.to_string())
}

/// Use `data` as the payload when it holds an object
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn has_flat_fields(map: &Map<String, Value>) -> bool {
    FIELD_KEYS
        .iter()
        .any(|key| map.get(*key).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_fields(value: &Value) -> Result<OcrFields, SubmitError> {
    OcrFields::deserialize(value)
        .map_err(|e| SubmitError::unexpected(format!("Failed to parse fields: {}", e)))
}

fn warnings(map: &Map<String, Value>) -> Vec<String> {
    match map.get("warnings") {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_string)
            .filter(|w| !w.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// First non-empty string under any of `keys`
fn media(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_response() {
        let result = interpret(
            true,
            json!({
                "fields": {
                    "tckn": "10000000146",
                    "ad": "AYŞE",
                    "soyad": "YILMAZ",
                    "ana_adi": "FATMA",
                    "baba_adi": "MEHMET",
                    "dogum_tarihi": "01.02.1990",
                    "cinsiyet": "K"
                },
                "warnings": ["Arka yüz bulanık"],
                "avatar_base64": "data:image/png;base64,AAAA",
                "cropped_card_base64": "data:image/png;base64,BBBB",
                "ocr_raw_front": "TÜRKİYE CUMHURİYETİ"
            }),
        )
        .unwrap();

        assert_eq!(result.fields.national_id, "10000000146");
        assert_eq!(result.fields.given_name, "AYŞE");
        assert_eq!(result.fields.gender, "K");
        assert_eq!(result.warnings, vec!["Arka yüz bulanık"]);
        assert_eq!(result.avatar_image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(result.front_cropped_image.as_deref(), Some("data:image/png;base64,BBBB"));
        assert!(result.back_cropped_image.is_none());
        assert_eq!(result.raw_front_text.as_deref(), Some("TÜRKİYE CUMHURİYETİ"));
    }

    #[test]
    fn test_flat_response() {
        let result = interpret(true, json!({ "tckn": "123", "ad": "Ali" })).unwrap();

        assert_eq!(result.fields.national_id, "123");
        assert_eq!(result.fields.given_name, "Ali");
        assert_eq!(result.fields.surname, "");
        assert_eq!(result.fields.mother_name, "");
        assert_eq!(result.fields.father_name, "");
        assert_eq!(result.fields.birth_date, "");
        assert!(result.warnings.is_empty());
        assert!(result.avatar_image.is_none());
    }

    #[test]
    fn test_data_envelope() {
        let result = interpret(
            true,
            json!({
                "success": true,
                "data": {
                    "fields": { "ad": "Ali", "soyad": "Kaya" },
                    "cropped_card_back_base64": "data:image/png;base64,CCCC"
                }
            }),
        )
        .unwrap();

        assert_eq!(result.fields.surname, "Kaya");
        assert_eq!(result.back_cropped_image.as_deref(), Some("data:image/png;base64,CCCC"));
    }

    #[test]
    fn test_non_object_data_is_not_unwrapped() {
        let result = interpret(true, json!({ "data": "ignored", "ad": "Ali" })).unwrap();
        assert_eq!(result.fields.given_name, "Ali");
    }

    #[test]
    fn test_media_aliases() {
        let result = interpret(
            true,
            json!({
                "fields": { "ad": "Ali" },
                "photo": "data:image/jpeg;base64,AAAA",
                "card_crop_front": "data:image/jpeg;base64,BBBB",
                "card_crop_back": "",
                "cropped_card_back_base64": ""
            }),
        )
        .unwrap();

        assert_eq!(result.avatar_image.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(result.front_cropped_image.as_deref(), Some("data:image/jpeg;base64,BBBB"));
        assert!(result.back_cropped_image.is_none(), "empty strings are absent");
    }

    #[test]
    fn test_no_fields_is_no_data() {
        assert_eq!(interpret(true, json!({})), Err(SubmitError::NoData));
        assert_eq!(
            interpret(true, json!({ "success": false, "ad": "", "tckn": null })),
            Err(SubmitError::NoData)
        );
        assert_eq!(interpret(true, json!("ok")), Err(SubmitError::NoData));
        assert_eq!(interpret(true, json!({ "fields": "x" })), Err(SubmitError::NoData));
    }

    #[test]
    fn test_empty_fields_object_is_accepted() {
        let result = interpret(true, json!({ "fields": {} })).unwrap();
        assert_eq!(result.fields, OcrFields::default());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            interpret(false, json!({ "detail": "Görsel okunamadı" })),
            Err(SubmitError::Server("Görsel okunamadı".to_string()))
        );
        assert_eq!(
            interpret(false, json!({ "error": "Sunucu hatası" })),
            Err(SubmitError::Server("Sunucu hatası".to_string()))
        );
        assert_eq!(
            interpret(false, json!({ "detail": "first", "error": "second" })),
            Err(SubmitError::Server("first".to_string()))
        );
    }

    #[test]
    fn test_error_detail_inside_envelope() {
        assert_eq!(
            interpret(false, json!({ "data": { "detail": "wrapped" } })),
            Err(SubmitError::Server("wrapped".to_string()))
        );
    }

    #[test]
    fn test_structured_error_detail_is_rendered() {
        let err = interpret(false, json!({ "detail": [{ "loc": ["front"], "msg": "required" }] }))
            .unwrap_err();
        let SubmitError::Server(message) = err else {
            panic!("expected server error");
        };
        assert!(message.contains("required"));
    }

    #[test]
    fn test_error_without_message() {
        assert_eq!(
            interpret(false, json!({})),
            Err(SubmitError::Server(messages::OCR_FAILED.to_string()))
        );
        assert_eq!(
            interpret(false, json!({ "detail": "", "error": null })),
            Err(SubmitError::Server(messages::OCR_FAILED.to_string()))
        );
        assert_eq!(
            interpret(false, Value::Null),
            Err(SubmitError::Server(messages::OCR_FAILED.to_string()))
        );
    }

    #[test]
    fn test_warnings_shapes() {
        let result = interpret(
            true,
            json!({ "ad": "Ali", "warnings": ["a", "", 3] }),
        )
        .unwrap();
        assert_eq!(result.warnings, vec!["a", "3"]);

        let result = interpret(true, json!({ "ad": "Ali", "warnings": "tek uyarı" })).unwrap();
        assert_eq!(result.warnings, vec!["tek uyarı"]);
    }
}
