use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Field names the OCR server uses, in the order it sends them
pub const FIELD_KEYS: [&str; 7] = [
    "tckn",
    "ad",
    "soyad",
    "ana_adi",
    "baba_adi",
    "dogum_tarihi",
    "cinsiyet",
];

/// Fields read from an ID card
///
/// Every field defaults to the empty string so a normalized result always
/// carries the full set, whatever the server left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrFields {
    #[serde(rename = "tckn", default, deserialize_with = "lenient_string")]
    pub national_id: String,
    #[serde(rename = "ad", default, deserialize_with = "lenient_string")]
    pub given_name: String,
    #[serde(rename = "soyad", default, deserialize_with = "lenient_string")]
    pub surname: String,
    #[serde(rename = "ana_adi", default, deserialize_with = "lenient_string")]
    pub mother_name: String,
    #[serde(rename = "baba_adi", default, deserialize_with = "lenient_string")]
    pub father_name: String,
    #[serde(rename = "dogum_tarihi", default, deserialize_with = "lenient_string")]
    pub birth_date: String,
    /// Older server builds do not send gender at all
    #[serde(
        rename = "cinsiyet",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub gender: String,
}

impl OcrFields {
    /// Look a field up by its wire name
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "tckn" => &self.national_id,
            "ad" => &self.given_name,
            "soyad" => &self.surname,
            "ana_adi" => &self.mother_name,
            "baba_adi" => &self.father_name,
            "dogum_tarihi" => &self.birth_date,
            "cinsiyet" => &self.gender,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Canonical OCR result rendered by the window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrResult {
    pub fields: OcrFields,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Face crop as a `data:image/png;base64,...` URL
    #[serde(rename = "avatar_base64", default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
    #[serde(rename = "cropped_card_base64", default, skip_serializing_if = "Option::is_none")]
    pub front_cropped_image: Option<String>,
    #[serde(rename = "cropped_card_back_base64", default, skip_serializing_if = "Option::is_none")]
    pub back_cropped_image: Option<String>,
    /// Raw recognized text, kept for diagnostics
    #[serde(rename = "ocr_raw_front", default, skip_serializing_if = "Option::is_none")]
    pub raw_front_text: Option<String>,
    #[serde(rename = "ocr_raw_back", default, skip_serializing_if = "Option::is_none")]
    pub raw_back_text: Option<String>,
}

impl OcrResult {
    /// True when at least one cropped card image came back
    pub fn has_cropped_images(&self) -> bool {
        self.front_cropped_image.is_some() || self.back_cropped_image.is_some()
    }
}

/// Accept strings, numbers and booleans where a string is expected.
///
/// The server is not strict about types (an all-digit TCKN may arrive as a
/// number). Null and anything structured become the empty string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_missing_keys_default_to_empty() {
        let fields: OcrFields = serde_json::from_value(json!({ "ad": "Ali" })).unwrap();
        assert_eq!(fields.given_name, "Ali");
        assert_eq!(fields.national_id, "");
        assert_eq!(fields.gender, "");
    }

    #[test]
    fn test_fields_lenient_types() {
        let fields: OcrFields = serde_json::from_value(json!({
            "tckn": 10000000146u64,
            "ad": null,
            "soyad": ["x"],
        }))
        .unwrap();
        assert_eq!(fields.national_id, "10000000146");
        assert_eq!(fields.given_name, "");
        assert_eq!(fields.surname, "");
    }

    #[test]
    fn test_fields_get_by_wire_name() {
        let fields = OcrFields {
            national_id: "123".to_string(),
            birth_date: "01.02.1990".to_string(),
            ..Default::default()
        };
        assert_eq!(fields.get("tckn"), Some("123"));
        assert_eq!(fields.get("dogum_tarihi"), Some("01.02.1990"));
        assert_eq!(fields.get("cinsiyet"), Some(""));
        assert_eq!(fields.get("unknown"), None);
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let result = OcrResult {
            fields: OcrFields {
                given_name: "Ali".to_string(),
                ..Default::default()
            },
            front_cropped_image: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["fields"]["ad"], "Ali");
        assert_eq!(value["cropped_card_base64"], "data:image/png;base64,AAAA");
        assert!(value.get("avatar_base64").is_none());
        assert!(value["fields"].get("cinsiyet").is_none());
    }

    #[test]
    fn test_has_cropped_images() {
        let mut result = OcrResult::default();
        assert!(!result.has_cropped_images());

        result.back_cropped_image = Some("data:image/png;base64,AAAA".to_string());
        assert!(result.has_cropped_images());
    }
}
