use crate::models::ocr_result::OcrResult;
use serde::{Deserialize, Serialize};

/// Shown for an empty field
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Display order and bilingual labels of the field rows
const FIELD_LABELS: [(&str, &str); 7] = [
    ("ad", "Ad / Name"),
    ("soyad", "Soyad / Surname"),
    ("ana_adi", "Ana Adı / Mother's Name"),
    ("baba_adi", "Baba Adı / Father's Name"),
    ("tckn", "TCKN"),
    ("dogum_tarihi", "Doğum Tarihi / Date of Birth"),
    ("cinsiyet", "Cinsiyet / Gender"),
];

/// What the result panel shows
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Field table with the avatar
    #[default]
    Fields,
    /// Cropped card images
    CroppedImages,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Fields => Self::CroppedImages,
            Self::CroppedImages => Self::Fields,
        }
    }
}

/// One row of the field table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// `value`, or the placeholder when empty
    pub display: String,
    pub suspect: bool,
}

/// A value is suspect when it is shorter than two characters
pub fn is_suspect(value: &str) -> bool {
    value.chars().count() < 2
}

/// Result panel state
#[derive(Debug, Clone, Default)]
pub struct ResultView {
    result: OcrResult,
    mode: ViewMode,
}

/// Everything the window needs to render the result panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultSnapshot {
    pub mode: ViewMode,
    pub rows: Vec<FieldRow>,
    pub warnings: Vec<String>,
    pub avatar_image: Option<String>,
    pub front_cropped_image: Option<String>,
    pub back_cropped_image: Option<String>,
    pub can_export: bool,
}

impl ResultView {
    pub fn new(result: OcrResult) -> Self {
        Self {
            result,
            mode: ViewMode::Fields,
        }
    }

    pub fn result(&self) -> &OcrResult {
        &self.result
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    pub fn rows(&self) -> Vec<FieldRow> {
        FIELD_LABELS
            .iter()
            .map(|&(key, label)| {
                let value = self.result.fields.get(key).unwrap_or_default().to_string();
                let display = if value.is_empty() {
                    EMPTY_PLACEHOLDER.to_string()
                } else {
                    value.clone()
                };
                FieldRow {
                    key,
                    label,
                    suspect: is_suspect(&value),
                    value,
                    display,
                }
            })
            .collect()
    }

    pub fn warnings(&self) -> &[String] {
        &self.result.warnings
    }

    pub fn can_export(&self) -> bool {
        self.result.has_cropped_images()
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot {
            mode: self.mode(),
            rows: self.rows(),
            warnings: self.warnings().to_vec(),
            avatar_image: self.result.avatar_image.clone(),
            front_cropped_image: self.result.front_cropped_image.clone(),
            back_cropped_image: self.result.back_cropped_image.clone(),
            can_export: self.can_export(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ocr_result::OcrFields;

    fn sample() -> OcrResult {
        OcrResult {
            fields: OcrFields {
                national_id: "10000000146".to_string(),
                given_name: "Ali".to_string(),
                surname: "Ö".to_string(),
                birth_date: "01.02.1990".to_string(),
                ..Default::default()
            },
            warnings: vec!["TCKN doğrulanamadı".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_suspect_values() {
        assert!(is_suspect(""));
        assert!(is_suspect("A"));
        assert!(is_suspect("Ş"));
        assert!(!is_suspect("Ali"));
        assert!(!is_suspect("Öz"));
    }

    #[test]
    fn test_rows_order_and_labels() {
        let view = ResultView::new(sample());
        let rows = view.rows();

        let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec!["ad", "soyad", "ana_adi", "baba_adi", "tckn", "dogum_tarihi", "cinsiyet"]
        );
        assert_eq!(rows[0].label, "Ad / Name");
        assert_eq!(rows[4].label, "TCKN");
        assert_eq!(rows[6].label, "Cinsiyet / Gender");
    }

    #[test]
    fn test_rows_placeholder_and_suspect() {
        let view = ResultView::new(sample());
        let rows = view.rows();

        let name = &rows[0];
        assert_eq!(name.display, "Ali");
        assert!(!name.suspect);

        let surname = &rows[1];
        assert_eq!(surname.display, "Ö");
        assert!(surname.suspect);

        let mother = &rows[2];
        assert_eq!(mother.value, "");
        assert_eq!(mother.display, EMPTY_PLACEHOLDER);
        assert!(mother.suspect);
    }

    #[test]
    fn test_toggle_view() {
        let mut view = ResultView::new(sample());
        assert_eq!(view.mode(), ViewMode::Fields);
        assert_eq!(view.toggle(), ViewMode::CroppedImages);
        assert_eq!(view.toggle(), ViewMode::Fields);
    }

    #[test]
    fn test_export_needs_a_cropped_image() {
        let mut result = sample();
        assert!(!ResultView::new(result.clone()).can_export());

        result.back_cropped_image = Some("data:image/png;base64,AAAA".to_string());
        assert!(ResultView::new(result.clone()).can_export());

        result.back_cropped_image = None;
        result.front_cropped_image = Some("data:image/png;base64,AAAA".to_string());
        assert!(ResultView::new(result).can_export());
    }

    #[test]
    fn test_snapshot_serialization() {
        let view = ResultView::new(sample());
        let value = serde_json::to_value(view.snapshot()).unwrap();

        assert_eq!(value["mode"], "fields");
        assert_eq!(value["warnings"][0], "TCKN doğrulanamadı");
        assert_eq!(value["rows"][0]["display"], "Ali");
        assert_eq!(value["can_export"], false);
    }
}
