//! Card images waiting to be submitted, and the last result.

use crate::models::capture::{CapturedPair, CardSide};
use crate::models::ocr_result::OcrResult;
use crate::services::images::{CameraImages, CardImageSource, PickedFiles};
use crate::services::result_view::{ResultSnapshot, ResultView};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which capture path to submit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum SubmitSource {
    Camera,
    Files,
}

#[derive(Default)]
pub struct PendingInputs {
    captured: Option<CapturedPair>,
    front_file: Option<PathBuf>,
    back_file: Option<PathBuf>,
    result: Option<ResultView>,
}

impl PendingInputs {
    pub fn set_captured(&mut self, pair: Option<CapturedPair>) {
        self.captured = pair;
    }

    pub fn set_file(&mut self, side: CardSide, path: Option<PathBuf>) {
        tracing::debug!(side = side.as_str(), set = path.is_some(), "Card file updated");
        match side {
            CardSide::Front => self.front_file = path,
            CardSide::Back => self.back_file = path,
        }
    }

    /// Images for a new submission. The previous result is dropped so a
    /// failed submission never leaves the last card on screen.
    pub fn begin_submission(&mut self, source: SubmitSource) -> Box<dyn CardImageSource> {
        self.result = None;
        match source {
            SubmitSource::Camera => Box::new(
                self.captured
                    .clone()
                    .map(CameraImages::from)
                    .unwrap_or_default(),
            ),
            SubmitSource::Files => Box::new(PickedFiles::new(
                self.front_file.clone(),
                self.back_file.clone(),
            )),
        }
    }

    pub fn store_result(&mut self, result: OcrResult) -> ResultSnapshot {
        let view = ResultView::new(result);
        let snapshot = view.snapshot();
        self.result = Some(view);
        snapshot
    }

    pub fn result_view(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn result_view_mut(&mut self) -> Option<&mut ResultView> {
        self.result.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::capture::ImagePayload;

    fn pair() -> CapturedPair {
        CapturedPair {
            front: ImagePayload::png(vec![1], CardSide::Front),
            back: ImagePayload::png(vec![2], CardSide::Back),
        }
    }

    fn result_with_crop() -> OcrResult {
        OcrResult {
            front_cropped_image: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_begin_submission_drops_previous_result() {
        let mut inputs = PendingInputs::default();
        inputs.set_captured(Some(pair()));

        let snapshot = inputs.store_result(result_with_crop());
        assert!(snapshot.can_export);
        assert!(inputs.result_view().is_some());

        let source = inputs.begin_submission(SubmitSource::Camera);
        assert!(source.is_complete());
        assert!(inputs.result_view().is_none(), "stale result cleared");
    }

    #[test]
    fn test_file_source_follows_picked_paths() {
        let mut inputs = PendingInputs::default();
        inputs.set_file(CardSide::Front, Some(PathBuf::from("front.png")));

        assert!(!inputs.begin_submission(SubmitSource::Files).is_complete());

        inputs.set_file(CardSide::Back, Some(PathBuf::from("back.png")));
        let source = inputs.begin_submission(SubmitSource::Files);
        assert!(source.is_complete());
        assert!(!inputs.begin_submission(SubmitSource::Camera).is_complete());
    }

    #[test]
    fn test_toggle_through_stored_view() {
        let mut inputs = PendingInputs::default();
        assert!(inputs.result_view_mut().is_none());

        inputs.store_result(result_with_crop());
        let view = inputs.result_view_mut().unwrap();
        view.toggle();
        assert_eq!(view.snapshot().mode, crate::services::result_view::ViewMode::CroppedImages);
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_string(&SubmitSource::Camera).unwrap(), "\"camera\"");
        assert_eq!(
            serde_json::from_str::<SubmitSource>("\"files\"").unwrap(),
            SubmitSource::Files
        );
    }
}
