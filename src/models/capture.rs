use serde::{Deserialize, Serialize};

/// Which face of the card an image shows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

impl CardSide {
    /// Multipart part name and default file stem
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Step of a camera capture session
///
/// `Front -> Back -> Done`. Going back to `Front` is only possible through
/// a retake, which resets the whole session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStep {
    Front,
    Back,
    Done,
}

/// Allowed forward transitions
const TRANSITIONS: &[(CaptureStep, CaptureStep)] = &[
    (CaptureStep::Front, CaptureStep::Back),
    (CaptureStep::Back, CaptureStep::Done),
];

impl CaptureStep {
    /// Check the transition table
    pub fn can_transition(self, to: CaptureStep) -> bool {
        TRANSITIONS.iter().any(|&(from, next)| from == self && next == to)
    }

    /// The step a successful capture moves to, `None` once done
    pub fn next(self) -> Option<CaptureStep> {
        TRANSITIONS
            .iter()
            .find(|&&(from, _)| from == self)
            .map(|&(_, next)| next)
    }

    /// Card side captured in this step
    pub fn side(self) -> Option<CardSide> {
        match self {
            Self::Front => Some(CardSide::Front),
            Self::Back => Some(CardSide::Back),
            Self::Done => None,
        }
    }
}

/// Encoded image ready to be sent to the OCR server
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
            file_name: file_name.into(),
        }
    }

    /// PNG payload named after the card side (`front.png`, `back.png`)
    pub fn png(bytes: Vec<u8>, side: CardSide) -> Self {
        Self::new(bytes, "image/png", format!("{}.png", side.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Both sides taken by the camera, handed over when a session completes
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPair {
    pub front: ImagePayload,
    pub back: ImagePayload,
}

/// Camera state as the window sees it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptureSnapshot {
    pub step: CaptureStep,
    pub streaming: bool,
    pub error: Option<String>,
    pub has_front: bool,
    pub has_back: bool,
    /// Instruction over the preview, absent once both sides are taken
    pub prompt: Option<&'static str>,
    /// Thumbnails of the taken photos, only sent once the session is done
    pub front_preview: Option<String>,
    pub back_preview: Option<String>,
}
