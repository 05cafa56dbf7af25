use super::{CameraDevice, Facing, VideoStream};
use crate::error::CameraError;
use crate::messages;
use crate::models::capture::{
    CaptureSnapshot, CaptureStep, CapturedPair, CardSide, ImagePayload,
};
use crate::utils::data_url;
use image::DynamicImage;
use std::sync::Arc;

/// Called once per completed session with both photos
pub type CaptureCallback = Box<dyn FnMut(CapturedPair) + Send>;

/// Front/back camera capture session
///
/// Owns the video stream exclusively. The stream is released on completion,
/// retake and when the session is dropped.
pub struct CaptureSession {
    device: Arc<dyn CameraDevice>,
    stream: Option<Box<dyn VideoStream>>,
    step: CaptureStep,
    front_image: Option<ImagePayload>,
    back_image: Option<ImagePayload>,
    error: Option<String>,
    // Completion already reported for this session
    completed: bool,
    on_capture: Option<CaptureCallback>,
}

impl CaptureSession {
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self {
            device,
            stream: None,
            step: CaptureStep::Front,
            front_image: None,
            back_image: None,
            error: None,
            completed: false,
            on_capture: None,
        }
    }

    /// Register the completion callback
    pub fn on_capture(mut self, callback: impl FnMut(CapturedPair) + Send + 'static) -> Self {
        self.on_capture = Some(Box::new(callback));
        self
    }

    pub fn step(&self) -> CaptureStep {
        self.step
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn image(&self, side: CardSide) -> Option<&ImagePayload> {
        match side {
            CardSide::Front => self.front_image.as_ref(),
            CardSide::Back => self.back_image.as_ref(),
        }
    }

    /// Request the rear camera. No-op while already streaming.
    pub async fn start_camera(&mut self) -> Result<(), CameraError> {
        self.error = None;
        if self.stream.is_some() {
            return Ok(());
        }

        match self.device.open_stream(Facing::Environment).await {
            Ok(stream) => {
                tracing::info!(tracks = stream.track_count(), "Camera stream started");
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Camera unavailable");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Snapshot the current frame into the current step's slot and advance.
    ///
    /// Returns the new step. Does nothing once both sides are taken.
    pub fn capture(&mut self) -> Result<CaptureStep, CameraError> {
        let Some(side) = self.step.side() else {
            return Ok(self.step);
        };

        let payload = match self.snapshot_frame(side) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, step = ?self.step, "Capture failed");
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        let next = self.step.next().ok_or(CameraError::InvalidTransition {
            from: self.step,
            to: self.step,
        })?;
        self.transition(next)?;

        tracing::debug!(side = side.as_str(), bytes = payload.len(), "Card side captured");
        match side {
            CardSide::Front => self.front_image = Some(payload),
            CardSide::Back => self.back_image = Some(payload),
        }
        self.error = None;

        if self.step == CaptureStep::Done {
            self.stop_camera();
            self.notify_complete();
        }

        Ok(self.step)
    }

    /// Release every active track. Safe to call without a stream.
    pub fn stop_camera(&mut self) -> usize {
        match self.stream.take() {
            Some(mut stream) => {
                let stopped = stream.stop_tracks();
                tracing::info!(tracks = stopped, "Camera stream released");
                stopped
            }
            None => 0,
        }
    }

    /// Drop both photos and start over from the front side
    pub async fn retake(&mut self) -> Result<(), CameraError> {
        self.stop_camera();
        self.front_image = None;
        self.back_image = None;
        self.error = None;
        self.step = CaptureStep::Front;
        self.completed = false;
        tracing::debug!("Capture session reset");

        self.start_camera().await
    }

    /// State for the window
    pub fn snapshot(&self) -> CaptureSnapshot {
        let done = self.step == CaptureStep::Done;
        let preview = |image: &Option<ImagePayload>| {
            image
                .as_ref()
                .filter(|_| done)
                .map(|p| data_url::encode(&p.mime, &p.bytes))
        };

        CaptureSnapshot {
            step: self.step,
            streaming: self.is_streaming(),
            error: self.error.clone(),
            has_front: self.front_image.is_some(),
            has_back: self.back_image.is_some(),
            prompt: match self.step {
                CaptureStep::Front => Some(messages::PROMPT_FRONT),
                CaptureStep::Back => Some(messages::PROMPT_BACK),
                CaptureStep::Done => None,
            },
            front_preview: preview(&self.front_image),
            back_preview: preview(&self.back_image),
        }
    }

    fn snapshot_frame(&self, side: CardSide) -> Result<ImagePayload, CameraError> {
        let stream = self.stream.as_ref().ok_or(CameraError::NotReady)?;

        let (width, height) = stream.frame_size();
        if width == 0 || height == 0 {
            return Err(CameraError::NotReady);
        }

        let frame = stream.grab_frame()?;
        Ok(ImagePayload::png(encode_png(&frame)?, side))
    }

    fn transition(&mut self, to: CaptureStep) -> Result<(), CameraError> {
        if !self.step.can_transition(to) {
            return Err(CameraError::InvalidTransition {
                from: self.step,
                to,
            });
        }
        self.step = to;
        Ok(())
    }

    fn notify_complete(&mut self) {
        if self.completed {
            return;
        }
        let (Some(front), Some(back)) = (&self.front_image, &self.back_image) else {
            return;
        };

        self.completed = true;
        let pair = CapturedPair {
            front: front.clone(),
            back: back.clone(),
        };
        if let Some(callback) = self.on_capture.as_mut() {
            callback(pair);
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop_camera();
    }
}

fn encode_png(frame: &DynamicImage) -> Result<Vec<u8>, CameraError> {
    let mut buf = Vec::new();
    frame
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CameraError::Frame(format!("Failed to encode image: {}", e)))?;
    Ok(buf)
}
