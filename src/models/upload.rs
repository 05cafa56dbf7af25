use serde::{Deserialize, Serialize};

/// Upload progress shown while a submission is in flight
///
/// `progress` is simulated (a timer, not bytes sent). It only reaches 100
/// once the server has answered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadState {
    pub loading: bool,
    pub progress: u8,
    pub error: Option<String>,
}

impl UploadState {
    /// State at the start of a submission
    pub fn started(progress: u8) -> Self {
        Self {
            loading: true,
            progress,
            error: None,
        }
    }

    /// Advance by `step`, never past `cap`
    pub fn tick(&mut self, step: u8, cap: u8) -> bool {
        if self.progress >= cap {
            return false;
        }
        self.progress = self.progress.saturating_add(step).min(cap);
        true
    }
}
