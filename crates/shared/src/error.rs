use thiserror::Error;

/// Shown for every failed submission, whatever the cause.
pub const CLASSIFICATION_FAILED: &str = "Error in classification.";

/// Shown when submit is requested without a selected file.
pub const NO_IMAGE_SELECTED: &str = "Please select an image to classify!";

/// Diagnostic cause of a failed classification request.
///
/// The detail is meant for logs; the form only ever shows
/// [`CLASSIFICATION_FAILED`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("classification endpoint returned status {0}")]
    Status(u16),
    #[error("classification request failed: {0}")]
    Transport(String),
    #[error("malformed classification response: {0}")]
    Decode(String),
    #[error("classification response carried unknown class index {0}")]
    UnknownClass(i64),
}

impl ClassifyError {
    pub fn user_message(&self) -> &'static str {
        CLASSIFICATION_FAILED
    }
}
