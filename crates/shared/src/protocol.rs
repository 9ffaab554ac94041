use serde::{Deserialize, Serialize};

use crate::{domain::ImageClass, error::ClassifyError};

/// Path of the classification endpoint, relative to the configured base URL.
pub const CLASSIFY_PATH: &str = "/classify-image";

/// Name of the single multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Success body of `POST /classify-image`.
///
/// `class` is a zero-based index into [`ImageClass::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub class: i64,
}

impl ClassifyResponse {
    pub fn from_json(body: &[u8]) -> Result<Self, ClassifyError> {
        serde_json::from_slice(body).map_err(|e| ClassifyError::Decode(e.to_string()))
    }

    pub fn resolve(&self) -> Result<ImageClass, ClassifyError> {
        ImageClass::from_index(self.class).ok_or(ClassifyError::UnknownClass(self.class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_index_contract() {
        let response = ClassifyResponse::from_json(br#"{"class": 3}"#).expect("decode");
        assert_eq!(response.resolve(), Ok(ImageClass::Cat));
    }

    #[test]
    fn ignores_extra_fields() {
        let response =
            ClassifyResponse::from_json(br#"{"class": 1, "confidence": 0.93}"#).expect("decode");
        assert_eq!(response.resolve(), Ok(ImageClass::Automobile));
    }

    #[test]
    fn rejects_label_strings() {
        let err = ClassifyResponse::from_json(br#"{"class": "cat"}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn rejects_non_json_body() {
        let err = ClassifyResponse::from_json(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let response = ClassifyResponse { class: 42 };
        assert_eq!(response.resolve(), Err(ClassifyError::UnknownClass(42)));
    }
}
