//! Outbound classification requests.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::ImageClass,
    error::ClassifyError,
    protocol::{ClassifyResponse, CLASSIFY_PATH, IMAGE_FIELD},
};
use url::Url;

use crate::types::SelectedImage;

#[async_trait]
pub trait ClassifierTransport: Send + Sync {
    async fn classify(&self, image: &SelectedImage) -> Result<ImageClass, ClassifyError>;
}

/// Builds `<base_url>/classify-image`, keeping any path prefix on the base.
pub fn classify_endpoint(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let mut base =
        Url::parse(trimmed).with_context(|| format!("invalid classifier base url '{trimmed}'"))?;
    if base.cannot_be_a_base() {
        return Err(anyhow!("classifier base url '{trimmed}' cannot carry a path"));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base.join(CLASSIFY_PATH.trim_start_matches('/'))
        .with_context(|| format!("failed to join classify path onto '{trimmed}'"))
}

pub struct HttpClassifier {
    http: Client,
    endpoint: Url,
}

impl HttpClassifier {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_client(Client::new(), classify_endpoint(base_url)?))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn transport_error(err: reqwest::Error) -> ClassifyError {
    ClassifyError::Transport(err.to_string())
}

#[async_trait]
impl ClassifierTransport for HttpClassifier {
    async fn classify(&self, image: &SelectedImage) -> Result<ImageClass, ClassifyError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(transport_error)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        ClassifyResponse::from_json(&body)?.resolve()
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
