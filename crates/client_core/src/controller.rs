//! Drives [`FormState`] transitions and performs the uploads they request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    form::{Effect, FormEvent, FormState, PendingSubmission, Transition},
    transport::ClassifierTransport,
    types::{AdvisoryNote, SelectedImage},
};

impl PendingSubmission {
    /// Performs the upload and turns its outcome into the completion event.
    pub async fn send(self, transport: Arc<dyn ClassifierTransport>) -> FormEvent {
        let PendingSubmission { ticket, image } = self;
        info!(
            ticket = ticket.0,
            file = image.file_name(),
            size_bytes = image.len(),
            "sending image for classification"
        );

        let outcome = transport.classify(&image).await;
        match &outcome {
            Ok(class) => info!(ticket = ticket.0, %class, "image classified"),
            Err(error) => warn!(ticket = ticket.0, %error, "classification failed"),
        }
        FormEvent::SubmissionCompleted { ticket, outcome }
    }
}

pub struct FormController {
    state: FormState,
    transport: Arc<dyn ClassifierTransport>,
}

impl FormController {
    pub fn new(transport: Arc<dyn ClassifierTransport>) -> Self {
        Self {
            state: FormState::default(),
            transport,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn transport(&self) -> Arc<dyn ClassifierTransport> {
        self.transport.clone()
    }

    /// Applies one event and hands back every effect, including dispatches,
    /// for the caller to run.
    pub fn handle(&mut self, event: FormEvent) -> Vec<Effect> {
        let Transition { state, effects } = std::mem::take(&mut self.state).apply(event);
        self.state = state;
        effects
    }

    pub fn select(&mut self, image: SelectedImage) -> Vec<Effect> {
        for note in image.advisory_notes() {
            match note {
                AdvisoryNote::NotAnImage => warn!(
                    file = image.file_name(),
                    mime_type = image.mime_type(),
                    "selected file does not look like an image"
                ),
                AdvisoryNote::OverSizeLimit => warn!(
                    file = image.file_name(),
                    size_bytes = image.len(),
                    "selected image is larger than the recommended 10 MB"
                ),
            }
        }
        self.handle(FormEvent::FileSelected(image))
    }

    pub fn remove(&mut self) -> Vec<Effect> {
        self.handle(FormEvent::FileRemoved)
    }

    /// Runs a whole submission in place: the upload is awaited and its
    /// completion applied before returning. Only non-dispatch effects are
    /// returned.
    pub async fn submit(&mut self) -> Vec<Effect> {
        let mut remaining = Vec::new();
        for effect in self.handle(FormEvent::SubmitRequested) {
            match effect {
                Effect::Dispatch(pending) => {
                    let completion = pending.send(self.transport.clone()).await;
                    remaining.extend(self.handle(completion));
                }
                other => remaining.push(other),
            }
        }
        remaining
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
