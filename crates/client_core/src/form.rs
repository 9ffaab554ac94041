//! Classification form state machine.
//!
//! Every transition consumes the current [`FormState`] and returns the next
//! one together with the [`Effect`]s the presentation layer must carry out.
//! Nothing here touches the network or the terminal.

use shared::{
    domain::{ClassificationResult, ImageClass},
    error::{ClassifyError, NO_IMAGE_SELECTED},
};
use tracing::debug;

use crate::types::SelectedImage;

/// Identifies one submit so its completion can be matched to it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Ready,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FileSelected(SelectedImage),
    FileRemoved,
    SubmitRequested,
    SubmissionCompleted {
        ticket: SubmissionTicket,
        outcome: Result<ImageClass, ClassifyError>,
    },
}

/// An upload the driver has to perform on behalf of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub image: SelectedImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a blocking warning to the user.
    Warn(&'static str),
    /// Make the file picker forget its value so the same path can be picked again.
    ResetFileInput,
    Dispatch(PendingSubmission),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FormState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: FormState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    file: Option<SelectedImage>,
    result: ClassificationResult,
    awaiting: Option<SubmissionTicket>,
    tickets_issued: u64,
}

impl FormState {
    pub fn file(&self) -> Option<&SelectedImage> {
        self.file.as_ref()
    }

    pub fn result(&self) -> &ClassificationResult {
        &self.result
    }

    pub fn awaiting(&self) -> Option<SubmissionTicket> {
        self.awaiting
    }

    pub fn phase(&self) -> FormPhase {
        match (&self.file, &self.result) {
            (None, _) => FormPhase::Idle,
            (Some(_), ClassificationResult::Empty) => FormPhase::Ready,
            (Some(_), _) => FormPhase::Resolved,
        }
    }

    /// The remove action is only offered once something is selected.
    pub fn can_remove(&self) -> bool {
        self.file.is_some()
    }

    pub fn apply(self, event: FormEvent) -> Transition {
        match event {
            FormEvent::FileSelected(image) => self.select(image),
            FormEvent::FileRemoved => self.remove(),
            FormEvent::SubmitRequested => self.submit(),
            FormEvent::SubmissionCompleted { ticket, outcome } => self.complete(ticket, outcome),
        }
    }

    /// Replaces the selection wholesale. Any submit still in flight becomes stale.
    pub fn select(self, image: SelectedImage) -> Transition {
        Transition::quiet(Self {
            file: Some(image),
            result: ClassificationResult::Empty,
            awaiting: None,
            tickets_issued: self.tickets_issued,
        })
    }

    pub fn remove(self) -> Transition {
        Transition {
            state: Self {
                file: None,
                result: ClassificationResult::Empty,
                awaiting: None,
                tickets_issued: self.tickets_issued,
            },
            effects: vec![Effect::ResetFileInput],
        }
    }

    pub fn submit(self) -> Transition {
        let Some(image) = self.file.clone() else {
            return Transition {
                state: self,
                effects: vec![Effect::Warn(NO_IMAGE_SELECTED)],
            };
        };

        let ticket = SubmissionTicket(self.tickets_issued + 1);
        Transition {
            state: Self {
                awaiting: Some(ticket),
                tickets_issued: ticket.0,
                ..self
            },
            effects: vec![Effect::Dispatch(PendingSubmission { ticket, image })],
        }
    }

    /// Applies an outcome only if it answers the latest submit for the
    /// current selection.
    pub fn complete(
        self,
        ticket: SubmissionTicket,
        outcome: Result<ImageClass, ClassifyError>,
    ) -> Transition {
        if self.awaiting != Some(ticket) {
            debug!(
                ticket = ticket.0,
                awaiting = ?self.awaiting.map(|t| t.0),
                "discarding stale classification outcome"
            );
            return Transition::quiet(self);
        }

        let result = match outcome {
            Ok(class) => ClassificationResult::success(class),
            Err(error) => ClassificationResult::failure(&error),
        };
        Transition::quiet(Self {
            result,
            awaiting: None,
            ..self
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
