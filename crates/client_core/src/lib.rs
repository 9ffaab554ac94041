//! Client side of the image classifier: the form state machine, its driver,
//! and the HTTP transport to the classification endpoint.

pub mod controller;
pub mod form;
pub mod transport;
pub mod types;

pub use controller::FormController;
pub use form::{
    Effect, FormEvent, FormPhase, FormState, PendingSubmission, SubmissionTicket, Transition,
};
pub use transport::{classify_endpoint, ClassifierTransport, HttpClassifier};
pub use types::{AdvisoryNote, SelectedImage, ADVISORY_MAX_IMAGE_BYTES};
