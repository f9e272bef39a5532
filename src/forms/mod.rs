//! Form framework shared by every marketplace form.
//!
//! A form instance is a [`FormController`] built from a [`FormSchema`]. The
//! controller validates on every change and gates submission and upload;
//! the [`SubmissionPipeline`] turns a submission into one request and the
//! side effects that follow it.

pub mod controller;
pub mod effects;
pub mod pipeline;
pub mod schema;
pub mod state;
pub mod upload;
pub mod validator;
pub mod values;

pub use controller::{FieldStatus, FormController, SubmitOutcome, SubmitRejection, UploadOutcome};
pub use effects::{Acknowledgement, Effects, Navigator, Notice, NoticeLevel, NoticeStyle, Notifier, View};
pub use pipeline::{
    FailureReason, PipelineReport, ResponsePolicy, SubmissionOutcome, SubmissionPipeline,
};
pub use schema::{FieldDescriptor, FieldErrors, FieldKind, FormSchema};
pub use state::{Activity, Busy, FormPhase};
pub use upload::{upload_file, SelectedFile, UploadError};
pub use validator::{Rule, ValidationError};
pub use values::{FieldValue, FormValues};
