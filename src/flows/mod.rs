//! The concrete marketplace forms and the product catalog.

pub mod catalog;
pub mod login;
pub mod product;
pub mod signup;

pub use catalog::{Catalog, DeletionReport, StepOutcome};
pub use login::LoginForm;
pub use product::AddProductForm;
pub use signup::{SignupForm, SignupKind, SignupResult};

use crate::api::Transport;
use crate::errors::ClientError;
use crate::forms::{
    upload_file, FormController, Notice, NoticeLevel, Notifier, SelectedFile, UploadError,
    UploadOutcome,
};

/// Runs the upload sub-flow for `field` and notifies the user when it fails.
pub(crate) fn upload_into<T: Transport + ?Sized>(
    controller: &mut FormController,
    field: &str,
    transport: &T,
    file: SelectedFile,
    notifier: &mut dyn Notifier,
) -> Result<UploadOutcome, ClientError> {
    let outcome = controller.upload(field, || upload_file(transport, file))?;
    match &outcome {
        UploadOutcome::Failed(err) => notify_upload_failure(notifier, err),
        UploadOutcome::Rejected(busy) => {
            notifier.notify(
                &Notice::toast(NoticeLevel::Info, "Please wait").with_text(busy.to_string()),
            );
        }
        UploadOutcome::Stored(_) => {}
    }
    Ok(outcome)
}

/// Error toast shared by failed transfers and files that could not be read.
pub(crate) fn notify_upload_failure(notifier: &mut dyn Notifier, err: &UploadError) {
    notifier.notify(
        &Notice::toast(NoticeLevel::Error, "File upload failed").with_text(err.to_string()),
    );
}
