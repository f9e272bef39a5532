//! Form state controller.
//!
//! Holds the values, touched flags and validation result of one form
//! instance, and gates submission and upload through a single
//! [`FormMachine`]. The network work itself is passed in as a closure so the
//! controller stays independent of endpoints and side effects.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::schema::{FieldErrors, FormSchema};
use super::state::{Activity, Busy, FormMachine, FormPhase};
use super::upload::UploadError;
use super::validator::ValidationError;
use super::values::{FieldValue, FormValues};
use crate::errors::ClientError;

/// Touched flag and current error of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    pub touched: bool,
    pub error: Option<ValidationError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// Another submission or an upload is in flight; nothing was sent.
    Rejected(Busy),
    /// At least one field failed validation; nothing was sent.
    Invalid(FieldErrors),
    Completed(R),
}

impl<R> SubmitOutcome<R> {
    pub fn completed(self) -> Option<R> {
        match self {
            SubmitOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Why [`FormController::begin_submit`] refused to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    Busy(Busy),
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Rejected(Busy),
    Stored(String),
    Failed(UploadError),
}

#[derive(Debug, Clone)]
pub struct FormController {
    id: Uuid,
    schema: FormSchema,
    values: FormValues,
    touched: BTreeSet<&'static str>,
    errors: FieldErrors,
    machine: FormMachine,
}

impl FormController {
    pub fn new(schema: FormSchema) -> Self {
        let values = schema.defaults();
        let errors = schema.validate(&values);
        Self {
            id: Uuid::new_v4(),
            schema,
            values,
            touched: BTreeSet::new(),
            errors,
            machine: FormMachine::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.machine.phase()
    }

    /// The submit control is enabled only while nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.machine.is_idle()
    }

    /// Updates one field, marks it touched and revalidates the form.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ClientError> {
        let key = self
            .schema
            .field(name)
            .map(|field| field.key)
            .ok_or_else(|| ClientError::UnknownField(name.to_string()))?;
        self.values.set(key, value);
        self.touched.insert(key);
        self.revalidate();
        Ok(())
    }

    pub fn status(&self, name: &str) -> FieldStatus {
        FieldStatus {
            touched: self.touched.contains(name),
            error: self.errors.get(name).cloned(),
        }
    }

    /// Error to display next to the field: only once the field was touched.
    pub fn visible_error(&self, name: &str) -> Option<&ValidationError> {
        if self.touched.contains(name) {
            self.errors.get(name)
        } else {
            None
        }
    }

    pub fn touch_all(&mut self) {
        self.touched
            .extend(self.schema.fields.iter().map(|field| field.key));
    }

    /// Claims the form for a submission and validates it. On success the
    /// form is left in `Submitting` and the values to send are returned;
    /// the caller must follow up with [`FormController::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitRejection> {
        if let Err(busy) = self.machine.begin(Activity::Submit) {
            warn!(form = %self.id, phase = %busy.current, "submit ignored while busy");
            return Err(SubmitRejection::Busy(busy));
        }

        self.revalidate();
        if !self.errors.is_empty() {
            self.touch_all();
            self.machine.finish(FormPhase::Validating);
            debug!(form = %self.id, errors = self.errors.len(), "submit blocked by validation");
            return Err(SubmitRejection::Invalid(self.errors.clone()));
        }

        self.machine.validated();
        info!(form = %self.id, schema = self.schema.name, "submitting");
        Ok(self.values.clone())
    }

    /// Releases a form claimed by [`FormController::begin_submit`]. Does
    /// nothing while an upload holds the form.
    pub fn finish_submit(&mut self) {
        if !self.machine.finish(FormPhase::Submitting) {
            warn!(form = %self.id, phase = %self.machine.phase(), "finish_submit outside a submission");
        }
    }

    /// Guarded submission: rejected while busy, blocked while invalid,
    /// otherwise `run` receives the values and the form returns to `Idle`
    /// once it completes.
    pub fn submit<R, F>(&mut self, run: F) -> SubmitOutcome<R>
    where
        F: FnOnce(FormValues) -> R,
    {
        let values = match self.begin_submit() {
            Ok(values) => values,
            Err(SubmitRejection::Busy(busy)) => return SubmitOutcome::Rejected(busy),
            Err(SubmitRejection::Invalid(errors)) => return SubmitOutcome::Invalid(errors),
        };
        let result = run(values);
        self.finish_submit();
        SubmitOutcome::Completed(result)
    }

    /// Claims the form for an upload into `field`.
    pub fn begin_upload(&mut self, field: &str) -> Result<Result<(), Busy>, ClientError> {
        if self.schema.field(field).is_none() {
            return Err(ClientError::UnknownField(field.to_string()));
        }
        Ok(self.machine.begin(Activity::Upload).map_err(|busy| {
            warn!(form = %self.id, phase = %busy.current, "upload ignored while busy");
            busy
        }))
    }

    /// Stores the reference on success; leaves values unchanged on failure.
    /// A result arriving while no upload holds the form is rejected.
    pub fn finish_upload(
        &mut self,
        field: &str,
        result: Result<String, UploadError>,
    ) -> UploadOutcome {
        let current = self.machine.phase();
        if !self.machine.finish(FormPhase::Uploading) {
            warn!(form = %self.id, phase = %current, "upload result without an upload in flight");
            return UploadOutcome::Rejected(Busy {
                requested: Activity::Upload,
                current,
            });
        }
        match result {
            Ok(reference) => {
                if let Some(key) = self.schema.field(field).map(|descriptor| descriptor.key) {
                    self.values.set(key, reference.clone());
                    self.revalidate();
                }
                UploadOutcome::Stored(reference)
            }
            Err(err) => {
                warn!(form = %self.id, field, error = %err, "upload failed");
                UploadOutcome::Failed(err)
            }
        }
    }

    /// Guarded upload: `run` performs the transfer while the form is in
    /// `Uploading`.
    pub fn upload<F>(&mut self, field: &str, run: F) -> Result<UploadOutcome, ClientError>
    where
        F: FnOnce() -> Result<String, UploadError>,
    {
        if let Err(busy) = self.begin_upload(field)? {
            return Ok(UploadOutcome::Rejected(busy));
        }
        let result = run();
        Ok(self.finish_upload(field, result))
    }

    /// Back to defaults, nothing touched. Ignored while busy.
    pub fn reset(&mut self) {
        if !self.machine.is_idle() {
            return;
        }
        self.values = self.schema.defaults();
        self.touched.clear();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.errors = self.schema.validate(&self.values);
    }
}
