//! Submission pipeline: one request, one status dispatch, then side effects.
//!
//! The steps run strictly in order: send, classify, success hook, notify,
//! wait for acknowledgement, navigate. Nothing user-visible happens before
//! the request settles.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::effects::{Effects, Notice, View};
use crate::api::{ApiResponse, Endpoint, Transport};
use crate::errors::ClientError;

/// Status-code dispatch table for one form.
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    pub success: Notice,
    pub follow_up: Option<View>,
    /// Only forms that authenticate map 401 to its own notice.
    pub unauthorized: Option<Notice>,
    pub failure: Notice,
}

impl ResponsePolicy {
    pub fn new(success: Notice) -> Self {
        Self {
            success,
            follow_up: None,
            unauthorized: None,
            failure: Notice::generic_failure(),
        }
    }

    pub fn then_navigate(mut self, view: View) -> Self {
        self.follow_up = Some(view);
        self
    }

    pub fn on_unauthorized(mut self, notice: Notice) -> Self {
        self.unauthorized = Some(notice);
        self
    }

    pub fn on_failure(mut self, notice: Notice) -> Self {
        self.failure = notice;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Status(u16),
    Transport(String),
    /// The request succeeded but its body could not be used.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    Unauthorized,
    Failed(FailureReason),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded)
    }
}

/// What the pipeline did, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcome: SubmissionOutcome,
    pub notice: Notice,
    pub navigated_to: Option<View>,
}

#[derive(Debug, Clone)]
pub struct SubmissionPipeline {
    endpoint: Endpoint,
    policy: ResponsePolicy,
}

impl SubmissionPipeline {
    pub fn new(endpoint: Endpoint, policy: ResponsePolicy) -> Self {
        Self { endpoint, policy }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn policy(&self) -> &ResponsePolicy {
        &self.policy
    }

    /// Runs the pipeline without a success hook.
    pub fn run<T: Transport + ?Sized>(
        &self,
        transport: &T,
        body: Value,
        effects: &mut Effects<'_>,
    ) -> PipelineReport {
        self.run_with(transport, body, effects, |_| Ok(()))
    }

    /// Runs the pipeline; `on_success` sees the 200 response before any
    /// notice is shown. A hook error turns the outcome into a failure.
    pub fn run_with<T, F>(
        &self,
        transport: &T,
        body: Value,
        effects: &mut Effects<'_>,
        on_success: F,
    ) -> PipelineReport
    where
        T: Transport + ?Sized,
        F: FnOnce(&ApiResponse) -> Result<(), ClientError>,
    {
        let outcome = match self.send(transport, body) {
            Ok(response) => self.classify(response, on_success),
            Err(reason) => SubmissionOutcome::Failed(reason),
        };
        self.settle(outcome, effects)
    }

    fn send<T: Transport + ?Sized>(
        &self,
        transport: &T,
        body: Value,
    ) -> Result<ApiResponse, FailureReason> {
        let request = self.endpoint.request().with_json(body);
        debug!(method = %self.endpoint.method, path = %self.endpoint.path, "submitting form");
        transport.send(&request).map_err(|err| {
            error!(path = %self.endpoint.path, error = %err, "submission transport failure");
            FailureReason::Transport(err.message)
        })
    }

    fn classify<F>(&self, response: ApiResponse, on_success: F) -> SubmissionOutcome
    where
        F: FnOnce(&ApiResponse) -> Result<(), ClientError>,
    {
        info!(path = %self.endpoint.path, status = response.status, "submission settled");
        match response.status {
            200 => match on_success(&response) {
                Ok(()) => SubmissionOutcome::Succeeded,
                Err(err) => {
                    error!(path = %self.endpoint.path, error = %err, "success handler failed");
                    SubmissionOutcome::Failed(FailureReason::Rejected(err.to_string()))
                }
            },
            401 if self.policy.unauthorized.is_some() => SubmissionOutcome::Unauthorized,
            status => {
                warn!(path = %self.endpoint.path, status, "submission rejected by server");
                SubmissionOutcome::Failed(FailureReason::Status(status))
            }
        }
    }

    fn settle(&self, outcome: SubmissionOutcome, effects: &mut Effects<'_>) -> PipelineReport {
        let notice = match &outcome {
            SubmissionOutcome::Succeeded => self.policy.success.clone(),
            SubmissionOutcome::Unauthorized => self
                .policy
                .unauthorized
                .clone()
                .unwrap_or_else(|| self.policy.failure.clone()),
            SubmissionOutcome::Failed(_) => self.policy.failure.clone(),
        };

        let acknowledgement = effects.notifier.notify(&notice);
        debug!(?acknowledgement, "notice acknowledged");

        let navigated_to = match (&outcome, &self.policy.follow_up) {
            (SubmissionOutcome::Succeeded, Some(view)) => {
                effects.navigator.navigate(view.clone());
                Some(view.clone())
            }
            _ => None,
        };

        PipelineReport {
            outcome,
            notice,
            navigated_to,
        }
    }
}
