//! User and admin signup forms.

use tracing::warn;

use super::upload_into;
use crate::api::{Endpoint, Transport};
use crate::config::{AdminVerification, Config};
use crate::errors::ClientError;
use crate::forms::{
    Effects, FieldDescriptor, FieldKind, FieldValue, FormController, FormSchema, Notice,
    Notifier, PipelineReport, ResponsePolicy, Rule, SelectedFile, SubmissionPipeline,
    SubmitOutcome, UploadOutcome, View,
};

pub const AVATAR_FIELD: &str = "avatar";
pub const ADMIN_CODE_FIELD: &str = "admincode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupKind {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupResult {
    Submitted(PipelineReport),
    /// Local admin-code check failed; no request was sent.
    AdminCodeRejected,
}

pub fn signup_schema(kind: SignupKind) -> FormSchema {
    let mut fields = Vec::new();
    if kind == SignupKind::Admin {
        fields.push(
            FieldDescriptor::new(ADMIN_CODE_FIELD, "Admin Code", FieldKind::Password)
                .rule(Rule::required("Admin Code Required")),
        );
    }
    fields.extend([
        FieldDescriptor::new("name", "Name", FieldKind::Text)
            .rule(Rule::required("Name is Required"))
            .rule(Rule::min_length(4, "Min. 4 characters req.")),
        FieldDescriptor::new("email", "Email", FieldKind::Email)
            .rule(Rule::required("Required"))
            .rule(Rule::email("Invalid email")),
        FieldDescriptor::new("password", "Password", FieldKind::Password)
            .rule(Rule::required("Password is required"))
            .rule(Rule::min_length(6, "Password must be at least 6 characters")),
        FieldDescriptor::new(AVATAR_FIELD, "Upload Profile Picture", FieldKind::File),
    ]);
    let name = match kind {
        SignupKind::User => "signup",
        SignupKind::Admin => "admin-signup",
    };
    FormSchema::new(name, fields)
}

pub struct SignupForm {
    kind: SignupKind,
    controller: FormController,
    pipeline: SubmissionPipeline,
    verification: AdminVerification,
    admin_code: Option<String>,
}

impl SignupForm {
    pub fn user() -> Self {
        Self::build(SignupKind::User, AdminVerification::Server, None)
    }

    pub fn admin(config: &Config) -> Self {
        Self::build(
            SignupKind::Admin,
            config.admin_verification,
            config.admin_code.clone(),
        )
    }

    fn build(
        kind: SignupKind,
        verification: AdminVerification,
        admin_code: Option<String>,
    ) -> Self {
        let policy = ResponsePolicy::new(
            Notice::success("Nice").with_text("You have signed up successfully"),
        )
        .then_navigate(View::Login);
        Self {
            kind,
            controller: FormController::new(signup_schema(kind)),
            pipeline: SubmissionPipeline::new(Endpoint::add_user(), policy),
            verification,
            admin_code,
        }
    }

    pub fn kind(&self) -> SignupKind {
        self.kind
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ClientError> {
        self.controller.set_field(name, value)
    }

    pub fn upload_avatar<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        file: SelectedFile,
        notifier: &mut dyn Notifier,
    ) -> Result<UploadOutcome, ClientError> {
        upload_into(&mut self.controller, AVATAR_FIELD, transport, file, notifier)
    }

    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        effects: &mut Effects<'_>,
    ) -> SubmitOutcome<SignupResult> {
        let kind = self.kind;
        let verification = self.verification;
        let expected_code = self.admin_code.clone();
        let pipeline = &self.pipeline;

        self.controller.submit(|mut values| {
            let is_admin = match (kind, verification) {
                (SignupKind::User, _) => false,
                (SignupKind::Admin, AdminVerification::Server) => true,
                (SignupKind::Admin, AdminVerification::Client) => {
                    let entered = values.text(ADMIN_CODE_FIELD);
                    if !admin_code_matches(expected_code.as_deref(), &entered) {
                        let notice = Notice::error("Oops!!").with_text("Admin Code is wrong");
                        effects.notifier.notify(&notice);
                        effects.navigator.navigate(View::AdminSignup);
                        return SignupResult::AdminCodeRejected;
                    }
                    values.remove(ADMIN_CODE_FIELD);
                    true
                }
            };
            values.set("isAdmin", is_admin);
            SignupResult::Submitted(pipeline.run(transport, values.to_json(), effects))
        })
    }
}

fn admin_code_matches(expected: Option<&str>, entered: &str) -> bool {
    match expected {
        Some(code) if !code.is_empty() => code == entered,
        _ => {
            warn!("client-side admin verification enabled without an admin code");
            false
        }
    }
}
