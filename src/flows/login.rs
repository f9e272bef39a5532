use crate::api::{Endpoint, SessionUser, Transport};
use crate::errors::ClientError;
use crate::forms::{
    Effects, FieldDescriptor, FieldKind, FieldValue, FormController, FormSchema, Notice,
    PipelineReport, ResponsePolicy, Rule, SubmissionPipeline, SubmitOutcome, View,
};
use crate::session::Session;

pub fn login_schema() -> FormSchema {
    FormSchema::new(
        "login",
        vec![
            FieldDescriptor::new("email", "Email", FieldKind::Email)
                .rule(Rule::required("Email is Required")),
            FieldDescriptor::new("password", "Password", FieldKind::Password)
                .rule(Rule::required("Password is Required")),
        ],
    )
}

/// Authenticates and, on success, starts the session.
pub struct LoginForm {
    controller: FormController,
    pipeline: SubmissionPipeline,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let policy = ResponsePolicy::new(Notice::success("Login Successful"))
            .then_navigate(View::Home)
            .on_unauthorized(
                Notice::error("Invalid Credentials").with_text("Email or password is incorrect"),
            )
            .on_failure(Notice::error("Error Occured!").with_text("Something went wrong"));
        Self {
            controller: FormController::new(login_schema()),
            pipeline: SubmissionPipeline::new(Endpoint::authenticate(), policy),
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ClientError> {
        self.controller.set_field(name, value)
    }

    /// The session is written only for a 200 response whose body decodes as
    /// a user record; every other outcome leaves it untouched.
    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        session: &mut Session,
        effects: &mut Effects<'_>,
    ) -> SubmitOutcome<PipelineReport> {
        let pipeline = &self.pipeline;
        self.controller.submit(|values| {
            pipeline.run_with(transport, values.to_json(), effects, |response| {
                let user: SessionUser = response.json()?;
                session.login(user)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_credentials_are_required() {
        let schema = login_schema();
        let errors = schema.validate(&schema.defaults());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn login_policy_maps_unauthorized() {
        let form = LoginForm::new();
        let policy = form.pipeline.policy();
        assert_eq!(
            policy.unauthorized.as_ref().unwrap().title,
            "Invalid Credentials"
        );
        assert_eq!(policy.follow_up, Some(View::Home));
    }
}
