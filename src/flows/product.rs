//! Add-furniture form.

use serde_json::Value;

use super::upload_into;
use crate::api::{Endpoint, Transport};
use crate::errors::ClientError;
use crate::forms::{
    Effects, FieldDescriptor, FieldKind, FieldValue, FormController, FormSchema, FormValues,
    Notice, Notifier, PipelineReport, ResponsePolicy, Rule, SelectedFile, SubmissionPipeline,
    SubmitOutcome, UploadOutcome, View,
};
use crate::session::Session;

pub const FURNITURE_TYPES: [&str; 4] = ["Sofa", "Bed", "Table", "Chair"];

pub const EARLIEST_YEAR: i64 = 1950;
pub const LATEST_YEAR: i64 = 2023;

pub const IMAGE_FIELD: &str = "image";

/// Purchase year must fall in `[EARLIEST_YEAR, LATEST_YEAR]`.
pub fn valid_year(value: &FieldValue) -> bool {
    value
        .as_number()
        .map_or(false, |year| year >= EARLIEST_YEAR as f64 && year <= LATEST_YEAR as f64)
}

pub fn product_schema() -> FormSchema {
    FormSchema::new(
        "add-product",
        vec![
            FieldDescriptor::new("title", "Product Name", FieldKind::Text)
                .rule(Rule::required("Product Name is Required"))
                .rule(Rule::min_length(4, "Min. 4 characters required")),
            FieldDescriptor::new(
                "type",
                "Type of Furniture",
                FieldKind::Choice(FURNITURE_TYPES.iter().map(|t| t.to_string()).collect()),
            )
            .rule(Rule::required("Type of Furniture is Required"))
            .rule(Rule::one_of(FURNITURE_TYPES, "Select a valid furniture type")),
            FieldDescriptor::new("description", "Product Description", FieldKind::Multiline)
                .rule(Rule::required("Product Description is Required"))
                .rule(Rule::min_length(4, "Min. 4 characters required")),
            FieldDescriptor::new("year", "Purchased in Year", FieldKind::Number)
                .rule(Rule::required("Year of Purchase is Required"))
                .rule(Rule::number("Year must be a valid number"))
                .rule(Rule::integer("Year must be a whole number (no decimals)"))
                .rule(Rule::positive("Year must be a positive number"))
                .rule(Rule::min(4.0, "Year should be a 4-digit number"))
                .rule(Rule::custom("valid-year", "Please enter a valid year", valid_year)),
            FieldDescriptor::new("price", "Price", FieldKind::Number)
                .rule(Rule::number("Price must be a valid number"))
                .admin_only(),
            FieldDescriptor::new(IMAGE_FIELD, "Upload Furniture Picture", FieldKind::File)
                .with_help("Path to an image file; it is uploaded before the form is sent."),
        ],
    )
}

pub struct AddProductForm {
    controller: FormController,
    pipeline: SubmissionPipeline,
}

impl Default for AddProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AddProductForm {
    pub fn new() -> Self {
        let policy = ResponsePolicy::new(
            Notice::success("Nice").with_text("Your Product is added successfully"),
        )
        .then_navigate(View::MyProducts);
        Self {
            controller: FormController::new(product_schema()),
            pipeline: SubmissionPipeline::new(Endpoint::add_product(), policy),
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Fields the current user may fill in; price is admin-only.
    pub fn visible_fields(&self, session: &Session) -> Vec<&FieldDescriptor> {
        let admin = session.is_admin();
        self.controller
            .schema()
            .fields
            .iter()
            .filter(|field| admin || !field.admin_only)
            .collect()
    }

    pub fn set_field(
        &mut self,
        session: &Session,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ClientError> {
        let admin_only = self
            .controller
            .schema()
            .field(name)
            .map_or(false, |field| field.admin_only);
        if admin_only && !session.is_admin() {
            return Err(ClientError::AdminOnly(name.to_string()));
        }
        self.controller.set_field(name, value)
    }

    pub fn upload_image<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        file: SelectedFile,
        notifier: &mut dyn Notifier,
    ) -> Result<UploadOutcome, ClientError> {
        upload_into(&mut self.controller, IMAGE_FIELD, transport, file, notifier)
    }

    /// Sends the listing with the owner taken from `session`.
    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        session: &Session,
        effects: &mut Effects<'_>,
    ) -> Result<SubmitOutcome<PipelineReport>, ClientError> {
        let owner = session.require("add a product")?;
        let is_admin = owner.is_admin;
        let (owner_id, owner_name) = (owner.id.clone(), owner.name.clone());

        let pipeline = &self.pipeline;
        let schema = self.controller.schema().clone();
        Ok(self.controller.submit(|values| {
            let body = product_body(&schema, &values, &owner_id, &owner_name, is_admin);
            pipeline.run(transport, body, effects)
        }))
    }
}

/// Merges the owner fields into the typed form values.
fn product_body(
    schema: &FormSchema,
    values: &FormValues,
    owner_id: &str,
    owner_name: &str,
    is_admin: bool,
) -> Value {
    let mut body = schema.coerce(values);
    if !is_admin {
        body.set("price", "");
    }
    body.set("user_id", owner_id);
    body.set("user_name", owner_name);
    body.to_json()
}
