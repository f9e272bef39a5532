//! Declarative form descriptions.
//!
//! A [`FormSchema`] lists its fields in display order. Each field carries the
//! rules checked against its value; rules never look at other fields.

use std::collections::BTreeMap;

use super::validator::{Rule, ValidationError};
use super::values::{FieldValue, FormValues};

/// Supported data kinds for form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Email,
    Password,
    Number,
    Boolean,
    Choice(Vec<String>),
    /// Filled through the upload sub-flow with a stored file reference.
    File,
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub default: FieldValue,
    pub help: Option<&'static str>,
    pub admin_only: bool,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            rules: Vec::new(),
            default: FieldValue::empty(),
            help: None,
            admin_only: false,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Field is only shown to, and only accepted from, administrators.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required(_)))
    }

    /// First failing rule wins.
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        self.rules.iter().try_for_each(|rule| rule.check(value))
    }
}

/// Errors keyed by field name; fields without an entry are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, ValidationError>,
}

impl FieldErrors {
    pub fn get(&self, key: &str) -> Option<&ValidationError> {
        self.errors.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.errors.iter().map(|(key, error)| (*key, error))
    }
}

#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.key, field.default.clone()))
            .collect()
    }

    /// Validates every field independently. Pure: never performs I/O.
    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        let blank = FieldValue::empty();
        let errors = self
            .fields
            .iter()
            .filter_map(|field| {
                let value = values.get(field.key).unwrap_or(&blank);
                field.validate(value).err().map(|err| (field.key, err))
            })
            .collect();
        FieldErrors { errors }
    }

    /// Converts numeric text to numbers and boolean text to booleans so the
    /// serialized body carries typed JSON. Blank values are left as-is.
    pub fn coerce(&self, values: &FormValues) -> FormValues {
        let mut coerced = values.clone();
        for field in &self.fields {
            let Some(value) = values.get(field.key) else {
                continue;
            };
            if value.is_blank() {
                continue;
            }
            match field.kind {
                FieldKind::Number => {
                    if let Some(number) = value.as_number() {
                        coerced.set(field.key, number);
                    }
                }
                FieldKind::Boolean => {
                    if let Some(flag) = value.as_bool() {
                        coerced.set(field.key, flag);
                    }
                }
                _ => {}
            }
        }
        coerced
    }
}
