use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::values::FieldValue;

/// HTML living-standard address shape: dot-atom local part, LDH labels.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Field-level validation failure, shown inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

type PredicateCallback = dyn Fn(&FieldValue) -> bool + Send + Sync;
type SharedPredicate = Arc<PredicateCallback>;

/// Built-in constraint kinds. Each rule carries the message it reports.
#[derive(Clone)]
pub enum Rule {
    Required(String),
    MinLength(usize, String),
    Email(String),
    Number(String),
    Integer(String),
    Positive(String),
    Min(f64, String),
    Max(f64, String),
    OneOf(Vec<String>, String),
    Custom {
        name: &'static str,
        message: String,
        predicate: SharedPredicate,
    },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required(message) => f.debug_tuple("Required").field(message).finish(),
            Rule::MinLength(len, message) => {
                f.debug_tuple("MinLength").field(len).field(message).finish()
            }
            Rule::Email(message) => f.debug_tuple("Email").field(message).finish(),
            Rule::Number(message) => f.debug_tuple("Number").field(message).finish(),
            Rule::Integer(message) => f.debug_tuple("Integer").field(message).finish(),
            Rule::Positive(message) => f.debug_tuple("Positive").field(message).finish(),
            Rule::Min(bound, message) => f.debug_tuple("Min").field(bound).field(message).finish(),
            Rule::Max(bound, message) => f.debug_tuple("Max").field(bound).field(message).finish(),
            Rule::OneOf(options, message) => {
                f.debug_tuple("OneOf").field(options).field(message).finish()
            }
            Rule::Custom { name, message, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required(message.into())
    }

    pub fn min_length(len: usize, message: impl Into<String>) -> Self {
        Rule::MinLength(len, message.into())
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email(message.into())
    }

    pub fn number(message: impl Into<String>) -> Self {
        Rule::Number(message.into())
    }

    pub fn integer(message: impl Into<String>) -> Self {
        Rule::Integer(message.into())
    }

    pub fn positive(message: impl Into<String>) -> Self {
        Rule::Positive(message.into())
    }

    pub fn min(bound: f64, message: impl Into<String>) -> Self {
        Rule::Min(bound, message.into())
    }

    pub fn max(bound: f64, message: impl Into<String>) -> Self {
        Rule::Max(bound, message.into())
    }

    pub fn one_of<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        Rule::OneOf(options.into_iter().map(Into::into).collect(), message.into())
    }

    pub fn custom<F>(name: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Rule::Custom {
            name,
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Name used in logs and tests to tell rules apart.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required(_) => "required",
            Rule::MinLength(..) => "min-length",
            Rule::Email(_) => "email",
            Rule::Number(_) => "number",
            Rule::Integer(_) => "integer",
            Rule::Positive(_) => "positive",
            Rule::Min(..) => "min",
            Rule::Max(..) => "max",
            Rule::OneOf(..) => "one-of",
            Rule::Custom { name, .. } => *name,
        }
    }

    /// Checks one value against this rule. Blank values only fail
    /// `Required`; every other rule lets them through.
    pub fn check(&self, value: &FieldValue) -> Result<(), ValidationError> {
        if value.is_blank() {
            return match self {
                Rule::Required(message) => Err(ValidationError::new(message)),
                _ => Ok(()),
            };
        }

        let passed = match self {
            Rule::Required(_) => true,
            Rule::MinLength(len, _) => value.as_text().chars().count() >= *len,
            Rule::Email(_) => EMAIL.is_match(&value.as_text()),
            Rule::Number(_) => value.as_number().is_some(),
            Rule::Integer(_) => value.as_number().map_or(true, |n| n.fract() == 0.0),
            Rule::Positive(_) => value.as_number().map_or(true, |n| n > 0.0),
            Rule::Min(bound, _) => value.as_number().map_or(true, |n| n >= *bound),
            Rule::Max(bound, _) => value.as_number().map_or(true, |n| n <= *bound),
            Rule::OneOf(options, _) => {
                let text = value.as_text();
                options.iter().any(|option| option == text.trim())
            }
            Rule::Custom { predicate, .. } => predicate(value),
        };

        if passed {
            Ok(())
        } else {
            Err(ValidationError::new(self.message()))
        }
    }

    fn message(&self) -> &str {
        match self {
            Rule::Required(message)
            | Rule::MinLength(_, message)
            | Rule::Email(message)
            | Rule::Number(message)
            | Rule::Integer(message)
            | Rule::Positive(message)
            | Rule::Min(_, message)
            | Rule::Max(_, message)
            | Rule::OneOf(_, message) => message,
            Rule::Custom { message, .. } => message,
        }
    }
}
