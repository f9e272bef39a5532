use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use tracing::warn;

pub mod account;
pub mod listing;
pub mod system;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::{io, output};
use crate::flows::notify_upload_failure;
use crate::forms::{
    FieldDescriptor, FieldKind, FormSchema, Notifier, SelectedFile, SubmitOutcome, UploadOutcome,
};

static REGISTRY: Lazy<CommandRegistry> = Lazy::new(|| CommandRegistry::new(all_definitions()));

pub(crate) fn registry() -> &'static CommandRegistry {
    &REGISTRY
}

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(account::definitions());
    commands.extend(listing::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Splits `field=value` arguments; keys are matched case-insensitively.
pub(crate) fn parse_assignments(args: &[&str]) -> Result<Vec<(String, String)>, CommandError> {
    args.iter()
        .map(|arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!("expected `field=value`, got `{}`", arg))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CommandError::InvalidArguments(format!(
                    "missing field name in `{}`",
                    arg
                )));
            }
            Ok((key.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Values given on the command line, followed by prompts for every other
/// field when a user is at the terminal.
pub(crate) fn gather_fields(
    context: &ShellContext,
    fields: &[&FieldDescriptor],
    args: &[&str],
) -> Result<Vec<(String, String)>, CommandError> {
    let mut values = parse_assignments(args)?;
    if !context.can_prompt() {
        return Ok(values);
    }
    for field in fields {
        if values.iter().any(|(key, _)| key == field.key) {
            continue;
        }
        let value = prompt_field(context, field)?;
        values.push((field.key.to_string(), value));
    }
    Ok(values)
}

fn prompt_field(context: &ShellContext, field: &FieldDescriptor) -> Result<String, CommandError> {
    let theme = &context.theme;
    let label = match field.help {
        Some(help) => format!("{} ({})", field.label, help),
        None => field.label.to_string(),
    };
    match &field.kind {
        FieldKind::Password => io::prompt_secret(theme, &label),
        FieldKind::Choice(options) => io::prompt_choice(theme, &label, options),
        FieldKind::Boolean => io::confirm_action(theme, &label, false).map(|v| v.to_string()),
        FieldKind::File => io::prompt_text(theme, &format!("{} [blank to skip]", label)),
        FieldKind::Text | FieldKind::Multiline | FieldKind::Email | FieldKind::Number => {
            io::prompt_text(theme, &label)
        }
    }
}

/// Reads the file to upload. An unreadable file is reported like a failed
/// upload and the rest of the form carries on without it.
pub(crate) fn select_file(path: &str, notifier: &mut dyn Notifier) -> Option<SelectedFile> {
    match SelectedFile::from_path(Path::new(path.trim())) {
        Ok(file) => Some(file),
        Err(err) => {
            warn!(path = path.trim(), error = %err, "selected file unreadable");
            notify_upload_failure(notifier, &err);
            None
        }
    }
}

pub(crate) fn report_upload(outcome: &UploadOutcome) {
    if let UploadOutcome::Stored(reference) = outcome {
        io::print_success(format!("Uploaded `{}`.", reference));
    }
}

/// Unwraps a completed submission, printing why it was not sent otherwise.
pub(crate) fn completed<R>(schema: &FormSchema, outcome: SubmitOutcome<R>) -> Option<R> {
    match outcome {
        SubmitOutcome::Completed(result) => Some(result),
        SubmitOutcome::Invalid(errors) => {
            io::print_error("Please fix the following fields:");
            for (key, error) in errors.iter() {
                let label = schema.field(key).map_or(key, |field| field.label);
                output::line(format!("  {:<24} {}", label, error));
            }
            None
        }
        SubmitOutcome::Rejected(busy) => {
            io::print_warning(busy);
            None
        }
    }
}
