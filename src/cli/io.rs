use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use crate::cli::context::CommandError;
use crate::cli::output;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Free-form text; an empty answer is allowed so validation can report it.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(CommandError::from)
}

pub fn prompt_secret(theme: &ColorfulTheme, prompt: &str) -> Result<String, CommandError> {
    Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(CommandError::from)
}

pub fn prompt_choice(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &[String],
) -> Result<String, CommandError> {
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()?;
    Ok(options[index].clone())
}

/// Blocks until the user presses Enter.
pub fn wait_for_enter(theme: &ColorfulTheme) -> Result<(), CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .report(false)
        .interact_text()?;
    Ok(())
}
