use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::{line, section as output_section};
use crate::config::AdminVerification;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new(
            "config",
            "Show or change client settings",
            "config [show|set <key> <value>]",
            cmd_config,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

const CONFIG_KEYS: [&str; 5] = [
    "backend_url",
    "image_base_url",
    "placeholder_image_url",
    "admin_verification",
    "admin_code",
];

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(definition) => help::print_command(definition),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(super::registry());
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Refurnish {}", meta.version));
    line(format!("  Build hash   : {} ({})", meta.git_hash, meta.git_status));
    line(format!("  Built at     : {}", meta.timestamp));
    line(format!("  Target       : {}", meta.target));
    line(format!("  Profile      : {}", meta.profile));
    line(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    if !args[0].eq_ignore_ascii_case("set") || args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: config [show|set <key> <value>]".into(),
        ));
    }
    let key = args[1].to_ascii_lowercase();
    let value = args[2..].join(" ");
    set_config_value(context, &key, value.trim())
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    line(format!("  backend_url           : {}", config.backend_url));
    line(format!("  image_base_url        : {}", config.image_base_url));
    line(format!("  placeholder_image_url : {}", config.placeholder_image_url));
    line(format!(
        "  admin_verification    : {}",
        match config.admin_verification {
            AdminVerification::Server => "server",
            AdminVerification::Client => "client",
        }
    ));
    line(format!(
        "  admin_code            : {}",
        if config.admin_code.is_some() { "(set)" } else { "(unset)" }
    ));
    line(format!("  file                  : {}", context.config_manager.path().display()));
}

/// Edits the stored file, then re-applies environment overrides on top.
fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut stored = context.config_manager.load()?;
    match key {
        "backend_url" | "image_base_url" | "placeholder_image_url" if value.is_empty() => {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` needs a value",
                key
            )));
        }
        "backend_url" => stored.backend_url = value.to_string(),
        "image_base_url" => stored.image_base_url = value.to_string(),
        "placeholder_image_url" => stored.placeholder_image_url = value.to_string(),
        "admin_verification" => {
            stored.admin_verification = AdminVerification::parse(value).ok_or_else(|| {
                CommandError::InvalidArguments("admin_verification is `server` or `client`".into())
            })?;
        }
        "admin_code" => {
            stored.admin_code = (!value.is_empty()).then(|| value.to_string());
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown key `{}` (expected one of: {})",
                other,
                CONFIG_KEYS.join(", ")
            )));
        }
    }
    context.config_manager.save(&stored)?;

    stored.apply_env()?;
    let backend_changed = stored.backend_url != context.config.backend_url;
    context.config = stored;
    if backend_changed {
        context.reconnect();
    }
    io::print_success("Configuration updated.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
