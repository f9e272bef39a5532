use chrono::Local;

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::effects::{CliNavigator, CliNotifier};
use crate::cli::io;
use crate::flows::signup::AVATAR_FIELD;
use crate::flows::{LoginForm, SignupForm};
use crate::forms::{Effects, FieldDescriptor, View};

use super::{completed, gather_fields, report_upload, select_file, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "login",
            "Log in with email and password",
            "login [email=<email>] [password=<password>]",
            cmd_login,
        ),
        CommandDefinition::new("logout", "End the current session", "logout", cmd_logout),
        CommandDefinition::new("whoami", "Show the logged-in user", "whoami", cmd_whoami),
        CommandDefinition::new(
            "signup",
            "Create a user account",
            "signup [name=..] [email=..] [password=..] [avatar=<path>]",
            cmd_signup,
        ),
        CommandDefinition::new(
            "admin-signup",
            "Create an administrator account",
            "admin-signup [admincode=..] [name=..] [email=..] [password=..] [avatar=<path>]",
            cmd_admin_signup,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(user) = context.session.user() {
        io::print_warning(format!(
            "Already logged in as {}. Use `logout` first.",
            user.name
        ));
        return Ok(());
    }

    let mut form = LoginForm::new();
    let fields: Vec<&FieldDescriptor> = form.controller().schema().fields.iter().collect();
    let values = gather_fields(context, &fields, args)?;
    for (key, value) in values {
        form.set_field(&key, value)?;
    }

    let mut notifier = CliNotifier::new(context.mode, &context.theme);
    let mut navigator = CliNavigator::default();
    let outcome = form.submit(
        context.transport.as_ref(),
        &mut context.session,
        &mut Effects::new(&mut notifier, &mut navigator),
    );
    if completed(form.controller().schema(), outcome).is_some() {
        context.follow(navigator.take())?;
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.session.is_logged_in() {
        io::print_info("Not logged in.");
        return Ok(());
    }
    context.session.logout()?;
    context.view = View::Home;
    io::print_success("Logged out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(user) = context.session.user() else {
        io::print_info("Not logged in.");
        return Ok(());
    };
    let role = if user.is_admin { "admin" } else { "user" };
    match &user.email {
        Some(email) => io::print_info(format!("{} <{}> ({})", user.name, email, role)),
        None => io::print_info(format!("{} ({})", user.name, role)),
    }
    if let Some(since) = context.session.since() {
        io::print_info(format!(
            "Logged in since {}",
            since.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    Ok(())
}

fn cmd_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_signup(context, SignupForm::user(), args)
}

fn cmd_admin_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let form = SignupForm::admin(&context.config);
    run_signup(context, form, args)
}

fn run_signup(context: &mut ShellContext, mut form: SignupForm, args: &[&str]) -> CommandResult {
    let fields: Vec<&FieldDescriptor> = form.controller().schema().fields.iter().collect();
    let values = gather_fields(context, &fields, args)?;

    let mut notifier = CliNotifier::new(context.mode, &context.theme);
    for (key, value) in values {
        if key == AVATAR_FIELD {
            if value.trim().is_empty() {
                continue;
            }
            if let Some(file) = select_file(&value, &mut notifier) {
                let outcome =
                    form.upload_avatar(context.transport.as_ref(), file, &mut notifier)?;
                report_upload(&outcome);
            }
            continue;
        }
        form.set_field(&key, value)?;
    }

    let mut navigator = CliNavigator::default();
    let outcome = form.submit(
        context.transport.as_ref(),
        &mut Effects::new(&mut notifier, &mut navigator),
    );
    // A rejected admin code also requests a view change.
    if completed(form.controller().schema(), outcome).is_some() {
        context.follow(navigator.take())?;
    }
    Ok(())
}
