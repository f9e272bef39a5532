//! Shell state, dispatch and error reporting.

use std::io;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tracing::info;

use crate::api::{ReqwestTransport, Transport};
use crate::cli::commands::{self, listing, CommandDefinition};
use crate::cli::io as cli_io;
use crate::config::{Config, ConfigManager};
use crate::errors::{CliError, ClientError};
use crate::forms::View;
use crate::session::{FileSessionStore, Session};
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub session: Session,
    pub transport: Box<dyn Transport>,
    pub view: View,
    pub running: bool,
}

impl ShellContext {
    /// Loads configuration and the persisted session from the data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load_effective()?;
        let session = Session::restore(Box::new(FileSessionStore::new(
            paths::session_file_in(&base),
        )))?;
        let transport = Box::new(ReqwestTransport::new(config.backend_url.clone()));
        info!(backend = %config.backend_url, ?mode, "shell context ready");
        Ok(Self::from_parts(
            mode,
            config_manager,
            config,
            session,
            transport,
        ))
    }

    pub fn from_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        session: Session,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            mode,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            session,
            transport,
            view: View::Home,
            running: true,
        }
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        match self.session.user() {
            Some(user) => format!("refurnish [{}] {}> ", user.name, self.view),
            None => format!("refurnish {}> ", self.view),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        commands::registry().names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&'static CommandDefinition> {
        commands::registry().get(name)
    }

    /// Points the transport at the configured backend.
    pub(crate) fn reconnect(&mut self) {
        self.transport = Box::new(ReqwestTransport::new(self.config.backend_url.clone()));
        info!(backend = %self.config.backend_url, "transport reconnected");
    }

    /// Switches to `requested` after a form finished, rendering the views
    /// that have content.
    pub(crate) fn follow(&mut self, requested: Option<View>) -> CommandResult {
        let Some(view) = requested else {
            return Ok(());
        };
        info!(%view, "navigating");
        self.view = view.clone();
        match view {
            View::Home => listing::show_products(self),
            View::MyProducts => listing::show_my_products(self),
            View::Login => {
                cli_io::print_hint("Use `login` to sign in.");
                Ok(())
            }
            View::AdminSignup => {
                cli_io::print_hint("Use `admin-signup` to try again.");
                Ok(())
            }
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.command(command) {
            match (definition.handler)(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = commands::registry()
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Input(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Client(ClientError::LoginRequired(action)) => {
                cli_io::print_error(format!("You must be logged in to {}.", action));
                cli_io::print_hint("Use `login` first.");
            }
            other => cli_io::print_error(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, ApiResponse, TransportError};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Scripted {
        replies: Rc<RefCell<VecDeque<ApiResponse>>>,
        sent: Rc<RefCell<Vec<ApiRequest>>>,
    }

    impl Scripted {
        fn reply(&self, status: u16, body: serde_json::Value) {
            self.replies
                .borrow_mut()
                .push_back(ApiResponse::new(status, body.to_string().into_bytes()));
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| TransportError::new("no scripted reply"))
        }
    }

    fn context(transport: Scripted) -> (ShellContext, TempDir) {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let context = ShellContext::from_parts(
            CliMode::Script,
            manager,
            Config::default(),
            Session::in_memory(),
            Box::new(transport),
        );
        (context, dir)
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _dir) = context(Scripted::default());
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn unknown_commands_continue() {
        let (mut context, _dir) = context(Scripted::default());
        assert_eq!(
            context.process_line("lgoin").unwrap(),
            LoopControl::Continue
        );
    }

    #[test]
    fn login_command_starts_session_and_lands_home() {
        let transport = Scripted::default();
        transport.reply(200, json!({"_id": "u1", "name": "Asha", "isAdmin": false}));
        transport.reply(200, json!([]));
        let (mut context, _dir) = context(transport.clone());

        context
            .process_line("login email=asha@example.com password=secret1")
            .unwrap();

        assert_eq!(context.session.user().unwrap().name, "Asha");
        assert_eq!(context.view, View::Home);
        let sent = transport.sent.borrow();
        assert_eq!(sent[0].path, "/user/authenticate");
        assert_eq!(sent[0].json().unwrap()["email"], "asha@example.com");
        assert_eq!(sent[1].path, "/product/getall");
    }

    #[test]
    fn add_product_requires_login() {
        let transport = Scripted::default();
        let (mut context, _dir) = context(transport.clone());
        let err = context
            .process_line("add-product title=Sofa")
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Client(ClientError::LoginRequired(_))
        ));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn invalid_product_sends_nothing() {
        let transport = Scripted::default();
        let (mut context, _dir) = context(transport.clone());
        context.session.login(asha()).unwrap();

        context
            .process_line("add-product title=Teak type=Bed description=Solid year=1949")
            .unwrap();

        assert!(transport.sent.borrow().is_empty());
        assert_eq!(context.view, View::Home);
    }

    fn asha() -> crate::api::SessionUser {
        crate::api::SessionUser {
            id: "u1".into(),
            name: "Asha".into(),
            is_admin: false,
            email: None,
            avatar: None,
        }
    }

    #[test]
    fn unreadable_image_still_sends_the_listing() {
        let transport = Scripted::default();
        transport.reply(200, json!({"_id": "p1"}));
        transport.reply(200, json!([]));
        let (mut context, _dir) = context(transport.clone());
        context.session.login(asha()).unwrap();

        context
            .process_line(
                "add-product title=TeakBed type=Bed description=Solid year=2015 image=/nope/missing.png",
            )
            .unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].path, "/product/add");
        let body = sent[0].json().unwrap();
        assert_eq!(body["title"], "TeakBed");
        assert_eq!(body["image"], "");
        assert_eq!(sent[1].path, "/product/getall");
        assert_eq!(context.view, View::MyProducts);
    }

    #[test]
    fn delete_refreshes_the_current_listing() {
        let transport = Scripted::default();
        transport.reply(
            200,
            json!([{"_id": "p1", "title": "Sofa", "image": "sofa.png", "user_id": "u1"}]),
        );
        transport.reply(200, json!({}));
        transport.reply(200, json!({}));
        transport.reply(200, json!([]));
        let (mut context, _dir) = context(transport.clone());
        context.session.login(asha()).unwrap();

        context.process_line("delete p1").unwrap();

        let paths: Vec<String> = transport
            .sent
            .borrow()
            .iter()
            .map(|request| request.path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/product/getall",
                "/product/delete/p1",
                "/util/deletefile/sofa.png",
                "/product/getall",
            ]
        );
    }

    #[test]
    fn config_set_persists_and_reconnects() {
        let (mut context, dir) = context(Scripted::default());
        context
            .process_line("config set backend_url http://api.example.test")
            .unwrap();
        assert_eq!(context.config.backend_url, "http://api.example.test");
        let saved = ConfigManager::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(saved.backend_url, "http://api.example.test");
    }
}
