//! Application startup and the interactive shell.
//!
//! This module builds the session transport and the application instance
//! from configuration, then drives it from line-oriented commands.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::app::App;
use crate::auth::LogoutOutcome;
use crate::config::ConfigV1;
use crate::models::AuthState;
use crate::navigation::{NavLink, Screen};
use crate::transport::HttpSessionTransport;

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Goto(String),
    Login,
    Logout,
    WhoAmI,
    Nav,
    Wait,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Command::Empty;
        };
        match word.to_lowercase().as_str() {
            "goto" | "go" => match parts.next() {
                Some(path) => Command::Goto(path.to_string()),
                None => Command::Unknown(line.trim().to_string()),
            },
            "login" => Command::Login,
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "nav" => Command::Nav,
            "wait" => Command::Wait,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}

pub fn describe_screen(screen: &Screen) -> String {
    match screen {
        Screen::View { path, title } => format!("[{}] {}", path, title),
        Screen::Loading { path } => format!("[{}] loading...", path),
        Screen::NotFound { path } => format!("[{}] not found", path),
    }
}

pub fn describe_state(state: &AuthState) -> String {
    match state.user() {
        Some(user) => format!("signed in as {}", user),
        None => state.name().to_string(),
    }
}

fn describe_links(links: &[NavLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            NavLink::Route { path, title } => format!("{} ({})", title, path),
            NavLink::Logout => "Logout".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

const HELP: &str = "commands: goto <path>, login, logout, whoami, nav, wait, help, quit";

/// Executes commands from `input` against `app`, writing replies to `output`,
/// until end of input or `quit`.
pub async fn run_shell<R, W>(app: &App, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let auth = app.auth();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(&line);
        debug!("Shell command: {:?}", command);
        match command {
            Command::Goto(path) => writeln!(output, "{}", describe_screen(&app.visit(&path)))?,
            Command::Login => {
                auth.login().await;
                writeln!(output, "{}", describe_state(&auth.state()))?;
                writeln!(output, "{}", describe_screen(&app.router().refresh()))?;
            }
            Command::Logout => match auth.logout().await {
                LogoutOutcome::Confirmed => {
                    writeln!(output, "signed out")?;
                    writeln!(output, "{}", describe_screen(&app.router().refresh()))?;
                }
                LogoutOutcome::Rejected(status) => {
                    writeln!(output, "logout not confirmed (status {})", status.as_u16())?
                }
                LogoutOutcome::Failed => writeln!(output, "logout failed")?,
                LogoutOutcome::Cancelled => writeln!(output, "logout cancelled")?,
            },
            Command::WhoAmI => writeln!(output, "{}", describe_state(&auth.state()))?,
            Command::Nav => writeln!(output, "{}", describe_links(&app.nav_links()))?,
            Command::Wait => {
                let state = auth.settled().await;
                writeln!(output, "{}", describe_state(&state))?;
                writeln!(output, "{}", describe_screen(&app.router().refresh()))?;
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(text) => writeln!(output, "unknown command '{}'; {}", text, HELP)?,
        }
        output.flush()?;
    }
    Ok(())
}

/// Initializes the application and serves the shell on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the session transport or the route table cannot be
/// built, or if stdin/stdout fail.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(HttpSessionTransport::new(&config.session)?);
    let app = App::mount(&config, transport)?;

    info!(
        "Session service at {}; type 'help' for commands",
        config.session.base_url
    );
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", describe_screen(&app.visit(&config.landing)))?;

    run_shell(&app, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    app.unmount();
    Ok(())
}
