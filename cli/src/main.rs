use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use codenest::config::{ClientConfig, ConfigError};
use codenest::net::api::HttpAuthTransport;
use codenest::net::types::{Credentials, RegisterInput};
use codenest::services::session::SessionCoordinator;
use codenest::state::auth::ErrorInfo;
use codenest::state::store::SessionStore;
use codenest::util::route_guard::decide;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity operation failed: {0}")]
    Identity(#[from] ErrorInfo),
    #[error("read input failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("line {line}: {message}")]
    Script { line: usize, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "codenest-cli", about = "CodeNest session client")]
struct Cli {
    #[arg(long, env = "CODENEST_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CODENEST_PASSWORD", hide_env_values = true)]
        password: String,
        /// Confirm the new session with a check afterwards.
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CODENEST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Ask the identity service whether a session is active.
    Check,
    /// Print what the route guard decides for a path after a session check.
    Route { path: String },
    /// Run commands line by line against one session.
    Script(ScriptArgs),
}

#[derive(Args, Debug)]
struct ScriptArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,
}

/// One line of a session script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptCommand {
    Register { first_name: String, email: String, password: String },
    Signup { first_name: String, email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Check,
    Clear,
    Route { path: String },
    State,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = ClientConfig::new(base_url)?.base_url;
    }
    tracing::debug!(base_url = %config.base_url, dispatch = ?config.dispatch, "client configured");

    let transport = HttpAuthTransport::new(&config)?;
    let coordinator = SessionCoordinator::new(Arc::new(transport), SessionStore::new(), config.dispatch);

    match cli.command {
        Command::Register { first_name, email, password, confirm } => {
            let input = RegisterInput { first_name, email_id: email, password };
            let result = if confirm {
                coordinator.sign_up(&input).await.map(|_| ())
            } else {
                coordinator.register(&input).await.map(|_| ())
            };
            print_state(&coordinator)?;
            result?;
        }
        Command::Login { email, password } => {
            let result = coordinator.login(&Credentials { email_id: email, password }).await;
            print_state(&coordinator)?;
            result?;
        }
        Command::Logout => {
            let result = coordinator.logout().await;
            print_state(&coordinator)?;
            result?;
        }
        Command::Check => {
            coordinator.check_session().await;
            print_state(&coordinator)?;
        }
        Command::Route { path } => {
            coordinator.check_session().await;
            print_route(&coordinator, &path)?;
        }
        Command::Script(args) => run_script(&coordinator, &args).await?,
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_script(coordinator: &SessionCoordinator, args: &ScriptArgs) -> Result<(), CliError> {
    let mut reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let mut line = String::new();
    let mut number = 0_usize;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        number += 1;

        let command = parse_script_line(&line).map_err(|message| CliError::Script { line: number, message })?;
        let Some(command) = command else {
            continue;
        };
        run_script_command(coordinator, command).await?;
    }
    Ok(())
}

/// Identity failures are already recorded in the printed state, so a script
/// keeps going after them.
async fn run_script_command(coordinator: &SessionCoordinator, command: ScriptCommand) -> Result<(), CliError> {
    match command {
        ScriptCommand::Register { first_name, email, password } => {
            let result = coordinator
                .register(&RegisterInput { first_name, email_id: email, password })
                .await;
            log_script_failure("register", result);
        }
        ScriptCommand::Signup { first_name, email, password } => {
            let result = coordinator
                .sign_up(&RegisterInput { first_name, email_id: email, password })
                .await;
            log_script_failure("signup", result);
        }
        ScriptCommand::Login { email, password } => {
            let result = coordinator.login(&Credentials { email_id: email, password }).await;
            log_script_failure("login", result);
        }
        ScriptCommand::Logout => {
            log_script_failure("logout", coordinator.logout().await);
        }
        ScriptCommand::Check => {
            coordinator.check_session().await;
        }
        ScriptCommand::Clear => coordinator.clear_local(),
        ScriptCommand::Route { path } => return print_route(coordinator, &path),
        ScriptCommand::State => {}
    }
    print_state(coordinator)
}

fn log_script_failure<T>(command: &'static str, result: Result<T, ErrorInfo>) {
    if let Err(error) = result {
        tracing::debug!(command, %error, "script command failed, continuing");
    }
}

fn parse_script_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let owned = |i: usize| words[i].to_owned();
    let command = match words.as_slice() {
        ["register", _, _, _] => ScriptCommand::Register { first_name: owned(1), email: owned(2), password: owned(3) },
        ["signup", _, _, _] => ScriptCommand::Signup { first_name: owned(1), email: owned(2), password: owned(3) },
        ["login", _, _] => ScriptCommand::Login { email: owned(1), password: owned(2) },
        ["logout"] => ScriptCommand::Logout,
        ["check"] => ScriptCommand::Check,
        ["clear"] => ScriptCommand::Clear,
        ["route", _] => ScriptCommand::Route { path: owned(1) },
        ["state"] => ScriptCommand::State,
        [verb, ..] => return Err(format!("unknown command or wrong arguments: {verb}")),
        [] => return Ok(None),
    };
    Ok(Some(command))
}

fn print_state(coordinator: &SessionCoordinator) -> Result<(), CliError> {
    print_json(&serde_json::to_value(coordinator.store().snapshot())?)
}

fn print_route(coordinator: &SessionCoordinator, path: &str) -> Result<(), CliError> {
    let decision = decide(&coordinator.store().snapshot(), path);
    tracing::debug!(path, %decision, "route decided");
    print_json(&json!({ "path": path, "decision": decision }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
