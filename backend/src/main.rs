//! Operator CLI: runs one authentication operation against in-memory adapters.
//!
//! Users come from the fixture file named by `AUTH_FIXTURES_PATH`. Tokens are
//! signed with `AUTH_JWT_SECRET`, so a token printed by `login` validates in
//! a later `validate` run that uses the same secret. Results
//! and domain errors are printed to stdout as JSON; logs go to stderr. The
//! process exits non-zero when the operation fails.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use serde_json::{Value, json};
use tokio::runtime::Builder;
use tracing::{info, warn};

use auth_backend::config::AuthSettings;
use auth_backend::domain::ports::TokenService;
use auth_backend::domain::{AuthService, Error};
use auth_backend::outbound::{
    InMemoryUserStore, JwtTokenService, OutboxEmailService, load_user_fixtures, seed_users,
};
use auth_backend::telemetry;

type Service = AuthService<InMemoryUserStore, JwtTokenService, OutboxEmailService>;

/// `auth-backend` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "auth-backend",
    about = "Run authentication operations against fixture users",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Authenticate and print the issued token pair.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Request a password reset email.
    Reset {
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// Resolve a token to its user.
    Validate {
        /// Token to check.
        #[arg(long)]
        token: String,
    },
    /// Check a password against the strength policy.
    CheckPassword {
        /// Candidate password.
        #[arg(long)]
        password: String,
    },
    /// Hash a password for use in a fixture file.
    HashPassword {
        /// Password to hash.
        #[arg(long)]
        password: String,
    },
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let settings = AuthSettings::load_from_iter([OsString::from("auth-backend")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    telemetry::init(settings.log_format()?);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    let outcome = runtime.block_on(run(args.command, &settings))?;

    let (body, code) = match outcome {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(err) => (json!({ "error": err }), ExitCode::FAILURE),
    };
    let rendered = serde_json::to_string_pretty(&body).wrap_err("failed to render output")?;
    println!("{rendered}");
    Ok(code)
}

async fn run(command: Command, settings: &AuthSettings) -> Result<Result<Value, Error>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(InMemoryUserStore::new(Arc::clone(&clock)));
    let tokens = Arc::new(JwtTokenService::new(settings, Arc::clone(&clock)));
    let outbox = Arc::new(OutboxEmailService::default());

    if settings.uses_default_jwt_secret() {
        warn!("AUTH_JWT_SECRET is unset; tokens are signed with the development secret");
    }

    if let Some(path) = &settings.fixtures_path {
        let fixtures = load_user_fixtures(path)?;
        seed_users(&store, tokens.as_ref(), fixtures, clock.utc()).await?;
    } else {
        info!("no fixtures configured; the user store is empty");
    }

    let service: Service = AuthService::new(store, Arc::clone(&tokens), Arc::clone(&outbox), clock);
    let outcome = match command {
        Command::Login { email, password } => service
            .login(&email, &password)
            .await
            .and_then(|result| to_json(&result)),
        Command::Reset { email } => {
            let outcome = service
                .request_password_reset(&email)
                .await
                .and_then(|result| to_json(&result));
            info!(queued = outbox.sent().await.len(), "outbox state after reset");
            outcome
        }
        Command::Validate { token } => service
            .validate_token(&token)
            .await
            .and_then(|result| to_json(&result)),
        Command::CheckPassword { password } => service
            .validate_password_strength(&password)
            .map(|()| json!({ "valid": true })),
        Command::HashPassword { password } => tokens
            .hash_password(&password)
            .await
            .map(|hash| json!({ "hashed_password": hash }))
            .map_err(Error::from),
    };
    Ok(outcome)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value)
        .map_err(|err| Error::internal(format!("failed to serialise result: {err}")))
}
