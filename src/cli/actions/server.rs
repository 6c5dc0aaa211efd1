use crate::{
    api::{self, SharedStore},
    cli::commands::store::StoreKind,
    store::{MemoryCredentialStore, PgCredentialStore},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub store: StoreKind,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let store = open_store(&args).await?;

    info!(store = store.kind(), "Credential store ready");

    api::new(args.port, store).await
}

async fn open_store(args: &Args) -> Result<SharedStore> {
    let store: SharedStore = match args.store {
        StoreKind::Memory => {
            warn!("Using the in-memory store, records are lost on exit");
            Arc::new(MemoryCredentialStore::new())
        }
        StoreKind::Postgres => Arc::new(PgCredentialStore::connect(args.dsn.expose_secret()).await?),
    };

    Ok(store)
}

fn log_startup_args(args: &Args) {
    let dsn = match args.store {
        StoreKind::Postgres => redact_dsn(args.dsn.expose_secret()),
        StoreKind::Memory => "n/a".to_string(),
    };
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("store", args.store.to_string()),
        ("dsn", dsn),
    ];
    info!("{}", startup_message(&entries));
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
