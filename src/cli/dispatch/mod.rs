use crate::cli::{
    actions::{server::Args, Action},
    commands::{self, store},
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(commands::DEFAULT_PORT);

    let dsn = matches
        .get_one::<String>(store::ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let store = matches
        .get_one::<String>(store::ARG_STORE)
        .map_or(Ok(store::StoreKind::default()), |value| value.parse())
        .map_err(|e| anyhow!(e))?;

    Ok(Action::Server(Args {
        port,
        dsn: SecretString::from(dsn),
        store,
    }))
}
