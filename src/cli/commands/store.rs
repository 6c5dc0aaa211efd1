use clap::{builder::PossibleValuesParser, Arg, Command};
use std::{fmt, str::FromStr};

pub const ARG_DSN: &str = "dsn";
pub const ARG_STORE: &str = "store";

pub const DEFAULT_DSN: &str = "postgres://localhost:5432/passgate";

/// Which credential backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl StoreKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store: {other}")),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .long_help("Database connection string, only used with --store postgres.")
                .default_value(DEFAULT_DSN)
                .env("PASSGATE_DSN"),
        )
        .arg(
            Arg::new(ARG_STORE)
                .long("store")
                .help("Credential store backend")
                .default_value(StoreKind::Postgres.as_str())
                .env("PASSGATE_STORE")
                .value_parser(PossibleValuesParser::new([
                    StoreKind::Postgres.as_str(),
                    StoreKind::Memory.as_str(),
                ])),
        )
}
