//! # Passgate (username/password signup and signin)
//!
//! `passgate` registers a username/password pair and later checks a signin
//! attempt against the stored record.
//!
//! ## Endpoints
//!
//! - `POST /signup`: store a new credential record.
//! - `POST /signin`: look the record up by username and compare passwords.
//! - `GET /test`: plain-text liveness probe.
//! - `GET /health`: store reachability plus build metadata.
//!
//! ## Wire compatibility
//!
//! Status codes and messages follow an existing client contract and are kept
//! as-is: missing fields answer `403`, an unknown username on signin answers
//! `403` with the signup error text, and a wrong password answers `409`.
//! Storage failures always answer `500`.
//!
//! ## Storage
//!
//! Records go through the [`store::CredentialStore`] trait. Usernames are not
//! unique and passwords are stored as received; neither is hardened here.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
