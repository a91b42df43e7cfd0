//! OAuth 1.0a signed client and command-line front end for the Twitter Ads
//! API.
//!
//! [`v1`] holds the signer and HTTP client, [`commands`] the account-scoped
//! operations, and [`cli`] the argument parsing that ties them together.

pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod parameters;
pub mod v1;

mod encoder_oauth1;
mod util;

pub use cli::{run, run_with};
pub use error::{Error, Result};
