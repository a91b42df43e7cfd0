//! OAuth 1.0a (one-legged, with token) request signing and transport.

mod client;
mod entropy;
mod signer;
pub mod values;

pub use client::*;
pub use entropy::*;
pub use signer::*;
