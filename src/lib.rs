//! GitHub Runner Token Tool
//!
//! Exchanges GitHub App credentials for a short-lived token authorizing a
//! self-hosted runner operation (registration or removal).
//!
//! One invocation performs exactly one exchange:
//!
//! 1. Sign an RS256 app JWT with the App's private key.
//! 2. `GET /app/installations` to find the installation for the organization.
//! 3. `POST` the installation's `access_tokens_url` for an installation token.
//! 4. `POST /orgs/{org}/actions/runners/{registration-token|remove-token}`.
//!
//! The resulting token is printed to stdout so it can be captured by
//! automation; everything else goes to stderr.

pub mod auth;
pub mod error;
pub mod github;

pub use error::ExchangeError;
pub use github::{GitHubClient, TokenType, GITHUB_API};
