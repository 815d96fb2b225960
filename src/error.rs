//! Error types for the credential exchange pipeline.
//!
//! Every failure is terminal: nothing in this tool retries or recovers.
//! The variants exist so the binary can tell a missing installation apart
//! from a transport failure and print a targeted message for it.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures that can occur while exchanging App credentials for a runner token.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The private key could not be parsed as an RSA PEM.
    #[error("Failed to parse private key as RSA PEM: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    /// Signing the app JWT failed.
    #[error("Failed to sign app JWT: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The system clock reports a time before the Unix epoch.
    #[error("Failed to read system time: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    /// A request could not be built, sent, or its body decoded.
    #[error("Request to GitHub failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// No installation of the App matched the requested organization.
    #[error("No installation matching organization '{0}' could be found")]
    OrgNotFound(String),
}

impl ExchangeError {
    /// Whether this failure means the organization has no matching
    /// installation, as opposed to a key, signing, or transport problem.
    pub fn is_org_not_found(&self) -> bool {
        matches!(self, ExchangeError::OrgNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_not_found_names_the_organization() {
        let err = ExchangeError::OrgNotFound("my-org".to_string());
        let message = err.to_string();
        assert!(message.contains("my-org"));
        assert!(!message.contains("GitHub API error"));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let err = ExchangeError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"message":"Bad credentials"}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Bad credentials"));
    }

    #[test]
    fn only_org_not_found_is_classified_as_such() {
        assert!(ExchangeError::OrgNotFound("org".to_string()).is_org_not_found());
        let api = ExchangeError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(!api.is_org_not_found());
    }
}
