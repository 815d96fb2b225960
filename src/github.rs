//! GitHub API Client
//!
//! The credential exchange pipeline: list the App's installations, find the
//! one for the requested organization, mint an installation access token,
//! then mint the runner registration/removal token. The three calls are
//! strictly sequential and each failure aborts the remaining steps.

use clap::ValueEnum;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::ExchangeError;

/// Default GitHub REST API base URL.
pub const GITHUB_API: &str = "https://api.github.com";

const ACCEPT_VALUE: &str = "application/vnd.github.v3+json";

/// Which runner operation the requested token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenType {
    /// Token for registering a new self-hosted runner.
    Registration,
    /// Token for removing an existing self-hosted runner.
    Removal,
}

impl TokenType {
    /// Org-relative endpoint suffix for this token type.
    pub fn endpoint(self) -> &'static str {
        match self {
            TokenType::Registration => "actions/runners/registration-token",
            TokenType::Removal => "actions/runners/remove-token",
        }
    }
}

// ============================================================
// API Response Types
// ============================================================

#[derive(Debug, Deserialize, PartialEq)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Enterprise {}

/// The account an App installation belongs to. Enterprise installations
/// carry no login and can never match an organization name.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Account {
    User(User),
    Enterprise(Enterprise),
}

impl Account {
    fn login(&self) -> Option<&str> {
        match self {
            Account::User(user) => Some(&user.login),
            Account::Enterprise(_) => None,
        }
    }
}

/// One installation of the App, as returned by `GET /app/installations`.
#[derive(Debug, Deserialize)]
pub struct Installation {
    pub account: Account,
    pub access_tokens_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

// ============================================================
// Client Implementation
// ============================================================

/// GitHub API client with the fixed `Accept` header applied to every request.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: &str) -> Result<Self, ExchangeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));

        let client = Client::builder()
            .user_agent(concat!("gh-runner-token/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL this client talks to.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every installation of the App, authenticated with the app JWT.
    pub async fn list_installations(
        &self,
        app_jwt: &str,
    ) -> Result<Vec<Installation>, ExchangeError> {
        let url = format!("{}/app/installations", self.base_url);
        debug!("Listing App installations");

        let response = self.client.get(&url).bearer_auth(app_jwt).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Exchange the app JWT for an installation access token.
    pub async fn create_installation_token(
        &self,
        app_jwt: &str,
        access_tokens_url: &str,
    ) -> Result<String, ExchangeError> {
        debug!("Requesting installation access token");

        let response = self
            .client
            .post(access_tokens_url)
            .bearer_auth(app_jwt)
            .send()
            .await?;
        let body: TokenResponse = check_status(response).await?.json().await?;
        Ok(body.token)
    }

    /// Request the final runner token for the organization.
    pub async fn create_runner_token(
        &self,
        installation_token: &str,
        org_name: &str,
        token_type: TokenType,
    ) -> Result<String, ExchangeError> {
        let url = format!("{}/orgs/{}/{}", self.base_url, org_name, token_type.endpoint());
        debug!("Requesting {:?} token for {}", token_type, org_name);

        let response = self
            .client
            .post(&url)
            .bearer_auth(installation_token)
            .send()
            .await?;
        let body: TokenResponse = check_status(response).await?.json().await?;
        Ok(body.token)
    }

    /// Run the full exchange: installations list, installation token, runner
    /// token. Each step only runs if the previous one succeeded.
    pub async fn runner_token(
        &self,
        app_jwt: &str,
        org_name: &str,
        token_type: TokenType,
    ) -> Result<String, ExchangeError> {
        let installations = self.list_installations(app_jwt).await?;
        let installation = find_installation(&installations, org_name)?;

        let installation_token = self
            .create_installation_token(app_jwt, &installation.access_tokens_url)
            .await?;

        self.create_runner_token(&installation_token, org_name, token_type)
            .await
    }
}

/// Select the installation whose account login exactly matches `org_name`.
/// First match wins if the API ever returns duplicates.
pub fn find_installation<'a>(
    installations: &'a [Installation],
    org_name: &str,
) -> Result<&'a Installation, ExchangeError> {
    installations
        .iter()
        .find(|installation| installation.account.login() == Some(org_name))
        .ok_or_else(|| ExchangeError::OrgNotFound(org_name.to_string()))
}

async fn check_status(response: Response) -> Result<Response, ExchangeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ExchangeError::Api { status, body })
}
