use crate::GithubClient;
use log::debug;
use repo_stats::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "LazyCLI-Website";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GithubClientBuilder {
    /// Sends `Authorization: Bearer <token>`. A blank token leaves requests unauthenticated.
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let token = token.expose_secret().trim();
        if token.is_empty() {
            debug!("Blank API token, requests stay unauthenticated.");
            return Ok(self);
        }
        let mut val = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(anyhow::Error::from)?;
        val.set_sensitive(true);
        Ok(self.with_header_value(header::AUTHORIZATION, val))
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.timeout = timeout;
        self
    }

    fn try_with_header(self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        Ok(self.with_header_value(key, val))
    }

    fn with_header_value(mut self, key: HeaderName, val: HeaderValue) -> GithubClientBuilder {
        self.headers.insert(key, val);
        self
    }

    pub fn build(self) -> Result<GithubClient> {
        Url::parse(&self.github_url).map_err(anyhow::Error::from)?;
        let client = self
            .client_builder
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(GithubClient {
            client,
            github_url: self.github_url,
        })
    }
}

#[test]
fn invalid_url_test() {
    let client = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(client.is_err());
}

#[test]
fn trailing_slash_test() -> anyhow::Result<()> {
    let client = GithubClientBuilder::default()
        .with_github_url("https://api.github.com/")
        .build()?;
    assert_eq!(client.github_url, "https://api.github.com");
    Ok(())
}

#[test]
fn invalid_user_agent_test() {
    let builder = GithubClientBuilder::default().try_with_user_agent("bad\nagent");
    assert!(builder.is_err());
}
