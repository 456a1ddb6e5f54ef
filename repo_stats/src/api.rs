use async_trait::async_trait;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    Status(u16),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Malformed(_) => FailureKind::UpstreamMalformed,
            Error::Status(_) | Error::Request(_) | Error::Other(_) => FailureKind::UpstreamUnavailable,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Upstream failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum FailureKind {
    /// Network failure, timeout or non-success status.
    UpstreamUnavailable,
    /// Success status with a body that does not decode.
    UpstreamMalformed,
}

/// Repository identity as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Constructor, Display)]
#[display(fmt = "{}/{}", owner, name)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Constructor)]
pub struct RepoCounts {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
}

/// Contributor as listed upstream.
///
/// The six named fields are required; anything else upstream sends is kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub contributions: u32,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Contributor {
    pub fn new(id: u64, login: impl Into<String>, contributions: u32) -> Self {
        let login = login.into();
        Contributor {
            id,
            avatar_url: format!("https://avatars.githubusercontent.com/u/{}?v=4", id),
            html_url: format!("https://github.com/{}", login),
            login,
            contributions,
            account_type: "User".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

#[async_trait]
pub trait Client: Send + Sync {
    /// Star, fork and open issue counts of `repo`.
    async fn repo_counts(&self, repo: &RepoSlug) -> Result<RepoCounts>;

    /// Contributors of `repo` in upstream order.
    async fn contributors(&self, repo: &RepoSlug) -> Result<Vec<Contributor>>;
}

#[test]
fn failure_kind_test() {
    assert_eq!(Error::Status(503).kind(), FailureKind::UpstreamUnavailable);
    assert_eq!(Error::Request("timed out".into()).kind(), FailureKind::UpstreamUnavailable);
    assert_eq!(Error::Malformed("missing field".into()).kind(), FailureKind::UpstreamMalformed);
    assert_eq!(FailureKind::UpstreamMalformed.to_string(), "UpstreamMalformed");
}

#[test]
fn status_message_test() {
    assert_eq!(Error::Status(503).to_string(), "GitHub API error: 503");
}

#[test]
fn contributor_passthrough_test() {
    let body = r#"{
        "id": 1,
        "login": "octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4",
        "html_url": "https://github.com/octocat",
        "contributions": 32,
        "type": "User",
        "site_admin": false
    }"#;
    let contributor: Contributor = serde_json::from_str(body).unwrap();
    assert_eq!(contributor.account_type, "User");
    let value = serde_json::to_value(&contributor).unwrap();
    assert_eq!(value["type"], "User");
    assert_eq!(value["site_admin"], false);
    assert_eq!(value["contributions"], 32);
}
