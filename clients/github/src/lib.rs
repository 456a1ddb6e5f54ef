use async_trait::async_trait;
use log::debug;
use repo_stats::api::Contributor;
use repo_stats::api::Error;
use repo_stats::api::RepoCounts;
use repo_stats::api::RepoSlug;
use repo_stats::api::Result;
use reqwest::Client;
use reqwest::Response;
use serde::de::DeserializeOwned;

mod builder;
mod payload;
mod rate_limit;

pub use builder::GithubClientBuilder;
pub use builder::DEFAULT_GITHUB_URL;
pub use builder::DEFAULT_TIMEOUT;
pub use builder::DEFAULT_USER_AGENT;

pub struct GithubClient {
    client: Client,
    github_url: String,
}

impl GithubClient {
    async fn get(&self, request_url: String) -> Result<Response> {
        debug!("GET {}", request_url);
        self.client.get(request_url).send().await.map_err(request_error)
    }
}

#[async_trait]
impl repo_stats::api::Client for GithubClient {
    async fn repo_counts(&self, repo: &RepoSlug) -> Result<RepoCounts> {
        let request_url = format!("{}/repos/{}/{}", self.github_url, repo.owner, repo.name);
        let response = self.get(request_url).await?;
        read_response::<payload::Repo>(response).await.map(RepoCounts::from)
    }

    async fn contributors(&self, repo: &RepoSlug) -> Result<Vec<Contributor>> {
        let request_url = format!("{}/repos/{}/{}/contributors", self.github_url, repo.owner, repo.name);
        let response = self.get(request_url).await?;
        read_response::<payload::Contributors>(response).await
    }
}

/// Decodes a success response, anything else is an error.
async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        rate_limit::log_rate_limit(response.headers());
        return Err(Error::Status(status.as_u16()));
    }
    let body = response.bytes().await.map_err(request_error)?;
    serde_json::from_slice::<T>(&body).map_err(|err| Error::Malformed(err.to_string()))
}

fn request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Request(format!("timed out: {}", err))
    } else {
        Error::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::GithubClientBuilder;
    use repo_stats::api::{Client, Error, FailureKind, RepoCounts, RepoSlug};
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    const REPO_PATH: &str = "/repos/iammhador/lazycli";

    fn lazycli() -> RepoSlug {
        RepoSlug::new("iammhador".to_string(), "lazycli".to_string())
    }

    fn repo_body() -> serde_json::Value {
        serde_json::json!({ "stargazers_count": 42, "forks_count": 7, "open_issues_count": 3 })
    }

    struct NoAuthorization;
    impl Match for NoAuthorization {
        fn matches(&self, request: &Request) -> bool {
            !request
                .headers
                .keys()
                .any(|name| name.as_str().eq_ignore_ascii_case("authorization"))
        }
    }

    #[tokio::test]
    async fn unauthenticated_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .and(header("User-Agent", "LazyCLI-Website"))
            .and(NoAuthorization)
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build().unwrap();
        let counts = client.repo_counts(&lazycli()).await.unwrap();
        assert_eq!(counts, RepoCounts::new(42, 7, 3));
    }

    #[tokio::test]
    async fn blank_token_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .and(NoAuthorization)
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .try_with_token(SecretString::new("  ".to_string()))
            .unwrap()
            .build()
            .unwrap();
        assert!(client.repo_counts(&lazycli()).await.is_ok(), "Blank token should not be sent");
    }

    #[tokio::test]
    async fn bearer_token_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .and(header("Authorization", "Bearer ghp_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .try_with_token(SecretString::new("ghp_secret".to_string()))
            .unwrap()
            .build()
            .unwrap();
        assert!(client.repo_counts(&lazycli()).await.is_ok());
    }

    #[tokio::test]
    async fn status_error_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/contributors", REPO_PATH)))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000000"),
            )
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build().unwrap();
        let err = client.contributors(&lazycli()).await.unwrap_err();
        assert!(matches!(err, Error::Status(403)));
        assert_eq!(err.to_string(), "GitHub API error: 403");
    }

    #[tokio::test]
    async fn malformed_body_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build().unwrap();
        let err = client.repo_counts(&lazycli()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UpstreamMalformed);
    }

    #[tokio::test]
    async fn timeout_test() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(repo_body())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .with_timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.repo_counts(&lazycli()).await.unwrap_err();
        assert!(matches!(err, Error::Request(_)));
        assert_eq!(err.kind(), FailureKind::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn contributors_passthrough_test() {
        let server = MockServer::start().await;
        let body = serde_json::json!([{
            "id": 583231,
            "login": "octocat",
            "node_id": "MDQ6VXNlcjU4MzIzMQ==",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat",
            "type": "User",
            "site_admin": false,
            "contributions": 128
        }]);
        Mock::given(method("GET"))
            .and(path(format!("{}/contributors", REPO_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build().unwrap();
        let contributors = client.contributors(&lazycli()).await.unwrap();
        assert_eq!(serde_json::to_value(&contributors).unwrap(), body);
    }
}
