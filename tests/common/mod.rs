#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use lazycli_site::{build_aggregator, router, AppState, Args};
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::{Match, MockServer};

pub const REPO_PATH: &str = "/repos/iammhador/lazycli";
pub const CONTRIBUTORS_PATH: &str = "/repos/iammhador/lazycli/contributors";

pub fn args(server: &MockServer, api_token: Option<&str>) -> Args {
    Args {
        api_token: api_token.map(|token| SecretString::new(token.to_string())),
        api_url: server.uri(),
        owner: "iammhador".to_string(),
        repo: "lazycli".to_string(),
        user_agent: "LazyCLI-Website".to_string(),
        bind: "127.0.0.1:0".parse().unwrap(),
        timeout: 1,
        cache_max_age: 300,
    }
}

/// Sends `GET uri` through the router and returns status, response and decoded JSON body.
pub async fn get(args: Args, uri: &str) -> (StatusCode, Response<()>, serde_json::Value) {
    let aggregator = build_aggregator(&args).unwrap();
    let app = router(AppState::new(aggregator, args.cache_max_age).unwrap());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap();
    (parts.status, Response::from_parts(parts, ()), json)
}

pub fn repo_body(stars: u64, forks: u64, open_issues: u64) -> serde_json::Value {
    serde_json::json!({
        "id": 845324,
        "name": "lazycli",
        "full_name": "iammhador/lazycli",
        "stargazers_count": stars,
        "forks_count": forks,
        "open_issues_count": open_issues
    })
}

pub fn contributors_body(count: u64) -> serde_json::Value {
    let contributors = (0..count)
        .map(|index| {
            serde_json::json!({
                "id": 1000 + index,
                "login": contributor_login(index),
                "avatar_url": format!("https://avatars.githubusercontent.com/u/{}?v=4", 1000 + index),
                "html_url": format!("https://github.com/{}", contributor_login(index)),
                "contributions": 500 - index,
                "type": "User",
                "site_admin": false
            })
        })
        .collect();
    serde_json::Value::Array(contributors)
}

pub fn contributor_login(index: u64) -> String {
    format!("login_{}", index)
}

pub fn assert_security_headers(response: &Response<()>) {
    for (name, value) in lazycli_site::SECURITY_HEADERS {
        assert_eq!(
            response.headers().get(&name).map(|v| v.to_str().unwrap()),
            Some(value),
            "Missing security header {}",
            name
        );
    }
}

pub struct NoAuthorization;
impl Match for NoAuthorization {
    fn matches(&self, request: &wiremock::Request) -> bool {
        !request
            .headers
            .keys()
            .any(|name| name.as_str().eq_ignore_ascii_case("authorization"))
    }
}
