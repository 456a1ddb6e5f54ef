use clap::Parser;
use repo_stats::api::RepoSlug;
use secrecy::SecretString;
use std::{
    fmt::Display,
    net::SocketAddr,
    str::FromStr,
    time::Duration,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// GitHub API access token, requests are unauthenticated without it
    #[clap(long, env = "GITHUB_TOKEN")]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Owner of the tracked repository
    #[clap(long, env = "GITHUB_OWNER", default_value = "iammhador")]
    pub owner: String,

    /// Name of the tracked repository
    #[clap(long, env = "GITHUB_REPO", default_value = "lazycli")]
    pub repo: String,

    /// User agent sent to the API
    #[clap(long, env = "GITHUB_USER_AGENT", default_value = "LazyCLI-Website")]
    pub user_agent: String,

    /// Address to listen on
    #[clap(short, long, env, default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Upstream request timeout in seconds
    #[clap(short, long, env = "UPSTREAM_TIMEOUT", default_value_t = 5, parse(try_from_str=timeout_in_range))]
    pub timeout: u64,

    /// Seconds shared caches may keep (and serve stale) a successful response
    #[clap(long, env, default_value_t = 300, parse(try_from_str=cache_max_age_in_range))]
    pub cache_max_age: u32,
}

impl Args {
    pub fn repo_slug(&self) -> RepoSlug {
        RepoSlug::new(self.owner.clone(), self.repo.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn timeout_in_range(value: &str) -> clap::Result<u64, String> {
    number_in_range(value, 1, 60, "timeout".to_string())
}

fn cache_max_age_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 0, 86400, "cache_max_age".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[test]
fn number_in_range_test() {
    assert_eq!(timeout_in_range("5"), Ok(5));
    assert!(timeout_in_range("0").is_err());
    assert!(timeout_in_range("61").is_err());
    assert!(timeout_in_range("five").is_err());
    assert_eq!(cache_max_age_in_range("0"), Ok(0));
    assert_eq!(
        cache_max_age_in_range("86401"),
        Err("cache_max_age is not in range 0 .. 86400.".to_string())
    );
}

#[test]
fn parse_test() {
    let args = Args::parse_from([
        "lazycli_site",
        "--owner",
        "rust-lang",
        "--repo",
        "rust",
        "--timeout",
        "2",
        "--bind",
        "127.0.0.1:8080",
    ]);
    assert_eq!(args.repo_slug().to_string(), "rust-lang/rust");
    assert_eq!(args.timeout(), Duration::from_secs(2));
    assert_eq!(args.bind, "127.0.0.1:8080".parse().unwrap());
}

#[test]
fn timeout_out_of_range_test() {
    assert!(Args::try_parse_from(["lazycli_site", "--timeout", "0"]).is_err());
}
