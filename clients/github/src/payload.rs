use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
}

impl From<Repo> for repo_stats::api::RepoCounts {
    fn from(repo: Repo) -> Self {
        repo_stats::api::RepoCounts {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
        }
    }
}

/// Contributors decode straight into the domain type, which keeps unknown fields.
pub type Contributors = Vec<repo_stats::api::Contributor>;

#[test]
fn repo_test() -> anyhow::Result<()> {
    let body = r#"{
        "id": 1296269,
        "full_name": "iammhador/lazycli",
        "stargazers_count": 42,
        "forks_count": 7,
        "open_issues_count": 3
    }"#;
    let counts = repo_stats::api::RepoCounts::from(serde_json::from_str::<Repo>(body)?);
    assert_eq!(counts, repo_stats::api::RepoCounts::new(42, 7, 3));
    Ok(())
}

#[test]
fn repo_missing_field_test() {
    let body = r#"{ "stargazers_count": 42, "forks_count": 7 }"#;
    assert!(serde_json::from_str::<Repo>(body).is_err());
}

#[test]
fn contributor_missing_login_test() {
    let body = r#"[{ "id": 1, "avatar_url": "a", "html_url": "h", "contributions": 1, "type": "User" }]"#;
    assert!(serde_json::from_str::<Contributors>(body).is_err());
}
