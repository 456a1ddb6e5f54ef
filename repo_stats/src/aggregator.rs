use crate::api::{Client, Contributor, Error, RepoCounts, RepoSlug};
use log::{debug, error};
use serde::Serialize;
use std::sync::Arc;

/// Most contributors a snapshot carries.
pub const MAX_CONTRIBUTORS: usize = 12;

/// Label put in `error` of every failure payload.
pub const FAILURE_LABEL: &str = "Failed to fetch GitHub data";

/// Snapshot of a repository served to the website.
///
/// `error` and `message` are only serialized for the failure payload, the
/// other four fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub contributors: Vec<Contributor>,
}

impl RepoStats {
    pub fn success(counts: RepoCounts, contributors: Vec<Contributor>) -> Self {
        RepoStats {
            error: None,
            message: None,
            stars: counts.stars,
            forks: counts.forks,
            open_issues: counts.open_issues,
            contributors: take_first_n(contributors, MAX_CONTRIBUTORS),
        }
    }

    pub fn failure(err: &Error) -> Self {
        RepoStats {
            error: Some(FAILURE_LABEL.to_string()),
            message: Some(err.to_string()),
            stars: 0,
            forks: 0,
            open_issues: 0,
            contributors: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

pub struct StatsAggregator<CLIENT>
where
    CLIENT: 'static + Client,
{
    client: Arc<CLIENT>,
    repo: RepoSlug,
}

impl<CLIENT> Clone for StatsAggregator<CLIENT>
where
    CLIENT: 'static + Client,
{
    fn clone(&self) -> Self {
        StatsAggregator {
            client: self.client.clone(),
            repo: self.repo.clone(),
        }
    }
}

impl<CLIENT> StatsAggregator<CLIENT>
where
    CLIENT: 'static + Client,
{
    pub fn new(client: CLIENT, repo: RepoSlug) -> Self {
        StatsAggregator {
            client: Arc::new(client),
            repo,
        }
    }

    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    /// Fresh snapshot of the tracked repository.
    ///
    /// Never fails: any upstream error turns into the failure payload.
    pub async fn stats(&self) -> RepoStats {
        match self.try_stats().await {
            Ok(stats) => {
                debug!(
                    "{}: {} stars, {} forks, {} open issues, {} contributors",
                    self.repo,
                    stats.stars,
                    stats.forks,
                    stats.open_issues,
                    stats.contributors.len()
                );
                stats
            }
            Err(err) => {
                error!("Error fetching GitHub data for {} ({}): {}", self.repo, err.kind(), err);
                RepoStats::failure(&err)
            }
        }
    }

    /// Both upstream reads run concurrently and both must succeed.
    pub async fn try_stats(&self) -> Result<RepoStats, Error> {
        let (counts, contributors) = futures::try_join!(
            self.client.repo_counts(&self.repo),
            self.client.contributors(&self.repo)
        )?;
        Ok(RepoStats::success(counts, contributors))
    }
}

fn take_first_n<T>(v: Vec<T>, n: usize) -> Vec<T> {
    v.into_iter().take(n).collect()
}
