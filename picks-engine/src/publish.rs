use chrono::{DateTime, FixedOffset, Utc};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::process::Output;
use thiserror::Error;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {step} exited with {code:?}: {stderr}")]
    Git {
        step: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("webhook returned {0}")]
    WebhookStatus(StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed,
    NothingToCommit,
}

pub struct GitPublisher {
    repo_dir: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(repo_dir: PathBuf, remote: String, branch: String) -> Self {
        Self {
            repo_dir,
            remote,
            branch,
        }
    }

    /// Stage `paths`, commit and push. Paths that do not exist yet are
    /// skipped, and a clean index after staging is not an error.
    pub async fn publish(&self, paths: &[&Path], message: &str) -> Result<PublishOutcome, PublishError> {
        let mut add = vec!["add".to_string(), "--".to_string()];
        for path in paths {
            // Paths are relative to our working directory, git runs in the repo
            match fs::canonicalize(path).await {
                Ok(path) => add.push(path.display().to_string()),
                Err(_) => debug!("Not staging missing {}", path.display()),
            }
        }
        if add.len() == 2 {
            info!("Nothing to stage, skipping push");
            return Ok(PublishOutcome::NothingToCommit);
        }
        self.run("add", &add).await?;

        // `diff --cached --quiet` exits 0 when nothing is staged
        let diff = self.output(&["diff", "--cached", "--quiet"]).await?;
        if diff.status.success() {
            info!("Nothing to commit, skipping push");
            return Ok(PublishOutcome::NothingToCommit);
        }

        self.run("commit", &["commit", "-m", message]).await?;
        self.run("push", &["push", self.remote.as_str(), self.branch.as_str()])
            .await?;

        info!("🚀 Pushed to {}/{}", self.remote, self.branch);
        Ok(PublishOutcome::Pushed)
    }

    async fn output<S: AsRef<str>>(&self, args: &[S]) -> Result<Output, PublishError> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        debug!("git {}", args.join(" "));
        Ok(Command::new("git")
            .args(&args)
            .current_dir(&self.repo_dir)
            .output()
            .await?)
    }

    async fn run<S: AsRef<str>>(&self, step: &'static str, args: &[S]) -> Result<(), PublishError> {
        let output = self.output(args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PublishError::Git {
                step,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

pub fn commit_message(week: u32, at: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "Auto-update: Week {} picks - {}",
        week,
        at.with_timezone(&offset).format("%Y-%m-%d %H:%M")
    )
}
