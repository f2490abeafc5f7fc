//! Release check against the GitHub releases API.
//!
//! The request runs on the ambient tokio runtime; its outcome travels back
//! to the tick thread over an unbounded channel.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use slumber_core::version::{is_newer, parse_release_tag};
use slumber_core::ReleaseError;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate { current: String },
    Available { current: String, latest: String },
}

impl UpdateStatus {
    pub fn compare(current: &str, latest: &str) -> Self {
        if is_newer(current, latest) {
            UpdateStatus::Available {
                current: current.to_string(),
                latest: latest.to_string(),
            }
        } else {
            UpdateStatus::UpToDate {
                current: current.to_string(),
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("no tokio runtime to run the update check on")]
    NoRuntime,

    #[error("release request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected release document: {0}")]
    Release(#[from] ReleaseError),
}

pub fn releases_url(repository: &str) -> String {
    format!("https://api.github.com/repos/{repository}/releases/latest")
}

/// Fetch the newest release version (without its `v` prefix).
pub async fn fetch_latest(repository: &str, current: &str) -> Result<String, UpdateError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let body = client
        .get(releases_url(repository))
        .header(ACCEPT, "application/vnd.github.v3+json")
        .header(USER_AGENT, format!("Slumber-UpdateChecker/{current}"))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_release_tag(&body)?)
}

/// Start a background check. Failures past this point are logged, never
/// reported: a missing result just means no notification.
pub fn spawn_check(
    repository: String,
    current: String,
    tx: UnboundedSender<UpdateStatus>,
) -> Result<(), UpdateError> {
    let handle = Handle::try_current().map_err(|_| UpdateError::NoRuntime)?;
    handle.spawn(async move {
        debug!("Checking for updates from {}", releases_url(&repository));
        match fetch_latest(&repository, &current).await {
            Ok(latest) => {
                let _ = tx.send(UpdateStatus::compare(&current, &latest));
            }
            Err(e) => warn!("Could not check for updates: {e}"),
        }
    });
    Ok(())
}
