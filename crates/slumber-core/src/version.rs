//! Release version comparison.

use serde::Deserialize;
use tracing::debug;

use crate::error::ReleaseError;

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// Pull the version out of a GitHub "latest release" document.
pub fn parse_release_tag(json: &str) -> Result<String, ReleaseError> {
    let release: Release = serde_json::from_str(json)?;
    let tag = strip_tag_prefix(release.tag_name.trim());
    if tag.is_empty() {
        return Err(ReleaseError::EmptyTag);
    }
    Ok(tag.to_string())
}

/// `v1.2.3` → `1.2.3`.
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag)
}

fn components(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect()
}

/// Whether `latest` is a newer dotted version than `current`.
///
/// Components compare numerically; missing trailing components count as 0.
/// Anything non-numeric is treated as "not newer".
pub fn is_newer(current: &str, latest: &str) -> bool {
    let (Some(cur), Some(lat)) = (
        components(strip_tag_prefix(current)),
        components(strip_tag_prefix(latest)),
    ) else {
        debug!("Cannot compare versions {current} and {latest}");
        return false;
    };
    let len = cur.len().max(lat.len());
    for i in 0..len {
        let c = cur.get(i).copied().unwrap_or(0);
        let l = lat.get(i).copied().unwrap_or(0);
        if l != c {
            return l > c;
        }
    }
    false
}
