//! Merge hints for customized files
//!
//! The installer never merges content itself. For every customized file whose
//! upstream version differs, it can render a unified diff from the live file
//! to the upstream file so the user can merge by hand.

use aos_fs::io;
use similar::TextDiff;

use super::action::{Plan, SyncAction};
use crate::layer::LayerName;

/// Unified diff between a customized file and its upstream version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeHint {
    pub logical_path: String,
    pub layer: LayerName,
    pub diff: String,
}

impl MergeHint {
    /// Render a unified diff from `live` to `upstream`.
    pub fn new(logical_path: &str, layer: LayerName, live: &str, upstream: &str) -> Self {
        let diff = TextDiff::from_lines(live, upstream)
            .unified_diff()
            .context_radius(3)
            .header(
                &format!("installed/{}", logical_path),
                &format!("{}/{}", layer, logical_path),
            )
            .to_string();

        Self {
            logical_path: logical_path.to_string(),
            layer,
            diff,
        }
    }

    /// Hints for every path of `plan` that requires a manual merge.
    ///
    /// Live files that cannot be read any more are skipped.
    pub fn collect(plan: &Plan) -> Vec<Self> {
        plan.actions
            .iter()
            .filter(|a| {
                a.action == SyncAction::SkipCustomized && !a.removed_upstream && !a.is_reconciled()
            })
            .filter_map(|a| {
                let entry = a.entry.as_ref()?;
                let live = match io::read_bytes(&a.destination) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(path = %a.logical_path, error = %e, "Cannot read installed file");
                        return None;
                    }
                };
                Some(Self::new(
                    &a.logical_path,
                    entry.source_layer,
                    &String::from_utf8_lossy(&live),
                    &String::from_utf8_lossy(&entry.content),
                ))
            })
            .collect()
    }
}
