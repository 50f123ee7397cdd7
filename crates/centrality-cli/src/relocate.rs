//! Moving simulation artifacts into per-class folders
//!
//! A results folder holds the raw outputs of every event:
//!
//! ```text
//! <root>/HYDRO_RESULTS/hydro_results_<n>/
//! <root>/URQMD_RESULTS/particle_list_<n>.gz
//! ```
//!
//! After classification they are moved to `HYDRO_RESULTS/<class>/` and
//! `URQMD_RESULTS/<class>/`, where `<n>` is the part of the event id after its
//! last `_`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use centrality_data::mapping::ConfigurationMapping;

const HYDRO_DIR: &str = "HYDRO_RESULTS";
const URQMD_DIR: &str = "URQMD_RESULTS";

/// The artifact folders present under a results root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactDirs {
    pub hydro: Option<PathBuf>,
    pub urqmd: Option<PathBuf>,
}

impl ArtifactDirs {
    pub fn find(root: &Path) -> Self {
        let existing = |name: &str| Some(root.join(name)).filter(|path| path.is_dir());
        Self {
            hydro: existing(HYDRO_DIR),
            urqmd: existing(URQMD_DIR),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hydro.is_none() && self.urqmd.is_none()
    }

    fn kinds(&self) -> impl Iterator<Item = (&Path, fn(&str) -> String)> {
        let hydro = self
            .hydro
            .as_deref()
            .map(|dir| (dir, hydro_artifact as fn(&str) -> String));
        let urqmd = self
            .urqmd
            .as_deref()
            .map(|dir| (dir, urqmd_artifact as fn(&str) -> String));
        hydro.into_iter().chain(urqmd)
    }
}

fn hydro_artifact(number: &str) -> String {
    format!("hydro_results_{number}")
}

fn urqmd_artifact(number: &str) -> String {
    format!("particle_list_{number}.gz")
}

/// The artifact number of an event id: `event_17` -> `17`.
fn event_number(event_id: &str) -> &str {
    event_id.rsplit('_').next().unwrap_or(event_id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationStats {
    pub moved: usize,
    pub missing: usize,
}

/// Recreates one folder per class label and moves each member's artifacts
/// into the folder of its class.
///
/// Existing class folders are removed first. Artifacts that do not exist are
/// counted as missing and skipped.
pub fn relocate(
    dirs: &ArtifactDirs,
    labels: &[String],
    mapping: &ConfigurationMapping,
) -> anyhow::Result<RelocationStats> {
    let mut class_labels = Vec::<&str>::new();
    for label in labels.iter().map(String::as_str).chain(mapping.keys()) {
        if !class_labels.contains(&label) {
            class_labels.push(label);
        }
    }

    for label in class_labels {
        for (dir, _) in dirs.kinds() {
            let class_dir = dir.join(label);
            if class_dir.exists() {
                fs::remove_dir_all(&class_dir).with_context(|| {
                    format!("Failed to remove class folder: {}", class_dir.display())
                })?;
            }
            fs::create_dir(&class_dir).with_context(|| {
                format!("Failed to create class folder: {}", class_dir.display())
            })?;
        }
    }

    let mut stats = RelocationStats::default();
    for (label, members) in mapping {
        println!("Moving {} events to {label}...", members.len());
        for event_id in members.keys() {
            let number = event_number(event_id);
            for (dir, artifact) in dirs.kinds() {
                let name = artifact(number);
                let source = dir.join(&name);
                if !source.exists() {
                    tracing::debug!(event = event_id, artifact = %source.display(), "artifact missing");
                    stats.missing += 1;
                    continue;
                }
                let target = dir.join(label).join(&name);
                fs::rename(&source, &target).with_context(|| {
                    format!(
                        "Failed to move {} to {}",
                        source.display(),
                        target.display()
                    )
                })?;
                stats.moved += 1;
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use centrality_data::mapping::{ClassAssignments, EventAssignment};

    use super::*;

    fn members(ids: &[&str]) -> ClassAssignments {
        ids.iter()
            .map(|id| {
                let assignment = EventAssignment {
                    centrality_range: [0.0, 0.5],
                    centrality_value: 1.0,
                };
                (*id, assignment)
            })
            .collect()
    }

    #[test]
    fn test_event_number() {
        assert_eq!(event_number("event_17"), "17");
        assert_eq!(event_number("spvn_event_3"), "3");
        assert_eq!(event_number("42"), "42");
    }

    #[test]
    fn test_find_dirs() {
        let root = tempfile::tempdir().unwrap();
        assert!(ArtifactDirs::find(root.path()).is_empty());
        fs::create_dir(root.path().join(URQMD_DIR)).unwrap();
        let dirs = ArtifactDirs::find(root.path());
        assert_eq!(dirs.hydro, None);
        assert_eq!(dirs.urqmd, Some(root.path().join(URQMD_DIR)));
    }

    #[test]
    fn test_relocate() {
        let root = tempfile::tempdir().unwrap();
        let hydro = root.path().join(HYDRO_DIR);
        let urqmd = root.path().join(URQMD_DIR);
        fs::create_dir_all(hydro.join("hydro_results_1")).unwrap();
        fs::create_dir_all(hydro.join("hydro_results_2")).unwrap();
        fs::create_dir(&urqmd).unwrap();
        fs::write(urqmd.join("particle_list_1.gz"), b"").unwrap();
        // stale class folder from an earlier run
        fs::create_dir_all(hydro.join("C0-50").join("hydro_results_9")).unwrap();

        let mut mapping = ConfigurationMapping::new();
        mapping.insert("C0-50", members(&["event_1"]));
        mapping.insert("C50-100", members(&["event_2"]));

        let dirs = ArtifactDirs::find(root.path());
        let labels = ["C0-50", "C50-100", "C90-100"].map(str::to_owned);
        let stats = relocate(&dirs, &labels, &mapping).unwrap();
        assert_eq!(stats, RelocationStats { moved: 3, missing: 1 });

        assert!(hydro.join("C0-50/hydro_results_1").is_dir());
        assert!(!hydro.join("C0-50/hydro_results_9").exists());
        assert!(hydro.join("C50-100/hydro_results_2").is_dir());
        assert!(urqmd.join("C0-50/particle_list_1.gz").is_file());
        assert!(urqmd.join("C90-100").is_dir());
        assert!(!hydro.join("hydro_results_1").exists());
    }
}
