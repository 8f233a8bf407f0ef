use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{CheckRunSnapshot, VolumeInventoryManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.input_root.join("manifests");
    let inventory_path = manifest_dir.join("volume_inventory.json");

    info!(input_root = %args.input_root.display(), "status requested");

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: VolumeInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            volume_count = inventory.volume_count,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    match latest_check_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let snapshot: CheckRunSnapshot = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let counts = snapshot.counts.unwrap_or_default();

            info!(
                path = %path.display(),
                run_id = %snapshot.run_id.unwrap_or_default(),
                status = %snapshot.status.unwrap_or_default(),
                started_at = %snapshot.started_at.unwrap_or_default(),
                updated_at = %snapshot.updated_at.unwrap_or_default(),
                unique_references = counts.unique_references.unwrap_or_default(),
                unique_targets = counts.unique_targets.unwrap_or_default(),
                matched = counts.matched_references.unwrap_or_default(),
                orphaned = counts.orphaned_references.unwrap_or_default(),
                filtered = counts.filtered_references.unwrap_or_default(),
                "loaded latest check run manifest"
            );
        }
        None => {
            warn!(path = %manifest_dir.display(), "no check run manifests found");
        }
    }

    Ok(())
}

// Run manifests carry a sortable UTC stamp in the filename, so the
// lexicographically last one is the most recent.
fn latest_check_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut manifests = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let is_check_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("check_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        if is_check_manifest {
            manifests.push(path);
        }
    }

    manifests.sort();
    Ok(manifests.pop())
}
