use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::CheckArgs;
use crate::commands::inventory;
use crate::model::{
    CheckCounts, CheckPaths, CheckRunManifest, VolumeEntry, VolumeInventoryManifest,
};
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

use super::audit::{ReferenceAudit, summarize_by_kind};
use super::pages::{collect_tool_versions, extract_volume_pages};
use super::report::render_report;
use super::types::{AuditConfig, PageRecord, default_external_markers};

pub fn run(args: CheckArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let input_root = args.input_root.clone();
    let manifest_dir = input_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let inventory_manifest_path = args
        .inventory_manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join("volume_inventory.json"));
    let check_manifest_path = args.check_manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!("check_run_{}.json", utc_compact_string(started_ts)))
    });
    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| input_root.join("sweis_ref_report.txt"));

    info!(input_root = %input_root.display(), run_id = %run_id, "starting reference check");

    let inventory = load_or_refresh_inventory(
        &input_root,
        &inventory_manifest_path,
        args.refresh_inventory,
    )?;

    let tool_versions = collect_tool_versions()?;

    let config = audit_config(&args);
    let mut audit = ReferenceAudit::new(config)?;

    let mut warnings = Vec::new();
    let mut processed_volume_count = 0usize;
    let mut page_count = 0usize;
    let mut empty_page_count = 0usize;

    for entry in &inventory.volumes {
        if !volume_selected(entry, &args.volumes) {
            continue;
        }

        let pdf_path = input_root.join(&entry.filename);
        let pages = extract_volume_pages(&pdf_path, args.max_pages_per_doc)?;
        info!(volume = %entry.filename, pages = pages.len(), "extracted page text");

        if pages.is_empty() {
            warn!(volume = %entry.filename, "no extractable text layer");
            warnings.push(format!("no extractable text in {}", entry.filename));
        }

        for (index, text) in pages.into_iter().enumerate() {
            if text.trim().is_empty() {
                empty_page_count += 1;
            }
            page_count += 1;

            let record = PageRecord {
                volume: entry.filename.clone(),
                page: (index + 1) as u32,
                text,
            };
            audit.ingest_page(&record)?;
        }

        processed_volume_count += 1;
    }

    let outcome = audit.finish();
    let per_kind = summarize_by_kind(&outcome);

    let report = render_report(&outcome, &per_kind);
    fs::write(&report_path, report)
        .with_context(|| format!("failed to write {}", report_path.display()))?;
    info!(path = %report_path.display(), "wrote reference check report");

    let updated_at = now_utc_string();
    let manifest = CheckRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at,
        command: render_check_command(&args),
        tool_versions,
        paths: CheckPaths {
            input_root: input_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            inventory_manifest_path: inventory_manifest_path.display().to_string(),
            report_path: report_path.display().to_string(),
        },
        counts: CheckCounts {
            volume_count: inventory.volume_count,
            processed_volume_count,
            page_count,
            empty_page_count,
            reference_candidates: outcome.candidate_count,
            unique_references: outcome.matched.len() + outcome.orphaned.len(),
            unique_targets: outcome.targets.len(),
            matched_references: outcome.matched.len(),
            orphaned_references: outcome.orphaned.len(),
            filtered_references: outcome.filtered.len(),
            per_kind,
        },
        source_hashes: inventory.volumes,
        warnings,
        notes: vec![
            "Reference and target extraction uses the pdftotext text layer.".to_string(),
            "Matching runs over the union of targets across all processed volumes.".to_string(),
        ],
    };

    write_json_pretty(&check_manifest_path, &manifest)?;
    info!(path = %check_manifest_path.display(), "wrote check run manifest");
    info!(
        matched = manifest.counts.matched_references,
        orphaned = manifest.counts.orphaned_references,
        filtered = manifest.counts.filtered_references,
        "reference check completed"
    );

    Ok(())
}

fn audit_config(args: &CheckArgs) -> AuditConfig {
    let mut external_document_markers = default_external_markers();
    external_document_markers.extend(args.external_markers.iter().cloned());

    AuditConfig {
        filter_window: args.filter_window,
        source_window: args.source_window,
        context_window: args.context_window,
        max_locations: args.max_locations,
        external_document_markers,
    }
}

fn volume_selected(entry: &VolumeEntry, selected: &[u32]) -> bool {
    if selected.is_empty() {
        return true;
    }
    entry
        .volume_number
        .map(|number| selected.contains(&number))
        .unwrap_or(false)
}

fn load_or_refresh_inventory(
    input_root: &Path,
    inventory_manifest_path: &Path,
    refresh_inventory: bool,
) -> Result<VolumeInventoryManifest> {
    if refresh_inventory || !inventory_manifest_path.exists() {
        let manifest = inventory::build_manifest(input_root)?;
        write_json_pretty(inventory_manifest_path, &manifest)?;
        info!(
            path = %inventory_manifest_path.display(),
            volume_count = manifest.volume_count,
            "refreshed inventory manifest"
        );
        return Ok(manifest);
    }

    let raw = fs::read(inventory_manifest_path)
        .with_context(|| format!("failed to read {}", inventory_manifest_path.display()))?;
    let manifest: VolumeInventoryManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", inventory_manifest_path.display()))?;

    info!(
        path = %inventory_manifest_path.display(),
        volume_count = manifest.volume_count,
        "loaded existing inventory manifest"
    );

    Ok(manifest)
}

fn render_check_command(args: &CheckArgs) -> String {
    let mut command = vec![
        "sweisref".to_string(),
        "check".to_string(),
        "--input-root".to_string(),
        args.input_root.display().to_string(),
    ];

    if let Some(path) = &args.inventory_manifest_path {
        command.push("--inventory-manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.check_manifest_path {
        command.push("--check-manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.report_path {
        command.push("--report-path".to_string());
        command.push(path.display().to_string());
    }
    if args.refresh_inventory {
        command.push("--refresh-inventory".to_string());
    }
    for volume in &args.volumes {
        command.push("--volume".to_string());
        command.push(volume.to_string());
    }
    if let Some(max_pages) = args.max_pages_per_doc {
        command.push("--max-pages-per-doc".to_string());
        command.push(max_pages.to_string());
    }
    for marker in &args.external_markers {
        command.push("--external-marker".to_string());
        command.push(format!("\"{marker}\""));
    }

    command.join(" ")
}
