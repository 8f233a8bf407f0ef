use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub filename: String,
    pub volume_number: Option<u32>,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub volume_count: usize,
    pub volumes: Vec<VolumeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub rustc: String,
    pub cargo: String,
    pub pdftotext: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckPaths {
    pub input_root: String,
    pub manifest_dir: String,
    pub inventory_manifest_path: String,
    pub report_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KindCounts {
    pub kind: String,
    pub references: usize,
    pub targets: usize,
    pub matched: usize,
    pub orphaned: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckCounts {
    pub volume_count: usize,
    pub processed_volume_count: usize,
    pub page_count: usize,
    pub empty_page_count: usize,
    pub reference_candidates: usize,
    pub unique_references: usize,
    pub unique_targets: usize,
    pub matched_references: usize,
    pub orphaned_references: usize,
    pub filtered_references: usize,
    pub per_kind: Vec<KindCounts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub paths: CheckPaths,
    pub counts: CheckCounts,
    pub source_hashes: Vec<VolumeEntry>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunSnapshot {
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<String>,
    pub updated_at: Option<String>,
    pub counts: Option<CheckCountsSnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckCountsSnapshot {
    pub unique_references: Option<usize>,
    pub unique_targets: Option<usize>,
    pub matched_references: Option<usize>,
    pub orphaned_references: Option<usize>,
    pub filtered_references: Option<usize>,
}
