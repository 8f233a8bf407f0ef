use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "sweisref",
    version,
    about = "SWEIS internal cross-reference audit tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Check(CheckArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = ".")]
    pub input_root: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long, default_value = ".")]
    pub input_root: PathBuf,

    #[arg(long)]
    pub inventory_manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub check_manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub refresh_inventory: bool,

    /// Restrict the run to specific volume numbers (repeatable).
    #[arg(long = "volume")]
    pub volumes: Vec<u32>,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    /// Characters scanned around a match for external-document and
    /// regulatory citation markers.
    #[arg(long, default_value_t = 200)]
    pub filter_window: usize,

    /// Characters scanned before a match for source attributions and
    /// legal-code phrasing.
    #[arg(long, default_value_t = 150)]
    pub source_window: usize,

    /// Characters of surrounding text kept with each reference for review.
    #[arg(long, default_value_t = 150)]
    pub context_window: usize,

    /// Stored locations per unique reference; further occurrences are
    /// counted but not listed.
    #[arg(long, default_value_t = 5)]
    pub max_locations: usize,

    /// Additional external-document marker phrases (repeatable), appended
    /// to the built-in list.
    #[arg(long = "external-marker")]
    pub external_markers: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub input_root: PathBuf,
}
