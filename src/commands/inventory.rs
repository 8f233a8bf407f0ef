use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{VolumeEntry, VolumeInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_root)?;

    if args.dry_run {
        info!(
            volume_count = manifest.volume_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args.manifest_path.unwrap_or_else(|| {
        args.input_root
            .join("manifests")
            .join("volume_inventory.json")
    });

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(volume_count = manifest.volume_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(input_root: &Path) -> Result<VolumeInventoryManifest> {
    let volume_pattern = Regex::new(r"(?i)vol(?:ume)?[ ._-]*([0-9]+)")
        .context("failed to compile volume filename regex")?;

    let mut pdf_paths = discover_pdfs(input_root)?;
    pdf_paths.sort();

    if pdf_paths.is_empty() {
        bail!("no PDFs found in {}", input_root.display());
    }

    let mut volumes = Vec::with_capacity(pdf_paths.len());
    for path in pdf_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let volume_number = parse_volume_number(&filename, &volume_pattern);
        let sha256 = sha256_file(&path)?;

        volumes.push(VolumeEntry {
            filename,
            volume_number,
            sha256,
        });
    }

    volumes.sort_by(|a, b| {
        a.volume_number
            .cmp(&b.volume_number)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    Ok(VolumeInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_root.display().to_string(),
        volume_count: volumes.len(),
        volumes,
    })
}

fn discover_pdfs(input_root: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    let entries = fs::read_dir(input_root)
        .with_context(|| format!("failed to read {}", input_root.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_root.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            pdfs.push(path);
        }
    }

    Ok(pdfs)
}

fn parse_volume_number(filename: &str, pattern: &Regex) -> Option<u32> {
    pattern
        .captures(filename)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::parse_volume_number;

    #[test]
    fn parse_volume_number_accepts_common_filename_forms() {
        let pattern = Regex::new(r"(?i)vol(?:ume)?[ ._-]*([0-9]+)").expect("pattern compiles");

        assert_eq!(
            parse_volume_number("CRR-SWEIS_Volume_2.pdf", &pattern),
            Some(2)
        );
        assert_eq!(parse_volume_number("sweis vol 1.pdf", &pattern), Some(1));
        assert_eq!(parse_volume_number("SWEIS-Vol3-final.pdf", &pattern), Some(3));
        assert_eq!(parse_volume_number("appendices.pdf", &pattern), None);
    }
}
