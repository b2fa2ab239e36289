//! CSV import command

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use banto_core::{import_csv, Database};

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing daily records from {}...", file.display());

    let reader = File::open(file)
        .with_context(|| format!("Failed to open CSV file: {}", file.display()))?;

    let result = import_csv(db, reader).context("Import failed")?;

    println!(
        "✅ Imported {} records ({} replaced existing rows)",
        result.imported, result.replaced
    );

    Ok(())
}
