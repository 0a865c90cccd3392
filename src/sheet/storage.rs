use super::types::ClassSheet;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

/// Load a class sheet from a JSON file
pub fn load_sheet(path: &Path) -> Result<ClassSheet> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open class sheet at {}", path.display()))?;

    let sheet: ClassSheet = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse class sheet {}", path.display()))?;

    Ok(sheet)
}

/// Save a class sheet to a JSON file atomically
///
/// Uses atomic-write-file so a crash mid-write never leaves half a sheet.
pub fn save_sheet(path: &Path, sheet: &ClassSheet) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, sheet).context("Failed to serialize class sheet")?;

    file.commit().context("Failed to save class sheet")?;

    Ok(())
}
