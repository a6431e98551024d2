//! Output writer — streams a rendered document to `docs/fields.asciidoc`.

use crate::error::Result;
use crate::render::Document;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Directory under the output path that receives the document.
pub const DOCS_DIR: &str = "docs";

/// Fixed name of the generated document.
pub const OUTPUT_FILE: &str = "fields.asciidoc";

/// Path of the generated document for an output root.
pub fn target_path(output_root: &Path) -> PathBuf {
    output_root.join(DOCS_DIR).join(OUTPUT_FILE)
}

/// Write preamble, TOC and bodies in order, replacing the target in one
/// rename. The temporary file is removed if any step fails.
pub fn write_document(doc: &Document, output_root: &Path) -> Result<PathBuf> {
    let target = target_path(output_root);
    let dir = output_root.join(DOCS_DIR);
    fs::create_dir_all(&dir)?;

    let tmp = NamedTempFile::new_in(&dir)?;
    let mut writer = BufWriter::new(tmp);
    for part in doc.parts() {
        writer.write_all(part.as_bytes())?;
    }
    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    if let Some(permissions) = document_permissions(&target) {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), sections = doc.bodies.len(), "wrote fields document");
    Ok(target)
}

/// Keep the mode of an existing document; new documents are 0644.
fn document_permissions(target: &Path) -> Option<fs::Permissions> {
    if let Ok(metadata) = fs::metadata(target) {
        return Some(metadata.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}
