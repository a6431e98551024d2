//! Schema loading — read, parse and merge `fields.yml`.

pub mod merge;
pub mod yaml;

use crate::error::{Error, Result};
use crate::model::Section;
use std::fs;
use std::path::Path;
use tracing::info;

/// Load a schema file and merge duplicate field definitions.
pub fn load_file(path: &Path) -> Result<Vec<Section>> {
    let content = fs::read_to_string(path).map_err(|e| Error::MissingInput {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut sections = yaml::parse(&content, path)?;
    merge::merge(&mut sections)?;
    info!(path = %path.display(), sections = sections.len(), "loaded schema");
    Ok(sections)
}
