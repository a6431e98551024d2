//! Reference field listing used to badge ECS fields.
//!
//! The listing is a flattened ECS schema (`ecs_flat.yml`): either a mapping
//! keyed by dotted field path or a plain list of paths. It is loaded on the
//! first membership query and kept for the rest of the process.

use crate::error::{Error, Result};
use serde_yaml::Value;
use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Pinned ECS version of the default listing.
pub const ECS_VERSION: &str = "1.6.0";

/// Flattened ECS field listing for [`ECS_VERSION`].
pub const DEFAULT_ECS_URL: &str =
    "https://raw.githubusercontent.com/elastic/ecs/v1.6.0/generated/ecs/ecs_flat.yml";

/// Answers "is this dotted path a member of the reference schema?".
pub trait ReferenceSource {
    fn contains(&self, path: &str) -> Result<bool>;
}

/// Where the listing is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => f.write_str(url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::Url(DEFAULT_ECS_URL.to_string())
    }
}

/// ECS listing loaded at most once, on first use.
#[derive(Debug, Default)]
pub struct EcsReference {
    location: Location,
    fields: OnceCell<HashSet<String>>,
}

impl EcsReference {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            fields: OnceCell::new(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    fn fields(&self) -> Result<&HashSet<String>> {
        if let Some(fields) = self.fields.get() {
            return Ok(fields);
        }
        let body = match &self.location {
            Location::Url(url) => fetch(url)?,
            Location::File(path) => fs::read_to_string(path).map_err(|e| self.fail(e))?,
        };
        let fields = parse_listing(&body).map_err(|e| self.fail(e))?;
        info!(location = %self.location, fields = fields.len(), "loaded reference fields");
        Ok(self.fields.get_or_init(|| fields))
    }

    fn fail(&self, reason: impl fmt::Display) -> Error {
        Error::ReferenceFetch {
            location: self.location.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ReferenceSource for EcsReference {
    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.fields()?.contains(path))
    }
}

/// Single GET, no retry. Anything but `200 OK` is an error.
fn fetch(url: &str) -> Result<String> {
    let fail = |reason: String| Error::ReferenceFetch {
        location: url.to_string(),
        reason,
    };

    debug!(url, "fetching reference fields");
    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            return Err(fail(format!("HTTP {}: {}", code, body.trim())));
        }
        Err(e) => return Err(fail(e.to_string())),
    };

    if response.status() != 200 {
        return Err(fail(format!(
            "HTTP {} {}",
            response.status(),
            response.status_text()
        )));
    }

    response.into_string().map_err(|e| fail(e.to_string()))
}

/// Collect field paths from a mapping (keys) or a sequence of strings.
fn parse_listing(body: &str) -> std::result::Result<HashSet<String>, String> {
    let value: Value = serde_yaml::from_str(body).map_err(|e| e.to_string())?;
    match value {
        Value::Mapping(map) => Ok(map
            .into_iter()
            .filter_map(|(k, _)| k.as_str().map(str::to_string))
            .collect()),
        Value::Sequence(seq) => Ok(seq
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()),
        Value::Null => Ok(HashSet::new()),
        _ => Err("expected a mapping or list of field names".to_string()),
    }
}

/// Fixed membership set, no I/O.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticReference {
    pub fields: HashSet<String>,
    pub queries: std::cell::Cell<usize>,
}

#[cfg(test)]
impl StaticReference {
    pub fn with(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            queries: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl ReferenceSource for StaticReference {
    fn contains(&self, path: &str) -> Result<bool> {
        self.queries.set(self.queries.get() + 1);
        Ok(self.fields.contains(path))
    }
}
