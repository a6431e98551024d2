//! `fields.yml` loader — YAML sections into the format-agnostic model.
//!
//! Deserializes into private raw records first so that absent attributes
//! stay distinguishable from present ones, then converts to [`Section`] and
//! [`Field`]. Entries without a `name` are dropped at every nesting level.

use crate::error::{Error, Result};
use crate::model::{Field, Section};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawSection {
    key: Value,
    title: Value,
    description: Option<Value>,
    prefix: Option<Value>,
    anchor: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    skipdocs: Option<Value>,
    fields: Option<Vec<RawField>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: Option<Value>,
    #[serde(rename = "type")]
    field_type: Option<Value>,
    description: Option<Value>,
    example: Option<Value>,
    format: Option<Value>,
    required: Option<Value>,
    deprecated: Option<Value>,
    index: Option<bool>,
    enabled: Option<bool>,
    path: Option<Value>,
    multi_fields: Option<Vec<RawField>>,
    fields: Option<Vec<RawField>>,
    prefix: Option<Value>,
    anchor: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    skipdocs: Option<Value>,
}

/// Parse schema text into sections, keeping declaration order.
///
/// `source` is only used for error messages. Returns
/// [`Error::EmptySchema`] when the document holds no sections.
pub fn parse(content: &str, source: &Path) -> Result<Vec<Section>> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| Error::Parse {
        path: source.to_path_buf(),
        source: e,
    })?;

    let is_empty = match &value {
        Value::Null => true,
        Value::Sequence(seq) => seq.is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(Error::EmptySchema {
            path: source.to_path_buf(),
        });
    }

    let raw: Vec<RawSection> = serde_yaml::from_value(value).map_err(|e| Error::Parse {
        path: source.to_path_buf(),
        source: e,
    })?;

    Ok(raw.into_iter().map(convert_section).collect())
}

fn convert_section(raw: RawSection) -> Section {
    let key = scalar_text(&raw.key).unwrap_or_default();
    Section {
        fields: convert_fields(raw.fields, &key),
        skipdocs: is_set(&raw.skipdocs),
        key,
        title: scalar_text(&raw.title).unwrap_or_default(),
        description: text(&raw.description),
        prefix: text(&raw.prefix),
        anchor: text(&raw.anchor),
    }
}

fn convert_fields(raw: Option<Vec<RawField>>, parent: &str) -> Vec<Field> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|f| convert_field(f, parent))
        .collect()
}

fn convert_field(raw: RawField, parent: &str) -> Option<Field> {
    let Some(name) = text(&raw.name) else {
        debug!(parent, "dropping field entry without a name");
        return None;
    };
    Some(Field {
        fields: convert_fields(raw.fields, &name),
        multi_fields: convert_fields(raw.multi_fields, &name),
        name,
        field_type: text(&raw.field_type),
        description: text(&raw.description),
        example: text(&raw.example),
        format: text(&raw.format),
        required: text(&raw.required),
        deprecated: text(&raw.deprecated),
        index: raw.index,
        enabled: raw.enabled,
        alias_path: text(&raw.path),
        prefix: text(&raw.prefix),
        anchor: text(&raw.anchor),
        skipdocs: is_set(&raw.skipdocs),
    })
}

/// Keep a key that is present with an empty value as `Some(Null)`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `skipdocs` counts as set whenever the key is given, unless it is an
/// explicit `false`.
fn is_set(flag: &Option<Value>) -> bool {
    !matches!(flag, None | Some(Value::Bool(false)))
}

fn text(value: &Option<Value>) -> Option<String> {
    value.as_ref().and_then(scalar_text)
}

/// Render a YAML value as the text shown in the document.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        other => Some(
            serde_json::to_string(other)
                .or_else(|_| serde_yaml::to_string(other).map(|s| s.trim_end().to_string()))
                .unwrap_or_default(),
        ),
    }
}
