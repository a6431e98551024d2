//! Data model for a loaded field schema — format-agnostic.

/// Type value that marks a field as a nested container of further fields.
pub const GROUP_TYPE: &str = "group";

/// A top-level entry of `fields.yml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Unique identifier, also the sort key for the TOC and body.
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    /// Literal text emitted before the section body.
    pub prefix: Option<String>,
    /// Cross-reference id; `key` is used when absent.
    pub anchor: Option<String>,
    pub skipdocs: bool,
    pub fields: Vec<Field>,
}

impl Section {
    /// Anchor used for the `<<exported-fields-...>>` link.
    pub fn anchor_id(&self) -> &str {
        self.anchor.as_deref().unwrap_or(&self.key)
    }
}

/// A single field definition. Group fields reuse the section-like
/// attributes (`prefix`, `anchor`, `skipdocs`, `fields`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub name: String,
    /// `type` in the schema
    pub field_type: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub format: Option<String>,
    pub required: Option<String>,
    /// Version the field was deprecated in
    pub deprecated: Option<String>,
    pub index: Option<bool>,
    pub enabled: Option<bool>,
    /// `path` in the schema: target of an alias field
    pub alias_path: Option<String>,
    pub multi_fields: Vec<Field>,
    pub fields: Vec<Field>,
    pub prefix: Option<String>,
    pub anchor: Option<String>,
    pub skipdocs: bool,
}

impl Field {
    pub fn is_group(&self) -> bool {
        self.field_type.as_deref() == Some(GROUP_TYPE)
    }

    /// `index` defaults to true when not given.
    pub fn is_indexed(&self) -> bool {
        self.index.unwrap_or(true)
    }

    /// `enabled` defaults to true when not given.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// One step of the render walk.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Nested container rendered with the section rules.
    Group(&'a Field),
    /// Physical or alias field rendered as a description block.
    Leaf(&'a Field),
    /// Alternate representation following its parent's block.
    Multi(&'a Field),
}

impl<'a> Node<'a> {
    /// Classify a field found in a section or group field list.
    pub fn classify(field: &'a Field) -> Self {
        if field.is_group() {
            Node::Group(field)
        } else {
            Node::Leaf(field)
        }
    }
}

/// Join a parent path and a child name with `.`; the root path is empty.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_defaults_to_key() {
        let mut section = Section {
            key: "apache".to_string(),
            title: "Apache".to_string(),
            ..Default::default()
        };
        assert_eq!(section.anchor_id(), "apache");
        section.anchor = Some("apache-module".to_string());
        assert_eq!(section.anchor_id(), "apache-module");
    }

    #[test]
    fn path_joining() {
        assert_eq!(join_path("", "source"), "source");
        assert_eq!(join_path("source", "user"), "source.user");
        assert_eq!(join_path("source.user", "keyword"), "source.user.keyword");
    }

    #[test]
    fn group_classification() {
        let group = Field {
            name: "source".to_string(),
            field_type: Some("group".to_string()),
            ..Default::default()
        };
        let leaf = Field {
            name: "ip".to_string(),
            field_type: Some("ip".to_string()),
            ..Default::default()
        };
        assert!(matches!(Node::classify(&group), Node::Group(_)));
        assert!(matches!(Node::classify(&leaf), Node::Leaf(_)));
        assert!(leaf.is_indexed() && leaf.is_enabled());
    }
}
