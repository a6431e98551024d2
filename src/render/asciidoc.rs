//! AsciiDoc renderer for the exported fields reference.
//!
//! Sections and group fields share one set of heading rules; leaf fields and
//! their multi-fields become `*`path`*::` description blocks.

use crate::error::Result;
use crate::model::*;
use crate::reference::ReferenceSource;
use crate::render::{Document, RenderContext};
use crate::toc;
use tracing::{debug, warn};

/// Section name that gets the ECS explanation instead of its description.
pub const ECS_SECTION_NAME: &str = "ECS";

const ECS_INTRO: &str = "
This section defines Elastic Common Schema (ECS) fields—a common set of fields
to be used when storing event data in {es}.

This is an exhaustive list, and fields listed here are not necessarily used by {beatname_uc}.
The goal of ECS is to enable and encourage users of {es} to normalize their event data,
so that they can better analyze, visualize, and correlate the data represented in their events.

See the {ecs-ref}[ECS reference] for more information.
";

const ECS_BADGE: &str = "{yes-icon} {ecs-ref}[ECS] field.";

pub struct AsciidocRenderer<'a, R: ReferenceSource + ?Sized> {
    ctx: &'a RenderContext,
    reference: &'a R,
}

/// Heading-level view shared by sections and group fields.
struct Container<'a> {
    name: &'a str,
    description: Option<&'a str>,
    prefix: Option<&'a str>,
    anchor: Option<&'a str>,
    skipdocs: bool,
    fields: &'a [Field],
}

impl<'a> Container<'a> {
    /// Top-level sections always carry an anchor, defaulting to their key.
    fn section(section: &'a Section) -> Self {
        Self {
            name: &section.title,
            description: section.description.as_deref(),
            prefix: section.prefix.as_deref(),
            anchor: Some(section.anchor_id()),
            skipdocs: section.skipdocs,
            fields: &section.fields,
        }
    }

    fn group(field: &'a Field) -> Self {
        Self {
            name: &field.name,
            description: field.description.as_deref(),
            prefix: field.prefix.as_deref(),
            anchor: field.anchor.as_deref(),
            skipdocs: field.skipdocs,
            fields: &field.fields,
        }
    }
}

impl<'a, R: ReferenceSource + ?Sized> AsciidocRenderer<'a, R> {
    pub fn new(ctx: &'a RenderContext, reference: &'a R) -> Self {
        Self { ctx, reference }
    }

    /// Render all sections. Nothing is returned unless every section renders.
    pub fn render(&self, sections: &[Section]) -> Result<Document> {
        let mut sorted: Vec<&Section> = sections.iter().filter(|s| !s.skipdocs).collect();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));

        let mut toc_text = String::new();
        for section in &sorted {
            if !toc::is_valid_anchor(section.anchor_id()) {
                warn!(section = %section.key, anchor = section.anchor_id(), "anchor is not a valid AsciiDoc id");
            }
            toc_text.push_str(&toc::render_toc_item(section.anchor_id()));
            toc_text.push('\n');
        }
        toc_text.push_str("\n--\n");

        let bodies = sorted
            .iter()
            .map(|section| -> Result<String> {
                debug!(section = %section.key, "rendering section");
                let mut out = String::new();
                self.render_container(&mut out, &Container::section(section), "")?;
                Ok(out)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Document {
            preamble: self.preamble(),
            toc: toc_text,
            bodies,
        })
    }

    fn preamble(&self) -> String {
        format!(
            "
////
This file is generated! See _meta/fields.yml and run fieldsdoc to regenerate.
////

[[exported-fields]]
= Exported fields

[partintro]

--
This document describes the fields that are exported by {}. They are
grouped in the following categories:

",
            self.ctx.beat_title
        )
    }

    /// Section and group-field heading rules, then the nested fields.
    fn render_container(&self, out: &mut String, container: &Container<'_>, path: &str) -> Result<()> {
        if container.skipdocs {
            return Ok(());
        }

        if let Some(anchor) = container.anchor {
            out.push_str(&toc::render_anchor(anchor));
            out.push('\n');
        }

        if let Some(prefix) = container.prefix {
            out.push_str(prefix);
            out.push('\n');
        }

        if let Some(description) = container.description {
            // Intermediate level titles
            if container.prefix.is_none() && container.anchor.is_none() {
                out.push_str("[float]\n");
            }

            match container.anchor {
                Some(_) if container.name == ECS_SECTION_NAME => {
                    out.push_str(&format!("== {} fields\n\n", container.name));
                    out.push_str(ECS_INTRO);
                }
                Some(_) => {
                    out.push_str(&format!("== {} fields\n\n", container.name));
                    out.push_str(&format!("{}\n\n", description));
                }
                None => {
                    out.push_str(&format!("=== {}\n\n", container.name));
                    out.push_str(&format!("{}\n\n", description));
                }
            }
        }

        if container.fields.is_empty() {
            return Ok(());
        }

        out.push('\n');
        for field in container.fields {
            self.render_node(out, Node::classify(field), &join_path(path, &field.name))?;
        }
        Ok(())
    }

    fn render_node(&self, out: &mut String, node: Node<'_>, path: &str) -> Result<()> {
        match node {
            Node::Group(field) => self.render_container(out, &Container::group(field), path),
            Node::Leaf(field) | Node::Multi(field) => {
                self.render_leaf(out, field, path)?;
                for sub in &field.multi_fields {
                    self.render_node(out, Node::Multi(sub), &join_path(path, &sub.name))?;
                }
                Ok(())
            }
        }
    }

    /// One `*`path`*::` block.
    fn render_leaf(&self, out: &mut String, field: &Field, path: &str) -> Result<()> {
        out.push_str(&format!("*`{}`*::\n+\n--\n", path));

        if let Some(ref deprecated) = field.deprecated {
            out.push_str(&format!("\ndeprecated:[{}]\n\n", deprecated));
        }
        if let Some(ref description) = field.description {
            out.push_str(&format!("{}\n\n", description));
        }
        if let Some(ref field_type) = field.field_type {
            out.push_str(&format!("type: {}\n\n", field_type));
        }
        if let Some(ref example) = field.example {
            out.push_str(&format!("example: {}\n\n", example));
        }
        if let Some(ref format) = field.format {
            out.push_str(&format!("format: {}\n\n", format));
        }
        if let Some(ref required) = field.required {
            out.push_str(&format!("required: {}\n\n", required));
        }
        if let Some(ref target) = field.alias_path {
            out.push_str(&format!("alias to: {}\n\n", target));
        }

        // Reference is only consulted when badges are on
        if self.ctx.ecs_badges && self.reference.contains(path)? {
            out.push_str(ECS_BADGE);
            out.push_str("\n\n");
        }

        if !field.is_indexed() {
            out.push_str("Field is not indexed.\n\n");
        }
        if !field.is_enabled() {
            out.push_str("Object is not enabled.\n\n");
        }

        out.push_str("--\n\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::StaticReference;

    fn ctx(badges: bool) -> RenderContext {
        RenderContext {
            beat_title: "Testbeat".to_string(),
            ecs_badges: badges,
        }
    }

    fn leaf(name: &str, field_type: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: Some(field_type.to_string()),
            ..Default::default()
        }
    }

    fn section(key: &str, fields: Vec<Field>) -> Section {
        Section {
            key: key.to_string(),
            title: key.to_uppercase(),
            description: Some(format!("{} fields.", key)),
            fields,
            ..Default::default()
        }
    }

    fn render(sections: &[Section], badges: bool, reference: &StaticReference) -> Document {
        let ctx = ctx(badges);
        AsciidocRenderer::new(&ctx, reference).render(sections).unwrap()
    }

    fn full_text(doc: &Document) -> String {
        doc.parts().collect()
    }

    #[test]
    fn sections_sorted_by_key() {
        let sections = vec![
            section("zeta", vec![]),
            section("alpha", vec![]),
            section("mu", vec![]),
        ];
        let doc = render(&sections, false, &StaticReference::default());
        assert_eq!(
            doc.toc,
            "* <<exported-fields-alpha>>\n* <<exported-fields-mu>>\n* <<exported-fields-zeta>>\n\n--\n"
        );
        assert_eq!(doc.bodies.len(), 3);
        assert!(doc.bodies[0].starts_with("[[exported-fields-alpha]]"));
        assert!(doc.bodies[1].starts_with("[[exported-fields-mu]]"));
        assert!(doc.bodies[2].starts_with("[[exported-fields-zeta]]"));
    }

    #[test]
    fn skipdocs_section_is_excluded() {
        let hidden = Section {
            skipdocs: true,
            ..section("hidden", vec![leaf("secret", "keyword")])
        };
        let doc = render(&[hidden, section("shown", vec![])], false, &StaticReference::default());
        let text = full_text(&doc);
        assert!(!text.contains("hidden"));
        assert!(!text.contains("secret"));
        assert_eq!(doc.bodies.len(), 1);
    }

    #[test]
    fn section_heading_and_description() {
        let doc = render(&[section("apache", vec![])], false, &StaticReference::default());
        assert_eq!(
            doc.bodies[0],
            "[[exported-fields-apache]]\n== APACHE fields\n\napache fields.\n\n"
        );
    }

    #[test]
    fn explicit_anchor_and_prefix() {
        let s = Section {
            anchor: Some("apm-span".to_string()),
            prefix: Some("[role=\"xpack\"]".to_string()),
            ..section("span", vec![])
        };
        let doc = render(&[s], false, &StaticReference::default());
        assert_eq!(doc.toc, "* <<exported-fields-apm-span>>\n\n--\n");
        assert!(doc.bodies[0].starts_with("[[exported-fields-apm-span]]\n[role=\"xpack\"]\n== SPAN fields"));
    }

    #[test]
    fn ecs_section_uses_boilerplate() {
        let s = Section {
            key: "ecs".to_string(),
            title: "ECS".to_string(),
            description: Some("own text".to_string()),
            ..Default::default()
        };
        let doc = render(&[s], false, &StaticReference::default());
        assert!(doc.bodies[0].contains("== ECS fields\n\n"));
        assert!(doc.bodies[0].contains("Elastic Common Schema (ECS) fields—a common set of fields\n"));
        assert!(!doc.bodies[0].contains("own text"));
    }

    #[test]
    fn group_paths_and_intermediate_titles() {
        let user = Field {
            multi_fields: vec![leaf("keyword", "keyword")],
            ..leaf("user", "text")
        };
        let group = Field {
            description: Some("Source info.".to_string()),
            fields: vec![user],
            ..leaf("source", "group")
        };
        let doc = render(&[section("net", vec![group])], false, &StaticReference::default());
        let body = &doc.bodies[0];
        assert!(body.contains("[float]\n=== source\n\nSource info.\n\n"));
        assert!(body.contains("*`source.user`*::\n+\n--\ntype: text\n\n--\n\n"));
        assert!(body.contains("*`source.user.keyword`*::\n+\n--\ntype: keyword\n\n--\n\n"));
        assert!(!body.contains("*`source`*"));

        let user_at = body.find("*`source.user`*").unwrap();
        let keyword_at = body.find("*`source.user.keyword`*").unwrap();
        assert!(user_at < keyword_at);
    }

    #[test]
    fn nested_multi_fields_extend_path() {
        let inner = Field {
            multi_fields: vec![leaf("raw", "keyword")],
            ..leaf("text", "text")
        };
        let outer = Field {
            multi_fields: vec![inner],
            ..leaf("message", "keyword")
        };
        let doc = render(&[section("log", vec![outer])], false, &StaticReference::default());
        assert!(doc.bodies[0].contains("*`message.text.raw`*::"));
    }

    #[test]
    fn leaf_block_attribute_order() {
        let f = Field {
            deprecated: Some("7.0.0".to_string()),
            description: Some("Port.".to_string()),
            example: Some("8080".to_string()),
            format: Some("string".to_string()),
            required: Some("true".to_string()),
            alias_path: Some("url.port".to_string()),
            index: Some(false),
            enabled: Some(false),
            ..leaf("port", "alias")
        };
        let doc = render(&[section("http", vec![f])], false, &StaticReference::default());
        let expected = concat!(
            "*`port`*::\n+\n--\n",
            "\ndeprecated:[7.0.0]\n\n",
            "Port.\n\n",
            "type: alias\n\n",
            "example: 8080\n\n",
            "format: string\n\n",
            "required: true\n\n",
            "alias to: url.port\n\n",
            "Field is not indexed.\n\n",
            "Object is not enabled.\n\n",
            "--\n\n",
        );
        assert!(doc.bodies[0].ends_with(expected), "got: {}", doc.bodies[0]);
    }

    #[test]
    fn ecs_badge_needs_flag_and_membership() {
        let reference = StaticReference::with(&["host.name"]);
        let sections = vec![section(
            "host",
            vec![Field {
                fields: vec![leaf("name", "keyword"), leaf("custom", "keyword")],
                ..leaf("host", "group")
            }],
        )];

        let off = render(&sections, false, &reference);
        assert!(!full_text(&off).contains(ECS_BADGE));
        assert_eq!(reference.queries.get(), 0);

        let on = render(&sections, true, &reference);
        let body = &on.bodies[0];
        assert_eq!(body.matches(ECS_BADGE).count(), 1);
        let badge_at = body.find(ECS_BADGE).unwrap();
        assert!(body.find("*`host.name`*").unwrap() < badge_at);
        assert!(body.find("*`host.custom`*").unwrap() > badge_at);
    }

    #[test]
    fn rendering_is_idempotent() {
        let sections = vec![
            section("b", vec![leaf("x", "keyword")]),
            section("a", vec![leaf("y", "long")]),
        ];
        let reference = StaticReference::with(&["x"]);
        let first = full_text(&render(&sections, true, &reference));
        let second = full_text(&render(&sections, true, &reference));
        assert_eq!(first, second);
    }

    #[test]
    fn preamble_names_product() {
        let doc = render(&[], false, &StaticReference::default());
        assert!(doc.preamble.contains("exported by Testbeat. They are"));
        assert!(doc.preamble.contains("[[exported-fields]]\n= Exported fields"));
        assert_eq!(doc.toc, "\n--\n");
        assert!(doc.bodies.is_empty());
    }
}
