//! fieldsdoc — generate the exported fields reference from `fields.yml`.
//!
//! Loads the ordered list of field sections, merges repeated field
//! definitions, and writes `docs/fields.asciidoc` with a table of contents
//! and one description block per field:
//!
//! `fieldsdoc _meta/fields.yml apm-server ../beats --output-path .`

mod error;
mod model;
mod output;
mod parser;
mod reference;
mod render;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use reference::{EcsReference, Location, DEFAULT_ECS_URL, ECS_VERSION};
use render::{AsciidocRenderer, RenderContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fieldsdoc",
    about = "Generate the exported fields documentation from a fields.yml schema"
)]
struct Cli {
    /// Path to fields.yml
    fields: PathBuf,

    /// Product title, e.g. "apm-server" (title-cased before use)
    beat_title: String,

    /// Root of the beats checkout; relative schema paths are also looked up here
    es_beats: PathBuf,

    /// Output root; the document is written to <OUTPUT_PATH>/docs/fields.asciidoc
    #[arg(short = 'o', long, alias = "output_path", default_value = ".")]
    output_path: PathBuf,

    /// Flattened ECS field listing used for ECS badges
    #[arg(long, env = "FIELDSDOC_REFERENCE_URL", default_value = DEFAULT_ECS_URL)]
    reference_url: String,

    /// Read the ECS listing from a local file instead of --reference-url
    #[arg(long)]
    reference_file: Option<PathBuf>,

    /// Badge ECS fields regardless of the product title
    #[arg(long)]
    ecs_badges: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    generate(&cli)
}

/// Load, merge and render fully before anything is written.
fn generate(cli: &Cli) -> Result<()> {
    anyhow::ensure!(
        cli.es_beats.is_dir(),
        "beats root is not a directory: {}",
        cli.es_beats.display()
    );

    let fields_path = resolve_fields_path(&cli.fields, &cli.es_beats);
    let sections = match parser::load_file(&fields_path) {
        Ok(sections) => sections,
        Err(e) if !e.is_fatal() => {
            info!(path = %fields_path.display(), "no sections, skipping generation");
            // User-facing notice goes to stdout
            println!("{}", e);
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to load {}", fields_path.display()))
        }
    };

    let location = match cli.reference_file {
        Some(ref path) => Location::File(path.clone()),
        None => Location::Url(cli.reference_url.clone()),
    };
    let reference = EcsReference::new(location);
    let ctx = RenderContext::new(&cli.beat_title, cli.ecs_badges);
    debug!(
        beat = %ctx.beat_title,
        ecs_badges = ctx.ecs_badges,
        reference = %reference.location(),
        ecs_version = ECS_VERSION,
        "rendering"
    );

    let doc = AsciidocRenderer::new(&ctx, &reference)
        .render(&sections)
        .context("failed to render fields documentation")?;

    output::write_document(&doc, &cli.output_path).with_context(|| {
        format!(
            "failed to write {}",
            output::target_path(&cli.output_path).display()
        )
    })?;
    Ok(())
}

/// Use `fields` as given when it exists; otherwise try it relative to the
/// beats root.
fn resolve_fields_path(fields: &Path, es_beats: &Path) -> PathBuf {
    if fields.exists() || fields.is_absolute() {
        return fields.to_path_buf();
    }
    let candidate = es_beats.join(fields);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "resolved schema under beats root");
        candidate
    } else {
        fields.to_path_buf()
    }
}
