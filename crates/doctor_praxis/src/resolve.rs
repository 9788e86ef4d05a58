use std::path::PathBuf;

use clap::{Args, ValueEnum};
use praxis_i18n::{ContentTree, FallbackChain, Shape, defaults};
use serde::Serialize;

use crate::error::Result;
use crate::util::{OutputIntegration, output_for, read_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShapeArg {
    #[default]
    Text,
    List,
    Section,
}

impl From<ShapeArg> for Shape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Text => Shape::Text,
            ShapeArg::List => Shape::List,
            ShapeArg::Section => Shape::Tree,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Dotted key path, e.g. `appointments.fees.title`.
    #[arg(long)]
    pub path: String,

    /// Locale file consulted first.
    #[arg(long)]
    pub locale: Option<PathBuf>,

    /// Bundled default locale file consulted second.
    #[arg(long)]
    pub bundled: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ShapeArg::Text)]
    pub shape: ShapeArg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub path: String,
    pub shape: Shape,
    /// Label of the tier that answered; `None` when nothing did.
    pub tier: Option<String>,
    pub value: Option<serde_json::Value>,
}

/// Resolve through locale, bundled defaults, then the built-in English
/// content.
pub fn resolve_with(
    path: &str,
    shape: Shape,
    locale: Option<&ContentTree>,
    bundled: Option<&ContentTree>,
) -> Resolution {
    let chain = FallbackChain::for_page(locale, bundled, defaults::english());
    let found = chain.resolve(path, shape);
    Resolution {
        path: path.to_string(),
        shape,
        tier: found.map(|resolved| resolved.label.to_string()),
        value: found.map(|resolved| resolved.node.to_value()),
    }
}

pub fn run_resolve(args: ResolveArgs) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_resolve_with_integration(args, &integration).map(|_| ())
}

pub(crate) fn run_resolve_with_integration(
    args: ResolveArgs,
    integration: &OutputIntegration,
) -> Result<Resolution> {
    let ui = output_for(integration);

    let locale = args.locale.as_deref().map(read_tree).transpose()?;
    let bundled = args.bundled.as_deref().map(read_tree).transpose()?;
    let resolution = resolve_with(
        &args.path,
        args.shape.into(),
        locale.as_ref(),
        bundled.as_ref(),
    );

    match (&resolution.tier, &resolution.value) {
        (Some(tier), Some(value)) => {
            let rendered = match value {
                serde_json::Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other)?,
            };
            ui.info(&format!("{} [{tier}]", resolution.path));
            ui.block(&rendered);
        }
        _ => ui.warning(&format!(
            "{} unresolved as {}",
            resolution.path,
            resolution.shape.as_str()
        )),
    }

    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "resolve",
                "status": if resolution.tier.is_some() { "ok" } else { "unresolved" },
                "resolution": resolution,
                "integration": integration,
            })
        );
    }

    Ok(resolution)
}
