use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use praxis_i18n::{ContentTree, defaults};

use crate::error::Result;
use crate::util::{OutputIntegration, read_tree, write_string};

#[derive(Debug, Clone, Default, Args)]
pub struct KeysArgs {
    /// Locale file to list; defaults to the built-in English content.
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Emit a category inventory skeleton grouped by top-level section.
    #[arg(long)]
    pub inventory: bool,

    /// Write to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// `{ "<section>": ["<section>.<...>", ...] }`, one category per top-level key.
#[must_use]
pub fn inventory_skeleton(tree: &ContentTree) -> BTreeMap<String, Vec<String>> {
    let mut inventory: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in tree.leaf_paths() {
        let section = path.split('.').next().unwrap_or_default().to_string();
        inventory.entry(section).or_default().push(path);
    }
    inventory
}

pub fn run_keys(args: KeysArgs) -> Result<()> {
    let integration = OutputIntegration::detect();
    let rendered = render_keys(&args, &integration)?;
    match &args.output {
        Some(path) => write_string(path, &rendered),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn render_keys(args: &KeysArgs, integration: &OutputIntegration) -> Result<String> {
    let loaded;
    let tree = match &args.tree {
        Some(path) => {
            loaded = read_tree(path)?;
            &loaded
        }
        None => defaults::english(),
    };

    if args.inventory {
        return Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&inventory_skeleton(tree))?
        ));
    }

    let paths = tree.leaf_paths();
    if integration.should_emit_json() {
        return Ok(format!(
            "{}\n",
            serde_json::json!({ "command": "keys", "status": "ok", "keys": paths })
        ));
    }

    let mut out = paths.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use praxis_i18n::{CategoryIndex, ContentTree, defaults};
    use tempfile::tempdir;

    use crate::util::{OutputIntegration, write_string};

    use super::{KeysArgs, inventory_skeleton, render_keys, run_keys};

    #[test]
    fn lists_leaf_paths_of_a_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("de.json");
        write_string(&path, r#"{ "b": { "y": "Y", "x": "X" }, "a": ["1"] }"#).expect("write");

        let out = render_keys(
            &KeysArgs {
                tree: Some(path),
                ..KeysArgs::default()
            },
            &OutputIntegration::plain(),
        )
        .expect("keys");
        assert_eq!(out, "a\nb.x\nb.y\n");
    }

    #[test]
    fn defaults_are_listed_without_a_tree() {
        let out = render_keys(&KeysArgs::default(), &OutputIntegration::plain()).expect("keys");
        assert_eq!(out.lines().count(), defaults::english().leaf_paths().len());
        assert!(out.lines().any(|line| line == "appointments.fees.title"));
    }

    #[test]
    fn inventory_skeleton_round_trips_into_an_index() {
        let tree = ContentTree::from_json_str(
            r#"{ "footer": { "imprint": "I" }, "navigation": { "home": "H", "about": "A" } }"#,
        )
        .expect("tree");
        let skeleton = inventory_skeleton(&tree);
        assert_eq!(skeleton["navigation"], vec!["navigation.about", "navigation.home"]);

        let index = CategoryIndex::from_inventory(skeleton).expect("unique paths");
        assert_eq!(index.category_of("footer.imprint"), Some("footer"));
    }

    #[test]
    fn json_mode_wraps_keys_in_an_envelope() {
        let integration = OutputIntegration {
            sqlmodel_mode: "json".to_string(),
            ..OutputIntegration::plain()
        };
        let out = render_keys(&KeysArgs::default(), &integration).expect("keys");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(parsed["command"], "keys");
        assert!(parsed["keys"].as_array().is_some_and(|keys| !keys.is_empty()));
    }

    #[test]
    fn output_flag_writes_inventory_file() {
        let temp = tempdir().expect("tempdir");
        let output = temp.path().join("inventory/categories.json");
        run_keys(KeysArgs {
            tree: None,
            inventory: true,
            output: Some(output.clone()),
        })
        .expect("keys");

        let index = CategoryIndex::from_json_str(&fs::read_to_string(output).expect("read"))
            .expect("index");
        assert!(index.categories().any(|category| category == "appointments"));
    }
}
