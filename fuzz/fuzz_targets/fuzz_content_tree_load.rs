#![no_main]

use libfuzzer_sys::fuzz_target;
use praxis_i18n::{ContentTree, diff};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 16 * 1024 {
        return;
    }

    // Loading either succeeds or reports an error; it never panics.
    let Ok(tree) = ContentTree::from_json_str(text) else {
        return;
    };

    // Every listed leaf resolves back to a node.
    let paths = tree.leaf_paths();
    for path in &paths {
        assert!(tree.lookup(path).is_some(), "leaf {path} does not resolve");
    }

    // Canonical JSON reloads to the same tree.
    let reloaded = ContentTree::from_json_str(&tree.to_value().to_string())
        .expect("canonical JSON reloads");
    assert_eq!(reloaded, tree);
    assert_eq!(reloaded.digest(), tree.digest());

    // Self-diff covers every leaf once.
    let findings = diff(&tree, Some(&tree)).expect("loaded trees are bounded");
    assert_eq!(findings.len(), paths.len());
});
