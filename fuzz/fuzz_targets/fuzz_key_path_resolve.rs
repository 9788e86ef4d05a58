#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use praxis_i18n::{ContentTree, FallbackChain, Shape, defaults, resolve};

#[derive(Arbitrary, Debug)]
struct Input {
    tree: String,
    path: String,
    shape: u8,
}

fuzz_target!(|input: Input| {
    if input.tree.len() > 8 * 1024 || input.path.len() > 512 {
        return;
    }
    let tree = ContentTree::from_json_str(&input.tree).ok();

    // Resolution is total for any tree and any path.
    let direct = resolve(tree.as_ref(), &input.path);
    if input.path.is_empty() {
        assert!(direct.is_none());
    }

    let shape = match input.shape % 3 {
        0 => Shape::Text,
        1 => Shape::List,
        _ => Shape::Tree,
    };
    let chain = FallbackChain::for_page(tree.as_ref(), None, defaults::english());
    if let Some(resolved) = chain.resolve(&input.path, shape) {
        assert!(shape.accepts(resolved.node));
        assert!(resolved.tier < chain.len());
    }

    // Unresolved text falls back to the path itself.
    if chain.resolve(&input.path, Shape::Text).is_none() {
        assert_eq!(chain.text(&input.path), input.path);
    }
});
