use scraper::{Html, Node};
use std::ops::Deref;

/// Flatten a lyrics HTML fragment into plain text.
///
/// Each top-level node of the fragment contributes its visible text, as is,
/// as one line; nodes whose text is blank or whitespace-only are skipped, so
/// empty separator elements do not produce blank lines. Line breaks inside a
/// node are whatever text the markup carries.
pub fn render_lyrics(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let root = document.root_element();

    let lines: Vec<String> = root
        .children()
        .filter_map(|child| {
            let text = collect_all_text(child.id(), child.tree());
            if text.trim().is_empty() {
                tracing::debug!("Skipping blank top-level node");
                None
            } else {
                Some(text)
            }
        })
        .collect();

    tracing::info!(lines = lines.len(), "Rendered lyrics fragment");
    lines.join("\n")
}

/// Collect all text under a node, recursively. Comments and other
/// non-text nodes contribute nothing.
fn collect_all_text(node_id: ego_tree::NodeId, tree: &ego_tree::Tree<Node>) -> String {
    let Some(node) = tree.get(node_id) else {
        return String::new();
    };

    match node.value() {
        Node::Text(t) => t.deref().to_string(),
        Node::Element(_) => node
            .children()
            .map(|child| collect_all_text(child.id(), tree))
            .collect(),
        _ => String::new(),
    }
}
