//! Tests for the arena tree and its `ElementTree` view.

use sift_dom::{DomTree, ElementData, ElementTree, NodeId, format_tree};

/// Builds:
/// ```text
/// <div id="outer" class="box  wide">
///   "text"
///   <p/>
///   <!-- note -->
///   <SPAN lang="en"><p/></SPAN>
/// </div>
/// ```
fn sample() -> (DomTree, [NodeId; 4]) {
    let mut tree = DomTree::new();
    let div = tree.append_element(
        NodeId::ROOT,
        ElementData::new("div")
            .with_attr("id", "outer")
            .with_attr("class", "box  wide"),
    );
    let _ = tree.append_text(div, "text");
    let p1 = tree.append_element(div, ElementData::new("p"));
    let comment = tree.alloc(sift_dom::NodeType::Comment(" note ".to_string()));
    tree.append_child(div, comment);
    let span = tree.append_element(div, ElementData::new("SPAN").with_attr("lang", "en"));
    let p2 = tree.append_element(span, ElementData::new("p"));
    (tree, [div, p1, span, p2])
}

#[test]
fn test_descendants_are_in_document_order() {
    let (tree, [div, p1, span, p2]) = sample();
    let elements: Vec<NodeId> = tree
        .descendants(NodeId::ROOT)
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(elements, vec![div, p1, span, p2]);
}

#[test]
fn test_descendants_by_tag_is_case_insensitive() {
    let (tree, [_, _, span, _]) = sample();
    assert_eq!(tree.descendants_by_tag(NodeId::ROOT, "span"), vec![span]);
    assert_eq!(tree.descendants_by_tag(NodeId::ROOT, "Span"), vec![span]);
}

#[test]
fn test_descendants_by_tag_excludes_the_context() {
    let (tree, [div, p1, span, p2]) = sample();
    assert_eq!(tree.descendants_by_tag(div, "*"), vec![p1, span, p2]);
    assert!(tree.descendants_by_tag(div, "div").is_empty());
    assert_eq!(tree.descendants_by_tag(span, "p"), vec![p2]);
}

#[test]
fn test_wildcard_skips_text_and_comments() {
    let (tree, _) = sample();
    // Document + div + text + p + comment + span + p
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.descendants_by_tag(NodeId::ROOT, "*").len(), 4);
}

#[test]
fn test_element_siblings_skip_non_elements() {
    let (tree, [div, p1, span, _]) = sample();
    assert_eq!(tree.first_element_child(div), Some(p1));
    assert_eq!(tree.next_element_sibling(p1), Some(span));
    assert_eq!(tree.next_element_sibling(span), None);
    assert_eq!(ElementTree::parent(&tree, span), Some(div));
}

#[test]
fn test_class_list_splits_on_any_whitespace() {
    let (tree, [div, p1, _, _]) = sample();
    assert_eq!(tree.class_list(div), vec!["box", "wide"]);
    assert!(tree.class_list(p1).is_empty());
    assert_eq!(tree.id(div), Some("outer"));
}

#[test]
fn test_non_elements_have_no_tag_or_attributes() {
    let (tree, [div, ..]) = sample();
    let text = tree.children(div)[0];
    assert_eq!(tree.as_text(text), Some("text"));
    assert_eq!(tree.tag_name(text), None);
    assert_eq!(tree.attribute(text, "id"), None);
    assert_eq!(tree.tag_name(NodeId::ROOT), None);
}

#[test]
fn test_ancestors_walk_to_the_document() {
    let (tree, [div, _, span, p2]) = sample();
    let chain: Vec<NodeId> = tree.ancestors(p2).collect();
    assert_eq!(chain, vec![span, div, NodeId::ROOT]);
    assert_eq!(tree.document_element(), Some(div));
}

#[test]
fn test_format_tree_outline() {
    let (tree, [_, _, span, _]) = sample();
    assert_eq!(format_tree(&tree, span), "<SPAN lang=\"en\">\n  <p>\n");
}

#[test]
fn test_attribute_lookup_folds_ascii_case() {
    let mut tree = DomTree::new();
    let svg = tree.append_element(
        NodeId::ROOT,
        ElementData::new("svg")
            .with_attr("viewBox", "0 0 1 1")
            .with_attr("viewbox", "exact"),
    );
    let img = tree.append_element(svg, ElementData::new("img").with_attr("Alt", "x"));
    assert_eq!(tree.attribute(svg, "viewBox"), Some("0 0 1 1"));
    assert_eq!(tree.attribute(svg, "viewbox"), Some("exact"));
    assert_eq!(tree.attribute(img, "ALT"), Some("x"));
    assert_eq!(tree.attribute(img, "title"), None);
}
