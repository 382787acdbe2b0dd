//! Tests for the plain-text store/restore format.

use poplar::{DftEvent, FromStrCodec, NodeId, Tree, TreeBuilder, TreeError};

/// Flattens the subtree into open/close payload events.
fn dft_payloads<T: Copy>(tree: &Tree<T>, id: NodeId) -> Vec<DftEvent<T>> {
    tree.depth_first_traverse(id)
        .map(|ev| ev.map(|node| *node.data()))
        .collect()
}

/// Returns the sample tree.
///
/// Tree to be built:
///
/// ```text
/// 1000
/// |-- 1100
/// |   |-- 1110
/// |   `-- 1120
/// |-- 1200
/// `-- 1300
///     `-- 1310
/// ```
fn sample_tree() -> Tree<i32> {
    let mut tree = Tree::new(1000);
    TreeBuilder::new(&mut tree)
        .child(1100)
        .child(1110)
        .sibling(1120)
        .parent()
        .sibling(1200)
        .sibling(1300)
        .child(1310);
    tree
}

/// Stores the subtree into a string.
fn store_to_string(tree: &Tree<i32>, id: NodeId) -> String {
    let mut buf = Vec::new();
    tree.store_subtree(id, &mut buf, &FromStrCodec)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("the format is plain text")
}

#[test]
fn store_emits_the_documented_shape() {
    let mut tree = Tree::new(10);
    let root = tree.root();
    tree.add_child(root, 11).expect("should succeed");

    let expected = "{\n\
                    \t[\n\
                    \t\t10\n\
                    \t]\n\
                    \t{\n\
                    \t\t[\n\
                    \t\t\t11\n\
                    \t\t]\n\
                    \t}\n\
                    }\n";
    assert_eq!(store_to_string(&tree, root), expected);
}

#[test]
fn round_trip_preserves_shape_and_payloads() {
    let tree = sample_tree();
    let text = store_to_string(&tree, tree.root());

    let restored: Tree<i32> =
        Tree::restore(&mut text.as_bytes(), &FromStrCodec).expect("well-formed input");

    assert_eq!(
        dft_payloads(&tree, tree.root()),
        dft_payloads(&restored, restored.root())
    );
}

#[test]
fn round_trip_survives_structural_edits() {
    let mut tree = sample_tree();
    let root = tree.root();

    // Promote 1110/1120 into position 0, then clone the last child back on.
    let removed = tree.remove_child(root, 0).expect("position 0 exists");
    assert_eq!(removed, 1100);
    let children: Vec<_> = tree.children(root).map(|node| node.id()).collect();
    let copy = tree
        .clone_subtree(children[children.len() - 1])
        .expect("pool has room");
    tree.adopt_child(root, copy).expect("the copy is parentless");

    let text = store_to_string(&tree, root);
    let restored: Tree<i32> =
        Tree::restore(&mut text.as_bytes(), &FromStrCodec).expect("well-formed input");

    assert_eq!(
        dft_payloads(&tree, root),
        dft_payloads(&restored, restored.root())
    );
}

#[test]
fn restore_ignores_indentation_and_junk_lines() {
    let text = "\
{
  this line is not part of the grammar and is skipped
\t\t[
        10
   ]

      {
[
11
]
}
}
trailing lines after the top-level block are ignored
";
    let tree: Tree<i32> =
        Tree::restore(&mut text.as_bytes(), &FromStrCodec).expect("well-formed input");

    let root = tree.root();
    assert_eq!(tree.data(root), Some(&10));
    let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    assert_eq!(children, [11]);
}

#[test]
fn restore_of_empty_input_yields_the_root_only_tree() {
    let tree: Tree<i32> =
        Tree::restore(&mut "".as_bytes(), &FromStrCodec).expect("empty input is a valid tree");
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.data(tree.root()), Some(&0));
}

#[test]
fn restore_without_an_opening_brace_yields_the_root_only_tree() {
    let tree: Tree<i32> = Tree::restore(&mut "hello\nworld\n".as_bytes(), &FromStrCodec)
        .expect("non-grammar input is treated as empty");
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn restore_of_an_unterminated_block_fails() {
    let text = "{\n[\n10\n]\n{\n[\n11\n]\n}\n";
    assert!(matches!(
        Tree::<i32>::restore(&mut text.as_bytes(), &FromStrCodec),
        Err(TreeError::BadRestoration)
    ));
}

#[test]
fn restore_of_a_malformed_payload_fails() {
    let text = "{\n[\nnot-a-number\n]\n}\n";
    assert!(matches!(
        Tree::<i32>::restore(&mut text.as_bytes(), &FromStrCodec),
        Err(TreeError::BadData)
    ));
}

#[test]
fn restore_subtree_appends_after_existing_children() {
    let mut tree = Tree::new(0);
    let root = tree.root();
    tree.add_child(root, 1).expect("should succeed");

    // The block for `root` is already open; this input sets its payload and
    // adds one more child, then closes the block.
    let text = "[\n5\n]\n{\n[\n6\n]\n}\n}\n";
    tree.restore_subtree(root, &mut text.as_bytes(), &FromStrCodec)
        .expect("well-formed input");

    assert_eq!(tree.data(root), Some(&5));
    let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    assert_eq!(children, [1, 6]);
}

#[test]
fn store_of_an_inner_subtree_round_trips() {
    let tree = sample_tree();
    let first_child = tree
        .children(tree.root())
        .next()
        .expect("the root has children")
        .id();

    let text = store_to_string(&tree, first_child);
    let restored: Tree<i32> =
        Tree::restore(&mut text.as_bytes(), &FromStrCodec).expect("well-formed input");

    assert_eq!(
        dft_payloads(&tree, first_child),
        dft_payloads(&restored, restored.root())
    );
}

#[test]
fn graphviz_dump_lists_nodes_and_edges() {
    let mut tree = Tree::new(10);
    let root = tree.root();
    let a = tree.add_child(root, 11).expect("should succeed");
    tree.add_child(a, 12).expect("should succeed");

    let mut buf = Vec::new();
    tree.dump_graphviz(root, &mut buf, &FromStrCodec)
        .expect("writing to a Vec cannot fail");
    let dot = String::from_utf8(buf).expect("the dump is plain text");

    assert!(dot.starts_with("digraph tree {"));
    assert!(dot.ends_with("}\n"));
    for label in ["Node 0 | 10", "Node 1 | 11", "Node 2 | 12"] {
        assert!(dot.contains(label), "missing label {label:?} in {dot}");
    }
    for edge in ["node0 -> node1", "node1 -> node2"] {
        assert!(dot.contains(edge), "missing edge {edge:?} in {dot}");
    }
}
