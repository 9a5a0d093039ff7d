use super::*;

const SAMPLE_MM: &str = r#"
<map version="1.0.1">
<node TEXT="Project Launch">
<node TEXT="Preparation">
<node TEXT="Research Market"/>
<node TEXT="Define Goals"/>
</node>
<node TEXT="Development">
<node TEXT="Frontend"/>
</node>
</node>
</map>"#;

#[test]
fn parses_freemind_document() {
    let tree = parse_map_xml(SAMPLE_MM).unwrap();
    assert_eq!(tree.root().name, "Project Launch");
    assert_eq!(tree.root().children.len(), 2);
    assert_eq!(tree.root().children[0].name, "Preparation");
    assert_eq!(tree.root().children[0].children.len(), 2);
    assert_eq!(tree.node_count(), 6);
}

#[test]
fn imported_ids_are_unique() {
    let tree = parse_map_xml(SAMPLE_MM).unwrap();
    let mut ids = std::collections::BTreeSet::new();
    fn collect<'a>(node: &'a Node, ids: &mut std::collections::BTreeSet<&'a str>) {
        ids.insert(node.id.as_str());
        for c in &node.children {
            collect(c, ids);
        }
    }
    collect(tree.root(), &mut ids);
    assert_eq!(ids.len(), tree.node_count());
}

#[test]
fn missing_text_attribute_defaults() {
    let tree = parse_map_xml("<map><node><node TEXT=\"a\"/></node></map>").unwrap();
    assert_eq!(tree.root().name, DEFAULT_NAME);
    assert_eq!(tree.root().children[0].name, "a");
}

#[test]
fn foreign_elements_are_ignored() {
    let text = r#"<map>
        <attribute_registry/>
        <node TEXT="r"><icon BUILTIN="idea"/><node TEXT="a"/><font NAME="x"/></node>
    </map>"#;
    let tree = parse_map_xml(text).unwrap();
    assert_eq!(tree.root().name, "r");
    assert_eq!(tree.root().children.len(), 1);
}

#[test]
fn missing_map_element_is_reported() {
    let err = parse_map_xml("<mindmap><node TEXT=\"r\"/></mindmap>").unwrap_err();
    assert!(matches!(err, crate::Error::MissingMapElement));
}

#[test]
fn missing_root_node_is_reported() {
    let err = parse_map_xml("<map version=\"1.0.1\"></map>").unwrap_err();
    assert!(matches!(err, crate::Error::MissingRootNode));
}

#[test]
fn malformed_xml_is_reported() {
    assert!(matches!(
        parse_map_xml("<map><node").unwrap_err(),
        crate::Error::Xml(_)
    ));
}

#[test]
fn json_round_trip_preserves_names_and_structure() {
    let tree = demo_tree();
    let json = to_json_string(&tree).unwrap();
    let back = parse_map_json(&json).unwrap();

    fn shape(node: &Node) -> (String, Vec<(String, usize)>) {
        (
            node.name.clone(),
            node.children
                .iter()
                .map(|c| (c.name.clone(), c.children.len()))
                .collect(),
        )
    }
    assert_eq!(shape(tree.root()), shape(back.root()));
    assert_eq!(back.root().id, "root");
    assert_eq!(back.node_count(), tree.node_count());
}

#[test]
fn json_round_trip_preserves_view_state() {
    let mut tree = demo_tree();
    assert!(tree.toggle_collapse("c2"));
    assert!(tree.apply_drag_offset("c1", 10.0, -5.0));

    let back = parse_map_json(&to_json_string_pretty(&tree).unwrap()).unwrap();
    assert!(back.get("c2").unwrap().collapsed);
    let offset = back.get("c1").unwrap().offset;
    assert_eq!(offset.dy, 10.0);
    assert_eq!(offset.dx, -5.0);
    // Hidden subtree survives the trip.
    assert!(back.get("c2-1-1").is_some());
}

#[test]
fn json_without_ids_or_names_still_loads() {
    let tree = parse_map_json(r#"{"children": [{"name": "a"}, {"name": "b"}]}"#).unwrap();
    assert_eq!(tree.root().name, DEFAULT_NAME);
    assert_eq!(tree.root().children.len(), 2);
    assert!(!tree.root().id.is_empty());
    assert_ne!(tree.root().children[0].id, tree.root().children[1].id);
}

#[test]
fn add_child_appends_and_expands() {
    let mut tree = demo_tree();
    assert!(tree.toggle_collapse("c1"));
    assert!(tree.get("c1").unwrap().collapsed);

    let id = tree.add_child("c1", "New Node").unwrap();
    let parent = tree.get("c1").unwrap();
    assert!(!parent.collapsed, "adding a child must reveal it");
    assert_eq!(parent.children.last().unwrap().id, id);
    assert_eq!(parent.children.last().unwrap().name, "New Node");

    assert!(tree.add_child("nope", "x").is_none());
}

#[test]
fn delete_removes_subtrees_but_never_the_root() {
    let mut tree = demo_tree();
    assert!(!tree.delete("root"));
    assert!(!tree.delete("unknown"));

    assert!(tree.delete("c2"));
    assert!(tree.get("c2").is_none());
    assert!(tree.get("c2-1-1").is_none(), "descendants go with the node");
    assert_eq!(tree.root().children.len(), 2);

    // Emptying a parent leaves a childless node, which is simply a leaf.
    assert!(tree.delete("c1-1"));
    assert!(tree.delete("c1-2"));
    assert!(tree.delete("c1-3"));
    assert!(!tree.get("c1").unwrap().has_children());
}

#[test]
fn rename_trims_and_rejects_empty() {
    let mut tree = demo_tree();
    assert!(tree.rename("c1", "  Planning  "));
    assert_eq!(tree.get("c1").unwrap().name, "Planning");

    assert!(!tree.rename("c1", "   "));
    assert_eq!(tree.get("c1").unwrap().name, "Planning");

    assert!(!tree.rename("root", ""));
    assert_eq!(tree.root().name, "Project Launch");
}

#[test]
fn collapse_toggles_only_nodes_with_children() {
    let mut tree = demo_tree();
    assert!(!tree.toggle_collapse("c1-1"), "leaf has nothing to hide");

    assert!(tree.toggle_collapse("c1"));
    assert!(tree.get("c1").unwrap().collapsed);
    // The subtree stays in the data model.
    assert!(tree.get("c1-2").is_some());

    assert!(tree.toggle_collapse("c1"));
    assert!(!tree.get("c1").unwrap().collapsed);
}

#[test]
fn drag_offsets_accumulate_across_the_whole_subtree() {
    let mut tree = demo_tree();
    assert!(tree.toggle_collapse("c2-1"));

    assert!(tree.apply_drag_offset("c2", 10.0, -5.0));
    assert!(tree.apply_drag_offset("c2", 10.0, -5.0));

    // Screen-space (10, -5) twice: depth correction dy = 20, breadth dx = -10.
    for id in ["c2", "c2-1", "c2-1-1", "c2-2-2"] {
        let offset = tree.get(id).unwrap().offset;
        assert_eq!(offset.dy, 20.0, "{id} depth correction");
        assert_eq!(offset.dx, -10.0, "{id} breadth correction");
    }
    // Siblings outside the subtree are untouched.
    assert!(tree.get("c1").unwrap().offset.is_zero());

    assert!(!tree.apply_drag_offset("unknown", 1.0, 1.0));
}

#[test]
fn parent_lookup() {
    let tree = demo_tree();
    assert_eq!(tree.parent_id_of("c2-1-1"), Some("c2-1"));
    assert_eq!(tree.parent_id_of("c1"), Some("root"));
    assert_eq!(tree.parent_id_of("root"), None);
    assert_eq!(tree.parent_id_of("unknown"), None);
}
