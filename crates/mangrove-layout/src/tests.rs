use super::*;

fn leaf(id: &str) -> TreeNode {
    TreeNode {
        id: id.to_string(),
        children: Vec::new(),
        offset: Point::default(),
    }
}

fn node(id: &str, children: Vec<usize>) -> TreeNode {
    TreeNode {
        id: id.to_string(),
        children,
        offset: Point::default(),
    }
}

fn positions(placement: &Placement) -> std::collections::BTreeMap<String, Point> {
    placement
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.position))
        .collect()
}

#[test]
fn root_alone_sits_at_origin() {
    let tree = Tree {
        nodes: vec![leaf("r")],
    };
    let placement = layout(&tree, &LayoutOptions::default()).unwrap();
    assert_eq!(placement.nodes.len(), 1);
    assert_eq!(placement.nodes[0].position, Point { x: 0.0, y: 0.0 });
    assert_eq!(placement.nodes[0].depth, 0);
    assert!(placement.nodes[0].side.is_none());
    assert!(placement.links.is_empty());
}

#[test]
fn two_children_mirror_across_the_root() {
    let tree = Tree {
        nodes: vec![node("r", vec![1, 2]), leaf("a"), leaf("b")],
    };
    let opts = LayoutOptions::default();
    let placement = layout(&tree, &opts).unwrap();
    let pos = positions(&placement);

    let expected = opts.depth_spacing + opts.root_clearance;
    assert_eq!(pos["a"].x, expected);
    assert_eq!(pos["b"].x, -expected);
    assert_eq!(pos["a"].y, 0.0);
    assert_eq!(pos["b"].y, 0.0);

    let sides: std::collections::BTreeMap<_, _> = placement
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.side))
        .collect();
    assert_eq!(sides["a"], Some(Side::Right));
    assert_eq!(sides["b"], Some(Side::Left));
    assert_eq!(sides["r"], None);
}

#[test]
fn siblings_do_not_overlap_and_parent_is_centered() {
    let tree = Tree {
        nodes: vec![
            node("r", vec![1]),
            node("b", vec![2, 3, 4]),
            leaf("c1"),
            leaf("c2"),
            leaf("c3"),
        ],
    };
    let opts = LayoutOptions::default();
    let placement = layout(&tree, &opts).unwrap();
    let pos = positions(&placement);

    let min_gap = opts.sibling_separation * opts.breadth_spacing;
    assert!(pos["c2"].y - pos["c1"].y >= min_gap - 1e-9);
    assert!(pos["c3"].y - pos["c2"].y >= min_gap - 1e-9);

    let midpoint = (pos["c1"].y + pos["c3"].y) / 2.0;
    assert!((pos["b"].y - midpoint).abs() < 1e-9);

    // Depth axis: b at depth 1, leaves at depth 2, all on the right side.
    assert_eq!(pos["b"].x, opts.depth_spacing + opts.root_clearance);
    assert_eq!(pos["c1"].x, 2.0 * opts.depth_spacing + opts.root_clearance);
}

#[test]
fn same_side_branch_subtrees_stay_apart() {
    // Children a, b, c of the root: parity sends a and c to the right.
    let tree = Tree {
        nodes: vec![
            node("r", vec![1, 4, 5]),
            node("a", vec![2, 3]),
            leaf("a1"),
            leaf("a2"),
            leaf("b"),
            node("c", vec![6, 7]),
            leaf("c1"),
            leaf("c2"),
        ],
    };
    let placement = layout(&tree, &LayoutOptions::default()).unwrap();
    let pos = positions(&placement);

    let a_max = pos["a"].y.max(pos["a1"].y).max(pos["a2"].y);
    let c_min = pos["c"].y.min(pos["c1"].y).min(pos["c2"].y);
    assert!(
        a_max < c_min,
        "subtrees overlap: a up to {a_max}, c down to {c_min}"
    );

    // b is alone on the left.
    assert!(pos["b"].x < 0.0);
    assert!(pos["a"].x > 0.0 && pos["c"].x > 0.0);
}

#[test]
fn manual_offsets_fold_in_additively() {
    let mut tree = Tree {
        nodes: vec![node("r", vec![1]), leaf("a")],
    };
    let opts = LayoutOptions::default();
    let base = positions(&layout(&tree, &opts).unwrap());

    tree.nodes[1].offset = Point { x: 12.5, y: -30.0 };
    let shifted = positions(&layout(&tree, &opts).unwrap());

    // `x` of the offset is a breadth (visual Y) correction, `y` a depth
    // (visual X) correction.
    assert_eq!(shifted["a"].y, base["a"].y + 12.5);
    assert_eq!(shifted["a"].x, base["a"].x - 30.0);
    assert_eq!(shifted["r"], base["r"]);
}

#[test]
fn depth_one_links_bind_to_the_true_root() {
    let tree = Tree {
        nodes: vec![node("r", vec![1, 2]), node("a", vec![3]), leaf("b"), leaf("a1")],
    };
    let placement = layout(&tree, &LayoutOptions::default()).unwrap();

    let link_a = placement.links.iter().find(|l| l.target == "a").unwrap();
    assert_eq!(link_a.source, "r");
    assert_eq!(link_a.source_point, Point { x: 0.0, y: 0.0 });
    assert_eq!(link_a.target_point, placement.position_of("a").unwrap());

    let link_a1 = placement.links.iter().find(|l| l.target == "a1").unwrap();
    assert_eq!(link_a1.source, "a");
}

#[test]
fn layout_is_deterministic() {
    let tree = Tree {
        nodes: vec![
            node("r", vec![1, 2, 3]),
            node("a", vec![4]),
            leaf("b"),
            leaf("c"),
            leaf("a1"),
        ],
    };
    let opts = LayoutOptions::default();
    let first = serde_json::to_string(&layout(&tree, &opts).unwrap()).unwrap();
    let second = serde_json::to_string(&layout(&tree, &opts).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_arenas_are_rejected() {
    assert!(matches!(
        layout(&Tree { nodes: vec![] }, &LayoutOptions::default()),
        Err(Error::EmptyTree)
    ));

    let out_of_bounds = Tree {
        nodes: vec![node("r", vec![5])],
    };
    assert!(matches!(
        layout(&out_of_bounds, &LayoutOptions::default()),
        Err(Error::ChildOutOfBounds { index: 5 })
    ));

    let shared_child = Tree {
        nodes: vec![node("r", vec![1, 1]), leaf("a")],
    };
    assert!(matches!(
        layout(&shared_child, &LayoutOptions::default()),
        Err(Error::DuplicateChild { index: 1 })
    ));

    let orphan = Tree {
        nodes: vec![node("r", vec![]), leaf("a")],
    };
    assert!(matches!(
        layout(&orphan, &LayoutOptions::default()),
        Err(Error::UnreachableNode { index: 1 })
    ));
}

mod reconciliation {
    use super::*;

    fn place(entries: &[(&str, Option<&str>, f64, f64)]) -> Placement {
        let nodes: Vec<Placed> = entries
            .iter()
            .map(|(id, parent, x, y)| Placed {
                id: id.to_string(),
                parent: parent.map(|p| p.to_string()),
                depth: u32::from(parent.is_some()),
                side: parent.map(|_| Side::Right),
                position: Point { x: *x, y: *y },
            })
            .collect();
        let links = nodes
            .iter()
            .filter_map(|n| {
                let parent = n.parent.as_ref()?;
                let source_point = nodes
                    .iter()
                    .find(|p| &p.id == parent)
                    .map(|p| p.position)?;
                Some(PlacedLink {
                    source: parent.clone(),
                    target: n.id.clone(),
                    source_point,
                    target_point: n.position,
                })
            })
            .collect();
        Placement { nodes, links }
    }

    #[test]
    fn first_pass_enters_everything_from_the_origin() {
        let mut memory = PositionMemory::default();
        let placement = place(&[("r", None, 0.0, 0.0), ("a", Some("r"), 240.0, 0.0)]);
        let patch = reconcile(&mut memory, &placement, None, 400);

        assert_eq!(patch.duration, 400);
        assert_eq!(patch.enter.len(), 2);
        assert!(patch.update.is_empty() && patch.exit.is_empty());
        for t in &patch.enter {
            assert_eq!(t.from, Point { x: 0.0, y: 0.0 });
        }
        assert_eq!(patch.link_enter.len(), 1);
        assert_eq!(memory.tracked(), 2);
        assert!(memory.was_rendered("a"));
    }

    #[test]
    fn removed_nodes_exit_toward_the_source_and_stay_tracked() {
        let mut memory = PositionMemory::default();
        let before = place(&[("r", None, 0.0, 0.0), ("a", Some("r"), 240.0, 0.0)]);
        reconcile(&mut memory, &before, None, 400);

        // Collapse "r": the child leaves the scene and is sucked into r's new
        // position.
        let after = place(&[("r", None, 10.0, 5.0)]);
        let patch = reconcile(&mut memory, &after, Some("r"), 400);

        assert_eq!(patch.exit.len(), 1);
        assert_eq!(patch.exit[0].id, "a");
        assert_eq!(patch.exit[0].from, Point { x: 240.0, y: 0.0 });
        assert_eq!(patch.exit[0].to, Point { x: 10.0, y: 5.0 });
        assert_eq!(patch.link_exit.len(), 1);

        // The exited id keeps its last position for future re-entry anchoring.
        assert_eq!(memory.position("a"), Some(Point { x: 240.0, y: 0.0 }));
        assert!(!memory.was_rendered("a"));
    }

    #[test]
    fn reentering_nodes_anchor_at_their_parents_previous_position() {
        let mut memory = PositionMemory::default();
        let collapsed = place(&[("r", None, 10.0, 5.0)]);
        reconcile(&mut memory, &collapsed, None, 400);

        let expanded = place(&[("r", None, 0.0, 0.0), ("a", Some("r"), 240.0, 0.0)]);
        let patch = reconcile(&mut memory, &expanded, Some("r"), 400);

        assert_eq!(patch.enter.len(), 1);
        assert_eq!(patch.enter[0].id, "a");
        // Anchor is r's previous position, not the origin fallback.
        assert_eq!(patch.enter[0].from, Point { x: 10.0, y: 5.0 });
        assert_eq!(patch.enter[0].to, Point { x: 240.0, y: 0.0 });
        assert_eq!(patch.update.len(), 1);
        assert_eq!(patch.update[0].id, "r");
        assert_eq!(patch.update[0].from, Point { x: 10.0, y: 5.0 });

        // The entering link collapses out of the same anchor.
        assert_eq!(patch.link_enter.len(), 1);
        assert_eq!(patch.link_enter[0].from.source, Point { x: 10.0, y: 5.0 });
        assert_eq!(patch.link_enter[0].from.target, Point { x: 10.0, y: 5.0 });
    }

    #[test]
    fn every_placed_id_lands_in_exactly_one_set() {
        let mut memory = PositionMemory::default();
        let first = place(&[
            ("r", None, 0.0, 0.0),
            ("a", Some("r"), 240.0, -40.0),
            ("b", Some("r"), -240.0, 40.0),
        ]);
        reconcile(&mut memory, &first, None, 400);

        let second = place(&[
            ("r", None, 0.0, 0.0),
            ("b", Some("r"), -240.0, 0.0),
            ("c", Some("r"), 240.0, 0.0),
        ]);
        let patch = reconcile(&mut memory, &second, Some("r"), 400);

        let mut seen: Vec<&str> = patch
            .enter
            .iter()
            .chain(&patch.update)
            .map(|t| t.id.as_str())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["b", "c", "r"]);

        assert_eq!(patch.exit.len(), 1);
        assert_eq!(patch.exit[0].id, "a");

        // Memory covers every id ever rendered.
        assert_eq!(memory.tracked(), 4);
    }

    #[test]
    fn zero_duration_passes_are_marked_instantaneous() {
        let mut memory = PositionMemory::default();
        let placement = place(&[("r", None, 0.0, 0.0)]);
        let patch = reconcile(&mut memory, &placement, None, 0);
        assert_eq!(patch.duration, 0);
    }
}
