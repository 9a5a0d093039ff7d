use super::tree::{MapTree, Node};

fn branch(name: &str, id: &str, children: Vec<Node>) -> Node {
    let mut node = Node::with_id(name, id);
    node.children = children;
    node
}

/// The built-in "Project Launch" sample map. Ids are fixed so demo sessions
/// and tests are deterministic.
pub fn demo_tree() -> MapTree {
    MapTree::new(branch(
        "Project Launch",
        "root",
        vec![
            branch(
                "Preparation",
                "c1",
                vec![
                    Node::with_id("Research Market", "c1-1"),
                    Node::with_id("Define Goals", "c1-2"),
                    Node::with_id("Team Assembly", "c1-3"),
                ],
            ),
            branch(
                "Development",
                "c2",
                vec![
                    branch(
                        "Frontend",
                        "c2-1",
                        vec![
                            Node::with_id("React", "c2-1-1"),
                            Node::with_id("Tailwind", "c2-1-2"),
                        ],
                    ),
                    branch(
                        "Backend",
                        "c2-2",
                        vec![
                            Node::with_id("Node.js", "c2-2-1"),
                            Node::with_id("Database", "c2-2-2"),
                        ],
                    ),
                ],
            ),
            branch(
                "Marketing",
                "c3",
                vec![
                    Node::with_id("Social Media", "c3-1"),
                    Node::with_id("Email Campaign", "c3-2"),
                    Node::with_id("Launch Event", "c3-3"),
                ],
            ),
        ],
    ))
}
