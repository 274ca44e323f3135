//! Depth-first traversal over the node arena.

use crate::tree::{Node, NodeId, SyntaxTree};

/// What the walker does after [`Visitor::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not descend into this node's children.
    Skip,
    Stop,
}

pub trait Visitor {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId, node: &Node) -> Walk;

    fn leave(&mut self, _tree: &SyntaxTree, _id: NodeId, _node: &Node) {}
}

/// Walks the subtree rooted at `start` in source order. Iterative, so deep
/// trees cannot overflow the stack.
pub fn walk<V: Visitor + ?Sized>(tree: &SyntaxTree, start: NodeId, visitor: &mut V) {
    enum Step {
        Enter(NodeId),
        Leave(NodeId),
    }

    let mut stack = vec![Step::Enter(start)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                let node = tree.node(id);
                match visitor.enter(tree, id, node) {
                    Walk::Stop => return,
                    Walk::Skip => visitor.leave(tree, id, node),
                    Walk::Continue => {
                        stack.push(Step::Leave(id));
                        stack.extend(node.children.iter().rev().map(|c| Step::Enter(*c)));
                    }
                }
            }
            Step::Leave(id) => visitor.leave(tree, id, tree.node(id)),
        }
    }
}

/// Binding identifiers that start exactly at `offset`.
pub fn bindings_at(tree: &SyntaxTree, offset: u32) -> Vec<NodeId> {
    struct Collect {
        offset: u32,
        found: Vec<NodeId>,
    }

    impl Visitor for Collect {
        fn enter(&mut self, tree: &SyntaxTree, id: NodeId, node: &Node) -> Walk {
            if node.span.start > self.offset && !node.span.is_empty() {
                return Walk::Skip;
            }
            if node.span.start == self.offset
                && !node.span.is_empty()
                && tree.ident(id).is_some_and(|i| i.is_binding())
            {
                self.found.push(id);
            }
            Walk::Continue
        }
    }

    let mut collect = Collect {
        offset,
        found: Vec::new(),
    };
    walk(tree, tree.root(), &mut collect);
    collect.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use crate::{Dialect, parse};

    struct Names(Vec<String>);

    impl Visitor for Names {
        fn enter(&mut self, tree: &SyntaxTree, id: NodeId, node: &Node) -> Walk {
            if let NodeKind::Function(_) = node.kind {
                if id != tree.root() && !self.0.is_empty() {
                    return Walk::Skip;
                }
            }
            if let Some(name) = tree.name_of(id) {
                self.0.push(name.to_string());
            }
            Walk::Continue
        }
    }

    #[test]
    fn walks_in_source_order_and_honours_skip() {
        let tree = parse("const a = 1;\nfunction f(b) { c; }\nd;", Dialect::javascript()).unwrap();
        let mut names = Names(vec![]);
        walk(&tree, tree.root(), &mut names);
        assert_eq!(names.0, vec!["a", "d"]);
    }

    #[test]
    fn finds_binding_at_offset() {
        let src = "function f(temp) { return temp2; }";
        let tree = parse(src, Dialect::javascript()).unwrap();
        let found = bindings_at(&tree, src.find("temp").unwrap() as u32);
        assert_eq!(found.len(), 1);
        assert_eq!(tree.name_of(found[0]), Some("temp"));
        assert!(bindings_at(&tree, src.find("temp2").unwrap() as u32).is_empty());
    }
}
