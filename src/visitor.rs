use crate::ast::Node;

/// Hooks called by [`Node::accept`] for every node of a tree.
///
/// For each node `before_visit` and `visit` are called before its children
/// are walked, `after_visit` once they are done.
pub trait Visitor {
    fn before_visit(&mut self, _node: &Node) {}
    fn visit(&mut self, node: &Node);
    fn after_visit(&mut self, _node: &Node) {}
}
