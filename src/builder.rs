//! Assembles grammar trees one node at a time.
//!
//! Open nodes live in an arena of frames. Each frame knows the index of the
//! frame it will be attached to once it is closed, so nodes are only linked
//! into the tree when they are complete.
//!
//! ```
//! use ebnf::{Builder, Node};
//!
//! let tree = Builder::syntax("Example")
//!     .rule("literal")
//!         .choice()
//!             .literal("'a'")
//!             .identifier("b")
//!         .end()
//!     .rule("b")
//!         .identifier("c")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tree.count_children(), 2);
//! ```

use std::mem;

use crate::ast::{Node, NodeKind, DEFAULT_META};
use crate::error::BuildError;

/// Payload of a node that is still being built.
#[derive(Debug)]
enum Pending {
    Syntax { title: String, meta: String },
    Rule { name: String },
    Sequence,
    Choice,
    Option,
    Loop,
    Group,
}

impl Pending {
    fn kind(&self) -> NodeKind {
        match self {
            Pending::Syntax { .. } => NodeKind::Syntax,
            Pending::Rule { .. } => NodeKind::Rule,
            Pending::Sequence => NodeKind::Sequence,
            Pending::Choice => NodeKind::Choice,
            Pending::Option => NodeKind::Option,
            Pending::Loop => NodeKind::Loop,
            Pending::Group => NodeKind::Group,
        }
    }
}

#[derive(Debug)]
struct Frame {
    pending: Pending,
    children: Vec<Node>,
    /// Arena index of the enclosing frame. Only the syntax frame has none.
    parent: Option<usize>,
}

impl Frame {
    fn new(pending: Pending, parent: Option<usize>) -> Self {
        Frame {
            pending,
            children: Vec::new(),
            parent,
        }
    }

    /// Turn the frame into a node. With `collapse` a sequence or choice with
    /// a single member is replaced by that member.
    fn into_node(self, collapse: bool) -> Result<Node, BuildError> {
        let kind = self.pending.kind();
        let mut children = self.children;
        match self.pending {
            Pending::Sequence | Pending::Choice if collapse && children.len() == 1 => {
                Ok(children.remove(0))
            }
            Pending::Syntax { title, meta } => Ok(Node::Syntax {
                title,
                meta,
                rules: children,
            }),
            Pending::Rule { name } => Ok(Node::Rule {
                name,
                expression: single_child(kind, children)?,
            }),
            Pending::Sequence => Ok(Node::Sequence(children)),
            Pending::Choice => Ok(Node::Choice(children)),
            Pending::Option => Ok(Node::Option(single_child(kind, children)?)),
            Pending::Loop => Ok(Node::Loop(single_child(kind, children)?)),
            Pending::Group => Ok(Node::Group(single_child(kind, children)?)),
        }
    }
}

fn single_child(kind: NodeKind, mut children: Vec<Node>) -> Result<Box<Node>, BuildError> {
    match children.len() {
        1 => Ok(Box::new(children.remove(0))),
        found => Err(BuildError::ChildCount { kind, found }),
    }
}

/// Builds a syntax tree.
///
/// All methods chain. Misuse, such as ending the syntax node itself, is
/// remembered and reported by [`Builder::build`].
#[derive(Debug)]
pub struct Builder {
    /// Open frames. The syntax frame is always first, the innermost open
    /// node always last.
    frames: Vec<Frame>,
    error: Option<BuildError>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    /// Start a syntax with an empty title and the default meta.
    pub fn new() -> Self {
        Builder {
            frames: vec![Frame::new(
                Pending::Syntax {
                    title: String::new(),
                    meta: DEFAULT_META.to_owned(),
                },
                None,
            )],
            error: None,
        }
    }

    pub fn syntax(title: impl Into<String>) -> Self {
        let mut builder = Builder::new();
        builder.title(title);
        builder
    }

    pub fn title(&mut self, value: impl Into<String>) -> &mut Self {
        if let Some(Frame {
            pending: Pending::Syntax { title, .. },
            ..
        }) = self.frames.first_mut()
        {
            *title = value.into();
        }
        self
    }

    pub fn meta(&mut self, value: impl Into<String>) -> &mut Self {
        if let Some(Frame {
            pending: Pending::Syntax { meta, .. },
            ..
        }) = self.frames.first_mut()
        {
            *meta = value.into();
        }
        self
    }

    /// Start a new rule. Any nodes still open, including a previous rule, are
    /// ended first.
    pub fn rule(&mut self, name: impl Into<String>) -> &mut Self {
        while self.frames.len() > 1 && self.error.is_none() {
            self.end();
        }
        self.open(Pending::Rule { name: name.into() })
    }

    pub fn sequence(&mut self) -> &mut Self {
        self.open(Pending::Sequence)
    }

    pub fn choice(&mut self) -> &mut Self {
        self.open(Pending::Choice)
    }

    pub fn option(&mut self) -> &mut Self {
        self.open(Pending::Option)
    }

    /// Open a loop node.
    pub fn repetition(&mut self) -> &mut Self {
        self.open(Pending::Loop)
    }

    pub fn group(&mut self) -> &mut Self {
        self.open(Pending::Group)
    }

    pub fn identifier(&mut self, name: impl Into<String>) -> &mut Self {
        self.attach(Node::Identifier(name.into()));
        self
    }

    /// Add a literal. `text` is kept as given, quotes included.
    pub fn literal(&mut self, text: impl Into<String>) -> &mut Self {
        self.attach(Node::Literal(text.into()));
        self
    }

    /// Close the innermost open node and attach it to its parent.
    pub fn end(&mut self) -> &mut Self {
        self.close(false);
        self
    }

    /// Like [`Builder::end`], but a sequence or choice holding exactly one
    /// node is replaced by that node.
    pub fn end_collapsing(&mut self) -> &mut Self {
        self.close(true);
        self
    }

    /// Close every open node and hand out the finished syntax tree. The
    /// builder is reset afterwards.
    pub fn build(&mut self) -> Result<Node, BuildError> {
        let mut this = mem::take(self);
        while this.frames.len() > 1 && this.error.is_none() {
            this.close(false);
        }
        if let Some(err) = this.error {
            return Err(err);
        }
        match this.frames.pop() {
            Some(root) => root.into_node(false),
            None => Err(BuildError::UnbalancedEnd),
        }
    }

    fn open(&mut self, pending: Pending) -> &mut Self {
        let parent = self.frames.len() - 1;
        self.frames.push(Frame::new(pending, Some(parent)));
        self
    }

    fn close(&mut self, collapse: bool) {
        let parent = match self.frames.last().and_then(|frame| frame.parent) {
            Some(parent) => parent,
            None => return self.fail(BuildError::UnbalancedEnd),
        };
        if let Some(frame) = self.frames.pop() {
            match frame.into_node(collapse) {
                Ok(node) => self.attach_to(parent, node),
                Err(err) => self.fail(err),
            }
        }
    }

    fn attach(&mut self, node: Node) {
        let current = self.frames.len() - 1;
        self.attach_to(current, node);
    }

    fn attach_to(&mut self, idx: usize, node: Node) {
        let kind = node.kind();
        let at_root = matches!(
            self.frames.get(idx),
            Some(Frame {
                pending: Pending::Syntax { .. },
                ..
            })
        );
        if at_root && kind != NodeKind::Rule {
            return self.fail(BuildError::Misplaced(kind));
        }
        if let Some(frame) = self.frames.get_mut(idx) {
            frame.children.push(node);
        }
    }

    /// Remember the first error only.
    fn fail(&mut self, err: BuildError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Node {
        Node::Identifier(name.to_owned())
    }

    #[test]
    fn build_rules() {
        let tree = Builder::syntax("Rules")
            .rule("comment1")
            .identifier("literal1")
            .end()
            .rule("comment2")
            .identifier("literal2")
            .build()
            .unwrap();

        assert_eq!(
            tree,
            Node::Syntax {
                title: "Rules".to_owned(),
                meta: DEFAULT_META.to_owned(),
                rules: vec![
                    Node::Rule {
                        name: "comment1".to_owned(),
                        expression: Box::new(ident("literal1")),
                    },
                    Node::Rule {
                        name: "comment2".to_owned(),
                        expression: Box::new(ident("literal2")),
                    },
                ],
            }
        );
    }

    #[test]
    fn build_nested() {
        let tree = Builder::new()
            .meta("meta")
            .rule("literal")
            .choice()
            .sequence()
            .literal("\"'\"")
            .identifier("character")
            .repetition()
            .identifier("character")
            .end()
            .literal("\"'\"")
            .end()
            .group()
            .option()
            .identifier("x")
            .end()
            .end()
            .end()
            .build()
            .unwrap();

        let lit = || Node::Literal("\"'\"".to_owned());
        assert_eq!(
            tree,
            Node::Syntax {
                title: String::new(),
                meta: "meta".to_owned(),
                rules: vec![Node::Rule {
                    name: "literal".to_owned(),
                    expression: Box::new(Node::Choice(vec![
                        Node::Sequence(vec![
                            lit(),
                            ident("character"),
                            Node::Loop(Box::new(ident("character"))),
                            lit(),
                        ]),
                        Node::Group(Box::new(Node::Option(Box::new(ident("x"))))),
                    ])),
                }],
            }
        );
    }

    #[test]
    fn end_collapsing() {
        let tree = Builder::new()
            .rule("a")
            .choice()
            .sequence()
            .identifier("b")
            .end_collapsing()
            .end_collapsing()
            .build()
            .unwrap();
        assert_eq!(tree.children()[0].children()[0], ident("b"));

        let tree = Builder::new()
            .rule("a")
            .sequence()
            .identifier("b")
            .end()
            .build()
            .unwrap();
        assert_eq!(tree.children()[0].children()[0], Node::Sequence(vec![ident("b")]));
    }

    #[test]
    fn build_errors() {
        let err = Builder::new().end().build().unwrap_err();
        assert_eq!(err, BuildError::UnbalancedEnd);

        let err = Builder::new().identifier("a").build().unwrap_err();
        assert_eq!(err, BuildError::Misplaced(NodeKind::Identifier));

        let err = Builder::new()
            .rule("a")
            .identifier("b")
            .identifier("c")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::ChildCount {
                kind: NodeKind::Rule,
                found: 2
            }
        );

        let err = Builder::new().rule("a").option().build().unwrap_err();
        assert_eq!(
            err,
            BuildError::ChildCount {
                kind: NodeKind::Option,
                found: 0
            }
        );
    }

    #[test]
    fn build_resets() {
        let mut builder = Builder::syntax("one");
        builder.rule("a").identifier("b");
        let first = builder.build().unwrap();
        assert_eq!(first.count_children(), 1);

        let second = builder.build().unwrap();
        assert_eq!(second, Builder::new().build().unwrap());
    }
}
