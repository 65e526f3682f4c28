use std::fmt::{self, Display};
use std::slice;
use std::str::FromStr;

use crate::error::Error;
use crate::notification::Notification;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::visitor::Visitor;

/// Meta string of a syntax that doesn't declare its own.
pub const DEFAULT_META: &str = "xis/ebnf v2.0 http://wiki.karmin.ch/ebnf/ gpl3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Syntax,
    Rule,
    Identifier,
    Literal,
    Sequence,
    Choice,
    Option,
    Loop,
    Group,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            NodeKind::Syntax => "syntax",
            NodeKind::Rule => "rule",
            NodeKind::Identifier => "identifier",
            NodeKind::Literal => "literal",
            NodeKind::Sequence => "sequence",
            NodeKind::Choice => "choice",
            NodeKind::Option => "option",
            NodeKind::Loop => "loop",
            NodeKind::Group => "group",
        };
        write!(f, "{}", s)
    }
}

/// A node of a grammar tree.
///
/// Every node owns its children, so a tree is never shared and never cyclic.
/// Children are kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The root. Its children are rules.
    Syntax {
        title: String,
        meta: String,
        rules: Vec<Node>,
    },
    Rule {
        name: String,
        expression: Box<Node>,
    },
    /// A reference to a rule.
    Identifier(String),
    /// A quoted terminal, quotes included.
    Literal(String),
    Sequence(Vec<Node>),
    /// Alternatives, in order.
    Choice(Vec<Node>),
    Option(Box<Node>),
    Loop(Box<Node>),
    Group(Box<Node>),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Syntax { .. } => NodeKind::Syntax,
            Node::Rule { .. } => NodeKind::Rule,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Literal(_) => NodeKind::Literal,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Choice(_) => NodeKind::Choice,
            Node::Option(_) => NodeKind::Option,
            Node::Loop(_) => NodeKind::Loop,
            Node::Group(_) => NodeKind::Group,
        }
    }

    /// Direct children in order.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Syntax { rules, .. } => rules.as_slice(),
            Node::Sequence(nodes) | Node::Choice(nodes) => nodes.as_slice(),
            Node::Rule { expression: node, .. }
            | Node::Option(node)
            | Node::Loop(node)
            | Node::Group(node) => slice::from_ref(node.as_ref()),
            Node::Identifier(_) | Node::Literal(_) => &[],
        }
    }

    pub fn count_children(&self) -> usize {
        self.children().len()
    }

    pub fn has_children(&self) -> bool {
        self.count_children() > 0
    }

    /// Walk the tree depth first, calling the visitor's hooks for every node
    /// before descending into its children.
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.before_visit(self);
        visitor.visit(self);
        for child in self.children() {
            child.accept(visitor);
        }
        visitor.after_visit(self);
    }

    /// Leaves have a depth of one, every other node is one deeper than its
    /// deepest child.
    pub fn depth(&self) -> usize {
        match self {
            Node::Identifier(_) | Node::Literal(_) => 1,
            _ => 1 + self.children().iter().map(Node::depth).max().unwrap_or(0),
        }
    }

    /// Compare this node against `other`, recording every difference in
    /// `result`.
    ///
    /// Only the children of `self` are walked. A child of `other` without a
    /// counterpart in `self` shows up in the child count message only, so
    /// both directions must be probed for a full report.
    pub fn probe_equivalence(&self, other: &Node, result: &mut Notification) {
        if self.kind() != other.kind() {
            result.error(format!(
                "Probed node types mismatch: '{}' != '{}'!",
                self.kind(),
                other.kind()
            ));
            return;
        }

        match (self, other) {
            (
                Node::Syntax { title, meta, .. },
                Node::Syntax {
                    title: other_title,
                    meta: other_meta,
                    ..
                },
            ) => {
                if title != other_title {
                    result.error(format!(
                        "Titles of syntax differ: '{}' != '{}'!",
                        title, other_title
                    ));
                }
                if meta != other_meta {
                    result.error(format!(
                        "Meta of syntax differ: '{}' != '{}'!",
                        meta, other_meta
                    ));
                }
            }
            (Node::Rule { name, .. }, Node::Rule { name: other_name, .. }) => {
                if name != other_name {
                    result.error(format!(
                        "Names of rule differ: '{}' != '{}'!",
                        name, other_name
                    ));
                }
            }
            (Node::Identifier(name), Node::Identifier(other_name)) => {
                if name != other_name {
                    result.error(format!(
                        "Identifier value mismatch: '{}' != '{}'!",
                        name, other_name
                    ));
                }
            }
            (Node::Literal(text), Node::Literal(other_text)) => {
                if text != other_text {
                    result.error(format!(
                        "Literal value mismatch: '{}' != '{}'!",
                        text, other_text
                    ));
                }
            }
            _ => (),
        }

        if self.count_children() != other.count_children() {
            result.error(format!(
                "Node {} has different child count than other: {} != {}!",
                self.kind(),
                self.count_children(),
                other.count_children()
            ));
        }

        let other_children = other.children();
        for (idx, child) in self.children().iter().enumerate() {
            match other_children.get(idx) {
                Some(other_child) => child.probe_equivalence(other_child, result),
                None => result.error("Other node has not the expected subnode!"),
            }
        }
    }
}

/// Writes the tree as EBNF text that parses back to an equal tree.
///
/// Only trees of the shape the parser produces have such a text. A sequence
/// or choice needs at least two members, and a member that is itself a
/// sequence or choice must be wrapped in a group, except for a sequence
/// inside a choice. Titles and meta can't hold both quote characters.
/// Anything else fails with [`fmt::Error`], which makes `to_string` panic, so
/// format builder made trees with `write!` when their shape isn't known.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Syntax { title, meta, rules } => {
                if !title.is_empty() {
                    write!(f, "{} ", quote(title)?)?;
                }
                writeln!(f, "{{")?;
                for rule in rules {
                    writeln!(f, "    {}", rule)?;
                }
                write!(f, "}}")?;
                if meta != DEFAULT_META {
                    write!(f, " {}", quote(meta)?)?;
                }
                write!(f, " .")
            }
            Node::Rule { name, expression } => write!(f, "{} = {} .", name, expression),
            Node::Identifier(name) => write!(f, "{}", name),
            Node::Literal(text) => write!(f, "{}", text),
            Node::Sequence(nodes) => write_members(f, nodes, " ", |n| {
                matches!(n, Node::Sequence(_) | Node::Choice(_))
            }),
            Node::Choice(nodes) => write_members(f, nodes, " | ", |n| matches!(n, Node::Choice(_))),
            Node::Option(node) => write!(f, "[ {} ]", node),
            Node::Loop(node) => write!(f, "{{ {} }}", node),
            Node::Group(node) => write!(f, "( {} )", node),
        }
    }
}

impl FromStr for Node {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(Scanner::new(s)).parse()
    }
}

/// Write `nodes` joined by `sep`. Fails for fewer than two members or for a
/// member that would only read back correctly inside a group.
fn write_members(
    f: &mut fmt::Formatter,
    nodes: &[Node],
    sep: &str,
    needs_group: fn(&Node) -> bool,
) -> fmt::Result {
    if nodes.len() < 2 || nodes.iter().any(needs_group) {
        return Err(fmt::Error);
    }
    for (idx, node) in nodes.iter().enumerate() {
        if idx > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

/// Quote a title or meta string with whichever quote it doesn't contain.
fn quote(s: &str) -> Result<String, fmt::Error> {
    match (s.contains('"'), s.contains('\'')) {
        (true, true) => Err(fmt::Error),
        (true, false) => Ok(format!("'{}'", s)),
        _ => Ok(format!("\"{}\"", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    fn ident(name: &str) -> Node {
        Node::Identifier(name.to_owned())
    }

    fn lit(text: &str) -> Node {
        Node::Literal(text.to_owned())
    }

    fn rule(name: &str, expression: Node) -> Node {
        Node::Rule {
            name: name.to_owned(),
            expression: Box::new(expression),
        }
    }

    fn syntax(title: &str, rules: Vec<Node>) -> Node {
        Node::Syntax {
            title: title.to_owned(),
            meta: DEFAULT_META.to_owned(),
            rules,
        }
    }

    fn probe(a: &Node, b: &Node) -> Notification {
        let mut n = Notification::new();
        a.probe_equivalence(b, &mut n);
        n
    }

    #[test]
    fn children() {
        let tests = vec![
            (ident("a"), 0),
            (lit("'a'"), 0),
            (Node::Loop(Box::new(ident("a"))), 1),
            (rule("r", ident("a")), 1),
            (Node::Sequence(vec![ident("a"), ident("b"), lit("'c'")]), 3),
            (Node::Choice(vec![]), 0),
            (syntax("", vec![rule("a", ident("b")), rule("c", ident("d"))]), 2),
        ];
        for test in tests {
            assert_eq!(test.0.count_children(), test.1, "node: {:?}", test.0);
            assert_eq!(test.0.has_children(), test.1 > 0, "node: {:?}", test.0);
        }
    }

    #[test]
    fn depth() {
        let tests = vec![
            (ident("a"), 1),
            (lit("'a'"), 1),
            (Node::Sequence(vec![]), 1),
            (syntax("", vec![]), 1),
            (Node::Option(Box::new(ident("a"))), 2),
            (
                Node::Choice(vec![
                    ident("a"),
                    Node::Group(Box::new(Node::Loop(Box::new(lit("'b'"))))),
                ]),
                4,
            ),
            (
                syntax("", vec![rule("a", ident("b")), rule("c", Node::Option(Box::new(ident("d"))))]),
                4,
            ),
        ];
        for test in tests {
            assert_eq!(test.0.depth(), test.1, "node: {:?}", test.0);
        }
    }

    #[test]
    fn probe_equal_trees() {
        let tree = syntax(
            "title",
            vec![rule(
                "a",
                Node::Sequence(vec![ident("b"), Node::Loop(Box::new(lit("\"c\"")))]),
            )],
        );
        assert!(probe(&tree, &tree.clone()).is_ok());
    }

    #[test]
    fn probe_kind_mismatch_stops() {
        let n = probe(&Node::Loop(Box::new(ident("a"))), &ident("a"));
        assert_eq!(n.report(), "Probed node types mismatch: 'loop' != 'identifier'!");
    }

    #[test]
    fn probe_scalar_fields() {
        let n = probe(&ident("a"), &ident("b"));
        assert_eq!(n.report(), "Identifier value mismatch: 'a' != 'b'!");
        let n = probe(&ident("b"), &ident("a"));
        assert_eq!(n.report(), "Identifier value mismatch: 'b' != 'a'!");

        let n = probe(&lit("'a'"), &lit("\"a\""));
        assert_eq!(n.report(), "Literal value mismatch: ''a'' != '\"a\"'!");

        let a = Node::Syntax {
            title: "one".to_owned(),
            meta: "m1".to_owned(),
            rules: vec![],
        };
        let b = Node::Syntax {
            title: "two".to_owned(),
            meta: "m2".to_owned(),
            rules: vec![],
        };
        assert_eq!(
            probe(&a, &b).report(),
            "Titles of syntax differ: 'one' != 'two'!\nMeta of syntax differ: 'm1' != 'm2'!"
        );
    }

    #[test]
    fn probe_collects_all_mismatches() {
        let a = syntax("", vec![rule("a", ident("x")), rule("b", ident("y"))]);
        let b = syntax("", vec![rule("a", ident("z")), rule("c", ident("y"))]);
        let n = probe(&a, &b);
        assert_eq!(
            n.report(),
            "Identifier value mismatch: 'x' != 'z'!\nNames of rule differ: 'b' != 'c'!"
        );
    }

    #[test]
    fn probe_is_asymmetric() {
        let long = Node::Sequence(vec![ident("a"), ident("b"), ident("c")]);
        let short = Node::Sequence(vec![ident("a")]);

        let n = probe(&long, &short);
        assert_eq!(
            n.report(),
            "Node sequence has different child count than other: 3 != 1!\n\
             Other node has not the expected subnode!\n\
             Other node has not the expected subnode!"
        );

        let n = probe(&short, &long);
        assert_eq!(
            n.report(),
            "Node sequence has different child count than other: 1 != 3!"
        );
    }

    #[test]
    fn display() {
        let tree = syntax(
            "EBNF",
            vec![
                rule(
                    "a",
                    Node::Choice(vec![
                        Node::Sequence(vec![ident("b"), lit("'c'")]),
                        Node::Option(Box::new(ident("d"))),
                    ]),
                ),
                rule("e", Node::Group(Box::new(Node::Loop(Box::new(lit("\"f\"")))))),
            ],
        );
        assert_eq!(
            tree.to_string(),
            "\"EBNF\" {\n    a = b 'c' | [ d ] .\n    e = ( { \"f\" } ) .\n} ."
        );
    }

    #[test]
    fn display_rejects_shapes_without_text() {
        let seq = Node::Sequence;
        let choice = Node::Choice;
        let tests = vec![
            seq(vec![choice(vec![ident("b"), ident("c")]), ident("d")]),
            seq(vec![ident("b"), seq(vec![ident("c"), ident("d")])]),
            choice(vec![ident("b"), choice(vec![ident("c"), ident("d")])]),
            seq(vec![ident("b")]),
            choice(vec![]),
            Node::Option(Box::new(seq(vec![]))),
            Node::Syntax {
                title: "say \"it's\"".to_owned(),
                meta: DEFAULT_META.to_owned(),
                rules: vec![],
            },
            Node::Syntax {
                title: String::new(),
                meta: "'\"".to_owned(),
                rules: vec![],
            },
        ];
        for test in tests {
            let mut out = String::new();
            assert!(write!(out, "{}", test).is_err(), "node: {:?}", test);
        }

        let grouped = seq(vec![
            Node::Group(Box::new(choice(vec![ident("b"), ident("c")]))),
            ident("d"),
        ]);
        assert_eq!(grouped.to_string(), "( b | c ) d");
        let title = syntax("it's", vec![]);
        assert_eq!(title.to_string(), "\"it's\" {\n} .");
    }

    #[test]
    fn display_then_parse() {
        let tree = syntax(
            "say \"hi\"",
            vec![rule(
                "a",
                Node::Sequence(vec![ident("b"), Node::Loop(Box::new(lit("'c'")))]),
            )],
        );
        let parsed: Node = tree.to_string().parse().unwrap();
        assert_eq!(parsed, tree);
    }
}
