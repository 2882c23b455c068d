//! Declarative tree-shape patterns.
//!
//! A [`Shape`] describes a node (kind, text, children) and may capture it
//! under a name. [`find_matches`] walks a tree in document order and
//! returns every match with its captures, the way a tree-sitter query does.

use rustc_hash::FxHashMap;

use crate::parser::ast::significant_text;
use crate::parser::{SyntaxKind, SyntaxNode};

/// Named nodes captured by one match
#[derive(Debug, Clone, Default)]
pub struct Captures(FxHashMap<&'static str, SyntaxNode>);

impl Captures {
    pub fn get(&self, name: &str) -> Option<&SyntaxNode> {
        self.0.get(name)
    }

    fn insert(&mut self, name: &'static str, node: SyntaxNode) {
        self.0.insert(name, node);
    }

    fn extend(&mut self, other: Captures) {
        self.0.extend(other.0);
    }
}

/// One match of a shape
#[derive(Debug, Clone)]
pub struct Match {
    pub node: SyntaxNode,
    pub captures: Captures,
}

#[derive(Debug, Clone)]
enum TextRule {
    Equals(&'static str),
    OneOf(&'static [&'static str]),
}

impl TextRule {
    fn accepts(&self, text: &str) -> bool {
        match self {
            Self::Equals(expected) => text == *expected,
            Self::OneOf(options) => options.contains(&text),
        }
    }
}

/// Where a child sequence may sit among a node's child nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Any contiguous window
    Anywhere,
    /// Starting at the first child
    Start,
    /// Covering all children exactly
    Exact,
}

#[derive(Debug, Clone)]
enum ChildRule {
    Any,
    Sequence(Anchor, Vec<Shape>),
    /// Every child matches, and there is at least one
    Each(Box<Shape>),
}

/// A pattern over one node and, optionally, its child nodes.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: Option<SyntaxKind>,
    not_kind: Option<SyntaxKind>,
    text: Option<TextRule>,
    capture: Option<&'static str>,
    children: ChildRule,
}

impl Shape {
    /// A node of `kind`
    pub fn node(kind: SyntaxKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::any()
        }
    }

    /// Any node
    pub fn any() -> Self {
        Self {
            kind: None,
            not_kind: None,
            text: None,
            capture: None,
            children: ChildRule::Any,
        }
    }

    /// Reject nodes of `kind`
    pub fn not(mut self, kind: SyntaxKind) -> Self {
        self.not_kind = Some(kind);
        self
    }

    /// Source text (trivia trimmed) must equal `text`
    pub fn text(mut self, text: &'static str) -> Self {
        self.text = Some(TextRule::Equals(text));
        self
    }

    pub fn text_in(mut self, options: &'static [&'static str]) -> Self {
        self.text = Some(TextRule::OneOf(options));
        self
    }

    pub fn capture(mut self, name: &'static str) -> Self {
        self.capture = Some(name);
        self
    }

    /// Child nodes contain `shapes` as a contiguous run
    pub fn children(mut self, shapes: Vec<Shape>) -> Self {
        self.children = ChildRule::Sequence(Anchor::Anywhere, shapes);
        self
    }

    /// Child nodes start with `shapes`
    pub fn first_children(mut self, shapes: Vec<Shape>) -> Self {
        self.children = ChildRule::Sequence(Anchor::Start, shapes);
        self
    }

    /// Child nodes are exactly `shapes`
    pub fn exact_children(mut self, shapes: Vec<Shape>) -> Self {
        self.children = ChildRule::Sequence(Anchor::Exact, shapes);
        self
    }

    /// Every child node matches `shape`
    pub fn each_child(mut self, shape: Shape) -> Self {
        self.children = ChildRule::Each(Box::new(shape));
        self
    }

    fn accepts_node(&self, node: &SyntaxNode) -> bool {
        if self.kind.is_some_and(|kind| node.kind() != kind) {
            return false;
        }
        if self.not_kind.is_some_and(|kind| node.kind() == kind) {
            return false;
        }
        match &self.text {
            Some(rule) => rule.accepts(&significant_text(node)),
            None => true,
        }
    }

    /// First way `node` matches, if any
    pub fn match_first(&self, node: &SyntaxNode) -> Option<Captures> {
        self.match_all(node).into_iter().next()
    }

    /// Every way `node` matches; sequence windows each yield one result.
    pub fn match_all(&self, node: &SyntaxNode) -> Vec<Captures> {
        if !self.accepts_node(node) {
            return Vec::new();
        }
        let mut base = Captures::default();
        if let Some(name) = self.capture {
            base.insert(name, node.clone());
        }

        match &self.children {
            ChildRule::Any => vec![base],
            ChildRule::Each(shape) => {
                let mut any_child = false;
                for child in node.children() {
                    any_child = true;
                    match shape.match_first(&child) {
                        Some(captures) => base.extend(captures),
                        None => return Vec::new(),
                    }
                }
                if any_child { vec![base] } else { Vec::new() }
            }
            ChildRule::Sequence(anchor, shapes) => {
                let children: Vec<SyntaxNode> = node.children().collect();
                if children.len() < shapes.len()
                    || (*anchor == Anchor::Exact && children.len() != shapes.len())
                {
                    return Vec::new();
                }
                let last_start = match anchor {
                    Anchor::Anywhere => children.len() - shapes.len(),
                    Anchor::Start | Anchor::Exact => 0,
                };
                (0..=last_start)
                    .filter_map(|start| {
                        let mut captures = base.clone();
                        for (shape, child) in shapes.iter().zip(&children[start..]) {
                            captures.extend(shape.match_first(child)?);
                        }
                        Some(captures)
                    })
                    .collect()
            }
        }
    }
}

/// Every match of `shape` in the tree under `root`, in document order.
pub fn find_matches(root: &SyntaxNode, shape: &Shape) -> Vec<Match> {
    root.descendants()
        .flat_map(|node| {
            shape
                .match_all(&node)
                .into_iter()
                .map(move |captures| Match {
                    node: node.clone(),
                    captures,
                })
        })
        .collect()
}
