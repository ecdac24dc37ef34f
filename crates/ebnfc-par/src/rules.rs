//! The rule table: one grammar's arena of combinators plus its
//! name-to-node map.
//!
//! The table owns every node. Rules keep insertion order (the order the
//! grammar text defined them), so printing a table is deterministic.
//! Once parsing begins the table is only read; the single exception is
//! the lazily-bound cache inside `Ref` nodes.

use std::fmt;
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::node::{Combinator, CustomRule, NodeId, NodeKind};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// A name-keyed grammar: arena plus rule bindings.
#[derive(Default)]
pub struct RuleTable {
    arena: Vec<Combinator>,
    rules: FxIndexMap<String, NodeId>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an anonymous node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(Combinator::new(kind));
        id
    }

    pub fn node(&self, id: NodeId) -> &Combinator {
        &self.arena[id.index()]
    }

    /// Registers `name` as a rule and returns its body node.
    ///
    /// A new name gets an empty sequence to fill in. An existing name is
    /// returned for reuse only while its body is still empty (a forward
    /// reference created the placeholder); re-defining a rule that
    /// already has a body returns `None`.
    pub fn add_rule(&mut self, name: &str) -> Option<NodeId> {
        if let Some(&id) = self.rules.get(name) {
            return self.is_empty_rule(id).then_some(id);
        }
        let id = self.alloc(NodeKind::Seq(Vec::new()));
        self.arena[id.index()].name = Some(name.to_string());
        self.rules.insert(name.to_string(), id);
        Some(id)
    }

    /// Binds `name` to a host-supplied rule, replacing any previous
    /// binding (including grammar placeholders).
    pub fn set_custom(&mut self, name: &str, rule: Box<dyn CustomRule>) -> NodeId {
        let id = self.alloc(NodeKind::Custom(rule));
        self.arena[id.index()].name = Some(name.to_string());
        self.rules.insert(name.to_string(), id);
        id
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.rules.get(name).copied()
    }

    /// Rule names and bodies in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.rules.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True for a rule body that never received content (a forward
    /// reference placeholder).
    pub fn is_empty_rule(&self, id: NodeId) -> bool {
        matches!(&self.node(id).kind, NodeKind::Seq(children) if children.is_empty())
    }

    /// Appends `child` to a sequence or alternative node.
    pub(crate) fn push_child(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.arena[parent.index()].kind {
            NodeKind::Seq(children) | NodeKind::Alt(children) => children.push(child),
            _ => unreachable!("push_child on a leaf combinator"),
        }
    }

    /// Removes and returns the children of a sequence node. Used when a
    /// `|` upgrades an in-progress sequence into an alternative.
    pub(crate) fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        match &mut self.arena[id.index()].kind {
            NodeKind::Seq(children) => std::mem::take(children),
            _ => unreachable!("take_children on a non-sequence combinator"),
        }
    }

    /// Canonical string form of one combinator.
    pub fn render(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Literal(text) => format!("\"{text}\""),
            NodeKind::Ref { target, .. } => format!("<{target}>"),
            NodeKind::Seq(children) => match children.as_slice() {
                [] => String::new(),
                [only] => self.render(*only),
                many => {
                    let inner = many
                        .iter()
                        .map(|&c| self.render(c))
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("( {inner} )")
                }
            },
            NodeKind::Alt(children) => children
                .iter()
                .map(|&c| self.render(c))
                .collect::<Vec<_>>()
                .join(" | "),
            NodeKind::Opt(child) => format!("[ {} ]", self.render(*child)),
            NodeKind::Star(child) => format!("{{ {} }}", self.render(*child)),
            NodeKind::Plus(child) => format!("{}+", self.render(*child)),
            NodeKind::Custom(rule) => format!("*{}*", rule.name()),
        }
    }
}

impl fmt::Display for RuleTable {
    /// One line per rule: `<name>\t\t::= body`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, id) in self.rules() {
            if !first {
                writeln!(f)?;
            }
            write!(f, "<{}>\t\t::= {}", name, self.render(id))?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleTable({} rules, {} nodes)", self.rules.len(), self.arena.len())
    }
}
