// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `{name, children}` trees with summed values.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Deserialize;
use statviz_core::{Attributes, Datum};

use crate::raw::{NumberOrString, lenient, lenient_list};

/// One node of a hierarchical payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HierarchyRaw {
    /// Node name.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Leaf value (number or numeric string).
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<NumberOrString>,
    /// Leaf category; defaults to the parent's name.
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    /// Child nodes; absent on leaves.
    #[serde(default, deserialize_with = "lenient_list")]
    pub children: Option<Vec<HierarchyRaw>>,
}

/// Index of a node in a [`Hierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node.
    pub const ROOT: Self = Self(0);
}

/// A node of a [`Hierarchy`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Node name, empty when absent.
    pub name: String,
    /// Explicit category, if the payload gave one.
    pub category: Option<String>,
    /// The node's own value (leaves only).
    pub own_value: Option<f64>,
    /// Aggregated value; equals `own_value` until [`Hierarchy::sum`] runs.
    pub value: f64,
    /// Distance from the root.
    pub depth: usize,
    /// Parent node; `None` for the root.
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-allocated tree.
///
/// Nodes are stored in pre-order, so every parent precedes its descendants.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    dropped: usize,
}

impl Hierarchy {
    /// Builds a tree from a payload.
    ///
    /// Leaves without a non-negative numeric value are dropped with a warning.
    pub fn from_raw(raw: &HierarchyRaw) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            dropped: 0,
        };
        tree.push(raw, None, 0);
        if tree.dropped > 0 {
            log::debug!("hierarchy: dropped {} leaves", tree.dropped);
        }
        tree
    }

    fn push(&mut self, raw: &HierarchyRaw, parent: Option<NodeId>, depth: usize) {
        let name = raw.name.clone().unwrap_or_default();
        let children = raw.children.as_deref().filter(|c| !c.is_empty());
        let own_value = match children {
            Some(_) => None,
            None if depth == 0 => None,
            None => {
                match raw.value.as_ref().and_then(NumberOrString::as_f64) {
                    Some(v) if v >= 0.0 => Some(v),
                    _ => {
                        log::warn!("hierarchy: dropping leaf `{name}`: missing or invalid value");
                        self.dropped += 1;
                        return;
                    }
                }
            }
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            category: raw.category.clone(),
            own_value,
            value: own_value.unwrap_or(0.0),
            depth,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        for child in children.into_iter().flatten() {
            self.push(child, Some(id), depth + 1);
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves dropped while building.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The node at `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Children of `id`, in layout order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Aggregates leaf values into every ancestor.
    pub fn sum(&mut self) -> &mut Self {
        for node in &mut self.nodes {
            node.value = node.own_value.unwrap_or(0.0);
        }
        for i in (1..self.nodes.len()).rev() {
            if let Some(parent) = self.nodes[i].parent {
                self.nodes[parent.0].value += self.nodes[i].value;
            }
        }
        self
    }

    /// Orders every node's children by descending value. Ties keep input order.
    pub fn sort_by_value(&mut self) -> &mut Self {
        for i in 0..self.nodes.len() {
            let mut children = core::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| self.nodes[b.0].value.total_cmp(&self.nodes[a.0].value));
            self.nodes[i].children = children;
        }
        self
    }

    /// Leaf nodes in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.own_value.is_some())
            .map(|(i, _)| NodeId(i))
    }

    /// The leaf's category: its own, else its parent's name.
    pub fn category(&self, id: NodeId) -> &str {
        let node = self.node(id);
        match (&node.category, node.parent) {
            (Some(c), _) => c,
            (None, Some(p)) => &self.node(p).name,
            (None, None) => "",
        }
    }

    /// Distinct leaf categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for leaf in self.leaves() {
            let c = self.category(leaf);
            if !out.iter().any(|seen| seen == c) {
                out.push(c.to_string());
            }
        }
        out
    }

    /// Tooltip metadata for a leaf.
    pub fn leaf_datum(&self, id: NodeId) -> LeafDatum {
        let node = self.node(id);
        LeafDatum {
            name: node.name.clone(),
            category: self.category(id).to_string(),
            value: node.value,
        }
    }
}

/// What a tree-map tile shows about its leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafDatum {
    /// Leaf name.
    pub name: String,
    /// Leaf category.
    pub category: String,
    /// Leaf value.
    pub value: f64,
}

impl Datum for LeafDatum {
    fn tooltip(&self) -> String {
        format!("{} ({}):  {}", self.name, self.category, self.value)
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.push(("data-name", self.name.clone()));
        attrs.push(("data-category", self.category.clone()));
        attrs.push(("data-value", self.value.to_string()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use proptest::prelude::*;

    use super::*;

    const GAMES: &str = r#"{
        "name": "Video Game Sales Data Top 100",
        "children": [
            {"name": "Wii", "children": [
                {"name": "Wii Sports", "category": "Wii", "value": "82.53"},
                {"name": "Mario Kart Wii", "category": "Wii", "value": 35.52},
                {"name": "Broken", "category": "Wii"}
            ]},
            {"name": "DS", "children": [
                {"name": "New Super Mario Bros.", "value": "29.8"}
            ]}
        ]
    }"#;

    fn games() -> Hierarchy {
        let raw: HierarchyRaw = serde_json::from_str(GAMES).unwrap();
        Hierarchy::from_raw(&raw)
    }

    #[test]
    fn builds_and_sums() {
        let mut h = games();
        assert_eq!(h.dropped(), 1);
        h.sum();
        let root = h.node(NodeId::ROOT);
        assert!((root.value - (82.53 + 35.52 + 29.8)).abs() < 1e-9);
        let wii = h.children(NodeId::ROOT)[0];
        assert!((h.node(wii).value - (82.53 + 35.52)).abs() < 1e-9);
        assert_eq!(h.leaves().count(), 3);
    }

    #[test]
    fn mistyped_leaves_do_not_fail_the_tree() {
        let raw: HierarchyRaw = serde_json::from_str(
            r#"{"name": "root", "children": [
                {"name": "A", "children": [
                    {"name": 7, "category": ["A"], "value": 2},
                    {"name": "a2", "value": {"amount": 1}},
                    "a3",
                    {"name": "a4", "value": "3"}
                ]}
            ]}"#,
        )
        .unwrap();
        let mut h = Hierarchy::from_raw(&raw);
        assert_eq!(h.dropped(), 2);
        h.sum();
        let leaves: Vec<NodeId> = h.leaves().collect();
        assert_eq!(leaves.len(), 2);
        assert_eq!(h.node(leaves[0]).name, "");
        assert_eq!(h.category(leaves[0]), "A");
        assert_eq!(h.node(NodeId::ROOT).value, 5.0);
    }

    #[test]
    fn category_falls_back_to_parent() {
        let h = games();
        let leaves: Vec<NodeId> = h.leaves().collect();
        assert_eq!(h.category(leaves[0]), "Wii");
        assert_eq!(h.category(leaves[2]), "DS");
        assert_eq!(h.categories(), vec!["Wii".to_string(), "DS".to_string()]);
        assert_eq!(
            h.leaf_datum(leaves[2]).tooltip(),
            "New Super Mario Bros. (DS):  29.8"
        );
    }

    #[test]
    fn sort_orders_children_by_value() {
        let mut h = games();
        h.sum();
        let before = h.children(NodeId::ROOT).to_vec();
        h.sort_by_value();
        assert_eq!(h.children(NodeId::ROOT), before.as_slice());
        let wii = before[0];
        let names: Vec<&str> = h
            .children(wii)
            .iter()
            .map(|c| h.node(*c).name.as_str())
            .collect();
        assert_eq!(names, ["Wii Sports", "Mario Kart Wii"]);
    }

    fn raw_tree(groups: &[Vec<u32>]) -> HierarchyRaw {
        HierarchyRaw {
            name: Some("root".into()),
            children: Some(
                groups
                    .iter()
                    .enumerate()
                    .map(|(g, leaves)| HierarchyRaw {
                        name: Some(format!("g{g}")),
                        children: Some(
                            leaves
                                .iter()
                                .map(|v| HierarchyRaw {
                                    name: Some(format!("leaf{v}")),
                                    value: Some(NumberOrString::Number(f64::from(*v))),
                                    ..HierarchyRaw::default()
                                })
                                .collect(),
                        ),
                        ..HierarchyRaw::default()
                    })
                    .collect(),
            ),
            ..HierarchyRaw::default()
        }
    }

    proptest! {
        #[test]
        fn parents_equal_sum_of_children(groups in prop::collection::vec(prop::collection::vec(0_u32..1000, 1..8), 1..8)) {
            let mut h = Hierarchy::from_raw(&raw_tree(&groups));
            h.sum();
            for i in 0..h.len() {
                let id = NodeId(i);
                let children = h.children(id);
                if !children.is_empty() {
                    let total: f64 = children.iter().map(|c| h.node(*c).value).sum();
                    prop_assert_eq!(h.node(id).value, total);
                }
            }
            let expected: u32 = groups.iter().flatten().sum();
            prop_assert_eq!(h.node(NodeId::ROOT).value, f64::from(expected));
        }
    }
}
