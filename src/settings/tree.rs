//! Arena-backed settings tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. Each
//! node keeps its ordered child list and a non-owning back-reference to its
//! parent, which is what a tree view needs to answer "which row is this?"
//! and "what is my parent?" without shared ownership.

use super::value::SettingValue;
use log::warn;

/// Index of a node in a [`SettingsTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Group(Vec<NodeId>),
    Value(SettingValue),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// Ordered tree of named groups and scalar values.
///
/// Replaced or removed subtrees are released to a free list and their slots
/// reused by later insertions. A released [`NodeId`] must not be used again.
#[derive(Debug, Clone)]
pub struct SettingsTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl Default for SettingsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsTree {
    const ROOT: NodeId = NodeId(0);

    /// Creates a tree holding only an empty root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Group(Vec::new()),
            }],
            free: Vec::new(),
        }
    }

    /// Number of arena slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn is_group(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Group(_))
    }

    /// Scalar held by `id`, or `None` for groups.
    pub fn value(&self, id: NodeId) -> Option<&SettingValue> {
        match &self.nodes[id.0].kind {
            NodeKind::Value(v) => Some(v),
            NodeKind::Group(_) => None,
        }
    }

    /// Children of `id` in insertion order. Empty for scalar nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Group(children) => children,
            NodeKind::Value(_) => &[],
        }
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].name == name)
    }

    /// Position of `id` among its siblings. The root is row 0.
    pub fn row(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|p| self.children(p).iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// Dotted path from the root to `id`. The root has an empty path.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node != Self::ROOT {
                names.push(self.nodes[node.0].name.as_str());
            }
            cur = self.parent(node);
        }
        names.reverse();
        names.join(".")
    }

    /// Returns the group `name` under `parent`, creating it when missing.
    ///
    /// A scalar already stored under `name` is replaced by an empty group.
    pub fn ensure_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(id) = self.child(parent, name) {
            if !self.is_group(id) {
                self.nodes[id.0].kind = NodeKind::Group(Vec::new());
            }
            return id;
        }
        self.push_child(parent, name, NodeKind::Group(Vec::new()))
    }

    /// Stores `value` under `parent.name`, replacing any existing node content.
    pub fn set_value(&mut self, parent: NodeId, name: &str, value: SettingValue) -> NodeId {
        if let Some(id) = self.child(parent, name) {
            self.detach_children(id);
            self.nodes[id.0].kind = NodeKind::Value(value);
            return id;
        }
        self.push_child(parent, name, NodeKind::Value(value))
    }

    /// Edits a scalar in place. Returns `false` if `id` is a group or the
    /// value has no JSON form.
    pub fn set_node_value(&mut self, id: NodeId, value: SettingValue) -> bool {
        if !value.is_storable() {
            return false;
        }
        match &mut self.nodes[id.0].kind {
            NodeKind::Value(v) => {
                *v = value;
                true
            }
            NodeKind::Group(_) => false,
        }
    }

    /// Removes the child `name` and its subtree. Returns whether it existed.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> bool {
        let Some(id) = self.child(parent, name) else {
            return false;
        };
        if let NodeKind::Group(children) = &mut self.nodes[parent.0].kind {
            children.retain(|&c| c != id);
        }
        self.release(id);
        true
    }

    /// Drops every node except an empty root.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Builds a tree from a JSON document. Objects become groups; arrays and
    /// nulls have no settings equivalent and are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut tree = Self::new();
        if let serde_json::Value::Object(map) = value {
            tree.load_object(Self::ROOT, map);
        } else {
            warn!("Settings document root is not an object, ignoring it");
        }
        tree
    }

    fn load_object(&mut self, parent: NodeId, map: &serde_json::Map<String, serde_json::Value>) {
        for (key, value) in map {
            match value {
                serde_json::Value::Object(inner) => {
                    let group = self.ensure_group(parent, key);
                    self.load_object(group, inner);
                }
                other => match SettingValue::from_json(other) {
                    Some(v) => {
                        self.set_value(parent, key, v);
                    }
                    None => warn!(
                        "Skipping unsupported settings entry: {}",
                        join_path(&self.path_of(parent), key)
                    ),
                },
            }
        }
    }

    /// Serialises the reachable part of the tree as nested JSON objects.
    pub fn to_json(&self) -> serde_json::Value {
        self.node_to_json(Self::ROOT)
    }

    fn node_to_json(&self, id: NodeId) -> serde_json::Value {
        match &self.nodes[id.0].kind {
            NodeKind::Value(v) => v.to_json(),
            NodeKind::Group(children) => {
                let map = children
                    .iter()
                    .map(|&c| (self.nodes[c.0].name.clone(), self.node_to_json(c)))
                    .collect();
                serde_json::Value::Object(map)
            }
        }
    }

    fn push_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        if !self.is_group(parent) {
            self.nodes[parent.0].kind = NodeKind::Group(Vec::new());
        }
        let node = Node {
            name: name.to_string(),
            parent: Some(parent),
            kind,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        if let NodeKind::Group(children) = &mut self.nodes[parent.0].kind {
            children.push(id);
        }
        id
    }

    fn detach_children(&mut self, id: NodeId) {
        let children = match &mut self.nodes[id.0].kind {
            NodeKind::Group(children) => std::mem::take(children),
            NodeKind::Value(_) => return,
        };
        for child in children {
            self.release(child);
        }
    }

    /// Returns `id` and all its descendants to the free list.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            let slot = &mut self.nodes[node.0];
            let kind = std::mem::replace(&mut slot.kind, NodeKind::Group(Vec::new()));
            if let NodeKind::Group(children) = kind {
                pending.extend(children);
            }
            slot.parent = None;
            slot.name.clear();
            self.free.push(node);
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
