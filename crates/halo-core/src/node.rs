//! # Node arena
//!
//! The list, its header, its items and its scroll bar live in one arena and
//! refer to each other by `NodeKey`. Keys of removed nodes stay harmless:
//! every lookup through a stale key reads as absent.

use std::collections::BTreeMap;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::Size;
use crate::error::{HaloError, Result};

new_key_type! {
    pub struct NodeKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    List,
    Header,
    Item { index: i32, is_group: bool },
    ScrollBar,
    Other,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub role: NodeRole,
    parent: Option<NodeKey>,
    children: SmallVec<[NodeKey; 8]>,
    /// Last measured size; `None` until the host measures the node.
    pub measured: Option<Size>,
}

#[derive(Default)]
pub struct NodeArena {
    nodes: SlotMap<NodeKey, Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: NodeRole, measured: Option<Size>) -> NodeKey {
        self.nodes.insert(Node {
            role,
            parent: None,
            children: SmallVec::new(),
            measured,
        })
    }

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(HaloError::MissingNode("child"));
        }
        let p = self
            .nodes
            .get_mut(parent)
            .ok_or(HaloError::MissingNode("parent"))?;
        p.children.push(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Removes `key` and its whole subtree.
    pub fn remove(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.remove(key) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != key);
        }
        for child in node.children {
            self.remove(child);
        }
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes
            .get(key)
            .into_iter()
            .flat_map(|n| n.children.iter().copied())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    pub fn set_measured(&mut self, key: NodeKey, size: Size) -> Result<()> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(HaloError::MissingNode("measured node"))?;
        node.measured = Some(size);
        Ok(())
    }

    /// First child of `key` with the given role predicate.
    pub fn find_child(&self, key: NodeKey, pred: impl Fn(&NodeRole) -> bool) -> Option<NodeKey> {
        self.children(key)
            .find(|c| self.nodes.get(*c).is_some_and(|n| pred(&n.role)))
    }
}

/// Measured main-axis sizes the list layout pulls from its host.
pub trait LayoutSource {
    fn item_count(&self) -> i32;
    /// `None` when the item exists but has not been measured yet.
    fn item_main_size(&self, index: i32) -> Option<f32>;
    fn is_group(&self, _index: i32) -> bool {
        false
    }
    fn header_main_size(&self) -> Option<f32> {
        None
    }
}

/// Read-only view over one list node's children, indexed by item position.
pub struct ListChildren<'a> {
    arena: &'a NodeArena,
    items: BTreeMap<i32, NodeKey>,
    header: Option<NodeKey>,
}

impl<'a> ListChildren<'a> {
    pub fn new(arena: &'a NodeArena, list: NodeKey) -> Result<Self> {
        if !arena.contains(list) {
            return Err(HaloError::MissingNode("list"));
        }
        let mut items = BTreeMap::new();
        let mut header = None;
        for child in arena.children(list) {
            match arena.get(child).map(|n| n.role) {
                Some(NodeRole::Item { index, .. }) => {
                    items.insert(index, child);
                }
                Some(NodeRole::Header) => header = Some(child),
                _ => {}
            }
        }
        Ok(Self {
            arena,
            items,
            header,
        })
    }

    pub fn item(&self, index: i32) -> Option<NodeKey> {
        self.items.get(&index).copied()
    }

    pub fn header(&self) -> Option<NodeKey> {
        self.header
    }
}

impl LayoutSource for ListChildren<'_> {
    fn item_count(&self) -> i32 {
        self.items.len() as i32
    }

    fn item_main_size(&self, index: i32) -> Option<f32> {
        let key = self.items.get(&index)?;
        self.arena.get(*key)?.measured.map(|s| s.height)
    }

    fn is_group(&self, index: i32) -> bool {
        self.items
            .get(&index)
            .and_then(|k| self.arena.get(*k))
            .is_some_and(|n| matches!(n.role, NodeRole::Item { is_group: true, .. }))
    }

    fn header_main_size(&self) -> Option<f32> {
        self.arena.get(self.header?)?.measured.map(|s| s.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_nodes_read_as_absent() {
        let mut arena = NodeArena::new();
        let list = arena.insert(NodeRole::List, None);
        let item = arena.insert(NodeRole::Item { index: 0, is_group: false }, None);
        arena.append_child(list, item).unwrap();
        assert_eq!(arena.parent(item), Some(list));

        arena.remove(list);
        assert!(arena.get(item).is_none());
        assert_eq!(arena.parent(item), None);
        assert_eq!(arena.children(list).count(), 0);
        assert!(ListChildren::new(&arena, list).is_err());
    }

    #[test]
    fn list_children_index_items() {
        let mut arena = NodeArena::new();
        let list = arena.insert(NodeRole::List, None);
        let header = arena.insert(NodeRole::Header, Some(Size::new(200.0, 30.0)));
        arena.append_child(list, header).unwrap();
        for i in 0..3 {
            let size = (i != 1).then(|| Size::new(200.0, 50.0 + i as f32));
            let k = arena.insert(NodeRole::Item { index: i, is_group: i == 2 }, size);
            arena.append_child(list, k).unwrap();
        }

        let view = ListChildren::new(&arena, list).unwrap();
        assert_eq!(view.item_count(), 3);
        assert_eq!(view.item_main_size(0), Some(50.0));
        assert_eq!(view.item_main_size(1), None);
        assert_eq!(view.item_main_size(7), None);
        assert!(view.is_group(2));
        assert_eq!(view.header_main_size(), Some(30.0));
    }
}
