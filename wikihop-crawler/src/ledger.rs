//! Visitation ledger: which titles have been discovered, which have been fully
//! expanded, and the first-discovery parent of each.

use crate::error::{CrawlError, Result};
use crate::title::ArticleTitle;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Queued on the frontier, links not yet enumerated.
    Discovered,
    /// Every outbound link has been evaluated.
    Visited,
}

#[derive(Debug)]
struct Node {
    /// `None` only for the start title.
    parent: Option<ArticleTitle>,
    state: NodeState,
}

/// Result of offering a title to [`Ledger::discover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// First sighting; the parent was recorded and the caller should enqueue it.
    New,
    AlreadyDiscovered,
    AlreadyVisited,
}

#[derive(Debug, Default)]
pub struct Ledger {
    nodes: HashMap<ArticleTitle, Node>,
    visited: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discover_root(&mut self, start: ArticleTitle) {
        self.nodes.entry(start).or_insert(Node {
            parent: None,
            state: NodeState::Discovered,
        });
    }

    /// Record `parent` as the predecessor of `child` unless `child` is already
    /// known. Parents are never overwritten.
    pub fn discover(&mut self, child: &ArticleTitle, parent: &ArticleTitle) -> Discovery {
        match self.nodes.entry(child.clone()) {
            Entry::Occupied(entry) => match entry.get().state {
                NodeState::Visited => Discovery::AlreadyVisited,
                NodeState::Discovered => Discovery::AlreadyDiscovered,
            },
            Entry::Vacant(entry) => {
                entry.insert(Node {
                    parent: Some(parent.clone()),
                    state: NodeState::Discovered,
                });
                Discovery::New
            }
        }
    }

    /// Returns `false` if the title was unknown or had already been visited.
    pub fn mark_visited(&mut self, title: &ArticleTitle) -> bool {
        match self.nodes.get_mut(title) {
            Some(node) if node.state == NodeState::Discovered => {
                node.state = NodeState::Visited;
                self.visited += 1;
                true
            }
            _ => false,
        }
    }

    pub fn state_of(&self, title: &ArticleTitle) -> Option<NodeState> {
        self.nodes.get(title).map(|node| node.state)
    }

    pub fn is_visited(&self, title: &ArticleTitle) -> bool {
        self.state_of(title) == Some(NodeState::Visited)
    }

    pub fn is_discovered(&self, title: &ArticleTitle) -> bool {
        self.nodes.contains_key(title)
    }

    /// `Some(None)` for the root, `None` for an unknown title.
    pub fn parent_of(&self, title: &ArticleTitle) -> Option<Option<&ArticleTitle>> {
        self.nodes.get(title).map(|node| node.parent.as_ref())
    }

    /// Walk parents back from `target` to the root and return the path in
    /// root-to-target order.
    pub fn path_to(&self, target: &ArticleTitle) -> Result<Vec<ArticleTitle>> {
        let mut path = vec![target.clone()];
        let mut current = target;

        loop {
            let node = self
                .nodes
                .get(current)
                .ok_or_else(|| CrawlError::BrokenParentChain(current.to_string()))?;
            match &node.parent {
                Some(parent) => {
                    if path.len() > self.nodes.len() {
                        return Err(CrawlError::BrokenParentChain(format!(
                            "cycle through {parent}"
                        )));
                    }
                    path.push(parent.clone());
                    current = parent;
                }
                None => break,
            }
        }

        path.reverse();
        Ok(path)
    }

    pub fn discovered_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }
}
