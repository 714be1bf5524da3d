//! Indexable binary min-heap over search depth with decrease-key.
//!
//! ```text
//! heap:      [ - | n1 | n2 | n3 | n4 | n5 ]     1-indexed, slot 0 unused
//!                   │    │    │
//!                   │    └────┴── children of i at 2i, 2i+1
//!                   └──────────── minimum depth
//!
//! positions: node id -> heap slot (0 = not queued)
//! ```
//!
//! The position map makes `contains` and the lookup half of `reparent` O(1).

use crate::error::{NavError, NavResult};

use super::node::SearchNode;

/// Slot value meaning "not in the heap".
const ABSENT: usize = 0;

/// Min-heap of [`SearchNode`]s keyed by `depth`.
///
/// Ties in depth are broken by heap structure.
#[derive(Clone, Debug)]
pub struct PriorityQueue {
  heap: Vec<SearchNode>,
  positions: Vec<usize>,
}

impl Default for PriorityQueue {
  fn default() -> Self {
    Self::new()
  }
}

impl PriorityQueue {
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Queue with room for `capacity` nodes before the heap grows.
  pub fn with_capacity(capacity: usize) -> Self {
    let mut heap = Vec::with_capacity(capacity + 1);
    heap.push(SearchNode::default());
    Self {
      heap,
      positions: vec![ABSENT; capacity],
    }
  }

  /// Number of queued nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.heap.len() - 1
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// True when a node with this id is queued.
  #[inline]
  pub fn contains(&self, id: usize) -> bool {
    self.slot_of(id) != ABSENT
  }

  /// Queued node with this id.
  pub fn get(&self, id: usize) -> Option<&SearchNode> {
    match self.slot_of(id) {
      ABSENT => None,
      slot => Some(&self.heap[slot]),
    }
  }

  /// Insert a node. The id must not already be queued.
  pub fn push(&mut self, node: SearchNode) {
    debug_assert!(!self.contains(node.id), "node {} queued twice", node.id);
    if node.id >= self.positions.len() {
      let grown = (node.id + 1).max(self.positions.len() * 2);
      self.positions.resize(grown, ABSENT);
    }
    self.heap.push(node);
    let slot = self.len();
    self.positions[node.id] = slot;
    self.sift_up(slot);
  }

  /// Remove and return the node with the smallest depth.
  pub fn pop(&mut self) -> NavResult<SearchNode> {
    if self.is_empty() {
      return Err(NavError::EmptyQueue);
    }
    let last = self.len();
    self.swap(1, last);
    let node = self.heap.pop().ok_or(NavError::EmptyQueue)?;
    self.positions[node.id] = ABSENT;
    if !self.is_empty() {
      self.sift_down(1);
    }
    Ok(node)
  }

  /// Node with the smallest depth.
  pub fn peek(&self) -> NavResult<&SearchNode> {
    self.heap.get(1).ok_or(NavError::EmptyQueue)
  }

  /// Decrease-key: route node `id` through `parent` over an edge of
  /// `weight` if that is strictly shorter.
  ///
  /// Returns `false` (and changes nothing) when the node is not queued or
  /// the new depth is not an improvement.
  pub fn reparent(&mut self, id: usize, parent: &SearchNode, weight: f32) -> bool {
    let slot = self.slot_of(id);
    if slot == ABSENT {
      return false;
    }
    let depth = parent.depth + weight;
    let node = &mut self.heap[slot];
    if depth >= node.depth {
      return false;
    }
    node.depth = depth;
    node.parent = Some(parent.id);
    self.sift_up(slot);
    true
  }

  /// Remove every node.
  pub fn clear(&mut self) {
    self.heap.truncate(1);
    self.positions.fill(ABSENT);
  }

  #[inline]
  fn slot_of(&self, id: usize) -> usize {
    self.positions.get(id).copied().unwrap_or(ABSENT)
  }

  /// Lower depth wins.
  #[inline]
  fn higher_priority(&self, a: usize, b: usize) -> bool {
    self.heap[a].depth < self.heap[b].depth
  }

  fn swap(&mut self, a: usize, b: usize) {
    self.heap.swap(a, b);
    self.positions[self.heap[a].id] = a;
    self.positions[self.heap[b].id] = b;
  }

  fn sift_up(&mut self, mut slot: usize) {
    while slot > 1 {
      let parent = slot / 2;
      if !self.higher_priority(slot, parent) {
        break;
      }
      self.swap(slot, parent);
      slot = parent;
    }
  }

  fn sift_down(&mut self, mut slot: usize) {
    let len = self.len();
    loop {
      let left = slot * 2;
      if left > len {
        break;
      }
      let right = left + 1;
      let child = if right <= len && self.higher_priority(right, left) {
        right
      } else {
        left
      };
      if !self.higher_priority(child, slot) {
        break;
      }
      self.swap(slot, child);
      slot = child;
    }
  }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;
