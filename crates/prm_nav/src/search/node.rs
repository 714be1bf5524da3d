//! Search node and closed-set arena used by the shortest-path solve.

use glam::Vec3;

/// A roadmap node as seen by a single solve.
///
/// `parent` is the id of the predecessor toward the goal; parent links are
/// node ids into the solve's arena rather than references.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchNode {
  /// Roadmap node id.
  pub id: usize,
  /// Node position (copied from the roadmap).
  pub position: Vec3,
  /// Shortest distance to the goal found so far.
  pub depth: f32,
  /// Predecessor toward the goal, `None` for the goal itself.
  pub parent: Option<usize>,
}

impl SearchNode {
  pub fn new(id: usize, position: Vec3, depth: f32, parent: Option<usize>) -> Self {
    Self {
      id,
      position,
      depth,
      parent,
    }
  }

  /// Root of a solve: depth zero, no parent.
  pub fn root(id: usize, position: Vec3) -> Self {
    Self::new(id, position, 0.0, None)
  }

  /// Child reached from `self` over an edge of `weight`.
  pub fn child(&self, id: usize, position: Vec3, weight: f32) -> Self {
    Self::new(id, position, self.depth + weight, Some(self.id))
  }
}

/// Settled nodes of a solve, indexed by node id.
///
/// A node in the closed set has its final shortest depth and is never
/// touched again.
#[derive(Clone, Debug, Default)]
pub struct ClosedSet {
  nodes: Vec<Option<SearchNode>>,
  len: usize,
}

impl ClosedSet {
  /// Empty set sized for `capacity` node ids.
  pub fn new(capacity: usize) -> Self {
    Self {
      nodes: vec![None; capacity],
      len: 0,
    }
  }

  /// Settle `node`. Returns false if its id was already settled.
  pub fn insert(&mut self, node: SearchNode) -> bool {
    if node.id >= self.nodes.len() {
      self.nodes.resize(node.id + 1, None);
    }
    let slot = &mut self.nodes[node.id];
    if slot.is_some() {
      return false;
    }
    *slot = Some(node);
    self.len += 1;
    true
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool {
    matches!(self.nodes.get(id), Some(Some(_)))
  }

  pub fn get(&self, id: usize) -> Option<&SearchNode> {
    self.nodes.get(id).and_then(Option::as_ref)
  }

  /// Number of settled nodes.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Slots indexed by node id, `None` where the node was never reached.
  pub fn into_slots(self) -> Vec<Option<SearchNode>> {
    self.nodes
  }
}
