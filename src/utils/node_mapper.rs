/*!
# Node Mapper

Maps global node ids of a graph onto dense local ids `0, 1, 2, ...` of a sampled subgraph.

The mapping is append-only: local ids are handed out in insertion order and the list of
global ids (`old ids`) can be taken out as the subgraph's node list. A global id may be
*pushed* multiple times (duplicate seeds); lookups always resolve to its first local id.
*/
use crate::node::*;

use fxhash::FxHashMap;

use super::FromCapacity;

/// Append-only mapping between global ids and dense local ids
#[derive(Debug, Clone, Default)]
pub struct LocalIdMapper {
    old_ids: Vec<Node>,
    new_ids: FxHashMap<Node, Node>,
}

impl LocalIdMapper {
    /// Assigns the next local id to `old`, even if `old` already has one.
    /// Returns the local id `old` resolves to, i.e. its first one.
    pub fn push(&mut self, old: Node) -> Node {
        let new = self.old_ids.len() as Node;
        self.old_ids.push(old);
        *self.new_ids.entry(old).or_insert(new)
    }

    /// Returns the local id of `old`, assigning the next one if `old` is unmapped.
    /// The flag is *true* if a new id was assigned.
    pub fn get_or_insert(&mut self, old: Node) -> (Node, bool) {
        let next = self.old_ids.len() as Node;
        let new = *self.new_ids.entry(old).or_insert(next);
        if new == next {
            self.old_ids.push(old);
        }
        (new, new == next)
    }

    /// If `old` is mapped, returns its (first) local id.
    ///
    /// # Example
    /// ```
    /// use glzip::utils::*;
    ///
    /// let mut mapper = LocalIdMapper::default();
    /// mapper.get_or_insert(17);
    /// assert_eq!(mapper.new_id_of(17), Some(0));
    /// assert_eq!(mapper.new_id_of(3), None);
    /// ```
    pub fn new_id_of(&self, old: Node) -> Option<Node> {
        self.new_ids.get(&old).copied()
    }

    /// Number of assigned local ids
    pub fn len(&self) -> Node {
        self.old_ids.len() as Node
    }

    /// Returns *true* if no local id was assigned yet
    pub fn is_empty(&self) -> bool {
        self.old_ids.is_empty()
    }

    /// Releases the global ids in order of their local ids
    pub fn into_old_ids(self) -> Vec<Node> {
        self.old_ids
    }
}

impl FromCapacity for LocalIdMapper {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self {
            old_ids: Vec::with_capacity(used),
            new_ids: FxHashMap::from_capacity(used),
        }
    }
}
