//! Successor index over predecessor links.
//!
//! Matches only store back-links (`prev_left`/`prev_right`). Result entry
//! needs the opposite direction: given a match, which match receives its
//! winner, and in double elimination, which receives its loser. `LinkGraph`
//! is built once per bracket from the back-links and answers that lookup
//! without scanning rounds. Building it also validates the topology.

use crate::error::BracketError;
use crate::ids::MatchId;
use crate::matchup::{Match, Partition, Side};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a predecessor hands to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feed {
    Winner,
    Loser,
}

impl Feed {
    /// The feed carried by a link from a match in `from` to a match in `to`.
    ///
    /// A winners-bracket match drops its loser into the losers bracket;
    /// every other link carries the winner.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bracketry::graph::Feed;
    /// use bracketry::Partition;
    ///
    /// assert_eq!(Feed::between(Partition::Winners, Partition::Losers), Feed::Loser);
    /// assert_eq!(Feed::between(Partition::Losers, Partition::Winners), Feed::Winner);
    /// ```
    pub fn between(from: Partition, to: Partition) -> Feed {
        match (from, to) {
            (Partition::Winners, Partition::Losers) => Feed::Loser,
            _ => Feed::Winner,
        }
    }
}

/// Edge weight: what flows along the link and into which side it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub feed: Feed,
    pub side: Side,
}

/// A directed forest of matches, edges pointing from predecessor to successor.
///
/// Node `i` always holds the match at arena position `i`.
///
/// # Examples
///
/// ```rust
/// use bracketry::graph::{Feed, LinkGraph};
/// use bracketry::{Match, MatchId, Partition, Side, Slot};
///
/// let semi_a = Match::new(MatchId::new(1), Partition::Winners, 1, Slot::Unresolved, Slot::Unresolved);
/// let semi_b = Match::new(MatchId::new(2), Partition::Winners, 1, Slot::Unresolved, Slot::Unresolved);
/// let mut last = Match::new(MatchId::new(3), Partition::Winners, 2, Slot::Unresolved, Slot::Unresolved);
/// last.prev_left = Some(MatchId::new(1));
/// last.prev_right = Some(MatchId::new(2));
///
/// let links = LinkGraph::build(&[semi_a, semi_b, last]).unwrap();
/// assert_eq!(links.successor(MatchId::new(2), Feed::Winner), Some((MatchId::new(3), Side::Right)));
/// assert_eq!(links.successor(MatchId::new(3), Feed::Winner), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: DiGraph<MatchId, Link>,
}

impl LinkGraph {
    /// Build the index from an arena of matches.
    ///
    /// # Errors
    ///
    /// * `NonMonotonicIndex` if a match id does not equal its arena position + 1
    /// * `DanglingLink` if a back-link names a match that does not exist
    /// * `SharedPredecessor` if a match feeds the same outcome into two matches
    /// * `Cycle` if the back-links loop
    pub fn build(matches: &[Match]) -> Result<Self, BracketError> {
        let mut graph = DiGraph::with_capacity(matches.len(), matches.len() * 2);
        for (index, m) in matches.iter().enumerate() {
            let expected = MatchId::from_index(index);
            if m.id != expected {
                return Err(BracketError::NonMonotonicIndex {
                    expected,
                    found: m.id,
                });
            }
            graph.add_node(m.id);
        }

        let mut links = Self { graph };
        for m in matches {
            for (side, prev) in m.predecessors() {
                let pred = prev
                    .index()
                    .and_then(|index| matches.get(index))
                    .ok_or(BracketError::DanglingLink {
                        from: m.id,
                        to: prev,
                    })?;
                let feed = Feed::between(pred.partition, m.partition);
                if let Some((first, _)) = links.successor(prev, feed) {
                    return Err(BracketError::SharedPredecessor {
                        predecessor: prev,
                        first,
                        second: m.id,
                    });
                }
                links.add_link(prev, m.id, Link { feed, side });
            }
        }

        links.detect_cycles()?;
        Ok(links)
    }

    fn node(&self, id: MatchId) -> Option<NodeIndex> {
        id.index()
            .filter(|index| *index < self.graph.node_count())
            .map(NodeIndex::new)
    }

    fn add_link(&mut self, from: MatchId, to: MatchId, link: Link) {
        if let (Some(from), Some(to)) = (self.node(from), self.node(to)) {
            self.graph.add_edge(from, to, link);
        }
    }

    /// The match receiving `feed` from `id`, and the side it lands on.
    pub fn successor(&self, id: MatchId, feed: Feed) -> Option<(MatchId, Side)> {
        let node = self.node(id)?;
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|edge| edge.weight().feed == feed)
            .map(|edge| (self.graph[edge.target()], edge.weight().side))
    }

    /// Every outgoing link of `id`.
    pub fn successors(&self, id: MatchId) -> Vec<(MatchId, Link)> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (self.graph[edge.target()], *edge.weight()))
            .collect()
    }

    pub fn match_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Detect cycles among the links.
    ///
    /// Uses depth-first search so the error carries the closed cycle path.
    pub fn detect_cycles(&self) -> Result<(), BracketError> {
        let mut visited = HashSet::new();
        let mut on_path = HashSet::new();

        for node in self.graph.node_indices() {
            if !visited.contains(&node) {
                let mut path = Vec::new();
                if let Some(cycle) = self.dfs_cycle_detect(node, &mut visited, &mut on_path, &mut path) {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_path: &mut HashSet<NodeIndex>,
        path: &mut Vec<MatchId>,
    ) -> Option<BracketError> {
        visited.insert(node);
        on_path.insert(node);
        path.push(self.graph[node]);

        for neighbor in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, on_path, path) {
                    return Some(cycle);
                }
            } else if on_path.contains(&neighbor) {
                let repeated = self.graph[neighbor];
                let start = path.iter().position(|id| *id == repeated).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(repeated);
                return Some(BracketError::Cycle { path: cycle });
            }
        }

        on_path.remove(&node);
        path.pop();
        None
    }

    /// Match ids ordered so every predecessor precedes its successors.
    ///
    /// `build` already rejects cycles; a cycle here names one match on it.
    pub fn topological_order(&self) -> Result<Vec<MatchId>, BracketError> {
        match toposort(&self.graph, None) {
            Ok(nodes) => Ok(nodes.into_iter().map(|node| self.graph[node]).collect()),
            Err(cycle) => Err(BracketError::Cycle {
                path: vec![self.graph[cycle.node_id()]],
            }),
        }
    }
}
