use std::collections::HashMap;

use tracing::debug;

use crate::board::Color;
use crate::movegen::Move;

/// Identity of a position: the layout, which pawns have already moved (that
/// decides double advances below it) and the side to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub layout: [u8; 64],
    pub moved_pawns: u64,
    pub active_player: Color,
}

impl PositionKey {
    pub fn piece_count(&self) -> usize {
        self.layout.iter().filter(|&&b| b != b' ').count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    LowerBound,
    UpperBound,
}

impl NodeType {
    /// Classifies a fail-soft result against the window it was searched with.
    pub fn classify(evaluation: f64, alpha: f64, beta: f64) -> Self {
        if evaluation <= alpha {
            NodeType::UpperBound
        } else if evaluation >= beta {
            NodeType::LowerBound
        } else {
            NodeType::Exact
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionEntry {
    pub evaluation: f64,
    pub node_type: NodeType,
    pub best_move: Option<Move>,
}

/// Search results keyed by position and remaining depth.
pub struct TranspositionTable {
    table: HashMap<(PositionKey, u32), TranspositionEntry>,
    size: usize,
    hits: u64,
}

impl TranspositionTable {
    pub fn new(size: usize) -> Self {
        Self {
            table: HashMap::with_capacity(size.min(1 << 16)),
            size,
            hits: 0,
        }
    }

    pub fn store(&mut self, key: PositionKey, depth: u32, entry: TranspositionEntry) {
        if self.size == 0 {
            return;
        }
        let slot = (key, depth);
        if self.table.len() >= self.size && !self.table.contains_key(&slot) {
            // Full: evict an arbitrary entry
            if let Some(victim) = self.table.keys().next().cloned() {
                self.table.remove(&victim);
            }
        }
        self.table.insert(slot, entry);
    }

    /// Returns a cached evaluation when it is exact, or when its bound already
    /// settles the `alpha..beta` window.
    pub fn probe(&mut self, key: &PositionKey, depth: u32, alpha: f64, beta: f64) -> Option<f64> {
        let entry = self.table.get(&(key.clone(), depth))?;
        let usable = match entry.node_type {
            NodeType::Exact => true,
            NodeType::LowerBound => entry.evaluation >= beta,
            NodeType::UpperBound => entry.evaluation <= alpha,
        };
        if usable {
            self.hits += 1;
            Some(entry.evaluation)
        } else {
            None
        }
    }

    /// Best move recorded for the position, whatever the entry's bound.
    pub fn get_best_move(&self, key: &PositionKey, depth: u32) -> Option<Move> {
        self.table
            .get(&(key.clone(), depth))
            .and_then(|entry| entry.best_move)
    }

    /// Drops entries for positions holding more pieces than `piece_count`.
    /// Captures cannot be undone in play, so those positions never recur.
    pub fn prune_unreachable(&mut self, piece_count: usize) {
        let before = self.table.len();
        self.table
            .retain(|(key, _), _| key.piece_count() <= piece_count);
        debug!(
            removed = before - self.table.len(),
            remaining = self.table.len(),
            "pruned transposition table"
        );
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }
}
