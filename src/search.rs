use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::{Board, Color};
use crate::config::SearchConfig;
use crate::evaluation::Evaluator;
use crate::movegen::Move;
use crate::transposition::{NodeType, PositionKey, TranspositionEntry, TranspositionTable};

/// A position together with the score the search gave it.
#[derive(Debug, Clone)]
pub struct EvaluatedPosition {
    /// The preferred successor, or the searched position itself at a leaf.
    pub position: Board,
    pub evaluation: f64,
    pub depth: u32,
    /// Move leading to `position`; `None` at a leaf.
    pub best_move: Option<Move>,
}

pub struct Search {
    evaluator: Evaluator,
    transposition_table: TranspositionTable,
    max_depth: u32,
    max_time: Duration,
    nodes_searched: u64,
    start_time: Instant,
    timed_out: bool,
}

impl Search {
    pub fn new() -> Self {
        Self::with_config(&SearchConfig::default())
    }

    pub fn with_config(config: &SearchConfig) -> Self {
        Self {
            evaluator: Evaluator::new(),
            transposition_table: TranspositionTable::new(config.table_capacity),
            max_depth: config.max_depth,
            max_time: config.max_time,
            nodes_searched: 0,
            start_time: Instant::now(),
            timed_out: false,
        }
    }

    /// Minimax value of `position` at the configured depth.
    pub fn evaluate(&mut self, position: &Board) -> f64 {
        self.begin();
        self.value(position, self.max_depth, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Full-window search from `position` at the configured depth.
    pub fn search(&mut self, position: &Board) -> EvaluatedPosition {
        self.search_to(position, self.max_depth)
    }

    /// The move leading to the minimax-preferred successor; `None` only when
    /// the side to move has no legal move.
    pub fn find_best_move(&mut self, position: &Board) -> Option<Move> {
        // A depth-zero root is a leaf and carries no move.
        self.search_to(position, self.max_depth.max(1)).best_move
    }

    fn search_to(&mut self, position: &Board, depth: u32) -> EvaluatedPosition {
        self.begin();
        let result = self.minimax(position, depth, f64::NEG_INFINITY, f64::INFINITY);
        debug!(
            evaluation = result.evaluation,
            best_move = ?result.best_move.map(|mv| mv.to_string()),
            nodes = self.nodes_searched,
            cache_hits = self.transposition_table.hits(),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            timed_out = self.timed_out,
            "search finished"
        );
        result
    }

    /// Baseline opponent: any legal move, uniformly.
    pub fn choose_random_move<R: Rng + ?Sized>(
        &self,
        position: &Board,
        rng: &mut R,
    ) -> Option<Move> {
        position.all_legal_moves().choose(rng).copied()
    }

    /// Minimax with alpha-beta pruning. White maximizes, black minimizes.
    ///
    /// Returns the preferred successor with its value. At depth zero, or when
    /// the side to move has no moves, the position itself is scored statically.
    /// A best move cached by an earlier visit is tried first.
    pub fn minimax(
        &mut self,
        position: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> EvaluatedPosition {
        self.nodes_searched += 1;

        let mut successors = if depth == 0 {
            Vec::new()
        } else {
            position.successors()
        };
        if successors.is_empty() {
            return EvaluatedPosition {
                position: position.clone(),
                evaluation: self.evaluator.evaluate(position),
                depth,
                best_move: None,
            };
        }

        let key = position.key();
        self.order_successors(&mut successors, &key, depth);

        let maximizing = position.active_player() == Color::White;
        let window = (alpha, beta);
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_index = 0;

        for (index, child) in successors.iter().enumerate() {
            let score = self.value(child, depth - 1, alpha, beta);
            if maximizing {
                if score > best {
                    best = score;
                    best_index = index;
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_index = index;
                }
                beta = beta.min(best);
            }

            if alpha >= beta || self.out_of_time() {
                break;
            }
        }
        debug_assert!(best.is_finite(), "every successor yields a finite score");

        let chosen = successors.swap_remove(best_index);
        let best_move = chosen.history().last().copied();

        if !self.timed_out {
            self.transposition_table.store(
                key,
                depth,
                TranspositionEntry {
                    evaluation: best,
                    node_type: NodeType::classify(best, window.0, window.1),
                    best_move,
                },
            );
        }

        EvaluatedPosition {
            position: chosen,
            evaluation: best,
            depth,
            best_move,
        }
    }

    /// Score of `position`, from the cache when it settles the window.
    fn value(&mut self, position: &Board, depth: u32, alpha: f64, beta: f64) -> f64 {
        if depth == 0 {
            self.nodes_searched += 1;
            return self.evaluator.evaluate(position);
        }
        if let Some(cached) = self
            .transposition_table
            .probe(&position.key(), depth, alpha, beta)
        {
            return cached;
        }
        self.minimax(position, depth, alpha, beta).evaluation
    }

    /// Moves the successor reached by the cached best move to the front,
    /// keeping the rest in generation order.
    fn order_successors(&self, successors: &mut [Board], key: &PositionKey, depth: u32) {
        let Some(hint) = self.transposition_table.get_best_move(key, depth) else {
            return;
        };
        if let Some(index) = successors
            .iter()
            .position(|child| child.history().last() == Some(&hint))
        {
            successors[..=index].rotate_right(1);
        }
    }

    fn begin(&mut self) {
        self.nodes_searched = 0;
        self.start_time = Instant::now();
        self.timed_out = false;
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.start_time.elapsed() >= self.max_time {
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Forgets cached positions that can no longer arise from `live`.
    pub fn prune_cache(&mut self, live: &Board) {
        self.transposition_table.prune_unreachable(live.piece_count());
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth;
    }

    pub fn set_max_time(&mut self, max_time: Duration) {
        self.max_time = max_time;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn cache_hits(&self) -> u64 {
        self.transposition_table.hits()
    }

    pub fn cache_len(&self) -> usize {
        self.transposition_table.len()
    }

    /// Whether the last search ran out of time and returned a partial result.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
