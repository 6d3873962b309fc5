use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::{Rng, seq::SliceRandom};

use crate::{
    board::Board,
    evaluate::{SCORE_INFINITY, Score},
    moves::{Move, MoveRollback},
    piece::Color,
};

pub const DEFAULT_SEARCH_DEPTH: u8 = 2;

#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub total_nodes: u64,
    pub leaf_nodes: u64,
    pub elapsed: Duration,
}

/// Result of searching a node. `r#move` is `None` when nothing beat the bound the node started with, or when the
/// node was scored without looking at moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Best {
    pub r#move: Option<Move>,
    pub score: Score,
}

pub struct Searcher<'a, R: Rng> {
    board: &'a mut Board,
    /// The side the search is choosing a move for. Scores are always from its point of view.
    color: Color,
    search_depth: u8,
    rng: &'a mut R,
    rollback: MoveRollback,
    pub stats: SearchStats,
}

impl<'a, R: Rng> Searcher<'a, R> {
    pub fn new(board: &'a mut Board, color: Color, search_depth: u8, rng: &'a mut R) -> Self {
        Self {
            board,
            color,
            search_depth,
            rng,
            rollback: MoveRollback::default(),
            stats: SearchStats::default(),
        }
    }

    /// Searches from the root with an open window. The board is the same afterwards.
    pub fn search(&mut self) -> Best {
        let start_time = Instant::now();
        let result = self.find_best_move(self.color, -SCORE_INFINITY, SCORE_INFINITY, 0);
        self.stats.elapsed = start_time.elapsed();
        debug_assert!(self.rollback.is_empty());

        debug!(
            "{} searched to depth {} in {:#?}. Best: {}, score {}, nodes {}, leaves {}",
            self.color,
            self.search_depth,
            self.stats.elapsed,
            result.r#move.map_or_else(|| String::from("none"), |m| m.to_string()),
            result.score,
            self.stats.total_nodes,
            self.stats.leaf_nodes
        );

        result
    }

    /// Alpha-beta minimax. The searching color maximizes and raises `alpha`, its opponent minimizes and lowers
    /// `beta`.
    pub fn find_best_move(&mut self, side: Color, mut alpha: Score, mut beta: Score, depth: u8) -> Best {
        self.stats.total_nodes += 1;

        if self.board.has_valid_network(side)
            || self.board.has_valid_network(side.opponent())
            || depth >= self.search_depth
        {
            self.stats.leaf_nodes += 1;
            return Best {
                r#move: None,
                score: self.board.eval_board(side, self.color, depth),
            };
        }

        if let Some(m) = self.opening_move(side) {
            return Best { r#move: Some(m), score: 0 };
        }

        let maximizing = side == self.color;
        let mut my_best = Best {
            r#move: None,
            score: if maximizing { alpha } else { beta },
        };

        for m in self.board.generate_moves(side) {
            self.board.perform_move(side, &m, &mut self.rollback);
            let reply = self.find_best_move(side.opponent(), alpha, beta, depth + 1);
            self.board.undo_move(side, &m, &mut self.rollback);

            if maximizing && reply.score > my_best.score {
                my_best = Best {
                    r#move: Some(m),
                    score: reply.score,
                };
                alpha = reply.score;
            } else if !maximizing && reply.score < my_best.score {
                my_best = Best {
                    r#move: Some(m),
                    score: reply.score,
                };
                beta = reply.score;
            }

            if alpha >= beta {
                break;
            }
        }

        my_best
    }

    /// With no pieces out, play onto a random square of the start goal edge. With one, onto the end goal edge.
    fn opening_move(&mut self, side: Color) -> Option<Move> {
        let squares = match self.board.piece_count(side) {
            0 => side.start_goal_squares(),
            1 => side.end_goal_squares(),
            _ => return None,
        };

        let legal: Vec<Move> = squares
            .into_iter()
            .map(|(x, y)| Move::Add { x, y })
            .filter(|m| self.board.is_valid_move(side, m))
            .collect();

        let choice = legal.choose(&mut *self.rng).copied();
        trace!("Opening move for {side}: {choice:?}");
        choice
    }
}
