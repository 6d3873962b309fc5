use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{
    board::Board,
    moves::{Move, MoveKind, MoveRollback},
    piece::Color,
};

/// Leaf count of a move tree, with a breakdown of the moves made at the last ply
#[derive(Debug, Default, Clone)]
pub struct PerftStats {
    pub nodes: u64,
    pub adds: u64,
    pub steps: u64,
    pub networks: u64,
    /// Leaf count below each root move, in generation order. Only filled when asked for.
    pub divide: Vec<(Move, u64)>,
    pub elapsed: Duration,
}

impl Display for PerftStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nps = self.nodes as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON);
        write!(
            f,
            "{} nodes ({} adds, {} steps, {} networks at the last ply) in {:#?}, {} per second",
            self.nodes.to_formatted_string(&Locale::en),
            self.adds.to_formatted_string(&Locale::en),
            self.steps.to_formatted_string(&Locale::en),
            self.networks.to_formatted_string(&Locale::en),
            self.elapsed,
            (nps as u64).to_formatted_string(&Locale::en)
        )
    }
}

impl Board {
    /// Counts the positions reachable in exactly `depth` moves with `side` moving first. Games are not cut short
    /// when a network appears.
    pub fn perft(&mut self, side: Color, depth: u8, divide: bool) -> PerftStats {
        let before = self.clone();
        let mut walk = PerftWalk {
            board: self,
            rollback: MoveRollback::default(),
            stats: PerftStats::default(),
        };

        let start_time = Instant::now();
        if divide && depth > 0 {
            walk.divide(side, depth);
        } else {
            walk.count(side, depth);
        }
        walk.stats.elapsed = start_time.elapsed();

        assert!(walk.rollback.is_empty(), "perft left {:?} behind", walk.rollback);
        let stats = walk.stats;
        assert!(before == *self, "perft did not restore the board");

        info!("{side} perft {depth}: {stats}");
        stats
    }
}

struct PerftWalk<'a> {
    board: &'a mut Board,
    rollback: MoveRollback,
    stats: PerftStats,
}

impl PerftWalk<'_> {
    fn divide(&mut self, side: Color, depth: u8) {
        for r#move in self.board.generate_moves(side) {
            let start_nodes = self.stats.nodes;
            self.visit(side, &r#move, depth);
            self.stats.divide.push((r#move, self.stats.nodes - start_nodes));
        }
    }

    fn count(&mut self, side: Color, draft: u8) {
        if draft == 0 {
            self.stats.nodes += 1;
            return;
        }

        for r#move in self.board.generate_moves(side) {
            self.visit(side, &r#move, draft);
        }
    }

    fn visit(&mut self, side: Color, r#move: &Move, draft: u8) {
        self.board.perform_move(side, r#move, &mut self.rollback);

        if draft == 1 {
            match r#move.kind() {
                MoveKind::Add => self.stats.adds += 1,
                MoveKind::Step => self.stats.steps += 1,
            }
            if self.board.has_valid_network(side) {
                self.stats.networks += 1;
            }
        }
        self.count(side.opponent(), draft - 1);

        self.board.undo_move(side, r#move, &mut self.rollback);
    }
}
