use crate::{board::Board, piece::Color};

pub type Score = i32;

/// Bonus for holding a network, before dividing by depth. Far larger than any positional score can get: ten pieces
/// with eight connections each.
pub const NETWORK_SCORE: Score = 1_000_000;
pub const SCORE_INFINITY: Score = i32::MAX;

impl Board {
    /// Scores the position for `side`, then flips the sign when `side` is not the searching player so that larger
    /// is always better for `searcher`.
    ///
    /// Network bonuses are divided by `depth` so that quicker wins (and slower losses) score better. Depth 0 counts
    /// as 1.
    pub fn eval_board(&self, side: Color, searcher: Color, depth: u8) -> Score {
        let divisor = depth.max(1) as Score;
        let opponent = side.opponent();

        let mut network = 0;
        if self.has_valid_network(side) {
            network += NETWORK_SCORE / divisor;
        }
        if self.has_valid_network(opponent) {
            network -= NETWORK_SCORE / divisor;
        }

        let positional = self.connection_count(side) - self.connection_count(opponent);

        let total = network + positional;
        if side == searcher { total } else { -total }
    }

    /// Sum over every piece of `color` of how many same-color pieces it sees
    pub fn connection_count(&self, color: Color) -> Score {
        self.pieces(color)
            .iter()
            .map(|p| p.connections(self, None).len() as Score)
            .sum()
    }
}
