use log::trace;

use crate::{
    board::{Board, DIMENSION, MAX_PIECES},
    moves::{Move, MoveKind},
    piece::Color,
};

impl Board {
    /// Every legal move of `kind` for `side`. Squares are visited column by column (`x` outer, `y` inner); step
    /// moves go through the side's pieces in insertion order. The order matters, search looks at moves in exactly
    /// this order.
    pub fn move_finder(&self, side: Color, kind: MoveKind) -> Vec<Move> {
        let mut moves = Vec::new();

        match kind {
            MoveKind::Add => {
                for x in 0..DIMENSION {
                    for y in 0..DIMENSION {
                        let m = Move::Add { x, y };
                        if self.is_valid_move(side, &m) {
                            moves.push(m);
                        }
                    }
                }
            }
            MoveKind::Step => {
                for piece in self.pieces(side) {
                    for x in 0..DIMENSION {
                        for y in 0..DIMENSION {
                            let m = Move::Step {
                                x,
                                y,
                                from_x: piece.x,
                                from_y: piece.y,
                            };
                            if self.is_valid_move(side, &m) {
                                moves.push(m);
                            }
                        }
                    }
                }
            }
        }

        trace!("Found {} {kind:?} moves for {side}", moves.len());
        moves
    }

    /// Adds while the side still has pieces in hand, steps afterwards
    pub fn generate_moves(&self, side: Color) -> Vec<Move> {
        if self.piece_count(side) < MAX_PIECES {
            self.move_finder(side, MoveKind::Add)
        } else {
            self.move_finder(side, MoveKind::Step)
        }
    }
}
