use std::{fmt::Display, sync::LazyLock};

use log::{debug, error};
use regex::Regex;

use crate::{
    board::Board,
    piece::{Color, is_on_board},
};

static ADD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:add\s*)?([0-9])([0-9])$").unwrap());
static STEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:step\s*)?([0-9])([0-9])(?:\s*from\s*)?([0-9])([0-9])$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Add,
    Step,
}

/// `x`, `y` is always the destination. A step also names the square its piece leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Add { x: i8, y: i8 },
    Step { x: i8, y: i8, from_x: i8, from_y: i8 },
}

impl Move {
    #[inline]
    pub const fn destination(&self) -> (i8, i8) {
        match *self {
            Move::Add { x, y } => (x, y),
            Move::Step { x, y, .. } => (x, y),
        }
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        match self {
            Move::Add { .. } => MoveKind::Add,
            Move::Step { .. } => MoveKind::Step,
        }
    }

    /// Accepts `add 34`, `34`, `step 34 from 56` and `3456`. Digits are column then row.
    pub fn from_notation(text: &str) -> Result<Move, String> {
        let text = text.trim().to_ascii_lowercase();
        let digit = |s: &str| s.parse::<i8>().unwrap_or(i8::MAX);

        let m = if let Some(captures) = ADD_PATTERN.captures(&text) {
            Move::Add {
                x: digit(&captures[1]),
                y: digit(&captures[2]),
            }
        } else if let Some(captures) = STEP_PATTERN.captures(&text) {
            Move::Step {
                x: digit(&captures[1]),
                y: digit(&captures[2]),
                from_x: digit(&captures[3]),
                from_y: digit(&captures[4]),
            }
        } else {
            return Err(format!("Could not parse move '{text}'"));
        };

        let (x, y) = m.destination();
        if !is_on_board(x, y) {
            return Err(format!("Move '{text}' lands outside the board"));
        }
        if let Move::Step { from_x, from_y, .. } = m {
            if !is_on_board(from_x, from_y) {
                return Err(format!("Move '{text}' starts outside the board"));
            }
        }

        Ok(m)
    }

    /// Digits only, `34` or `3456`. Parses back with [`Move::from_notation`].
    pub fn to_compact_notation(&self) -> String {
        match self {
            Move::Add { x, y } => format!("{x}{y}"),
            Move::Step { x, y, from_x, from_y } => format!("{x}{y}{from_x}{from_y}"),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Add { x, y } => write!(f, "add {x}{y}"),
            Move::Step { x, y, from_x, from_y } => write!(f, "step {x}{y} from {from_x}{from_y}"),
        }
    }
}

/// Splits on commas and parses each entry with [`Move::from_notation`]
pub fn parse_move_list(text: &str) -> Result<Vec<Move>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Move::from_notation)
        .collect()
}

/// What [`Board::undo_move`] needs that the move itself does not say
#[derive(Debug, Default, Clone)]
pub struct MoveRollback {
    /// Slot each stepping piece held in its color's sequence before it went to the back
    pub step_origins: Vec<usize>,
}

impl MoveRollback {
    pub fn is_empty(&self) -> bool {
        self.step_origins.is_empty()
    }
}

impl Board {
    /// Plays `m` for `side` without checking legality. A step takes the piece off its square and adds it again, so
    /// it ends up last in its color's sequence.
    pub fn perform_move(&mut self, side: Color, m: &Move, rollback: &mut MoveRollback) {
        match *m {
            Move::Add { x, y } => self.add_piece(side, x, y),
            Move::Step { x, y, from_x, from_y } => {
                let origin = self.remove_piece(side, from_x, from_y);
                rollback.step_origins.push(origin);
                self.add_piece(side, x, y);
            }
        }
    }

    /// Reverses [`Board::perform_move`]. The board ends up exactly as it was, including piece order.
    pub fn undo_move(&mut self, side: Color, m: &Move, rollback: &mut MoveRollback) {
        if self.pieces(side).last().is_none_or(|p| (p.x, p.y) != m.destination()) {
            error!("Undoing {m} for {side} but it was not the last piece placed. Board: {self:?}");
        }

        match *m {
            Move::Add { x, y } => {
                self.remove_piece(side, x, y);
            }
            Move::Step { x, y, from_x, from_y } => {
                let Some(origin) = rollback.step_origins.pop() else {
                    error!("Undoing {m} for {side} with no step recorded. Board: {self:?}");
                    panic!("Undoing a step that was never performed");
                };
                self.remove_piece(side, x, y);
                self.insert_piece(side, from_x, from_y, origin);
            }
        }
    }

    /// Replays moves alternating colors, white first, checking each for legality
    pub fn play_moves(&mut self, moves: &[Move]) -> Result<Color, String> {
        let mut side = Color::White;
        let mut rollback = MoveRollback::default();
        for m in moves {
            if !self.is_valid_move(side, m) {
                return Err(format!("Move {m} is not legal for {side}. Board: {self:?}"));
            }
            debug!("{side} plays {m}");
            self.perform_move(side, m, &mut rollback);
            side = side.opponent();
        }

        Ok(side)
    }
}

#[cfg(test)]
mod moves_tests {
    use super::*;

    #[test]
    pub fn notation_forms() {
        assert_eq!(Ok(Move::Add { x: 3, y: 4 }), Move::from_notation("add 34"));
        assert_eq!(Ok(Move::Add { x: 3, y: 4 }), Move::from_notation(" 34 "));
        assert_eq!(
            Ok(Move::Step { x: 3, y: 4, from_x: 5, from_y: 6 }),
            Move::from_notation("step 34 from 56")
        );
        assert_eq!(
            Ok(Move::Step { x: 3, y: 4, from_x: 5, from_y: 6 }),
            Move::from_notation("3456")
        );
        assert_eq!("step 34 from 56", Move::Step { x: 3, y: 4, from_x: 5, from_y: 6 }.to_string());
        assert_eq!(Move::from_notation("add 21"), Move::from_notation(&Move::Add { x: 2, y: 1 }.to_string()));
        assert_eq!("3456", Move::Step { x: 3, y: 4, from_x: 5, from_y: 6 }.to_compact_notation());
        assert_eq!("21", Move::Add { x: 2, y: 1 }.to_compact_notation());
    }

    #[test]
    pub fn bad_notation_is_rejected() {
        assert!(Move::from_notation("add 3").is_err());
        assert!(Move::from_notation("add 38").is_err());
        assert!(Move::from_notation("step 34 from 59").is_err());
        assert!(Move::from_notation("jump 34").is_err());
        assert!(parse_move_list("add 30, add 03, nope").is_err());
    }

    #[test]
    pub fn move_list_is_comma_separated() {
        let moves = parse_move_list("add 03, add 30,add 05 ,").unwrap();
        assert_eq!(
            vec![Move::Add { x: 0, y: 3 }, Move::Add { x: 3, y: 0 }, Move::Add { x: 0, y: 5 }],
            moves
        );
    }

    #[test]
    pub fn play_moves_alternates_colors_starting_with_white() {
        let mut board = Board::new();
        let next = board.play_moves(&parse_move_list("03, 30, 05").unwrap()).unwrap();

        assert_eq!(Color::Black, next);
        assert_eq!(2, board.piece_count(Color::White));
        assert_eq!(1, board.piece_count(Color::Black));

        // Black may not play into white's goal column
        let mut board = Board::new();
        assert!(board.play_moves(&parse_move_list("03, 04").unwrap()).is_err());
    }

    #[test]
    pub fn step_moves_piece_to_the_back_and_undo_restores_its_slot() {
        let mut board = Board::new();
        for (x, y) in [(1, 1), (3, 1), (5, 1), (1, 3), (3, 3), (5, 3), (1, 5), (3, 5), (5, 5), (7, 3)] {
            board.add_piece(Color::White, x, y);
        }
        let before = board.clone();
        let mut rollback = MoveRollback::default();

        let m = Move::Step { x: 6, y: 6, from_x: 3, from_y: 1 };
        assert!(board.is_valid_move(Color::White, &m));
        board.perform_move(Color::White, &m, &mut rollback);

        let order: Vec<(i8, i8)> = board.pieces(Color::White).iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            vec![(1, 1), (5, 1), (1, 3), (3, 3), (5, 3), (1, 5), (3, 5), (5, 5), (7, 3), (6, 6)],
            order
        );
        assert_eq!(None, board.cell_contents(3, 1));
        assert_eq!(vec![1], rollback.step_origins);

        board.undo_move(Color::White, &m, &mut rollback);
        assert_eq!(before, board);
        assert!(rollback.is_empty());
    }

    #[test]
    pub fn nested_steps_unwind_in_order() {
        let mut board = Board::new();
        for (x, y) in [(1, 1), (3, 1), (5, 1), (1, 3), (3, 3), (5, 3), (1, 5), (3, 5), (5, 5), (7, 3)] {
            board.add_piece(Color::White, x, y);
        }
        let before = board.clone();
        let mut rollback = MoveRollback::default();

        let first = Move::Step { x: 6, y: 6, from_x: 3, from_y: 1 };
        board.perform_move(Color::White, &first, &mut rollback);
        let second = Move::Step { x: 3, y: 1, from_x: 1, from_y: 3 };
        assert!(board.is_valid_move(Color::White, &second));
        board.perform_move(Color::White, &second, &mut rollback);
        assert_eq!(vec![1, 2], rollback.step_origins);

        board.undo_move(Color::White, &second, &mut rollback);
        board.undo_move(Color::White, &first, &mut rollback);
        assert_eq!(before, board);
    }
}
