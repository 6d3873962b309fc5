use std::{fmt::Display, str::FromStr};

use tinyvec::ArrayVec;

use crate::board::{Board, DIMENSION};

/// Neighbor offsets in compass order starting at the upper left, going clockwise through the top row and then
/// back around the bottom.
#[rustfmt::skip]
pub const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (1,   1), (0,  1), (-1, 1),
];

/// Directions scanned for connections. The index in this array is the direction index, connections are reported in
/// this order.
pub const DIRECTIONS: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

pub type Neighbors = [Option<Piece>; 8];
pub type Connections = ArrayVec<[Piece; 8]>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Black = 0,
    White = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The goal edge networks start from. Black: row 0, white: column 0.
    #[inline]
    pub const fn in_start_goal(self, x: i8, y: i8) -> bool {
        match self {
            Color::Black => y == 0,
            Color::White => x == 0,
        }
    }

    /// The goal edge networks finish on. Black: row 7, white: column 7.
    #[inline]
    pub const fn in_end_goal(self, x: i8, y: i8) -> bool {
        match self {
            Color::Black => y == DIMENSION - 1,
            Color::White => x == DIMENSION - 1,
        }
    }

    /// Squares this color may never occupy because they belong to the opponent's goals.
    #[inline]
    pub const fn in_opponent_goal(self, x: i8, y: i8) -> bool {
        self.opponent().in_start_goal(x, y) || self.opponent().in_end_goal(x, y)
    }

    /// Non-corner squares of the start goal edge, in increasing order along the edge
    pub fn start_goal_squares(self) -> [(i8, i8); 6] {
        std::array::from_fn(|i| {
            let along = i as i8 + 1;
            match self {
                Color::Black => (along, 0),
                Color::White => (0, along),
            }
        })
    }

    /// Non-corner squares of the end goal edge, in increasing order along the edge
    pub fn end_goal_squares(self) -> [(i8, i8); 6] {
        std::array::from_fn(|i| {
            let along = i as i8 + 1;
            match self {
                Color::Black => (along, DIMENSION - 1),
                Color::White => (DIMENSION - 1, along),
            }
        })
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Color::Black),
            "white" | "w" => Ok(Color::White),
            _ => Err(format!("Unknown color '{s}'")),
        }
    }
}

#[inline]
pub const fn is_on_board(x: i8, y: i8) -> bool {
    x >= 0 && x < DIMENSION && y >= 0 && y < DIMENSION
}

#[inline]
pub const fn is_corner(x: i8, y: i8) -> bool {
    (x == 0 || x == DIMENSION - 1) && (y == 0 || y == DIMENSION - 1)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    pub const fn new(color: Color, x: i8, y: i8) -> Piece {
        Piece { color, x, y }
    }

    #[inline]
    pub const fn same_square(&self, other: &Piece) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn neighbors(&self, board: &Board) -> Neighbors {
        self.neighbors_excluding(board, None)
    }

    /// Like `neighbors` but reports `vacated` as empty. The legality probe for step moves uses this to look at the
    /// board as if the stepping piece had already left its square.
    pub fn neighbors_excluding(&self, board: &Board, vacated: Option<(i8, i8)>) -> Neighbors {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| {
            let (x, y) = (self.x + dx, self.y + dy);
            if vacated == Some((x, y)) {
                None
            } else {
                board.cell_contents(x, y)
            }
        })
    }

    /// Same-color pieces this piece can see along the eight lines through it. Empty squares are transparent and the
    /// first occupied square in a direction ends the scan.
    ///
    /// When `prev` is given, the line through `prev` is skipped in both directions. A network path may not turn
    /// back on itself or keep going straight through a piece.
    pub fn connections(&self, board: &Board, prev: Option<&Piece>) -> Connections {
        let skipped_axis = prev.map(|p| ((p.x - self.x).signum(), (p.y - self.y).signum()));

        let mut result = Connections::new();
        for (dx, dy) in DIRECTIONS {
            if let Some((ax, ay)) = skipped_axis {
                if (dx == ax && dy == ay) || (dx == -ax && dy == -ay) {
                    continue;
                }
            }

            let (mut x, mut y) = (self.x + dx, self.y + dy);
            while is_on_board(x, y) {
                if let Some(p) = board.cell_contents(x, y) {
                    if p.color == self.color {
                        result.push(p);
                    }
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        result
    }
}
