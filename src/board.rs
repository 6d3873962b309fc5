use std::fmt::Debug;

use log::error;
use tinyvec::ArrayVec;

use crate::{
    moves::Move,
    piece::{Color, Piece, is_corner, is_on_board},
};

pub const DIMENSION: i8 = 8;
/// Each side may have at most this many pieces on the board. Once reached, the side must step instead of add.
pub const MAX_PIECES: usize = 10;

const EMPTY_GRID: [[Option<Piece>; DIMENSION as usize]; DIMENSION as usize] =
    [[None; DIMENSION as usize]; DIMENSION as usize];

/// The grid is the authority on what is where. `pieces` mirrors it per color and keeps insertion order, which
/// decides the order step moves are generated in.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Indexed `[x][y]`
    grid: [[Option<Piece>; DIMENSION as usize]; DIMENSION as usize],
    pieces: [Vec<Piece>; 2],
}

impl Board {
    pub fn new() -> Board {
        Board::default()
    }

    /// Parses eight lines of eight characters: `.` for empty, `b` for black and `w` for white. The first line is row
    /// 0. Pieces are inserted row by row, left to right.
    pub fn from_diagram(diagram: &str) -> Result<Board, String> {
        let rows: Vec<&str> = diagram.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if rows.len() != DIMENSION as usize {
            return Err(format!(
                "Expected diagram to have {DIMENSION} rows but it had {}",
                rows.len()
            ));
        }

        let mut board = Board::default();
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != DIMENSION as usize {
                return Err(format!(
                    "Expected row {y} to have {DIMENSION} cells but it had {}. Row: '{row}'",
                    cells.len()
                ));
            }

            for (x, c) in cells.into_iter().enumerate() {
                let color = match c {
                    '.' => continue,
                    'b' | 'B' => Color::Black,
                    'w' | 'W' => Color::White,
                    _ => {
                        return Err(format!(
                            "Encountered unexpected character '{c}' at column {x} of row {y}"
                        ));
                    }
                };

                let (x, y) = (x as i8, y as i8);
                if is_corner(x, y) {
                    return Err(format!("Piece placed on corner square {x}{y}"));
                }
                if color.in_opponent_goal(x, y) {
                    return Err(format!("A {color} piece may not be placed in the opponent's goal at {x}{y}"));
                }
                if board.piece_count(color) >= MAX_PIECES {
                    return Err(format!("Diagram has more than {MAX_PIECES} {color} pieces"));
                }

                board.add_piece(color, x, y);
            }
        }

        Ok(board)
    }

    pub fn to_diagram(&self) -> String {
        let mut result = String::with_capacity(72);
        for y in 0..DIMENSION {
            for x in 0..DIMENSION {
                result.push(match self.cell_contents(x, y) {
                    None => '.',
                    Some(Piece { color: Color::Black, .. }) => 'b',
                    Some(Piece { color: Color::White, .. }) => 'w',
                });
            }
            result.push('\n');
        }
        result
    }

    /// Contents of the square, `None` when empty or off the board
    #[inline]
    pub fn cell_contents(&self, x: i8, y: i8) -> Option<Piece> {
        if is_on_board(x, y) {
            self.grid[x as usize][y as usize]
        } else {
            None
        }
    }

    #[inline]
    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[color.index()]
    }

    #[inline]
    pub fn piece_count(&self, color: Color) -> usize {
        self.pieces[color.index()].len()
    }

    pub fn add_piece(&mut self, color: Color, x: i8, y: i8) {
        self.insert_piece(color, x, y, self.piece_count(color));
    }

    /// Places a piece at `index` of its color's sequence. Adding is inserting at the back.
    pub fn insert_piece(&mut self, color: Color, x: i8, y: i8, index: usize) {
        if !is_on_board(x, y) || self.grid[x as usize][y as usize].is_some() {
            error!("Tried to add a {color} piece to unavailable square {x}{y}. Board: {self:?}");
            panic!("Tried to add a piece to unavailable square {x}{y}");
        }
        if self.piece_count(color) >= MAX_PIECES || index > self.piece_count(color) {
            error!("Tried to add an extra {color} piece at {x}{y} in slot {index}. Board: {self:?}");
            panic!("Tried to add more than {MAX_PIECES} pieces of one color or past the end of the sequence");
        }
        debug_assert!(!is_corner(x, y) && !color.in_opponent_goal(x, y));

        let piece = Piece::new(color, x, y);
        self.grid[x as usize][y as usize] = Some(piece);
        self.pieces[color.index()].insert(index, piece);
    }

    /// Returns the index the piece had in its color's sequence
    pub fn remove_piece(&mut self, color: Color, x: i8, y: i8) -> usize {
        let Some(index) = self.index_of(color, x, y) else {
            error!("Tried to remove a {color} piece from {x}{y} but there is none. Board: {self:?}");
            panic!("Tried to remove a piece that is not on the board");
        };

        self.pieces[color.index()].remove(index);
        self.grid[x as usize][y as usize] = None;
        index
    }

    /// Checks that the grid and the piece lists agree and that no piece breaks the placement rules that do not
    /// depend on neighbors
    pub fn check_invariants(&self) -> Result<(), String> {
        for color in Color::ALL {
            let pieces = self.pieces(color);
            if pieces.len() > MAX_PIECES {
                return Err(format!("{color} has {} pieces", pieces.len()));
            }

            for (i, p) in pieces.iter().enumerate() {
                if p.color != color {
                    return Err(format!("{p:?} is in the {color} piece list"));
                }
                if self.cell_contents(p.x, p.y) != Some(*p) {
                    return Err(format!("{p:?} is listed but the grid has {:?}", self.cell_contents(p.x, p.y)));
                }
                if pieces[..i].iter().any(|other| other.same_square(p)) {
                    return Err(format!("{p:?} is listed twice"));
                }
                if is_corner(p.x, p.y) || color.in_opponent_goal(p.x, p.y) {
                    return Err(format!("{p:?} is on a square {color} may not use"));
                }
            }
        }

        let on_grid = self.grid.iter().flatten().flatten().count();
        let listed = self.pieces.iter().map(Vec::len).sum::<usize>();
        if on_grid != listed {
            return Err(format!("Grid has {on_grid} pieces but {listed} are listed"));
        }

        Ok(())
    }

    fn index_of(&self, color: Color, x: i8, y: i8) -> Option<usize> {
        self.pieces[color.index()].iter().position(|p| p.x == x && p.y == y)
    }

    /// Whether `side` may play `m` right now. Never changes the board.
    pub fn is_valid_move(&self, side: Color, m: &Move) -> bool {
        let (x, y) = m.destination();
        if !is_on_board(x, y) || self.grid[x as usize][y as usize].is_some() {
            return false;
        }

        if is_corner(x, y) || side.in_opponent_goal(x, y) {
            return false;
        }

        let vacated = match *m {
            Move::Add { .. } => {
                if self.piece_count(side) >= MAX_PIECES {
                    return false;
                }
                None
            }
            Move::Step { from_x, from_y, .. } => {
                if self.piece_count(side) != MAX_PIECES {
                    return false;
                }
                match self.cell_contents(from_x, from_y) {
                    Some(p) if p.color == side => Some((from_x, from_y)),
                    _ => return false,
                }
            }
        };

        !self.forms_cluster(Piece::new(side, x, y), vacated)
    }

    /// Whether placing `probe` would connect three or more of its color by king moves
    fn forms_cluster(&self, probe: Piece, vacated: Option<(i8, i8)>) -> bool {
        let friends: ArrayVec<[Piece; 8]> = probe
            .neighbors_excluding(self, vacated)
            .into_iter()
            .flatten()
            .filter(|p| p.color == probe.color)
            .collect();

        match friends.len() {
            0 => false,
            1 => friends[0]
                .neighbors_excluding(self, vacated)
                .iter()
                .flatten()
                .any(|p| p.color == probe.color),
            _ => true,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            grid: EMPTY_GRID,
            pieces: [Vec::with_capacity(MAX_PIECES), Vec::with_capacity(MAX_PIECES)],
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = f
            .debug_struct("Board")
            .field("black", &self.pieces[Color::Black.index()].len())
            .field("white", &self.pieces[Color::White.index()].len())
            .finish();
        if result.is_err() {
            panic!("Failed to convert Board to debug struct representation")
        }

        write!(f, "\n{}", self.to_diagram())
    }
}
