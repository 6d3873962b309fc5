use tinyvec::ArrayVec;

use crate::{
    board::{Board, MAX_PIECES},
    piece::{Color, Piece},
};

/// A network needs at least this many pieces, counting both goal pieces
pub const MIN_NETWORK_LENGTH: usize = 6;

impl Board {
    /// Whether `side` has a path of connected pieces from its start goal edge to its end goal edge.
    ///
    /// The path has at least [`MIN_NETWORK_LENGTH`] pieces, visits each piece once, uses a single piece from each
    /// goal edge and changes direction at every piece it passes through.
    pub fn has_valid_network(&self, side: Color) -> bool {
        if self.piece_count(side) < MIN_NETWORK_LENGTH {
            return false;
        }

        let starts: ArrayVec<[Piece; 6]> = side
            .start_goal_squares()
            .into_iter()
            .filter_map(|(x, y)| self.cell_contents(x, y))
            .filter(|p| p.color == side)
            .collect();
        let reaches_end = side
            .end_goal_squares()
            .into_iter()
            .any(|(x, y)| self.cell_contents(x, y).is_some_and(|p| p.color == side));

        if starts.is_empty() || !reaches_end {
            return false;
        }

        let mut path = Vec::with_capacity(MAX_PIECES);
        starts.iter().any(|start| {
            path.push(*start);
            let found = self.extend_network(side, &mut path);
            path.pop();
            found
        })
    }

    /// Depth first search from the last piece of `path`. Leaves `path` as it found it.
    fn extend_network(&self, side: Color, path: &mut Vec<Piece>) -> bool {
        let current = path[path.len() - 1];
        if side.in_end_goal(current.x, current.y) {
            // Nothing past the end goal can finish the path since the end goal is already used
            return path.len() >= MIN_NETWORK_LENGTH;
        }

        let prev = if path.len() >= 2 { Some(path[path.len() - 2]) } else { None };
        for next in current.connections(self, prev.as_ref()) {
            if !can_join_path(side, path, &next) {
                continue;
            }

            path.push(next);
            let found = self.extend_network(side, path);
            path.pop();

            if found {
                return true;
            }
        }

        false
    }
}

fn can_join_path(side: Color, path: &[Piece], next: &Piece) -> bool {
    let next_in_start = side.in_start_goal(next.x, next.y);
    let next_in_end = side.in_end_goal(next.x, next.y);

    path.iter().all(|p| {
        !p.same_square(next)
            && !(next_in_start && side.in_start_goal(p.x, p.y))
            && !(next_in_end && side.in_end_goal(p.x, p.y))
    })
}
