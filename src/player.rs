use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    board::Board,
    moves::{Move, MoveRollback},
    piece::Color,
    search::{DEFAULT_SEARCH_DEPTH, Searcher},
};

/// A computer player. Keeps its own copy of the game, applies both its own and its opponent's moves to it, and
/// searches it for moves.
pub struct MachinePlayer {
    color: Color,
    search_depth: u8,
    board: Board,
    rng: StdRng,
}

impl MachinePlayer {
    pub fn new(color: Color) -> MachinePlayer {
        MachinePlayer::with_search_depth(color, DEFAULT_SEARCH_DEPTH)
    }

    pub fn with_search_depth(color: Color, search_depth: u8) -> MachinePlayer {
        MachinePlayer {
            color,
            search_depth,
            board: Board::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Same as [`MachinePlayer::with_search_depth`] but the opening moves are reproducible
    pub fn with_seed(color: Color, search_depth: u8, seed: u64) -> MachinePlayer {
        MachinePlayer {
            color,
            search_depth,
            board: Board::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn search_depth(&self) -> u8 {
        self.search_depth
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Picks a move, plays it on the internal board and returns it. `None` only when there is no legal move, in
    /// which case nothing changes.
    pub fn choose_move(&mut self) -> Option<Move> {
        let mut searcher = Searcher::new(&mut self.board, self.color, self.search_depth, &mut self.rng);
        let best = searcher.search();
        let nodes = searcher.stats.total_nodes;

        let chosen = match best.r#move {
            Some(m) => Some(m),
            None => {
                let fallback = self.board.generate_moves(self.color).first().copied();
                debug!("Search found no improving move for {}, falling back to {fallback:?}", self.color);
                fallback
            }
        }?;

        info!("{} chooses {chosen} (score {}, {nodes} nodes)", self.color, best.score);
        self.board.perform_move(self.color, &chosen, &mut MoveRollback::default());
        Some(chosen)
    }

    /// Records `m` as the opponent's move if it is legal
    pub fn opponent_move(&mut self, m: &Move) -> bool {
        self.try_move(self.color.opponent(), m)
    }

    /// Records `m` as this player's own move if it is legal. Used for setting up positions.
    pub fn force_move(&mut self, m: &Move) -> bool {
        self.try_move(self.color, m)
    }

    fn try_move(&mut self, side: Color, m: &Move) -> bool {
        if !self.board.is_valid_move(side, m) {
            debug!("Rejected {m} for {side}");
            return false;
        }

        self.board.perform_move(side, m, &mut MoveRollback::default());
        true
    }
}

#[cfg(test)]
mod player_tests {
    use rand::seq::SliceRandom;

    use super::*;
    use crate::{board::MAX_PIECES, moves::MoveKind};

    #[test]
    pub fn black_opens_on_its_start_goal() {
        let mut player = MachinePlayer::with_seed(Color::Black, 1, 42);
        let m = player.choose_move().unwrap();

        assert_eq!(MoveKind::Add, m.kind());
        let (x, y) = m.destination();
        assert_eq!(0, y);
        assert!((1..=6).contains(&x));
        assert_eq!(Some(Color::Black), player.board().cell_contents(x, y).map(|p| p.color));
    }

    #[test]
    pub fn same_seed_same_opening() {
        let mut a = MachinePlayer::with_seed(Color::White, 2, 1234);
        let mut b = MachinePlayer::with_seed(Color::White, 2, 1234);

        assert_eq!(a.choose_move(), b.choose_move());
        assert_eq!(a.choose_move(), b.choose_move());
    }

    #[test]
    pub fn illegal_moves_change_nothing() {
        let mut player = MachinePlayer::with_seed(Color::White, 2, 0);
        assert!(player.opponent_move(&Move::Add { x: 3, y: 0 }));
        let before = player.board().clone();

        // occupied
        assert!(!player.opponent_move(&Move::Add { x: 3, y: 0 }));
        assert!(!player.force_move(&Move::Add { x: 3, y: 0 }));
        // white may not use black's goal rows
        assert!(!player.force_move(&Move::Add { x: 3, y: 7 }));
        // off the board
        assert!(!player.force_move(&Move::Add { x: 9, y: 3 }));
        assert!(!player.opponent_move(&Move::Add { x: -1, y: -1 }));
        // black does not have ten pieces yet
        assert!(!player.opponent_move(&Move::Step { x: 4, y: 4, from_x: 3, from_y: 0 }));

        assert_eq!(&before, player.board());
    }

    #[test]
    pub fn force_and_opponent_moves_go_to_the_right_side() {
        let mut player = MachinePlayer::new(Color::Black);
        assert_eq!(2, player.search_depth());

        assert!(player.opponent_move(&Move::Add { x: 0, y: 3 }));
        assert!(player.force_move(&Move::Add { x: 3, y: 0 }));

        assert_eq!(&[crate::piece::Piece::new(Color::White, 0, 3)], player.board().pieces(Color::White));
        assert_eq!(&[crate::piece::Piece::new(Color::Black, 3, 0)], player.board().pieces(Color::Black));
    }

    /// Black pieces that make a network, every one placed legally
    const BLACK_NETWORK: [(i8, i8); 9] = [(6, 0), (6, 2), (5, 2), (3, 4), (2, 4), (2, 6), (2, 7), (4, 6), (4, 7)];

    #[test]
    pub fn takes_the_win() {
        let mut player = MachinePlayer::with_seed(Color::Black, 2, 5);
        let own = [(6, 0), (6, 2), (5, 2), (3, 4), (2, 6), (2, 7), (4, 6), (4, 7)];
        let opponent = [(4, 2), (4, 3), (7, 1), (1, 6), (3, 6), (5, 6), (7, 2), (0, 6)];
        for ((ox, oy), (x, y)) in opponent.into_iter().zip(own) {
            assert!(player.opponent_move(&Move::Add { x: ox, y: oy }), "white {ox}{oy}");
            assert!(player.force_move(&Move::Add { x, y }), "black {x}{y}");
        }

        assert_eq!(Some(Move::Add { x: 2, y: 4 }), player.choose_move());
        assert!(player.board().has_valid_network(Color::Black));
    }

    #[test]
    pub fn falls_back_to_first_legal_move_when_search_has_none() {
        let mut player = MachinePlayer::with_seed(Color::White, 2, 8);
        for (x, y) in BLACK_NETWORK {
            assert!(player.opponent_move(&Move::Add { x, y }), "black {x}{y}");
        }
        assert!(player.board().has_valid_network(Color::Black));

        let first = player.board().generate_moves(Color::White)[0];
        assert_eq!(Move::Add { x: 0, y: 1 }, first);

        assert_eq!(Some(first), player.choose_move());
        assert_eq!(&[crate::piece::Piece::new(Color::White, 0, 1)], player.board().pieces(Color::White));
    }

    #[test]
    pub fn no_legal_move_returns_none_and_changes_nothing() {
        // Four pairs whose neighborhoods cover rows 1 through 6, white's only usable rows
        let mut player = MachinePlayer::with_seed(Color::White, 2, 8);
        for (x, y) in [(1, 2), (2, 2), (5, 2), (6, 2), (1, 5), (2, 5), (5, 5), (6, 5)] {
            assert!(player.force_move(&Move::Add { x, y }), "white {x}{y}");
        }
        assert!(player.board().generate_moves(Color::White).is_empty());
        let before = player.board().clone();

        assert_eq!(None, player.choose_move());
        assert_eq!(&before, player.board());
    }

    #[test]
    pub fn self_play_keeps_boards_in_sync() {
        let mut white = MachinePlayer::with_seed(Color::White, 1, 17);
        let mut black = MachinePlayer::with_seed(Color::Black, 1, 18);

        for ply in 0..30 {
            let (mover, other) = if ply % 2 == 0 { (&mut white, &mut black) } else { (&mut black, &mut white) };

            let Some(m) = mover.choose_move() else {
                break;
            };
            assert!(other.opponent_move(&m), "ply {ply}: {m} rejected");
            assert_eq!(mover.board(), other.board());
            mover.board().check_invariants().unwrap();

            if mover.board().has_valid_network(Color::White) || mover.board().has_valid_network(Color::Black) {
                break;
            }
        }

        assert!(white.board().piece_count(Color::White) <= MAX_PIECES);
    }

    #[test]
    pub fn random_games_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut rollback = MoveRollback::default();

        for _ in 0..5 {
            let mut board = Board::new();
            let mut side = Color::White;

            for _ in 0..40 {
                let moves = board.generate_moves(side);
                let Some(m) = moves.choose(&mut rng).copied() else {
                    break;
                };

                let before = board.clone();
                assert!(board.is_valid_move(side, &m));
                assert_eq!(before, board);

                board.perform_move(side, &m, &mut rollback);
                board.check_invariants().unwrap();
                if board.piece_count(side) < crate::network::MIN_NETWORK_LENGTH {
                    assert!(!board.has_valid_network(side));
                }
                if let Move::Step { x, y, .. } = m {
                    let last = board.pieces(side)[board.piece_count(side) - 1];
                    assert_eq!((x, y), (last.x, last.y));
                }
                board.undo_move(side, &m, &mut rollback);
                assert_eq!(before, board);
                assert!(rollback.is_empty());

                board.perform_move(side, &m, &mut rollback);
                rollback = MoveRollback::default();
                side = side.opponent();
            }
        }
    }
}
