pub mod board;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod search;
pub mod square;
pub mod transposition;

pub use board::{Board, Color, Piece, PieceKind, STANDARD_STARTING_POSITION};
pub use config::SearchConfig;
pub use error::{ChessError, ChessResult};
pub use evaluation::Evaluator;
pub use game::{Game, MoveRecord};
pub use movegen::Move;
pub use search::{EvaluatedPosition, Search};
pub use square::{to_algebraic, to_numeric, Direction, Square};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let board = Board::standard();
        let moves = board.all_legal_moves();
        assert_eq!(moves.len(), 20);

        // Generation order follows origin index.
        let origins: Vec<usize> = moves.iter().map(|mv| mv.origin().index()).collect();
        let mut sorted = origins.clone();
        sorted.sort();
        assert_eq!(origins, sorted);
        assert_eq!(moves, board.all_legal_moves());
    }

    #[test]
    fn test_successors_are_independent() {
        let board = Board::standard();
        let first = board.successors();
        let second = board.successors();
        assert_eq!(first, second);

        let mut mutated = first.clone();
        let follow_up = mutated[0].all_legal_moves()[0];
        mutated[0] = mutated[0].transposition(follow_up);

        assert_eq!(board, Board::standard());
        assert_eq!(&mutated[1..], &first[1..]);
        assert_ne!(mutated[0], first[0]);
    }

    #[test]
    fn test_move_then_rewind_for_every_opening_move() {
        for mv in Board::standard().all_legal_moves() {
            let mut game = Game::new();
            game.make_move(mv.origin(), mv.destination()).unwrap();
            for reply in game.legal_moves() {
                let before = game.clone();
                game.make_move(reply.origin(), reply.destination()).unwrap();
                game.rewind().unwrap();
                assert_eq!(game, before, "{mv} then {reply}");
            }
        }
    }

    #[test]
    fn test_sliding_moves_stay_on_lines() {
        let board = Board::from_notation(
            &[
                "r  qk  r",
                "ppp  ppp",
                "  n  n  ",
                "   pp   ",
                "  BPP b ",
                "  N  N  ",
                "PPP  PPP",
                "R  QK  R",
            ]
            .concat(),
            Color::White,
        )
        .unwrap();

        for mv in board.all_legal_moves() {
            let kind = board.occupant(mv.origin()).map(|p| p.kind);
            if matches!(kind, Some(PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)) {
                assert!(mv.direction().is_some(), "{mv}");
                assert!(board.is_path_clear(mv), "{mv}");
            }
        }
    }

    #[test]
    fn test_perft_initial_position() {
        let board = Board::standard();
        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
        assert_eq!(perft(&board, 3), 8902);
    }

    // Helper function to perform perft
    fn perft(board: &Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        if depth == 1 {
            return board.all_legal_moves().len() as u64;
        }
        board
            .successors()
            .iter()
            .map(|next| perft(next, depth - 1))
            .sum()
    }
}
