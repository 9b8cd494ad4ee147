//! Live game state: validated move application and single-ply rewind.

use rand::Rng;
use tracing::info;

use crate::board::{Board, Color, Piece};
use crate::error::{ChessError, ChessResult};
use crate::movegen::Move;
use crate::search::Search;
use crate::square::{IntoSquare, Square};

/// One applied ply, enough to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub origin: Square,
    pub destination: Square,
    pub captured: Option<Piece>,
}

impl MoveRecord {
    pub fn as_move(&self) -> Move {
        Move::between(self.origin, self.destination)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    board: Board,
    records: Vec<MoveRecord>,
    captured_pieces: Vec<Piece>,
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::standard())
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            records: Vec::new(),
            captured_pieces: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_player(&self) -> Color {
        self.board.active_player()
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Pieces taken so far, in capture order.
    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured_pieces
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.all_legal_moves()
    }

    /// Moves the piece on `origin` to `destination`.
    ///
    /// Every check runs before the board is touched, so a rejected move leaves
    /// the game exactly as it was.
    pub fn make_move<O: IntoSquare, D: IntoSquare>(
        &mut self,
        origin: O,
        destination: D,
    ) -> ChessResult<MoveRecord> {
        let origin = origin.into_square()?;
        let destination = destination.into_square()?;

        let piece = self
            .board
            .occupant(origin)
            .ok_or(ChessError::EmptySquare(origin))?;
        if piece.color != self.board.active_player() {
            return Err(ChessError::WrongColor {
                square: origin,
                owner: piece.color,
            });
        }
        let mv = self
            .board
            .legal_moves_for(origin)
            .into_iter()
            .find(|mv| mv.destination() == destination)
            .ok_or(ChessError::IllegalMove {
                from: origin,
                to: destination,
            })?;

        let captured = self.board.apply(mv);
        if let Some(taken) = captured {
            self.captured_pieces.push(taken);
        }
        let record = MoveRecord {
            origin,
            destination,
            captured,
        };
        self.records.push(record);

        info!(
            piece = piece.kind.name(),
            from = %origin,
            to = %destination,
            captured = captured.map(|p| p.kind.name()),
            "moved"
        );
        Ok(record)
    }

    /// Undoes the most recent ply, restoring any captured piece.
    pub fn rewind(&mut self) -> ChessResult<MoveRecord> {
        let record = self.records.pop().ok_or(ChessError::NothingToRewind)?;
        self.board.undo(record.as_move(), record.captured);
        if record.captured.is_some() {
            self.captured_pieces.pop();
        }
        info!(from = %record.origin, to = %record.destination, "rewound");
        Ok(record)
    }

    /// Plays the search's preferred move. Returns `None` only when the side to
    /// move has no legal move.
    pub fn play_engine_move(&mut self, search: &mut Search) -> ChessResult<Option<MoveRecord>> {
        let Some(mv) = search.find_best_move(&self.board) else {
            return Ok(None);
        };
        let record = self.make_move(mv.origin(), mv.destination())?;
        search.prune_cache(&self.board);
        Ok(Some(record))
    }

    /// Plays a uniformly random legal move.
    pub fn play_random_move<R: Rng + ?Sized>(
        &mut self,
        search: &Search,
        rng: &mut R,
    ) -> ChessResult<Option<MoveRecord>> {
        match search.choose_random_move(&self.board, rng) {
            Some(mv) => self.make_move(mv.origin(), mv.destination()).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    #[test]
    fn applies_a_legal_move() {
        let mut game = Game::new();
        let record = game.make_move("E2", "E4").unwrap();
        assert_eq!(record.captured, None);
        assert_eq!(game.active_player(), Color::Black);
        assert!(game.board().occupant_at("E2").unwrap().is_none());
        assert_eq!(game.board().history().len(), 1);
        assert_eq!(game.move_history(), &[record]);
    }

    #[test]
    fn rejections_leave_the_game_untouched() {
        let mut game = Game::new();
        let before = game.clone();

        let empty = game.make_move("E4", "E5").unwrap_err();
        assert!(matches!(empty, ChessError::EmptySquare(_)));
        let wrong = game.make_move("E7", "E5").unwrap_err();
        assert!(matches!(wrong, ChessError::WrongColor { owner: Color::Black, .. }));
        let illegal = game.make_move("E2", "E5").unwrap_err();
        assert!(matches!(illegal, ChessError::IllegalMove { .. }));
        for err in [&empty, &wrong, &illegal] {
            assert!(err.is_illegal_move());
        }

        let bad_name = game.make_move("E2", "E9").unwrap_err();
        assert!(matches!(bad_name, ChessError::InvalidSquare(_)));
        assert!(!bad_name.is_illegal_move());

        assert_eq!(game, before);
    }

    #[test]
    fn capture_then_rewind_restores_everything() {
        let mut game = Game::new();
        game.make_move("E2", "E4").unwrap();
        game.make_move("D7", "D5").unwrap();
        let before = game.clone();

        let record = game.make_move("E4", "D5").unwrap();
        let taken = record.captured.unwrap();
        assert_eq!((taken.kind, taken.color), (PieceKind::Pawn, Color::Black));
        assert_eq!(game.captured_pieces(), &[taken]);

        let rewound = game.rewind().unwrap();
        assert_eq!(rewound, record);
        assert_eq!(game, before);
        assert!(game.captured_pieces().is_empty());
    }

    #[test]
    fn rewind_restores_double_advance() {
        let mut game = Game::new();
        game.make_move("A2", "A3").unwrap();
        game.rewind().unwrap();
        assert_eq!(game, Game::new());
        game.make_move("A2", "A4").unwrap();
    }

    #[test]
    fn rewind_on_fresh_game_fails() {
        let mut game = Game::new();
        assert_eq!(game.rewind(), Err(ChessError::NothingToRewind));
    }

    #[test]
    fn engine_move_is_applied() {
        let mut game = Game::new();
        let mut search = Search::new();
        search.set_max_depth(2);
        let record = game.play_engine_move(&mut search).unwrap().unwrap();
        assert_eq!(game.move_history(), &[record]);
        assert_eq!(game.active_player(), Color::Black);
    }

    #[test]
    fn engine_moves_at_zero_depth() {
        let mut game = Game::new();
        let mut search = Search::new();
        search.set_max_depth(0);
        let record = game.play_engine_move(&mut search).unwrap();
        assert!(record.is_some());
        assert_eq!(game.active_player(), Color::Black);
    }

    #[test]
    fn random_move_is_applied() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut game = Game::new();
        let search = Search::new();
        let mut rng = StdRng::seed_from_u64(1);
        let record = game.play_random_move(&search, &mut rng).unwrap().unwrap();
        assert_eq!(game.board().occupant(record.destination).map(|p| p.color), Some(Color::White));
    }
}
