use crate::board::{Board, Color, Piece, PieceKind};
use crate::square::Square;

/// Static evaluation from white's point of view: positive favours white.
#[derive(Debug, Clone)]
pub struct Evaluator {
    // Pawn advancement: (base - distance_from_promotion) * weight
    pub pawn_advance_base: f64,
    pub pawn_advance_weight: f64,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_advance_base: 6.0,
            pawn_advance_weight: 0.1,
        }
    }

    pub fn evaluate(&self, board: &Board) -> f64 {
        board
            .pieces()
            .map(|(square, piece)| {
                let value = piece.value() + self.positional_bonus(piece, square);
                match piece.color {
                    Color::White => value,
                    Color::Black => -value,
                }
            })
            .sum()
    }

    /// Material alone, ignoring placement.
    pub fn material(&self, board: &Board) -> f64 {
        board
            .pieces()
            .map(|(_, piece)| match piece.color {
                Color::White => piece.value(),
                Color::Black => -piece.value(),
            })
            .sum()
    }

    fn positional_bonus(&self, piece: Piece, square: Square) -> f64 {
        match piece.kind {
            PieceKind::Pawn => self.evaluate_pawn(piece, square),
            _ => 0.0,
        }
    }

    /// Grows as the pawn nears the last rank; zero on its starting rank.
    pub fn evaluate_pawn(&self, pawn: Piece, square: Square) -> f64 {
        let distance = pawn.distance_from_promotion(square) as f64;
        (self.pawn_advance_base - distance) * self.pawn_advance_weight
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starting_position_is_even() {
        let evaluator = Evaluator::new();
        let board = Board::standard();
        assert!(close(evaluator.evaluate(&board), 0.0));
        assert!(close(evaluator.material(&board), 0.0));
    }

    #[test]
    fn material_counts_with_sign() {
        let evaluator = Evaluator::new();
        let board = Board::from_notation(
            &[
                "k       ", "        ", "        ", "        ", "        ", "        ", "        ",
                "QB     K",
            ]
            .concat(),
            Color::White,
        )
        .unwrap();
        assert!(close(evaluator.material(&board), 9.0 + 3.1));
        assert!(close(evaluator.evaluate(&board), 9.0 + 3.1));
    }

    #[test]
    fn advanced_pawns_score_higher() {
        let evaluator = Evaluator::new();
        let white = Piece::new(PieceKind::Pawn, Color::White);
        let black = Piece::new(PieceKind::Pawn, Color::Black);

        assert!(close(evaluator.evaluate_pawn(white, "A2".parse().unwrap()), 0.0));
        assert!(close(evaluator.evaluate_pawn(white, "D4".parse().unwrap()), 0.2));
        assert!(close(evaluator.evaluate_pawn(white, "D7".parse().unwrap()), 0.5));
        assert!(close(evaluator.evaluate_pawn(black, "A7".parse().unwrap()), 0.0));
        assert!(close(evaluator.evaluate_pawn(black, "C3".parse().unwrap()), 0.4));
    }

    #[test]
    fn pawn_push_shifts_evaluation_toward_mover() {
        let evaluator = Evaluator::new();
        let board = Board::standard();
        let mv = crate::movegen::Move::new("E2".parse().unwrap(), -16).unwrap();
        let after = board.transposition(mv);
        assert!(close(evaluator.evaluate(&after), 0.2));
    }
}
