use std::fmt;

use tracing::trace;

use crate::board::{Board, Color, Piece, PieceKind};
use crate::square::{Direction, Square};

/// A displacement of the piece on `origin`. The destination is always derived
/// from `origin + delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    origin: Square,
    delta: i8,
}

impl Move {
    /// Returns `None` when the displacement leaves the index range.
    pub fn new(origin: Square, delta: i8) -> Option<Self> {
        origin.offset(delta)?;
        Some(Self { origin, delta })
    }

    pub fn between(origin: Square, destination: Square) -> Self {
        Self {
            origin,
            delta: (destination.index() as i16 - origin.index() as i16) as i8,
        }
    }

    #[inline]
    pub fn origin(&self) -> Square {
        self.origin
    }

    #[inline]
    pub fn delta(&self) -> i8 {
        self.delta
    }

    #[inline]
    pub fn destination(&self) -> Square {
        Square((self.origin.index() as i16 + self.delta as i16) as u8)
    }

    pub fn origin_col(&self) -> u8 {
        self.origin.col()
    }

    pub fn destination_col(&self) -> u8 {
        self.destination().col()
    }

    pub fn col_distance(&self) -> u8 {
        self.origin_col().abs_diff(self.destination_col())
    }

    pub fn row_distance(&self) -> u8 {
        self.origin.row().abs_diff(self.destination().row())
    }

    /// Compass direction of a straight-line move; `None` for knight jumps.
    pub fn direction(&self) -> Option<Direction> {
        let dest = self.destination();
        Direction::classify(
            dest.row() as i8 - self.origin.row() as i8,
            dest.col() as i8 - self.origin.col() as i8,
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.destination())
    }
}

type Strategy = fn(&Board, Square, Piece) -> Vec<Move>;

/// Move generator per piece kind, indexed by `PieceKind as usize`.
const STRATEGIES: [Strategy; 6] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

fn strategy_for(kind: PieceKind) -> Strategy {
    STRATEGIES[kind as usize]
}

/// Legal moves for the piece on `square`. Empty squares and pieces of the side
/// not on move produce nothing.
///
/// King safety is not considered: a king may step onto an attacked square.
pub fn legal_moves(board: &Board, square: Square) -> Vec<Move> {
    let Some(piece) = board.occupant(square) else {
        return Vec::new();
    };
    if piece.color != board.active_player() {
        return Vec::new();
    }

    let moves = strategy_for(piece.kind)(board, square, piece);
    trace!(
        square = %square,
        piece = piece.kind.name(),
        count = moves.len(),
        "generated legal moves"
    );
    moves
}

fn candidates(origin: Square, deltas: impl IntoIterator<Item = i8>) -> impl Iterator<Item = Move> {
    deltas
        .into_iter()
        .filter_map(move |delta| Move::new(origin, delta))
}

/// Every square reachable along `directions` up to the board edge, kept when
/// the path is open and the destination is free or holds an enemy piece.
fn slide(board: &Board, origin: Square, directions: &[Direction]) -> Vec<Move> {
    let deltas = directions.iter().flat_map(|&dir| {
        (1..=dir.steps_to_edge(origin) as i8).map(move |n| dir.step() * n)
    });

    candidates(origin, deltas)
        .filter(|mv| {
            let legal = board.is_empty_or_capturable(mv.destination()) && board.is_path_clear(*mv);
            trace!(mv = %mv, legal, "slide");
            legal
        })
        .collect()
}

fn rook_moves(board: &Board, origin: Square, _piece: Piece) -> Vec<Move> {
    slide(board, origin, &Direction::ORTHOGONAL)
}

fn bishop_moves(board: &Board, origin: Square, _piece: Piece) -> Vec<Move> {
    slide(board, origin, &Direction::DIAGONAL)
}

fn queen_moves(board: &Board, origin: Square, _piece: Piece) -> Vec<Move> {
    slide(board, origin, &Direction::ALL)
}

fn knight_moves(board: &Board, origin: Square, _piece: Piece) -> Vec<Move> {
    candidates(origin, KNIGHT_OFFSETS)
        .filter(|mv| {
            // A raw offset can wrap onto the wrong row; the distance pair rules that out.
            let rows = mv.row_distance();
            let expected_cols = if rows == 2 { 1 } else { 2 };
            let legal = matches!(rows, 1 | 2)
                && mv.col_distance() == expected_cols
                && board.is_empty_or_capturable(mv.destination());
            trace!(mv = %mv, legal, "knight jump");
            legal
        })
        .collect()
}

fn pawn_moves(board: &Board, origin: Square, piece: Piece) -> Vec<Move> {
    let forward = match piece.color {
        Color::White => Direction::Up.step(),
        Color::Black => Direction::Down.step(),
    };

    let mut advances = vec![forward];
    if !piece.has_moved() {
        advances.push(forward * 2);
    }

    let mut moves: Vec<Move> = candidates(origin, advances)
        .filter(|mv| {
            let legal = mv.col_distance() == 0
                && mv.row_distance() == (mv.delta() / forward) as u8
                && board.is_empty(mv.destination())
                && board.is_path_clear(*mv);
            trace!(mv = %mv, legal, "pawn advance");
            legal
        })
        .collect();

    moves.extend(
        candidates(origin, [forward - 1, forward + 1]).filter(|mv| {
            let legal = mv.col_distance() == 1
                && mv.row_distance() == 1
                && board.is_capturable(mv.destination());
            trace!(mv = %mv, legal, "pawn capture");
            legal
        }),
    );
    moves
}

fn king_moves(board: &Board, origin: Square, _piece: Piece) -> Vec<Move> {
    candidates(origin, Direction::ALL.map(Direction::step))
        .filter(|mv| {
            let legal = mv.row_distance() <= 1
                && mv.col_distance() <= 1
                && board.is_empty_or_capturable(mv.destination());
            trace!(mv = %mv, legal, "king step");
            legal
        })
        .collect()
}
