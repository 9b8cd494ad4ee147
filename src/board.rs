use std::fmt;

use crate::error::{ChessError, ChessResult};
use crate::movegen::{self, Move};
use crate::square::{IntoSquare, Square};
use crate::transposition::PositionKey;

/// Empty marker used by the flat board notation.
pub const EMPTY_SQUARE: char = ' ';

#[rustfmt::skip]
pub const STANDARD_STARTING_POSITION: [char; 64] = [
    'r', 'n', 'b', 'q', 'k', 'b', 'n', 'r',
    'p', 'p', 'p', 'p', 'p', 'p', 'p', 'p',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    'P', 'P', 'P', 'P', 'P', 'P', 'P', 'P',
    'R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

const PAWN_VALUE: f64 = 1.0;
const KNIGHT_VALUE: f64 = 3.0;
const BISHOP_VALUE: f64 = 3.1;
const ROOK_VALUE: f64 = 5.0;
const QUEEN_VALUE: f64 = 9.0;
// Outweighs everything else one side can own.
const KING_VALUE: f64 = 8.0 * PAWN_VALUE
    + 2.0 * (KNIGHT_VALUE + BISHOP_VALUE + ROOK_VALUE)
    + QUEEN_VALUE
    + 1.0;

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Uppercase notation letter.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        let symbol = symbol.to_ascii_uppercase();
        PieceKind::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }

    /// Material value used by the static evaluation.
    pub const fn value(self) -> f64 {
        match self {
            PieceKind::Pawn => PAWN_VALUE,
            PieceKind::Knight => KNIGHT_VALUE,
            PieceKind::Bishop => BISHOP_VALUE,
            PieceKind::Rook => ROOK_VALUE,
            PieceKind::Queen => QUEEN_VALUE,
            PieceKind::King => KING_VALUE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// A piece on the board. `move_count` only matters for pawn double advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub move_count: u16,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            move_count: 0,
        }
    }

    /// Parses a notation letter; uppercase is white, lowercase is black.
    pub fn from_symbol(symbol: char) -> Option<Piece> {
        let kind = PieceKind::from_symbol(symbol)?;
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }

    pub fn value(&self) -> f64 {
        self.kind.value()
    }

    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    /// Ranks left to travel before reaching the far edge, from `square`.
    pub fn distance_from_promotion(&self, square: Square) -> u8 {
        match self.color {
            Color::White => square.row(),
            Color::Black => 7 - square.row(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A chess position: 64 squares, the side to move and the moves that led here.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    active_player: Color,
    history: Vec<Move>,
}

impl Board {
    /// The standard starting layout with white to move.
    pub fn standard() -> Self {
        Self {
            squares: STANDARD_STARTING_POSITION.map(Piece::from_symbol),
            active_player: Color::White,
            history: Vec::new(),
        }
    }

    /// Builds a board from 64 notation symbols, rank 8 file A first.
    pub fn serialize(data: &[char], active_player: Color) -> ChessResult<Self> {
        if data.len() != Square::COUNT {
            return Err(ChessError::InvalidNotation { len: data.len() });
        }

        let mut squares = [None; 64];
        for (slot, &symbol) in squares.iter_mut().zip(data) {
            *slot = match symbol {
                EMPTY_SQUARE | '.' => None,
                _ => Some(Piece::from_symbol(symbol).ok_or(ChessError::UnknownSymbol(symbol))?),
            };
        }

        Ok(Self {
            squares,
            active_player,
            history: Vec::new(),
        })
    }

    /// Same as [`Board::serialize`], reading the symbols from a string.
    pub fn from_notation(notation: &str, active_player: Color) -> ChessResult<Self> {
        let data: Vec<char> = notation.chars().collect();
        Self::serialize(&data, active_player)
    }

    /// Inverse of [`Board::serialize`] for the piece layout.
    pub fn to_notation(&self) -> [char; 64] {
        let mut data = [EMPTY_SQUARE; 64];
        for (symbol, slot) in data.iter_mut().zip(self.squares.iter()) {
            if let Some(piece) = slot {
                *symbol = piece.symbol();
            }
        }
        data
    }

    pub fn active_player(&self) -> Color {
        self.active_player
    }

    /// Moves applied since the board was built, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn occupant(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Occupant lookup by index or algebraic name.
    pub fn occupant_at<S: IntoSquare>(&self, square: S) -> ChessResult<Option<Piece>> {
        Ok(self.occupant(square.into_square()?))
    }

    /// Occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.occupant(sq).map(|piece| (sq, piece)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.occupant(square).is_none()
    }

    /// Occupied by the side not on move.
    pub fn is_capturable(&self, square: Square) -> bool {
        self.occupant(square)
            .map_or(false, |piece| piece.color != self.active_player)
    }

    pub fn is_empty_or_capturable(&self, square: Square) -> bool {
        self.is_empty(square) || self.is_capturable(square)
    }

    pub fn find_piece_squares(&self, kind: PieceKind, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|(_, piece)| piece.kind == kind && piece.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Ranks the pawn on `square` still has to travel, or `None` if there is no pawn.
    pub fn distance_from_promotion<S: IntoSquare>(&self, square: S) -> ChessResult<Option<u8>> {
        let square = square.into_square()?;
        Ok(self
            .occupant(square)
            .filter(|piece| piece.kind == PieceKind::Pawn)
            .map(|piece| piece.distance_from_promotion(square)))
    }

    /// Legal moves of the piece on `square`; empty unless it belongs to the side to move.
    pub fn legal_moves_for(&self, square: Square) -> Vec<Move> {
        movegen::legal_moves(self, square)
    }

    /// Every legal move of the side to move, by origin index then generation order.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.pieces()
            .filter(|(_, piece)| piece.color == self.active_player)
            .flat_map(|(sq, _)| self.legal_moves_for(sq))
            .collect()
    }

    /// One position per legal move, in `all_legal_moves` order.
    pub fn successors(&self) -> Vec<Board> {
        self.all_legal_moves()
            .into_iter()
            .map(|mv| self.transposition(mv))
            .collect()
    }

    /// The position after `mv`, leaving `self` untouched.
    pub fn transposition(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.apply(mv);
        next
    }

    /// True when no piece stands strictly between the move's origin and destination.
    ///
    /// Single steps and non-linear jumps are trivially clear.
    pub fn is_path_clear(&self, mv: Move) -> bool {
        let Some(direction) = mv.direction() else {
            return true;
        };
        let step = direction.step();
        let mut current = mv.origin();
        let destination = mv.destination();
        loop {
            current = match current.offset(step) {
                Some(sq) => sq,
                None => return false,
            };
            if current == destination {
                return true;
            }
            if !self.is_empty(current) {
                return false;
            }
        }
    }

    /// Moves the piece in place and returns whatever stood on the destination.
    /// No legality checks happen here.
    pub(crate) fn apply(&mut self, mv: Move) -> Option<Piece> {
        let from = mv.origin().index();
        let to = mv.destination().index();
        let moving = self.squares[from].take().map(|mut piece| {
            piece.move_count += 1;
            piece
        });
        debug_assert!(moving.is_some(), "applying a move from an empty square");
        let captured = std::mem::replace(&mut self.squares[to], moving);
        self.active_player = self.active_player.opposite();
        self.history.push(mv);
        captured
    }

    /// Exact inverse of [`Board::apply`] for the most recent move.
    pub(crate) fn undo(&mut self, mv: Move, captured: Option<Piece>) {
        let last = self.history.pop();
        debug_assert_eq!(last, Some(mv), "undoing a move that was not applied last");
        let from = mv.origin().index();
        let to = mv.destination().index();
        let moved = std::mem::replace(&mut self.squares[to], captured).map(|mut piece| {
            piece.move_count = piece.move_count.saturating_sub(1);
            piece
        });
        self.squares[from] = moved;
        self.active_player = self.active_player.opposite();
    }

    /// Identity of this position for the search cache.
    pub fn key(&self) -> PositionKey {
        let mut layout = [b' '; 64];
        let mut moved_pawns = 0u64;
        for (sq, piece) in self.pieces() {
            layout[sq.index()] = piece.symbol() as u8;
            if piece.kind == PieceKind::Pawn && piece.has_moved() {
                moved_pawns |= 1 << sq.index();
            }
        }
        PositionKey {
            layout,
            moved_pawns,
            active_player: self.active_player,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                let symbol = self.squares[(row * 8 + col) as usize].map_or('.', |p| p.symbol());
                write!(f, "{}", symbol)?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  A B C D E F G H")
    }
}
