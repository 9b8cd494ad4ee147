use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, ChessResult};

const FILES: &[u8; 8] = b"ABCDEFGH";

/// A square on the board, indexed 0..64 row-major from A8 (top left) to H1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(crate) u8);

impl Square {
    pub const COUNT: usize = 64;

    pub fn new(index: u8) -> ChessResult<Self> {
        if (index as usize) < Self::COUNT {
            Ok(Square(index))
        } else {
            Err(ChessError::InvalidSquare(index.to_string()))
        }
    }

    /// Iterates every square in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Row counted from the top (rank 8 is row 0).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 8
    }

    /// Rank number 1..=8 as printed on a board.
    #[inline]
    pub fn rank(self) -> u8 {
        8 - self.row()
    }

    /// The square reached by adding `delta` to the index, if it stays on the board.
    ///
    /// This says nothing about whether the displacement wraps around an edge;
    /// callers check column and row distances for that.
    pub fn offset(self, delta: i8) -> Option<Square> {
        let target = self.0 as i16 + delta as i16;
        if (0..Self::COUNT as i16).contains(&target) {
            Some(Square(target as u8))
        } else {
            None
        }
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", FILES[self.col() as usize] as char, self.rank())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidSquare(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = match bytes[0].to_ascii_uppercase() {
            f @ b'A'..=b'H' => f - b'A',
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            r @ b'1'..=b'8' => r - b'0',
            _ => return Err(invalid()),
        };

        Ok(Square((8 - rank) * 8 + file))
    }
}

/// Converts an index to its algebraic name, e.g. 48 -> "A2".
pub fn to_algebraic(index: u8) -> ChessResult<String> {
    Square::new(index).map(Square::to_algebraic)
}

/// Converts an algebraic name (any case) to its index, e.g. "a2" -> 48.
pub fn to_numeric(name: &str) -> ChessResult<u8> {
    name.parse::<Square>().map(|sq| sq.0)
}

/// Anything that names a square: a `Square`, a raw index or an algebraic name.
pub trait IntoSquare {
    fn into_square(self) -> ChessResult<Square>;
}

impl IntoSquare for Square {
    fn into_square(self) -> ChessResult<Square> {
        Ok(self)
    }
}

impl IntoSquare for u8 {
    fn into_square(self) -> ChessResult<Square> {
        Square::new(self)
    }
}

impl IntoSquare for usize {
    fn into_square(self) -> ChessResult<Square> {
        u8::try_from(self)
            .map_err(|_| ChessError::InvalidSquare(self.to_string()))
            .and_then(Square::new)
    }
}

impl IntoSquare for &str {
    fn into_square(self) -> ChessResult<Square> {
        self.parse()
    }
}

/// The eight compass directions, as seen with rank 8 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Index displacement of a single step.
    pub const fn step(self) -> i8 {
        match self {
            Direction::Up => -8,
            Direction::Down => 8,
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::UpLeft => -9,
            Direction::UpRight => -7,
            Direction::DownLeft => 7,
            Direction::DownRight => 9,
        }
    }

    /// Row and column change of a single step.
    const fn unit(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }

    /// How many steps fit between `from` and the board edge in this direction.
    pub fn steps_to_edge(self, from: Square) -> u8 {
        let (dr, dc) = self.unit();
        let rows = match dr {
            -1 => from.row(),
            1 => 7 - from.row(),
            _ => u8::MAX,
        };
        let cols = match dc {
            -1 => from.col(),
            1 => 7 - from.col(),
            _ => u8::MAX,
        };
        rows.min(cols)
    }

    /// Classifies a row/column displacement as a compass direction. Returns
    /// `None` for displacements that are not a straight line (e.g. knight jumps)
    /// and for the null displacement.
    pub fn classify(row_delta: i8, col_delta: i8) -> Option<Direction> {
        if row_delta != 0 && col_delta != 0 && row_delta.abs() != col_delta.abs() {
            return None;
        }
        let dir = match (row_delta.signum(), col_delta.signum()) {
            (-1, 0) => Direction::Up,
            (1, 0) => Direction::Down,
            (0, -1) => Direction::Left,
            (0, 1) => Direction::Right,
            (-1, -1) => Direction::UpLeft,
            (-1, 1) => Direction::UpRight,
            (1, -1) => Direction::DownLeft,
            (1, 1) => Direction::DownRight,
            _ => return None,
        };
        Some(dir)
    }
}
