//! Square type and coordinate helpers.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

/// A square on the chess board, stored as a compact 0-63 index.
///
/// Index layout is rank-major from the top-left corner: a8 = 0, b8 = 1,
/// ..., h1 = 63. Rank index 0 is therefore the board's rank 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from a rank index (0 = rank 8) and file (0 = file a).
    /// Does not bounds-check.
    #[inline]
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Self {
        Square((rank * 8 + file) as u8)
    }

    /// Create a square from an index (0-63).
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx as u8)
    }

    /// The square's index (a8 = 0, ..., h1 = 63).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rank index counted from the top of the board: 0 is rank 8, 7 is rank 1.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 / 8) as usize
    }

    /// File index: 0 is file a, 7 is file h.
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Rank counted from a side's own back rank: 0 is the back rank,
    /// 6 is the rank a pawn promotes from, 7 is the promotion rank.
    #[inline]
    #[must_use]
    pub const fn relative_rank(self, color: Color) -> usize {
        match color {
            Color::White => 7 - self.rank(),
            Color::Black => self.rank(),
        }
    }

    /// Mirror the square across the horizontal centre line (a8 <-> a1).
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// The square one step toward the opponent's back rank, if any.
    #[inline]
    #[must_use]
    pub const fn forward(self, color: Color) -> Option<Self> {
        match color {
            Color::White => {
                if self.rank() > 0 {
                    Some(Square(self.0 - 8))
                } else {
                    None
                }
            }
            Color::Black => {
                if self.rank() < 7 {
                    Some(Square(self.0 + 8))
                } else {
                    None
                }
            }
        }
    }

    /// Chebyshev (king-move) distance to another square.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Square) -> usize {
        let file_dist = (self.file() as i32 - other.file() as i32).unsigned_abs() as usize;
        let rank_dist = (self.rank() as i32 - other.rank() as i32).unsigned_abs() as usize;
        file_dist.max(rank_dist)
    }

    /// Absolute file distance to another square.
    #[inline]
    #[must_use]
    pub fn file_distance(self, other: Square) -> usize {
        (self.file() as i32 - other.file() as i32).unsigned_abs() as usize
    }

    /// True if the square is light-coloured (a8 is light).
    #[inline]
    #[must_use]
    pub const fn is_light(self) -> bool {
        (self.rank() + self.file()) % 2 == 0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (self.file() as u8 + b'a') as char,
            8 - self.rank()
        )
    }
}

impl FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file_ch), Some(rank_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(());
        };
        if !('a'..='h').contains(&file_ch) || !('1'..='8').contains(&rank_ch) {
            return Err(());
        }
        let file = file_ch as usize - 'a' as usize;
        let rank = 8 - (rank_ch as usize - '0' as usize);
        Ok(Square::new(rank, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_layout() {
        // a8 is index 0, h1 is index 63
        assert_eq!(Square::new(0, 0).index(), 0);
        assert_eq!(Square::new(7, 7).index(), 63);
        assert_eq!(Square::new(7, 4).to_string(), "e1");
        assert_eq!(Square::new(0, 4).to_string(), "e8");
    }

    #[test]
    fn test_square_from_str() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4.rank(), 4);
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.to_string(), "e4");

        assert!("i4".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }

    #[test]
    fn test_relative_rank() {
        let e2: Square = "e2".parse().unwrap();
        assert_eq!(e2.relative_rank(Color::White), 1);
        assert_eq!(e2.relative_rank(Color::Black), 6);

        let e7: Square = "e7".parse().unwrap();
        assert_eq!(e7.relative_rank(Color::Black), 1);
    }

    #[test]
    fn test_flip_vertical() {
        let a8 = Square::new(0, 0);
        assert_eq!(a8.flip_vertical().to_string(), "a1");
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4.flip_vertical().to_string(), "e5");
    }

    #[test]
    fn test_forward() {
        let e2: Square = "e2".parse().unwrap();
        assert_eq!(e2.forward(Color::White).unwrap().to_string(), "e3");
        assert_eq!(e2.forward(Color::Black).unwrap().to_string(), "e1");

        let e8: Square = "e8".parse().unwrap();
        assert!(e8.forward(Color::White).is_none());
        let e1: Square = "e1".parse().unwrap();
        assert!(e1.forward(Color::Black).is_none());
    }

    #[test]
    fn test_distance() {
        let a1: Square = "a1".parse().unwrap();
        let h8: Square = "h8".parse().unwrap();
        assert_eq!(a1.distance(h8), 7);
        assert_eq!(a1.distance(a1), 0);
        assert_eq!(a1.file_distance(h8), 7);
    }

    #[test]
    fn test_square_colour() {
        let a8: Square = "a8".parse().unwrap();
        let b8: Square = "b8".parse().unwrap();
        let a1: Square = "a1".parse().unwrap();
        assert!(a8.is_light());
        assert!(!b8.is_light());
        assert!(!a1.is_light());
    }
}
