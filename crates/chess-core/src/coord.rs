//! Board coordinate representation.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D integer coordinate on (or off) the board.
///
/// `x` is the file and `y` the rank, both 0-indexed, so `Coord::new(4, 3)`
/// is e4 on a standard board. Coordinates are plain values: arithmetic never
/// fails and may produce squares outside any board, which is how ray walks
/// detect the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Component-wise sum.
    #[inline]
    pub const fn add(self, other: Coord) -> Coord {
        Coord::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    #[inline]
    pub const fn subtract(self, other: Coord) -> Coord {
        Coord::new(self.x - other.x, self.y - other.y)
    }

    /// Scales both components.
    #[inline]
    pub const fn multiply(self, scalar: i32) -> Coord {
        Coord::new(self.x * scalar, self.y * scalar)
    }

    /// Parses algebraic notation (e.g. "e4", "b10").
    ///
    /// Files run from 'a' to 'z', ranks start at 1. Returns `None` for
    /// anything else.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return None;
        }
        let digits = chars.as_str();
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let rank: i32 = digits.parse().ok()?;
        if rank < 1 {
            return None;
        }
        Some(Coord::new((file as u8 - b'a') as i32, rank - 1))
    }

    /// Returns the algebraic notation, if the coordinate has one.
    pub fn to_algebraic(self) -> Option<String> {
        if !(0..26).contains(&self.x) || self.y < 0 {
            return None;
        }
        let file = (b'a' + self.x as u8) as char;
        let rank = self.y.checked_add(1)?;
        Some(format!("{}{}", file, rank))
    }
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        Coord::add(self, rhs)
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Coord {
        self.subtract(rhs)
    }
}

impl Neg for Coord {
    type Output = Coord;

    #[inline]
    fn neg(self) -> Coord {
        self.multiply(-1)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    #[inline]
    fn mul(self, rhs: i32) -> Coord {
        self.multiply(rhs)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_algebraic() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}
