//! Attacked-square detection for the side not to move.
//!
//! Attacks are pseudo-attacks: a square is attacked if an opposing piece's
//! movement pattern reaches it, regardless of whose turn it is and without
//! asking whether that piece's own king would be exposed. This keeps king
//! filtering in [`RuleBook`](crate::RuleBook) from recursing.

use std::collections::HashSet;

use chess_core::{Color, Coord, Piece};
use tracing::warn;

use crate::{Board, RuleError};

/// One line of attack: the attacking piece and the squares it reaches, in
/// order, up to and including the first occupied square.
///
/// Knights, kings and pawns produce single-square rays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRay {
    attacker: (Piece, Color),
    origin: Coord,
    squares: Vec<Coord>,
}

impl AttackRay {
    /// The attacking piece and its color.
    #[inline]
    pub fn attacker(&self) -> (Piece, Color) {
        self.attacker
    }

    /// The square the attacker stands on.
    #[inline]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Traversed squares, nearest first.
    #[inline]
    pub fn squares(&self) -> &[Coord] {
        &self.squares
    }

    /// Returns true if the ray reaches `coord`.
    pub fn contains(&self, coord: Coord) -> bool {
        self.squares.contains(&coord)
    }

    /// The occupied square that ended the ray, if it ended on a piece rather
    /// than at the board edge.
    pub fn blocker(&self, board: &Board) -> Option<Coord> {
        self.squares
            .last()
            .copied()
            .filter(|&last| board.has_piece_at(last))
    }

    /// The unit step of the ray.
    pub fn direction(&self) -> Option<Coord> {
        self.squares.first().map(|&first| first - self.origin)
    }
}

/// Answers "is this square attacked by the opponent of the side to move?".
///
/// Holds only a reference to the board; every query walks the current
/// position afresh.
#[derive(Debug, Clone, Copy)]
pub struct AttackTracker<'a> {
    board: &'a Board,
}

impl<'a> AttackTracker<'a> {
    pub fn new(board: &'a Board) -> Self {
        AttackTracker { board }
    }

    /// The color whose pieces generate attacks.
    #[inline]
    pub fn attacking_color(&self) -> Color {
        self.board.side_to_move().opposite()
    }

    /// Returns true if any opposing piece pseudo-attacks `coord`.
    pub fn is_attacked(&self, coord: Coord) -> bool {
        let them = self.attacking_color();
        self.board
            .pieces()
            .filter(|&(_, _, color)| color == them)
            .any(|(origin, piece, color)| {
                rays_from(self.board, origin, piece, color)
                    .iter()
                    .any(|ray| ray.contains(coord))
            })
    }

    /// Every opposing attack ray.
    pub fn attack_rays(&self) -> Vec<AttackRay> {
        let them = self.attacking_color();
        self.board
            .pieces()
            .filter(|&(_, _, color)| color == them)
            .flat_map(|(origin, piece, color)| rays_from(self.board, origin, piece, color))
            .collect()
    }

    /// The union of all squares the opponent attacks.
    pub fn attacked_squares(&self) -> HashSet<Coord> {
        self.attack_rays()
            .into_iter()
            .flat_map(|ray| ray.squares)
            .collect()
    }

    /// Locates the king of the side to move.
    ///
    /// # Errors
    ///
    /// [`RuleError::MissingKing`] if that king is not on the board.
    pub fn allied_king_coord(&self) -> Result<Coord, RuleError> {
        let us = self.board.side_to_move();
        self.board.king_coord(us).ok_or_else(|| {
            warn!(color = %us, "no king for the side to move");
            RuleError::MissingKing(us)
        })
    }

    /// Allied pieces pinned against their own king.
    ///
    /// A piece is pinned when it is the first thing an opposing slider's ray
    /// runs into and the line continues, past empty squares only, onto the
    /// allied king.
    pub fn pinned_pieces(&self) -> Result<HashSet<Coord>, RuleError> {
        let king = self.allied_king_coord()?;
        let mut pinned = HashSet::new();

        for ray in self.attack_rays() {
            if !ray.attacker().0.can_move_in_line() {
                continue;
            }
            let (Some(blocker), Some(step)) = (ray.blocker(self.board), ray.direction()) else {
                continue;
            };
            if !self.board.is_allied_piece(blocker) || blocker == king {
                continue;
            }

            let mut next = blocker + step;
            while self.board.coord_in_board(next) && !self.board.has_piece_at(next) {
                next = next + step;
            }
            if next == king {
                pinned.insert(blocker);
            }
        }

        Ok(pinned)
    }
}

/// Builds the attack rays of a single piece.
fn rays_from(board: &Board, origin: Coord, piece: Piece, color: Color) -> Vec<AttackRay> {
    let attacker = (piece, color);
    let single = |square: Coord| AttackRay {
        attacker,
        origin,
        squares: vec![square],
    };

    match piece {
        // Pawns attack only diagonally forward; their pushes never capture.
        Piece::Pawn => {
            let forward = Coord::new(0, color.pawn_direction());
            [Coord::new(1, 0), Coord::new(-1, 0)]
                .into_iter()
                .map(|side| origin + forward + side)
                .filter(|&square| board.coord_in_board(square))
                .map(single)
                .collect()
        }
        Piece::Knight | Piece::King => piece
            .move_directions(color)
            .iter()
            .map(|&step| origin + step)
            .filter(|&square| board.coord_in_board(square))
            .map(single)
            .collect(),
        Piece::Bishop | Piece::Rook | Piece::Queen => piece
            .move_directions(color)
            .iter()
            .filter_map(|&step| {
                let mut squares = Vec::new();
                let mut square = origin + step;
                while board.coord_in_board(square) {
                    squares.push(square);
                    if board.has_piece_at(square) {
                        break;
                    }
                    square = square + step;
                }
                (!squares.is_empty()).then_some(AttackRay {
                    attacker,
                    origin,
                    squares,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Coord {
        Coord::from_algebraic(name).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn rook_attacks_until_first_blocker() {
        // White to move, black rook on d4, white pawn on d6.
        let b = board("7k/8/3P4/8/3r4/8/8/4K3 w");
        let tracker = AttackTracker::new(&b);
        assert!(tracker.is_attacked(sq("d5")));
        assert!(tracker.is_attacked(sq("d6")));
        assert!(!tracker.is_attacked(sq("d7")));
        assert!(tracker.is_attacked(sq("a4")));
        assert!(tracker.is_attacked(sq("h4")));
        assert!(tracker.is_attacked(sq("d1")));
    }

    #[test]
    fn defended_pieces_count_as_attacked() {
        // Black knight on c6 is covered by the black rook on c8.
        let b = board("2r1k3/8/2n5/8/8/8/8/4K3 w");
        assert!(AttackTracker::new(&b).is_attacked(sq("c6")));
    }

    #[test]
    fn pawn_attacks_only_diagonals() {
        let b = board("4k3/8/8/3p4/8/8/8/4K3 w");
        let tracker = AttackTracker::new(&b);
        assert!(tracker.is_attacked(sq("c4")));
        assert!(tracker.is_attacked(sq("e4")));
        assert!(!tracker.is_attacked(sq("d4")));
        assert!(!tracker.is_attacked(sq("d3")));
    }

    #[test]
    fn pawn_on_edge_file_attacks_one_square() {
        let b = board("4k3/8/8/p7/8/8/8/4K3 w");
        let rays = AttackTracker::new(&b).attack_rays();
        let pawn_rays: Vec<_> = rays
            .iter()
            .filter(|r| r.attacker().0 == Piece::Pawn)
            .collect();
        assert_eq!(pawn_rays.len(), 1);
        assert_eq!(pawn_rays[0].squares(), &[sq("b4")]);
    }

    #[test]
    fn knight_and_king_attacks() {
        let b = board("8/8/8/8/4n3/8/8/k6K w");
        let tracker = AttackTracker::new(&b);
        for name in ["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"] {
            assert!(tracker.is_attacked(sq(name)), "{} should be attacked", name);
        }
        assert!(tracker.is_attacked(sq("b2")));
        assert!(tracker.is_attacked(sq("a2")));
        assert!(!tracker.is_attacked(sq("e5")));
    }

    #[test]
    fn own_pieces_never_attack() {
        let b = board("4k3/8/8/8/3Q4/8/8/4K3 w");
        let tracker = AttackTracker::new(&b);
        assert!(!tracker.is_attacked(sq("d5")));
        assert!(!tracker.is_attacked(sq("a1")));
    }

    #[test]
    fn attacking_color_flips_with_turn() {
        let mut b = board("4k3/8/8/8/3Q4/8/8/4K3 w");
        b.set_side_to_move(Color::Black);
        let tracker = AttackTracker::new(&b);
        assert_eq!(tracker.attacking_color(), Color::White);
        assert!(tracker.is_attacked(sq("d8")));
    }

    #[test]
    fn attacked_squares_union() {
        let b = board("8/8/8/8/8/8/8/R7 b");
        let squares = AttackTracker::new(&b).attacked_squares();
        assert_eq!(squares.len(), 14);
        assert!(!squares.contains(&sq("a1")));
    }

    #[test]
    fn ray_blocker_and_direction() {
        let b = board("4k3/8/8/8/8/8/8/r3K3 w");
        let rays = AttackTracker::new(&b).attack_rays();
        let east = rays
            .iter()
            .find(|r| r.attacker().0 == Piece::Rook && r.direction() == Some(Coord::new(1, 0)))
            .unwrap();
        assert_eq!(east.origin(), sq("a1"));
        assert_eq!(east.squares(), &[sq("b1"), sq("c1"), sq("d1"), sq("e1")]);
        assert_eq!(east.blocker(&b), Some(sq("e1")));

        let north = rays
            .iter()
            .find(|r| r.attacker().0 == Piece::Rook && r.direction() == Some(Coord::new(0, 1)))
            .unwrap();
        assert_eq!(north.squares().len(), 7);
        assert_eq!(north.blocker(&b), None);
    }

    #[test]
    fn allied_king_coord() {
        let b = board("4k3/8/8/8/8/8/8/4K3 b");
        assert_eq!(AttackTracker::new(&b).allied_king_coord(), Ok(sq("e8")));

        let b = board("4k3/8/8/8/8/8/8/8 w");
        assert_eq!(
            AttackTracker::new(&b).allied_king_coord(),
            Err(RuleError::MissingKing(Color::White))
        );
    }

    #[test]
    fn pinned_pieces() {
        // Bishop on e2 is pinned by the rook on e8; knight on c3 by the
        // bishop on a5; the knight on f1 sits beside the king and is free.
        let b = board("4r2k/8/8/b7/8/2N5/4B3/4KN2 w");
        let pinned = AttackTracker::new(&b).pinned_pieces().unwrap();
        let expected: HashSet<_> = [sq("e2"), sq("c3")].into_iter().collect();
        assert_eq!(pinned, expected);
    }

    #[test]
    fn no_pin_with_two_blockers() {
        let b = board("4r2k/8/8/8/4P3/8/4B3/4K3 w");
        assert!(AttackTracker::new(&b).pinned_pieces().unwrap().is_empty());
    }
}
