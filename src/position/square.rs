use std::fmt;

use super::Direction;

/// A location on the board, in a game of any size up to 8.
///
/// `file` 0 is the a-file, `rank` 0 is rank 1. A square knows nothing about
/// the board it belongs to; operations that depend on the board's extent take
/// `size` explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn parse_square(input: &str, size: usize) -> Result<Square, pgn_traits::Error> {
        if input.len() != 2 {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse square \"{}\"",
                input
            )));
        }
        let mut chars = input.chars();
        let file = (chars.next().unwrap() as u8).overflowing_sub(b'a').0;
        let rank = (chars.next().unwrap() as u8).overflowing_sub(b'1').0;
        if file as usize >= size || rank as usize >= size {
            Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse square \"{}\" at size {}",
                input, size
            )))
        } else {
            Ok(Square { file, rank })
        }
    }

    pub fn go_direction(self, direction: Direction, size: usize) -> Option<Square> {
        match direction {
            Direction::North => {
                if (self.rank as usize) + 1 < size {
                    Some(Square::from_file_rank(self.file, self.rank + 1))
                } else {
                    None
                }
            }
            Direction::South => self
                .rank
                .checked_sub(1)
                .map(|rank| Square::from_file_rank(self.file, rank)),
            Direction::East => {
                if (self.file as usize) + 1 < size {
                    Some(Square::from_file_rank(self.file + 1, self.rank))
                } else {
                    None
                }
            }
            Direction::West => self
                .file
                .checked_sub(1)
                .map(|file| Square::from_file_rank(file, self.rank)),
        }
    }

    /// The image of this square under a single 90° board rotation.
    pub fn rotated(self, size: usize) -> Square {
        Square {
            file: size as u8 - 1 - self.rank,
            rank: self.file,
        }
    }

    /// The image of this square under the top-bottom board reflection.
    pub fn mirrored(self, size: usize) -> Square {
        Square {
            file: self.file,
            rank: size as u8 - 1 - self.rank,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (self.file + b'a') as char)?;
        write!(f, "{}", self.rank + 1)
    }
}
