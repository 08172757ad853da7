use std::cmp::Ordering;
use std::fmt;

use arrayvec::ArrayVec;

use super::Square;

/// One of the 3 piece roles in Tak.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Flat,
    Wall,
    Cap,
}

/// A movement direction on the rank/file grid, written `+`, `-`, `<` or `>`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    North,
    West,
    East,
    South,
}

impl Direction {
    pub fn parse(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Direction::North),
            '<' => Some(Direction::West),
            '>' => Some(Direction::East),
            '-' => Some(Direction::South),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::North => '+',
            Direction::West => '<',
            Direction::East => '>',
            Direction::South => '-',
        }
    }

    /// The image of this direction under a single 90° board rotation.
    pub fn rotated(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// The image of this direction under the top-bottom board reflection.
    pub fn mirrored(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            other => other,
        }
    }
}

/// How many pieces a spread leaves on each square it steps over.
pub type DropCounts = ArrayVec<u8, 8>;

/// A move in PTN notation: a placement, or a spread distributing a substack.
///
/// Only the grammar is checked; whether the move is legal on any particular
/// board is the sender's problem.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Move {
    Place(Role, Square),
    Spread(u8, Square, Direction, DropCounts),
}

impl Move {
    pub fn origin_square(&self) -> Square {
        match self {
            Move::Place(_, square) => *square,
            Move::Spread(_, square, _, _) => *square,
        }
    }

    pub fn from_string(input: &str, size: usize) -> Result<Self, pgn_traits::Error> {
        if input.len() < 2 {
            return Err(pgn_traits::Error::new_parse_error(
                "Input move too short.".to_string(),
            ));
        }
        if !input.is_ascii() {
            return Err(pgn_traits::Error::new_parse_error(
                "Input move contained non-ascii characters.".to_string(),
            ));
        }
        let first_char = input.chars().next().unwrap();
        match first_char {
            'a'..='h' if input.len() == 2 => {
                let square = Square::parse_square(input, size)?;
                Ok(Move::Place(Role::Flat, square))
            }
            'a'..='h' if input.len() == 3 => {
                let square = Square::parse_square(&input[0..2], size)?;
                let direction = Direction::parse(input.chars().nth(2).unwrap())
                    .ok_or_else(|| pgn_traits::Error::new_parse_error("Bad direction"))?;
                // The short spread form always moves one piece
                let mut drops = DropCounts::new();
                drops.push(1);
                Ok(Move::Spread(1, square, direction, drops))
            }
            'C' if input.len() == 3 => Ok(Move::Place(
                Role::Cap,
                Square::parse_square(&input[1..], size)?,
            )),
            'S' if input.len() == 3 => Ok(Move::Place(
                Role::Wall,
                Square::parse_square(&input[1..], size)?,
            )),
            '1'..='8' if input.len() >= 4 && input.len() <= 12 => {
                let pieces_taken = first_char.to_digit(10).unwrap() as u8;
                if pieces_taken as usize > size {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "{} too large for {}s",
                        input, size
                    )));
                }
                let square = Square::parse_square(&input[1..3], size)?;
                let direction = Direction::parse(input.chars().nth(3).unwrap())
                    .ok_or_else(|| pgn_traits::Error::new_parse_error("Bad direction"))?;

                let mut drops: DropCounts = input
                    .chars()
                    .skip(4)
                    .map(|ch| ch.to_digit(10).map(|i| i as u8))
                    .collect::<Option<DropCounts>>()
                    .ok_or_else(|| {
                        pgn_traits::Error::new_parse_error(format!(
                            "Couldn't parse move \"{}\": found non-integer when expecting number of pieces to drop",
                            input
                        ))
                    })?;
                if drops.is_empty() {
                    drops.push(pieces_taken);
                }
                if drops.iter().any(|drop| *drop == 0)
                    || drops.iter().map(|drop| *drop as u32).sum::<u32>() != pieces_taken as u32
                {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "Couldn't parse move \"{}\": drop counts don't add up to {}",
                        input, pieces_taken
                    )));
                }
                Ok(Move::Spread(pieces_taken, square, direction, drops))
            }
            _ => Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse move \"{}\". Moves cannot start with {} and have length {}.",
                input,
                first_char,
                input.len()
            ))),
        }
    }

    /// Parses playtak server notation, `P A1 [C|W]` or `M A1 A3 <drops...>`.
    pub fn from_playtak(input: &str, size: usize) -> Result<Self, pgn_traits::Error> {
        let words: Vec<&str> = input.split_whitespace().collect();
        match words.first() {
            Some(&"P") if words.len() >= 2 => {
                let square = Square::parse_square(&words[1].to_lowercase(), size)?;
                let role = match words.get(2) {
                    Some(&"C") => Role::Cap,
                    Some(&"W") => Role::Wall,
                    None => Role::Flat,
                    Some(s) => {
                        return Err(pgn_traits::Error::new_parse_error(format!(
                            "Unknown role {} in playtak move \"{}\"",
                            s, input
                        )))
                    }
                };
                Ok(Move::Place(role, square))
            }
            Some(&"M") if words.len() >= 4 => {
                let start_square = Square::parse_square(&words[1].to_lowercase(), size)?;
                let end_square = Square::parse_square(&words[2].to_lowercase(), size)?;

                let mut drops = DropCounts::new();
                for word in &words[3..] {
                    let drop = word.parse::<u8>().map_err(|_| {
                        pgn_traits::Error::new_parse_error(format!(
                            "Bad drop count {} in playtak move \"{}\"",
                            word, input
                        ))
                    })?;
                    drops.try_push(drop).map_err(|_| {
                        pgn_traits::Error::new_parse_error(format!(
                            "Too many drop counts in playtak move \"{}\"",
                            input
                        ))
                    })?;
                }
                let pieces_taken: u8 = drops.iter().sum();
                if pieces_taken as usize > size || drops.iter().any(|drop| *drop == 0) {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "Bad drop counts in playtak move \"{}\"",
                        input
                    )));
                }

                let direction = match (
                    start_square.rank().cmp(&end_square.rank()),
                    start_square.file().cmp(&end_square.file()),
                ) {
                    (Ordering::Equal, Ordering::Less) => Direction::East,
                    (Ordering::Equal, Ordering::Greater) => Direction::West,
                    (Ordering::Less, Ordering::Equal) => Direction::North,
                    (Ordering::Greater, Ordering::Equal) => Direction::South,
                    _ => {
                        return Err(pgn_traits::Error::new_parse_error(format!(
                            "Diagonal playtak move \"{}\"",
                            input
                        )))
                    }
                };

                Ok(Move::Spread(pieces_taken, start_square, direction, drops))
            }
            _ => Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse playtak move \"{}\"",
                input
            ))),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(Role::Flat, square) => write!(f, "{}", square),
            Move::Place(Role::Wall, square) => write!(f, "S{}", square),
            Move::Place(Role::Cap, square) => write!(f, "C{}", square),
            Move::Spread(pieces_taken, square, direction, drops) => {
                if *pieces_taken != 1 {
                    write!(f, "{}", pieces_taken)?;
                }
                write!(f, "{}{}", square, direction.glyph())?;
                // Omit the drop counts if all pieces are dropped immediately
                if drops.len() > 1 {
                    for drop in drops {
                        write!(f, "{}", drop)?;
                    }
                }
                Ok(())
            }
        }
    }
}
