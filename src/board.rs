use crate::bits::*;
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;
use thiserror::Error;

pub const BOARD_SIZE: usize = 64;
pub const BOARD_WIDTH: u8 = 8;

const BASE81_LENGTH: usize = 16;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("expected {expected} cells, found {found}")]
    Length { expected: usize, found: usize },
    #[error("invalid cell '{0}' at {1}")]
    Cell(char, Square),
    #[error("invalid side to move '{0}'")]
    Side(String),
    #[error("invalid square '{0}'")]
    Square(String),
    #[error("square {0} is occupied by both colors")]
    Overlap(Square),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// The token kind this player owns on the board.
    pub fn token(self) -> Token {
        match self {
            Player::Black => Token::Black,
            Player::White => Token::White,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token().to_char())
    }
}

impl FromStr for Player {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "black" => Ok(Player::Black),
            "o" | "white" => Ok(Player::White),
            _ => Err(BoardParseError::Side(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Token {
    Empty,
    Black,
    White,
}

impl Token {
    pub fn to_char(self) -> char {
        match self {
            Token::Empty => '.',
            Token::Black => 'X',
            Token::White => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Token> {
        match c {
            '.' | '-' => Some(Token::Empty),
            'X' | 'x' => Some(Token::Black),
            'O' | 'o' => Some(Token::White),
            _ => None,
        }
    }
}

/// Row of the board, labeled '1' to '8'.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Row(u8);

/// Column of the board, labeled 'A' to 'H'.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Column(u8);

impl Row {
    pub fn new(index: u8) -> Option<Row> {
        (index < BOARD_WIDTH).then_some(Row(index))
    }

    pub fn from_label(c: char) -> Option<Row> {
        let c = u8::try_from(c).ok()?;
        Row::new(c.checked_sub(b'1')?)
    }

    pub fn label(self) -> char {
        (b'1' + self.0) as char
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Row> {
        (0..BOARD_WIDTH).map(Row)
    }
}

impl Column {
    pub fn new(index: u8) -> Option<Column> {
        (index < BOARD_WIDTH).then_some(Column(index))
    }

    pub fn from_label(c: char) -> Option<Column> {
        let c = u8::try_from(c.to_ascii_uppercase()).ok()?;
        Column::new(c.checked_sub(b'A')?)
    }

    pub fn label(self) -> char {
        (b'A' + self.0) as char
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Column> {
        (0..BOARD_WIDTH).map(Column)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Square {
    pub row: Row,
    pub column: Column,
}

impl Square {
    pub fn new(row: Row, column: Column) -> Square {
        Square { row, column }
    }

    pub fn from_index(pos: usize) -> Option<Square> {
        if pos >= BOARD_SIZE {
            return None;
        }
        let width = BOARD_WIDTH as usize;
        Some(Square {
            row: Row((pos / width) as u8),
            column: Column((pos % width) as u8),
        })
    }

    pub fn index(self) -> usize {
        self.row.index() * BOARD_WIDTH as usize + self.column.index()
    }

    pub fn bit(self) -> u64 {
        1u64 << self.index()
    }

    /// Every square of the board exactly once, row by row from A1.
    pub fn all() -> impl Iterator<Item = Square> {
        Row::all().flat_map(|row| Column::all().map(move |column| Square::new(row, column)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column.label(), self.row.label())
    }
}

impl FromStr for Square {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(c), Some(r), None) => Column::from_label(c)
                .zip(Row::from_label(r))
                .map(|(column, row)| Square::new(row, column)),
            _ => None,
        };
        parsed.ok_or_else(|| BoardParseError::Square(s.to_string()))
    }
}

/// Read access to the token on each square of a position.
pub trait Grid {
    fn content(&self, square: Square) -> Token;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    pub fn empty_board() -> Board {
        Board { black: 0, white: 0 }
    }

    pub fn initial_state() -> Board {
        Board {
            black: 0x00_00_00_08_10_00_00_00,
            white: 0x00_00_00_10_08_00_00_00,
        }
    }

    pub fn from_bits(black: u64, white: u64) -> Result<Board, BoardParseError> {
        let both = black & white;
        if both != 0 {
            let pos = both.trailing_zeros() as usize;
            return Err(BoardParseError::Overlap(
                Square::from_index(pos).unwrap_or_default(),
            ));
        }
        Ok(Board { black, white })
    }

    pub fn bits(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn empty(&self) -> u64 {
        !(self.black | self.white)
    }

    pub fn with_token(&self, square: Square, token: Token) -> Board {
        let mask = !square.bit();
        let mut next = Board {
            black: self.black & mask,
            white: self.white & mask,
        };
        match token {
            Token::Black => next.black |= square.bit(),
            Token::White => next.white |= square.bit(),
            Token::Empty => (),
        }
        next
    }

    pub fn stone_count(&self, player: Player) -> u32 {
        popcnt(self.bits(player))
    }

    fn map_bits(&self, f: fn(u64) -> u64) -> Board {
        Board {
            black: f(self.black),
            white: f(self.white),
        }
    }

    pub fn flip_vertical(&self) -> Board {
        self.map_bits(flip_vertical)
    }

    pub fn flip_horizontal(&self) -> Board {
        self.map_bits(flip_horizontal)
    }

    pub fn flip_diag(&self) -> Board {
        self.map_bits(flip_diag)
    }

    pub fn rot90(&self) -> Board {
        self.map_bits(rot90)
    }

    /// Parses the 64-cell line format, optionally followed by the side to
    /// move and a `;` comment, e.g. `"---...XO-- X; comment"`.
    pub fn from_line(s: &str) -> Result<(Board, Option<Player>), BoardParseError> {
        let mut chars = s.chars();
        let mut board = Board::empty_board();
        for square in Square::all() {
            let c = chars.next().ok_or(BoardParseError::Length {
                expected: BOARD_SIZE,
                found: square.index(),
            })?;
            let token = Token::from_char(c).ok_or(BoardParseError::Cell(c, square))?;
            board = board.with_token(square, token);
        }
        let rest = chars.as_str();
        // the side to move must be separated from the cells
        if rest.starts_with(|c: char| !c.is_whitespace() && c != ';') {
            let extra = rest
                .chars()
                .take_while(|&c| !c.is_whitespace() && c != ';')
                .count();
            return Err(BoardParseError::Length {
                expected: BOARD_SIZE,
                found: BOARD_SIZE + extra,
            });
        }
        let side_str = rest.split(';').next().unwrap_or_default().trim();
        if side_str.is_empty() {
            return Ok((board, None));
        }
        Ok((board, Some(side_str.parse()?)))
    }

    pub fn to_line(&self) -> String {
        Square::all().map(|sq| self.content(sq).to_char()).collect()
    }

    pub fn from_base81(s: &str) -> Result<Board, BoardParseError> {
        let found = s.chars().count();
        if found != BASE81_LENGTH {
            return Err(BoardParseError::Length {
                expected: BASE81_LENGTH,
                found,
            });
        }
        let mut black = 0u64;
        let mut white = 0u64;
        for (i, c) in s.chars().enumerate() {
            let first = Square::from_index(i * 4).unwrap_or_default();
            let code = u32::from(c);
            if !(33..=123).contains(&code) {
                return Err(BoardParseError::Cell(c, first));
            }
            let ofs = code - 33;
            let digits = [ofs % 32 % 9 % 3, ofs % 32 % 9 / 3, ofs % 32 / 9, ofs / 32];
            for (j, d) in digits.iter().enumerate() {
                match d {
                    0 => (),
                    1 => black |= 1u64 << (i * 4 + j),
                    2 => white |= 1u64 << (i * 4 + j),
                    _ => return Err(BoardParseError::Cell(c, first)),
                }
            }
        }
        Board::from_bits(black, white)
    }

    pub fn to_base81(&self) -> String {
        const COEFF: [u32; 4] = [1, 3, 9, 32];
        (0..BASE81_LENGTH)
            .map(|i| {
                let b = (self.black >> (i * 4)) & 0xf;
                let w = (self.white >> (i * 4)) & 0xf;
                let code = COEFF.iter().enumerate().fold(33, |acc, (j, &c)| {
                    acc + c * ((b >> j) & 1) as u32 + 2 * c * ((w >> j) & 1) as u32
                });
                char::from_u32(code).unwrap_or('!')
            })
            .collect()
    }

    pub fn print_with_sides<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, " |")?;
        for column in Column::all() {
            write!(writer, "{}", column.label().to_ascii_lowercase())?;
        }
        writeln!(writer, "\n-+--------")?;
        for row in Row::all() {
            write!(writer, "{}|", row.label())?;
            for column in Column::all() {
                write!(writer, "{}", self.content(Square::new(row, column)).to_char())?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::new(Row(0), Column(0))
    }
}

impl Grid for Board {
    fn content(&self, square: Square) -> Token {
        let bit = square.bit();
        if self.black & bit != 0 {
            Token::Black
        } else if self.white & bit != 0 {
            Token::White
        } else {
            Token::Empty
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in Square::all() {
            write!(f, "{}", self.content(square).to_char())?;
            if square.column.index() == BOARD_WIDTH as usize - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Parses a base81 (16 chars) or line-format board and writes it with
/// labels, stone counts, side to move and base81 encoding.
pub fn describe_board<W: Write>(s: &str, writer: &mut W) -> Result<()> {
    let s = s.trim();
    let (board, side) = if s.chars().count() == BASE81_LENGTH {
        (Board::from_base81(s)?, None)
    } else {
        Board::from_line(s)?
    };
    board.print_with_sides(writer)?;
    writeln!(
        writer,
        "black: {}, white: {}, empty: {}",
        board.stone_count(Player::Black),
        board.stone_count(Player::White),
        popcnt(board.empty())
    )?;
    if let Some(side) = side {
        writeln!(writer, "side to move: {}", side)?;
    }
    writeln!(writer, "base81: {}", board.to_base81())?;
    Ok(())
}

pub fn parse_board(matches: &ArgMatches) -> Result<()> {
    let s = matches
        .get_one::<String>("str")
        .context("board string is required")?;
    let mut writer = BufWriter::new(io::stdout().lock());
    describe_board(s, &mut writer)?;
    writer.flush()?;
    Ok(())
}
