//! Braille cells and dot patterns
//!
//! A six dot braille cell is stored as a [`Code`], a 6-bit pattern where bit `i` is set when dot
//! `i + 1` is raised. Codes map one to one onto the first 64 characters of the Unicode braille
//! patterns block, which is what the editor renders as glyphs.

use std::fmt;

use enumset::{EnumSet, EnumSetType};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BrailleError {
    #[error("Invalid braille code {0:#04x}")]
    InvalidCode(u32),
    #[error("Invalid dot number {0}")]
    InvalidDot(u8),
    #[error("Invalid braille {character:?}")]
    InvalidBraille { character: Option<char> },
}

/// Start of the Unicode braille patterns block
const UNICODE_PLANE: u32 = 0x2800;

#[derive(EnumSetType, Debug)]
pub enum BrailleDot {
    Dot1,
    Dot2,
    Dot3,
    Dot4,
    Dot5,
    Dot6,
}

impl BrailleDot {
    pub fn from_number(number: u8) -> Result<Self, BrailleError> {
        match number {
            1 => Ok(BrailleDot::Dot1),
            2 => Ok(BrailleDot::Dot2),
            3 => Ok(BrailleDot::Dot3),
            4 => Ok(BrailleDot::Dot4),
            5 => Ok(BrailleDot::Dot5),
            6 => Ok(BrailleDot::Dot6),
            invalid => Err(BrailleError::InvalidDot(invalid)),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            BrailleDot::Dot1 => 1,
            BrailleDot::Dot2 => 2,
            BrailleDot::Dot3 => 3,
            BrailleDot::Dot4 => 4,
            BrailleDot::Dot5 => 5,
            BrailleDot::Dot6 => 6,
        }
    }

    fn bit(self) -> u8 {
        1 << (self.number() - 1)
    }
}

/// A set of raised dots, e.g. the chord currently held down by the writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DotSet(EnumSet<BrailleDot>);

impl DotSet {
    pub fn new() -> Self {
        DotSet(EnumSet::new())
    }

    /// Returns `true` if the dot was not raised before
    pub fn insert(&mut self, dot: BrailleDot) -> bool {
        self.0.insert(dot)
    }

    /// Returns `true` if the dot was raised before
    pub fn remove(&mut self, dot: BrailleDot) -> bool {
        self.0.remove(dot)
    }

    pub fn contains(&self, dot: BrailleDot) -> bool {
        self.0.contains(dot)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The raised dot numbers in ascending order
    pub fn numbers(&self) -> Vec<u8> {
        self.0.iter().map(BrailleDot::number).collect()
    }

    pub fn code(&self) -> Code {
        Code(self.0.iter().fold(0, |acc, dot| acc | dot.bit()))
    }
}

impl FromIterator<BrailleDot> for DotSet {
    fn from_iter<T: IntoIterator<Item = BrailleDot>>(iter: T) -> Self {
        DotSet(EnumSet::from_iter(iter))
    }
}

/// A single braille cell as a 6-bit dot pattern in `0..=63`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(u8);

impl Code {
    /// The empty cell, i.e. a space
    pub const SPACE: Code = Code(0);
    pub const MAX: u8 = 0x3f;

    /// Create a code, rejecting anything outside `0..=63`
    pub fn new(value: u32) -> Result<Self, BrailleError> {
        if value <= u32::from(Self::MAX) {
            Ok(Code(value as u8))
        } else {
            Err(BrailleError::InvalidCode(value))
        }
    }

    /// Constructor for the static tables, evaluated at compile time
    pub(crate) const fn lit(bits: u8) -> Self {
        assert!(bits <= Self::MAX, "braille code out of range");
        Code(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_space(self) -> bool {
        self.0 == 0
    }

    pub fn dots(self) -> DotSet {
        [
            BrailleDot::Dot1,
            BrailleDot::Dot2,
            BrailleDot::Dot3,
            BrailleDot::Dot4,
            BrailleDot::Dot5,
            BrailleDot::Dot6,
        ]
        .into_iter()
        .filter(|dot| self.0 & dot.bit() != 0)
        .collect()
    }

    pub fn to_glyph(self) -> char {
        // every code in 0..=63 lands inside the braille patterns block
        char::from_u32(UNICODE_PLANE + u32::from(self.0)).unwrap_or('\u{2800}')
    }

    pub fn from_glyph(glyph: char) -> Result<Self, BrailleError> {
        let value = u32::from(glyph);
        match value.checked_sub(UNICODE_PLANE) {
            Some(offset) => Code::new(offset),
            None => Err(BrailleError::InvalidCode(value)),
        }
    }
}

impl TryFrom<u32> for Code {
    type Error = BrailleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Code::new(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_glyph())
    }
}

/// Render a run of cells as braille glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cells<'a>(pub &'a [Code]);

impl fmt::Display for Cells<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|c| c.to_glyph()).collect::<String>()
        )
    }
}

/// OR together `1 << (d - 1)` for every dot. Order and duplicates do not matter.
pub fn dots_to_code(dots: impl IntoIterator<Item = u8>) -> Result<Code, BrailleError> {
    let dots = dots
        .into_iter()
        .map(BrailleDot::from_number)
        .collect::<Result<DotSet, _>>()?;
    Ok(dots.code())
}

/// The raised dots of `code` in ascending order
pub fn code_to_dots(code: Code) -> Vec<u8> {
    code.dots().numbers()
}

pub fn code_to_glyph(code: Code) -> char {
    code.to_glyph()
}

fn char_to_dot(c: char) -> Result<Option<BrailleDot>, BrailleError> {
    match c {
        // dot 0 stands for the blank cell
        '0' => Ok(None),
        '1'..='6' => BrailleDot::from_number(c as u8 - b'0').map(Some),
        invalid => Err(BrailleError::InvalidBraille {
            character: Some(invalid),
        }),
    }
}

/// Parse a single cell in dot notation, e.g. `"145"`
pub fn chars_to_code(chars: &str) -> Result<Code, BrailleError> {
    if chars.is_empty() {
        return Err(BrailleError::InvalidBraille { character: None });
    }
    let mut dots = DotSet::new();
    for c in chars.chars() {
        if let Some(dot) = char_to_dot(c)? {
            dots.insert(dot);
        }
    }
    Ok(dots.code())
}

/// Parse a run of cells in dot notation separated by `-`, e.g. `"1-12-0-14"`
pub fn braille_cells(chars: &str) -> Result<Vec<Code>, BrailleError> {
    chars.split('-').map(chars_to_code).collect()
}

/// Parse either Unicode braille glyphs or dot notation
pub fn parse_cells(input: &str) -> Result<Vec<Code>, BrailleError> {
    if input
        .chars()
        .all(|c| (UNICODE_PLANE..=UNICODE_PLANE + u32::from(Code::MAX)).contains(&u32::from(c)))
    {
        input.chars().map(Code::from_glyph).collect()
    } else {
        braille_cells(input)
    }
}
