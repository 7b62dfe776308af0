//! Contracted UEB tables
//!
//! Whole-word, lower and part-word contractions are single cells. Initial-letter contractions are
//! a dot 5 prefix followed by the first letter of the word, final-letter contractions a dots 46 or
//! dots 56 prefix followed by the last letter of the word ending.

use crate::braille::Code;
use crate::mode::{Contraction, ContractionClass, Position};

pub const INITIAL_LETTER_PREFIX: Code = Code::lit(0x10);
pub const FINAL_LETTER_PREFIXES: [Code; 2] = [Code::lit(0x28), Code::lit(0x30)];

pub const WHOLE_WORD: [(u8, &str); 22] = [
    (0x2f, "and"),
    (0x3f, "for"),
    (0x37, "of"),
    (0x2e, "the"),
    (0x3e, "with"),
    (0x13, "have"),
    (0x06, "be"),
    (0x09, "can"),
    (0x0b, "from"),
    (0x1d, "not"),
    (0x36, "were"),
    (0x3a, "will"),
    (0x3d, "you"),
    (0x22, "enough"),
    (0x26, "his"),
    (0x14, "in"),
    (0x34, "was"),
    (0x21, "child"),
    (0x29, "shall"),
    (0x31, "which"),
    (0x33, "out"),
    (0x0c, "still"),
];

pub const LOWER: [(u8, &str); 5] = [
    (0x06, "be"),
    (0x12, "con"),
    (0x32, "dis"),
    (0x22, "en"),
    (0x14, "in"),
];

pub const PART_WORD: [(u8, &str); 11] = [
    (0x21, "ch"),
    (0x23, "gh"),
    (0x29, "sh"),
    (0x39, "th"),
    (0x31, "wh"),
    (0x2b, "ed"),
    (0x3b, "er"),
    (0x33, "ou"),
    (0x2a, "ow"),
    (0x0c, "st"),
    (0x2c, "ing"),
];

/// Second cell after [`INITIAL_LETTER_PREFIX`]
pub const INITIAL_LETTER: [(u8, &str); 10] = [
    (0x19, "day"),
    (0x05, "know"),
    (0x1d, "name"),
    (0x0f, "part"),
    (0x1e, "time"),
    (0x0b, "father"),
    (0x0d, "mother"),
    (0x07, "lord"),
    (0x15, "one"),
    (0x25, "under"),
];

pub const FINAL_LETTER: [([u8; 2], &str); 8] = [
    ([0x28, 0x11], "ance"),
    ([0x30, 0x11], "ence"),
    ([0x30, 0x07], "ful"),
    ([0x30, 0x0e], "ness"),
    ([0x30, 0x3d], "ity"),
    ([0x30, 0x1e], "ment"),
    ([0x30, 0x1d], "tion"),
    ([0x28, 0x1d], "sion"),
];

fn entry(codes: &[u8], text: &'static str, class: ContractionClass, position: Position) -> Contraction {
    Contraction {
        codes: codes.iter().map(|&bits| Code::lit(bits)).collect(),
        text,
        class,
        position,
    }
}

/// Every contraction of the grade, grouped by class
pub fn contractions() -> Vec<Contraction> {
    let whole = WHOLE_WORD
        .iter()
        .map(|&(code, text)| entry(&[code], text, ContractionClass::WholeWord, Position::Standalone));
    let lower = LOWER
        .iter()
        .map(|&(code, text)| entry(&[code], text, ContractionClass::Lower, Position::Start));
    let part = PART_WORD
        .iter()
        .map(|&(code, text)| entry(&[code], text, ContractionClass::PartWord, Position::Middle));
    let initial = INITIAL_LETTER.iter().map(|&(code, text)| {
        entry(
            &[INITIAL_LETTER_PREFIX.bits(), code],
            text,
            ContractionClass::InitialLetter,
            Position::Start,
        )
    });
    let fin = FINAL_LETTER
        .iter()
        .map(|(codes, text)| entry(codes, text, ContractionClass::FinalLetter, Position::End));
    whole.chain(lower).chain(part).chain(initial).chain(fin).collect()
}
