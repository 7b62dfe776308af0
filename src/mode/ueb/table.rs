//! Uncontracted UEB tables: letters, punctuation, digits and indicators

use std::collections::BTreeMap;

use crate::braille::Code;
use crate::mode::{Indicator, IndicatorAction, IndicatorKind};

use super::{CAPITAL_SIGN, LETTER_SIGN, NUMBER_SIGN};

pub const LETTERS: [(char, Code); 26] = [
    ('a', Code::lit(0x01)),
    ('b', Code::lit(0x03)),
    ('c', Code::lit(0x09)),
    ('d', Code::lit(0x19)),
    ('e', Code::lit(0x11)),
    ('f', Code::lit(0x0b)),
    ('g', Code::lit(0x1b)),
    ('h', Code::lit(0x13)),
    ('i', Code::lit(0x0a)),
    ('j', Code::lit(0x1a)),
    ('k', Code::lit(0x05)),
    ('l', Code::lit(0x07)),
    ('m', Code::lit(0x0d)),
    ('n', Code::lit(0x1d)),
    ('o', Code::lit(0x15)),
    ('p', Code::lit(0x0f)),
    ('q', Code::lit(0x1f)),
    ('r', Code::lit(0x17)),
    ('s', Code::lit(0x0e)),
    ('t', Code::lit(0x1e)),
    ('u', Code::lit(0x25)),
    ('v', Code::lit(0x27)),
    ('w', Code::lit(0x3a)),
    ('x', Code::lit(0x2d)),
    ('y', Code::lit(0x3d)),
    ('z', Code::lit(0x35)),
];

pub const PUNCTUATION: [(char, Code); 11] = [
    (',', Code::lit(0x02)),
    (';', Code::lit(0x06)),
    (':', Code::lit(0x12)),
    ('.', Code::lit(0x32)),
    ('!', Code::lit(0x16)),
    ('?', Code::lit(0x26)),
    ('\'', Code::lit(0x04)),
    ('-', Code::lit(0x24)),
    ('/', Code::lit(0x2e)),
    ('"', Code::lit(0x28)),
    (')', Code::lit(0x1c)),
];

/// Dots 236 read as an opening quotation mark at the start of a word and as a question mark
/// anywhere else
pub const QUESTION_MARK: Code = Code::lit(0x26);
pub const QUOTATION_MARK: Code = Code::lit(0x28);

/// Digits are written with the letters a to j after a number sign
pub const DIGITS: [(char, Code); 10] = [
    ('1', Code::lit(0x01)),
    ('2', Code::lit(0x03)),
    ('3', Code::lit(0x09)),
    ('4', Code::lit(0x19)),
    ('5', Code::lit(0x11)),
    ('6', Code::lit(0x0b)),
    ('7', Code::lit(0x1b)),
    ('8', Code::lit(0x13)),
    ('9', Code::lit(0x0a)),
    ('0', Code::lit(0x1a)),
];

const TYPEFORMS: [(IndicatorKind, Code, [&str; 4]); 4] = [
    (
        IndicatorKind::Italic,
        Code::lit(0x28),
        [
            "ITALIC_SYMBOL",
            "ITALIC_WORD",
            "ITALIC_PASSAGE",
            "ITALIC_TERMINATOR",
        ],
    ),
    (
        IndicatorKind::Bold,
        Code::lit(0x18),
        ["BOLD_SYMBOL", "BOLD_WORD", "BOLD_PASSAGE", "BOLD_TERMINATOR"],
    ),
    (
        IndicatorKind::Underline,
        Code::lit(0x38),
        [
            "UNDERLINE_SYMBOL",
            "UNDERLINE_WORD",
            "UNDERLINE_PASSAGE",
            "UNDERLINE_TERMINATOR",
        ],
    ),
    (
        IndicatorKind::Script,
        Code::lit(0x08),
        [
            "SCRIPT_SYMBOL",
            "SCRIPT_WORD",
            "SCRIPT_PASSAGE",
            "SCRIPT_TERMINATOR",
        ],
    ),
];

/// Second cell of every typeform indicator, in the order of the names above
const TYPEFORM_SUFFIXES: [(IndicatorAction, Code); 4] = [
    (IndicatorAction::Symbol, Code::lit(0x06)),
    (IndicatorAction::Word, Code::lit(0x01)),
    (IndicatorAction::Passage, Code::lit(0x36)),
    (IndicatorAction::End, Code::lit(0x04)),
];

/// The first cells of all multi-cell indicators
pub fn indicator_prefixes() -> Vec<Code> {
    std::iter::once(CAPITAL_SIGN)
        .chain(TYPEFORMS.iter().map(|(_, prefix, _)| *prefix))
        .collect()
}

pub fn indicators() -> Vec<Indicator> {
    let mut indicators = vec![
        Indicator::new(
            "NUMBER",
            &[NUMBER_SIGN],
            IndicatorKind::Number,
            IndicatorAction::Start,
        ),
        Indicator::new(
            "LETTER",
            &[LETTER_SIGN],
            IndicatorKind::Letter,
            IndicatorAction::Symbol,
        ),
        Indicator::new(
            "CAPITAL_LETTER",
            &[CAPITAL_SIGN],
            IndicatorKind::Capital,
            IndicatorAction::Symbol,
        ),
        Indicator::new(
            "CAPITAL_WORD",
            &[CAPITAL_SIGN, CAPITAL_SIGN],
            IndicatorKind::Capital,
            IndicatorAction::Word,
        ),
        Indicator::new(
            "CAPITAL_PASSAGE",
            &[CAPITAL_SIGN, CAPITAL_SIGN, CAPITAL_SIGN],
            IndicatorKind::Capital,
            IndicatorAction::Passage,
        ),
        Indicator::new(
            "CAPITAL_TERMINATOR",
            &[CAPITAL_SIGN, Code::lit(0x04)],
            IndicatorKind::Capital,
            IndicatorAction::End,
        ),
    ];
    for (kind, prefix, names) in TYPEFORMS {
        for ((action, suffix), name) in TYPEFORM_SUFFIXES.into_iter().zip(names) {
            indicators.push(Indicator::new(name, &[prefix, suffix], kind, action));
        }
    }
    indicators
}

pub fn alphabet() -> BTreeMap<Code, char> {
    LETTERS
        .iter()
        .chain(PUNCTUATION.iter())
        .map(|&(c, code)| (code, c))
        .collect()
}

pub fn number_map() -> BTreeMap<Code, char> {
    DIGITS.iter().map(|&(c, code)| (code, c)).collect()
}
