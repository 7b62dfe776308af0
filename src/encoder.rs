//! Batch text to braille encoding
//!
//! The [`Encoder`] walks the text from left to right. For every position the numeric and uppercase
//! indicator state machines decide whether an indicator goes in front, then the contraction trie
//! is asked for candidates. Whole-word contractions beat initial and final-letter contractions,
//! which beat lower contractions, which beat part-word contractions. Whatever is left is encoded
//! letter by letter.
//!
//! The positional tests are the same ones the typing path applies when it reads the cells back,
//! so encoding and then typing the cells reproduces the text. A grade-1 indicator is inserted in
//! front of a literal cell that would otherwise be read as a contraction.

use std::collections::{HashMap, HashSet};

use log::{trace, warn};

use crate::braille::{Cells, Code};
use crate::mode::ueb::table::{self, QUESTION_MARK, QUOTATION_MARK};
use crate::mode::ueb::{CAPITAL_SIGN, GRADE_1_INDICATOR, LETTER_SIGN, NUMBER_SIGN, is_word_boundary};
use crate::mode::{Contraction, ContractionClass, Position};

use boundaries::{after_space, is_boundary};
use indication::{Indication, numeric, uppercase};
use trie::{Boundary, Translation, Trie};

pub mod boundaries;
mod indication;
mod trie;

/// Digits are written with the letters a to j, those letters need a letter sign after a number
const LETTERS_A_TO_J: &str = "abcdefghijABCDEFGHIJ";

fn boundaries(position: Position) -> (Boundary, Boundary) {
    match position {
        Position::Standalone => (Boundary::Word, Boundary::Word),
        Position::Start => (Boundary::Word, Boundary::None),
        Position::Middle => (Boundary::NotWord, Boundary::None),
        Position::End => (Boundary::NotWord, Boundary::Word),
    }
}

fn priority(class: ContractionClass) -> u8 {
    match class {
        ContractionClass::WholeWord => 3,
        ContractionClass::InitialLetter | ContractionClass::FinalLetter => 2,
        ContractionClass::Lower => 1,
        ContractionClass::PartWord => 0,
    }
}

/// A contraction only applies if the capitals in it can be indicated in front of it
fn matches_case(segment: &str, capitalised_word: bool) -> bool {
    let lowercase = |s: &str| s.chars().all(|c| !c.is_uppercase());
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            lowercase(chars.as_str()) || (capitalised_word && chars.all(char::is_uppercase))
        }
        _ => lowercase(segment),
    }
}

#[derive(Debug)]
pub struct Encoder {
    characters: HashMap<char, Code>,
    contractions: Trie,
    whole_words: HashSet<Code>,
    lower: HashSet<Code>,
}

impl Encoder {
    /// An encoder for UEB with the given contractions, none for grade 1
    pub fn new(contractions: &[Contraction]) -> Self {
        let characters = table::LETTERS
            .iter()
            .chain(table::PUNCTUATION.iter())
            .chain(table::DIGITS.iter())
            .copied()
            .collect();
        let mut trie = Trie::new();
        let mut whole_words = HashSet::new();
        let mut lower = HashSet::new();
        for contraction in contractions {
            let (before, after) = boundaries(contraction.position);
            trie.insert(
                contraction.text.to_string(),
                contraction.codes.clone(),
                contraction.class,
                before,
                after,
            );
            match (contraction.class, contraction.codes.as_slice()) {
                (ContractionClass::WholeWord, &[code]) => {
                    whole_words.insert(code);
                }
                (ContractionClass::Lower, &[code]) => {
                    lower.insert(code);
                }
                _ => {}
            }
        }
        Encoder {
            characters,
            contractions: trie,
            whole_words,
            lower,
        }
    }

    fn character(&self, c: char, prev: Option<char>) -> Option<Code> {
        match c {
            '"' if after_space(prev) => Some(QUESTION_MARK),
            '"' => Some(QUOTATION_MARK),
            _ => self.characters.get(&c.to_ascii_lowercase()).copied(),
        }
    }

    /// The next character of `s` that ends up in the braille
    fn next_encoded(&self, s: &str) -> Option<char> {
        s.chars().find(|&c| c.is_whitespace() || self.character(c, None).is_some())
    }

    /// Whether a literal `code` at the start of a word would be read as a contraction
    fn needs_escape(&self, c: char, code: Code, prev: Option<char>, rest: &str) -> bool {
        if !after_space(prev) {
            return false;
        }
        let standalone = self.next_encoded(rest).is_none_or(is_boundary);
        (standalone && self.whole_words.contains(&code))
            || (!c.is_alphabetic() && self.lower.contains(&code))
    }

    fn contraction(
        &self,
        folded: &str,
        original: &str,
        prev: Option<char>,
        capitalised_word: bool,
        after_whole_word_code: bool,
    ) -> Option<&Translation> {
        self.contractions
            .find_translations(folded, prev)
            .into_iter()
            .filter(|t| matches_case(&original[..t.from.len()], capitalised_word))
            .filter(|t| {
                // a lower cell that doubles as a whole word must not stand alone
                let whole_word_code = t.to.first().is_some_and(|c| self.whole_words.contains(c));
                !(t.class == ContractionClass::Lower
                    && whole_word_code
                    && self
                        .next_encoded(&original[t.from.len()..])
                        .is_none_or(is_boundary))
            })
            .filter(|t| !(after_whole_word_code && t.to.first().is_some_and(|&c| is_word_boundary(c))))
            .max_by_key(|t| (priority(t.class), t.from.len()))
    }

    /// Encode `text` into cells
    ///
    /// Whitespace becomes a blank cell. Characters without a braille representation are skipped.
    pub fn encode(&self, text: &str) -> Vec<Code> {
        let folded: String = text.chars().map(|c| c.to_ascii_lowercase()).collect();
        let mut numeric = numeric::IndicatorBuilder::new()
            .numeric_characters(table::DIGITS.iter().map(|&(c, _)| c))
            .terminating_characters(LETTERS_A_TO_J.chars())
            .build();
        let mut uppercase = uppercase::Indicator::new();
        let mut cells = Vec::new();
        let mut prev: Option<char> = None;
        let mut contracting = true;
        let mut after_whole_word_code = false;
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            let rest = &text[pos..];
            let next_pos = pos + c.len_utf8();
            if c.is_whitespace() {
                numeric.next(rest);
                uppercase.next(rest, prev);
                cells.push(Code::SPACE);
                contracting = true;
                after_whole_word_code = false;
                prev = Some(c);
                pos = next_pos;
                continue;
            }
            let Some(code) = self.character(c, prev) else {
                warn!("skipping {c:?}, it has no braille representation");
                pos = next_pos;
                continue;
            };

            let was_numeric = numeric.is_numeric();
            let indication = numeric.next(rest);
            match indication {
                Some(Indication::NumericStart) => cells.push(NUMBER_SIGN),
                Some(Indication::NumericEnd) => cells.push(LETTER_SIGN),
                _ => {}
            }
            let mut allowed =
                contracting && !(was_numeric && indication != Some(Indication::NumericEnd));
            if allowed && self.needs_escape(c, code, prev, &text[next_pos..]) {
                cells.push(GRADE_1_INDICATOR);
                contracting = false;
                allowed = false;
            }
            match uppercase.next(rest, prev) {
                Some(Indication::UppercaseLetter) => cells.push(CAPITAL_SIGN),
                Some(Indication::UppercaseWord) => cells.extend([CAPITAL_SIGN, CAPITAL_SIGN]),
                _ => {}
            }

            if allowed {
                let found = self.contraction(
                    &folded[pos..],
                    rest,
                    prev,
                    uppercase.in_word(),
                    after_whole_word_code,
                );
                if let Some(translation) = found {
                    trace!("{:?} -> {}", translation.from, Cells(&translation.to));
                    after_whole_word_code = after_space(prev)
                        && matches!(translation.to.as_slice(), [code] if self.whole_words.contains(code));
                    cells.extend(translation.to.iter().copied());
                    pos += translation.from.len();
                    prev = text[..pos].chars().next_back();
                    continue;
                }
            }

            after_whole_word_code = after_space(prev) && self.whole_words.contains(&code);
            cells.push(code);
            prev = Some(c);
            pos = next_pos;
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::braille::braille_cells;
    use crate::editor::EditorState;
    use crate::mode::Mode;
    use crate::mode::ueb::contractions::contractions;
    use crate::mode::ueb::{Grade1, Grade2};

    fn codes(bits: &[u8]) -> Vec<Code> {
        bits.iter().map(|&b| Code::lit(b)).collect()
    }

    fn grade1() -> Encoder {
        Encoder::new(&[])
    }

    fn grade2() -> Encoder {
        Encoder::new(&contractions())
    }

    fn type_cells(mode: Arc<dyn Mode>, cells: &[Code]) -> String {
        let mut editor = EditorState::new(mode);
        for &code in cells {
            editor.confirm_code(code);
        }
        editor.flush();
        editor.text().to_string()
    }

    #[test]
    fn letters() {
        assert_eq!(grade1().encode("abc"), codes(&[0x01, 0x03, 0x09]));
        assert_eq!(grade1().encode("a b"), codes(&[0x01, 0x00, 0x03]));
        assert_eq!(grade1().encode(""), Vec::<Code>::new());
    }

    #[test]
    fn capitals() {
        assert_eq!(
            grade1().encode("Hello"),
            codes(&[0x20, 0x13, 0x11, 0x07, 0x07, 0x15])
        );
        assert_eq!(
            grade1().encode("HELLO world"),
            codes(&[0x20, 0x20, 0x13, 0x11, 0x07, 0x07, 0x15, 0x00, 0x3a, 0x15, 0x17, 0x07, 0x19])
        );
        assert_eq!(grade1().encode("I"), codes(&[0x20, 0x0a]));
    }

    #[test]
    fn numbers() {
        assert_eq!(
            grade1().encode("1205"),
            codes(&[0x3c, 0x01, 0x03, 0x1a, 0x11])
        );
        assert_eq!(
            grade1().encode("12ab"),
            codes(&[0x3c, 0x01, 0x03, 0x10, 0x01, 0x03])
        );
        assert_eq!(grade1().encode("1k"), codes(&[0x3c, 0x01, 0x05]));
        assert_eq!(
            grade1().encode("1,5 a"),
            codes(&[0x3c, 0x01, 0x02, 0x11, 0x00, 0x01])
        );
    }

    #[test]
    fn quotes_and_unknown_characters() {
        assert_eq!(
            grade1().encode("\"hi?\""),
            codes(&[0x26, 0x13, 0x0a, 0x26, 0x28])
        );
        assert_eq!(grade1().encode("a€b"), codes(&[0x01, 0x03]));
    }

    #[test]
    fn whole_words() {
        assert_eq!(grade2().encode("and the"), codes(&[0x2f, 0x00, 0x2e]));
        assert_eq!(
            grade2().encode("the cat"),
            codes(&[0x2e, 0x00, 0x09, 0x01, 0x1e])
        );
        assert_eq!(grade2().encode("and."), codes(&[0x2f, 0x32]));
        assert_eq!(grade2().encode("And"), codes(&[0x20, 0x2f]));
        assert_eq!(grade2().encode("AND"), codes(&[0x20, 0x20, 0x2f]));
        // not a whole word
        assert_eq!(
            grade2().encode("andes"),
            codes(&[0x01, 0x1d, 0x19, 0x11, 0x0e])
        );
    }

    #[test]
    fn positional_contractions() {
        assert_eq!(grade2().encode("day"), codes(&[0x10, 0x19]));
        assert_eq!(
            grade2().encode("today"),
            codes(&[0x1e, 0x15, 0x19, 0x01, 0x3d])
        );
        assert_eq!(
            grade2().encode("nation"),
            codes(&[0x1d, 0x01, 0x30, 0x1d])
        );
        // final letters only where the word ends
        assert_eq!(
            grade2().encode("nations"),
            codes(&[0x1d, 0x01, 0x1e, 0x0a, 0x15, 0x1d, 0x0e])
        );
        assert_eq!(grade2().encode("aday"), codes(&[0x01, 0x19, 0x01, 0x3d]));
        assert_eq!(grade2().encode("other"), codes(&[0x15, 0x39, 0x3b]));
        assert_eq!(grade2().encode("into"), codes(&[0x14, 0x1e, 0x15]));
        assert_eq!(
            grade2().encode("content"),
            codes(&[0x12, 0x1e, 0x11, 0x1d, 0x1e])
        );
        // part-word contractions never start a word
        assert_eq!(
            grade2().encode("this"),
            codes(&[0x1e, 0x13, 0x0a, 0x0e])
        );
    }

    #[test]
    fn lower_cell_alone_is_a_whole_word() {
        assert_eq!(grade2().encode("en."), codes(&[0x11, 0x1d, 0x32]));
    }

    #[test]
    fn escapes() {
        assert_eq!(grade2().encode("c"), codes(&[0x30, 0x09]));
        assert_eq!(grade2().encode("C"), codes(&[0x30, 0x20, 0x09]));
        assert_eq!(grade2().encode("(c)"), codes(&[0x30, 0x09, 0x1c]));
        assert_eq!(
            grade2().encode("; x"),
            codes(&[0x30, 0x06, 0x00, 0x2d])
        );
        // no contractions in grade 1, so nothing to escape
        assert_eq!(grade1().encode("c"), codes(&[0x09]));
    }

    #[test]
    fn no_contractions_right_after_a_number() {
        assert_eq!(
            grade2().encode("1st"),
            codes(&[0x3c, 0x01, 0x0e, 0x1e])
        );
    }

    #[test]
    fn typing_the_cells_back() {
        let grade1_mode: Arc<dyn Mode> = Arc::new(Grade1::new());
        let grade2_mode: Arc<dyn Mode> = Arc::new(Grade2::new());
        for text in ["Hello World", "1205", "12ab", "\"hi\""] {
            let cells = grade1_mode.text_to_braille(text);
            assert_eq!(type_cells(grade1_mode.clone(), &cells), text, "{text}");
        }
        for text in [
            "the child and his father were out",
            "nation of one",
            "content",
            "And the day",
            "c",
            "into other",
        ] {
            let cells = grade2_mode.text_to_braille(text);
            assert_eq!(type_cells(grade2_mode.clone(), &cells), text, "{text}");
        }
    }

    #[test]
    fn dot_notation_input() {
        let cells = braille_cells("1345-1-56-1345").unwrap();
        assert_eq!(cells, grade2().encode("nation"));
    }
}
