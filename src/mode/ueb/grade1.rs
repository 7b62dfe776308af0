use std::collections::{BTreeMap, HashMap};

use crate::braille::Code;
use crate::encoder::Encoder;
use crate::mode::{Context, Indicator, Mode, ModeInfo, ModeState, apply_case};
use crate::sequence::{IndicatorResolver, SequenceResolver, SequenceResult};

use super::table::{self, QUESTION_MARK};
use super::CATEGORY_ID;

/// One resolver per multi-cell indicator prefix
pub(super) fn indicator_resolvers(indicators: &[Indicator]) -> Vec<Box<dyn SequenceResolver>> {
    table::indicator_prefixes()
        .into_iter()
        .map(|prefix| {
            Box::new(IndicatorResolver::family(prefix, indicators)) as Box<dyn SequenceResolver>
        })
        .collect()
}

/// Uncontracted Unified English Braille
#[derive(Debug)]
pub struct Grade1 {
    info: ModeInfo,
    alphabet: BTreeMap<Code, char>,
    numbers: BTreeMap<Code, char>,
    reverse: HashMap<char, Code>,
    indicators: Vec<Indicator>,
    resolvers: Vec<Box<dyn SequenceResolver>>,
    encoder: Encoder,
}

impl Grade1 {
    pub fn new() -> Self {
        let indicators = table::indicators();
        let resolvers = indicator_resolvers(&indicators);
        let reverse = table::LETTERS
            .iter()
            .chain(table::PUNCTUATION.iter())
            .chain(table::DIGITS.iter())
            .copied()
            .collect();
        Grade1 {
            info: ModeInfo {
                id: "ueb1",
                name: "UEB Grade 1",
                description: "Unified English Braille, uncontracted",
                language: "en",
                category: Some(CATEGORY_ID),
            },
            alphabet: table::alphabet(),
            numbers: table::number_map(),
            reverse,
            indicators,
            resolvers,
            encoder: Encoder::new(&[]),
        }
    }

    /// Letter by letter reading of a code
    pub(super) fn literal(&self, code: Code, context: &Context<'_>) -> String {
        let state = &context.state;
        if code.is_space() {
            return " ".to_string();
        }
        if self.indicator(&[code]).is_some() {
            return String::new();
        }
        if state.number_mode {
            if let Some(digit) = self.numbers.get(&code) {
                return digit.to_string();
            }
        }
        if code == QUESTION_MARK && state.at_word_start {
            return "\"".to_string();
        }
        match self.alphabet.get(&code) {
            Some(c) => apply_case(&c.to_string(), state.capital_mode),
            None => code.to_glyph().to_string(),
        }
    }
}

impl Default for Grade1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for Grade1 {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn code_to_text(&self, code: Code, context: &Context<'_>) -> String {
        self.literal(code, context)
    }

    fn alphabet(&self) -> &BTreeMap<Code, char> {
        &self.alphabet
    }

    fn number_map(&self) -> &BTreeMap<Code, char> {
        &self.numbers
    }

    fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    fn text_to_code(&self, c: char) -> Option<Code> {
        self.reverse.get(&c.to_ascii_lowercase()).copied()
    }

    fn resolvers(&self) -> &[Box<dyn SequenceResolver>] {
        &self.resolvers
    }

    fn update_state(&self, state: &ModeState, code: Code, text: &str) -> ModeState {
        super::update_state(self, state, code, text)
    }

    fn apply_sequence(&self, state: &ModeState, result: &SequenceResult) -> ModeState {
        super::apply_sequence(state, result)
    }

    fn recalculate_number_mode(&self, braille: &[Code]) -> bool {
        super::recalculate_number_mode(self, braille)
    }

    fn text_to_braille(&self, text: &str) -> Vec<Code> {
        self.encoder.encode(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::CapitalMode;

    fn text(mode: &Grade1, code: u8, state: ModeState) -> String {
        mode.code_to_text(Code::lit(code), &Context::empty(state))
    }

    #[test]
    fn letters_round_trip() {
        let mode = Grade1::new();
        let state = mode.initial_state();
        for (&code, &c) in mode.alphabet() {
            if c.is_alphabetic() {
                let text = mode.code_to_text(code, &Context::empty(state));
                let back: Vec<_> = text.chars().filter_map(|c| mode.text_to_code(c)).collect();
                assert_eq!(back, vec![code], "{c}");
            }
        }
    }

    #[test]
    fn numbers() {
        let mode = Grade1::new();
        let state = ModeState {
            number_mode: true,
            ..mode.initial_state()
        };
        assert_eq!(text(&mode, 0x01, state), "1");
        assert_eq!(text(&mode, 0x1a, state), "0");
        assert_eq!(text(&mode, 0x05, state), "k");
        assert_eq!(text(&mode, 0x32, state), ".");
        assert_eq!(mode.text_to_code('5'), Some(Code::lit(0x11)));
    }

    #[test]
    fn capitals() {
        let mode = Grade1::new();
        let state = ModeState {
            capital_mode: CapitalMode::NextLetter,
            ..mode.initial_state()
        };
        assert_eq!(text(&mode, 0x13, state), "H");
        assert_eq!(mode.text_to_code('H'), Some(Code::lit(0x13)));
    }

    #[test]
    fn question_mark_or_quote() {
        let mode = Grade1::new();
        let start = mode.initial_state();
        let within = ModeState {
            at_word_start: false,
            ..start
        };
        assert_eq!(text(&mode, 0x26, start), "\"");
        assert_eq!(text(&mode, 0x26, within), "?");
    }

    #[test]
    fn indicators_and_unknown_codes() {
        let mode = Grade1::new();
        let state = mode.initial_state();
        assert_eq!(text(&mode, 0x3c, state), "");
        assert_eq!(text(&mode, 0x20, state), "");
        assert_eq!(text(&mode, 0x00, state), " ");
        assert_eq!(text(&mode, 0x2f, state), "⠯");
    }
}
