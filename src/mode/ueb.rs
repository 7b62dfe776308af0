//! Unified English Braille
//!
//! [`Grade1`] is the uncontracted code, [`Grade2`] layers the contraction tables on top of it. The
//! state transitions (number mode, capitals, typeforms) are the same for both grades and live in
//! this module.

use crate::braille::Code;
use crate::mode::{
    CapitalMode, IndicatorAction, IndicatorKind, Mode, ModeState, Scope, Typeform,
};
use crate::sequence::{SequenceEffect, SequenceResult};

pub mod contractions;
mod grade1;
mod grade2;
pub mod table;

pub use grade1::Grade1;
pub use grade2::Grade2;

/// Dots 3456
pub const NUMBER_SIGN: Code = Code::lit(0x3c);
/// Dot 6
pub const CAPITAL_SIGN: Code = Code::lit(0x20);
/// Dot 5, ends number mode
pub const LETTER_SIGN: Code = Code::lit(0x10);
/// Dots 56, suspends contractions for the rest of the word
pub const GRADE_1_INDICATOR: Code = Code::lit(0x30);

pub const CATEGORY_ID: &str = "ueb";
pub const CATEGORY_NAME: &str = "Unified English Braille";

/// Cells that may follow a whole-word contraction besides a space: `, : . ! ' - ) "`
pub const BOUNDARY_PUNCTUATION: [Code; 8] = [
    Code::lit(0x02),
    Code::lit(0x12),
    Code::lit(0x32),
    Code::lit(0x16),
    Code::lit(0x04),
    Code::lit(0x24),
    Code::lit(0x1c),
    Code::lit(0x28),
];

/// Whether `code` ends the word in front of it
pub fn is_word_boundary(code: Code) -> bool {
    code.is_space() || BOUNDARY_PUNCTUATION.contains(&code)
}

/// Space, the letter sign and letters beyond j end a number
fn ends_number(mode: &dyn Mode, code: Code) -> bool {
    code.is_space()
        || code == LETTER_SIGN
        || (mode.is_letter(code) && !mode.is_letter_a_to_j(code))
}

pub(crate) fn recalculate_number_mode(mode: &dyn Mode, braille: &[Code]) -> bool {
    for &code in braille.iter().rev() {
        if code == NUMBER_SIGN {
            return true;
        }
        if ends_number(mode, code) {
            return false;
        }
    }
    false
}

pub(crate) fn apply_indicator(
    state: &ModeState,
    kind: IndicatorKind,
    action: IndicatorAction,
) -> ModeState {
    let mut next = *state;
    match kind {
        IndicatorKind::Number => next.number_mode = true,
        IndicatorKind::Letter => next.number_mode = false,
        IndicatorKind::Grade1 => next.contraction_mode = false,
        IndicatorKind::Capital => {
            next.capital_mode = match action {
                IndicatorAction::Symbol => CapitalMode::NextLetter,
                IndicatorAction::Word => CapitalMode::Word,
                IndicatorAction::Passage => CapitalMode::Passage,
                IndicatorAction::Start | IndicatorAction::End => CapitalMode::Off,
            }
        }
        _ => {
            if let Some(typeform) = kind.typeform() {
                match action.scope() {
                    Some(scope) => {
                        next.typeform = Some(Typeform {
                            kind: typeform,
                            scope,
                        })
                    }
                    None => {
                        if next.typeform.is_some_and(|t| t.kind == typeform) {
                            next.typeform = None;
                        }
                    }
                }
            }
        }
    }
    next
}

/// Effects of confirmed text on the state
fn after_text(state: &ModeState, text: &str) -> ModeState {
    let mut next = *state;
    if text.chars().any(char::is_alphabetic) && next.capital_mode == CapitalMode::NextLetter {
        next.capital_mode = CapitalMode::Off;
    }
    if !text.is_empty() {
        next.at_word_start = false;
        if next.typeform.is_some_and(|t| t.scope == Scope::Symbol) {
            next.typeform = None;
        }
    }
    next
}

pub(crate) fn update_state(mode: &dyn Mode, state: &ModeState, code: Code, text: &str) -> ModeState {
    let mut next = *state;
    if code.is_space() {
        next.number_mode = false;
        next.at_word_start = true;
        next.contraction_mode = true;
        if next.capital_mode == CapitalMode::Word {
            next.capital_mode = CapitalMode::Off;
        }
        if next.typeform.is_some_and(|t| t.scope == Scope::Word) {
            next.typeform = None;
        }
        return next;
    }
    if let Some(indicator) = mode.indicator(&[code]) {
        return apply_indicator(&next, indicator.kind, indicator.action);
    }
    if next.number_mode && ends_number(mode, code) {
        next.number_mode = false;
    }
    after_text(&next, text)
}

pub(crate) fn apply_sequence(state: &ModeState, result: &SequenceResult) -> ModeState {
    match result.effect {
        SequenceEffect::Indicator { kind, action } => apply_indicator(state, kind, action),
        SequenceEffect::Contraction(_) => after_text(state, &result.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Code = Code::lit(0x01);
    const K: Code = Code::lit(0x05);
    const COMMA: Code = Code::lit(0x02);

    #[test]
    fn number_mode_recalculation() {
        let mode = Grade1::new();
        assert!(!recalculate_number_mode(&mode, &[]));
        assert!(recalculate_number_mode(&mode, &[NUMBER_SIGN]));
        assert!(recalculate_number_mode(&mode, &[NUMBER_SIGN, A, A, COMMA, A]));
        assert!(!recalculate_number_mode(&mode, &[NUMBER_SIGN, A, Code::SPACE]));
        assert!(!recalculate_number_mode(&mode, &[NUMBER_SIGN, A, LETTER_SIGN, A]));
        assert!(!recalculate_number_mode(&mode, &[NUMBER_SIGN, A, K]));
        assert!(recalculate_number_mode(&mode, &[K, Code::SPACE, NUMBER_SIGN, A]));
    }

    #[test]
    fn number_mode_forward() {
        let mode = Grade1::new();
        let mut state = mode.initial_state();
        state = update_state(&mode, &state, NUMBER_SIGN, "");
        assert!(state.number_mode);
        state = update_state(&mode, &state, A, "1");
        assert!(state.number_mode);
        state = update_state(&mode, &state, K, "k");
        assert!(!state.number_mode);
    }

    #[test]
    fn word_scope_ends_at_space() {
        let mode = Grade1::new();
        let mut state = mode.initial_state();
        state = apply_indicator(&state, IndicatorKind::Capital, IndicatorAction::Word);
        state = apply_indicator(&state, IndicatorKind::Bold, IndicatorAction::Word);
        state = update_state(&mode, &state, A, "A");
        assert_eq!(state.capital_mode, CapitalMode::Word);
        assert!(!state.at_word_start);
        state = update_state(&mode, &state, Code::SPACE, " ");
        assert_eq!(state.capital_mode, CapitalMode::Off);
        assert_eq!(state.typeform, None);
        assert!(state.at_word_start);
    }

    #[test]
    fn typeforms() {
        let mode = Grade1::new();
        let mut state = mode.initial_state();
        state = apply_indicator(&state, IndicatorKind::Italic, IndicatorAction::Symbol);
        assert_eq!(
            state.typeform,
            Some(Typeform {
                kind: crate::mode::TypeformKind::Italic,
                scope: Scope::Symbol
            })
        );
        state = update_state(&mode, &state, A, "a");
        assert_eq!(state.typeform, None);

        state = apply_indicator(&state, IndicatorKind::Bold, IndicatorAction::Passage);
        state = update_state(&mode, &state, Code::SPACE, " ");
        assert!(state.typeform.is_some());
        // terminating another typeform leaves bold alone
        state = apply_indicator(&state, IndicatorKind::Italic, IndicatorAction::End);
        assert!(state.typeform.is_some());
        state = apply_indicator(&state, IndicatorKind::Bold, IndicatorAction::End);
        assert_eq!(state.typeform, None);
    }

    #[test]
    fn next_letter_capital() {
        let mode = Grade1::new();
        let mut state = update_state(&mode, &mode.initial_state(), CAPITAL_SIGN, "");
        assert_eq!(state.capital_mode, CapitalMode::NextLetter);
        state = update_state(&mode, &state, COMMA, ",");
        assert_eq!(state.capital_mode, CapitalMode::NextLetter);
        state = update_state(&mode, &state, A, "A");
        assert_eq!(state.capital_mode, CapitalMode::Off);
    }

    #[test]
    fn boundaries() {
        assert!(is_word_boundary(Code::SPACE));
        assert!(is_word_boundary(Code::lit(0x32)));
        assert!(!is_word_boundary(A));
        assert!(!is_word_boundary(Code::lit(0x26)));
    }
}
