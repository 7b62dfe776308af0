//! Multi-cell sequence resolution
//!
//! Some indicators and contractions span several cells that share a first cell, e.g. the capital
//! sign on its own, doubled (capital word) or tripled (capital passage). A mode registers
//! [`SequenceResolver`]s for them and the [`SequenceMatcher`] decides, for the cells buffered so
//! far, whether they already form a match, whether a longer match is still possible, and which
//! prefix of the buffer to commit once the buffer can no longer grow.
//!
//! Resolution is greedy with lookahead: a match is only committed once no resolver could accept
//! another cell, so a short match never shadows a longer one sharing its prefix.

use std::collections::BTreeSet;
use std::fmt;

use crate::braille::Code;
use crate::mode::{
    ContractionClass, Context, Indicator, IndicatorAction, IndicatorKind, Mode,
};

/// What committing a resolved sequence does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEffect {
    Indicator {
        kind: IndicatorKind,
        action: IndicatorAction,
    },
    Contraction(ContractionClass),
}

/// A resolved indicator or contraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceResult {
    pub name: &'static str,
    pub text: String,
    pub effect: SequenceEffect,
    /// Number of buffered cells that belong to the match. Any further cells only served as
    /// lookahead and are replayed.
    pub consumed: usize,
}

pub trait SequenceResolver: fmt::Debug + Send + Sync {
    fn min_cells(&self) -> usize;
    fn max_cells(&self) -> usize;
    /// The first cells of every sequence this resolver can match
    fn prefix_codes(&self) -> &BTreeSet<Code>;
    fn resolve(&self, codes: &[Code], context: &Context<'_>) -> Option<SequenceResult>;
    /// Whether `codes` is a proper prefix of something this resolver could match
    fn accepts_more(&self, codes: &[Code]) -> bool;

    fn handles(&self, codes: &[Code]) -> bool {
        codes
            .first()
            .is_some_and(|first| self.prefix_codes().contains(first))
    }
}

/// Resolves the multi-cell indicators that start with one common prefix cell
#[derive(Debug, Clone)]
pub struct IndicatorResolver {
    prefix: BTreeSet<Code>,
    indicators: Vec<Indicator>,
    max_cells: usize,
}

impl IndicatorResolver {
    /// Collect the multi-cell indicators starting with `prefix`
    pub fn family(prefix: Code, indicators: &[Indicator]) -> Self {
        let indicators: Vec<Indicator> = indicators
            .iter()
            .filter(|i| i.codes.len() > 1 && i.codes[0] == prefix)
            .cloned()
            .collect();
        let max_cells = indicators.iter().map(|i| i.codes.len()).max().unwrap_or(2);
        IndicatorResolver {
            prefix: BTreeSet::from([prefix]),
            indicators,
            max_cells,
        }
    }
}

impl SequenceResolver for IndicatorResolver {
    fn min_cells(&self) -> usize {
        2
    }

    fn max_cells(&self) -> usize {
        self.max_cells
    }

    fn prefix_codes(&self) -> &BTreeSet<Code> {
        &self.prefix
    }

    fn resolve(&self, codes: &[Code], _context: &Context<'_>) -> Option<SequenceResult> {
        self.indicators
            .iter()
            .find(|i| i.codes == codes)
            .map(|i| SequenceResult {
                name: i.name,
                text: String::new(),
                effect: SequenceEffect::Indicator {
                    kind: i.kind,
                    action: i.action,
                },
                consumed: codes.len(),
            })
    }

    fn accepts_more(&self, codes: &[Code]) -> bool {
        self.indicators
            .iter()
            .any(|i| i.codes.len() > codes.len() && i.codes.starts_with(codes))
    }
}

/// The in-flight buffer of a multi-cell sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceState {
    pending: Vec<Code>,
}

impl SequenceState {
    pub fn is_active(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_codes(&self) -> &[Code] {
        &self.pending
    }

    pub fn push(&mut self, code: Code) {
        self.pending.push(code);
    }

    pub fn pop(&mut self) -> Option<Code> {
        self.pending.pop()
    }

    /// Empty the buffer, handing back what was collected
    pub fn take(&mut self) -> Vec<Code> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Applies the registered resolvers of a mode to a buffer of cells
pub struct SequenceMatcher<'a> {
    resolvers: &'a [Box<dyn SequenceResolver>],
    max_depth: usize,
}

impl<'a> SequenceMatcher<'a> {
    pub fn new(mode: &'a dyn Mode) -> Self {
        SequenceMatcher {
            resolvers: mode.resolvers(),
            max_depth: mode.max_sequence_depth(),
        }
    }

    pub fn starts_sequence(&self, code: Code) -> bool {
        self.resolvers
            .iter()
            .any(|r| r.prefix_codes().contains(&code))
    }

    /// Try every applicable resolver in registration order, first match wins
    pub fn resolve(&self, codes: &[Code], context: &Context<'_>) -> Option<SequenceResult> {
        let len = codes.len();
        self.resolvers
            .iter()
            .filter(|r| r.handles(codes) && (r.min_cells()..=r.max_cells()).contains(&len))
            .find_map(|r| r.resolve(codes, context))
    }

    /// Whether another cell could still turn the buffer into a (longer) match
    pub fn can_extend(&self, codes: &[Code]) -> bool {
        codes.len() < self.max_depth
            && self.resolvers.iter().any(|r| {
                r.handles(codes) && codes.len() < r.max_cells() && r.accepts_more(codes)
            })
    }

    /// The longest prefix of `codes` that resolves, trying lengths from the full buffer down to
    /// two cells. Matches that would consume more than `limit` cells are skipped, which lets the
    /// caller append lookahead cells that must not be committed.
    pub fn longest_match(
        &self,
        codes: &[Code],
        context: &Context<'_>,
        limit: usize,
    ) -> Option<SequenceResult> {
        (2..=codes.len())
            .rev()
            .filter_map(|len| self.resolve(&codes[..len], context))
            .find(|result| result.consumed <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;
    use crate::mode::{ModeInfo, ModeState};
    use crate::mode::ueb::{CAPITAL_SIGN, Grade1};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const A: Code = Code::lit(0x01);
    const APOSTROPHE: Code = Code::lit(0x04);

    /// Grade 1 buffering at most two cells
    #[derive(Debug)]
    struct Shallow(Grade1);

    impl Mode for Shallow {
        fn info(&self) -> &ModeInfo {
            self.0.info()
        }
        fn code_to_text(&self, code: Code, context: &Context<'_>) -> String {
            self.0.code_to_text(code, context)
        }
        fn alphabet(&self) -> &BTreeMap<Code, char> {
            self.0.alphabet()
        }
        fn number_map(&self) -> &BTreeMap<Code, char> {
            self.0.number_map()
        }
        fn indicators(&self) -> &[Indicator] {
            self.0.indicators()
        }
        fn text_to_code(&self, c: char) -> Option<Code> {
            self.0.text_to_code(c)
        }
        fn resolvers(&self) -> &[Box<dyn SequenceResolver>] {
            self.0.resolvers()
        }
        fn max_sequence_depth(&self) -> usize {
            2
        }
        fn update_state(&self, state: &ModeState, code: Code, text: &str) -> ModeState {
            self.0.update_state(state, code, text)
        }
        fn apply_sequence(&self, state: &ModeState, result: &SequenceResult) -> ModeState {
            self.0.apply_sequence(state, result)
        }
        fn recalculate_number_mode(&self, braille: &[Code]) -> bool {
            self.0.recalculate_number_mode(braille)
        }
        fn text_to_braille(&self, text: &str) -> Vec<Code> {
            self.0.text_to_braille(text)
        }
    }

    #[test]
    fn indicator_family() {
        let mode = Grade1::new();
        let resolver = IndicatorResolver::family(CAPITAL_SIGN, mode.indicators());
        assert_eq!(resolver.max_cells(), 3);
        assert!(resolver.accepts_more(&[CAPITAL_SIGN]));
        assert!(resolver.accepts_more(&[CAPITAL_SIGN, CAPITAL_SIGN]));
        assert!(!resolver.accepts_more(&[CAPITAL_SIGN, APOSTROPHE]));
        assert!(!resolver.accepts_more(&[CAPITAL_SIGN, A]));
    }

    #[test]
    fn greedy_capitals() {
        let mode = Grade1::new();
        let matcher = SequenceMatcher::new(&mode);
        let context = Context::empty(ModeState::default());

        assert!(matcher.starts_sequence(CAPITAL_SIGN));
        assert!(!matcher.starts_sequence(A));

        let one = [CAPITAL_SIGN];
        assert_eq!(matcher.resolve(&one, &context), None);
        assert!(matcher.can_extend(&one));

        let two = [CAPITAL_SIGN, CAPITAL_SIGN];
        assert_eq!(
            matcher.resolve(&two, &context).map(|r| r.name),
            Some("CAPITAL_WORD")
        );
        assert!(matcher.can_extend(&two));

        let three = [CAPITAL_SIGN, CAPITAL_SIGN, CAPITAL_SIGN];
        assert_eq!(
            matcher.resolve(&three, &context).map(|r| r.name),
            Some("CAPITAL_PASSAGE")
        );
        assert!(!matcher.can_extend(&three));
    }

    #[test]
    fn mode_depth_ends_deferral() {
        let mode = Shallow(Grade1::new());
        let matcher = SequenceMatcher::new(&mode);
        let two = [CAPITAL_SIGN, CAPITAL_SIGN];
        // the capital resolver could still take a third cell
        assert!(IndicatorResolver::family(CAPITAL_SIGN, mode.indicators()).accepts_more(&two));
        assert!(!matcher.can_extend(&two));

        let mut editor = EditorState::new(Arc::new(Shallow(Grade1::new())));
        editor.confirm_code(CAPITAL_SIGN);
        assert!(editor.is_pending_indicator());
        let result = editor.confirm_code(CAPITAL_SIGN);
        assert_eq!(result.resolved, Some("CAPITAL_WORD"));
        assert!(!result.pending);
        assert_eq!(editor.braille(), &two[..]);
        editor.confirm_code(A);
        assert_eq!(editor.text(), "A");
    }

    #[test]
    fn longest_prefix() {
        let mode = Grade1::new();
        let matcher = SequenceMatcher::new(&mode);
        let context = Context::empty(ModeState::default());

        let buffer = [CAPITAL_SIGN, CAPITAL_SIGN, A];
        assert_eq!(matcher.resolve(&buffer, &context), None);
        assert!(!matcher.can_extend(&buffer));
        let result = matcher.longest_match(&buffer, &context, buffer.len());
        assert_eq!(result.as_ref().map(|r| r.name), Some("CAPITAL_WORD"));
        assert_eq!(result.map(|r| r.consumed), Some(2));

        assert_eq!(matcher.longest_match(&[CAPITAL_SIGN, A], &context, 2), None);
        assert_eq!(
            matcher
                .longest_match(&[CAPITAL_SIGN, APOSTROPHE], &context, 2)
                .map(|r| r.name),
            Some("CAPITAL_TERMINATOR")
        );
    }

    #[test]
    fn sequence_state() {
        let mut state = SequenceState::default();
        assert!(!state.is_active());
        state.push(CAPITAL_SIGN);
        state.push(A);
        assert_eq!(state.depth(), 2);
        assert_eq!(state.pop(), Some(A));
        assert_eq!(state.take(), vec![CAPITAL_SIGN]);
        assert!(!state.is_active());
    }
}
