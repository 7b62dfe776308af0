//! Editor state
//!
//! [`EditorState`] turns dot input into a document. Dots are collected into a chord, and when
//! the chord is confirmed its code is either written straight away or, if it may start a
//! multi-cell indicator or contraction, buffered until the [`SequenceMatcher`] can decide what
//! the buffered cells mean.
//!
//! The document is a list of units: a single cell, a committed sequence or a newline. The text
//! and braille renderings are both derived from the units, so deleting the last unit always
//! removes the same logical character from both.

use std::sync::Arc;

use log::{debug, trace};

use crate::braille::{BrailleDot, BrailleError, Cells, Code, DotSet};
use crate::mode::{CapitalMode, Context, Mode, ModeState};
use crate::sequence::{SequenceMatcher, SequenceResult, SequenceState};

#[derive(Debug, Clone, PartialEq, Eq)]
enum UnitKind {
    Cell(Code),
    Sequence(SequenceResult),
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Unit {
    codes: Vec<Code>,
    text: String,
    kind: UnitKind,
}

/// The confirmed content of an editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    units: Vec<Unit>,
    text: String,
    braille: Vec<Code>,
}

impl Document {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All confirmed cells, a newline counting as a blank cell
    pub fn braille(&self) -> &[Code] {
        &self.braille
    }

    /// The confirmed cells as glyphs, with newlines kept as line breaks
    pub fn braille_string(&self) -> String {
        self.units
            .iter()
            .map(|unit| match unit.kind {
                UnitKind::Newline => "\n".to_string(),
                _ => Cells(&unit.codes).to_string(),
            })
            .collect()
    }

    /// Number of confirmed units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn push(&mut self, unit: Unit) {
        self.text.push_str(&unit.text);
        self.braille.extend_from_slice(&unit.codes);
        self.units.push(unit);
    }

    fn pop(&mut self) -> Option<Unit> {
        let unit = self.units.pop()?;
        self.text.truncate(self.text.len() - unit.text.len());
        self.braille.truncate(self.braille.len() - unit.codes.len());
        Some(unit)
    }

    fn clear(&mut self) {
        self.units.clear();
        self.text.clear();
        self.braille.clear();
    }
}

/// What a single confirmation did to the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmResult {
    /// Cells appended to the document
    pub braille: Vec<Code>,
    /// Text appended to the document
    pub text: String,
    /// The last indicator or contraction that was committed
    pub resolved: Option<&'static str>,
    /// Cells are buffered waiting for the rest of a sequence
    pub pending: bool,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    mode: Arc<dyn Mode>,
    dots: DotSet,
    document: Document,
    state: ModeState,
    sequence: SequenceState,
    last_resolved: Option<&'static str>,
}

impl EditorState {
    pub fn new(mode: Arc<dyn Mode>) -> Self {
        let state = mode.initial_state();
        EditorState {
            mode,
            dots: DotSet::new(),
            document: Document::default(),
            state,
            sequence: SequenceState::default(),
            last_resolved: None,
        }
    }

    pub fn mode(&self) -> &Arc<dyn Mode> {
        &self.mode
    }

    /// Switch to another mode. Nothing is carried over.
    pub fn set_mode(&mut self, mode: Arc<dyn Mode>) {
        debug!("editor switching to {}", mode.info().id);
        self.mode = mode;
        self.clear_all();
    }

    pub fn add_dot(&mut self, dot: u8) -> Result<(), BrailleError> {
        self.dots.insert(BrailleDot::from_number(dot)?);
        Ok(())
    }

    pub fn remove_dot(&mut self, dot: u8) -> Result<(), BrailleError> {
        self.dots.remove(BrailleDot::from_number(dot)?);
        Ok(())
    }

    pub fn clear_dots(&mut self) {
        self.dots.clear();
    }

    /// The dots of the current chord, ascending
    pub fn dots(&self) -> Vec<u8> {
        self.dots.numbers()
    }

    pub fn has_active_dots(&self) -> bool {
        !self.dots.is_empty()
    }

    pub fn current_code(&self) -> Code {
        self.dots.code()
    }

    pub fn current_glyph(&self) -> char {
        self.current_code().to_glyph()
    }

    /// How the current chord would read if it were confirmed on its own
    pub fn preview_text(&self) -> String {
        self.mode.code_to_text(self.current_code(), &self.context())
    }

    /// Confirm the current chord. An empty chord is a space.
    pub fn confirm(&mut self) -> ConfirmResult {
        let code = self.dots.code();
        self.dots.clear();
        self.confirm_code(code)
    }

    pub fn confirm_code(&mut self, code: Code) -> ConfirmResult {
        let text_len = self.document.text.len();
        let braille_len = self.document.braille.len();
        self.last_resolved = None;

        self.push_code(code);

        ConfirmResult {
            braille: self.document.braille[braille_len..].to_vec(),
            text: self.document.text[text_len..].to_string(),
            resolved: self.last_resolved,
            pending: self.sequence.is_active(),
        }
    }

    /// Settle any buffered cells as if a word boundary followed them
    pub fn flush(&mut self) {
        while self.sequence.is_active() {
            let codes = self.sequence.take();
            self.settle(&codes, Some(Code::SPACE));
        }
    }

    pub fn add_newline(&mut self) {
        self.flush();
        let text = "\n".to_string();
        self.state = self.mode.update_state(&self.state, Code::SPACE, &text);
        self.document.push(Unit {
            codes: vec![Code::SPACE],
            text,
            kind: UnitKind::Newline,
        });
    }

    /// Delete the last buffered cell or, without a pending sequence, the last unit of the
    /// document. Returns `false` if there was nothing to delete.
    pub fn delete_last_char(&mut self) -> bool {
        if self.sequence.is_active() {
            self.sequence.pop();
            return true;
        }
        if self.document.pop().is_none() {
            return false;
        }
        self.state = self.replay_state();
        true
    }

    /// Drop the pending sequence without writing anything
    pub fn cancel_pending_indicator(&mut self) -> bool {
        let active = self.sequence.is_active();
        if active {
            debug!("cancelling pending {:?}", self.sequence.pending_codes());
            self.sequence.clear();
        }
        active
    }

    pub fn clear_all(&mut self) {
        self.dots.clear();
        self.document.clear();
        self.state = self.mode.initial_state();
        self.sequence.clear();
        self.last_resolved = None;
    }

    /// Manual capital toggle, off, next letter, locked
    pub fn cycle_capital_mode(&mut self) -> CapitalMode {
        self.state.capital_mode = self.state.capital_mode.cycle();
        self.state.capital_mode
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn braille(&self) -> &[Code] {
        self.document.braille()
    }

    pub fn braille_string(&self) -> String {
        self.document.braille_string()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty() && !self.sequence.is_active()
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn text_len(&self) -> usize {
        self.document.text.chars().count()
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn is_pending_indicator(&self) -> bool {
        self.sequence.is_active()
    }

    pub fn pending_codes(&self) -> &[Code] {
        self.sequence.pending_codes()
    }

    pub fn sequence_depth(&self) -> usize {
        self.sequence.depth()
    }

    pub fn last_resolved(&self) -> Option<&'static str> {
        self.last_resolved
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(&self.document.text, &self.document.braille, self.state)
    }

    fn push_code(&mut self, code: Code) {
        let mode = Arc::clone(&self.mode);
        let matcher = SequenceMatcher::new(mode.as_ref());
        if !self.sequence.is_active() && !matcher.starts_sequence(code) {
            self.commit_cell(code);
            return;
        }
        self.sequence.push(code);
        if matcher.can_extend(self.sequence.pending_codes()) {
            trace!("deferring {}", Cells(self.sequence.pending_codes()));
            return;
        }
        let codes = self.sequence.take();
        self.settle(&codes, None);
    }

    /// Commit the longest resolvable prefix of `codes` and replay the rest. `lookahead` may
    /// help a resolver decide but is never committed.
    fn settle(&mut self, codes: &[Code], lookahead: Option<Code>) {
        let Some((&first, rest)) = codes.split_first() else {
            return;
        };
        let mode = Arc::clone(&self.mode);
        let matcher = SequenceMatcher::new(mode.as_ref());
        let mut window = codes.to_vec();
        window.extend(lookahead);
        let resolved = matcher.longest_match(&window, &self.context(), codes.len());
        match resolved {
            Some(result) => {
                let (consumed, trailing) = codes.split_at(result.consumed);
                debug!("committing {} for {}", result.name, Cells(consumed));
                self.commit_sequence(consumed.to_vec(), result);
                for &code in trailing {
                    self.push_code(code);
                }
            }
            None => {
                debug!("no sequence in {}, replaying", Cells(codes));
                self.commit_cell(first);
                for &code in rest {
                    self.push_code(code);
                }
            }
        }
    }

    fn commit_cell(&mut self, code: Code) {
        let text = self.mode.code_to_text(code, &self.context());
        if text.is_empty() {
            if let Some(indicator) = self.mode.indicator(&[code]) {
                self.last_resolved = Some(indicator.name);
            }
        }
        self.state = self.mode.update_state(&self.state, code, &text);
        self.document.push(Unit {
            codes: vec![code],
            text,
            kind: UnitKind::Cell(code),
        });
    }

    fn commit_sequence(&mut self, codes: Vec<Code>, result: SequenceResult) {
        self.state = self.mode.apply_sequence(&self.state, &result);
        self.last_resolved = Some(result.name);
        self.document.push(Unit {
            codes,
            text: result.text.clone(),
            kind: UnitKind::Sequence(result),
        });
    }

    /// Derive the state from scratch for the current document
    fn replay_state(&self) -> ModeState {
        let mut state = self.mode.initial_state();
        for unit in &self.document.units {
            state = match &unit.kind {
                UnitKind::Cell(code) => self.mode.update_state(&state, *code, &unit.text),
                UnitKind::Sequence(result) => self.mode.apply_sequence(&state, result),
                UnitKind::Newline => self.mode.update_state(&state, Code::SPACE, &unit.text),
            };
        }
        state.number_mode = self.mode.recalculate_number_mode(&self.document.braille);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braille::braille_cells;
    use crate::mode::ueb::{CAPITAL_SIGN, Grade1, Grade2};

    const A: Code = Code::lit(0x01);

    fn grade1() -> EditorState {
        EditorState::new(Arc::new(Grade1::new()))
    }

    fn grade2() -> EditorState {
        EditorState::new(Arc::new(Grade2::new()))
    }

    fn type_cells(editor: &mut EditorState, cells: &str) {
        for code in braille_cells(cells).unwrap() {
            editor.confirm_code(code);
        }
    }

    #[test]
    fn chords() {
        let mut editor = grade1();
        editor.add_dot(2).unwrap();
        editor.add_dot(1).unwrap();
        editor.add_dot(5).unwrap();
        editor.remove_dot(2).unwrap();
        assert_eq!(editor.dots(), vec![1, 5]);
        assert_eq!(editor.current_glyph(), '⠑');
        assert_eq!(editor.preview_text(), "e");
        assert_eq!(editor.add_dot(7), Err(BrailleError::InvalidDot(7)));

        let result = editor.confirm();
        assert_eq!(result.text, "e");
        assert_eq!(result.braille, vec![Code::lit(0x11)]);
        assert!(!result.pending);
        assert!(!editor.has_active_dots());

        // an empty chord is a space
        assert_eq!(editor.confirm().text, " ");
        assert_eq!(editor.text(), "e ");
    }

    #[test]
    fn letters() {
        let mut editor = grade1();
        type_cells(&mut editor, "125-15-123-123-135");
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.braille_string(), "⠓⠑⠇⠇⠕");
        assert_eq!(editor.len(), 5);
    }

    #[test]
    fn numbers() {
        let mut editor = grade1();
        let codes = editor.mode().text_to_braille("1205");
        for code in codes {
            editor.confirm_code(code);
        }
        editor.flush();
        assert_eq!(editor.text(), "1205");
        assert!(editor.state().number_mode);

        type_cells(&mut editor, "0-1");
        assert_eq!(editor.text(), "1205 a");
        assert!(!editor.state().number_mode);
    }

    #[test]
    fn number_ends_on_letter_sign_and_late_letters() {
        let mut editor = grade1();
        type_cells(&mut editor, "3456-1-5-1");
        assert_eq!(editor.text(), "1a");
        type_cells(&mut editor, "0-3456-12-13");
        assert_eq!(editor.text(), "1a 2k");
    }

    #[test]
    fn capital_passage_is_greedy() {
        let mut editor = grade1();
        assert!(editor.confirm_code(CAPITAL_SIGN).pending);
        assert!(editor.confirm_code(CAPITAL_SIGN).pending);
        let result = editor.confirm_code(CAPITAL_SIGN);
        assert!(!result.pending);
        assert_eq!(result.resolved, Some("CAPITAL_PASSAGE"));
        assert_eq!(result.braille, vec![CAPITAL_SIGN; 3]);
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.state().capital_mode, CapitalMode::Passage);

        type_cells(&mut editor, "1-0-2");
        assert_eq!(editor.text(), "A ,");
        type_cells(&mut editor, "6-3-0-1");
        assert_eq!(editor.text(), "A , a");
    }

    #[test]
    fn capital_word_then_letter() {
        let mut editor = grade1();
        editor.confirm_code(CAPITAL_SIGN);
        editor.confirm_code(CAPITAL_SIGN);
        let result = editor.confirm_code(A);
        assert_eq!(result.resolved, Some("CAPITAL_WORD"));
        assert_eq!(result.text, "A");
        assert_eq!(result.braille, vec![CAPITAL_SIGN, CAPITAL_SIGN, A]);
        assert!(!result.pending);

        type_cells(&mut editor, "12-0-14");
        assert_eq!(editor.text(), "AB c");
    }

    #[test]
    fn capital_letter_then_letters() {
        let mut editor = grade1();
        type_cells(&mut editor, "6-1-12");
        assert_eq!(editor.text(), "Ab");
        assert_eq!(editor.len(), 3);
    }

    #[test]
    fn cancellation() {
        let mut editor = grade1();
        type_cells(&mut editor, "1");
        let before = editor.document().clone();
        let state = *editor.state();

        assert!(editor.confirm_code(CAPITAL_SIGN).pending);
        assert!(editor.is_pending_indicator());
        assert_eq!(editor.pending_codes(), &[CAPITAL_SIGN]);

        assert!(editor.cancel_pending_indicator());
        assert!(!editor.is_pending_indicator());
        assert_eq!(editor.document(), &before);
        assert_eq!(editor.state(), &state);
        assert!(!editor.cancel_pending_indicator());
    }

    #[test]
    fn typeform_indicators() {
        let mut editor = grade1();
        let result = editor.confirm_code(Code::lit(0x18));
        assert!(result.pending);
        let result = editor.confirm_code(A);
        assert_eq!(result.resolved, Some("BOLD_WORD"));
        assert_eq!(result.text, "");
        assert!(editor.state().typeform.is_some());
        type_cells(&mut editor, "1-0");
        assert_eq!(editor.state().typeform, None);
        assert_eq!(editor.text(), "a ");
    }

    #[test]
    fn unmatched_prefix_is_replayed() {
        let mut editor = grade1();
        // dots 46 followed by a space is a closing quotation mark
        type_cells(&mut editor, "1-46-0");
        assert_eq!(editor.text(), "a\" ");
        assert!(!editor.is_pending_indicator());
    }

    #[test]
    fn whole_words() {
        let mut editor = grade2();
        type_cells(&mut editor, "1246");
        assert!(editor.is_pending_indicator());
        assert_eq!(editor.text(), "");
        type_cells(&mut editor, "0");
        assert_eq!(editor.text(), "and ");

        // letters on both sides: plain grade 1 reading
        editor.clear_all();
        type_cells(&mut editor, "1-125-1-0");
        assert_eq!(editor.text(), "aha ");

        // a whole-word cell without a letter meaning shows its glyph
        editor.clear_all();
        type_cells(&mut editor, "1-1246-1");
        editor.flush();
        assert_eq!(editor.text(), "a⠯a");
    }

    #[test]
    fn whole_word_before_punctuation_and_at_end() {
        let mut editor = grade2();
        type_cells(&mut editor, "6-2346-256");
        editor.flush();
        assert_eq!(editor.text(), "The.");

        editor.clear_all();
        type_cells(&mut editor, "125");
        editor.flush();
        assert_eq!(editor.text(), "have");
        assert!(!editor.is_pending_indicator());
    }

    #[test]
    fn grade_1_indicator() {
        let mut editor = grade2();
        type_cells(&mut editor, "56-14-0");
        assert_eq!(editor.text(), "c ");
        type_cells(&mut editor, "14-0");
        assert_eq!(editor.text(), "c can ");
    }

    #[test]
    fn contractions_in_words() {
        let mut editor = grade2();
        // part-word contractions never start a word
        type_cells(&mut editor, "1456-15");
        assert_eq!(editor.text(), "⠹e");
        editor.clear_all();
        type_cells(&mut editor, "5-124-0-23-0-1256-0");
        assert_eq!(editor.text(), "father be out ");
        editor.clear_all();
        type_cells(&mut editor, "23-1234-15-1345");
        editor.flush();
        assert_eq!(editor.text(), "bepen");
        editor.clear_all();
        type_cells(&mut editor, "1345-1-56-1345");
        editor.flush();
        assert_eq!(editor.text(), "nation");
        editor.clear_all();
        type_cells(&mut editor, "12-1-34-0");
        assert_eq!(editor.text(), "bast ");
    }

    #[test]
    fn positional_letter_contractions() {
        let mut editor = grade2();
        // an initial-letter contraction cannot follow a letter
        type_cells(&mut editor, "1-5-145");
        editor.flush();
        assert_eq!(editor.text(), "ad");
        // a final-letter contraction has to end the word, dots 56 then is the grade 1 indicator
        editor.clear_all();
        type_cells(&mut editor, "1345-1-56-1345-234");
        editor.flush();
        assert_eq!(editor.text(), "nans");
        editor.clear_all();
        type_cells(&mut editor, "1345-1-56-1345-256");
        assert_eq!(editor.text(), "nation.");
        assert!(!editor.is_pending_indicator());
        // and reads back what the encoder writes
        for word in ["aday", "nations", "nation."] {
            editor.clear_all();
            for code in editor.mode().text_to_braille(word) {
                editor.confirm_code(code);
            }
            editor.flush();
            assert_eq!(editor.text(), word);
        }
    }

    #[test]
    fn newline() {
        let mut editor = grade2();
        type_cells(&mut editor, "2346");
        editor.add_newline();
        type_cells(&mut editor, "3456-1");
        assert_eq!(editor.text(), "the\n1");
        assert_eq!(editor.braille_string(), "⠮\n⠼⠁");
        assert!(editor.delete_last_char());
        assert!(editor.delete_last_char());
        assert!(editor.delete_last_char());
        assert_eq!(editor.text(), "the");
        assert!(!editor.state().at_word_start);
    }

    #[test]
    fn delete() {
        let mut editor = grade1();
        assert!(!editor.delete_last_char());
        type_cells(&mut editor, "3456-1-2");
        assert!(editor.delete_last_char());
        assert_eq!(editor.text(), "1");
        assert!(editor.state().number_mode);

        // a pending cell goes first
        editor.confirm_code(CAPITAL_SIGN);
        assert!(editor.delete_last_char());
        assert!(!editor.is_pending_indicator());
        assert_eq!(editor.text(), "1");
    }

    fn assert_deletion_is_deterministic(make: fn() -> EditorState, cells: &str) {
        let codes = braille_cells(cells).unwrap();
        for n in 1..=codes.len() {
            let mut editor = make();
            for &code in &codes[..n] {
                editor.confirm_code(code);
            }
            if editor.is_pending_indicator() {
                continue;
            }
            assert!(editor.delete_last_char());

            let mut fresh = make();
            for &code in editor.braille() {
                fresh.confirm_code(code);
            }
            if fresh.is_pending_indicator() {
                continue;
            }
            assert_eq!(fresh.text(), editor.text(), "after {n} cells");
            assert_eq!(fresh.state(), editor.state(), "after {n} cells");
        }
    }

    #[test]
    fn deletion_determinism() {
        let cells = "6-6-1-12-0-3456-1-12-5-1-0-46-12-0-6-1-3456-1-2-15-0-45-1-2-0-6-4-0-1";
        assert_deletion_is_deterministic(grade1, cells);
        let cells = "6-1246-0-1456-15-0-56-14-0-5-124-0-3456-1-0-125-1-46-15-0-23-1-3";
        assert_deletion_is_deterministic(grade2, cells);
    }

    #[test]
    fn set_mode_resets() {
        let mut editor = grade1();
        type_cells(&mut editor, "3456-1");
        editor.confirm_code(CAPITAL_SIGN);
        editor.set_mode(Arc::new(Grade2::new()));
        assert!(editor.is_empty());
        assert_eq!(editor.state(), &editor.mode().initial_state());
        assert_eq!(editor.mode().info().id, "ueb2");
    }

    #[test]
    fn manual_capitals() {
        let mut editor = grade1();
        assert_eq!(editor.cycle_capital_mode(), CapitalMode::NextLetter);
        type_cells(&mut editor, "1-1");
        assert_eq!(editor.text(), "Aa");
        editor.cycle_capital_mode();
        assert_eq!(editor.cycle_capital_mode(), CapitalMode::Passage);
        type_cells(&mut editor, "1-0-1");
        assert_eq!(editor.text(), "AaA A");
        assert_eq!(editor.cycle_capital_mode(), CapitalMode::Off);
    }
}
