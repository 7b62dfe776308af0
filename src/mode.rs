//! Transliteration modes
//!
//! A [`Mode`] is an immutable strategy object that knows how to turn braille codes into text (and
//! back) under one writing convention. It owns no mutable state: the running [`ModeState`] lives in
//! the [`EditorState`](crate::editor::EditorState) and is handed to the mode through a [`Context`]
//! whenever a code has to be interpreted. Modes are shared as `Arc<dyn Mode>` between editors and
//! the [`ModeRegistry`](crate::registry::ModeRegistry).
//!
//! The only implementations are the two grades of Unified English Braille in [`ueb`].

use std::collections::BTreeMap;
use std::fmt;

use crate::braille::Code;
use crate::sequence::{SequenceResolver, SequenceResult};

pub mod ueb;

/// Descriptive metadata for a mode, as shown by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeInfo {
    /// Stable identifier used for lookup and persistence, e.g. `ueb1`
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// BCP 47 language tag
    pub language: &'static str,
    pub category: Option<&'static str>,
}

/// Capitalisation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CapitalMode {
    #[default]
    Off,
    /// Capitalise the next letter only
    NextLetter,
    /// Capitalise until the end of the current word
    Word,
    /// Capitalise until a capital terminator
    Passage,
}

impl CapitalMode {
    /// The coarse level shown to the user: 0 off, 1 next letter, 2 locked
    pub fn level(self) -> u8 {
        match self {
            CapitalMode::Off => 0,
            CapitalMode::NextLetter => 1,
            CapitalMode::Word | CapitalMode::Passage => 2,
        }
    }

    /// Manual toggle, cycling off, next letter, locked and back to off
    pub fn cycle(self) -> Self {
        match self {
            CapitalMode::Off => CapitalMode::NextLetter,
            CapitalMode::NextLetter => CapitalMode::Passage,
            CapitalMode::Word | CapitalMode::Passage => CapitalMode::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != CapitalMode::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeformKind {
    Italic,
    Bold,
    Underline,
    Script,
}

impl fmt::Display for TypeformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeformKind::Italic => "italic",
            TypeformKind::Bold => "bold",
            TypeformKind::Underline => "underline",
            TypeformKind::Script => "script",
        };
        write!(f, "{name}")
    }
}

/// How far an indicator reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Symbol,
    Word,
    Passage,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Symbol => "symbol",
            Scope::Word => "word",
            Scope::Passage => "passage",
        };
        write!(f, "{name}")
    }
}

/// An active emphasis, e.g. bold for one word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Typeform {
    pub kind: TypeformKind,
    pub scope: Scope,
}

/// The running interpretation state of a document
///
/// Only the editor mutates it, always by replacing it with the value a [`Mode`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeState {
    pub number_mode: bool,
    pub capital_mode: CapitalMode,
    pub typeform: Option<Typeform>,
    /// Nothing but indicators has been written since the last space
    pub at_word_start: bool,
    /// Contractions are recognised. Cleared by the grade 1 indicator until the next space.
    pub contraction_mode: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        ModeState {
            number_mode: false,
            capital_mode: CapitalMode::Off,
            typeform: None,
            at_word_start: true,
            contraction_mode: true,
        }
    }
}

/// What a mode gets to see when it interprets a code
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub preceding_text: &'a str,
    pub preceding_braille: &'a [Code],
    pub state: ModeState,
}

impl<'a> Context<'a> {
    pub fn new(preceding_text: &'a str, preceding_braille: &'a [Code], state: ModeState) -> Self {
        Context {
            preceding_text,
            preceding_braille,
            state,
        }
    }

    /// A context at the very start of an empty document
    pub fn empty(state: ModeState) -> Context<'static> {
        Context {
            preceding_text: "",
            preceding_braille: &[],
            state,
        }
    }

    /// The preceding text is empty or ends in whitespace
    pub fn at_word_boundary(&self) -> bool {
        self.preceding_text
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace)
    }

    pub fn at_word_start(&self) -> bool {
        self.state.at_word_start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Number,
    Letter,
    Capital,
    Italic,
    Bold,
    Underline,
    Script,
    /// Suspends contractions
    Grade1,
}

impl IndicatorKind {
    pub fn typeform(self) -> Option<TypeformKind> {
        match self {
            IndicatorKind::Italic => Some(TypeformKind::Italic),
            IndicatorKind::Bold => Some(TypeformKind::Bold),
            IndicatorKind::Underline => Some(TypeformKind::Underline),
            IndicatorKind::Script => Some(TypeformKind::Script),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorAction {
    Start,
    End,
    Symbol,
    Word,
    Passage,
}

impl IndicatorAction {
    pub fn scope(self) -> Option<Scope> {
        match self {
            IndicatorAction::Symbol => Some(Scope::Symbol),
            IndicatorAction::Word => Some(Scope::Word),
            IndicatorAction::Passage => Some(Scope::Passage),
            IndicatorAction::Start | IndicatorAction::End => None,
        }
    }
}

/// A cell or cell sequence that changes how the following cells are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub name: &'static str,
    pub codes: Vec<Code>,
    pub kind: IndicatorKind,
    pub action: IndicatorAction,
}

impl Indicator {
    pub fn new(
        name: &'static str,
        codes: &[Code],
        kind: IndicatorKind,
        action: IndicatorAction,
    ) -> Self {
        Indicator {
            name,
            codes: codes.to_vec(),
            kind,
            action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractionClass {
    WholeWord,
    Lower,
    PartWord,
    InitialLetter,
    FinalLetter,
}

impl fmt::Display for ContractionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractionClass::WholeWord => "whole word",
            ContractionClass::Lower => "lower",
            ContractionClass::PartWord => "part word",
            ContractionClass::InitialLetter => "initial letter",
            ContractionClass::FinalLetter => "final letter",
        };
        write!(f, "{name}")
    }
}

/// Where in a word a contraction may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// A word on its own
    Standalone,
    /// Begins a word
    Start,
    /// Anywhere in a word but its first letter
    Middle,
    /// Ends a word, never begins one
    End,
}

impl Position {
    /// Whether the word boundaries around a contraction allow it
    pub fn admits(self, word_start: bool, word_end: bool) -> bool {
        match self {
            Position::Standalone => word_start && word_end,
            Position::Start => word_start,
            Position::Middle => !word_start,
            Position::End => !word_start && word_end,
        }
    }

    /// Whether the cell after the contraction has to be seen before it can be read
    pub fn needs_word_end(self) -> bool {
        matches!(self, Position::Standalone | Position::End)
    }
}

/// One abbreviation of a contracted mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contraction {
    pub codes: Vec<Code>,
    pub text: &'static str,
    pub class: ContractionClass,
    pub position: Position,
}

/// Apply the capitalisation state to a piece of text
pub fn apply_case(text: &str, capital_mode: CapitalMode) -> String {
    match capital_mode {
        CapitalMode::Off => text.to_string(),
        CapitalMode::NextLetter => {
            let mut chars = text.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        CapitalMode::Word | CapitalMode::Passage => text.to_uppercase(),
    }
}

/// The capability interface every transliteration mode implements
pub trait Mode: fmt::Debug + Send + Sync {
    fn info(&self) -> &ModeInfo;

    /// Interpret a single code in context. Indicators yield an empty string.
    fn code_to_text(&self, code: Code, context: &Context<'_>) -> String;

    /// All letters and punctuation of the mode
    fn alphabet(&self) -> &BTreeMap<Code, char>;

    /// The letters that read as digits in number mode
    fn number_map(&self) -> &BTreeMap<Code, char>;

    fn indicators(&self) -> &[Indicator];

    fn contractions(&self) -> &[Contraction] {
        &[]
    }

    /// Reverse lookup of a single character
    fn text_to_code(&self, c: char) -> Option<Code>;

    /// Whether [`Mode::code_to_text`] depends on more than the mode state
    fn requires_context(&self) -> bool {
        false
    }

    /// Multi-cell resolvers, in priority order
    fn resolvers(&self) -> &[Box<dyn SequenceResolver>];

    fn max_sequence_depth(&self) -> usize {
        3
    }

    fn initial_state(&self) -> ModeState {
        ModeState::default()
    }

    /// The state after a single code producing `text` has been confirmed
    fn update_state(&self, state: &ModeState, code: Code, text: &str) -> ModeState;

    /// The state after a resolved sequence has been committed
    fn apply_sequence(&self, state: &ModeState, result: &SequenceResult) -> ModeState;

    /// Whether the end of `braille` is still inside a number
    fn recalculate_number_mode(&self, braille: &[Code]) -> bool;

    /// Batch encoding of plain text
    fn text_to_braille(&self, text: &str) -> Vec<Code>;

    fn is_letter(&self, code: Code) -> bool {
        self.alphabet()
            .get(&code)
            .is_some_and(|c| c.is_alphabetic())
    }

    fn is_letter_a_to_j(&self, code: Code) -> bool {
        self.number_map().contains_key(&code)
    }

    /// The indicator spelled by exactly `codes`, if any
    fn indicator(&self, codes: &[Code]) -> Option<&Indicator> {
        self.indicators().iter().find(|i| i.codes == codes)
    }
}
