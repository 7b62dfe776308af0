use std::collections::{BTreeMap, BTreeSet};

use crate::braille::Code;
use crate::encoder::Encoder;
use crate::mode::{
    Context, Contraction, ContractionClass, Indicator, IndicatorAction, IndicatorKind, Mode,
    ModeInfo, ModeState, Position, apply_case,
};
use crate::sequence::{SequenceEffect, SequenceResolver, SequenceResult};

use super::contractions;
use super::grade1::{Grade1, indicator_resolvers};
use super::{CATEGORY_ID, GRADE_1_INDICATOR, is_word_boundary};

fn contraction(
    name: &'static str,
    context: &Context<'_>,
    class: ContractionClass,
    consumed: usize,
) -> SequenceResult {
    SequenceResult {
        name,
        text: apply_case(name, context.state.capital_mode),
        effect: SequenceEffect::Contraction(class),
        consumed,
    }
}

fn contracting(context: &Context<'_>) -> bool {
    !context.state.number_mode && context.state.contraction_mode
}

/// The multi-cell reading of one class of contractions. Whole-word and final-letter contractions
/// have to end a word, so the cell after them is read as lookahead and left unconsumed.
#[derive(Debug)]
struct ContractionResolver {
    class: ContractionClass,
    entries: BTreeMap<Vec<Code>, (&'static str, Position)>,
    prefixes: BTreeSet<Code>,
    /// Cells spelling one contraction
    cells: usize,
    lookahead: bool,
}

impl ContractionResolver {
    fn new(class: ContractionClass, contractions: &[Contraction]) -> Self {
        let entries: BTreeMap<Vec<Code>, (&'static str, Position)> = contractions
            .iter()
            .filter(|c| c.class == class)
            .map(|c| (c.codes.clone(), (c.text, c.position)))
            .collect();
        ContractionResolver {
            class,
            prefixes: entries.keys().filter_map(|codes| codes.first().copied()).collect(),
            cells: entries.keys().map(Vec::len).max().unwrap_or(1),
            lookahead: entries.values().any(|(_, position)| position.needs_word_end()),
            entries,
        }
    }
}

impl SequenceResolver for ContractionResolver {
    fn min_cells(&self) -> usize {
        self.max_cells()
    }

    fn max_cells(&self) -> usize {
        self.cells + usize::from(self.lookahead)
    }

    fn prefix_codes(&self) -> &BTreeSet<Code> {
        &self.prefixes
    }

    fn resolve(&self, codes: &[Code], context: &Context<'_>) -> Option<SequenceResult> {
        if codes.len() != self.max_cells() || !contracting(context) {
            return None;
        }
        let (spelling, next) = codes.split_at(self.cells);
        let &(text, position) = self.entries.get(spelling)?;
        let word_end = next.first().is_some_and(|&code| is_word_boundary(code));
        if !position.admits(context.at_word_boundary(), word_end) {
            return None;
        }
        Some(contraction(text, context, self.class, self.cells))
    }

    fn accepts_more(&self, codes: &[Code]) -> bool {
        let spelling = &codes[..codes.len().min(self.cells)];
        codes.len() < self.max_cells() && self.entries.keys().any(|k| k.starts_with(spelling))
    }
}

/// Contracted Unified English Braille
#[derive(Debug)]
pub struct Grade2 {
    info: ModeInfo,
    grade1: Grade1,
    indicators: Vec<Indicator>,
    contractions: Vec<Contraction>,
    lower: BTreeMap<Code, &'static str>,
    part_word: BTreeMap<Code, &'static str>,
    resolvers: Vec<Box<dyn SequenceResolver>>,
    encoder: Encoder,
}

impl Grade2 {
    pub fn new() -> Self {
        let grade1 = Grade1::new();
        let contractions = contractions::contractions();

        let mut indicators = grade1.indicators().to_vec();
        indicators.push(Indicator::new(
            "GRADE_1_WORD",
            &[GRADE_1_INDICATOR],
            IndicatorKind::Grade1,
            IndicatorAction::Word,
        ));

        let single = |class: ContractionClass| -> BTreeMap<Code, &'static str> {
            contractions
                .iter()
                .filter(|c| c.class == class)
                .map(|c| (c.codes[0], c.text))
                .collect()
        };
        let lower = single(ContractionClass::Lower);
        let part_word = single(ContractionClass::PartWord);

        let mut resolvers = indicator_resolvers(&indicators);
        for class in [
            ContractionClass::WholeWord,
            ContractionClass::InitialLetter,
            ContractionClass::FinalLetter,
        ] {
            resolvers.push(Box::new(ContractionResolver::new(class, &contractions)));
        }

        Grade2 {
            info: ModeInfo {
                id: "ueb2",
                name: "UEB Grade 2",
                description: "Unified English Braille, contracted",
                language: "en",
                category: Some(CATEGORY_ID),
            },
            encoder: Encoder::new(&contractions),
            grade1,
            indicators,
            contractions,
            lower,
            part_word,
            resolvers,
        }
    }
}

impl Default for Grade2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for Grade2 {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    /// Single cells only ever expand to lower contractions at the start of a word and to
    /// part-word contractions inside one. Whole words need the following cell and are handled
    /// by the sequence resolvers.
    fn code_to_text(&self, code: Code, context: &Context<'_>) -> String {
        if code == GRADE_1_INDICATOR {
            return String::new();
        }
        if contracting(context) {
            let contraction = if context.at_word_start() {
                self.lower.get(&code)
            } else if !context.at_word_boundary() {
                self.part_word.get(&code)
            } else {
                None
            };
            if let Some(text) = contraction {
                return apply_case(text, context.state.capital_mode);
            }
        }
        self.grade1.literal(code, context)
    }

    fn alphabet(&self) -> &BTreeMap<Code, char> {
        self.grade1.alphabet()
    }

    fn number_map(&self) -> &BTreeMap<Code, char> {
        self.grade1.number_map()
    }

    fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    fn contractions(&self) -> &[Contraction] {
        &self.contractions
    }

    fn text_to_code(&self, c: char) -> Option<Code> {
        self.grade1.text_to_code(c)
    }

    fn requires_context(&self) -> bool {
        true
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
