use std::collections::HashMap;

use crate::braille::Code;
use crate::mode::ContractionClass;

use super::boundaries::{word_end, word_start};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Boundary {
    Word,
    NotWord,
    None,
}

/// A stretch of (lowercase) text and the cells it contracts to
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Translation {
    pub from: String,
    pub to: Vec<Code>,
    pub class: ContractionClass,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum Transition {
    Character(char),
    Start(Boundary),
    End(Boundary),
}

#[derive(Default, Debug)]
struct TrieNode {
    translation: Option<Translation>,
    transitions: HashMap<Transition, TrieNode>,
}

impl TrieNode {
    fn char_transition(&self, c: char) -> Option<&TrieNode> {
        self.transitions.get(&Transition::Character(c))
    }
    fn start_transition(&self, boundary: Boundary) -> Option<&TrieNode> {
        self.transitions.get(&Transition::Start(boundary))
    }
    fn end_transition(&self, boundary: Boundary) -> Option<&TrieNode> {
        self.transitions.get(&Transition::End(boundary))
    }
}

#[derive(Default, Debug)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            root: TrieNode::default(),
        }
    }

    pub fn insert(
        &mut self,
        from: String,
        to: Vec<Code>,
        class: ContractionClass,
        before: Boundary,
        after: Boundary,
    ) {
        let mut current_node = &mut self.root;

        if before != Boundary::None {
            current_node = current_node
                .transitions
                .entry(Transition::Start(before))
                .or_default();
        }

        for c in from.chars() {
            current_node = current_node
                .transitions
                .entry(Transition::Character(c))
                .or_default();
        }

        if after != Boundary::None {
            current_node = current_node
                .transitions
                .entry(Transition::End(after))
                .or_default();
        }

        current_node.translation = Some(Translation { from, to, class });
    }

    fn find_translations_from_node<'a>(
        &'a self,
        input: &str,
        node: &'a TrieNode,
    ) -> Vec<&'a Translation> {
        let mut current_node = node;
        let mut matching_rules = Vec::new();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match current_node.char_transition(c) {
                Some(node) => current_node = node,
                None => break,
            }
            if let Some(ref translation) = current_node.translation {
                matching_rules.push(translation);
            }
            let at_end = word_end(Some(c), chars.peek().copied());
            let end = if at_end {
                Boundary::Word
            } else {
                Boundary::NotWord
            };
            if let Some(node) = current_node.end_transition(end) {
                if let Some(ref translation) = node.translation {
                    matching_rules.push(translation);
                }
            }
        }
        matching_rules
    }

    /// All translations matching at the start of `input`, shortest first
    ///
    /// `before` is the character preceding `input`, it decides whether the match starts a word.
    pub fn find_translations(&self, input: &str, before: Option<char>) -> Vec<&Translation> {
        let start = if word_start(before, input.chars().next()) {
            Boundary::Word
        } else {
            Boundary::NotWord
        };

        let mut matching_rules = match self.root.start_transition(start) {
            Some(node) => self.find_translations_from_node(input, node),
            None => Vec::new(),
        };
        matching_rules.extend(self.find_translations_from_node(input, &self.root));
        matching_rules.sort_by_key(|translation| translation.from.len());
        matching_rules
    }
}
