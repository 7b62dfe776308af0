//! Uppercase braille indication
//!
//! [`Indicator`] is a simple state machine to keep track of capitals. At the start of every run of
//! non-whitespace characters it looks ahead: a run with at least two letters that are all
//! uppercase is marked once with [`Indication::UppercaseWord`] in front of its first letter. In any
//! other run each uppercase letter gets its own [`Indication::UppercaseLetter`]. Whitespace ends
//! the run.

use crate::encoder::boundaries::after_space;
use crate::encoder::indication::Indication;

/// Possible states for the [`Indicator`] state machine
#[derive(Debug, Clone, PartialEq)]
enum State {
    Default,
    PendingWord,
    Word,
}

#[derive(Debug, Clone)]
pub struct Indicator {
    state: State,
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator {
    pub fn new() -> Self {
        Indicator {
            state: State::Default,
        }
    }

    /// The transition method of the uppercase indication state machine.
    ///
    /// `s` is the remaining text, `prev` the character encoded before it.
    pub fn next(&mut self, s: &str, prev: Option<char>) -> Option<Indication> {
        let c = s.chars().next()?;
        if c.is_whitespace() {
            self.state = State::Default;
            return None;
        }
        if after_space(prev) && capitalised_word(s) {
            self.state = State::PendingWord;
        }
        match (&self.state, c.is_uppercase()) {
            (State::PendingWord, true) => {
                self.state = State::Word;
                Some(Indication::UppercaseWord)
            }
            (State::Default, true) => Some(Indication::UppercaseLetter),
            _ => None,
        }
    }

    /// Whether the current run is marked as a capitalised word
    pub fn in_word(&self) -> bool {
        self.state == State::Word
    }
}

fn capitalised_word(s: &str) -> bool {
    let run = s.split(char::is_whitespace).next().unwrap_or_default();
    let letters: Vec<char> = run.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}
