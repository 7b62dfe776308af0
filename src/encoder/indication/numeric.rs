//! Numeric braille indication
//!
//! [`Indicator`] is a simple state machine to keep track of the state of an encoding. As soon as a
//! character is encountered that is in the set of [`Indicator::numeric_chars`] the state is
//! changed to [`State::Numeric`]. A letter or whitespace changes the state back to
//! [`State::Default`], any other character leaves it alone.
//!
//! The end of a number is only indicated when the character ending it is in the set of
//! [`Indicator::terminating_chars`]: letters that would otherwise be read as digits.

use crate::encoder::indication::Indication;

use std::collections::HashSet;

/// Possible states for the [`Indicator`] state machine
#[derive(Debug, Clone, PartialEq)]
enum State {
    Default,
    Numeric,
}

/// A builder for [`Indicator`]
#[derive(Debug)]
pub struct IndicatorBuilder(Indicator);

impl IndicatorBuilder {
    pub fn new() -> Self {
        IndicatorBuilder(Indicator {
            state: State::Default,
            numeric_chars: HashSet::default(),
            terminating_chars: HashSet::default(),
        })
    }

    pub fn build(self) -> Indicator {
        self.0
    }

    pub fn numeric_characters(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.0.numeric_chars = chars.into_iter().collect();
        self
    }

    pub fn terminating_characters(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.0.terminating_chars = chars.into_iter().collect();
        self
    }
}

/// A very simple state machine to keep track when a numeric indication is required
#[derive(Debug, Clone)]
pub struct Indicator {
    state: State,
    /// The set of characters that will trigger a state change to the [`State::Numeric`] mode
    numeric_chars: HashSet<char>,
    /// The characters that will trigger an [`Indication::NumericEnd`] indication
    terminating_chars: HashSet<char>,
}

impl Indicator {
    /// The transition method of the numeric indication state machine.
    ///
    /// Takes a string slice to examine the next character. Returns an [`Indication`] when
    /// transitioning between numeric and non-numeric states or `None` when no state change occurs
    /// or the change needs no indicator.
    pub fn next(&mut self, s: &str) -> Option<Indication> {
        let c = s.chars().next()?;
        match (&self.state, self.numeric_chars.contains(&c)) {
            (State::Default, true) => {
                self.state = State::Numeric;
                Some(Indication::NumericStart)
            }
            (State::Numeric, false) if c.is_alphabetic() || c.is_whitespace() => {
                self.state = State::Default;
                if self.terminating_chars.contains(&c) {
                    Some(Indication::NumericEnd)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.state == State::Numeric
    }
}
