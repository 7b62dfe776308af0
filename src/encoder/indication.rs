//! Braille indication
//!
//! Braille indicators are cells which are inserted into the braille text to indicate such things
//! as capitalization or numbers.
//!
//! Indication is handled with the help of simple state machines that keep track in which state
//! an encoding currently is. When given the remaining text to encode, they keep track of state
//! changes and notify the caller whether an indicator is required by optionally returning an
//! [`Indication`].
//!
//! * [`numeric::Indicator`]: knows whether the encoding is in numeric mode
//! * [`uppercase::Indicator`]: knows whether a capital letter or a capitalised word needs marking

pub mod numeric;
pub mod uppercase;

/// Possible indication events that the indicator state machine(s) support
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Indication {
    NumericStart,
    NumericEnd,
    UppercaseLetter,
    UppercaseWord,
}
