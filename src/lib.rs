//! Six-key braille writing for Unified English Braille
//!
//! Dots typed on a chord keyboard are confirmed cell by cell into an [`EditorState`], which
//! resolves multi-cell indicators and contractions with the [`Mode`] it is given. A mode also
//! encodes print back into braille in one go. Modes live in a [`ModeRegistry`], and a
//! [`Session`] ties the registry and the editor together for a front end.

use braille::{BrailleError, Cells, parse_cells};

pub mod braille;
pub mod editor;
pub mod encoder;
pub mod mode;
pub mod registry;
pub mod sequence;
pub mod session;
pub mod yaml;

pub use braille::Code;
pub use editor::EditorState;
pub use mode::{Mode, ModeInfo};
pub use registry::{ModeRegistry, RegistryError};
pub use session::{Command, Session, Status};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TranslationError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Braille(#[from] BrailleError),
}

/// Translate print to braille glyphs with the mode `mode_id`
pub fn translate(mode_id: &str, input: &str) -> Result<String, TranslationError> {
    let registry = ModeRegistry::with_default_modes()?;
    let mode = registry
        .mode_by_id(mode_id)
        .ok_or_else(|| RegistryError::UnknownMode(mode_id.to_string()))?;
    Ok(Cells(&mode.text_to_braille(input)).to_string())
}

/// Translate braille, as glyphs or dot notation, back to print with the mode `mode_id`
pub fn back_translate(mode_id: &str, input: &str) -> Result<String, TranslationError> {
    let registry = ModeRegistry::with_default_modes()?;
    let mode = registry
        .mode_by_id(mode_id)
        .cloned()
        .ok_or_else(|| RegistryError::UnknownMode(mode_id.to_string()))?;
    let mut editor = EditorState::new(mode);
    for code in parse_cells(input)? {
        editor.confirm_code(code);
    }
    editor.flush();
    Ok(editor.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_both_ways() {
        assert_eq!(translate("ueb1", "hello"), Ok("⠓⠑⠇⠇⠕".to_string()));
        assert_eq!(translate("ueb2", "and the"), Ok("⠯⠀⠮".to_string()));
        assert_eq!(back_translate("ueb2", "⠯⠀⠮"), Ok("and the".to_string()));
        assert_eq!(back_translate("ueb1", "3456-1-2"), Ok("12".to_string()));
    }

    #[test]
    fn errors() {
        assert_eq!(
            translate("nemeth", "x"),
            Err(TranslationError::Registry(RegistryError::UnknownMode(
                "nemeth".into()
            )))
        );
        assert_eq!(
            back_translate("ueb1", "1-1x"),
            Err(TranslationError::Braille(BrailleError::InvalidBraille {
                character: Some('x')
            }))
        );
    }
}
