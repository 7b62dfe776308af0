//! A typing session: the registry, the editor and the commands that drive them
//!
//! Keyboards, screens and speech output talk to a [`Session`] only. They feed it [`Command`]s and
//! render the [`Status`] it reports back.

use std::sync::Arc;

use crate::braille::{BrailleError, Cells, Code};
use crate::editor::EditorState;
use crate::mode::{CapitalMode, Mode, ModeInfo, Typeform};
use crate::registry::{ModeRegistry, RegistryError};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Braille(#[from] BrailleError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Press a dot of the chord
    AddDot(u8),
    /// Release a dot of the chord
    RemoveDot(u8),
    /// Write the chord, an empty chord is a space
    Confirm,
    Delete,
    Newline,
    Clear,
    /// Drop a pending sequence, or the chord when there is none
    Cancel,
    CycleMode,
    CycleCapital,
    SetMode(String),
}

/// Everything a front end needs to render the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub mode: ModeInfo,
    pub text: String,
    pub braille: String,
    pub dots: Vec<u8>,
    pub glyph: char,
    pub preview: String,
    pub pending: Vec<Code>,
    pub number_mode: bool,
    pub capital_mode: CapitalMode,
    /// 0 off, 1 next letter, 2 word or passage
    pub capital_level: u8,
    pub typeform: Option<Typeform>,
    pub last_resolved: Option<&'static str>,
}

#[derive(Debug)]
pub struct Session {
    registry: ModeRegistry,
    editor: EditorState,
}

impl Session {
    /// Start in the persisted mode, or in `default_mode` if none is persisted
    pub fn new(mut registry: ModeRegistry, default_mode: &str) -> Result<Self, SessionError> {
        let id = registry.load_preference(default_mode);
        let mode = registry.set_mode(&id)?;
        Ok(Session {
            editor: EditorState::new(mode),
            registry,
        })
    }

    pub fn handle(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::AddDot(dot) => self.editor.add_dot(dot)?,
            Command::RemoveDot(dot) => self.editor.remove_dot(dot)?,
            Command::Confirm => {
                self.editor.confirm();
            }
            Command::Delete => {
                self.editor.delete_last_char();
            }
            Command::Newline => self.editor.add_newline(),
            Command::Clear => self.editor.clear_all(),
            Command::Cancel => {
                if !self.editor.cancel_pending_indicator() {
                    self.editor.clear_dots();
                }
            }
            Command::CycleMode => {
                let mode = self.registry.cycle_next()?;
                self.switch(mode);
            }
            Command::CycleCapital => {
                self.editor.cycle_capital_mode();
            }
            Command::SetMode(id) => {
                let mode = self.registry.set_mode(&id)?;
                self.switch(mode);
            }
        }
        Ok(())
    }

    fn switch(&mut self, mode: Arc<dyn Mode>) {
        self.editor.set_mode(mode);
    }

    /// Type a whole chord and confirm it
    pub fn type_chord(&mut self, dots: &[u8]) -> Result<(), SessionError> {
        for &dot in dots {
            self.handle(Command::AddDot(dot))?;
        }
        self.handle(Command::Confirm)
    }

    pub fn status(&self) -> Status {
        let state = self.editor.state();
        Status {
            mode: self.editor.mode().info().clone(),
            text: self.editor.text().to_string(),
            braille: self.editor.braille_string(),
            dots: self.editor.dots(),
            glyph: self.editor.current_glyph(),
            preview: self.editor.preview_text(),
            pending: self.editor.pending_codes().to_vec(),
            number_mode: state.number_mode,
            capital_mode: state.capital_mode,
            capital_level: state.capital_mode.level(),
            typeform: state.typeform,
            last_resolved: self.editor.last_resolved(),
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    /// Settle pending cells and return the document
    pub fn finish(&mut self) -> (String, String) {
        self.editor.flush();
        (
            self.editor.text().to_string(),
            Cells(self.editor.braille()).to_string(),
        )
    }
}
