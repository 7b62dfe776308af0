//! Parser for YAML translation test files
//!
//! ```yaml
//! mode: ueb2
//! flags: {testmode: bothDirections}
//! tests:
//!   - [and the, ⠯⠀⠮]
//!   - [description, input, expected, {xfail: true}]
//! ```
//!
//! A file may switch `mode` and `flags` between several `tests` blocks. Every block becomes a
//! [`TestSuite`] with the mode and flags in effect at that point.

use std::{fs::File, iter::Peekable};

use libyaml::{Encoding, Event, Parser, ParserIter};

use crate::test::{Direction, Directions, ExpectedFailure, Test, TestMode, TestSuite};

type YAMLEventError = Option<Result<Event, libyaml::ParserError>>;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Scalar expected, got {0:?}")]
    ScalarExpected(YAMLEventError),
    #[error("YAML parse error")]
    YAMLError(#[from] libyaml::ParserError),
    #[error("Stream start expected")]
    StreamStartExpected,
    #[error("Stream end expected")]
    StreamEndExpected,
    #[error("Document start expected")]
    DocumentStartExpected,
    #[error("Document end expected")]
    DocumentEndExpected,
    #[error("Sequence start expected")]
    SequenceStartExpected,
    #[error("Sequence end expected, got {0:?}")]
    SequenceEndExpected(YAMLEventError),
    #[error("Mapping start expected, got {0:?}")]
    MappingStartExpected(YAMLEventError),
    #[error("Mapping end expected")]
    MappingEndExpected,
    #[error("Invalid test mode")]
    InvalidTestMode,
    #[error("Tests without a mode")]
    ModeExpected,
    #[error("Encoding {0:?} not supported")]
    InvalidEncoding(Encoding),
    #[error("Invalid xfail value")]
    InvalidXFail,
    #[error("Invalid token {0:?}")]
    InvalidToken(String),
}

pub struct YAMLParser<'a> {
    events: Peekable<ParserIter<'a>>,
}

impl<'a> YAMLParser<'a> {
    pub fn new(reader: File) -> Result<Self, ParseError> {
        let parser = Parser::new(reader)?;
        Ok(Self {
            events: parser.into_iter().peekable(),
        })
    }

    fn scalar(&mut self) -> Result<String, ParseError> {
        match self.events.next() {
            Some(Ok(Event::Scalar { value, .. })) => Ok(value),
            e => Err(ParseError::ScalarExpected(e)),
        }
    }

    fn mapping_start(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::MappingStart { .. })) => Ok(()),
            e => Err(ParseError::MappingStartExpected(e)),
        }
    }

    fn mapping_end(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::MappingEnd)) => Ok(()),
            _ => Err(ParseError::MappingEndExpected),
        }
    }

    fn sequence_start(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::SequenceStart { .. })) => Ok(()),
            _ => Err(ParseError::SequenceStartExpected),
        }
    }

    fn sequence_end(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::SequenceEnd)) => Ok(()),
            e => Err(ParseError::SequenceEndExpected(e)),
        }
    }

    fn flags(&mut self) -> Result<TestMode, ParseError> {
        self.mapping_start()?;
        let value = self.scalar()?;
        if value != "testmode" {
            return Err(ParseError::InvalidTestMode);
        }
        let mode = self.scalar()?;
        let mode = match &*mode {
            "forward" => TestMode::Forward,
            "backward" => TestMode::Backward,
            "bothDirections" => TestMode::BothDirections,
            _ => {
                return Err(ParseError::InvalidTestMode);
            }
        };
        self.mapping_end()?;
        Ok(mode)
    }

    fn xfail_value(&mut self) -> Result<bool, ParseError> {
        let value = self.scalar()?;
        Ok(!(value == "off" || value == "false"))
    }

    fn xfail_mapping_value(&mut self) -> Result<Directions, ParseError> {
        let mut directions = Directions::empty();
        self.mapping_start()?;
        while let Some(Ok(Event::Scalar { .. })) = self.events.peek() {
            let direction = self.scalar()?;
            let value = self.xfail_value()?;
            let direction = match &*direction {
                "forward" => Direction::Forward,
                "backward" => Direction::Backward,
                _ => {
                    return Err(ParseError::InvalidXFail);
                }
            };
            if value {
                directions.insert(direction);
            }
        }
        self.mapping_end()?;
        Ok(directions)
    }

    fn xfail(&mut self) -> Result<ExpectedFailure, ParseError> {
        match self.events.peek() {
            Some(Ok(Event::MappingStart { .. })) => {
                Ok(ExpectedFailure::Direction(self.xfail_mapping_value()?))
            }
            Some(Ok(Event::Scalar { .. })) => {
                let value = self.scalar()?;
                Ok(match &*value {
                    "off" | "false" | "no" => ExpectedFailure::Simple(false),
                    "on" | "true" | "yes" => ExpectedFailure::Simple(true),
                    _ => ExpectedFailure::Reason(value),
                })
            }
            _ => Err(ParseError::InvalidXFail),
        }
    }

    fn test(&mut self) -> Result<Test, ParseError> {
        self.sequence_start()?;
        let mut description = None;
        let mut input = self.scalar()?;
        let mut expected = self.scalar()?;
        // two scalars are (input, expected), three are (description, input, expected)
        if let Some(Ok(Event::Scalar { .. })) = self.events.peek() {
            description = Some(input);
            input = expected;
            expected = self.scalar()?;
        }
        let mut xfail = ExpectedFailure::Simple(false);
        if let Some(Ok(Event::MappingStart { .. })) = self.events.peek() {
            self.mapping_start()?;
            while let Some(Ok(Event::Scalar { .. })) = self.events.peek() {
                let value = self.scalar()?;
                match &*value {
                    "xfail" => {
                        xfail = self.xfail()?;
                    }
                    _ => {
                        return Err(ParseError::InvalidToken(value));
                    }
                }
            }
            self.mapping_end()?;
        };
        self.sequence_end()?;
        Ok(Test::new(description, input, expected, xfail))
    }

    fn tests(&mut self) -> Result<Vec<Test>, ParseError> {
        let mut tests: Vec<Test> = Vec::new();
        self.sequence_start()?;
        while let Some(Ok(Event::SequenceStart { .. })) = self.events.peek() {
            tests.push(self.test()?);
        }
        self.sequence_end()?;
        Ok(tests)
    }

    fn stream_start(&mut self) -> Result<(), ParseError> {
        if let Some(Ok(Event::StreamStart {
            encoding: Some(encoding),
        })) = self.events.next()
        {
            if encoding == Encoding::Utf8 {
                Ok(())
            } else {
                Err(ParseError::InvalidEncoding(encoding))
            }
        } else {
            Err(ParseError::StreamStartExpected)
        }
    }

    fn stream_end(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::StreamEnd)) => Ok(()),
            _ => Err(ParseError::StreamEndExpected),
        }
    }

    fn document_start(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::DocumentStart { .. })) => Ok(()),
            _ => Err(ParseError::DocumentStartExpected),
        }
    }

    fn document_end(&mut self) -> Result<(), ParseError> {
        match self.events.next() {
            Some(Ok(Event::DocumentEnd { .. })) => Ok(()),
            _ => Err(ParseError::DocumentEndExpected),
        }
    }

    pub fn yaml(&mut self) -> Result<Vec<TestSuite>, ParseError> {
        let mut test_suites: Vec<TestSuite> = Vec::new();
        let mut mode: Option<String> = None;
        let mut test_mode = TestMode::Forward;

        self.stream_start()?;
        self.document_start()?;
        self.mapping_start()?;
        while let Some(Ok(Event::Scalar { .. })) = self.events.peek() {
            let value = self.scalar()?;
            match &*value {
                "mode" => {
                    mode = Some(self.scalar()?);
                }
                "flags" => {
                    test_mode = self.flags()?;
                }
                "tests" => {
                    let tests = self.tests()?;
                    test_suites.push(TestSuite {
                        mode: mode.clone().ok_or(ParseError::ModeExpected)?,
                        test_mode,
                        tests,
                    });
                }
                _ => {
                    return Err(ParseError::InvalidToken(value));
                }
            }
        }
        self.mapping_end()?;
        self.document_end()?;
        self.stream_end()?;
        Ok(test_suites)
    }
}
