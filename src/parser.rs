//! The character-driven state machine that carves the stream into
//! sequences.
//!
//! The parser is fed one decoded code point at a time and partitions the
//! input into maximal, non-overlapping raw sequences: text runs, single
//! control characters, and complete ESC/DCS/CSI/OSC envelopes. Completed
//! sequences are classified, appended to the owned stream store, and
//! announced through the event sink. Text accumulation is additionally
//! announced incrementally so a renderer can display a run before it is
//! terminated.
//!
//! The parser cannot fail: any input is accepted. A sequence whose
//! terminator never arrives parks the parser in that sequence's state
//! until [`Parser::reset`].

use crate::catalog;
use crate::control::{self, c0, c1};
use crate::element::StreamElement;
use crate::stream::StreamStore;

/// Where the splitter currently is in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Text,
    ControlCharacter,
    EscapeSequence,
    DcsSequence,
    CsiSequence,
    OscSequence,
}

/// Notifications delivered synchronously from within [`Parser::feed`].
///
/// For a given parser, `ElementAdded` order equals stream append order,
/// and a `TransientTextUpdated` never follows the `ElementAdded` that
/// closes the same text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent<'a> {
    ElementAdded(&'a StreamElement),
    TransientTextUpdated(&'a str),
}

pub struct Parser {
    state: ParseState,
    builder: String,
    stream: StreamStore,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: ParseState::Text,
            builder: String::new(),
            stream: StreamStore::new(),
        }
    }

    /// Feed a whole chunk. Chunk boundaries carry no meaning; splitting
    /// the same input differently produces the same stream.
    pub fn parse<F>(&mut self, input: &str, mut on_event: F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        for c in input.chars() {
            self.feed(c, &mut on_event);
        }
    }

    /// Advance the state machine by one character. Appends at most one
    /// element and fires at most one transient-text notification.
    pub fn feed<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        match self.state {
            ParseState::Text | ParseState::ControlCharacter => self.text(c, on_event),
            ParseState::EscapeSequence => self.escape_sequence(c, on_event),
            ParseState::DcsSequence => self.dcs_sequence(c, on_event),
            ParseState::CsiSequence => self.csi_sequence(c, on_event),
            ParseState::OscSequence => self.osc_sequence(c, on_event),
        }
    }

    /// The elements parsed so far.
    pub fn stream(&self) -> &StreamStore {
        &self.stream
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Characters accumulated for the in-progress sequence. While in the
    /// text state this is the transient text run.
    pub fn pending(&self) -> &str {
        &self.builder
    }

    /// Abandon the in-progress sequence and return to the text state.
    /// The stream store is untouched.
    pub fn reset(&mut self) {
        if !self.builder.is_empty() {
            log::trace!("discarding {} pending characters on reset", self.builder.len());
        }
        self.state = ParseState::Text;
        self.builder.clear();
    }

    fn text<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        if control::is_single_character_function(c) {
            // The text run, then the control character as its own
            // one-character sequence, both within this call.
            self.emit(on_event);
            self.state = ParseState::ControlCharacter;
            self.builder.push(c);
            self.emit(on_event);
            self.state = ParseState::Text;
        } else if c == c0::ESC {
            self.begin_sequence(c, ParseState::EscapeSequence, on_event);
        } else if c == c1::DCS {
            self.begin_sequence(c, ParseState::DcsSequence, on_event);
        } else if c == c1::CSI {
            self.begin_sequence(c, ParseState::CsiSequence, on_event);
        } else if c == c1::OSC {
            self.begin_sequence(c, ParseState::OscSequence, on_event);
        } else {
            self.builder.push(c);
            on_event(StreamEvent::TransientTextUpdated(&self.builder));
        }
    }

    fn begin_sequence<F>(&mut self, c: char, state: ParseState, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        self.emit(on_event);
        self.builder.push(c);
        self.state = state;
    }

    fn escape_sequence<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        // The second character can reroute the nascent sequence; the
        // already-appended ESC stays as its first character.
        if self.builder.len() == 1 {
            match c {
                'P' => {
                    self.builder.push(c);
                    self.state = ParseState::DcsSequence;
                    return;
                }
                '[' => {
                    self.builder.push(c);
                    self.state = ParseState::CsiSequence;
                    return;
                }
                ']' => {
                    self.builder.push(c);
                    self.state = ParseState::OscSequence;
                    return;
                }
                _ => {}
            }
        }

        self.builder.push(c);
        if control::is_escape_terminator(c) {
            self.emit(on_event);
            self.state = ParseState::Text;
        }
    }

    fn dcs_sequence<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        self.builder.push(c);
        if c == c1::ST {
            self.emit(on_event);
            self.state = ParseState::Text;
        }
    }

    fn csi_sequence<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        self.builder.push(c);
        if control::is_csi_final(c) {
            self.emit(on_event);
            self.state = ParseState::Text;
        }
    }

    fn osc_sequence<F>(&mut self, c: char, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        self.builder.push(c);
        if c == c0::BEL || c == c1::ST || self.ends_with_esc_st(c) {
            self.emit(on_event);
            self.state = ParseState::Text;
        }
    }

    // The two-character ST form: the backslash just pushed follows an ESC.
    fn ends_with_esc_st(&self, c: char) -> bool {
        if c != '\\' {
            return false;
        }
        let mut rev = self.builder.chars().rev();
        rev.next();
        rev.next() == Some(c0::ESC)
    }

    /// Close the in-progress sequence: construct an element from the
    /// accumulated characters, append it, and announce it. A no-op when
    /// nothing has accumulated. Does not change the parse state.
    fn emit<F>(&mut self, on_event: &mut F)
    where
        F: FnMut(StreamEvent<'_>),
    {
        if self.builder.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.builder);
        let element = if self.state == ParseState::Text {
            StreamElement::Text { text: raw }
        } else {
            let (kind, parameters) = catalog::classify(&raw);
            StreamElement::ControlSequence { raw_text: raw, kind, parameters }
        };
        let element = self.stream.append(element);
        on_event(StreamEvent::ElementAdded(element));
    }
}
