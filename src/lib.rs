//! termstream
//!
//! A streaming parser that converts a pseudo-terminal's character stream
//! into a typed, append-only sequence of stream elements: plain text runs
//! and classified terminal control functions (xterm/VT100/VT220/VT300
//! ESC, CSI, DCS, and OSC sequences, the ten single-character C0
//! functions, and the Final Term shell-integration CSI extension).
//!
//! The parser is:
//! - Streaming: fed one code point at a time, never needing lookahead
//! - Stateful: sequences may span arbitrary chunk boundaries
//! - Total: any input is accepted; unrecognized sequences classify as
//!   [`ControlSequenceType::Unknown`]
//!
//! Classification only: control functions are identified and their
//! parameters extracted, never executed. The parser knows nothing about
//! cursors, screens, or colors, and consumes already-decoded code points
//! (UTF-8 decoding is the host's concern).
//!
//! ```
//! use termstream::{Parser, StreamEvent};
//!
//! let mut parser = Parser::new();
//! parser.parse("hello \u{1b}[1mworld\u{1b}[0m\n", |event| {
//!     if let StreamEvent::ElementAdded(element) = event {
//!         println!("{:?}", element);
//!     }
//! });
//! ```

pub mod catalog;
pub mod control;
pub mod element;
pub mod parser;
pub mod stream;

pub use catalog::{classify, Catalog};
pub use element::{ControlSequenceType, StreamElement};
pub use parser::{ParseState, Parser, StreamEvent};
pub use stream::StreamStore;
