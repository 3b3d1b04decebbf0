//! # IEC 62056-21 Frame Parser
//!
//! This module provides the protocol state machine that consumes the byte
//! stream of a Mode A read-out one byte at a time, validates framing, and
//! accumulates the running XOR checksum over the message body.
//!
//! ## Wire format
//!
//! ```text
//! IDENT CR NL STX BODY ETX CHECKSUM
//! ```
//!
//! where `IDENT` is printable ASCII (>= 0x20), `CHECKSUM` is one byte equal
//! to the XOR of every `BODY` byte plus the `ETX` byte itself.
//!
//! ## Usage
//!
//! Feeding received bytes into the parser:
//! ```ignore
//! let mut parser = FrameParser::new();
//! for byte in received {
//!     if let Some(frame) = parser.push_byte(byte)? {
//!         // `frame.identifier` and `frame.body` are checksum-verified
//!     }
//! }
//! ```
//!
//! The parser performs no I/O; the serial layer in `readout::serial` drives
//! it from the transport and owns the timeout handling.
//!
//! ## Error Handling
//!
//! One illegal byte aborts the read with the matching `MeterError` variant.
//! There is no resynchronization inside the parser; a caller wanting to retry
//! re-issues the whole query with a fresh parser.

use crate::constants::{IEC62056_CR, IEC62056_ETX, IEC62056_NL, IEC62056_SPACE, IEC62056_STX};
use crate::error::MeterError;

/// Represents the states of the Mode A read-out state machine.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReadoutState {
    /// Accumulating the identification line (initial state).
    ReadingIdentifier,
    /// CR seen, expecting the NL that ends the identification line.
    CrReceived,
    /// NL seen, expecting STX.
    NlReceived,
    /// Inside the message body, accumulating bytes until ETX.
    StxReceived,
    /// ETX seen, expecting the checksum byte.
    EtxReceived,
}

/// Represents a validated, checksum-verified read-out frame.
///
/// The body is the payload between STX and ETX, exclusive of both delimiters.
#[derive(Debug, PartialEq, Eq)]
pub struct RawFrame {
    pub identifier: String,
    pub body: Vec<u8>,
}

/// Incremental parser for one read-out frame.
///
/// Each query starts from a fresh parser: fresh state, fresh checksum
/// accumulator, fresh body buffer.
#[derive(Debug)]
pub struct FrameParser {
    state: ReadoutState,
    identifier: String,
    body: Vec<u8>,
    checksum: u8,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Creates a parser in the initial `ReadingIdentifier` state.
    pub fn new() -> Self {
        FrameParser {
            state: ReadoutState::ReadingIdentifier,
            identifier: String::new(),
            body: Vec::new(),
            checksum: 0,
        }
    }

    /// Returns the current protocol state.
    pub fn state(&self) -> ReadoutState {
        self.state
    }

    /// Consumes one received byte.
    ///
    /// Returns `Ok(Some(frame))` when the byte completes a checksum-verified
    /// frame, `Ok(None)` when more bytes are needed, and an error on the
    /// first framing violation. A `RawFrame` is only ever constructed after
    /// the transmitted checksum matched the accumulator.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<RawFrame>, MeterError> {
        match self.state {
            ReadoutState::ReadingIdentifier => {
                if byte >= IEC62056_SPACE {
                    self.identifier.push(byte as char);
                } else if byte == IEC62056_CR {
                    self.state = ReadoutState::CrReceived;
                } else {
                    return Err(MeterError::IllegalCharInIdentifier(byte));
                }
            }
            ReadoutState::CrReceived => {
                if byte != IEC62056_NL {
                    return Err(MeterError::UnexpectedCharAfterCr(byte));
                }
                self.state = ReadoutState::NlReceived;
            }
            ReadoutState::NlReceived => {
                if byte != IEC62056_STX {
                    return Err(MeterError::ExpectedStx(byte));
                }
                self.state = ReadoutState::StxReceived;
            }
            ReadoutState::StxReceived => {
                // ETX is folded into the checksum before the comparison
                self.checksum ^= byte;
                if byte != IEC62056_ETX {
                    self.body.push(byte);
                } else {
                    self.state = ReadoutState::EtxReceived;
                }
            }
            ReadoutState::EtxReceived => {
                if self.checksum != byte {
                    return Err(MeterError::ChecksumMismatch {
                        expected: byte,
                        calculated: self.checksum,
                    });
                }
                return Ok(Some(RawFrame {
                    identifier: std::mem::take(&mut self.identifier),
                    body: std::mem::take(&mut self.body),
                }));
            }
        }
        Ok(None)
    }
}

/// Calculates the checksum of a message body the way the meter transmits it:
/// XOR over every body byte plus the ETX delimiter.
pub fn calculate_checksum(body: &[u8]) -> u8 {
    body.iter().fold(IEC62056_ETX, |acc, b| acc ^ b)
}
