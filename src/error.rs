//! # Read-Out Error Handling
//!
//! This module defines the MeterError enum, which represents the different
//! error types that can occur in the iec62056-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur during a meter read-out.
#[derive(Debug, Error)]
pub enum MeterError {
    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// Indicates that no byte arrived within the receive timeout window.
    #[error("Rx timeout")]
    RxTimeout,

    /// Indicates a non-printable byte inside the identification line.
    #[error("Illegal char in ident: 0x{0:02X}")]
    IllegalCharInIdentifier(u8),

    /// Indicates the identification line's CR was not followed by NL.
    #[error("Ident has 0x{0:02X} after CR")]
    UnexpectedCharAfterCr(u8),

    /// Indicates the byte after the identification line was not STX.
    #[error("Expected STX, not 0x{0:02X}")]
    ExpectedStx(u8),

    /// Indicates the transmitted checksum did not match the accumulator.
    #[error("Checksum mismatch: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Indicates the message body did not end with a CR-NL terminator.
    #[error("Last data item lacks CR-NL")]
    MissingTrailingTerminator,

    /// Indicates the message body's last line was not the '!' end marker.
    #[error("Last data item not '!'")]
    MissingEndMarker,

    /// Indicates a data item line that does not match `TAG(V1*V2)`.
    #[error("Malformed data item: {0:?}")]
    MalformedDataItem(String),

    /// A catch-all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}
