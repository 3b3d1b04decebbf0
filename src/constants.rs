//! IEC 62056-21 Protocol Constants
//!
//! This module defines constants used in the IEC 62056-21 Mode A read-out
//! implementation, based on the IEC 62056-21 standard.

/// STX control character, opens the data message body
pub const IEC62056_STX: u8 = 0x02;

/// ETX control character, closes the data message body
pub const IEC62056_ETX: u8 = 0x03;

/// Line feed, second half of the CR-NL line terminator
pub const IEC62056_NL: u8 = 0x0A;

/// Carriage return, first half of the CR-NL line terminator
pub const IEC62056_CR: u8 = 0x0D;

/// Lowest printable character accepted in the identification line
pub const IEC62056_SPACE: u8 = 0x20;

/// Mode A wake-up request sent to start a read-out
pub const IEC62056_REQUEST: &[u8] = b"/?!\r\n";

/// End-of-data marker line preceding the final CR-NL
pub const IEC62056_END_MARKER: &str = "!";

/// CR-NL record separator within the message body
pub const IEC62056_RECORD_SEPARATOR: &str = "\r\n";

// ----------------------------------------------------------------------------
// Default serial parameters for Mode A (no baud-rate step-up)
// ----------------------------------------------------------------------------

/// Default baud rate for the initial (and, in Mode A, only) exchange
pub const IEC62056_DEFAULT_BAUDRATE: u32 = 300;

/// Default per-byte receive timeout in seconds
pub const IEC62056_DEFAULT_TIMEOUT_SECS: u64 = 3;
