//! # iec62056-rs - A Rust Crate for IEC 62056-21 Mode A Meter Read-Out
//!
//! The iec62056-rs crate reads structured measurement data from a utility
//! meter over a half-duplex serial line using the IEC 62056-21 "Mode A"
//! character-oriented read-out protocol.
//!
//! ## Features
//!
//! - Connect to a meter over a serial port (300 baud, 7E1 by default)
//! - Send the Mode A wake-up request and receive the data message
//! - Validate framing and the running XOR checksum with an explicit
//!   five-state parser
//! - Decode the message body into an identifier plus an ordered mapping of
//!   data item tags to value/unit lists
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the iec62056-rs crate in your Rust project, add the following to
//! your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! iec62056-rs = "0.1.0"
//! ```
//!
//! Then, in your Rust code, you can import the necessary modules and
//! functions:
//!
//! ```rust
//! use iec62056_rs::{
//!     connect, read_meter, MeterReading, MeterDataItem, MeterError,
//!     SerialConfig, init_logger, log_info,
//! };
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod readout;
pub mod record;

pub use crate::error::MeterError;
pub use crate::logging::{init_logger, log_info};

// Core read-out types
pub use readout::frame::{FrameParser, RawFrame, ReadoutState};
pub use readout::serial::{MeterDeviceHandle, SerialConfig, SerialPort};
pub use record::{decode_reading, encode_body, MeterDataItem, MeterReading};

/// Connect to a meter via serial port with the default Mode A settings.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
///
/// # Returns
/// * `Ok(MeterDeviceHandle)` - Connected device handle for communication
/// * `Err(MeterError)` - Connection failed
pub async fn connect(
    port: &str,
) -> Result<MeterDeviceHandle<tokio_serial::SerialStream>, MeterError> {
    MeterDeviceHandle::connect(port).await
}

/// Perform one complete read-out query on the given handle.
///
/// # Arguments
/// * `handle` - Device handle to query
///
/// # Returns
/// * `Ok(MeterReading)` - Decoded identifier and data items
/// * `Err(MeterError)` - Framing, checksum, decode, or transport failure
pub async fn read_meter<P: SerialPort>(
    handle: &mut MeterDeviceHandle<P>,
) -> Result<MeterReading, MeterError> {
    handle.query().await
}
