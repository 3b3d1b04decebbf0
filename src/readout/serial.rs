//! # Read-Out Serial Communication
//!
//! This module provides the serial transport for the Mode A read-out:
//! connecting to the port, sending the wake-up request, and driving the
//! frame parser from the received byte stream.
//!
//! The handle is generic over the [`SerialPort`] trait so it can work with
//! either a real `tokio_serial::SerialStream` or the mock port from
//! `readout::serial_mock`.

use crate::constants::{
    IEC62056_DEFAULT_BAUDRATE, IEC62056_DEFAULT_TIMEOUT_SECS, IEC62056_REQUEST,
};
use crate::error::MeterError;
use crate::readout::frame::{FrameParser, RawFrame};
use crate::record::{decode_reading, MeterReading};
use log::debug;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;

/// Configuration for the serial connection.
///
/// The timeout is the per-byte receive window, not a whole-frame deadline.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        // Mode A initial exchange: 300 baud, 7 data bits, even parity
        SerialConfig {
            baudrate: IEC62056_DEFAULT_BAUDRATE,
            timeout: Duration::from_secs(IEC62056_DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Trait for serial port operations.
#[async_trait::async_trait]
pub trait SerialPort: AsyncReadExt + AsyncWriteExt + Unpin + Send {
    async fn flush(&mut self) -> Result<(), std::io::Error>;
}

// Implement SerialPort for tokio_serial::SerialStream
#[async_trait::async_trait]
impl SerialPort for tokio_serial::SerialStream {
    async fn flush(&mut self) -> Result<(), std::io::Error> {
        AsyncWriteExt::flush(self).await
    }
}

/// Represents a handle to one meter read-out session.
///
/// Exactly one query is in flight per handle at a time; a caller wanting
/// concurrent sessions opens one handle per session. The handle carries no
/// retry policy, a failed query is simply re-issued by the caller.
pub struct MeterDeviceHandle<P: SerialPort> {
    port: P,
    config: SerialConfig,
}

impl MeterDeviceHandle<tokio_serial::SerialStream> {
    /// Establishes a connection to the serial port using the provided port
    /// name and the default Mode A settings (300 baud, 7E1, 3 s timeout).
    pub async fn connect(
        port_name: &str,
    ) -> Result<MeterDeviceHandle<tokio_serial::SerialStream>, MeterError> {
        Self::connect_with_config(port_name, SerialConfig::default()).await
    }

    /// Establishes a connection with custom config.
    pub async fn connect_with_config(
        port_name: &str,
        config: SerialConfig,
    ) -> Result<MeterDeviceHandle<tokio_serial::SerialStream>, MeterError> {
        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Seven)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::Even)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| MeterError::SerialPortError(e.to_string()))?;

        Ok(MeterDeviceHandle { port, config })
    }
}

impl<P: SerialPort> MeterDeviceHandle<P> {
    /// Creates a handle over an already-open port.
    pub fn with_port(port: P, config: SerialConfig) -> Self {
        MeterDeviceHandle { port, config }
    }

    /// Performs one complete read-out query.
    ///
    /// Sends the wake-up request, reads the response frame to completion,
    /// and decodes the message body. Each call starts a fresh frame parser;
    /// no state survives across queries.
    pub async fn query(&mut self) -> Result<MeterReading, MeterError> {
        self.send_request().await?;
        let frame = self.read_frame().await?;
        decode_reading(&frame)
    }

    /// Sends the fixed 4-byte wake-up request and flushes the port.
    async fn send_request(&mut self) -> Result<(), MeterError> {
        debug!("Sending read-out request {:?}", IEC62056_REQUEST);
        self.port
            .write_all(IEC62056_REQUEST)
            .await
            .map_err(|e| MeterError::SerialPortError(e.to_string()))?;
        SerialPort::flush(&mut self.port)
            .await
            .map_err(|e| MeterError::SerialPortError(e.to_string()))
    }

    /// Reads bytes one at a time until the frame parser completes a frame.
    async fn read_frame(&mut self) -> Result<RawFrame, MeterError> {
        let mut parser = FrameParser::new();
        loop {
            let byte = self.read_byte().await?;
            if let Some(frame) = parser.push_byte(byte)? {
                debug!(
                    "Received frame from {:?} ({} body bytes)",
                    frame.identifier,
                    frame.body.len()
                );
                return Ok(frame);
            }
        }
    }

    /// Reads a single byte, failing with `RxTimeout` when none arrives
    /// within the configured window.
    async fn read_byte(&mut self) -> Result<u8, MeterError> {
        let mut buf = [0u8; 1];
        let n = tokio::time::timeout(self.config.timeout, self.port.read(&mut buf))
            .await
            .map_err(|_| MeterError::RxTimeout)
            .and_then(|res| res.map_err(|e| MeterError::SerialPortError(e.to_string())))?;
        if n == 0 {
            return Err(MeterError::SerialPortError("port closed".to_string()));
        }
        Ok(buf[0])
    }
}
