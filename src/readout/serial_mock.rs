//! Mock serial port implementation for testing
//!
//! This module provides a mock serial port that can be used to test the
//! read-out serial communication without requiring actual hardware.

use crate::readout::frame::calculate_checksum;
use crate::record::{encode_body, MeterReading};
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::constants::{IEC62056_CR, IEC62056_ETX, IEC62056_NL, IEC62056_STX};

/// Mock serial port that simulates bidirectional communication
#[derive(Clone)]
pub struct MockSerialPort {
    /// Data written to the port (outgoing)
    pub tx_buffer: Arc<Mutex<Vec<u8>>>,
    /// Data to be read from the port (incoming)
    pub rx_buffer: Arc<Mutex<VecDeque<u8>>>,
    /// Simulated errors
    pub next_error: Arc<Mutex<Option<io::Error>>>,
    /// Waker parked by a read that found the rx buffer empty
    read_waker: Arc<Mutex<Option<Waker>>>,
}

impl Default for MockSerialPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSerialPort {
    pub fn new() -> Self {
        MockSerialPort {
            tx_buffer: Arc::new(Mutex::new(Vec::new())),
            rx_buffer: Arc::new(Mutex::new(VecDeque::new())),
            next_error: Arc::new(Mutex::new(None)),
            read_waker: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue data to be read from the port
    pub fn queue_rx_data(&self, data: &[u8]) {
        let mut rx = self.rx_buffer.lock().unwrap();
        rx.extend(data);
        if let Some(waker) = self.read_waker.lock().unwrap().take() {
            waker.wake();
        }
    }

    /// Get data that was written to the port
    pub fn get_tx_data(&self) -> Vec<u8> {
        self.tx_buffer.lock().unwrap().clone()
    }

    /// Clear all buffers
    pub fn clear(&self) {
        self.tx_buffer.lock().unwrap().clear();
        self.rx_buffer.lock().unwrap().clear();
    }

    /// Set an error to be returned on the next operation
    pub fn set_next_error(&self, error: io::Error) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Queue a complete read-out response for the given reading, with the
    /// correct checksum (XOR of body bytes plus ETX)
    pub fn queue_readout_response(&self, reading: &MeterReading) {
        let body = encode_body(reading).into_bytes();
        let mut response = Vec::with_capacity(reading.identifier.len() + body.len() + 4);
        response.extend_from_slice(reading.identifier.as_bytes());
        response.push(IEC62056_CR);
        response.push(IEC62056_NL);
        response.push(IEC62056_STX);
        response.extend_from_slice(&body);
        response.push(IEC62056_ETX);
        response.push(calculate_checksum(&body));
        self.queue_rx_data(&response);
    }
}

// Implement AsyncRead for MockSerialPort
impl AsyncRead for MockSerialPort {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        // Check for simulated error
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Poll::Ready(Err(error));
        }

        let mut rx = self.rx_buffer.lock().unwrap();
        let available = rx.len().min(buf.remaining());

        if available == 0 {
            // Nothing queued yet: park the waker so a later queue_rx_data
            // resumes the read, and let the caller's timeout fire otherwise
            *self.read_waker.lock().unwrap() = Some(cx.waker().clone());
            return Poll::Pending;
        }

        let data: Vec<u8> = rx.drain(..available).collect();
        buf.put_slice(&data);
        Poll::Ready(Ok(()))
    }
}

// Implement AsyncWrite for MockSerialPort
impl AsyncWrite for MockSerialPort {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        // Check for simulated error
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Poll::Ready(Err(error));
        }

        let mut tx = self.tx_buffer.lock().unwrap();
        tx.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

// Implement SerialPort for MockSerialPort so the generic handle accepts it
#[async_trait::async_trait]
impl crate::readout::serial::SerialPort for MockSerialPort {
    async fn flush(&mut self) -> Result<(), std::io::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MeterDataItem;

    #[test]
    fn test_mock_serial_port_creation() {
        let port = MockSerialPort::new();
        assert_eq!(port.get_tx_data().len(), 0);
    }

    #[test]
    fn test_queue_and_read_data() {
        let port = MockSerialPort::new();
        let test_data = vec![0x01, 0x02, 0x03];
        port.queue_rx_data(&test_data);

        let rx = port.rx_buffer.lock().unwrap();
        assert_eq!(rx.len(), 3);
    }

    #[test]
    fn test_queue_readout_response() {
        let port = MockSerialPort::new();
        let reading = MeterReading {
            identifier: "ID1".to_string(),
            items: vec![MeterDataItem {
                tag: "T1".to_string(),
                values: vec!["100".to_string(), "kWh".to_string()],
            }],
        };
        port.queue_readout_response(&reading);

        let rx = port.rx_buffer.lock().unwrap();
        let wire: Vec<u8> = rx.iter().copied().collect();
        assert!(wire.starts_with(b"ID1\r\n\x02T1(100*kWh)\r\n!\r\n\x03"));
        // one checksum byte after ETX
        assert_eq!(wire.len(), b"ID1\r\n\x02T1(100*kWh)\r\n!\r\n\x03".len() + 1);
    }

    #[test]
    fn test_clear_buffers() {
        let port = MockSerialPort::new();
        port.queue_rx_data(&[1, 2, 3]);
        port.clear();

        let rx = port.rx_buffer.lock().unwrap();
        assert_eq!(rx.len(), 0);
    }
}
