//! End-to-end read-out tests over the mock serial port, hardware-agnostic.
//!
//! These tests validate the complete query workflow: wake-up request on the
//! wire, frame state machine, checksum verification, and record decoding.

use iec62056_rs::readout::frame::calculate_checksum;
use iec62056_rs::readout::serial_mock::MockSerialPort;
use iec62056_rs::{
    read_meter, MeterDataItem, MeterDeviceHandle, MeterError, MeterReading, SerialConfig,
};
use std::time::Duration;

fn test_config() -> SerialConfig {
    SerialConfig {
        baudrate: 300,
        timeout: Duration::from_millis(50),
    }
}

fn sample_reading() -> MeterReading {
    MeterReading {
        identifier: "ID1".to_string(),
        items: vec![MeterDataItem {
            tag: "T1".to_string(),
            values: vec!["100".to_string(), "kWh".to_string()],
        }],
    }
}

/// Tests the reference scenario: a raw wire image with the correct checksum
/// decodes into the expected reading.
#[tokio::test]
async fn test_query_decodes_wire_image() {
    let mock = MockSerialPort::new();
    let body = b"T1(100*kWh)\r\n!\r\n";
    let mut wire = b"ID1\r\n\x02".to_vec();
    wire.extend_from_slice(body);
    wire.push(0x03);
    wire.push(calculate_checksum(body));
    mock.queue_rx_data(&wire);

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let reading = handle.query().await.unwrap();

    assert_eq!(reading, sample_reading());
}

/// Tests that a query writes exactly the 4-byte wake-up request.
#[tokio::test]
async fn test_query_sends_wakeup_request() {
    let mock = MockSerialPort::new();
    mock.queue_readout_response(&sample_reading());

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    handle.query().await.unwrap();

    assert_eq!(mock.get_tx_data(), b"/?!\r\n");
}

/// Tests that a queued response round-trips through the top-level helper.
#[tokio::test]
async fn test_read_meter_round_trip() {
    let mock = MockSerialPort::new();
    let expected = MeterReading {
        identifier: "LGZ4ZMF100AC".to_string(),
        items: vec![
            MeterDataItem {
                tag: "1.8.0".to_string(),
                values: vec!["003217.11".to_string(), "kWh".to_string()],
            },
            MeterDataItem {
                tag: "0.9.2".to_string(),
                values: vec!["260826".to_string()],
            },
        ],
    };
    mock.queue_readout_response(&expected);

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let reading = read_meter(&mut handle).await.unwrap();

    assert_eq!(reading, expected);
}

/// Tests that a silent meter fails the query with `RxTimeout`.
#[tokio::test]
async fn test_query_timeout_on_silence() {
    let mock = MockSerialPort::new();
    // Don't queue any data

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let result = handle.query().await;

    assert!(matches!(result, Err(MeterError::RxTimeout)));
}

/// Tests that a meter going silent mid-frame also fails with `RxTimeout`.
#[tokio::test]
async fn test_query_timeout_mid_frame() {
    let mock = MockSerialPort::new();
    mock.queue_rx_data(b"ID1\r\n\x02T1(1");

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let result = handle.query().await;

    assert!(matches!(result, Err(MeterError::RxTimeout)));
}

/// Tests that a corrupted checksum byte fails the query with
/// `ChecksumMismatch` and no partial result.
#[tokio::test]
async fn test_query_checksum_corruption() {
    let mock = MockSerialPort::new();
    let body = b"T1(100*kWh)\r\n!\r\n";
    let mut wire = b"ID1\r\n\x02".to_vec();
    wire.extend_from_slice(body);
    wire.push(0x03);
    wire.push(calculate_checksum(body) ^ 0x80);
    mock.queue_rx_data(&wire);

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let result = handle.query().await;

    assert!(matches!(result, Err(MeterError::ChecksumMismatch { .. })));
}

/// Tests that a control byte inside the identification line aborts the read.
#[tokio::test]
async fn test_query_illegal_identifier_byte() {
    let mock = MockSerialPort::new();
    mock.queue_rx_data(b"ID\x01");

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let result = handle.query().await;

    assert!(matches!(
        result,
        Err(MeterError::IllegalCharInIdentifier(0x01))
    ));
}

/// Tests that transport write errors surface as `SerialPortError`.
#[tokio::test]
async fn test_query_write_error() {
    let mock = MockSerialPort::new();
    mock.set_next_error(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "Test error",
    ));

    let mut handle = MeterDeviceHandle::with_port(mock.clone(), test_config());
    let result = handle.query().await;

    assert!(matches!(result, Err(MeterError::SerialPortError(_))));
}
