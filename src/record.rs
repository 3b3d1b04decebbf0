//! # Read-Out Data Records
//!
//! This module decodes the message body of a verified frame into the final
//! meter reading: the identification line plus an ordered mapping of data
//! item tags to their value lists.
//!
//! The body grammar is line oriented: zero or more records of the form
//! `TAG(V1*V2)` or `TAG(V1)`, each terminated by CR-NL, followed by the end
//! marker line `!` and a final CR-NL.

use crate::constants::{IEC62056_END_MARKER, IEC62056_RECORD_SEPARATOR};
use crate::error::MeterError;
use crate::readout::frame::RawFrame;
use serde::Serialize;

/// Represents one decoded data item record.
///
/// The value list holds one or two entries: the value, and optionally a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterDataItem {
    pub tag: String,
    pub values: Vec<String>,
}

/// Represents a complete decoded read-out.
///
/// Items keep their order of appearance in the message body. Tags are unique
/// within one reading; a duplicate tag overwrites the earlier value list in
/// place, so the item keeps its first position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterReading {
    pub identifier: String,
    pub items: Vec<MeterDataItem>,
}

impl MeterReading {
    /// Looks up the value list of a tag, if present.
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.items
            .iter()
            .find(|item| item.tag == tag)
            .map(|item| item.values.as_slice())
    }

    fn insert(&mut self, tag: String, values: Vec<String>) {
        match self.items.iter_mut().find(|item| item.tag == tag) {
            Some(item) => item.values = values,
            None => self.items.push(MeterDataItem { tag, values }),
        }
    }
}

/// Decodes the message body of a verified frame into a `MeterReading`.
///
/// The body must end with the `!` marker line followed by a final CR-NL;
/// every preceding line must be a well-formed `TAG(...)` record. Decoding is
/// all-or-nothing: the first malformed line fails the whole read-out.
pub fn decode_reading(frame: &RawFrame) -> Result<MeterReading, MeterError> {
    let body = String::from_utf8_lossy(&frame.body);
    // split() keeps an explicit trailing empty element when the body ends in
    // CR-NL, which is exactly the terminator convention checked below
    let lines: Vec<&str> = body.split(IEC62056_RECORD_SEPARATOR).collect();

    if lines.last() != Some(&"") {
        return Err(MeterError::MissingTrailingTerminator);
    }
    if lines.len() < 2 || lines[lines.len() - 2] != IEC62056_END_MARKER {
        return Err(MeterError::MissingEndMarker);
    }

    let mut reading = MeterReading {
        identifier: frame.identifier.clone(),
        items: Vec::new(),
    };
    for line in &lines[..lines.len() - 2] {
        let (tag, values) = decode_data_item(line)?;
        reading.insert(tag, values);
    }
    Ok(reading)
}

/// Decodes one `TAG(V1*V2)` record line into its tag and value list.
fn decode_data_item(line: &str) -> Result<(String, Vec<String>), MeterError> {
    let inner = line
        .strip_suffix(')')
        .ok_or_else(|| MeterError::MalformedDataItem(line.to_string()))?;
    let (tag, value_list) = inner
        .split_once('(')
        .ok_or_else(|| MeterError::MalformedDataItem(line.to_string()))?;
    let values = value_list.split('*').map(str::to_string).collect();
    Ok((tag.to_string(), values))
}

/// Encodes a reading back into message body text.
///
/// The counterpart of `decode_reading`, used to assemble read-out responses
/// for tests and mock transports. Value lists are joined with `*`, records
/// with CR-NL, and the `!` end marker plus final CR-NL are appended.
pub fn encode_body(reading: &MeterReading) -> String {
    let mut body = String::new();
    for item in &reading.items {
        body.push_str(&item.tag);
        body.push('(');
        body.push_str(&item.values.join("*"));
        body.push(')');
        body.push_str(IEC62056_RECORD_SEPARATOR);
    }
    body.push_str(IEC62056_END_MARKER);
    body.push_str(IEC62056_RECORD_SEPARATOR);
    body
}
