//! The readout module contains the components responsible for the core
//! IEC 62056-21 Mode A protocol implementation, including the frame state
//! machine and serial communication.

pub mod frame;
pub mod serial;
pub mod serial_mock;

pub use frame::*;
pub use serial::*;

/// Represents a validated, checksum-verified read-out frame.
pub use frame::RawFrame;

/// Represents the states of the read-out state machine.
pub use frame::ReadoutState;
