//! Hardware Abstraction Layer for esp-csi-streamer.
//!
//! Thin wrappers around ESP-IDF peripherals. Business logic stays in
//! core modules, HAL is just I/O.

pub mod usb;
pub mod wifi;
