//! # esp-csi-streamer
//!
//! Wi-Fi CSI capture firmware for ESP32-C6: frames every hardware-delivered
//! channel measurement and streams it over USB-Serial-JTAG.
//!
//! ## Architecture
//!
//! All captured data flows through one [`CaptureRing`]:
//! - The CSI callback (interrupt context) frames each event and appends it
//!   without ever blocking; a full ring drops the frame and counts it.
//! - The drain task (FreeRTOS task) peeks chunks, pushes them to the
//!   transport, and advances the read cursor by what was actually accepted.
//!
//! Single writer per cursor, atomics only, no mutexes anywhere near the
//! interrupt path.

#![cfg_attr(not(test), no_std)]

pub mod capture;
pub mod config;
pub mod diag;
pub mod drain;
pub mod frame;
pub mod hal;
pub mod ring;

pub use capture::{capture_event, CsiEvent};
pub use diag::DiagStream;
pub use drain::{ByteSink, DrainConsumer, DrainOutcome};
pub use frame::{FrameHeader, HEADER_LEN, MAGIC};
pub use ring::CaptureRing;
