#![no_std]

//! An encoder for Garmin's Flexible and Interoperable Data Transfer protocol.
//!
//! Chainring builds complete, checksummed FIT documents in memory, covering
//! the messages needed for weight scale and blood pressure files. The bytes
//! can then be saved as a `.fit` file or uploaded.
//!
//! Most users should begin with the [`Encoder`](avec::Encoder) and messages
//! in the [`avec`] module. Other messages can be described with the
//! [`Message`](macro@avec::Message) derive macro. The primitives the encoder
//! is built from are exposed in the [`sans`] module, for applications that
//! need to lay out records themselves.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable timestamps from the system clock and local time zone
//!   (default).

extern crate alloc;
extern crate self as chainring;

pub mod avec;
pub mod sans;

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec::Vec;
}
