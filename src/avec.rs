//! Convenience interfaces for common encoding patterns.
//!
//! An [`Encoder`] assembles a document from messages, publishing each as a
//! definition record the first time its local message type is seen and as a
//! data record every time. A typical weight document looks like this:
//!
//! ```
//! let mut encoder = Encoder::new();
//! encoder.write_file_id(FileId::default())?;
//! encoder.write_file_creator(&FileCreator::default())?;
//!
//! let timestamp = Timestamp::try_from(Utc::now())?;
//! encoder.write_device_info(&DeviceInfo::new(timestamp))?;
//! encoder.write_weight_scale(&WeightScale {
//!     percent_fat: Some(20.3),
//!     ..WeightScale::new(timestamp, 70.5)
//! })?;
//!
//! let file = encoder.finish()?;
//! std::fs::write("weight.fit", file.as_bytes())?;
//! ```
//!
//! Messages beyond those in [`messages`] can be described with the
//! [`Message`](macro@Message) derive macro and written with
//! [`Encoder::write`].

pub mod encoder;
pub mod messages;
pub mod timestamp;

use alloc::vec::Vec;

pub use encoder::{Encoder, Error, FitFile};
pub use messages::{BloodPressure, DeviceInfo, FileCreator, FileId, FileType, WeightScale};
pub use timestamp::{Timestamp, TimestampError};

use crate::sans::data::FieldValue;

/// Derive [`Message`] for a struct representing a single message.
///
/// # Example
///
/// Add the `message` attribute to the struct, giving the global message
/// number and the local message type (below 16) to encode it under. Then add
/// the `field(N, T)` attribute to each struct field to encode, where `N` is
/// the field number and `T` is the name of a base type as it appears in the
/// protocol document. Fields are encoded in the order they're declared, and
/// those without an attribute are skipped.
///
/// ```
/// #[derive(Debug, Message)]
/// #[message(global = 30, local = 3)]
/// struct Weight {
///     #[field(253, uint32)]
///     timestamp: Timestamp,
///     #[field(0, uint16, scale = 100)]
///     weight: Option<f64>,
///     #[field(13, uint16, scale = 10)]
///     bmi: Option<f64>,
/// }
/// ```
///
/// Field types must implement [`ToField`]. `Option<T>` fields holding `None`
/// are encoded as the base type's 'invalid' marker value.
pub use chainring_derive::Message;

/// A message that can be encoded into a document.
///
/// See the [`Message`](macro@Message) derive macro for an automatic
/// implementation of this trait.
pub trait Message {
    /// The global message number, from the protocol profile.
    const GLOBAL: u16;
    /// The local message type records of this message are written under.
    ///
    /// Must be below 16.
    const LOCAL: u8;

    /// The fields of this message with their values, in encoding order.
    fn fields(&self) -> Vec<FieldValue>;
}

/// Convert a value into a field value ready for scaling and packing.
///
/// Returning `None` marks the field as absent.
pub trait ToField {
    fn to_field(&self) -> Option<f64>;
}

macro_rules! to_field {
    ($($t:ty),*) => {
        $(
            impl ToField for $t {
                fn to_field(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

to_field!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<T: ToField> ToField for Option<T> {
    fn to_field(&self) -> Option<f64> {
        self.as_ref().and_then(ToField::to_field)
    }
}

impl ToField for Timestamp {
    fn to_field(&self) -> Option<f64> {
        Some(self.as_fit().into())
    }
}
