//! Timestamps relative to the FIT epoch.

#[cfg(feature = "std")]
use chrono::{Local, Utc};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use thiserror::Error;

/// Seconds between the Unix epoch and the FIT epoch, 1989-12-31T00:00:00Z.
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

/// An error converting an instant to a [`Timestamp`].
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The instant precedes the FIT epoch.
    #[error("Instant ({0} s since the Unix epoch) precedes the FIT epoch.")]
    BeforeEpoch(i64),
    /// The instant is too far after the FIT epoch to be stored.
    #[error("Instant ({0} s since the Unix epoch) is out of range.")]
    OutOfRange(i64),
    /// The local time doesn't exist, for example inside a daylight saving gap.
    #[error("Local time does not exist.")]
    NonexistentLocalTime,
}

/// A whole number of seconds since the FIT epoch.
///
/// Convert from any [`chrono::DateTime`] with [`TryFrom`]; these conversions
/// are exact regardless of time zone. Naive date-times must state how they're
/// to be interpreted, through [`Timestamp::from_utc`] or
/// [`Timestamp::from_local`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The FIT epoch itself.
    pub const EPOCH: Self = Self(0);

    /// Create a timestamp from seconds since the FIT epoch.
    pub const fn from_fit(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a timestamp from seconds since the Unix epoch.
    pub fn from_unix(seconds: i64) -> Result<Self, TimestampError> {
        let fit = seconds.saturating_sub(FIT_EPOCH_OFFSET);

        if fit < 0 {
            Err(TimestampError::BeforeEpoch(seconds))?;
        }

        u32::try_from(fit)
            .map(Self)
            .map_err(|_| TimestampError::OutOfRange(seconds))
    }

    /// Create a timestamp from a naive date-time, interpreted as UTC.
    pub fn from_utc(naive: NaiveDateTime) -> Result<Self, TimestampError> {
        Self::try_from(naive.and_utc())
    }

    /// Create a timestamp from a naive date-time, interpreted in the local time
    /// zone of this machine.
    ///
    /// The result depends on the environment the program runs in. Where a
    /// local time occurs twice, the earlier instant is taken.
    ///
    /// _Requires Cargo feature `std`._
    #[cfg(feature = "std")]
    pub fn from_local(naive: NaiveDateTime) -> Result<Self, TimestampError> {
        let local = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or(TimestampError::NonexistentLocalTime)?;

        Self::try_from(local)
    }

    /// The current time.
    ///
    /// _Requires Cargo feature `std`._
    #[cfg(feature = "std")]
    pub fn now() -> Result<Self, TimestampError> {
        Self::try_from(Utc::now())
    }

    /// Seconds since the FIT epoch.
    pub const fn as_fit(self) -> u32 {
        self.0
    }

    /// Seconds since the Unix epoch.
    pub const fn as_unix(self) -> i64 {
        self.0 as i64 + FIT_EPOCH_OFFSET
    }
}

impl<Tz: TimeZone> TryFrom<DateTime<Tz>> for Timestamp {
    type Error = TimestampError;

    fn try_from(instant: DateTime<Tz>) -> Result<Self, Self::Error> {
        Self::from_unix(instant.timestamp())
    }
}
