//! Buffer-based encoder implementation.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};
use thiserror::Error;

use crate::sans::{
    check::compute_crc,
    data::{FieldError, build_content_block},
    definition::{data_record, definition_record},
    header::DocumentHeader,
};

use super::{
    BloodPressure, DeviceInfo, FileCreator, FileId, Message, WeightScale,
    timestamp::TimestampError,
};

/// Errors occurring while encoding.
///
/// A write that fails leaves the document unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// A field value couldn't be packed.
    #[error("Message {message}: {source}")]
    Field {
        message: u16,
        #[source]
        source: FieldError,
    },
    /// A timestamp couldn't be converted.
    #[error("Incorrect timestamp: {0}")]
    Timestamp(#[from] TimestampError),
    /// A message declared a local message type outside `0..16`.
    #[error("Local message type ({0}) is out of range.")]
    LocalMessage(u8),
    /// The record section outgrew the header's size field.
    #[error("Record section exceeds {} bytes.", u32::MAX)]
    DataTooLarge,
}

/// Encoder for a single document.
///
/// The document header is written on construction with a placeholder size.
/// Records are appended as messages are written, and [`Encoder::finish`]
/// settles the header and appends the checksum. Since `finish` consumes the
/// encoder, a finished document can't be written to.
#[derive(Debug, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
    header: DocumentHeader,
    /// Global message number last defined for each local message type.
    definitions: [Option<u16>; 16],
}

impl Encoder {
    /// Create an encoder with the default document header.
    pub fn new() -> Self {
        Self::with_header(DocumentHeader::default())
    }

    /// Create an encoder with a custom document header.
    pub fn with_header(header: DocumentHeader) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(&header.encode(0));

        Self {
            buf,
            header,
            definitions: [None; 16],
        }
    }

    /// Write a `file_id` message, as both a definition and a data record.
    ///
    /// With Cargo feature `std`, an omitted `time_created` is set to the
    /// current time. Without it, the field is left invalid.
    pub fn write_file_id(&mut self, file_id: FileId) -> Result<(), Error> {
        #[cfg(feature = "std")]
        let file_id = match file_id.time_created {
            Some(_) => file_id,
            None => FileId {
                time_created: Some(super::Timestamp::now()?),
                ..file_id
            },
        };

        self.write_defined(&file_id, true)
    }

    /// Write a `file_creator` message, as both a definition and a data record.
    pub fn write_file_creator(&mut self, file_creator: &FileCreator) -> Result<(), Error> {
        self.write_defined(file_creator, true)
    }

    /// Write a `device_info` message.
    pub fn write_device_info(&mut self, device_info: &DeviceInfo) -> Result<(), Error> {
        self.write(device_info)
    }

    /// Write a `weight_scale` message.
    pub fn write_weight_scale(&mut self, weight_scale: &WeightScale) -> Result<(), Error> {
        self.write(weight_scale)
    }

    /// Write a `blood_pressure` message.
    pub fn write_blood_pressure(&mut self, blood_pressure: &BloodPressure) -> Result<(), Error> {
        self.write(blood_pressure)
    }

    /// Write any message.
    ///
    /// A definition record is written first if the message's local type isn't
    /// yet defined, or was last defined for a different global message.
    pub fn write<M: Message>(&mut self, message: &M) -> Result<(), Error> {
        let defined = self
            .definitions
            .get(M::LOCAL as usize)
            .is_some_and(|d| *d == Some(M::GLOBAL));

        self.write_defined(message, !defined)
    }

    fn write_defined<M: Message>(&mut self, message: &M, define: bool) -> Result<(), Error> {
        let local = M::LOCAL;
        if local >= 16 {
            Err(Error::LocalMessage(local))?;
        }

        // Build everything before touching the buffer.
        let (definitions, values) =
            build_content_block(&message.fields()).map_err(|source| Error::Field {
                message: M::GLOBAL,
                source,
            })?;

        if define {
            let record = definition_record(local, M::GLOBAL, &definitions);
            self.buf.extend_from_slice(&record);
            self.definitions[local as usize] = Some(M::GLOBAL);

            debug!(
                "Defined message {} as local type {local} ({} fields).",
                M::GLOBAL,
                definitions.len() / 3
            );
        }

        self.buf.extend_from_slice(&data_record(local, &values));

        trace!(
            "Wrote message {} ({} bytes) at offset {}.",
            M::GLOBAL,
            values.len() + 1,
            self.buf.len() - values.len() - 1
        );

        Ok(())
    }

    /// Number of bytes written so far, including the header.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Checksum over every byte written so far, little-endian.
    pub fn crc(&self) -> [u8; 2] {
        compute_crc(0, &self.buf).to_le_bytes()
    }

    /// Copy of the bytes written so far.
    ///
    /// Until the encoder is finished, the header's size field is zero and no
    /// checksum is present.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Finish the document.
    ///
    /// Rewrites the header with the final record section size, then appends
    /// the checksum over the header and records.
    pub fn finish(mut self) -> Result<FitFile, Error> {
        let data_size = u32::try_from(self.buf.len() - DocumentHeader::SIZE)
            .map_err(|_| Error::DataTooLarge)?;

        let header = self.header.encode(data_size);
        self.buf[..DocumentHeader::SIZE].copy_from_slice(&header);

        let crc = self.crc();
        self.buf.extend_from_slice(&crc);

        debug!(
            "Finished document ({} bytes, CRC {:#06x}).",
            self.buf.len(),
            u16::from_le_bytes(crc)
        );

        Ok(FitFile(self.buf))
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Encoder {
    /// Hexadecimal dump of the bytes written so far, 16 per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex_dump(&self.buf, f)
    }
}

/// A finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitFile(Vec<u8>);

impl FitFile {
    /// The complete document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Length of the complete document, including header and checksum.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, as a document holds at least a header and checksum.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The trailing checksum.
    pub fn crc(&self) -> u16 {
        let n = self.0.len();
        u16::from_le_bytes([self.0[n - 2], self.0[n - 1]])
    }
}

impl AsRef<[u8]> for FitFile {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<FitFile> for Vec<u8> {
    fn from(file: FitFile) -> Self {
        file.0
    }
}

impl fmt::Display for FitFile {
    /// Hexadecimal dump of the document, 16 bytes per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex_dump(&self.0, f)
    }
}

fn hex_dump(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, line) in bytes.chunks(16).enumerate() {
        if i != 0 {
            writeln!(f)?;
        }

        for (j, b) in line.iter().enumerate() {
            if j != 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02x}")?;
        }
    }

    Ok(())
}
