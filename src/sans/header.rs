//! Document and record headers.

use tartan_bitfield::bitfield;
use zerocopy::{Immutable, IntoBytes};

/// Configurable fields of a document header.
///
/// The remaining fields are fixed: the header is always 12 bytes long and
/// carries the `.FIT` marker. The data size is only known once a document is
/// finished, so it's supplied to [`DocumentHeader::encode`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Protocol version, major in the upper nibble (16 is 1.0).
    pub protocol_version: u8,
    /// Profile version, multiplied by 100 (108 is 1.08).
    pub profile_version: u16,
}

impl DocumentHeader {
    /// Length of an encoded document header in bytes.
    pub const SIZE: usize = 12;

    /// Encode this header for a document with `data_size` record bytes.
    pub fn encode(&self, data_size: u32) -> [u8; Self::SIZE] {
        #[repr(C, packed)]
        #[derive(IntoBytes, Immutable)]
        struct FileHeader {
            header_size: u8,
            protocol_version: u8,
            profile_version: [u8; 2],
            data_size: [u8; 4],
            data_type: [u8; 4],
        }

        let header = FileHeader {
            header_size: Self::SIZE as u8,
            protocol_version: self.protocol_version,
            profile_version: self.profile_version.to_le_bytes(),
            data_size: data_size.to_le_bytes(),
            data_type: *b".FIT",
        };

        zerocopy::transmute!(header)
    }
}

impl Default for DocumentHeader {
    fn default() -> Self {
        Self {
            protocol_version: 16,
            profile_version: 108,
        }
    }
}

bitfield! {
    struct NormalHeader(u8) {
        [0..4] local_message: u8,
        [6] is_definition,
    }
}

/// Encode a normal record header byte.
///
/// Bit 6 marks a definition record; the low four bits carry the local
/// message type. Only those four bits of `local_message` are used, so callers
/// must keep it below 16 (as [`crate::avec::Encoder`] does).
pub fn record_header(is_definition: bool, local_message: u8) -> u8 {
    let mut header = NormalHeader(0);
    header.set_is_definition(is_definition);
    header.set_local_message(local_message & 0xF);
    header.0
}
