//! Definition records.

use alloc::vec::Vec;

use zerocopy::{Immutable, IntoBytes};

use super::header::record_header;

/// Fixed content of a definition record, following the record header.
#[repr(C, packed)]
#[derive(IntoBytes, Immutable)]
struct DefinitionMessage {
    reserved: u8,
    architecture: u8,
    global_message: [u8; 2],
    fields: u8,
}

/// Architecture byte for little-endian data records.
const LITTLE_ENDIAN: u8 = 0;

/// Encode a complete definition record.
///
/// `field_definitions` holds three bytes per field, as produced by
/// [`super::data::build_content_block`]. A record declares at most 255
/// fields, and only the low four bits of `local_message` are used (see
/// [`record_header`]).
pub fn definition_record(local_message: u8, global_message: u16, field_definitions: &[u8]) -> Vec<u8> {
    debug_assert!(field_definitions.len() % 3 == 0);
    debug_assert!(field_definitions.len() / 3 <= u8::MAX as usize, "too many fields");

    let message = DefinitionMessage {
        reserved: 0,
        architecture: LITTLE_ENDIAN,
        global_message: global_message.to_le_bytes(),
        fields: (field_definitions.len() / 3) as u8,
    };

    let mut record = Vec::with_capacity(1 + size_of::<DefinitionMessage>() + field_definitions.len());
    record.push(record_header(true, local_message));
    record.extend_from_slice(message.as_bytes());
    record.extend_from_slice(field_definitions);
    record
}

/// Encode a complete data record.
///
/// Only the low four bits of `local_message` are used.
pub fn data_record(local_message: u8, values: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(1 + values.len());
    record.push(record_header(false, local_message));
    record.extend_from_slice(values);
    record
}
