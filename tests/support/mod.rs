//! A minimal walker over encoded documents, for checking encoder output.
//!
//! Panics on anything a conformant reader would reject.

#![allow(dead_code)]

use chainring::sans::{check::compute_crc, data::BaseType};
use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub number: u8,
    pub size: u8,
    pub base_type: u8,
}

#[derive(Debug)]
pub struct Data {
    pub local: u8,
    pub global: u16,
    /// Field numbers with their raw little-endian values.
    pub values: Vec<(u8, u64)>,
    /// Field numbers with their values, skipping 'invalid' markers.
    pub valid: Vec<(u8, u64)>,
}

impl Data {
    pub fn value(&self, field: u8) -> Option<u64> {
        self.values
            .iter()
            .find(|(number, _)| *number == field)
            .map(|(_, value)| *value)
    }
}

#[derive(Debug)]
pub enum Record {
    Definition {
        local: u8,
        global: u16,
        fields: Vec<FieldDefinition>,
    },
    Data(Data),
}

#[derive(Debug)]
pub struct Document {
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    pub data_size: u32,
    pub records: Vec<Record>,
    pub crc: u16,
}

impl Document {
    /// Definition records declaring a global message.
    pub fn definitions(&self, global: u16) -> Vec<&[FieldDefinition]> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Definition {
                    global: g, fields, ..
                } if *g == global => Some(fields.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Data records of a global message.
    pub fn data(&self, global: u16) -> Vec<&Data> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Data(d) if d.global == global => Some(d),
                _ => None,
            })
            .collect()
    }

    /// All data records, in document order.
    pub fn all_data(&self) -> impl Iterator<Item = &Data> {
        self.records.iter().filter_map(|r| match r {
            Record::Data(d) => Some(d),
            _ => None,
        })
    }
}

/// Walk every record of a document, checking its framing and checksum.
pub fn walk(r: &[u8]) -> Document {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct FileHeader {
        header_size: u8,
        protocol_version: u8,
        profile_version: [u8; 2],
        data_size: [u8; 4],
        data_type: [u8; 4],
    }

    let header: [u8; 12] = r[..12].try_into().unwrap();
    let FileHeader {
        header_size,
        protocol_version,
        profile_version,
        data_size,
        data_type,
    } = zerocopy::transmute!(header);

    assert_eq!(&data_type, b".FIT", "incorrect file type marker");
    assert_eq!(header_size, 12, "unexpected header length");

    let data_size = u32::from_le_bytes(data_size);
    let end = header_size as usize + data_size as usize;
    assert_eq!(r.len(), end + 2, "document length disagrees with header");

    let crc = u16::from_le_bytes([r[end], r[end + 1]]);
    assert_eq!(compute_crc(0, &r[..end]), crc, "checksum mismatch");

    bitfield! {
        struct NormalHeader(u8) {
            [0..4] local_message: u8,
            [5] is_developer,
            [6] is_definition,
            [7] is_compressed,
        }
    }

    let mut definitions: [Option<(u16, Vec<FieldDefinition>)>; 16] = Default::default();
    let mut records = vec![];
    let mut i = header_size as usize;

    while i < end {
        let header = NormalHeader(r[i]);
        i += 1;

        assert!(!header.is_compressed(), "unexpected compressed header");
        assert!(!header.is_developer(), "unexpected developer data");

        let local = header.local_message();

        if header.is_definition() {
            let content = &r[i..i + 5];
            assert_eq!(content[0], 0, "reserved byte set");
            assert_eq!(content[1], 0, "not little-endian");
            let global = u16::from_le_bytes([content[2], content[3]]);
            let count = content[4] as usize;
            i += 5;

            let fields: Vec<_> = r[i..i + count * 3]
                .chunks_exact(3)
                .map(|f| FieldDefinition {
                    number: f[0],
                    size: f[1],
                    base_type: f[2],
                })
                .collect();
            i += count * 3;

            for f in &fields {
                let base_type = BaseType::try_from(f.base_type).expect("unknown base type");
                assert_eq!(f.size as usize, base_type.size(), "field size mismatch");
            }

            definitions[local as usize] = Some((global, fields.clone()));
            records.push(Record::Definition {
                local,
                global,
                fields,
            });
        } else {
            let (global, fields) = definitions[local as usize]
                .as_ref()
                .expect("data record before its definition");

            let mut values = vec![];
            let mut valid = vec![];

            for f in fields {
                let size = f.size as usize;
                let mut raw = [0; 8];
                raw[..size].copy_from_slice(&r[i..i + size]);
                i += size;

                let value = u64::from_le_bytes(raw);
                values.push((f.number, value));

                let base_type = BaseType::try_from(f.base_type).unwrap();
                if value != base_type.invalid() {
                    valid.push((f.number, value));
                }
            }

            records.push(Record::Data(Data {
                local,
                global: *global,
                values,
                valid,
            }));
        }
    }

    assert_eq!(i, end, "record overran the record section");

    Document {
        header_size,
        protocol_version,
        profile_version: u16::from_le_bytes(profile_version),
        data_size,
        records,
        crc,
    }
}
