//! Stateless building blocks for encoders.
//!
//! This module is intended for applications that assemble FIT documents by
//! hand, or that need messages outside those provided by [`crate::avec`].
//! Nothing here tracks which definitions have been written; that
//! bookkeeping belongs to the caller.
//!
//! # Document structure
//!
//! A document is a 12-byte [header](header::DocumentHeader), a sequence of
//! records, and a two-byte [checksum](check) over everything before it.
//!
//! Each record opens with a [header byte](header::record_header) carrying the
//! local message type. A [definition record](definition::definition_record)
//! declares the global message number and field layout for its local type,
//! and must precede any [data record](definition::data_record) of that type.
//! Data records hold the encoded values in the declared order, with no
//! per-field framing. [`data::build_content_block`] produces both halves from
//! a single list of fields so that they can't disagree.

pub mod check;
pub mod data;
pub mod definition;
pub mod header;
