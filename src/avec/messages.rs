//! Messages for weight scale and blood pressure documents.

use alloc::{vec, vec::Vec};

use crate::sans::data::{BaseType, FieldValue};

use super::{Message, Timestamp, ToField};

/// Type of a document, declared by its [`FileId`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileType {
    #[default]
    Weight = 9,
    BloodPressure = 14,
}

impl ToField for FileType {
    fn to_field(&self) -> Option<f64> {
        Some((*self as u8).into())
    }
}

/// `file_id`, the first message of every document.
///
/// An omitted `time_created` is filled with the current time when written by
/// [`super::Encoder::write_file_id`] (with Cargo feature `std`).
#[derive(Debug, Clone, Default, PartialEq, Message)]
#[message(global = 0, local = 0)]
pub struct FileId {
    #[field(3, uint32z)]
    pub serial_number: Option<u32>,
    #[field(4, uint32)]
    pub time_created: Option<Timestamp>,
    #[field(1, uint16)]
    pub manufacturer: Option<u16>,
    #[field(2, uint16)]
    pub product: Option<u16>,
    #[field(5, uint16)]
    pub number: Option<u16>,
    #[field(0, enum)]
    pub file_type: FileType,
}

/// `file_creator`, conventionally the second message of a document.
#[derive(Debug, Clone, Default, PartialEq, Message)]
#[message(global = 49, local = 1)]
pub struct FileCreator {
    #[field(0, uint16)]
    pub software_version: Option<u16>,
    #[field(1, uint8)]
    pub hardware_version: Option<u8>,
}

/// `device_info`, describing the device that took the measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub timestamp: Timestamp,
    pub serial_number: Option<u32>,
    /// Seconds.
    pub cumulative_operating_time: Option<u32>,
    pub manufacturer: Option<u16>,
    pub product: Option<u16>,
    /// Fractional version, such as `2.5`.
    pub software_version: Option<f64>,
    /// Volts.
    pub battery_voltage: Option<f64>,
    pub device_index: Option<u8>,
    pub device_type: Option<u8>,
    pub hardware_version: Option<u8>,
    pub battery_status: Option<u8>,
}

impl DeviceInfo {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            serial_number: None,
            cumulative_operating_time: None,
            manufacturer: None,
            product: None,
            software_version: None,
            battery_voltage: None,
            device_index: None,
            device_type: None,
            hardware_version: None,
            battery_status: None,
        }
    }
}

// Written by hand, as the layout includes a field with no counterpart here.
impl Message for DeviceInfo {
    const GLOBAL: u16 = 23;
    const LOCAL: u8 = 2;

    fn fields(&self) -> Vec<FieldValue> {
        let field = |number, base_type, value: Option<f64>, scale: Option<f64>| FieldValue {
            number,
            base_type,
            value,
            scale,
        };

        vec![
            field(253, BaseType::Uint32, self.timestamp.to_field(), Some(1.0)),
            field(3, BaseType::Uint32z, self.serial_number.to_field(), Some(1.0)),
            field(7, BaseType::Uint32, self.cumulative_operating_time.to_field(), Some(1.0)),
            // Undocumented; always invalid.
            field(8, BaseType::Uint32, None, None),
            field(2, BaseType::Uint16, self.manufacturer.to_field(), Some(1.0)),
            field(4, BaseType::Uint16, self.product.to_field(), Some(1.0)),
            field(5, BaseType::Uint16, self.software_version.to_field(), Some(100.0)),
            field(10, BaseType::Uint16, self.battery_voltage.to_field(), Some(256.0)),
            field(0, BaseType::Uint8, self.device_index.to_field(), Some(1.0)),
            field(1, BaseType::Uint8, self.device_type.to_field(), Some(1.0)),
            field(6, BaseType::Uint8, self.hardware_version.to_field(), Some(1.0)),
            field(11, BaseType::Uint8, self.battery_status.to_field(), None),
        ]
    }
}

/// `weight_scale`, a single body composition measurement.
///
/// Masses are in kilograms and percentages in percent; metabolic rates are in
/// kilocalories per day.
#[derive(Debug, Clone, PartialEq, Message)]
#[message(global = 30, local = 3)]
pub struct WeightScale {
    #[field(253, uint32, scale = 1)]
    pub timestamp: Timestamp,
    #[field(0, uint16, scale = 100)]
    pub weight: f64,
    #[field(1, uint16, scale = 100)]
    pub percent_fat: Option<f64>,
    #[field(2, uint16, scale = 100)]
    pub percent_hydration: Option<f64>,
    #[field(3, uint16, scale = 100)]
    pub visceral_fat_mass: Option<f64>,
    #[field(4, uint16, scale = 100)]
    pub bone_mass: Option<f64>,
    #[field(5, uint16, scale = 100)]
    pub muscle_mass: Option<f64>,
    #[field(7, uint16, scale = 4)]
    pub basal_met: Option<f64>,
    #[field(9, uint16, scale = 4)]
    pub active_met: Option<f64>,
    #[field(8, uint8, scale = 1)]
    pub physique_rating: Option<u8>,
    #[field(10, uint8, scale = 1)]
    pub metabolic_age: Option<u8>,
    #[field(11, uint8, scale = 1)]
    pub visceral_fat_rating: Option<u8>,
    #[field(13, uint16, scale = 10)]
    pub bmi: Option<f64>,
}

impl WeightScale {
    pub fn new(timestamp: Timestamp, weight: f64) -> Self {
        Self {
            timestamp,
            weight,
            percent_fat: None,
            percent_hydration: None,
            visceral_fat_mass: None,
            bone_mass: None,
            muscle_mass: None,
            basal_met: None,
            active_met: None,
            physique_rating: None,
            metabolic_age: None,
            visceral_fat_rating: None,
            bmi: None,
        }
    }
}

/// `blood_pressure`, a single blood pressure measurement.
///
/// Pressures are in mmHg and heart rate in beats per minute.
#[derive(Debug, Clone, PartialEq, Message)]
#[message(global = 51, local = 14)]
pub struct BloodPressure {
    #[field(253, uint32, scale = 1)]
    pub timestamp: Timestamp,
    #[field(0, uint16, scale = 1)]
    pub systolic_pressure: Option<u16>,
    #[field(1, uint16, scale = 1)]
    pub diastolic_pressure: Option<u16>,
    #[field(2, uint16, scale = 1)]
    pub mean_arterial_pressure: Option<u16>,
    #[field(3, uint16, scale = 1)]
    pub map_3_sample_mean: Option<u16>,
    #[field(4, uint16, scale = 1)]
    pub map_morning_values: Option<u16>,
    #[field(5, uint16, scale = 1)]
    pub map_evening_values: Option<u16>,
    #[field(6, uint8, scale = 1)]
    pub heart_rate: Option<u8>,
}

impl BloodPressure {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            systolic_pressure: None,
            diastolic_pressure: None,
            mean_arterial_pressure: None,
            map_3_sample_mean: None,
            map_morning_values: None,
            map_evening_values: None,
            heart_rate: None,
        }
    }
}
