use std::path::Path;

use chainring::avec::{
    BloodPressure, DeviceInfo, Encoder, FileCreator, FileId, FitFile, Timestamp, WeightScale,
};
use csv::ReaderBuilder;

mod support;

const T: i64 = 1_700_000_000;

fn at(seconds: i64) -> Timestamp {
    Timestamp::from_unix(seconds).unwrap()
}

fn file_id() -> FileId {
    FileId {
        serial_number: Some(123456789),
        time_created: Some(at(T)),
        manufacturer: Some(255),
        product: Some(1),
        ..Default::default()
    }
}

fn file_creator() -> FileCreator {
    FileCreator {
        software_version: Some(100),
        ..Default::default()
    }
}

fn weight_scale_document() -> FitFile {
    let mut encoder = Encoder::new();
    encoder.write_file_id(file_id()).unwrap();
    encoder.write_file_creator(&file_creator()).unwrap();

    encoder
        .write_device_info(&DeviceInfo {
            serial_number: Some(123456789),
            manufacturer: Some(255),
            product: Some(1),
            software_version: Some(2.5),
            battery_voltage: Some(3.5),
            device_index: Some(0),
            device_type: Some(119),
            hardware_version: Some(1),
            battery_status: Some(3),
            ..DeviceInfo::new(at(T))
        })
        .unwrap();

    encoder
        .write_weight_scale(&WeightScale {
            percent_fat: Some(20.25),
            percent_hydration: Some(55.5),
            bone_mass: Some(3.25),
            muscle_mass: Some(30.75),
            basal_met: Some(1600.25),
            active_met: Some(2000.0),
            physique_rating: Some(5),
            metabolic_age: Some(30),
            visceral_fat_rating: Some(7),
            bmi: Some(22.5),
            ..WeightScale::new(at(T), 70.5)
        })
        .unwrap();

    encoder
        .write_weight_scale(&WeightScale::new(at(T + 86_400), 71.25))
        .unwrap();

    encoder.finish().unwrap()
}

fn blood_pressure_document() -> FitFile {
    let mut encoder = Encoder::new();
    encoder.write_file_id(file_id()).unwrap();
    encoder.write_file_creator(&file_creator()).unwrap();

    encoder
        .write_device_info(&DeviceInfo {
            manufacturer: Some(255),
            product: Some(1),
            ..DeviceInfo::new(at(T))
        })
        .unwrap();

    encoder
        .write_blood_pressure(&BloodPressure {
            systolic_pressure: Some(120),
            diastolic_pressure: Some(80),
            mean_arterial_pressure: Some(93),
            heart_rate: Some(65),
            ..BloodPressure::new(at(T))
        })
        .unwrap();

    encoder
        .write_blood_pressure(&BloodPressure {
            systolic_pressure: Some(118),
            diastolic_pressure: Some(79),
            ..BloodPressure::new(at(T + 3600))
        })
        .unwrap();

    encoder.finish().unwrap()
}

#[test]
fn encode_weight_scale_matches_fixture() {
    const PATH: &str = "fixtures/weight-scale.fit";
    let expected = std::fs::read(PATH).unwrap();
    let file = weight_scale_document();
    assert_eq!(file.as_bytes(), expected.as_slice());
    assert_eq!(file.crc(), 0x39D6);
}

#[test]
fn encode_blood_pressure_matches_fixture() {
    const PATH: &str = "fixtures/blood-pressure.fit";
    let expected = std::fs::read(PATH).unwrap();
    let file = blood_pressure_document();
    assert_eq!(file.as_bytes(), expected.as_slice());
    assert_eq!(file.crc(), 0xD3AC);
}

#[test]
fn walk_weight_scale() {
    let file = weight_scale_document();
    Validator::new("fixtures/weight-scale.fit").validate(file.as_bytes());
}

#[test]
fn walk_blood_pressure() {
    let file = blood_pressure_document();
    Validator::new("fixtures/blood-pressure.fit").validate(file.as_bytes());
}

/// Expected data records, one per row: the global message number, followed
/// by field number and value pairs for each valid field.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn validate(self, bytes: &[u8]) {
        let document = support::walk(bytes);
        let found: Vec<Vec<String>> = document
            .all_data()
            .map(|d| {
                let mut row = vec![d.global.to_string()];
                for (field, value) in &d.valid {
                    row.push(field.to_string());
                    row.push(value.to_string());
                }
                row
            })
            .collect();

        assert_eq!(found, self.0);
    }
}
