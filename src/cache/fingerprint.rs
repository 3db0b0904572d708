//! Structural identity of a `Subject`.
//!
//! `fingerprint_equals` is the authoritative reuse check. `Fingerprint` is a
//! SHA-256 digest over the same fields and only serves as a store key.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::chart::{Location, Subject};

/// Exact field-by-field equality, including every nested `Location` field.
pub fn fingerprint_equals(a: &Subject, b: &Subject) -> bool {
    a == b
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(subject: &Subject) -> Self {
        let mut hasher = Sha256::new();
        for field in [
            &subject.name,
            &subject.email,
            &subject.date_of_birth,
            &subject.time_of_birth,
            &subject.place_of_birth,
        ] {
            write_str(&mut hasher, field);
        }
        write_location(&mut hasher, &subject.selected_location);
        Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Length prefix keeps ("ab", "c") distinct from ("a", "bc").
fn write_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn write_f64(hasher: &mut Sha256, value: f64) {
    // -0.0 == 0.0, so both must hash alike
    let value = if value == 0.0 { 0.0 } else { value };
    hasher.update(value.to_bits().to_le_bytes());
}

fn write_location(hasher: &mut Sha256, location: &Location) {
    write_f64(hasher, location.longitude);
    write_f64(hasher, location.latitude);
    write_f64(hasher, location.timezone_offset);
    for field in [
        &location.timezone,
        &location.location_name,
        &location.complete_name,
        &location.country,
        &location.administrative_zone_1,
        &location.administrative_zone_2,
    ] {
        write_str(hasher, field);
    }
}
