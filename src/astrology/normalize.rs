//! Boundary layer between the loosely-typed placement service payloads and
//! the canonical chart model.
//!
//! Nothing here fails: a field that is missing or has the wrong shape falls
//! back to its default, and a collection that is absent or not an array
//! normalizes to an empty list.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::chart::{HousePlacement, Location, Placement};

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_house_number<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| (1..=12).contains(n))
        .map(|n| n as u8))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocalizedName {
    #[serde(deserialize_with = "lenient_string")]
    en: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawZodiacSign {
    #[serde(deserialize_with = "lenient")]
    name: LocalizedName,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlanet {
    #[serde(deserialize_with = "lenient")]
    planet: LocalizedName,
    #[serde(deserialize_with = "lenient")]
    zodiac_sign: RawZodiacSign,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHouse {
    #[serde(rename = "House", deserialize_with = "lenient_house_number")]
    house: Option<u8>,
    #[serde(deserialize_with = "lenient")]
    zodiac_sign: RawZodiacSign,
}

fn objects(collection: Option<&Value>) -> Vec<&Value> {
    match collection {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).collect(),
        _ => Vec::new(),
    }
}

fn decode<T: DeserializeOwned + Default>(record: &Value) -> T {
    T::deserialize(record).unwrap_or_default()
}

/// Normalize a planets response. Records live under `output`.
pub fn normalize_planets(payload: &Value) -> Vec<Placement> {
    objects(payload.get("output"))
        .into_iter()
        .map(decode::<RawPlanet>)
        .map(|raw| Placement {
            name: raw.planet.en,
            sign: raw.zodiac_sign.name.en,
        })
        .collect()
}

/// Normalize a houses response. Records live under `output.Houses`.
///
/// Records without a house number in 1..=12 are dropped, and the first record
/// wins when a number repeats.
pub fn normalize_houses(payload: &Value) -> Vec<HousePlacement> {
    let mut seen = HashSet::new();
    let mut houses = Vec::new();

    for raw in objects(payload.pointer("/output/Houses"))
        .into_iter()
        .map(decode::<RawHouse>)
    {
        let Some(house) = raw.house else {
            log::debug!("Dropping house record without a valid house number");
            continue;
        };
        if !seen.insert(house) {
            log::debug!("Dropping duplicate record for house {}", house);
            continue;
        }
        houses.push(HousePlacement {
            house,
            sign: raw.zodiac_sign.name.en,
        });
    }

    houses
}

/// Normalize a geocoding response into candidate locations.
///
/// Accepts a top-level array, an `output` array, or a single location object.
pub fn normalize_locations(payload: &Value) -> Vec<Location> {
    let records: Vec<&Value> = match payload {
        Value::Array(_) => objects(Some(payload)),
        Value::Object(map) if map.get("output").is_some_and(Value::is_array) => {
            objects(map.get("output"))
        }
        Value::Object(map) if map.contains_key("latitude") && map.contains_key("longitude") => {
            vec![payload]
        }
        _ => Vec::new(),
    };

    records
        .into_iter()
        .filter_map(|record| Location::deserialize(record).ok())
        .collect()
}
