use crate::error::Result;
use crate::models::StationLocations;
use crate::utils::constants::{COUNTRY_CODE_LEN, COUNTRY_MIN_LINE_LEN, COUNTRY_NAME_START};
use crate::utils::text::decode_text;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Country names keyed by two-letter code
pub type Countries = HashMap<String, String>;

/// Read a country code table: two-letter code, a separator, then the name
pub fn read_countries(path: &Path) -> Result<Countries> {
    let bytes = std::fs::read(path)?;
    let countries: Countries = decode_text(&bytes).lines().filter_map(parse_country_line).collect();

    info!("Loaded {} countries from {}", countries.len(), path.display());
    Ok(countries)
}

pub fn parse_country_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.len() < COUNTRY_MIN_LINE_LEN {
        return None;
    }
    let code = line.get(..COUNTRY_CODE_LEN)?;
    let name = line.get(COUNTRY_NAME_START..)?;
    Some((code.to_string(), name.to_string()))
}

/// Fill in each station's country from the code prefix of its id.
/// Returns how many stations were matched.
pub fn attach_countries(locations: &mut StationLocations, countries: &Countries) -> usize {
    let mut matched = 0;
    for location in locations.values_mut() {
        let country = location
            .country_code()
            .and_then(|code| countries.get(code))
            .cloned();
        if country.is_some() {
            matched += 1;
        }
        location.country = country;
    }
    matched
}
