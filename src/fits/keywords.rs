//! FITS keyword definitions
//!
//! This module loads human-readable descriptions of common keywords,
//! projection codes and BITPIX values from the bundled TOML table.

use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::fits::errors::{FitsError, FitsResult};

lazy_static! {
    // Parse the bundled table once, on first use
    static ref FITS_DEFINITIONS: FitsDefinitions = {
        let content = include_str!("../../fits_keywords.toml");
        FitsDefinitions::from_str(content).unwrap_or_else(|e| {
            log::warn!("Failed to parse FITS keyword definitions: {}", e);
            FitsDefinitions::default()
        })
    };
}

/// Container for keyword, projection and BITPIX descriptions
#[derive(Debug, Default)]
pub struct FitsDefinitions {
    // Maps keyword names to descriptions
    pub keyword_descriptions: HashMap<String, String>,
    // Maps three-letter projection codes to names
    pub projection_names: HashMap<String, String>,
    // Maps BITPIX values to sample type names
    pub bitpix_names: HashMap<i64, String>,
}

impl FitsDefinitions {
    /// Parse definitions from a TOML string
    pub fn from_str(content: &str) -> FitsResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| FitsError::GenericError(format!("Failed to parse TOML: {}", e)))?;

        let mut defs = FitsDefinitions::default();
        Self::parse_string_table(&toml_value, "keywords", &mut defs.keyword_descriptions);
        Self::parse_string_table(&toml_value, "projection_codes", &mut defs.projection_names);

        if let Some(table) = toml_value.get("bitpix_codes").and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(code), Some(name)) = (k.parse::<i64>(), v.as_str()) {
                    defs.bitpix_names.insert(code, name.to_string());
                }
            }
        }

        Ok(defs)
    }

    fn parse_string_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<String, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let Some(description) = v.as_str() {
                    target.insert(k.to_uppercase(), description.to_string());
                }
            }
        }
    }
}

/// Get the description of a keyword, if it is a known one
pub fn keyword_description(keyword: &str) -> Option<&'static str> {
    FITS_DEFINITIONS.keyword_descriptions
        .get(&keyword.to_uppercase())
        .map(String::as_str)
}

/// Get the name of a projection code (e.g. "TAN" -> "Gnomonic")
pub fn projection_name(code: &str) -> String {
    FITS_DEFINITIONS.projection_names
        .get(&code.to_uppercase())
        .cloned()
        .unwrap_or_else(|| format!("Unknown projection {}", code))
}

/// Get the sample type name of a BITPIX value
pub fn bitpix_name(bitpix: i64) -> String {
    FITS_DEFINITIONS.bitpix_names
        .get(&bitpix)
        .cloned()
        .unwrap_or_else(|| format!("Unknown-{}", bitpix))
}
