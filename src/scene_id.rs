use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::types::{Platform, SelectError, SelectResult};

/// Matches the ESA Sentinel-3 product name anywhere inside a host tile
/// identifier: platform, instrument, level, type, then the sensing start
/// timestamp, e.g. `S3A_OL_1_EFR____20210705T141020_...`
fn product_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(S3[AB])_[A-Z]{2}_\d_[A-Z0-9_]{6}_(\d{8}T\d{6})")
            .expect("product name pattern")
    })
}

/// Parsed identity of one Sentinel-3 product.
///
/// Host tile identifiers are opaque strings that embed the product name at
/// varying positions depending on how much path prefix the platform keeps
/// in front of it. Parsing locates the name by an unanchored search instead
/// of absolute character offsets, so the same descriptor type serves OLCI
/// and SLSTR identifiers of any prefix length. Parsing happens once at
/// ingestion; everything downstream works with typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneId {
    pub platform: Platform,
    /// Sensing start from the product name, second precision
    pub start_time: NaiveDateTime,
}

impl SceneId {
    /// Locate and parse the product name embedded in a tile identifier
    pub fn from_tile_id(tile_id: &str) -> SelectResult<Self> {
        let caps = product_name_re()
            .captures(tile_id)
            .ok_or_else(|| SelectError::IdFormat(tile_id.to_string()))?;
        let platform = caps[1].parse()?;
        let start_time = NaiveDateTime::parse_from_str(&caps[2], "%Y%m%dT%H%M%S")
            .map_err(|_| SelectError::IdFormat(tile_id.to_string()))?;
        Ok(Self {
            platform,
            start_time,
        })
    }

    /// Four-digit `hhmm` acquisition code.
    ///
    /// This is the cross-sensor join key: OLCI and SLSTR granules of the
    /// same overpass share it even though their product names differ
    /// everywhere else. Always compared numerically, never as a string.
    pub fn time_code(&self) -> u32 {
        self.start_time.hour() * 100 + self.start_time.minute()
    }
}

/// Leading-digit integer parse for raw acquisition codes.
///
/// Codes sliced out of identifiers may carry leading zeros or trailing
/// non-digit characters; `"0090"` and `"90"` must compare equal.
pub fn parse_time_code(raw: &str) -> Option<u32> {
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    if end == 0 {
        return None;
    }
    raw[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const OLCI_ID: &str =
        "S3A_OL_1_EFR____20210705T141020_20210705T141320_20210706T190011_0179_073_367_1980_LN1_O_NT_002";
    const SLSTR_ID: &str =
        "S3A_SL_1_RBT____20210705T141520_20210705T141820_20210706T195303_0179_073_367_1980_LN2_O_NT_004";

    #[test]
    fn test_parse_olci_product_name() {
        let id = SceneId::from_tile_id(OLCI_ID).unwrap();
        assert_eq!(id.platform, Platform::S3A);
        assert_eq!(
            id.start_time,
            NaiveDate::from_ymd_opt(2021, 7, 5)
                .unwrap()
                .and_hms_opt(14, 10, 20)
                .unwrap()
        );
        assert_eq!(id.time_code(), 1410);
    }

    #[test]
    fn test_prefix_length_does_not_matter() {
        // The same product name behind prefixes of different lengths must
        // parse identically; the source scripts disagreed on slice offsets
        // for exactly this reason.
        let short = format!("tiles/{}", SLSTR_ID);
        let long = format!("s3://eodata/Sentinel-3/SLSTR/SL_1_RBT/2021/07/05/{}", SLSTR_ID);
        let a = SceneId::from_tile_id(&short).unwrap();
        let b = SceneId::from_tile_id(&long).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.time_code(), 1415);
    }

    #[test]
    fn test_s3b_platform() {
        let id = SceneId::from_tile_id("S3B_OL_1_EFR____20210705T095920_x").unwrap();
        assert_eq!(id.platform, Platform::S3B);
        assert_eq!(id.time_code(), 959);
    }

    #[test]
    fn test_rejects_foreign_identifier() {
        assert!(SceneId::from_tile_id("S2A_MSIL1C_20210705T141021_N0301").is_err());
        assert!(SceneId::from_tile_id("").is_err());
    }

    #[test]
    fn test_rejects_impossible_timestamp() {
        // Pattern matches but the clock fields are out of range
        assert!(SceneId::from_tile_id("S3A_OL_1_EFR____20210705T259999_x").is_err());
    }

    #[test]
    fn test_lenient_time_code_parse() {
        assert_eq!(parse_time_code("0090"), Some(90));
        assert_eq!(parse_time_code("90"), Some(90));
        assert_eq!(parse_time_code("1234_rest"), Some(1234));
        assert_eq!(parse_time_code("T1234"), None);
        assert_eq!(parse_time_code(""), None);
    }
}
