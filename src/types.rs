use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::scene_id::SceneId;

/// Scalar carried by one band of one scene sample (host channels are FLOAT32)
pub type BandValue = f32;

/// Value substituted for every output channel when a selected sample
/// cannot be read back
pub const DEFAULT_BAND_VALUE: BandValue = 0.0;

/// Sentinel-3 platform (constellation unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    S3A,
    S3B,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::S3A => "S3A",
            Platform::S3B => "S3B",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S3A" => Ok(Platform::S3A),
            "S3B" => Ok(Platform::S3B),
            other => Err(SelectError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Per-scene, per-pixel mapping from band name to value.
///
/// Produced by the host for every contributing scene; read-only to the
/// selectors. Band lookups return an explicit result so callers decide
/// default substitution themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    bands: HashMap<String, BandValue>,
}

impl SampleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, BandValue)>,
        S: Into<String>,
    {
        Self {
            bands: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn insert(&mut self, band: impl Into<String>, value: BandValue) {
        self.bands.insert(band.into(), value);
    }

    /// Value of `band`, or `None` when the host supplied no such band
    pub fn band(&self, band: &str) -> Option<BandValue> {
        self.bands.get(band).copied()
    }

    /// Value of `band`, or a `MissingBand` error
    pub fn require(&self, band: &str) -> SelectResult<BandValue> {
        self.band(band)
            .ok_or_else(|| SelectError::MissingBand(band.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// One contributing scene at one pixel.
///
/// `tile_id` is the opaque identifier supplied by the host; `idx` is the
/// host correlation index into the parallel sample sequence. The embedded
/// product name is parsed once at construction, so downstream filters never
/// slice the raw string again. An identifier with no recognizable product
/// name leaves `scene_id` unset and the scene matches no platform filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub tile_id: String,
    pub idx: usize,
    pub scene_id: Option<SceneId>,
}

impl SceneDescriptor {
    pub fn new(tile_id: impl Into<String>, idx: usize) -> Self {
        let tile_id = tile_id.into();
        let scene_id = match SceneId::from_tile_id(&tile_id) {
            Ok(id) => Some(id),
            Err(err) => {
                log::debug!("scene {} has no parseable product name: {}", idx, err);
                None
            }
        };
        Self {
            tile_id,
            idx,
            scene_id,
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        self.scene_id.as_ref().map(|id| id.platform)
    }

    pub fn is_platform(&self, platform: Platform) -> bool {
        self.platform() == Some(platform)
    }

    /// Four-digit `hhmm` acquisition code, when the identifier parsed
    pub fn time_code(&self) -> Option<u32> {
        self.scene_id.as_ref().map(|id| id.time_code())
    }
}

/// Parallel scene/sample sequences for one datasource at one pixel.
///
/// Invariant: descriptor `i` and sample `i` describe the same scene. The
/// constructor rejects mismatched lengths so the scans never have to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelContext {
    scenes: Vec<SceneDescriptor>,
    samples: Vec<SampleRecord>,
}

impl PixelContext {
    pub fn new(scenes: Vec<SceneDescriptor>, samples: Vec<SampleRecord>) -> SelectResult<Self> {
        if scenes.len() != samples.len() {
            return Err(SelectError::LengthMismatch {
                scenes: scenes.len(),
                samples: samples.len(),
            });
        }
        Ok(Self { scenes, samples })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> &[SceneDescriptor] {
        &self.scenes
    }

    pub fn samples(&self) -> &[SampleRecord] {
        &self.samples
    }

    /// Sample at a correlation index chosen by a selector
    pub fn sample_at(&self, index: usize) -> SelectResult<&SampleRecord> {
        self.samples.get(index).ok_or(SelectError::IndexOutOfRange {
            index,
            len: self.samples.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SceneDescriptor, &SampleRecord)> {
        self.scenes.iter().zip(self.samples.iter())
    }
}

/// Outcome of one selection pass over a pixel context.
///
/// `Fallback` carries the retained seed index so call sites can substitute
/// defaults while still reporting a pixel id; `Empty` means nothing should
/// be emitted at all. The two no-candidate shapes exist because the OLCI
/// scripts disagree on purpose: the S3A script degrades to defaults, the
/// S3B script emits zero-length channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// A candidate satisfied the selection rule
    Found { index: usize },
    /// No candidate qualified; the seed index is retained for emission
    Fallback { index: usize },
    /// No candidate qualified and nothing is emitted
    Empty,
}

impl Selection {
    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::Found { index } | Selection::Fallback { index } => Some(*index),
            Selection::Empty => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Selection::Found { .. })
    }
}

/// Error types for scene selection
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("band '{0}' not present in sample")]
    MissingBand(String),

    #[error("scene list has {scenes} entries but sample list has {samples}")]
    LengthMismatch { scenes: usize, samples: usize },

    #[error("identifier '{0}' does not embed a Sentinel-3 product name")]
    IdFormat(String),

    #[error("sample index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("policy mismatch: {0}")]
    Policy(&'static str),
}

/// Result type for selection operations
pub type SelectResult<T> = Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip() {
        assert_eq!("S3A".parse::<Platform>().unwrap(), Platform::S3A);
        assert_eq!(Platform::S3B.to_string(), "S3B");
        assert!("S3C".parse::<Platform>().is_err());
    }

    #[test]
    fn test_sample_record_lookup() {
        let sample = SampleRecord::from_pairs([("B01", 0.42f32), ("SZA", 55.0)]);
        assert_eq!(sample.band("B01"), Some(0.42));
        assert_eq!(sample.band("B02"), None);
        assert!(sample.require("SZA").is_ok());
        assert!(matches!(
            sample.require("B02"),
            Err(SelectError::MissingBand(_))
        ));
    }

    #[test]
    fn test_context_rejects_length_mismatch() {
        let scenes = vec![SceneDescriptor::new("not-a-product", 0)];
        let result = PixelContext::new(scenes, vec![]);
        assert!(matches!(
            result,
            Err(SelectError::LengthMismatch {
                scenes: 1,
                samples: 0
            })
        ));
    }

    #[test]
    fn test_unparseable_identifier_matches_no_platform() {
        let scene = SceneDescriptor::new("LC08_L1TP_2021_something", 3);
        assert_eq!(scene.scene_id, None);
        assert!(!scene.is_platform(Platform::S3A));
        assert!(!scene.is_platform(Platform::S3B));
    }
}
