use serde::{Deserialize, Serialize};

use crate::core::scan::{arg_min_by, MIN_ZENITH_SEED};
use crate::types::{PixelContext, Platform, Selection};

/// Behavior when no target scene carries the reference time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoMatchPolicy {
    /// Emit the bands at the given correlation index anyway. This is the
    /// historical behavior; the emitted scene may be unrelated to the
    /// reference overpass.
    UseFallback(usize),
    /// Surface the absence instead of emitting an unrelated scene
    ReportMissing,
}

impl Default for NoMatchPolicy {
    fn default() -> Self {
        NoMatchPolicy::UseFallback(0)
    }
}

/// Parameters for cross-sensor acquisition-time matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMatchParams {
    /// Platform filter applied to both datasources
    pub platform: Platform,
    /// Reference-datasource band carrying the angle to minimize
    pub angle_band: String,
    pub on_no_match: NoMatchPolicy,
}

impl Default for TimeMatchParams {
    fn default() -> Self {
        Self {
            platform: Platform::S3A,
            angle_band: "SZA".to_string(),
            on_no_match: NoMatchPolicy::default(),
        }
    }
}

/// Result of one cross-sensor match: the chosen target selection plus
/// whether a genuine time-code match occurred. `matched == false` with a
/// `Fallback` selection means the emitted scene was never aligned to the
/// reference, which downstream diagnostics may want to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMatch {
    pub selection: Selection,
    pub matched: bool,
}

/// Aligns one sensor's scene list to another via embedded acquisition-time
/// codes.
///
/// OLCI and SLSTR granules of the same overpass are tiled independently,
/// so correlation indices are not comparable across the two datasources.
/// The scene with the best reference-sensor illumination supplies an
/// `hhmm` code, and the target scene carrying the same code (numerically)
/// is the near-simultaneous observation to emit.
pub struct TimeMatchSelector {
    params: TimeMatchParams,
}

impl TimeMatchSelector {
    /// Create a selector for `platform` with default angle band and the
    /// historical index-0 fallback
    pub fn new(platform: Platform) -> Self {
        Self {
            params: TimeMatchParams {
                platform,
                ..Default::default()
            },
        }
    }

    pub fn with_params(params: TimeMatchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TimeMatchParams {
        &self.params
    }

    /// Match the target datasource to the reference.
    ///
    /// Step 1 runs the seeded minimum-angle scan over the reference context
    /// (platform filter, no validity gate) and takes the winning scene's
    /// time code as the join key. Step 2 scans the whole target context;
    /// every scene whose code equals the key overwrites the recorded index,
    /// so the last match wins. There is deliberately no early exit here, in
    /// contrast to the two-pass selector's latch.
    pub fn select(&self, reference: &PixelContext, target: &PixelContext) -> TimeMatch {
        let time_key = self.reference_time_key(reference);

        let mut chosen: Option<usize> = None;
        if let Some(key) = time_key {
            for (scene, _) in target.iter() {
                if !scene.is_platform(self.params.platform) {
                    continue;
                }
                let Some(code) = scene.time_code() else {
                    continue;
                };
                if code == key {
                    chosen = Some(scene.idx);
                }
            }
        }

        match chosen {
            Some(index) => {
                log::debug!("time code {:04} matched target scene {}", time_key.unwrap_or(0), index);
                TimeMatch {
                    selection: Selection::Found { index },
                    matched: true,
                }
            }
            None => {
                let selection = match self.params.on_no_match {
                    NoMatchPolicy::UseFallback(index) => {
                        log::debug!("no target scene matched; falling back to index {}", index);
                        Selection::Fallback { index }
                    }
                    NoMatchPolicy::ReportMissing => Selection::Empty,
                };
                TimeMatch {
                    selection,
                    matched: false,
                }
            }
        }
    }

    /// Time code of the reference scene with minimum angle
    fn reference_time_key(&self, reference: &PixelContext) -> Option<u32> {
        let (position, _) = arg_min_by(
            reference.iter(),
            |_, (scene, sample)| {
                if !scene.is_platform(self.params.platform) {
                    return None;
                }
                sample.band(&self.params.angle_band)
            },
            MIN_ZENITH_SEED,
        )?;
        reference.scenes()[position].time_code()
    }
}
