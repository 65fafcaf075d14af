use serde::{Deserialize, Serialize};

use crate::core::scan::{arg_min_by, min_value_by, MIN_ZENITH_SEED};
use crate::types::{BandValue, PixelContext, Platform, SampleRecord, Selection};

/// Open-interval validity gate applied before angle comparison.
///
/// A candidate is eligible only if its gate band lies strictly inside
/// `(min, max)`; saturated and missing-data pixels fall outside and never
/// compete on angle. A sample without the gate band is rejected outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateBand {
    pub band: String,
    pub min: BandValue,
    pub max: BandValue,
}

impl GateBand {
    pub fn admits(&self, sample: &SampleRecord) -> bool {
        match sample.band(&self.band) {
            Some(value) => self.min < value && value < self.max,
            None => false,
        }
    }
}

impl Default for GateBand {
    fn default() -> Self {
        // TOA reflectance in B01: anything at or beyond 1.5 is saturation,
        // anything at or below 0 is fill
        Self {
            band: "B01".to_string(),
            min: 0.0,
            max: 1.5,
        }
    }
}

/// Parameters for single-platform best-angle selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestAngleParams {
    /// Platform whose scenes compete for the pixel
    pub platform: Platform,
    /// Band carrying the angle to minimize
    pub angle_band: String,
    /// Optional eligibility gate checked before angle comparison
    pub gate: Option<GateBand>,
}

impl Default for BestAngleParams {
    fn default() -> Self {
        Self {
            platform: Platform::S3A,
            angle_band: "SZA".to_string(),
            gate: Some(GateBand::default()),
        }
    }
}

/// Minimum-angle scene selector for one platform.
///
/// Two selection modes share the platform filter but differ in their scan
/// shape and their no-candidate behavior; see [`select`](Self::select) and
/// [`select_first_at_minimum`](Self::select_first_at_minimum).
pub struct BestAngleSelector {
    params: BestAngleParams,
}

impl BestAngleSelector {
    /// Create a selector for `platform` with default angle band and gate
    pub fn new(platform: Platform) -> Self {
        Self {
            params: BestAngleParams {
                platform,
                ..Default::default()
            },
        }
    }

    pub fn with_params(params: BestAngleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BestAngleParams {
        &self.params
    }

    /// Seeded minimum-angle selection with fallback to index 0.
    ///
    /// One pass over the context: platform filter, then the validity gate,
    /// then a strict-minimum comparison seeded at [`MIN_ZENITH_SEED`]. When
    /// no candidate qualifies the retained seed index 0 is reported as a
    /// fallback, and the caller decides what to emit there.
    pub fn select(&self, ctx: &PixelContext) -> Selection {
        let best = arg_min_by(
            ctx.iter(),
            |_, (scene, sample)| {
                if !scene.is_platform(self.params.platform) {
                    return None;
                }
                if let Some(gate) = &self.params.gate {
                    if !gate.admits(sample) {
                        return None;
                    }
                }
                sample.band(&self.params.angle_band)
            },
            MIN_ZENITH_SEED,
        );

        match best {
            Some((position, angle)) => {
                let index = ctx.scenes()[position].idx;
                log::debug!(
                    "selected {} scene {} at {} = {:.3}",
                    self.params.platform,
                    index,
                    self.params.angle_band,
                    angle
                );
                Selection::Found { index }
            }
            None => {
                log::debug!(
                    "no eligible {} scene; retaining seed index 0",
                    self.params.platform
                );
                Selection::Fallback { index: 0 }
            }
        }
    }

    /// Two-pass variant: emit the first scene sitting at the minimum angle.
    ///
    /// Pass 1 computes the plain minimum angle among platform scenes with
    /// no validity gate. Pass 2 walks the context again and latches on the
    /// first scene matching both the platform and that exact angle, so two
    /// scenes tied at the minimum never emit twice. A pixel with no
    /// platform scenes at all produces [`Selection::Empty`].
    pub fn select_first_at_minimum(&self, ctx: &PixelContext) -> Selection {
        let min_angle = min_value_by(ctx.iter(), |_, (scene, sample)| {
            if !scene.is_platform(self.params.platform) {
                return None;
            }
            sample.band(&self.params.angle_band)
        });

        let Some(min_angle) = min_angle else {
            log::debug!("no {} scene at pixel; emitting nothing", self.params.platform);
            return Selection::Empty;
        };

        for (scene, sample) in ctx.iter() {
            if !scene.is_platform(self.params.platform) {
                continue;
            }
            if sample.band(&self.params.angle_band) == Some(min_angle) {
                return Selection::Found { index: scene.idx };
            }
        }
        Selection::Empty
    }
}
