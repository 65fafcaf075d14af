//! Simple Cloud Detection Algorithm (SCDA) v2.0 over SLSTR channels,
//! after Metsämäki et al. (2015), Remote Sensing of Environment 156,
//! 96-108, Fig. 5.
//!
//! Operates on the exact channels the SLSTR selectors emit: the S1 and S5
//! solar reflectances (S5 radiometrically adjusted, see
//! [`calibrate`](crate::core::calibrate)) and the S7/S8/S9 brightness
//! temperatures.

use serde::{Deserialize, Serialize};

use crate::core::calibrate::SlstrCalibration;
use crate::types::{SampleRecord, SelectResult};

/// Normalized Difference Snow Index
pub fn ndsi(r550: f32, r16: f32) -> f32 {
    (r550 - r16) / (r550 + r16)
}

/// Per-pixel SCDA inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScdaInput {
    /// TOA reflectance, channel S1 (550 nm)
    pub r550: f32,
    /// TOA reflectance, channel S5 (1.6 um), radiometrically adjusted
    pub r16: f32,
    /// Brightness temperature, channel S7 (3.7 um), kelvin
    pub bt37: f32,
    /// Brightness temperature, channel S8 (11 um), kelvin
    pub bt11: f32,
    /// Brightness temperature, channel S9 (12 um), kelvin
    pub bt12: f32,
}

impl ScdaInput {
    /// Assemble inputs from a selected SLSTR sample, applying the S5
    /// adjustment on the way
    pub fn from_sample(sample: &SampleRecord, calibration: &SlstrCalibration) -> SelectResult<Self> {
        Ok(Self {
            r550: sample.require("S1")?,
            r16: calibration.adjust("S5", sample.require("S5")?),
            bt37: sample.require("S7")?,
            bt11: sample.require("S8")?,
            bt12: sample.require("S9")?,
        })
    }
}

/// SCDA classification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudVerdict {
    Cloudy,
    Clear,
}

impl CloudVerdict {
    pub fn is_cloudy(&self) -> bool {
        matches!(self, CloudVerdict::Cloudy)
    }
}

/// Classify one pixel.
///
/// Tests 1-3 use static thresholds; tests 4 and 5 only steer the adaptive
/// thresholds `THR` and `S` used by test 6. An invalid (non-finite) R550
/// classifies as cloudy, matching the algorithm's invalid-pixel masking.
pub fn classify(input: &ScdaInput) -> CloudVerdict {
    if !input.r550.is_finite() {
        return CloudVerdict::Cloudy;
    }

    let ndsi = ndsi(input.r550, input.r16);
    let btd = input.bt11 - input.bt37;

    let t1 = input.r550 > 0.30 && ndsi / input.r550 < 0.8 && input.bt12 <= 290.0;
    let t2 = btd < -13.0
        && input.r550 > 0.15
        && ndsi >= -0.30
        && input.r16 > 0.10
        && input.bt12 <= 293.0;
    let t3 = btd < -30.0;
    if t1 || t2 || t3 {
        return CloudVerdict::Cloudy;
    }

    // t4 relaxes THRmax, t5 tightens the NDSI/R550 slope
    let thr_max = if input.r550 < 0.75 && input.bt12 > 265.0 {
        -5.5
    } else {
        -8.0
    };
    let thr = (0.5 * input.bt12 - 133.0).min(thr_max);
    let s = if input.r550 > 0.75 { 1.1 } else { 1.5 };

    let t6 = btd < thr
        && ndsi / input.r550 < s
        && (-0.02..=0.75).contains(&ndsi)
        && input.bt12 <= 270.0
        && input.r550 > 0.18;

    if t6 {
        CloudVerdict::Cloudy
    } else {
        CloudVerdict::Clear
    }
}
