//! SLSTR radiometric adjustment.
//!
//! Per the ESA Sentinel-3 Product Notice for SLSTR, the S5 and S6 TOA
//! reflectances are to be adjusted by fixed factors pending an updated
//! on-ground calibration: 1.12 and 1.20 in the nadir view, 1.15 and 1.26
//! in the oblique view.

use serde::{Deserialize, Serialize};

use crate::types::{BandValue, SampleRecord};

/// SLSTR viewing geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlstrView {
    Nadir,
    Oblique,
}

/// Applies the published S5/S6 adjustment factors for one view
#[derive(Debug, Clone, Copy)]
pub struct SlstrCalibration {
    view: SlstrView,
}

impl SlstrCalibration {
    pub fn new(view: SlstrView) -> Self {
        Self { view }
    }

    /// Published factor for `band`, or `None` for bands without one
    pub fn factor(&self, band: &str) -> Option<BandValue> {
        match (band, self.view) {
            ("S5", SlstrView::Nadir) => Some(1.12),
            ("S5", SlstrView::Oblique) => Some(1.15),
            ("S6", SlstrView::Nadir) => Some(1.20),
            ("S6", SlstrView::Oblique) => Some(1.26),
            _ => None,
        }
    }

    /// Adjust a reflectance; bands without a published factor pass through
    pub fn adjust(&self, band: &str, value: BandValue) -> BandValue {
        match self.factor(band) {
            Some(factor) => value * factor,
            None => value,
        }
    }

    /// Adjust every affected band of a sample in place
    pub fn adjust_record(&self, sample: &mut SampleRecord) {
        for band in ["S5", "S6"] {
            if let Some(value) = sample.band(band) {
                sample.insert(band, self.adjust(band, value));
            }
        }
    }
}

impl Default for SlstrCalibration {
    fn default() -> Self {
        Self::new(SlstrView::Nadir)
    }
}
