use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::best_angle::BestAngleSelector;
use crate::core::time_match::TimeMatchSelector;
use crate::types::{
    BandValue, PixelContext, Platform, SceneDescriptor, SelectError, SelectResult, Selection,
    DEFAULT_BAND_VALUE,
};

/// One output channel: host-facing id plus the input band it copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    pub band: String,
}

/// Declarative output schema for one evaluation script.
///
/// The original scripts spelled every channel out as a separate push/catch
/// pair; here the schema is data and the emission loop is written once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMap {
    channels: Vec<ChannelSpec>,
}

impl ChannelMap {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            channels: pairs
                .iter()
                .map(|(id, band)| ChannelSpec {
                    id: id.to_string(),
                    band: band.to_string(),
                })
                .collect(),
        }
    }

    /// The 26 OLCI channels: 21 TOA reflectances plus geometry and ozone
    fn olci() -> Self {
        let mut channels: Vec<ChannelSpec> = (1..=21)
            .map(|n| ChannelSpec {
                id: format!("toa{}", n),
                band: format!("B{:02}", n),
            })
            .collect();
        for (id, band) in [
            ("sza", "SZA"),
            ("vza", "VZA"),
            ("saa", "SAA"),
            ("vaa", "VAA"),
            ("totalozone", "TOTAL_COLUMN_OZONE"),
        ] {
            channels.push(ChannelSpec {
                id: id.to_string(),
                band: band.to_string(),
            });
        }
        Self { channels }
    }

    pub fn specs(&self) -> &[ChannelSpec] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Per-pixel output row: one optional scalar per declared channel, in
/// declaration order. `None` means "no value produced" and is rendered by
/// the host as nodata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalOutput {
    /// Correlation index of the chosen scene, when the script declares a
    /// pixel-id channel
    pub pixel_id: Option<usize>,
    pub channels: Vec<(String, Option<BandValue>)>,
}

impl EvalOutput {
    /// Emitted value of `id`, or `None` for an absent or empty channel
    pub fn channel(&self, id: &str) -> Option<BandValue> {
        self.channels
            .iter()
            .find(|(channel, _)| channel == id)
            .and_then(|(_, value)| *value)
    }

    /// True when every declared channel produced no value
    pub fn is_empty_row(&self) -> bool {
        self.channels.iter().all(|(_, value)| value.is_none())
    }
}

/// Scene inventory echoed into output-tile user metadata.
///
/// A pure copy of the descriptor list for downstream provenance; nothing
/// in the selection path reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileUserData {
    pub tiles: Vec<SceneDescriptor>,
}

/// Copy the scene descriptor list for attachment to output-tile metadata
pub fn scene_inventory(ctx: &PixelContext) -> TileUserData {
    TileUserData {
        tiles: ctx.scenes().to_vec(),
    }
}

/// Selection policy wired into an evaluator
pub enum EvalPolicy {
    /// Gated minimum-angle selection; failed reads degrade to default
    /// values with the pixel id still reported
    BestAngleWithDefaults(BestAngleSelector),
    /// Two-pass first-at-minimum selection; no match emits nothing
    FirstAtMinimum(BestAngleSelector),
    /// Cross-sensor acquisition-time match over a context pair
    TimeMatch(TimeMatchSelector),
    /// Single-candidate copy
    Passthrough,
}

/// Host-facing pixel evaluator: a selection policy plus an output schema.
///
/// The five preset constructors mirror the production scripts; custom
/// combinations can be assembled through [`PixelEvaluator::new`].
pub struct PixelEvaluator {
    channels: ChannelMap,
    pixel_id_channel: Option<String>,
    policy: EvalPolicy,
}

impl PixelEvaluator {
    pub fn new(
        channels: ChannelMap,
        pixel_id_channel: Option<String>,
        policy: EvalPolicy,
    ) -> Self {
        Self {
            channels,
            pixel_id_channel,
            policy,
        }
    }

    /// OLCI S3A script: gated best-angle selection over the full band set,
    /// defaults on read failure, pixel id reported
    pub fn olci_s3a() -> Self {
        Self {
            channels: ChannelMap::olci(),
            pixel_id_channel: Some("pixelidOLCI".to_string()),
            policy: EvalPolicy::BestAngleWithDefaults(BestAngleSelector::new(Platform::S3A)),
        }
    }

    /// OLCI S3B script: two-pass first-at-minimum selection, empty output
    /// when no S3B scene covers the pixel, no pixel id
    pub fn olci_s3b() -> Self {
        Self {
            channels: ChannelMap::olci(),
            pixel_id_channel: None,
            policy: EvalPolicy::FirstAtMinimum(BestAngleSelector::new(Platform::S3B)),
        }
    }

    /// SLSTR 1 km script: OLCI-referenced time match emitting the thermal
    /// channels S7/S8/S9
    pub fn slstr_1km() -> Self {
        Self {
            channels: ChannelMap::from_pairs(&[("S7", "S7"), ("S8", "S8"), ("S9", "S9")]),
            pixel_id_channel: Some("pixelidSLSTR1000".to_string()),
            policy: EvalPolicy::TimeMatch(TimeMatchSelector::new(Platform::S3A)),
        }
    }

    /// SLSTR 500 m script: OLCI-referenced time match emitting the solar
    /// reflectance channels S1/S5
    pub fn slstr_500m() -> Self {
        Self {
            channels: ChannelMap::from_pairs(&[("S1", "S1"), ("S5", "S5")]),
            pixel_id_channel: Some("pixelidSLSTR500".to_string()),
            policy: EvalPolicy::TimeMatch(TimeMatchSelector::new(Platform::S3A)),
        }
    }

    /// DEM script: the selector degenerates to identity on the single
    /// candidate
    pub fn dem() -> Self {
        Self {
            channels: ChannelMap::from_pairs(&[("dem", "DEM")]),
            pixel_id_channel: None,
            policy: EvalPolicy::Passthrough,
        }
    }

    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn pixel_id_channel(&self) -> Option<&str> {
        self.pixel_id_channel.as_deref()
    }

    /// Evaluate a single-datasource script (best-angle and passthrough
    /// policies)
    pub fn evaluate(&self, ctx: &PixelContext) -> SelectResult<EvalOutput> {
        match &self.policy {
            EvalPolicy::BestAngleWithDefaults(selector) => {
                let selection = selector.select(ctx);
                Ok(self.emit_with_defaults(ctx, selection))
            }
            EvalPolicy::FirstAtMinimum(selector) => {
                let selection = selector.select_first_at_minimum(ctx);
                Ok(match selection {
                    Selection::Found { index } => self.emit_row(ctx, index),
                    _ => self.empty_row(),
                })
            }
            EvalPolicy::Passthrough => Ok(self.emit_row(ctx, 0)),
            EvalPolicy::TimeMatch(_) => Err(SelectError::Policy(
                "time-match scripts take a reference and a target context",
            )),
        }
    }

    /// Evaluate a cross-sensor script over a (reference, target) pair
    pub fn evaluate_pair(
        &self,
        reference: &PixelContext,
        target: &PixelContext,
    ) -> SelectResult<EvalOutput> {
        match &self.policy {
            EvalPolicy::TimeMatch(selector) => {
                let outcome = selector.select(reference, target);
                Ok(match outcome.selection {
                    Selection::Found { index } | Selection::Fallback { index } => {
                        self.emit_row(target, index)
                    }
                    Selection::Empty => self.empty_row(),
                })
            }
            _ => Err(SelectError::Policy(
                "single-datasource scripts take one pixel context",
            )),
        }
    }

    /// Emit the row at `index`, substituting the default value for every
    /// channel when the sample cannot be read back. The pixel id keeps the
    /// selected index either way, which is how downstream tells a failed
    /// row (all defaults) from a real one.
    fn emit_with_defaults(&self, ctx: &PixelContext, selection: Selection) -> EvalOutput {
        let index = selection.index().unwrap_or(0);
        let pixel_id = self.pixel_id_channel.as_ref().map(|_| index);
        match self.read_row(ctx, index) {
            Ok(values) => EvalOutput {
                pixel_id,
                channels: self.zip_values(values.into_iter().map(Some)),
            },
            Err(err) => {
                log::warn!(
                    "sample read failed at index {}: {}; emitting defaults",
                    index,
                    err
                );
                EvalOutput {
                    pixel_id,
                    channels: self.zip_values(std::iter::repeat(Some(DEFAULT_BAND_VALUE))),
                }
            }
        }
    }

    /// Emit the row at `index`, or an all-empty row when the sample cannot
    /// be read back
    fn emit_row(&self, ctx: &PixelContext, index: usize) -> EvalOutput {
        let pixel_id = self.pixel_id_channel.as_ref().map(|_| index);
        match self.read_row(ctx, index) {
            Ok(values) => EvalOutput {
                pixel_id,
                channels: self.zip_values(values.into_iter().map(Some)),
            },
            Err(err) => {
                log::warn!("sample read failed at index {}: {}", index, err);
                EvalOutput {
                    pixel_id,
                    channels: self.zip_values(std::iter::repeat(None)),
                }
            }
        }
    }

    fn empty_row(&self) -> EvalOutput {
        EvalOutput {
            pixel_id: None,
            channels: self.zip_values(std::iter::repeat(None)),
        }
    }

    fn zip_values(
        &self,
        values: impl Iterator<Item = Option<BandValue>>,
    ) -> Vec<(String, Option<BandValue>)> {
        self.channels
            .specs()
            .iter()
            .map(|spec| spec.id.clone())
            .zip(values)
            .collect()
    }

    /// Read every declared band at `index`; any missing band fails the
    /// whole row so the caller can decide between defaults and emptiness
    fn read_row(&self, ctx: &PixelContext, index: usize) -> SelectResult<Vec<BandValue>> {
        let sample = ctx.sample_at(index)?;
        self.channels
            .specs()
            .iter()
            .map(|spec| sample.require(&spec.band))
            .collect()
    }
}

/// Evaluate many independent pixels of a single-datasource script in
/// parallel. Each invocation owns its working state exclusively, so the
/// host may partition pixels however it likes.
pub fn evaluate_many(
    evaluator: &PixelEvaluator,
    pixels: &[PixelContext],
) -> Vec<SelectResult<EvalOutput>> {
    log::debug!("evaluating {} pixels", pixels.len());
    pixels.par_iter().map(|ctx| evaluator.evaluate(ctx)).collect()
}

/// Parallel variant for cross-sensor scripts over (reference, target)
/// context pairs
pub fn evaluate_many_pairs(
    evaluator: &PixelEvaluator,
    pixels: &[(PixelContext, PixelContext)],
) -> Vec<SelectResult<EvalOutput>> {
    log::debug!("evaluating {} pixel pairs", pixels.len());
    pixels
        .par_iter()
        .map(|(reference, target)| evaluator.evaluate_pair(reference, target))
        .collect()
}
