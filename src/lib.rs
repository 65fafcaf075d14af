//! s3sel: A Fast, Modular Sentinel-3 Scene Selector for Per-Pixel Compositing
//!
//! This library implements the pixel-level decision logic of a multi-scene
//! mosaicking chain: given the stack of satellite scenes covering one output
//! pixel, pick the best one (minimum solar-zenith-angle within a platform, or
//! cross-sensor matching of acquisition-time codes between OLCI and SLSTR
//! granules) and emit its band values, degrading to explicit defaults or
//! empty output when nothing qualifies.
//!
//! The host platform supplies, per pixel and per datasource, a parallel pair
//! of scene-descriptor and sample sequences; everything here is a pure
//! function of those inputs and may be parallelized arbitrarily across
//! pixels.

pub mod core;
pub mod scene_id;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    BandValue, PixelContext, Platform, SampleRecord, SceneDescriptor, SelectError, SelectResult,
    Selection, DEFAULT_BAND_VALUE,
};

pub use scene_id::{parse_time_code, SceneId};

pub use crate::core::{
    evaluate_many, evaluate_many_pairs, scene_inventory, BestAngleParams, BestAngleSelector,
    ChannelMap, CloudVerdict, EvalOutput, EvalPolicy, GateBand, NoMatchPolicy, PixelEvaluator,
    ScdaInput, SlstrCalibration, SlstrView, TileUserData, TimeMatch, TimeMatchParams,
    TimeMatchSelector,
};
