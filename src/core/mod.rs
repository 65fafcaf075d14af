//! Core selection and matching modules

pub mod best_angle;
pub mod calibrate;
pub mod evaluate;
pub mod scan;
pub mod scda;
pub mod time_match;

// Re-export main types
pub use best_angle::{BestAngleParams, BestAngleSelector, GateBand};
pub use calibrate::{SlstrCalibration, SlstrView};
pub use evaluate::{
    evaluate_many, evaluate_many_pairs, scene_inventory, ChannelMap, ChannelSpec, EvalOutput,
    EvalPolicy, PixelEvaluator, TileUserData,
};
pub use scan::{arg_min_by, min_value_by, MIN_ZENITH_SEED};
pub use scda::{classify, ndsi, CloudVerdict, ScdaInput};
pub use time_match::{NoMatchPolicy, TimeMatch, TimeMatchParams, TimeMatchSelector};
