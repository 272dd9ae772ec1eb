//! Region of interest selection
//!
//! This module picks the sub-window of a decoded image that the color
//! analyses average over.

pub mod selector;

pub use selector::{crop, select_region, RegionSelector, Roi};
