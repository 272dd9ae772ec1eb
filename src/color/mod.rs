//! Color statistics and classification module
//!
//! This module computes mean colors over sampled regions and maps them to
//! a urine color label and a nitrite estimate.

pub mod conversion;
pub mod classifier;
pub mod nitrite;

pub use conversion::{ColorConverter, HsvReading, MeanColor};
pub use classifier::{classify_urine_color, UrineColor, UrineColorClassifier, UrineColorReading};
pub use nitrite::{estimate_nitrite, NitriteEstimate, NitriteMode};
