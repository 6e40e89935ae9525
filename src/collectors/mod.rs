//! Collectors module.
//!
//! Holds the block-device statistics collector that reads /proc/diskstats.

pub mod diskstats;
