//! Inter-draw diffusion probe.
//!
//! Each trial draws two successive values from a stream source and counts the
//! bits in which they differ. For a good generator the distance averages
//! `width / 2`. This measures diffusion between independent draws, not the
//! response to a single flipped input bit.

use rdt_core::{StreamSource, bytes_per_value, width_mask};
use serde::Serialize;

use crate::error::BatteryError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvalancheOutcome {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    pub trials: usize,
}

pub fn avalanche(
    source: &mut dyn StreamSource,
    trials: usize,
    width: u32,
) -> Result<AvalancheOutcome, BatteryError> {
    bytes_per_value(width).map_err(|_| BatteryError::InvalidWidth { width })?;
    if trials == 0 {
        return Err(BatteryError::degenerate("avalanche", "zero trials"));
    }
    let mask = width_mask(width);

    let mut total = 0u64;
    let mut min = u32::MAX;
    let mut max = 0u32;
    for _ in 0..trials {
        let a = source.next_word() & mask;
        let b = source.next_word() & mask;
        let flips = (a ^ b).count_ones();
        total += flips as u64;
        min = min.min(flips);
        max = max.max(flips);
    }
    Ok(AvalancheOutcome {
        mean: total as f64 / trials as f64,
        min,
        max,
        trials,
    })
}
