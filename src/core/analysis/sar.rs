// src/core/analysis/sar.rs
//
// Short amplitude reversal (SAR) detection and repair.
//
// A SAR is a wraparound/overflow artifact: the waveform jumps to the
// opposite sign at high magnitude and jumps back within a few samples.
// Detection and repair share one scan; repair flips the offending sample
// in place, and later comparisons observe the flipped value.

use serde::{Deserialize, Serialize};

use crate::core::waveform::Waveform;

/// Samples searched after an onset for the jump back
const RECOVERY_WINDOW: usize = 5;

/// Trailing samples never used as scan start points
/// (one onset sample plus the recovery window)
const SCAN_TAIL: usize = RECOVERY_WINDOW + 1;

/// A jump counts when it exceeds this multiple of the waveform maximum
const JUMP_FACTOR: f32 = 1.5;

/// Result of a detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarDetection {
    pub count: usize,
    /// Sample index of each reversal, ascending
    pub events: Vec<usize>,
}

/// Result of a repair pass
#[derive(Debug, Clone, PartialEq)]
pub struct SarRepair {
    pub waveform: Waveform,
    pub count: usize,
    pub events: Vec<usize>,
}

impl SarRepair {
    pub fn repaired_any(&self) -> bool {
        self.count > 0
    }
}

/// Hangover state carried across scan iterations
#[derive(Debug, Clone, Copy, Default)]
struct ReversalState {
    /// Set when the current onset found its recovery edge
    pending: bool,
    /// Index that closed the previous reversal; it may not open another
    last_recovery_edge: Option<usize>,
}

/// What the scan does at each confirmed reversal
trait ScanTarget {
    fn samples(&self) -> &[f32];
    fn on_reversal(&mut self, index: usize);
}

/// Records events, leaves samples untouched
struct Observe<'a> {
    samples: &'a [f32],
    events: Vec<usize>,
}

impl ScanTarget for Observe<'_> {
    fn samples(&self) -> &[f32] {
        self.samples
    }

    fn on_reversal(&mut self, index: usize) {
        self.events.push(index);
    }
}

/// Records events and flips the reversed sample back
struct Restore {
    samples: Vec<f32>,
    events: Vec<usize>,
}

impl ScanTarget for Restore {
    fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn on_reversal(&mut self, index: usize) {
        self.samples[index] = -self.samples[index];
        self.events.push(index);
    }
}

/// Scan for reversals, invoking the target's action at each one.
///
/// `limit` is fixed before the scan starts; repairs never change it.
fn scan<T: ScanTarget>(target: &mut T, limit: f32) {
    let len = target.samples().len();
    if len < SCAN_TAIL {
        return;
    }

    let mut state = ReversalState::default();

    for n in 0..len - SCAN_TAIL {
        let x = target.samples();
        if (x[n + 1] - x[n]).abs() > limit && state.last_recovery_edge != Some(n + 1) {
            for k in 0..RECOVERY_WINDOW {
                if (x[n + k + 2] - x[n + k + 1]).abs() > limit {
                    state.pending = true;
                    state.last_recovery_edge = Some(n + k + 2);
                    break;
                }
            }
        }

        if state.pending {
            target.on_reversal(n + 1);
            state.pending = false;
        }
    }
}

fn jump_limit(waveform: &Waveform) -> f32 {
    JUMP_FACTOR * waveform.max_value()
}

/// Counts short amplitude reversals
#[derive(Debug, Clone, Copy, Default)]
pub struct SarDetector;

impl SarDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, waveform: &Waveform) -> SarDetection {
        let mut target = Observe {
            samples: waveform.samples(),
            events: Vec::new(),
        };
        scan(&mut target, jump_limit(waveform));

        log::debug!("SAR scan: {} reversal(s)", target.events.len());

        SarDetection {
            count: target.events.len(),
            events: target.events,
        }
    }
}

/// Produces a copy of the waveform with reversed samples flipped back
#[derive(Debug, Clone, Copy, Default)]
pub struct SarRepairer;

impl SarRepairer {
    pub fn new() -> Self {
        Self
    }

    pub fn repair(&self, waveform: &Waveform) -> SarRepair {
        let limit = jump_limit(waveform);
        let mut target = Restore {
            samples: waveform.samples().to_vec(),
            events: Vec::new(),
        };
        scan(&mut target, limit);

        log::debug!("SAR repair: {} sample(s) flipped", target.events.len());

        SarRepair {
            count: target.events.len(),
            events: target.events,
            waveform: Waveform::new(target.samples, waveform.sample_rate()),
        }
    }
}

/// Count short amplitude reversals in a waveform
pub fn detect_sar(waveform: &Waveform) -> SarDetection {
    SarDetector::new().detect(waveform)
}

/// Repair short amplitude reversals, returning a corrected copy
pub fn repair_sar(waveform: &Waveform) -> SarRepair {
    SarRepairer::new().repair(waveform)
}
