use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry describing a single stage of a recompute.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace of one recompute (maps, cell loop, buffer writes).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Run `f`, record its wall time under `label` and pass its result through.
    pub fn time<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.push(label, start.elapsed().as_secs_f64() * 1000.0);
        out
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }

    /// Set `total_ms` to the sum of the recorded stages.
    pub fn finish(&mut self) {
        self.total_ms = self.stages.iter().map(|s| s.elapsed_ms).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_records_stage_and_passes_value() {
        let mut t = TimingBreakdown::default();
        let v = t.time("fit", || 41 + 1);
        t.push("write", 2.5);
        t.finish();
        assert_eq!(v, 42);
        assert_eq!(t.stages.len(), 2);
        assert_eq!(t.stage_ms("write"), Some(2.5));
        assert!(t.stage_ms("missing").is_none());
        assert!(t.total_ms >= 2.5);
    }
}
