use std::fmt;

pub const MIN_TAU: f64 = 0.0001;
pub const MAX_TAU: f64 = 1.0;

/// Tunables handed to the signal-processing worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    /// Attack time constant (seconds).
    pub tau_a: f64,
    /// Release time constant (seconds).
    pub tau_r: f64,
    /// Detection threshold in sigma units.
    pub threshold: f64,
    /// Refractory period (seconds).
    pub refractory: f64,
    pub sample_rate: f64,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            tau_a: 0.001,
            tau_r: 0.005,
            threshold: 3.0,
            refractory: 0.015,
            sample_rate: 48_000.0,
        }
    }
}

impl KernelParams {
    /// Attack must be shorter than release; everything else strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tau_a > 0.0 && self.tau_a < self.tau_r) {
            return Err(format!(
                "tau_a ({}) must be > 0 and < tau_r ({})",
                self.tau_a, self.tau_r
            ));
        }
        if self.threshold <= 0.0 {
            return Err("threshold must be > 0".to_string());
        }
        if self.refractory <= 0.0 {
            return Err("refractory must be > 0".to_string());
        }
        if self.sample_rate <= 0.0 {
            return Err("sample rate must be > 0".to_string());
        }
        Ok(())
    }

    /// Scale a time constant by `2^(-semitones/12)`, clamped to the supported range.
    pub fn shift_semitones(tau: f64, semitones: f64) -> f64 {
        (tau * 2f64.powf(-semitones / 12.0)).clamp(MIN_TAU, MAX_TAU)
    }
}

impl fmt::Display for KernelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tau_a={:.6}s tau_r={:.6}s thr={:.2}\u{3c3} ref={:.4}s fs={}",
            self.tau_a, self.tau_r, self.threshold, self.refractory, self.sample_rate
        )
    }
}
