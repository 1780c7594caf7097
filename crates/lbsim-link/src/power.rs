//! Transponder power and back-off.

use serde::{Deserialize, Serialize};

/// Fixed AM/AM compression between input and output back-off (dB).
pub const AM_AM_COMPRESSION_DB: f64 = 5.0;

/// Operator-facing power settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSettings {
    /// Saturated EIRP (dBW).
    pub saturated_eirp_dbw: f64,
    /// Input back-off (dB). Negative values are treated as zero.
    pub input_backoff_db: f64,
    /// When set, `manual_eirp_dbw` replaces the back-off computation.
    pub manual_override: bool,
    /// EIRP used under manual override (dBW).
    pub manual_eirp_dbw: f64,
}

/// Power figures derived from [`PowerSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerState {
    /// Saturated EIRP (dBW).
    pub eirp_sat_dbw: f64,
    /// Applied input back-off (dB).
    pub input_backoff_db: f64,
    /// Output back-off (dB).
    pub output_backoff_db: f64,
    /// Effective EIRP (dBW).
    pub eirp_dbw: f64,
}

impl PowerSettings {
    /// Settings without back-off or override.
    pub fn saturated(saturated_eirp_dbw: f64) -> Self {
        Self {
            saturated_eirp_dbw,
            input_backoff_db: 0.0,
            manual_override: false,
            manual_eirp_dbw: saturated_eirp_dbw,
        }
    }

    /// Compute back-off and effective EIRP.
    pub fn evaluate(&self) -> PowerState {
        let input_backoff_db = self.input_backoff_db.max(0.0);
        let output_backoff_db = (input_backoff_db - AM_AM_COMPRESSION_DB).max(0.0);
        let eirp_dbw = if self.manual_override {
            self.manual_eirp_dbw
        } else {
            self.saturated_eirp_dbw - input_backoff_db
        };
        PowerState {
            eirp_sat_dbw: self.saturated_eirp_dbw,
            input_backoff_db,
            output_backoff_db,
            eirp_dbw,
        }
    }
}
