//! Noise temperature, Eb/N0, capacity and latency figures.

use lbsim_common::{db_to_lin, BOLTZMANN_DB};
use serde::{Deserialize, Serialize};

// ============================================================================
// Noise
// ============================================================================

/// Noise temperature contributions, all in kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseTemperatures {
    /// Receiver noise temperature.
    pub receiver_k: f64,
    /// Antenna noise under clear sky.
    pub clear_sky_k: f64,
    /// Additional antenna noise due to rain.
    pub rain_excess_k: f64,
}

impl NoiseTemperatures {
    /// Default receiver noise temperature (K).
    pub const DEFAULT_RECEIVER_K: f64 = 120.0;
    /// Default clear-sky antenna temperature (K).
    pub const DEFAULT_CLEAR_SKY_K: f64 = 30.0;

    /// System noise temperature. Negative contributions count as zero;
    /// a non-positive total is reported as NaN.
    pub fn system_temperature_k(&self) -> f64 {
        let total = self.receiver_k.max(0.0) + self.clear_sky_k.max(0.0) + self.rain_excess_k.max(0.0);
        if total > 0.0 {
            total
        } else {
            f64::NAN
        }
    }
}

impl Default for NoiseTemperatures {
    fn default() -> Self {
        Self {
            receiver_k: Self::DEFAULT_RECEIVER_K,
            clear_sky_k: Self::DEFAULT_CLEAR_SKY_K,
            rain_excess_k: 0.0,
        }
    }
}

/// Noise power density `−228.6 + 10·log10(T_sys)` in dBW/Hz.
pub fn noise_density_dbhz(system_temperature_k: f64) -> f64 {
    -BOLTZMANN_DB + 10.0 * system_temperature_k.log10()
}

// ============================================================================
// Performance
// ============================================================================

/// Throughput and efficiency figures for the active link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Performance {
    /// Eb/N0 (dB).
    pub ebn0_db: f64,
    /// Eb/N0 required by the active MODCOD (dB).
    pub ebn0_req_db: f64,
    /// `ebn0_db − ebn0_req_db` (dB).
    pub margin_db: f64,
    /// Information bit rate (bit/s).
    pub bit_rate_bps: f64,
    /// Shannon capacity `BW·log2(1 + C/N)` (bit/s).
    pub shannon_capacity_bps: f64,
    /// Shannon spectral efficiency (bit/s/Hz).
    pub shannon_efficiency_bps_hz: f64,
    /// Achieved spectral efficiency (bit/s/Hz).
    pub real_efficiency_bps_hz: f64,
    /// Achieved over Shannon efficiency, percent.
    pub utilization_pct: f64,
}

/// Derive Eb/N0, margin and capacity figures.
///
/// Degenerate inputs (non-positive bandwidth or bit rate, NaN C/N) yield NaN
/// in the affected fields.
pub fn evaluate_performance(
    cn0_dbhz: f64,
    cn_db: f64,
    bandwidth_hz: f64,
    bit_rate_bps: f64,
    ebn0_req_db: f64,
) -> Performance {
    let ebn0_db = if bit_rate_bps > 0.0 {
        cn0_dbhz - 10.0 * bit_rate_bps.log10()
    } else {
        f64::NAN
    };

    let (shannon_capacity_bps, shannon_efficiency_bps_hz, real_efficiency_bps_hz) =
        if bandwidth_hz > 0.0 && !cn_db.is_nan() {
            let capacity = bandwidth_hz * (1.0 + db_to_lin(cn_db)).log2();
            (capacity, capacity / bandwidth_hz, bit_rate_bps / bandwidth_hz)
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

    let utilization_pct = if shannon_efficiency_bps_hz > 0.0 {
        real_efficiency_bps_hz / shannon_efficiency_bps_hz * 100.0
    } else {
        f64::NAN
    };

    Performance {
        ebn0_db,
        ebn0_req_db,
        margin_db: ebn0_db - ebn0_req_db,
        bit_rate_bps,
        shannon_capacity_bps,
        shannon_efficiency_bps_hz,
        real_efficiency_bps_hz,
        utilization_pct,
    }
}

/// Qualitative reading of the Eb/N0 margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EbMargin {
    /// Margin above 3 dB.
    Ok,
    /// Margin in [0, 3] dB.
    Tight,
    /// Negative margin.
    Insufficient,
    /// No margin could be computed.
    NotAvailable,
}

impl EbMargin {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            EbMargin::Ok => "OK",
            EbMargin::Tight => "Tight",
            EbMargin::Insufficient => "Insufficient",
            EbMargin::NotAvailable => "",
        }
    }
}

/// Classify an Eb/N0 margin.
pub fn classify_eb_margin(margin_db: f64) -> EbMargin {
    if margin_db.is_nan() {
        EbMargin::NotAvailable
    } else if margin_db > 3.0 {
        EbMargin::Ok
    } else if margin_db >= 0.0 {
        EbMargin::Tight
    } else {
        EbMargin::Insufficient
    }
}

// ============================================================================
// Latency
// ============================================================================

/// Fixed delays added on top of propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySettings {
    /// On-board/ground processing delay (ms).
    pub processing_ms: f64,
    /// Switching delay (ms).
    pub switching_ms: f64,
}

impl LatencySettings {
    /// Default processing delay (ms).
    pub const DEFAULT_PROCESSING_MS: f64 = 2.0;
    /// Default switching delay (ms).
    pub const DEFAULT_SWITCHING_MS: f64 = 1.0;
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            processing_ms: Self::DEFAULT_PROCESSING_MS,
            switching_ms: Self::DEFAULT_SWITCHING_MS,
        }
    }
}

/// Latency decomposition for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyBudget {
    /// One-way propagation delay (ms).
    pub propagation_ms: f64,
    /// Processing delay (ms).
    pub processing_ms: f64,
    /// Switching delay (ms).
    pub switching_ms: f64,
    /// Propagation plus fixed delays (ms).
    pub total_one_way_ms: f64,
    /// Round trip: `2·prop + 2·(proc + sw)` (ms).
    pub rtt_ms: f64,
}

/// Combine propagation delay with the fixed delays.
pub fn latency_budget(propagation_ms: f64, settings: &LatencySettings) -> LatencyBudget {
    let processing_ms = settings.processing_ms.max(0.0);
    let switching_ms = settings.switching_ms.max(0.0);
    LatencyBudget {
        propagation_ms,
        processing_ms,
        switching_ms,
        total_one_way_ms: propagation_ms + processing_ms + switching_ms,
        rtt_ms: 2.0 * propagation_ms + 2.0 * (processing_ms + switching_ms),
    }
}
