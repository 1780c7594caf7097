//! Link adaptations under active jamming: the spot-jamming MODCOD ladder and
//! the round-trip-time estimate with jamming overhead.

use serde::Serialize;

/// Extra CINR margin held back while a jammer is active (dB).
pub const JAMMING_MARGIN_DB: f64 = 1.0;

/// One rung of the spot-jamming MODCOD ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotModcod {
    pub name: &'static str,
    /// Minimum effective CINR for this rung (dB).
    pub threshold_db: f64,
    pub ebn0_req_db: f64,
    pub efficiency_bps_hz: f64,
    pub robust: bool,
}

/// Ladder ordered from most to least efficient.
pub const SPOT_LADDER: [SpotModcod; 5] = [
    SpotModcod { name: "32APSK_9_10", threshold_db: 18.0, ebn0_req_db: 1.0, efficiency_bps_hz: 4.5, robust: false },
    SpotModcod { name: "16APSK_5_6", threshold_db: 15.0, ebn0_req_db: 2.0, efficiency_bps_hz: 4.2, robust: false },
    SpotModcod { name: "8PSK_3_4", threshold_db: 12.0, ebn0_req_db: 4.0, efficiency_bps_hz: 2.25, robust: true },
    SpotModcod { name: "QPSK_2_3", threshold_db: 8.0, ebn0_req_db: 6.5, efficiency_bps_hz: 1.33, robust: true },
    SpotModcod { name: "QPSK_1_2", threshold_db: 4.0, ebn0_req_db: 9.0, efficiency_bps_hz: 1.0, robust: true },
];

/// Rung returned when no ladder entry is reachable.
pub const OUTAGE: SpotModcod = SpotModcod {
    name: "OUTAGE",
    threshold_db: 4.0,
    ebn0_req_db: f64::INFINITY,
    efficiency_bps_hz: 0.0,
    robust: false,
};

/// Selected rung and the margin above its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotModcodSelection {
    pub modcod: SpotModcod,
    /// CINR after the jamming margin (dB).
    pub effective_cinr_db: f64,
    /// Effective CINR minus the rung threshold (dB); negative in outage.
    pub cinr_margin_db: f64,
}

impl SpotModcodSelection {
    /// Whether the link is in outage.
    pub fn is_outage(&self) -> bool {
        self.modcod.efficiency_bps_hz == 0.0
    }
}

/// Pick the most efficient ladder rung the post-jamming CINR supports.
///
/// NaN selects [`OUTAGE`].
pub fn spot_modcod(cinr_db: f64, jamming_active: bool) -> SpotModcodSelection {
    let effective_cinr_db = if jamming_active {
        cinr_db - JAMMING_MARGIN_DB
    } else {
        cinr_db
    };
    let modcod = SPOT_LADDER
        .iter()
        .find(|rung| effective_cinr_db >= rung.threshold_db)
        .copied()
        .unwrap_or(OUTAGE);
    SpotModcodSelection {
        modcod,
        effective_cinr_db,
        cinr_margin_db: effective_cinr_db - modcod.threshold_db,
    }
}

// ============================================================================
// Round-trip Time
// ============================================================================

/// Base processing overhead added to every round trip (ms).
pub const BASE_RTT_OVERHEAD_MS: f64 = 0.5;
/// Jamming detection overhead (ms).
pub const DETECTION_OVERHEAD_MS: f64 = 0.3;

/// Quality of the RTT estimate from its ratio to the one-way latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RttAccuracy {
    Excelente,
    Buena,
    Aceptable,
    Problematica,
}

impl RttAccuracy {
    /// Classify an RTT/one-way ratio. NaN is PROBLEMATICA.
    pub fn from_ratio(ratio: f64) -> Self {
        if (1.95..=2.10).contains(&ratio) {
            RttAccuracy::Excelente
        } else if (1.85..=2.20).contains(&ratio) {
            RttAccuracy::Buena
        } else if (1.70..=2.40).contains(&ratio) {
            RttAccuracy::Aceptable
        } else {
            RttAccuracy::Problematica
        }
    }

    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            RttAccuracy::Excelente => "EXCELENTE",
            RttAccuracy::Buena => "BUENA",
            RttAccuracy::Aceptable => "ACEPTABLE",
            RttAccuracy::Problematica => "PROBLEMATICA",
        }
    }
}

/// RTT estimate with processing and jamming overhead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RttEstimate {
    pub rtt_ms: f64,
    pub theoretical_rtt_ms: f64,
    pub processing_overhead_ms: f64,
    pub jamming_overhead_ms: f64,
    pub ratio: f64,
    pub accuracy: RttAccuracy,
}

/// Estimate the RTT from the one-way latency.
///
/// Jamming adds a mitigation overhead interpolated from 2.0 ms at the horizon
/// to 0.5 ms at zenith, plus a fixed detection overhead.
pub fn realistic_rtt(one_way_ms: f64, elevation_deg: f64, jamming_active: bool) -> RttEstimate {
    let jamming_overhead_ms = if jamming_active {
        2.0 - (elevation_deg / 90.0) * 1.5 + DETECTION_OVERHEAD_MS
    } else {
        0.0
    };
    let rtt_ms = 2.0 * one_way_ms + BASE_RTT_OVERHEAD_MS + jamming_overhead_ms;
    let ratio = rtt_ms / one_way_ms;
    RttEstimate {
        rtt_ms,
        theoretical_rtt_ms: 2.0 * one_way_ms,
        processing_overhead_ms: BASE_RTT_OVERHEAD_MS,
        jamming_overhead_ms,
        ratio,
        accuracy: RttAccuracy::from_ratio(ratio),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_modcod_ladder() {
        assert_eq!(spot_modcod(20.0, true).modcod.name, "32APSK_9_10");
        assert_eq!(spot_modcod(18.5, true).modcod.name, "16APSK_5_6");
        assert_eq!(spot_modcod(18.5, false).modcod.name, "32APSK_9_10");
        assert_eq!(spot_modcod(13.0, true).modcod.name, "8PSK_3_4");
        assert_eq!(spot_modcod(9.0, true).modcod.name, "QPSK_2_3");
        assert_eq!(spot_modcod(5.0, true).modcod.name, "QPSK_1_2");
    }

    #[test]
    fn test_spot_modcod_outage() {
        let selection = spot_modcod(3.0, true);
        assert!(selection.is_outage());
        assert!((selection.cinr_margin_db - (-2.0)).abs() < 1e-12);
        assert!(spot_modcod(f64::NAN, true).is_outage());
    }

    #[test]
    fn test_spot_modcod_margin() {
        let selection = spot_modcod(14.0, true);
        assert_eq!(selection.modcod.name, "8PSK_3_4");
        assert!(selection.modcod.robust);
        assert!((selection.cinr_margin_db - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rtt_without_jamming() {
        let rtt = realistic_rtt(10.0, 45.0, false);
        assert!((rtt.rtt_ms - 20.5).abs() < 1e-12);
        assert_eq!(rtt.jamming_overhead_ms, 0.0);
        assert_eq!(rtt.accuracy, RttAccuracy::Excelente);
    }

    #[test]
    fn test_rtt_with_jamming() {
        let rtt = realistic_rtt(10.0, 0.0, true);
        assert!((rtt.jamming_overhead_ms - 2.3).abs() < 1e-12);
        assert!((rtt.rtt_ms - 22.8).abs() < 1e-12);
        assert_eq!(rtt.accuracy, RttAccuracy::Aceptable);

        let zenith = realistic_rtt(10.0, 90.0, true);
        assert!((zenith.jamming_overhead_ms - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rtt_accuracy_bands() {
        assert_eq!(RttAccuracy::from_ratio(2.0), RttAccuracy::Excelente);
        assert_eq!(RttAccuracy::from_ratio(2.15), RttAccuracy::Buena);
        assert_eq!(RttAccuracy::from_ratio(2.3), RttAccuracy::Aceptable);
        assert_eq!(RttAccuracy::from_ratio(3.0), RttAccuracy::Problematica);
        assert_eq!(RttAccuracy::from_ratio(f64::NAN), RttAccuracy::Problematica);
    }
}
