//! Uplink/downlink combination into end-to-end figures.

use lbsim_common::{db_to_lin, LinkSense};
use serde::Serialize;

/// Jamming figures relevant to the end-to-end CINR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JammingContext {
    /// CINR with all active jammers (dB).
    pub cinr_db: f64,
    /// Set when the combined jamming is classified EFECTIVO or CRITICO; only then
    /// does the jamming CINR cap the end-to-end figure.
    pub caps_cinr: bool,
}

/// Overall end-to-end status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum E2EStatus {
    /// CINR above 10 dB.
    #[serde(rename = "NOMINAL")]
    Nominal,
    /// CINR in (5, 10] dB.
    #[serde(rename = "MARGINAL")]
    Marginal,
    /// CINR at or below 5 dB.
    #[serde(rename = "CRITICO")]
    Critical,
    /// No figure available.
    #[serde(rename = "UNAVAILABLE")]
    Unavailable,
}

impl E2EStatus {
    /// Classify an end-to-end CINR.
    pub fn from_cinr(cinr_db: f64) -> Self {
        if cinr_db.is_nan() {
            E2EStatus::Unavailable
        } else if cinr_db > 10.0 {
            E2EStatus::Nominal
        } else if cinr_db > 5.0 {
            E2EStatus::Marginal
        } else {
            E2EStatus::Critical
        }
    }

    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            E2EStatus::Nominal => "NOMINAL",
            E2EStatus::Marginal => "MARGINAL",
            E2EStatus::Critical => "CRITICO",
            E2EStatus::Unavailable => "",
        }
    }
}

/// End-to-end combination result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct E2EResult {
    /// Total noise-to-carrier ratio (dB).
    pub nc_total_db: f64,
    /// Total carrier-to-noise ratio (dB).
    pub cn_total_db: f64,
    /// Total carrier-to-noise-plus-interference ratio (dB).
    pub cinr_total_db: f64,
    /// The hop with the lower C/N (uplink on ties); `None` when undefined.
    pub worst_link: Option<LinkSense>,
    /// C/N of the worst hop (dB).
    pub worst_cn_db: f64,
    /// Status from the total CINR.
    pub status: E2EStatus,
}

impl E2EResult {
    fn undefined() -> Self {
        Self {
            nc_total_db: f64::NAN,
            cn_total_db: f64::NAN,
            cinr_total_db: f64::NAN,
            worst_link: None,
            worst_cn_db: f64::NAN,
            status: E2EStatus::Unavailable,
        }
    }
}

/// Combine independent uplink and downlink C/N by adding N/C in the linear domain.
///
/// Any non-finite input yields an all-NaN result.
pub fn combine_end_to_end(
    cn_ul_db: f64,
    cn_dl_db: f64,
    jamming: Option<&JammingContext>,
) -> E2EResult {
    if !cn_ul_db.is_finite() || !cn_dl_db.is_finite() {
        return E2EResult::undefined();
    }

    let (worst_link, worst_cn_db) = if cn_ul_db <= cn_dl_db {
        (LinkSense::Uplink, cn_ul_db)
    } else {
        (LinkSense::Downlink, cn_dl_db)
    };

    let nc_total = db_to_lin(-cn_ul_db) + db_to_lin(-cn_dl_db);
    let (nc_total_db, cn_total_db) = if nc_total <= 0.0 {
        (f64::NEG_INFINITY, f64::INFINITY)
    } else {
        let nc_db = 10.0 * nc_total.log10();
        (nc_db, -nc_db)
    };

    let cinr_total_db = match jamming {
        Some(ctx) if ctx.caps_cinr && !ctx.cinr_db.is_nan() => cn_total_db.min(ctx.cinr_db),
        _ => cn_total_db,
    };

    E2EResult {
        nc_total_db,
        cn_total_db,
        cinr_total_db,
        worst_link: Some(worst_link),
        worst_cn_db,
        status: E2EStatus::from_cinr(cinr_total_db),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_links_halve_cn() {
        let r = combine_end_to_end(10.0, 10.0, None);
        assert!((r.cn_total_db - (10.0 - 10.0 * 2f64.log10())).abs() < 1e-9);
        assert!((r.cn_total_db - 6.99).abs() < 0.01);
        assert_eq!(r.cinr_total_db, r.cn_total_db);
        assert_eq!(r.worst_link, Some(LinkSense::Uplink));
    }

    #[test]
    fn test_total_never_exceeds_worst_link() {
        for (ul, dl) in [(5.0, 25.0), (18.0, 12.0), (-3.0, 40.0)] {
            let r = combine_end_to_end(ul, dl, None);
            assert!(r.cn_total_db < ul.min(dl));
        }
        let r = combine_end_to_end(18.0, 12.0, None);
        assert_eq!(r.worst_link, Some(LinkSense::Downlink));
    }

    #[test]
    fn test_non_finite_inputs() {
        for (ul, dl) in [(f64::NAN, 10.0), (10.0, f64::INFINITY), (f64::NEG_INFINITY, 3.0)] {
            let r = combine_end_to_end(ul, dl, None);
            assert!(r.cn_total_db.is_nan());
            assert!(r.cinr_total_db.is_nan());
            assert_eq!(r.status, E2EStatus::Unavailable);
        }
    }

    #[test]
    fn test_jamming_cap_only_when_effective() {
        let weak = JammingContext {
            cinr_db: 2.0,
            caps_cinr: false,
        };
        let r = combine_end_to_end(15.0, 15.0, Some(&weak));
        assert_eq!(r.cinr_total_db, r.cn_total_db);

        let strong = JammingContext {
            cinr_db: 2.0,
            caps_cinr: true,
        };
        let r = combine_end_to_end(15.0, 15.0, Some(&strong));
        assert_eq!(r.cinr_total_db, 2.0);
        assert_eq!(r.status, E2EStatus::Critical);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(E2EStatus::from_cinr(10.5), E2EStatus::Nominal);
        assert_eq!(E2EStatus::from_cinr(10.0), E2EStatus::Marginal);
        assert_eq!(E2EStatus::from_cinr(5.0), E2EStatus::Critical);
    }
}
