//! Spectral overlap between a jammer and the link carriers.

use crate::config::{JammerConfig, JammerType, TargetPreference};
use lbsim_common::LinkSense;
use lbsim_link::LinkInputs;
use serde::Serialize;

/// Overlap below which a jammer is not considered to hit a carrier.
pub const MIN_TARGET_OVERLAP: f64 = 0.01;

/// Overlap assumed when a spot jammer misses both carriers.
pub const RESIDUAL_OVERLAP: f64 = 0.02;

/// Fraction of the link band `[link_center ± link_bw/2]` covered by the jammer
/// band, in [0, 1]. All frequencies in MHz.
pub fn spectral_overlap_fraction(
    jammer_center_mhz: f64,
    jammer_bandwidth_mhz: f64,
    link_center_mhz: f64,
    link_bandwidth_mhz: f64,
) -> f64 {
    if link_bandwidth_mhz <= 0.0 || jammer_bandwidth_mhz <= 0.0 {
        return 0.0;
    }
    let low = (jammer_center_mhz - jammer_bandwidth_mhz / 2.0)
        .max(link_center_mhz - link_bandwidth_mhz / 2.0);
    let high = (jammer_center_mhz + jammer_bandwidth_mhz / 2.0)
        .min(link_center_mhz + link_bandwidth_mhz / 2.0);
    if high <= low {
        0.0
    } else {
        ((high - low) / link_bandwidth_mhz).min(1.0)
    }
}

/// Qualitative overlap level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverlapLevel {
    /// At least 95 %.
    Maxima,
    /// At least 60 %.
    Alta,
    /// At least 20 %.
    Parcial,
    /// At least 5 %.
    Minima,
    /// Below 5 %.
    Negligible,
    /// Fixed assumption for wideband or adaptive jammers.
    Generico,
}

impl OverlapLevel {
    /// Classify a frequency-selective overlap fraction.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction >= 0.95 {
            OverlapLevel::Maxima
        } else if fraction >= 0.6 {
            OverlapLevel::Alta
        } else if fraction >= 0.2 {
            OverlapLevel::Parcial
        } else if fraction >= 0.05 {
            OverlapLevel::Minima
        } else {
            OverlapLevel::Negligible
        }
    }

    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            OverlapLevel::Maxima => "MAXIMA",
            OverlapLevel::Alta => "ALTA",
            OverlapLevel::Parcial => "PARCIAL",
            OverlapLevel::Minima => "MINIMA",
            OverlapLevel::Negligible => "NEGLIGIBLE",
            OverlapLevel::Generico => "GENERICO",
        }
    }
}

/// How the attacked hop was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetDetection {
    /// The jammer band overlaps the uplink.
    Uplink,
    /// The jammer band overlaps the downlink.
    Downlink,
    /// Non-selective jammer attacking both hops.
    Both,
    /// No overlap with either carrier; residual leakage only.
    None,
    /// Fixed by the jammer configuration.
    Configured,
}

/// One hop attacked by a jammer together with the overlap used for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralTarget {
    /// Attacked hop.
    pub sense: LinkSense,
    /// Overlap fraction applied to the interference power.
    pub overlap: f64,
    /// Overlap level.
    pub level: OverlapLevel,
    /// Distance between jammer and carrier centre frequencies (MHz).
    pub frequency_offset_mhz: f64,
    /// How the hop was chosen.
    pub detection: TargetDetection,
}

/// Determine which hops a jammer attacks and with what overlap.
///
/// Spot jammers on `AUTO` pick the hop their band overlaps most; equal overlaps
/// go to the uplink unless the downlink centre is strictly closer. A spot jammer
/// missing both carriers leaks into the uplink with a residual overlap.
/// Barrage and smart jammers on `AUTO` attack both hops with `generic_overlap`.
/// An explicit preference selects the hop directly.
pub fn detect_targets(
    jammer: &JammerConfig,
    uplink: &LinkInputs,
    downlink: &LinkInputs,
    generic_overlap: f64,
) -> Vec<SpectralTarget> {
    let jammer_center_mhz = jammer.center_frequency_ghz * 1000.0;
    let measure = |link: &LinkInputs| {
        let center = link.frequency_hz / 1e6;
        let overlap = spectral_overlap_fraction(
            jammer_center_mhz,
            jammer.bandwidth_mhz,
            center,
            link.bandwidth_hz / 1e6,
        );
        (overlap, (jammer_center_mhz - center).abs())
    };
    let (ul_overlap, ul_offset) = measure(uplink);
    let (dl_overlap, dl_offset) = measure(downlink);
    let selective = jammer.jammer_type == JammerType::Spot;

    let spot_target = |sense: LinkSense, overlap: f64, offset: f64, detection| SpectralTarget {
        sense,
        overlap,
        level: OverlapLevel::from_fraction(overlap),
        frequency_offset_mhz: offset,
        detection,
    };
    let generic_target = |sense: LinkSense, offset: f64, detection| SpectralTarget {
        sense,
        overlap: generic_overlap,
        level: OverlapLevel::Generico,
        frequency_offset_mhz: offset,
        detection,
    };

    match (jammer.target_preference, selective) {
        (TargetPreference::Uplink, true) => vec![spot_target(
            LinkSense::Uplink,
            ul_overlap.max(RESIDUAL_OVERLAP),
            ul_offset,
            TargetDetection::Configured,
        )],
        (TargetPreference::Downlink, true) => vec![spot_target(
            LinkSense::Downlink,
            dl_overlap.max(RESIDUAL_OVERLAP),
            dl_offset,
            TargetDetection::Configured,
        )],
        (TargetPreference::Uplink, false) => {
            vec![generic_target(LinkSense::Uplink, ul_offset, TargetDetection::Configured)]
        }
        (TargetPreference::Downlink, false) => {
            vec![generic_target(LinkSense::Downlink, dl_offset, TargetDetection::Configured)]
        }
        (TargetPreference::Auto, false) => vec![
            generic_target(LinkSense::Uplink, ul_offset, TargetDetection::Both),
            generic_target(LinkSense::Downlink, dl_offset, TargetDetection::Both),
        ],
        (TargetPreference::Auto, true) => {
            let target = if ul_overlap > dl_overlap && ul_overlap > MIN_TARGET_OVERLAP {
                spot_target(LinkSense::Uplink, ul_overlap, ul_offset, TargetDetection::Uplink)
            } else if ul_overlap == dl_overlap && ul_overlap > MIN_TARGET_OVERLAP {
                if ul_offset <= dl_offset {
                    spot_target(LinkSense::Uplink, ul_overlap, ul_offset, TargetDetection::Uplink)
                } else {
                    spot_target(LinkSense::Downlink, dl_overlap, dl_offset, TargetDetection::Downlink)
                }
            } else if dl_overlap > MIN_TARGET_OVERLAP {
                spot_target(LinkSense::Downlink, dl_overlap, dl_offset, TargetDetection::Downlink)
            } else {
                spot_target(
                    LinkSense::Uplink,
                    ul_overlap.max(dl_overlap).max(RESIDUAL_OVERLAP),
                    ul_offset,
                    TargetDetection::None,
                )
            };
            vec![target]
        }
    }
}
