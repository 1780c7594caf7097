//! Table-driven MODCOD selection.
//!
//! [`select_modcod`] is the stateless rule: the most efficient entry whose margin
//! over its required Eb/N0 is at least the hysteresis, or the most robust entry
//! when none qualifies. [`ModcodSelector`] remembers the active entry between
//! ticks so that a value hovering around a threshold does not flip the
//! selection every tick: the active entry is kept while its margin stays
//! non-negative, and a more efficient entry is only adopted once it clears the
//! hysteresis.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of the MODCOD table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModcodEntry {
    /// Display name, e.g. `QPSK 1/2`.
    pub name: String,
    /// Modulation order in bits per symbol.
    pub bits_per_symbol: f64,
    /// FEC code rate in (0, 1].
    pub code_rate: f64,
    /// Required Eb/N0 (dB).
    #[serde(alias = "ebn0_req_dB")]
    pub ebn0_req_db: f64,
}

impl ModcodEntry {
    /// Create a table entry.
    pub fn new(name: &str, bits_per_symbol: f64, code_rate: f64, ebn0_req_db: f64) -> Self {
        Self {
            name: name.to_string(),
            bits_per_symbol,
            code_rate,
            ebn0_req_db,
        }
    }

    /// Spectral efficiency `bits_per_symbol · code_rate` (bit/s/Hz).
    pub fn efficiency_bps_hz(&self) -> f64 {
        self.bits_per_symbol * self.code_rate
    }

    /// DVB-S2 style default table.
    pub fn default_table() -> Vec<ModcodEntry> {
        vec![
            ModcodEntry::new("QPSK 1/2", 2.0, 1.0 / 2.0, 1.0),
            ModcodEntry::new("QPSK 3/4", 2.0, 3.0 / 4.0, 4.03),
            ModcodEntry::new("8PSK 2/3", 3.0, 2.0 / 3.0, 6.62),
            ModcodEntry::new("8PSK 3/4", 3.0, 3.0 / 4.0, 7.91),
            ModcodEntry::new("16APSK 3/4", 4.0, 3.0 / 4.0, 10.21),
            ModcodEntry::new("32APSK 4/5", 5.0, 4.0 / 5.0, 13.64),
        ]
    }
}

/// Stateless selection. Returns `None` only for an empty table.
pub fn select_modcod(table: &[ModcodEntry], value_db: f64, hysteresis_db: f64) -> Option<usize> {
    let best_candidate = table
        .iter()
        .enumerate()
        .filter(|(_, e)| value_db - e.ebn0_req_db >= hysteresis_db)
        .fold(None::<(usize, f64)>, |best, (i, e)| {
            let eff = e.efficiency_bps_hz();
            match best {
                Some((_, best_eff)) if best_eff >= eff => best,
                _ => Some((i, eff)),
            }
        })
        .map(|(i, _)| i);

    best_candidate.or_else(|| most_robust(table))
}

fn most_robust(table: &[ModcodEntry]) -> Option<usize> {
    table
        .iter()
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (i, e)| match best {
            Some((_, req)) if req <= e.ebn0_req_db => best,
            _ => Some((i, e.ebn0_req_db)),
        })
        .map(|(i, _)| i)
}

// ============================================================================
// Stateful Selector
// ============================================================================

/// Selection mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModcodMode {
    /// Pick from the table every tick.
    #[default]
    Auto,
    /// Use the named entry regardless of margin; unknown names use the first row.
    Manual(String),
}

/// Qualitative reading of a link margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarginStatus {
    /// Margin above 3 dB.
    Excellent,
    /// Margin in [1, 3] dB.
    Acceptable,
    /// Margin in [0, 1) dB.
    Critical,
    /// Negative margin.
    Insufficient,
    /// No margin available.
    NotAvailable,
}

impl MarginStatus {
    /// Classify a margin in dB.
    pub fn from_margin(margin_db: f64) -> Self {
        if margin_db.is_nan() {
            MarginStatus::NotAvailable
        } else if margin_db > 3.0 {
            MarginStatus::Excellent
        } else if margin_db >= 1.0 {
            MarginStatus::Acceptable
        } else if margin_db >= 0.0 {
            MarginStatus::Critical
        } else {
            MarginStatus::Insufficient
        }
    }

    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            MarginStatus::Excellent => "Excellent",
            MarginStatus::Acceptable => "Acceptable",
            MarginStatus::Critical => "Critical",
            MarginStatus::Insufficient => "Insufficient",
            MarginStatus::NotAvailable => "",
        }
    }
}

/// The active MODCOD for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModcodSelection {
    /// Row index into the table.
    pub index: usize,
    /// Entry name.
    pub name: String,
    /// Spectral efficiency (bit/s/Hz).
    pub efficiency_bps_hz: f64,
    /// Required Eb/N0 (dB).
    pub ebn0_req_db: f64,
    /// `efficiency · bandwidth` (bit/s).
    pub bit_rate_bps: f64,
    /// Decision value minus required Eb/N0 (dB).
    pub decision_margin_db: f64,
    /// True when this tick changed the active entry.
    pub changed: bool,
}

/// MODCOD selector with memory of the active entry.
#[derive(Debug, Clone)]
pub struct ModcodSelector {
    hysteresis_db: f64,
    current: Option<usize>,
    switches: u64,
}

impl ModcodSelector {
    /// Default hysteresis (dB).
    pub const DEFAULT_HYSTERESIS_DB: f64 = 1.0;

    /// Create a selector with no active entry.
    pub fn new(hysteresis_db: f64) -> Self {
        Self {
            hysteresis_db: hysteresis_db.max(0.0),
            current: None,
            switches: 0,
        }
    }

    /// Configured hysteresis (dB).
    pub fn hysteresis_db(&self) -> f64 {
        self.hysteresis_db
    }

    /// Index of the active entry, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Number of changes of the active entry since creation or reset.
    pub fn switches(&self) -> u64 {
        self.switches
    }

    /// Forget the active entry.
    pub fn reset(&mut self) {
        self.current = None;
        self.switches = 0;
    }

    /// Re-evaluate the active entry for `value_db` and derive the bit rate.
    ///
    /// A NaN decision value keeps the active entry unchanged.
    pub fn update(
        &mut self,
        table: &[ModcodEntry],
        mode: &ModcodMode,
        value_db: f64,
        bandwidth_hz: f64,
    ) -> Option<ModcodSelection> {
        if table.is_empty() {
            return None;
        }
        let active = self.current.filter(|&i| i < table.len());

        let next = match mode {
            ModcodMode::Manual(name) => table.iter().position(|e| &e.name == name).unwrap_or(0),
            ModcodMode::Auto => match active {
                None => select_modcod(table, value_db, self.hysteresis_db)?,
                Some(cur) if value_db.is_nan() => cur,
                Some(cur) => self.next_auto(table, cur, value_db)?,
            },
        };

        let changed = active.is_some_and(|cur| cur != next);
        if changed {
            self.switches += 1;
            debug!(
                from = %table[active.unwrap_or(next)].name,
                to = %table[next].name,
                value_db,
                "MODCOD switch"
            );
        }
        self.current = Some(next);

        let entry = &table[next];
        Some(ModcodSelection {
            index: next,
            name: entry.name.clone(),
            efficiency_bps_hz: entry.efficiency_bps_hz(),
            ebn0_req_db: entry.ebn0_req_db,
            bit_rate_bps: entry.efficiency_bps_hz() * bandwidth_hz,
            decision_margin_db: value_db - entry.ebn0_req_db,
            changed,
        })
    }

    fn next_auto(&self, table: &[ModcodEntry], cur: usize, value_db: f64) -> Option<usize> {
        let best = select_modcod(table, value_db, self.hysteresis_db)?;
        if value_db - table[cur].ebn0_req_db < 0.0 {
            return Some(best);
        }
        let upgrade = value_db - table[best].ebn0_req_db >= self.hysteresis_db
            && table[best].efficiency_bps_hz() > table[cur].efficiency_bps_hz();
        Some(if upgrade { best } else { cur })
    }
}

impl Default for ModcodSelector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HYSTERESIS_DB)
    }
}
