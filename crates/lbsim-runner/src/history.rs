//! Row builder flattening [`MetricsSnapshot`]s into ordered export records.
//!
//! Every row has the same columns in the same order, grouped into
//! [`Section`]s. Column names carry their unit as a suffix (`_db`, `_km`,
//! `_mbps`, ...); flags are written as 0/1.

use crate::MetricsSnapshot;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

// ============================================================================
// Columns and Cells
// ============================================================================

/// Column group, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Basic,
    Uplink,
    Downlink,
    EndToEnd,
    Power,
    NoisePerformance,
    Modcod,
    OrbitalGeometry,
    Doppler,
    Losses,
    Jamming,
    Validation,
}

impl Section {
    /// All sections in export order.
    pub const ALL: [Section; 12] = [
        Section::Basic,
        Section::Uplink,
        Section::Downlink,
        Section::EndToEnd,
        Section::Power,
        Section::NoisePerformance,
        Section::Modcod,
        Section::OrbitalGeometry,
        Section::Doppler,
        Section::Losses,
        Section::Jamming,
        Section::Validation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Basic => "basic",
            Section::Uplink => "uplink",
            Section::Downlink => "downlink",
            Section::EndToEnd => "end_to_end",
            Section::Power => "power",
            Section::NoisePerformance => "noise_performance",
            Section::Modcod => "modcod",
            Section::OrbitalGeometry => "orbital_geometry",
            Section::Doppler => "doppler",
            Section::Losses => "losses",
            Section::Jamming => "jamming",
            Section::Validation => "validation",
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub section: Section,
    pub name: String,
}

/// One value. Non-finite numbers stay in the row and are blanked on export.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn flag(value: bool) -> Self {
        Cell::Number(if value { 1.0 } else { 0.0 })
    }

    /// Numeric value, if this is a number cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    /// Text value, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Number(_) => None,
            Cell::Text(s) => Some(s),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            Cell::Number(_) => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

// ============================================================================
// Row Builder
// ============================================================================

struct RowBuilder {
    section: Section,
    columns: Vec<Column>,
    cells: Vec<Cell>,
}

impl RowBuilder {
    fn new() -> Self {
        Self {
            section: Section::Basic,
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    fn section(&mut self, section: Section) -> &mut Self {
        self.section = section;
        self
    }

    fn push(&mut self, name: impl Into<String>, cell: Cell) -> &mut Self {
        self.columns.push(Column {
            section: self.section,
            name: name.into(),
        });
        self.cells.push(cell);
        self
    }

    fn num(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.push(name, Cell::Number(value))
    }

    fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(name, Cell::Text(value.into()))
    }

    fn flag(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.push(name, Cell::flag(value))
    }
}

/// Flatten a snapshot into its columns and cells.
pub fn build_row(s: &MetricsSnapshot) -> (Vec<Column>, Vec<Cell>) {
    let mut row = RowBuilder::new();

    row.section(Section::Basic)
        .num("time_s", s.time_s)
        .text("mode", s.mode.label())
        .text("active_link", s.active_link.to_string())
        .text("preset_source", s.preset_source.label())
        .num("orbit_angle_deg", s.orbit_angle_deg)
        .num("earth_rotation_deg", s.earth_rotation_deg)
        .num("geo_offset_deg", s.geo_offset_deg)
        .num("central_angle_deg", s.geometry.central_angle_deg)
        .num("slant_range_km", s.geometry.slant_range_km)
        .num("elevation_deg", s.geometry.elevation_deg)
        .flag("visible", s.geometry.visible)
        .flag("above_min_elevation", s.above_min_elevation);

    for (section, link) in [(Section::Uplink, &s.uplink), (Section::Downlink, &s.downlink)] {
        let p = match section {
            Section::Uplink => "ul",
            _ => "dl",
        };
        row.section(section)
            .num(format!("{p}_frequency_ghz"), link.inputs.frequency_ghz())
            .num(format!("{p}_bandwidth_mhz"), link.inputs.bandwidth_mhz())
            .num(format!("{p}_eirp_dbw"), link.inputs.eirp_dbw)
            .num(format!("{p}_gt_dbk"), link.inputs.gt_dbk)
            .num(format!("{p}_extra_loss_db"), link.inputs.extra_loss_db)
            .num(format!("{p}_fspl_db"), link.outputs.fspl_db)
            .num(format!("{p}_cn0_dbhz"), link.outputs.cn0_dbhz)
            .num(format!("{p}_cn_db"), link.outputs.cn_db)
            .num(format!("{p}_cinr_db"), link.cinr_db)
            .num(format!("{p}_degradation_db"), link.degradation_db)
            .text(format!("{p}_quality"), link.quality.label())
            .num(format!("{p}_latency_ms"), link.outputs.latency_ms);
    }

    let e2e = &s.end_to_end;
    row.section(Section::EndToEnd)
        .num("e2e_nc_total_db", e2e.nc_total_db)
        .num("e2e_cn_total_db", e2e.cn_total_db)
        .num("e2e_cinr_total_db", e2e.cinr_total_db)
        .text("e2e_worst_link", e2e.worst_link.map_or("", |l| l.label()))
        .num("e2e_worst_cn_db", e2e.worst_cn_db)
        .text("e2e_status", e2e.status.label());

    row.section(Section::Power)
        .num("eirp_sat_dbw", s.power.eirp_sat_dbw)
        .num("input_backoff_db", s.power.input_backoff_db)
        .num("output_backoff_db", s.power.output_backoff_db)
        .num("eirp_effective_dbw", s.power.eirp_dbw);

    let perf = &s.performance;
    let primary = &s.primary;
    row.section(Section::NoisePerformance)
        .num("t_rx_k", s.noise.temperatures.receiver_k)
        .num("t_clear_sky_k", s.noise.temperatures.clear_sky_k)
        .num("t_rain_excess_k", s.noise.temperatures.rain_excess_k)
        .num("t_sys_k", s.noise.system_temperature_k)
        .num("n0_dbw_hz", s.noise.noise_density_dbw_hz)
        .text("primary_link", primary.sense.label())
        .num("primary_fspl_db", primary.outputs.fspl_db)
        .num("path_loss_total_db", primary.path_loss_total_db)
        .num("primary_cn0_dbhz", primary.outputs.cn0_dbhz)
        .num("primary_cn_db", primary.outputs.cn_db)
        .num("primary_cinr_db", primary.cinr_db)
        .text("primary_quality", primary.quality.label())
        .num("ebn0_db", perf.ebn0_db)
        .num("ebn0_req_db", perf.ebn0_req_db)
        .num("eb_margin_db", perf.margin_db)
        .text("eb_margin_status", s.eb_margin.label())
        .num("rb_mbps", perf.bit_rate_bps / 1e6)
        .num("shannon_capacity_mbps", perf.shannon_capacity_bps / 1e6)
        .num("shannon_efficiency_bps_hz", perf.shannon_efficiency_bps_hz)
        .num("real_efficiency_bps_hz", perf.real_efficiency_bps_hz)
        .num("utilization_pct", perf.utilization_pct)
        .num("latency_propagation_ms", s.latency.propagation_ms)
        .num("latency_processing_ms", s.latency.processing_ms)
        .num("latency_switching_ms", s.latency.switching_ms)
        .num("latency_total_one_way_ms", s.latency.total_one_way_ms)
        .num("rtt_ms", s.latency.rtt_ms);

    let selection = s.modcod.selection.as_ref();
    row.section(Section::Modcod)
        .flag("modcod_auto", s.modcod.auto)
        .text("modcod_name", selection.map_or("", |m| m.name.as_str()))
        .num(
            "modcod_efficiency_bps_hz",
            selection.map_or(f64::NAN, |m| m.efficiency_bps_hz),
        )
        .num("modcod_ebn0_req_db", selection.map_or(f64::NAN, |m| m.ebn0_req_db))
        .num(
            "modcod_margin_db",
            selection.map_or(f64::NAN, |m| m.decision_margin_db),
        )
        .text("modcod_status", s.modcod.status.label())
        .flag("modcod_changed", selection.is_some_and(|m| m.changed))
        .num("modcod_switches", s.modcod.switches as f64);

    row.section(Section::OrbitalGeometry)
        .num("orbital_radius_km", s.orbital.orbital_radius_km)
        .num("orbital_velocity_kms", s.orbital.orbital_velocity_kms)
        .num("angular_velocity_deg_s", s.orbital.angular_velocity_deg_s)
        .num("range_rate_kms", s.orbital.range_rate_kms)
        .num("orbital_period_min", s.orbital.orbital_period_min)
        .num("visibility_remaining_s", s.orbital.visibility_remaining_s);

    row.section(Section::Doppler)
        .num("doppler_hz", s.doppler.instantaneous_hz)
        .num("doppler_max_hz", s.doppler.max_hz);

    row.section(Section::Losses);
    for (name, value) in s.losses.entries() {
        row.num(format!("loss_{name}_db"), value);
    }
    row.num("loss_total_extra_db", s.losses.total_db());

    let combined = &s.jamming.combined;
    let dominant = s.jamming.dominant();
    row.section(Section::Jamming)
        .flag("jamming_active", s.jamming.is_active())
        .num("active_jammers", combined.active_jammers as f64)
        .num("jamming_results", s.jamming.results.len() as f64)
        .num("ci_total_db", combined.ci_total_db)
        .num("jam_cinr_db", combined.cinr_db)
        .num("jam_degradation_db", combined.degradation_db)
        .text("jam_effectiveness", combined.effectiveness.label())
        .num("ul_ci_total_db", combined.uplink.ci_total_db)
        .num("dl_ci_total_db", combined.downlink.ci_total_db)
        .text("dominant_jammer", dominant.map_or("", |r| r.jammer_id.as_str()))
        .text("dominant_target", dominant.map_or("", |r| r.target_link.label()))
        .num("dominant_ci_db", dominant.map_or(f64::NAN, |r| r.ci_db))
        .num(
            "dominant_overlap_pct",
            dominant.map_or(f64::NAN, |r| r.spectral_overlap_percent),
        )
        .num(
            "dominant_discrimination_db",
            dominant.map_or(f64::NAN, |r| r.discrimination_db),
        )
        .text("dominant_js_class", dominant.map_or("", |r| r.effectiveness.label()))
        .text("spot_modcod", s.spot_modcod.modcod.name)
        .num("spot_efficiency_bps_hz", s.spot_modcod.modcod.efficiency_bps_hz)
        .num("spot_cinr_margin_db", s.spot_modcod.cinr_margin_db)
        .num("rtt_jamming_ms", s.rtt.rtt_ms)
        .text("rtt_accuracy", s.rtt.accuracy.label());

    row.section(Section::Validation)
        .text("validation_verdict", s.validation.verdict.label())
        .text("validation_max_severity", s.validation.max_severity.label())
        .num("validation_problems", s.validation.problem_count() as f64)
        .text("validation_flags", s.validation.flag_codes());

    (row.columns, row.cells)
}

// ============================================================================
// History
// ============================================================================

/// Ordered collection of flattened snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one snapshot.
    pub fn push(&mut self, snapshot: &MetricsSnapshot) {
        let (columns, cells) = build_row(snapshot);
        if self.columns.is_empty() {
            self.columns = columns;
        }
        debug_assert_eq!(self.columns.len(), cells.len());
        self.rows.push(cells);
    }

    /// Column layout; empty until the first row is pushed.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell of `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

struct RowView<'a> {
    columns: &'a [Column],
    cells: &'a [Cell],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(&column.name, cell)?;
        }
        map.end()
    }
}

/// Serialized as an array of row objects with keys in column order.
impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                cells,
            })?;
        }
        seq.end()
    }
}
