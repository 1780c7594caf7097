//! CSV and JSON export of simulation history.
//!
//! CSV output has one header row followed by one row per tick. Fields are
//! quoted per RFC 4180 when needed and non-finite numbers (NaN, ±inf) are
//! written as empty cells. JSON output is an array of row objects; non-finite numbers become
//! `null`.

use crate::history::{Cell, History};
use crate::MetricsSnapshot;
use lbsim_jamming::JammerSet;
use std::io::Write;

/// Export history as JSON.
pub fn export_json<W: Write>(history: &History, writer: &mut W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, history)?;
    writeln!(writer)?;
    Ok(())
}

/// Export a single snapshot as JSON.
pub fn export_snapshot_json<W: Write>(
    snapshot: &MetricsSnapshot,
    writer: &mut W,
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Export history as CSV.
pub fn export_csv<W: Write>(history: &History, writer: &mut W) -> std::io::Result<()> {
    let header: Vec<String> = history
        .columns()
        .iter()
        .map(|c| escape_csv_field(&c.name))
        .collect();
    writeln!(writer, "{}", header.join(","))?;

    for cells in history.rows() {
        let fields: Vec<String> = cells.iter().map(format_cell).collect();
        writeln!(writer, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Export a jammer set as a YAML or JSON map keyed by id.
pub fn export_jammers<W: Write>(
    jammers: &JammerSet,
    json: bool,
    writer: &mut W,
) -> Result<(), crate::RunnerError> {
    let document = if json {
        jammers.export_json()?
    } else {
        jammers.export_yaml()?
    };
    writer.write_all(document.as_bytes())?;
    if !document.ends_with('\n') {
        writeln!(writer)?;
    }
    Ok(())
}

/// Escape a CSV field if it contains special characters.
fn escape_csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => format_float(*v),
        Cell::Text(s) => escape_csv_field(s),
    }
}

/// Format a float for CSV. Whole numbers drop the decimal point; non-finite values are empty.
fn format_float(value: f64) -> String {
    if !value.is_finite() {
        String::new()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationState;
    use lbsim_jamming::{JammerConfig, JammerType};
    use lbsim_model::load_scenario_from_str;

    fn history(angles: &[f64]) -> History {
        let mut state = SimulationState::new(load_scenario_from_str("{}").unwrap());
        let mut history = History::new();
        for &angle in angles {
            state.set_orbit_angle(angle);
            history.push(&state.evaluate());
        }
        history
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(3.0), "3");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(f64::NAN), "");
        assert_eq!(format_float(f64::INFINITY), "");
        assert_eq!(format_float(f64::NEG_INFINITY), "");
    }

    #[test]
    fn test_export_csv_shape() {
        let history = history(&[0.0, 180.0]);
        let mut output = Vec::new();
        export_csv(&history, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("time_s,mode,active_link,"));
        let width = history.columns().len();
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), width);
        }

        let dl_cn = history.column_index("dl_cn_db").unwrap();
        let hidden: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(hidden[dl_cn], "");
        let visible: Vec<&str> = lines[1].split(',').collect();
        assert!(visible[dl_cn].parse::<f64>().is_ok());
    }

    #[test]
    fn test_export_csv_blanks_infinite_ci_without_jammers() {
        let history = history(&[0.0]);
        let idx = history.column_index("ci_total_db").unwrap();
        assert_eq!(history.rows()[0][idx].as_f64(), Some(f64::INFINITY));

        let mut output = Vec::new();
        export_csv(&history, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[idx], "");
        for name in ["ul_ci_total_db", "dl_ci_total_db"] {
            assert_eq!(row[history.column_index(name).unwrap()], "");
        }
    }

    #[test]
    fn test_export_json_rows() {
        let history = history(&[0.0]);
        let mut output = Vec::new();
        export_json(&history, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["mode"], "LEO");
        assert_eq!(rows[0]["visible"], 1.0);
        assert!(rows[0]["dl_cn_db"].as_f64().is_some());
    }

    #[test]
    fn test_export_snapshot_json_nulls_nan() {
        let mut state = SimulationState::new(load_scenario_from_str("{}").unwrap());
        state.set_orbit_angle(180.0);
        let mut output = Vec::new();
        export_snapshot_json(&state.evaluate(), &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(parsed["downlink"]["outputs"]["cn_db"].is_null());
        assert_eq!(parsed["geometry"]["visible"], false);
        assert_eq!(parsed["mode"], "LEO");
    }

    #[test]
    fn test_export_jammers_round_trip() {
        let mut jammers = JammerSet::new();
        jammers.upsert(JammerConfig::new("J1", "Spot DL", JammerType::Spot));

        let mut output = Vec::new();
        export_jammers(&jammers, true, &mut output).unwrap();
        let mut restored = JammerSet::new();
        let count = restored
            .import_str(std::str::from_utf8(&output).unwrap())
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(restored.get("J1").unwrap().name, "Spot DL");
    }
}
