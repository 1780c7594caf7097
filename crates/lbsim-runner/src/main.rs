//! # lbsim
//!
//! CLI runner for the satellite link budget and jamming simulator.
//!
//! Loads one or more scenario files, drives the simulation and writes the
//! per-tick history as CSV or JSON.

use lbsim_runner::export::{export_csv, export_jammers, export_json, export_snapshot_json};
use lbsim_runner::history::History;
use lbsim_runner::{run, RunnerError, SimulationState};

use clap::{Parser, Subcommand, ValueEnum};
use lbsim_common::{ActiveLink, OrbitMode};
use lbsim_model::{load_scenarios, Scenario};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Argument Parsing
// ============================================================================

/// Seconds per duration unit suffix.
fn unit_seconds(unit: char) -> Option<f64> {
    match unit {
        's' => Some(1.0),
        'm' => Some(60.0),
        'h' => Some(3600.0),
        'd' => Some(86400.0),
        _ => None,
    }
}

/// Parse a duration string with units into seconds.
///
/// Accepts a plain number of seconds (`300`), a number with a unit suffix
/// (`90s`, `15m`, `2h`, `1d`) or a sequence of those (`1h30m`). A trailing
/// number without a unit counts as seconds.
fn parse_duration(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<f64>() {
        return Ok(secs);
    }

    let mut total = 0.0;
    let mut number = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        if number.is_empty() {
            return Err(format!("Invalid duration format: unexpected '{}' in '{}'", c, s));
        }
        let multiplier = unit_seconds(c).ok_or_else(|| {
            format!("Unknown duration unit '{}' in '{}'. Use s, m, h, or d.", c, s)
        })?;
        let value: f64 = number
            .parse()
            .map_err(|_| format!("Invalid number '{}' in duration '{}'", number, s))?;
        total += value * multiplier;
        number.clear();
    }
    if !number.is_empty() {
        total += number
            .parse::<f64>()
            .map_err(|_| format!("Invalid number '{}' in duration '{}'", number, s))?;
    }

    if total == 0.0 && !s.is_empty() {
        return Err(format!("Invalid duration format: '{}'", s));
    }
    Ok(total)
}

fn parse_mode(s: &str) -> Result<OrbitMode, String> {
    s.parse()
}

fn parse_link(s: &str) -> Result<ActiveLink, String> {
    s.parse()
}

// ============================================================================
// CLI Configuration
// ============================================================================

/// Output format for the run history.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum HistoryFormat {
    /// One header row and one row per tick.
    #[default]
    Csv,
    /// Array of row objects.
    Json,
}

/// lbsim - satellite link budget and jamming simulator
#[derive(Parser, Debug)]
#[command(name = "lbsim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a time-stepped simulation and export the history
    Run(RunConfig),
    /// Evaluate a single snapshot and print it as JSON
    Evaluate(EvaluateConfig),
    /// List or export the jammers defined by a scenario
    Jammers(JammersConfig),
    /// List all available properties with descriptions and defaults
    Properties,
}

/// Configuration for a simulation run
#[derive(Parser, Debug)]
pub struct RunConfig {
    /// Scenario files, merged in order (later files override earlier ones)
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Simulated duration, e.g. 3600, 90m or 1h30m (default: simulation/max_time_s)
    #[arg(short, long, value_parser = parse_duration)]
    pub duration: Option<f64>,

    /// Tick length, e.g. 30s (default: time_scale_factor x update_interval_ms)
    #[arg(short, long, value_parser = parse_duration)]
    pub step: Option<f64>,

    /// Orbit mode override: LEO or GEO
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<OrbitMode>,

    /// Active link override: UL, DL or E2E
    #[arg(long, value_parser = parse_link)]
    pub link: Option<ActiveLink>,

    /// Output file for the history (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// History format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: HistoryFormat,
}

/// Configuration for a single-snapshot evaluation
#[derive(Parser, Debug)]
pub struct EvaluateConfig {
    /// Scenario files, merged in order
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Simulated time to evaluate at, e.g. 300 or 5m
    #[arg(short, long, value_parser = parse_duration)]
    pub time: Option<f64>,

    /// LEO orbit angle in degrees (applied after --time)
    #[arg(long, allow_hyphen_values = true)]
    pub orbit_angle: Option<f64>,

    /// Number of manual LEO orbit steps to apply (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub orbit_steps: Option<i32>,

    /// GEO longitude offset in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub geo_offset: Option<f64>,

    /// Orbit mode override: LEO or GEO
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<OrbitMode>,

    /// Active link override: UL, DL or E2E
    #[arg(long, value_parser = parse_link)]
    pub link: Option<ActiveLink>,

    /// Output file for the snapshot (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Configuration for jammer listing and export
#[derive(Parser, Debug)]
pub struct JammersConfig {
    /// Scenario files, merged in order
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Write the jammer set to this file; `.json` selects JSON, anything else YAML
    #[arg(long)]
    pub export: Option<PathBuf>,
}

// ============================================================================
// Commands
// ============================================================================

fn load(paths: &[PathBuf]) -> Result<Scenario, RunnerError> {
    let paths: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    Ok(load_scenarios(&paths)?)
}

fn prepare_state(
    scenario: Scenario,
    mode: Option<OrbitMode>,
    link: Option<ActiveLink>,
) -> SimulationState {
    let mut state = SimulationState::new(scenario);
    if let Some(mode) = mode.filter(|&m| m != state.mode()) {
        state.set_mode(mode);
    }
    if let Some(link) = link {
        state.set_active_link(link);
    }
    state
}

fn write_history<W: Write>(
    history: &History,
    format: HistoryFormat,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        HistoryFormat::Csv => export_csv(history, writer),
        HistoryFormat::Json => export_json(history, writer),
    }
}

fn run_command(config: RunConfig) -> Result<(), RunnerError> {
    let scenario = load(&config.scenarios)?;
    let step = config.step.unwrap_or_else(|| scenario.animation().step_s());
    let duration = config.duration.unwrap_or_else(|| scenario.max_time_s());

    let mut state = prepare_state(scenario, config.mode, config.link);
    let (history, stats) = run(&mut state, duration, step)?;

    match &config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_history(&history, config.format, &mut writer)?;
            writer.flush()?;
            info!("Wrote {} rows to {}", history.len(), path.display());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_history(&history, config.format, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn evaluate_command(config: EvaluateConfig) -> Result<(), RunnerError> {
    let scenario = load(&config.scenarios)?;
    let mut state = prepare_state(scenario, config.mode, config.link);

    if let Some(time) = config.time {
        state.seek(time);
    }
    if let Some(angle) = config.orbit_angle {
        state.set_orbit_angle(angle);
    }
    if let Some(steps) = config.orbit_steps {
        state.step_orbit(steps);
    }
    if let Some(offset) = config.geo_offset {
        state.set_geo_offset(offset);
    }

    let snapshot = state.evaluate();
    match &config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            export_snapshot_json(&snapshot, &mut writer)?;
            writer.flush()?;
            info!("Wrote snapshot at t={} to {}", state.time(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            export_snapshot_json(&snapshot, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn jammers_command(config: JammersConfig) -> Result<(), RunnerError> {
    let scenario = load(&config.scenarios)?;
    let jammers = scenario.jammers();

    if let Some(path) = &config.export {
        let json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut writer = BufWriter::new(File::create(path)?);
        export_jammers(jammers, json, &mut writer)?;
        writer.flush()?;
        info!("Exported {} jammers to {}", jammers.len(), path.display());
        return Ok(());
    }

    println!(
        "{:<10} {:<24} {:<8} {:>9} {:>9} {:>8} {:>9} {:>9} {:<6}",
        "ID", "NAME", "TYPE", "EIRP_dBW", "FREQ_GHz", "BW_MHz", "DIST_km", "ELEV_deg", "ACTIVE"
    );
    for jammer in jammers.iter() {
        println!(
            "{:<10} {:<24} {:<8} {:>9.1} {:>9.3} {:>8.1} {:>9.2} {:>9.2} {:<6}",
            jammer.id,
            jammer.name,
            jammer.jammer_type.to_string(),
            jammer.eirp_dbw(),
            jammer.center_frequency_ghz,
            jammer.bandwidth_mhz,
            jammer.distance_3d_km(),
            jammer.elevation_deg(),
            if jammer.active { "yes" } else { "no" }
        );
    }
    println!("\n{} jammers ({} active)", jammers.len(), jammers.active().count());
    Ok(())
}

fn main() -> Result<(), RunnerError> {
    // RUST_LOG filter, "warn" when unset
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(config) => run_command(config)?,
        Commands::Evaluate(config) => evaluate_command(config)?,
        Commands::Jammers(config) => jammers_command(config)?,
        Commands::Properties => print_properties_info(),
    }

    Ok(())
}

/// Print information about all available properties
fn print_properties_info() {
    use lbsim_model::{properties_by_scope, PropertyScope};

    println!("lbsim Available Properties");
    println!("==========================\n");

    println!("Properties configure the simulation and can be set in YAML scenario files.");
    println!("They are organized by scope (what they apply to) and namespace.\n");

    println!("## Property Resolution Order\n");
    println!("  1. Built-in code defaults (shown below)");
    println!("  2. `defaults.jammer` sections (in order loaded)");
    println!("  3. Explicit values in `simulation` and `jammers` (in order loaded)\n");
    println!("When loading multiple YAML files, later files override earlier ones.\n");

    let scopes = [
        (
            PropertyScope::Scenario,
            "Scenario Properties",
            "Set under the `simulation:` section; apply to the whole scenario",
        ),
        (
            PropertyScope::Jammer,
            "Jammer Properties",
            "Set under `defaults.jammer:` or on individual `jammers:` entries",
        ),
    ];

    for (scope, scope_name, scope_desc) in scopes {
        println!("## {}\n", scope_name);
        println!("{}\n", scope_desc);

        let mut by_namespace: std::collections::BTreeMap<&str, Vec<_>> =
            std::collections::BTreeMap::new();
        for prop in properties_by_scope(scope) {
            by_namespace
                .entry(prop.namespace().unwrap_or("(root)"))
                .or_default()
                .push(prop);
        }

        for (namespace, props) in by_namespace {
            if namespace != "(root)" {
                println!("### {}/\n", namespace);
            }
            for prop in props {
                println!("  {}", prop.name);
                println!("    {}", prop.description);
                print!("    Default: {}", prop.default);
                if let Some(unit) = prop.unit {
                    print!(" {}", unit);
                }
                println!();
                if !prop.aliases.is_empty() {
                    println!("    Aliases: {}", prop.aliases.join(", "));
                }
                println!();
            }
        }
    }

    println!("## YAML Examples\n");
    println!("### Scenario settings:\n");
    println!("```yaml");
    println!("simulation:");
    println!("  orbit:");
    println!("    mode: LEO");
    println!("  losses:");
    println!("    rain_att_db: 2.5");
    println!("  modcod:");
    println!("    hysteresis_db: 1.0");
    println!("```\n");

    println!("### Link presets (mode-specific, or legacy `ul`/`dl`):\n");
    println!("```yaml");
    println!("links:");
    println!("  leo:");
    println!("    ul: {{ freq_GHz: 30.0, bw_MHz: 20.0, EIRP_dBW: 45.0, GT_dBK: -8.0 }}");
    println!("    dl: {{ freq_GHz: 20.0, bw_MHz: 20.0, EIRP_dBW: 48.0, GT_dBK: 12.0 }}");
    println!("```\n");

    println!("### Jammers with shared defaults:\n");
    println!("```yaml");
    println!("defaults:");
    println!("  jammer:");
    println!("    power_dbw: 30");
    println!("jammers:");
    println!("  - id: J1");
    println!("    name: \"Spot DL\"");
    println!("    jammer:");
    println!("      type: SPOT");
    println!("      center_frequency_ghz: 20.0");
    println!("      distance_km: 25");
    println!("```\n");
}
