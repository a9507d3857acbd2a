//! Stride CLI - Command-line interface for the Stride planner
//!
//! Commands:
//! - generate: Compute a plan skeleton from runner inputs
//! - injure: Activate injury recovery on a realized plan
//! - cancel: Undo injury recovery
//! - validate: Check a realized plan against a profile
//! - races: Show the race parameter tables

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use stride_core::races::race_parameters;
use stride_core::types::{Equipment, RaceDistance, TrainingPlan, UserProfile};
use stride_core::{InjuryRequest, PlanEngine, PlanError, PlanRequest, PLANNER_VERSION, PRODUCER_NAME};

/// Stride - periodization and plan regeneration for endurance training
#[derive(Parser)]
#[command(name = "stride")]
#[command(version = PLANNER_VERSION)]
#[command(about = "Build, reshape and validate training plans", long_about = None)]
struct Cli {
    /// Log filter (e.g. "debug", "stride_core=info"); defaults to RUST_LOG, then "warn"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a plan skeleton
    Generate {
        /// Plan request JSON (use - for stdin); overrides the flags below
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Current weekly mileage
        #[arg(long)]
        mileage: Option<f64>,

        /// Current long run (miles)
        #[arg(long)]
        long_run: Option<f64>,

        /// Plan length in weeks
        #[arg(long)]
        weeks: Option<u32>,

        /// Race distance (5k, 10k, half, marathon, ...)
        #[arg(long)]
        race: Option<String>,

        /// Experience level
        #[arg(long)]
        level: Option<String>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Activate injury recovery on a realized plan
    Injure {
        /// Plan JSON (use - for stdin)
        #[arg(short, long)]
        plan: PathBuf,

        /// Current (first injured) week, 1-based
        #[arg(long)]
        current_week: u32,

        /// Weeks without running
        #[arg(long)]
        weeks_off: u32,

        /// Available cross-training equipment
        #[arg(long, value_delimiter = ',', required = true)]
        equipment: Vec<EquipmentArg>,

        /// Training days to drop per week (0-2)
        #[arg(long, default_value = "0")]
        reduce_days: u8,

        /// Updated user profile JSON
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Restore the plan from before injury recovery
    Cancel {
        /// Plan JSON (use - for stdin)
        #[arg(short, long)]
        plan: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a realized plan against a user profile
    Validate {
        /// Plan JSON (use - for stdin)
        #[arg(short, long)]
        plan: PathBuf,

        /// User profile JSON
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show race parameter tables
    Races {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EquipmentArg {
    Pool,
    Elliptical,
    StationaryBike,
    Swimming,
    Rowing,
    StandUpBike,
}

impl From<EquipmentArg> for Equipment {
    fn from(arg: EquipmentArg) -> Self {
        match arg {
            EquipmentArg::Pool => Equipment::Pool,
            EquipmentArg::Elliptical => Equipment::Elliptical,
            EquipmentArg::StationaryBike => Equipment::StationaryBike,
            EquipmentArg::Swimming => Equipment::Swimming,
            EquipmentArg::Rowing => Equipment::Rowing,
            EquipmentArg::StandUpBike => Equipment::StandUpBike,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(command: Commands) -> Result<(), StrideCliError> {
    let engine = PlanEngine::from_env()?;

    match command {
        Commands::Generate {
            input,
            mileage,
            long_run,
            weeks,
            race,
            level,
            output,
            pretty,
        } => {
            let request = match input {
                Some(path) => serde_json::from_str(&read_input(&path)?)?,
                None => PlanRequest {
                    current_weekly_mileage: mileage,
                    current_long_run: long_run,
                    total_weeks: weeks,
                    race_distance: race,
                    experience_level: level,
                },
            };
            let skeleton = engine.generate_skeleton(&request)?;
            for warning in &skeleton.warnings {
                eprintln!("warning: {warning}");
            }
            write_output(&output, &to_json(&skeleton, pretty)?)
        }

        Commands::Injure {
            plan,
            current_week,
            weeks_off,
            equipment,
            reduce_days,
            profile,
            output,
            pretty,
        } => {
            let plan: TrainingPlan = serde_json::from_str(&read_input(&plan)?)?;
            let updated_profile = match profile {
                Some(path) => serde_json::from_str(&read_input(&path)?)?,
                None => UserProfile::default(),
            };
            let request = InjuryRequest {
                updated_profile,
                current_week,
                weeks_off_running: weeks_off,
                selected_equipment: equipment.into_iter().map(Equipment::from).collect(),
                reduce_training_days: reduce_days,
            };
            let updated = engine.apply_injury_recovery(plan, &request)?;
            write_output(&output, &to_json(&updated, pretty)?)
        }

        Commands::Cancel {
            plan,
            output,
            pretty,
        } => {
            let plan: TrainingPlan = serde_json::from_str(&read_input(&plan)?)?;
            let restored = engine.cancel_injury_recovery(plan)?;
            write_output(&output, &to_json(&restored, pretty)?)
        }

        Commands::Validate {
            plan,
            profile,
            json,
        } => cmd_validate(&engine, &plan, profile.as_deref(), json),

        Commands::Races { json } => cmd_races(json),
    }
}

fn cmd_validate(
    engine: &PlanEngine,
    plan: &Path,
    profile: Option<&Path>,
    json: bool,
) -> Result<(), StrideCliError> {
    let plan: TrainingPlan = serde_json::from_str(&read_input(plan)?)?;
    let profile: UserProfile = match profile {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => UserProfile::default(),
    };

    let report = engine.validate(&plan, &profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Weeks:  {}", plan.week_list().map_or(0, |w| w.len()));
        println!("Issues: {}", report.errors.len());

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for issue in &report.errors {
                let week = issue.week.map_or("-".to_string(), |w| w.to_string());
                println!("  - [{:?}] week {}: {}", issue.check, week, issue.message);
            }
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(StrideCliError::ValidationFailed(report.errors.len()))
    }
}

#[derive(serde::Serialize)]
struct RaceRow {
    race_distance: RaceDistance,
    #[serde(flatten)]
    params: stride_core::types::RaceParameters,
}

fn cmd_races(json: bool) -> Result<(), StrideCliError> {
    let rows: Vec<RaceRow> = RaceDistance::ALL
        .iter()
        .map(|d| RaceRow {
            race_distance: *d,
            params: *race_parameters(*d),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{PRODUCER_NAME} {PLANNER_VERSION}");
    println!(
        "{:<14} {:>9} {:>9} {:>7} {:>9}",
        "race", "peak cap", "long max", "floor", "lr target"
    );
    for row in &rows {
        println!(
            "{:<14} {:>9} {:>9} {:>7} {:>9}",
            row.race_distance.as_str(),
            row.params.peak_weekly_mileage_cap,
            row.params.long_run_max,
            row.params.long_run_floor,
            row.params.minimum_long_run_target
        );
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String, StrideCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(StrideCliError::StdinIsTerminal);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), StrideCliError> {
    if path.to_string_lossy() == "-" {
        println!("{content}");
    } else {
        fs::write(path, format!("{content}\n"))?;
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, StrideCliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

// Error types

#[derive(Debug)]
enum StrideCliError {
    Io(io::Error),
    Plan(PlanError),
    Json(serde_json::Error),
    StdinIsTerminal,
    ValidationFailed(usize),
}

impl From<io::Error> for StrideCliError {
    fn from(e: io::Error) -> Self {
        StrideCliError::Io(e)
    }
}

impl From<PlanError> for StrideCliError {
    fn from(e: PlanError) -> Self {
        StrideCliError::Plan(e)
    }
}

impl From<serde_json::Error> for StrideCliError {
    fn from(e: serde_json::Error) -> Self {
        StrideCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

fn plan_error_hint(e: &PlanError) -> &'static str {
    match e {
        PlanError::Configuration(_) => "Supply every required input with a valid value",
        PlanError::UnsupportedRace(_) => "Run 'stride races' to list supported distances",
        PlanError::Structural(_) => "The plan needs a 'weeks' or 'training_weeks' list",
        PlanError::PlanCorruption(_) => "Regenerate the base plan, then retry",
        PlanError::Json(_) => "Check JSON syntax",
    }
}

impl From<StrideCliError> for CliError {
    fn from(e: StrideCliError) -> Self {
        match e {
            StrideCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            StrideCliError::Plan(e) => CliError {
                code: e.code().to_string(),
                hint: Some(plan_error_hint(&e).to_string()),
                message: e.to_string(),
            },
            StrideCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            StrideCliError::StdinIsTerminal => CliError {
                code: "STDIN_IS_TERMINAL".to_string(),
                message: "Refusing to read JSON from an interactive terminal".to_string(),
                hint: Some("Pipe input into stride or pass a file path".to_string()),
            },
            StrideCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{count} validation issues found"),
                hint: Some("Fix the reported issues and re-validate".to_string()),
            },
        }
    }
}
