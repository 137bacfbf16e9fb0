//! Frostwatch - cold-chain temperature monitoring
//!
//! The main entry point for frostwatch, handling:
//! - Live and recorded frame streams (watch / replay)
//! - Synthetic stream generation (simulate)
//! - Configuration validation (check)
//! - Telemetry retention (prune)

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, warn};

use fw_common::{ErrorCategory, OutputFormat};
use fw_config::{
    load_settings, read_raw, resolve_config, validate_settings, ConfigSnapshot, Settings,
};
use fw_core::alerts::{ConsoleSink, SustainedThrottle};
use fw_core::exit_codes::ExitCode;
use fw_core::ingest::{FrameSource, JsonlSource, SimulatedSource, SimulatorConfig};
use fw_core::logging::{init_logging, LogConfig};
use fw_core::pipeline::{Pipeline, RunStats};
use fw_telemetry::{RetentionConfig, RetentionEnforcer, TelemetryStore};

/// Seconds between sustained re-fires surfaced to human-facing formats.
const CONSOLE_SUSTAINED_INTERVAL_SECS: f64 = 30.0;

/// Frostwatch - streaming anomaly detection for cold-chain sensors
#[derive(Parser)]
#[command(name = "frostwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to frostwatch.toml
    #[arg(long, global = true, env = "FW_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "summary")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Override the telemetry directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Disable telemetry storage for this run
    #[arg(long, global = true)]
    no_telemetry: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a live frame stream (stdin by default)
    Watch {
        /// Read frames from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Process a recorded frame stream at full speed
    Replay {
        /// Recorded JSONL frame stream
        file: PathBuf,
    },

    /// Generate a synthetic stream and run it through the pipeline
    Simulate {
        /// RNG seed; identical seeds replay identically
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Reading frames to generate
        #[arg(long, default_value_t = 240)]
        count: usize,

        /// Stream epoch of the first reading (seconds)
        #[arg(long, default_value_t = 0.0)]
        start_at: f64,

        /// Open the fridge door at this reading index
        #[arg(long)]
        door_open_at: Option<usize>,

        /// Fail the compressor at this reading index
        #[arg(long)]
        failure_at: Option<usize>,

        /// Print frames as JSONL instead of running detection
        #[arg(long)]
        emit: bool,
    },

    /// Validate the resolved configuration
    Check,

    /// Enforce telemetry retention (TTL and disk budget)
    Prune {
        /// Report what would be pruned without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_flags(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.no_color,
    ));
    let code = run(cli);
    process::exit(code.as_i32());
}

fn run(cli: Cli) -> ExitCode {
    let paths = resolve_config(cli.global.config.as_deref());
    let settings = match load_settings(&paths) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return ExitCode::ConfigError;
        }
    };
    let report = validate_settings(&settings);
    if !report.is_ok() {
        for err in &report.errors {
            error!(field = %err.field, message = %err.message, "invalid configuration");
        }
        return ExitCode::ConfigError;
    }
    let raw = read_raw(&paths);
    let snapshot = ConfigSnapshot::capture(&paths, &settings, raw.as_deref());
    debug!(source = %snapshot.config_source, "configuration resolved");

    match cli.command {
        Commands::Watch { input } => match input {
            Some(path) => match File::open(&path) {
                Ok(file) => {
                    let mut source = JsonlSource::new(BufReader::new(file));
                    run_pipeline(&cli.global, &settings, &mut source)
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "cannot open input");
                    ExitCode::InputError
                }
            },
            None => {
                let stdin = std::io::stdin();
                let mut source = JsonlSource::new(stdin.lock());
                run_pipeline(&cli.global, &settings, &mut source)
            }
        },

        Commands::Replay { file } => match File::open(&file) {
            Ok(handle) => {
                let mut source = JsonlSource::new(BufReader::new(handle));
                run_pipeline(&cli.global, &settings, &mut source)
            }
            Err(e) => {
                error!(path = %file.display(), error = %e, "cannot open recording");
                ExitCode::InputError
            }
        },

        Commands::Simulate {
            seed,
            count,
            start_at,
            door_open_at,
            failure_at,
            emit,
        } => {
            let config = SimulatorConfig {
                seed,
                count,
                start_at,
                door_open_at,
                failure_at,
                ..Default::default()
            };
            let mut source = SimulatedSource::new(config);
            if emit {
                emit_frames(&mut source)
            } else {
                run_pipeline(&cli.global, &settings, &mut source)
            }
        }

        Commands::Check => cmd_check(&cli.global, &snapshot),

        Commands::Prune { dry_run } => cmd_prune(&cli.global, &settings, dry_run),
    }
}

fn run_pipeline(
    global: &GlobalOpts,
    settings: &Settings,
    source: &mut dyn FrameSource,
) -> ExitCode {
    let mut pipeline = Pipeline::new(settings);

    if !global.no_telemetry {
        match telemetry_dir(global, settings) {
            Some(dir) => pipeline = pipeline.with_telemetry(TelemetryStore::open(&dir)),
            None => warn!("no data directory available; telemetry disabled"),
        }
    }

    let console = ConsoleSink::stdout(global.format);
    match global.format {
        // Human-facing formats get the sustained-alarm throttle; machine
        // formats see every emission.
        OutputFormat::Summary | OutputFormat::Md => pipeline.add_sink(Box::new(
            SustainedThrottle::new(console, CONSOLE_SUSTAINED_INTERVAL_SECS),
        )),
        OutputFormat::Json | OutputFormat::Jsonl => pipeline.add_sink(Box::new(console)),
    }

    match pipeline.run(source) {
        Ok(stats) => {
            print_stats(global.format, &stats);
            if stats.total_alerts() > 0 {
                ExitCode::AlertsRaised
            } else {
                ExitCode::Clean
            }
        }
        Err(e) => {
            error!(error = %e, "run failed");
            match e.category() {
                ErrorCategory::Storage => ExitCode::StorageError,
                ErrorCategory::Io => ExitCode::IoError,
                _ => ExitCode::InternalError,
            }
        }
    }
}

fn emit_frames(source: &mut dyn FrameSource) -> ExitCode {
    loop {
        match source.next_frame() {
            Ok(Some(frame)) => match serde_json::to_string(&frame) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    error!(error = %e, "failed to serialize frame");
                    return ExitCode::InternalError;
                }
            },
            Ok(None) => return ExitCode::Clean,
            Err(e) => {
                error!(error = %e, "stream failed");
                return ExitCode::InternalError;
            }
        }
    }
}

fn cmd_check(global: &GlobalOpts, snapshot: &ConfigSnapshot) -> ExitCode {
    // Reaching here means load + validation already succeeded.
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            match serde_json::to_string_pretty(snapshot) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!(error = %e, "failed to serialize snapshot");
                    return ExitCode::InternalError;
                }
            }
        }
        OutputFormat::Summary => {
            println!(
                "config ok ({}): window={} z>{} sustained={}s",
                snapshot.config_source,
                snapshot.settings.detector.window_size,
                snapshot.settings.detector.z_threshold,
                snapshot.settings.detector.sustained_secs,
            );
        }
        OutputFormat::Md => {
            println!("## Configuration\n");
            println!("- source: {}", snapshot.config_source);
            println!("- window size: {}", snapshot.settings.detector.window_size);
            println!("- z threshold: {}", snapshot.settings.detector.z_threshold);
            println!(
                "- sustained threshold: {}s",
                snapshot.settings.detector.sustained_secs
            );
        }
    }
    ExitCode::Clean
}

fn cmd_prune(global: &GlobalOpts, settings: &Settings, dry_run: bool) -> ExitCode {
    let Some(dir) = telemetry_dir(global, settings) else {
        error!("no data directory available");
        return ExitCode::StorageError;
    };
    let config = RetentionConfig {
        ttl_days: settings.storage.ttl_days,
        disk_budget_bytes: settings.storage.disk_budget_mb * 1024 * 1024,
    };
    let enforcer = RetentionEnforcer::new(&dir, config);
    let now = chrono::Utc::now();

    if dry_run {
        match enforcer.preview(now) {
            Ok(preview) => {
                println!(
                    "would prune {} files ({} bytes)",
                    preview.files_to_prune, preview.bytes_to_free
                );
                ExitCode::Clean
            }
            Err(e) => {
                error!(error = %e, "retention preview failed");
                ExitCode::StorageError
            }
        }
    } else {
        match enforcer.enforce(now) {
            Ok(events) => {
                let bytes: u64 = events.iter().map(|e| e.bytes).sum();
                println!("pruned {} files ({} bytes)", events.len(), bytes);
                ExitCode::Clean
            }
            Err(e) => {
                error!(error = %e, "retention enforcement failed");
                ExitCode::StorageError
            }
        }
    }
}

fn telemetry_dir(global: &GlobalOpts, settings: &Settings) -> Option<PathBuf> {
    if let Some(dir) = &global.data_dir {
        return Some(dir.clone());
    }
    if let Some(dir) = &settings.storage.data_dir {
        return Some(dir.clone());
    }
    dirs::data_dir().map(|base| base.join("frostwatch").join("telemetry"))
}

fn print_stats(format: OutputFormat, stats: &RunStats) {
    match format {
        OutputFormat::Json => {
            if let Ok(text) = serde_json::to_string_pretty(stats) {
                println!("{}", text);
            }
        }
        OutputFormat::Jsonl => {
            if let Ok(text) = serde_json::to_string(stats) {
                println!(r#"{{"kind":"run_summary","stats":{}}}"#, text);
            }
        }
        OutputFormat::Summary => println!("{}", stats.summary()),
        OutputFormat::Md => {
            println!("## Run summary\n");
            println!("- frames: {}", stats.frames);
            println!(
                "- readings: {} accepted, {} rejected",
                stats.readings_accepted, stats.readings_rejected
            );
            println!(
                "- alerts: {} ({} transient, {} sustained, {} recovered)",
                stats.total_alerts(),
                stats.transient_alerts,
                stats.sustained_alerts,
                stats.recovered_alerts
            );
            println!("- liveness transitions: {}", stats.liveness_transitions);
        }
    }
}
