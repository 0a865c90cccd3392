use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use class_genie::config::{load_config, load_table};
use class_genie::output::{format_grade, format_grade_table, format_outcome, should_use_colors};
use class_genie::randomizer::{validate_randomizer, Randomizer, RandomizerConfig};
use class_genie::sheet::{load_sheet, save_sheet};
use class_genie::transmutation::validate_table;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_UNCONVERGED: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the transmuted grade for an initial average
    Transmute {
        /// Initial average, 0-100
        average: f64,
    },
    /// Show every student's initial and transmuted average
    Show {
        /// Class sheet JSON file
        sheet: PathBuf,
    },
    /// Generate scores that reproduce target grades and save them to the sheet
    Randomize {
        /// Class sheet JSON file
        sheet: PathBuf,

        /// Move every student's current grade by N (may be negative)
        #[arg(
            long,
            allow_hyphen_values = true,
            conflicts_with = "grades",
            required_unless_present = "grades"
        )]
        offset: Option<i32>,

        /// Target grade for one student, NAME=GRADE (repeatable)
        #[arg(long = "grade", value_name = "NAME=GRADE", value_parser = parse_grade_assignment)]
        grades: Vec<(String, u32)>,

        /// Only fill in missing scores, keep the ones already entered
        #[arg(long)]
        keep_existing: bool,

        /// RNG seed for reproducible scores
        #[arg(long)]
        seed: Option<u64>,

        /// Override randomizer.max_iterations
        #[arg(long)]
        max_iterations: Option<u64>,

        /// Override randomizer.jitter_factor (1.0 - 2.0)
        #[arg(long)]
        jitter: Option<f64>,

        /// Print the results without writing the sheet
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "class-genie")]
#[command(about = "Transmuted grade calculator and score generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/class-genie/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_grade_assignment(s: &str) -> Result<(String, u32), String> {
    let (name, grade) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=GRADE, got '{}'", s))?;
    let grade: u32 = grade
        .trim()
        .parse()
        .map_err(|e| format!("invalid grade '{}': {}", grade.trim(), e))?;
    Ok((name.trim().to_string(), grade))
}

/// Current grade moved by `offset`, or None when that would go below zero
fn offset_target(current: u32, offset: i32) -> Option<u32> {
    u32::try_from(i64::from(current) + i64::from(offset)).ok()
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "class_genie=debug" } else { "class_genie=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let table = match load_table(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Transmutation table error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(errors) = validate_table(&table) {
        eprintln!("Transmutation table errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = should_use_colors();

    match cli.command {
        Commands::Transmute { average } => match table.lookup(average) {
            Ok(grade) => println!("{}", grade),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Show { sheet } => {
            let class_sheet = load_sheet(&sheet).unwrap_or_else(|e| {
                eprintln!("Sheet error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            });
            let records = class_sheet.student_records().unwrap_or_else(|e| {
                eprintln!("Sheet error: {}", e);
                std::process::exit(EXIT_CONFIG);
            });
            println!("{}", format_grade_table(&records, &table, use_colors));
        }
        Commands::Randomize {
            sheet,
            offset,
            grades,
            keep_existing,
            seed,
            max_iterations,
            jitter,
            dry_run,
        } => {
            // CLI flags override the config file
            let mut randomizer_config: RandomizerConfig = config.randomizer.clone().unwrap_or_default();
            if keep_existing {
                randomizer_config.overwrite_all = Some(false);
            }
            if max_iterations.is_some() {
                randomizer_config.max_iterations = max_iterations;
            }
            if jitter.is_some() {
                randomizer_config.jitter_factor = jitter;
            }
            if let Err(errors) = validate_randomizer(&randomizer_config) {
                eprintln!("Randomizer config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }

            let mut class_sheet = load_sheet(&sheet).unwrap_or_else(|e| {
                eprintln!("Sheet error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            });
            let (reference, mut records) =
                match (class_sheet.head_components(), class_sheet.student_records()) {
                    (Ok(h), Ok(r)) => (h, r),
                    (Err(e), _) | (_, Err(e)) => {
                        eprintln!("Sheet error: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                };

            // One optional target per student, in sheet order
            let mut targets: Vec<Option<u32>> = vec![None; records.len()];
            if let Some(offset) = offset {
                for (target, record) in targets.iter_mut().zip(&records) {
                    match record.transmuted_average(&table) {
                        Ok(current) => match offset_target(current, offset) {
                            Some(t) => *target = Some(t),
                            None => eprintln!(
                                "{}: cannot offset {} by {}, target would be negative",
                                record.name().unwrap_or("(unnamed)"),
                                current,
                                offset
                            ),
                        },
                        Err(e) => eprintln!(
                            "{}: cannot offset, {}",
                            record.name().unwrap_or("(unnamed)"),
                            e
                        ),
                    }
                }
            }
            for (name, grade) in &grades {
                match class_sheet.find_student(name) {
                    Some(idx) => targets[idx] = Some(*grade),
                    None => {
                        eprintln!("No student named '{}' in {}", name, sheet.display());
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            }

            let selected: Vec<usize> = (0..records.len()).filter(|&i| targets[i].is_some()).collect();
            let befores: Vec<_> = selected
                .iter()
                .map(|&i| (records[i].name().map(str::to_string), records[i].transmuted_average(&table)))
                .collect();

            let seed = seed.or(config.seed);
            let mut randomizer = Randomizer::new(&table, randomizer_config);
            if let Some(seed) = seed {
                randomizer = randomizer.with_seed(seed);
            }

            let jobs = records
                .iter_mut()
                .zip(&targets)
                .filter_map(|(record, target)| target.map(|t| (record, t)));
            let results = randomizer.randomize_all(jobs, &reference);

            let mut failures = 0;
            for (((name, before), &idx), result) in befores.iter().zip(&selected).zip(&results) {
                let target = targets[idx].unwrap_or_default();
                if result.is_err() {
                    failures += 1;
                }
                println!(
                    "{}",
                    format_outcome(name.as_deref(), before, target, result, use_colors)
                );
            }

            if cli.verbose {
                for &idx in &selected {
                    eprintln!(
                        "  {}: now {}",
                        records[idx].name().unwrap_or("(unnamed)"),
                        format_grade(&records[idx].transmuted_average(&table))
                    );
                }
                eprintln!();
                eprintln!("Randomized {} students in {:?}", selected.len(), start_time.elapsed());
            }

            if dry_run {
                eprintln!("Dry run: {} not modified", sheet.display());
            } else {
                class_sheet.apply_records(&records);
                if let Err(e) = save_sheet(&sheet, &class_sheet) {
                    eprintln!("Failed to save sheet: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }

            if failures > 0 {
                eprintln!("{} of {} students did not reach their target.", failures, selected.len());
                std::process::exit(EXIT_UNCONVERGED);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
