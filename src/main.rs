//! Dispatch optimizer entry point — CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use dispatch_sim::config::ScenarioConfig;
use dispatch_sim::io::export::export_csv;
use dispatch_sim::opt::{DispatchOptimizer, NelderMeadMinimizer};
use dispatch_sim::profile::{ProfileGenerator, Profiles};
use dispatch_sim::reporting::DispatchReport;
use dispatch_sim::sim::simulator;
use dispatch_sim::sim::types::DispatchConfig;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    csv_out: Option<String>,
}

fn print_help() {
    eprintln!("dispatch-sim — hybrid renewable/battery/grid dispatch optimizer");
    eprintln!();
    eprintln!("Usage: dispatch-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>        Override the profile random seed");
    eprintln!("  --csv-out <path>    Export the optimized dispatch trace to CSV");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        csv_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--csv-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --csv-out requires a path argument");
                    process::exit(1);
                }
                cli.csv_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the three profile series from the scenario.
fn build_profiles(scenario: &ScenarioConfig) -> Profiles {
    let generator = ProfileGenerator {
        horizon: scenario.simulation.horizon,
        daytime_start: scenario.demand.daytime_start,
        daytime_end: scenario.demand.daytime_end,
        demand_day_kw: scenario.demand.day_kw,
        demand_night_kw: scenario.demand.night_kw,
        solar_max_kw: scenario.solar.max_kw,
        wind_max_kw: scenario.wind.max_kw,
    };
    generator.generate(scenario.simulation.seed)
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply seed override
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    // Validate eagerly; nothing runs on a bad config
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let profiles = build_profiles(&scenario);
    let cfg = DispatchConfig::from_scenario(&scenario);

    let optimizer = DispatchOptimizer::new(NelderMeadMinimizer {
        max_iterations: scenario.solver.max_iterations,
        sd_tolerance: scenario.solver.sd_tolerance,
        penalty_weight: scenario.solver.penalty_weight,
    });
    let initial = DispatchOptimizer::<NelderMeadMinimizer>::default_guess(&profiles);

    let result = match optimizer.optimize(&profiles, &cfg, &initial) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if !result.converged {
        eprintln!(
            "warning: solver stopped after {} iterations without converging; \
             results are best-effort",
            result.iterations
        );
    }

    // Replay the optimized vector once more for the full trace
    let rows = match simulator::trace(result.decision.as_slice(), &profiles, &cfg) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    for r in &rows {
        println!("{r}");
    }

    let report = DispatchReport::from_trace(&rows, result.converged);
    println!("\n{report}");
    println!(
        "Solver objective:      {:.4} after {} iterations",
        result.objective_value, result.iterations
    );

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Trace written to {path}");
    }
}
