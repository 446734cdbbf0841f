use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{
    eyre::{WrapErr, eyre},
    owo_colors::OwoColorize,
};
use cube_core::{
    CubeEngine, CubeState, CubeType, Metadata, Perspective, Variants,
    codec::{decode, encode},
    storage::{parse_link, permalink, scheme_link},
};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};

/// Defaults used when a command does not say otherwise
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct CliConfig {
    cube_type: Option<CubeType>,
    perspective: Option<Perspective>,
}

/// Inspect, turn and share cubes in their compact form
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// A configuration file in TOML format
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble a solved cube and print its code
    Encode {
        /// The moves to apply, e.g. "R U' F2"
        #[arg(default_value = "")]
        algorithm: String,
        /// rubiks, latch or earth
        #[arg(long = "type", short)]
        cube_type: Option<CubeType>,
        /// unfolded or isometric
        #[arg(long, short)]
        perspective: Option<Perspective>,
    },
    /// Show the cube behind a code or link
    Decode { code: String },
    /// Apply moves to a cube and print the new code
    Apply { code: String, algorithm: String },
    /// List which moves the cube allows
    Moves {
        /// The cube to inspect; a solved cube of the configured type if left out
        code: Option<String>,
    },
    /// Name the move that turns one cube into another
    Diff { before: String, after: String },
    /// Print the shareable links for a code
    Link { code: String },
    /// List the known cube variants
    Variants,
}

fn load_config(path: Option<&PathBuf>) -> color_eyre::Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read the configuration file {path:?}"))?;

    toml::from_str(&text).wrap_err("Failed to parse the configuration file")
}

/// Accept a bare code or any link carrying one
fn read_code(text: &str) -> color_eyre::Result<(CubeState, Metadata)> {
    let code = parse_link(text).unwrap_or(text);
    Ok(decode(code)?)
}

fn engine_for(variants: &Variants, cube_type: CubeType) -> color_eyre::Result<CubeEngine> {
    Ok(CubeEngine::for_type(variants, cube_type)?)
}

fn print_cube(engine: &CubeEngine, state: &CubeState, metadata: Metadata) {
    println!(
        "{} ({}, {})",
        engine.variant().name.bold(),
        metadata.cube_type,
        metadata.perspective
    );
    println!("{state}");

    for line in engine.diagram(state) {
        println!("{line}");
    }

    println!("orientation {}", engine.core_permutation(state));
    if engine.is_solved(state) {
        println!("{}", "solved".green());
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = load_config(cli.config.as_ref())?;
    let default_type = config.cube_type.unwrap_or(CubeType::Rubiks);
    let variants = Variants::builtin();

    match cli.command {
        Commands::Encode {
            algorithm,
            cube_type,
            perspective,
        } => {
            let metadata = Metadata {
                cube_type: cube_type.unwrap_or(default_type),
                perspective: perspective
                    .or(config.perspective)
                    .unwrap_or_default(),
            };

            let engine = engine_for(&variants, metadata.cube_type)?;
            let state = engine.apply_algorithm(&CubeState::identity(), &algorithm)?;

            info!("Encoding: type={} moves={algorithm:?}", metadata.cube_type);
            println!("{}", encode(&state, metadata));
        }
        Commands::Decode { code } => {
            let (state, metadata) = read_code(&code)?;
            let engine = engine_for(&variants, metadata.cube_type)?;

            print_cube(&engine, &state, metadata);
        }
        Commands::Apply { code, algorithm } => {
            let (state, metadata) = read_code(&code)?;
            let engine = engine_for(&variants, metadata.cube_type)?;

            let state = engine.apply_algorithm(&state, &algorithm)?;
            println!("{}", encode(&state, metadata));
        }
        Commands::Moves { code } => {
            let (state, metadata) = match code {
                Some(code) => read_code(&code)?,
                None => (
                    CubeState::identity(),
                    Metadata {
                        cube_type: default_type,
                        ..Metadata::default()
                    },
                ),
            };
            let engine = engine_for(&variants, metadata.cube_type)?;

            let allowed = engine.allowed_moves(&state);
            let line = engine
                .operations()
                .iter()
                .map(|operation| {
                    let name: &str = operation.name();
                    if allowed.get(operation.name()).copied().unwrap_or(false) {
                        name.green().to_string()
                    } else {
                        name.red().to_string()
                    }
                })
                .join(" ");

            println!("{line}");
        }
        Commands::Diff { before, after } => {
            let (before, metadata) = read_code(&before)?;
            let (after, after_metadata) = read_code(&after)?;

            if metadata.cube_type != after_metadata.cube_type {
                return Err(eyre!(
                    "Cannot compare a {} cube with a {} cube",
                    metadata.cube_type,
                    after_metadata.cube_type
                ));
            }

            let engine = engine_for(&variants, metadata.cube_type)?;

            match engine.find_transition(&after, &before) {
                Some(operation) => println!("{operation}"),
                None => println!("{}", "no single move".yellow()),
            }
        }
        Commands::Link { code } => {
            // Fail early on codes that do not decode
            read_code(&code)?;
            let code = parse_link(&code).unwrap_or(&code);

            println!("{}", permalink(code));
            println!("{}", scheme_link(code));
        }
        Commands::Variants => {
            for variant in variants.visible() {
                println!(
                    "{:<8} {} ({})",
                    variant.cube_type.to_string(),
                    variant.name,
                    variant.colors.join(", ")
                );
            }
        }
    }

    Ok(())
}
