//! matching-scenes CLI - Replay matching lecture scenes
//!
//! Plays a scene script against the matching-state graph model and reports
//! which edges change style in every frame.
//!
//! Usage:
//!   matching-scenes run [OPTIONS] <SCENE>
//!   matching-scenes builtin [OPTIONS] <NAME>
//!   matching-scenes list

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use matching_scenes::{
    SceneConfig, SceneScript, builtin_names, builtin_scene, generate_json, generate_report,
    load_config, load_config_file,
};

/// matching-scenes - Dashed and solid edges for matching lectures
#[derive(Parser, Debug)]
#[command(name = "matching-scenes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a scene file
    Run {
        /// Path to the scene TOML file
        scene: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Play one of the built-in lecture scenes
    Builtin {
        /// Scene name (see `list`)
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List built-in scenes
    List,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file for the report (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Config file path (default: search for .matching.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the full matching after every frame
    #[arg(long)]
    list_matching: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            let mut out = stdout();
            for name in builtin_names() {
                writeln!(out, "{}", name)?;
            }
            Ok(())
        }
        Commands::Run { scene, output } => {
            init_logging(output.verbose);
            let script = SceneScript::load(&scene)?;
            let search_from = scene
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            play(&script, search_from, &output)
        }
        Commands::Builtin { name, output } => {
            init_logging(output.verbose);
            let script = builtin_scene(&name)?;
            play(&script, Path::new("."), &output)
        }
    }
}

fn resolve_config(
    args: &OutputArgs,
    search_from: &Path,
) -> Result<SceneConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(search_from)?,
    };
    if args.list_matching {
        config.report.list_matching = true;
    }
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn play(
    script: &SceneScript,
    search_from: &Path,
    args: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args, search_from)?;

    eprintln!("Playing scene '{}'...", script.name);
    let timeline = script.run()?;
    info!(
        frames = timeline.frames.len(),
        transitions = timeline.transition_count(),
        "scene played"
    );
    eprintln!(
        "Scene complete: {} frames, {} style transitions\n",
        timeline.frames.len(),
        timeline.transition_count()
    );

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(stdout()),
    };

    if args.json {
        generate_json(&timeline, &config, &mut writer)?;
    } else {
        generate_report(&timeline, &config, &mut writer)?;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Report written to: {}", path.display());
    }

    Ok(())
}
