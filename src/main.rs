//! Pipeviz - readable Graphviz diagrams of pipeline configurations.
//!
//! # Usage
//!
//! ```bash
//! pipeviz graph pipeline.json | dot -Tsvg > pipeline.svg
//! vector convert-config ... | pipeviz graph --rankdir LR
//! vector graph --config vector.toml | pipeviz clarify - | dot -Tpng > graph.png
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pipeviz::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags, ConfigFlags,
};
use pipeviz::graph::RankDir;
use pipeviz::input::read_input;
use pipeviz::pipeline::InputFormat;
use pipeviz::{dot, graph, perf, pipeline, relabel};

/// Readable Graphviz diagrams of data pipeline configurations
#[derive(Parser, Debug)]
#[command(name = "pipeviz", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print phase timings to stderr
    #[arg(long, global = true)]
    perf: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw the data flow of a pipeline configuration as a DOT digraph
    Graph {
        /// Configuration file, or "-" for standard input
        #[arg(value_name = "FILE", default_value = "-")]
        input: PathBuf,

        /// Graphviz rankdir of the digraph
        #[arg(short, long, value_enum)]
        rankdir: Option<RankDir>,

        /// Configuration format
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Write the graph to a file instead of standard output
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Save the given flags as defaults
        #[arg(long)]
        save: bool,

        /// Clear saved defaults
        #[arg(long)]
        clear: bool,
    },

    /// Group and recolor a DOT graph drawn with role shapes
    Clarify {
        /// DOT file, or "-" for standard input
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the graph to a file instead of standard output
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Write the finished text in one go.
fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write standard output")
        }
    }
}

fn run_graph(
    input: &Path,
    cli_flags: &ConfigFlags,
    output: Option<&Path>,
    save: bool,
    clear: bool,
) -> Result<()> {
    let global_path = global_config_path();
    let local_path = local_override_path();

    if clear {
        clear_config_flags(&global_path)?;
    }
    if save {
        save_config_flags(&global_path, cli_flags)?;
    }

    let file_flags = if clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(cli_flags);
    perf::set_enabled(effective.perf);

    let format = effective.format.unwrap_or_default();
    let rankdir = effective.rankdir.unwrap_or_default();
    tracing::debug!(input = %input.display(), format = format.as_str(), %rankdir, "graph");

    let text = read_input(input)?;
    let config = {
        let _scope = perf::scope("parse config");
        pipeline::parse(&text, format)
            .with_context(|| format!("Failed to load configuration from {}", input.display()))?
    };
    let dot_text = {
        let _scope = perf::scope("build graph");
        graph::build(&config, rankdir).to_dot()
    };
    emit(output, &dot_text)
}

fn run_clarify(input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let mut parsed = {
        let _scope = perf::scope("parse dot");
        dot::parse(&text).with_context(|| format!("Failed to parse {}", input.display()))?
    };
    let dot_text = {
        let _scope = perf::scope("clarify");
        relabel::clarify(&mut parsed);
        dot::write(&parsed)
    };
    emit(output, &dot_text)
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the graph
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    perf::set_enabled(cli.perf);

    match cli.command {
        Commands::Graph {
            input,
            rankdir,
            format,
            output,
            save,
            clear,
        } => {
            let cli_flags = ConfigFlags {
                rankdir,
                format,
                perf: cli.perf,
            };
            run_graph(&input, &cli_flags, output.as_deref(), save, clear)
        }
        Commands::Clarify { input, output } => run_clarify(&input, output.as_deref()),
    }
}
