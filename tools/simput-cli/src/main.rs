// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simput command-line tool
//!
//! # Usage
//!
//! ```bash
//! # Validate a motion document
//! simput check motion.xml
//!
//! # Store and rewrite a document in canonical form
//! simput roundtrip motion.xml -o canonical.xml
//!
//! # Generate the reference manual
//! simput manual --format xml --stop-level 2
//!
//! # Using configuration file
//! simput --config simput.toml check motion.xml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use simput::config::{DispatchPolicy, ManualConfig, ManualFormat, SimputConfig};
use simput::engine::Motion;
use simput::input::NodeSpec;
use simput::inputs::{InputMotion, MOTION_TAG};
use simput::{loader, manual};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simput")]
#[command(about = "Schema-driven simulation input - validate, rewrite and document motion files")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a motion document and report the resolved motion kinds
    Check {
        /// Input motion XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Load a motion document, store it back and write it out
    Roundtrip {
        /// Input motion XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate the reference manual of the motion schema
    Manual {
        /// Output markup
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Depth at which to stop descending into fields
        #[arg(long)]
        stop_level: Option<usize>,

        /// Emit cross-referenced sections (LaTeX only)
        #[arg(long)]
        cross_ref: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "simput.toml")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Latex,
    Xml,
}

impl From<FormatArg> for ManualFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Latex => ManualFormat::Latex,
            FormatArg::Xml => ManualFormat::Xml,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimputConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => SimputConfig::default(),
    };

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check { input } => cmd_check(&input, config.dispatch),
        Commands::Roundtrip { input, output } => cmd_roundtrip(&input, output, config.dispatch),
        Commands::Manual {
            format,
            stop_level,
            cross_ref,
            output,
        } => {
            let settings = ManualConfig {
                format: format.map_or(config.manual.format, ManualFormat::from),
                stop_level: stop_level.or(config.manual.stop_level),
                cross_ref: cross_ref || config.manual.cross_ref,
            };
            cmd_manual(&settings, output)
        }
        Commands::GenConfig { output } => cmd_gen_config(&output),
    }
}

fn emit(content: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("[OK] Written to: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn describe(motion: &Motion, depth: usize) {
    let pad = "  ".repeat(depth + 1);
    match motion {
        Motion::Multi(multi) => {
            println!("{pad}multi ({} motions)", multi.motionlist.len());
            for child in &multi.motionlist {
                describe(child, depth + 1);
            }
        }
        Motion::Replay(replay) => {
            println!("{pad}replay <- {} ({})", replay.intraj.filename, replay.intraj.mode);
        }
        other => println!("{pad}{}", other.mode()),
    }
}

fn cmd_check(input: &Path, policy: DispatchPolicy) -> anyhow::Result<()> {
    match loader::load_motion_file(input, policy) {
        Ok(motion) => {
            println!("[OK] Motion document valid: {}", input.display());
            describe(&motion, 0);
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] Motion document invalid: {}", input.display());
            eprintln!("  {}", e.root_cause());
            anyhow::bail!("Validation failed");
        }
    }
}

fn cmd_roundtrip(
    input: &Path,
    output: Option<PathBuf>,
    policy: DispatchPolicy,
) -> anyhow::Result<()> {
    let motion = loader::load_motion_file(input, policy)?;
    let text = loader::write_motion(&motion)?;
    emit(&text, output)
}

fn cmd_manual(settings: &ManualConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    info!(format = ?settings.format, stop_level = ?settings.stop_level, "Rendering manual");
    let schema = InputMotion::new(NodeSpec::new())?;
    let text = match settings.format {
        ManualFormat::Latex => {
            manual::help_latex(&schema, 0, settings.stop_level, settings.cross_ref)?
        }
        ManualFormat::Xml => manual::help_xml(&schema, MOTION_TAG, "", 0, settings.stop_level)?,
    };
    emit(&text, output)
}

fn cmd_gen_config(output: &Path) -> anyhow::Result<()> {
    let config = SimputConfig {
        dispatch: DispatchPolicy::Strict,
        manual: ManualConfig {
            format: ManualFormat::Latex,
            stop_level: Some(2),
            cross_ref: true,
        },
        log_level: "info".into(),
    };

    let toml_str = toml::to_string_pretty(&config)?;

    let content = format!(
        r#"# Simput Configuration
# Generated by simput gen-config

{}
"#,
        toml_str
    );

    std::fs::write(output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}
