//! waddle-cad: build the keyboard parts and write them to STEP/STL.
//!
//! # Logging
//!
//! `RUST_LOG` wins when set; otherwise `-v` shows exports, `-vv` every
//! boolean and `-vvv` everything.
//!
//! ```bash
//! waddle-cad socket --pins 12
//! waddle-cad --format both waddle-alt --split --parts bottom --parts plate
//! RUST_LOG=waddle_cad=debug waddle-cad all
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use waddle_cad::config::{Config, ExportFormat};
use waddle_cad::io::step::{StepExportParams, write_step};
use waddle_cad::io::stl::write_stl;
use waddle_cad::parts::{Cap, KeyboardPart, KeyboardParts, ProMicro, ProMicroVariant, Socket, WaddleAlt};
use waddle_cad::{Assembly, Color, Location};

/// Parametric keyboard hardware: keycaps, a Pro Micro stand-in, a DIL
/// socket and two keyboard cases.
#[derive(Parser)]
#[command(name = "waddle-cad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Files to write (overrides the config file)
    #[arg(long, global = true)]
    format: Option<ExportFormat>,

    /// Print the assembly tree after building it
    #[arg(long, global = true)]
    show: bool,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Row 3 keycap
    Cap,

    /// Arduino Pro Micro stand-in
    ProMicro {
        #[arg(long, value_enum, default_value_t = ProMicroVariant::C)]
        variant: ProMicroVariant,
    },

    /// Turned-pin DIL socket
    Socket {
        /// Pins per row
        #[arg(long, default_value_t = 12)]
        pins: usize,
    },

    /// The Waddle case
    Waddle {
        /// Parts to include (all when omitted)
        #[arg(long, value_enum)]
        parts: Vec<KeyboardPart>,
    },

    /// The magnet-held Waddle case
    WaddleAlt {
        /// Parts to include (all when omitted)
        #[arg(long, value_enum)]
        parts: Vec<KeyboardPart>,

        /// Build the tray and plate in two halves
        #[arg(long)]
        split: bool,
    },

    /// Every part with its default parameters
    All,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG first, then the -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "waddle_cad=info",
            2 => "waddle_cad=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

struct Output {
    directory: PathBuf,
    format: ExportFormat,
    show: bool,
    quiet: bool,
}

impl Output {
    fn path(&self, stem: &str, ext: &str) -> PathBuf {
        self.directory.join(format!("{stem}.{ext}"))
    }

    fn announce(&self, path: &Path) {
        if !self.quiet {
            println!("wrote {}", path.display());
        }
    }

    /// Write `asm` in every requested format.
    fn save(&self, asm: &Assembly, stem: &str) -> Result<()> {
        if self.show {
            print!("{}", asm.show());
        }
        for ext in self.format.extensions() {
            let path = self.path(stem, ext);
            asm.save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            self.announce(&path);
        }
        Ok(())
    }
}

fn parts_or_all(parts: &[KeyboardPart]) -> KeyboardParts {
    if parts.is_empty() {
        KeyboardParts::all()
    } else {
        parts.iter().copied().collect()
    }
}

fn cap(config: &Config, out: &Output) -> Result<()> {
    let generator = Cap {
        segments: config.mesh.segments,
    };
    let cap = generator.row3().context("failed to build the row 3 cap")?;
    let asm = Assembly::new("cap_row3").with("cap", cap.clone(), Color::default(), Location::identity())?;
    if out.show {
        print!("{}", asm.show());
    }
    // STEP as drawn, STL in print orientation
    for ext in out.format.extensions() {
        let path = out.path("cap_row3", ext);
        match *ext {
            "stl" => write_stl(&Cap::print_orientation(&cap), &path),
            _ => write_step(&asm, &path, &StepExportParams::default()),
        }
        .with_context(|| format!("failed to write {}", path.display()))?;
        out.announce(&path);
    }
    Ok(())
}

fn pro_micro(config: &Config, out: &Output, variant: ProMicroVariant) -> Result<()> {
    let board = ProMicro {
        variant,
        segments: config.mesh.segments,
    };
    let asm = board
        .assembly()
        .with_context(|| format!("failed to build the {variant} Pro Micro"))?;
    out.save(&asm, &board.file_stem())
}

fn socket(out: &Output, pins: usize) -> Result<()> {
    let socket = Socket::new(pins);
    let asm = socket
        .assembly()
        .with_context(|| format!("failed to build a socket with {pins} pins per row"))?;
    out.save(&asm, &socket.file_stem())
}

fn waddle(config: &Config, out: &Output, parts: &[KeyboardPart]) -> Result<()> {
    let asm = config
        .waddle
        .keyboard(parts_or_all(parts), &config.references.models())
        .context("failed to build the waddle")?;
    out.save(&asm, "waddle")
}

fn waddle_alt(config: &Config, out: &Output, parts: &[KeyboardPart], split: bool) -> Result<()> {
    let kb = WaddleAlt {
        split: split || config.waddle_alt.split,
        ..config.waddle_alt
    };
    let asm = kb
        .keyboard(parts_or_all(parts), &config.references.models())
        .with_context(|| format!("failed to build {}", kb.name()))?;
    out.save(&asm, kb.name())
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    config.apply();

    let out = Output {
        directory: cli.out_dir.clone().unwrap_or_else(|| config.output.directory.clone()),
        format: cli.format.unwrap_or(config.output.format),
        show: cli.show,
        quiet: cli.quiet,
    };
    std::fs::create_dir_all(&out.directory)
        .with_context(|| format!("failed to create {}", out.directory.display()))?;

    let start = Instant::now();
    match &cli.command {
        Commands::Cap => cap(&config, &out)?,
        Commands::ProMicro { variant } => pro_micro(&config, &out, *variant)?,
        Commands::Socket { pins } => socket(&out, *pins)?,
        Commands::Waddle { parts } => waddle(&config, &out, parts)?,
        Commands::WaddleAlt { parts, split } => waddle_alt(&config, &out, parts, *split)?,
        Commands::All => {
            cap(&config, &out)?;
            for variant in [ProMicroVariant::Micro, ProMicroVariant::C] {
                pro_micro(&config, &out, variant)?;
            }
            socket(&out, 12)?;
            waddle(&config, &out, &[])?;
            waddle_alt(&config, &out, &[], false)?;
        },
    }
    tracing::info!(elapsed = ?start.elapsed(), "done");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        if !cli.quiet {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
        }
        std::process::exit(1);
    }
    Ok(())
}
