//! EFI Log Reader CLI Application
//!
//! Command-line front end for the efi-log-decoder library:
//! - `info`: identify logs and print their layout
//! - `decompress`: expand a `.dlz` container into a `.dl` file
//! - `decode`: export logs as CSV or JSON tables
//! - `run`: batch decode driven by a config.toml

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use efi_log_decoder::{
    decompress, inspect_container, ChannelMap, ContainerKind, DecoderConfig, HeaderFields,
    LogFile,
};
use std::fs;
use std::path::{Path, PathBuf};

mod batch;
mod config;
mod report;

use config::OutputFormat;

/// EFI Log Reader - Decode engine-management datalogs (DL/DLZ)
#[derive(Parser, Debug)]
#[command(name = "efi-log-cli")]
#[command(about = "Decode engine-management datalog files (DL, DLZ)", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify log files and print their layout
    Info {
        /// Log files (.dl or .dlz)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Also print the leading header words
        #[arg(long)]
        header: bool,

        #[command(flatten)]
        container: ContainerArgs,
    },

    /// Expand a compressed .dlz container
    Decompress {
        /// Compressed input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: input with a .dl extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only print the container summary
        #[arg(long)]
        analyze: bool,
    },

    /// Decode log files into CSV or JSON tables
    Decode {
        /// Log files (.dl or .dlz)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Directory for the exported tables (default: next to each input)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// JSON channel map naming the columns
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Name the leading channels with the vendor's CSV column names
        #[arg(long)]
        common_names: bool,

        /// Maximum number of rows to decode per file
        #[arg(long, value_name = "COUNT")]
        max_rows: Option<usize>,

        /// Maximum number of channels to decode per row
        #[arg(long, value_name = "COUNT")]
        channels: Option<usize>,

        #[command(flatten)]
        container: ContainerArgs,
    },

    /// Batch decode driven by a configuration file
    Run {
        /// Path to configuration file (config.toml)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ContainerArgs {
    /// Treat every input as compressed, regardless of extension
    #[arg(long, conflicts_with = "expanded")]
    compressed: bool,

    /// Treat every input as already expanded, regardless of extension
    #[arg(long)]
    expanded: bool,
}

impl ContainerArgs {
    fn kind(&self) -> ContainerKind {
        if self.compressed {
            ContainerKind::Compressed
        } else if self.expanded {
            ContainerKind::Expanded
        } else {
            ContainerKind::Auto
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("EFI Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", efi_log_decoder::VERSION);

    match args.command {
        Command::Info {
            files,
            header,
            container,
        } => info_mode(&files, header, container.kind()),
        Command::Decompress {
            input,
            output,
            analyze,
        } => decompress_mode(&input, output, analyze),
        Command::Decode {
            files,
            output_dir,
            format,
            names,
            common_names,
            max_rows,
            channels,
            container,
        } => {
            let mut decoder = DecoderConfig::new().with_container(container.kind());
            decoder.max_rows = max_rows;
            decoder.channel_limit = channels;

            let channels = config::ChannelsConfig {
                map_file: names,
                use_common_names: common_names,
            };
            decode_mode(&files, &decoder, &channels, format, output_dir.as_deref())
        }
        Command::Run { config } => config_mode(&config),
    }
}

/// Identify each file and print its layout
fn info_mode(files: &[PathBuf], header: bool, container: ContainerKind) -> Result<()> {
    let config = DecoderConfig::new().with_container(container);
    let results = batch::identify_files(files, &config);

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(log) => {
                let descriptor = log.descriptor();
                println!("{}", path.display());
                println!("  {}", descriptor);
                if descriptor.trailing_bytes() > 0 {
                    println!("  {} trailing bytes after the last row", descriptor.trailing_bytes());
                }
                if header {
                    print_header(log)?;
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {:#}", path.display(), e);
            }
        }
    }

    finish(failed, results.len())
}

fn print_header(log: &LogFile) -> Result<()> {
    let fields = HeaderFields::read(log.data())?;
    for field in fields.fields() {
        println!("    {}", field);
    }
    Ok(())
}

/// Expand one container, or just summarize it
fn decompress_mode(input: &Path, output: Option<PathBuf>, analyze: bool) -> Result<()> {
    let raw = fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;

    match inspect_container(&raw) {
        Ok(summary) => {
            println!("{}", input.display());
            println!("  Size:         {} bytes", summary.size);
            println!("  Magic:        0x{:08X}", summary.magic);
            println!("  Run markers:  {}", summary.marker_count);
            if let Some(text) = &summary.embedded_text {
                println!("  Tune name:    {}", text);
            }
        }
        // Expansion is still attempted; the summary is informational
        Err(e) if !analyze => log::warn!("{:?}: {}", input, e),
        Err(e) => return Err(e).with_context(|| format!("Failed to inspect {:?}", input)),
    }

    if analyze {
        return Ok(());
    }

    let expanded = decompress(&raw);
    let output = output.unwrap_or_else(|| input.with_extension("dl"));
    fs::write(&output, &expanded)
        .with_context(|| format!("Failed to write output file: {:?}", output))?;

    let ratio = if raw.is_empty() {
        0.0
    } else {
        expanded.len() as f64 / raw.len() as f64
    };
    println!(
        "Expanded {} -> {} bytes ({:.1}x) into {}",
        raw.len(),
        expanded.len(),
        ratio,
        output.display()
    );

    Ok(())
}

/// Decode each file and export one table per input
fn decode_mode(
    files: &[PathBuf],
    decoder: &DecoderConfig,
    channels: &config::ChannelsConfig,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    let names: Option<ChannelMap> = channels.build_map()?;
    let job = batch::DecodeJob {
        decoder,
        names: names.as_ref(),
        format,
        output_dir,
    };

    let results = batch::decode_files(files, &job)?;

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(exported) => {
                println!(
                    "{} -> {} ({} rows, {})",
                    path.display(),
                    exported.output.display(),
                    exported.descriptor.row_count(),
                    exported.descriptor.variant()
                );
                if exported.missing_cells > 0 {
                    log::info!(
                        "{:?}: {} cells past the end of the data were left empty",
                        path,
                        exported.missing_cells
                    );
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {:#}", path.display(), e);
            }
        }
    }

    finish(failed, results.len())
}

/// Config mode - everything comes from config.toml
fn config_mode(config_path: &Path) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let config = config::load_config(config_path)?;
    log::debug!("Configuration loaded: {} input files", config.input.files.len());

    decode_mode(
        &config.input.files,
        &config.decoder,
        &config.channels,
        config.output.format,
        config.output.output_dir.as_deref(),
    )
}

fn finish(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        bail!("{} of {} files failed", failed, total);
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
