//! Multi-file processing
//!
//! Files are independent, so each one is opened, identified and exported on
//! the rayon pool. Results come back in input order; one bad file never
//! stops the others.

use crate::config::OutputFormat;
use crate::report;
use anyhow::{Context, Result};
use efi_log_decoder::{ChannelMap, DecoderConfig, FormatDescriptor, LogFile};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Settings shared by every file of a decode batch
pub struct DecodeJob<'a> {
    pub decoder: &'a DecoderConfig,
    pub names: Option<&'a ChannelMap>,
    pub format: OutputFormat,
    pub output_dir: Option<&'a Path>,
}

/// Outcome of one exported file
#[derive(Debug)]
pub struct Exported {
    pub output: PathBuf,
    pub descriptor: FormatDescriptor,
    pub missing_cells: usize,
}

/// Open and identify every file without decoding its rows
pub fn identify_files(
    files: &[PathBuf],
    config: &DecoderConfig,
) -> Vec<(PathBuf, Result<LogFile>)> {
    files
        .par_iter()
        .map(|path| {
            let result = LogFile::open(path, config)
                .with_context(|| format!("Failed to identify {:?}", path));
            (path.clone(), result)
        })
        .collect()
}

/// Decode every file and write one table per input
///
/// Fails up front if the output directory cannot be created; otherwise each
/// file gets its own result.
pub fn decode_files(
    files: &[PathBuf],
    job: &DecodeJob,
) -> Result<Vec<(PathBuf, Result<Exported>)>> {
    if let Some(dir) = job.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    Ok(files
        .par_iter()
        .map(|path| (path.clone(), decode_one(path, job)))
        .collect())
}

fn decode_one(path: &Path, job: &DecodeJob) -> Result<Exported> {
    let log = LogFile::open(path, job.decoder)
        .with_context(|| format!("Failed to identify {:?}", path))?;
    log::info!("{:?}: {}", path, log.descriptor());

    let table = log.decode(job.names);
    let output = report::output_path(path, job.output_dir, job.format);

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {:?}", output))?;
    report::write_table(
        BufWriter::new(file),
        &table,
        log.descriptor(),
        Some(path),
        job.format,
    )
    .with_context(|| format!("Failed to write {:?}", output))?;

    log::debug!("{:?}: wrote {} rows to {:?}", path, table.row_count(), output);

    Ok(Exported {
        output,
        descriptor: log.descriptor().clone(),
        missing_cells: table.missing_count(),
    })
}
