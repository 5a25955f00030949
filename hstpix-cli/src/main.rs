//! hstpix command-line interface.
//!
//! Inspects VSANS `.hst` event files and rebins them into time-sliced
//! panel images.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Parser, Subcommand, ValueEnum};
use hstpix_hst::{EventFile, FileHeader};
use hstpix_io::naming::detector_key;
use hstpix_io::{
    open_event_file, slice_manifests, write_slices, ImageFormat, MonitorScaling, SliceFileWriter,
    CONTAINER_SUFFIX,
};
use hstpix_rebin::{counts_vs_time, BinSpec, RebinConfig, Rebinner, TimeSlice, PANELS};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    HstpixIo(#[from] hstpix_io::Error),

    #[error("Rebin error: {0}")]
    Rebin(#[from] hstpix_rebin::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output image layout.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Comma-separated rows
    Csv,
    /// Little-endian binary with a rows/cols prefix
    Bin,
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ImageFormat::Csv,
            Format::Bin => ImageFormat::Binary,
        }
    }
}

/// A `START:STOP` time region in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Region {
    start: f64,
    stop: f64,
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (start, stop) = s
            .split_once(':')
            .ok_or_else(|| format!("expected START:STOP, got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad region bound {v:?}: {e}"))
        };
        Ok(Self {
            start: parse(start)?,
            stop: parse(stop)?,
        })
    }
}

/// VSANS event-mode file decoder and time rebinner.
#[derive(Parser)]
#[command(name = "hstpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an event file
    Info {
        /// Input .hst file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Whole-detector counts versus time
    Counts {
        /// Input .hst file
        input: PathBuf,

        /// First bin edge (seconds)
        #[arg(long, default_value = "0.0")]
        start: f64,

        /// Bin width (seconds)
        #[arg(long, default_value = "1.0")]
        step: f64,

        /// Output CSV path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebin events into time-sliced panel images
    Rebin {
        /// Input .hst file
        input: PathBuf,

        /// Number of evenly spaced time bins
        #[arg(
            long,
            conflicts_with_all = ["edges", "region"],
            required_unless_present_any = ["edges", "region"]
        )]
        bins: Option<usize>,

        /// Explicit bin edges in seconds, comma separated
        #[arg(long, value_delimiter = ',', num_args = 1.., conflicts_with = "region")]
        edges: Option<Vec<f64>>,

        /// Time region START:STOP in seconds, rebinned on its own (repeatable)
        #[arg(long)]
        region: Vec<Region>,

        /// Label inserted into output and container names
        #[arg(long)]
        label: Option<String>,

        /// Container the slices replace (defaults to <output>/<input stem>.nxs.ngv)
        #[arg(long)]
        container: Option<PathBuf>,

        /// Whole-run monitor count to scale per slice
        #[arg(long, requires = "count_time")]
        monitor: Option<u64>,

        /// Whole-run count time in seconds
        #[arg(long, requires = "monitor")]
        count_time: Option<f64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Image file format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Accumulate on all cores
        #[arg(long)]
        parallel: bool,

        /// JSON rebin configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// `info --json` payload.
#[derive(Serialize)]
struct FileInfo<'a> {
    path: &'a Path,
    header: &'a FileHeader,
    origin_seconds: f64,
    disabled_tubes: &'a [u8],
    events: usize,
    tick_range: Option<(u64, u64)>,
    duration_s: f64,
}

impl<'a> FileInfo<'a> {
    fn new(path: &'a Path, file: &'a EventFile) -> Self {
        Self {
            path,
            header: file.header(),
            origin_seconds: file.origin_timestamp().as_secs_f64(),
            disabled_tubes: file.disabled_tubes(),
            events: file.len(),
            tick_range: file.tick_range(),
            duration_s: file.duration_seconds(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn file_base(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "events".to_string(), |s| s.to_string_lossy().into_owned())
}

/// One single-bin slice per region, ordered by region start.
fn region_slices(
    rebinner: &Rebinner,
    file: &EventFile,
    regions: &[(f64, f64)],
) -> Result<Vec<TimeSlice>> {
    let slices = rebinner
        .rebin_regions(file, regions)?
        .iter()
        .map(|result| result.time_slice(0))
        .collect::<hstpix_rebin::Result<Vec<_>>>()?;
    Ok(slices)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input, json } => {
            let file = open_event_file(&input)?;
            let info = FileInfo::new(&input, &file);

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
                return Ok(());
            }

            let header = file.header();
            println!("File: {}", input.display());
            println!("Revision: {}", header.revision);
            println!("Data offset: {} bytes", header.data_offset);
            println!(
                "Origin: {}.{:09} s",
                header.origin_timestamp.seconds, header.origin_timestamp.nanoseconds
            );
            println!("Carriage: {}", header.detector_carriage_group);
            println!("HV reading: {}", header.hv_reading);
            println!("Timestamp frequency: {} Hz", header.timestamp_frequency);
            println!("Disabled tubes: {:?}", file.disabled_tubes());
            println!("Events: {}", file.len());
            if let Some((min, max)) = file.tick_range() {
                println!("Tick range: {} - {}", min, max);
                println!("Duration: {:.6} s", file.duration_seconds());
            }
        }

        Commands::Counts {
            input,
            start,
            step,
            output,
        } => {
            let file = open_event_file(&input)?;
            let histogram = counts_vs_time(file.events(), start, step)?;

            if let Some(path) = output {
                SliceFileWriter::create(&path)?.write_histogram_csv(&histogram)?;
                log::info!("wrote {} bins to {}", histogram.len(), path.display());
            } else {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "time_s,counts")?;
                for (time, count) in histogram.iter() {
                    writeln!(out, "{},{}", time, count)?;
                }
            }
        }

        Commands::Rebin {
            input,
            bins,
            edges,
            region,
            label,
            container,
            monitor,
            count_time,
            output,
            format,
            parallel,
            config,
        } => {
            let mut rebin_config = match config {
                Some(path) => RebinConfig::from_json_file(path)?,
                None => RebinConfig::new().with_parallel(false),
            };
            if parallel {
                rebin_config = rebin_config.with_parallel(true);
            }
            let rebinner = Rebinner::with_config(rebin_config);

            let file = open_event_file(&input)?;
            let start = Instant::now();
            let slices = if region.is_empty() {
                let spec = match (bins, edges) {
                    (Some(n), _) => BinSpec::Count(n),
                    (None, Some(edges)) => BinSpec::Edges(edges),
                    (None, None) => BinSpec::Count(1),
                };
                let result = rebinner.rebin(&file, &spec)?;
                println!(
                    "Outside bins: {} before, {} after",
                    result.below_range(),
                    result.above_range()
                );
                result.time_slices()?
            } else {
                let regions: Vec<_> = region.iter().map(|r| (r.start, r.stop)).collect();
                region_slices(&rebinner, &file, &regions)?
            };
            log::info!(
                "rebinned {} events into {} slices in {:.2?}",
                file.len(),
                slices.len(),
                start.elapsed()
            );

            let base = file_base(&input);
            let label = label.as_deref();
            let written = write_slices(&slices, &output, &base, label, format.into())?;

            let carriage = file.header().detector_carriage_group;
            let container =
                container.unwrap_or_else(|| output.join(format!("{base}{CONTAINER_SUFFIX}")));
            let scaling = monitor
                .zip(count_time)
                .map(|(monitor, count_time)| MonitorScaling {
                    monitor,
                    count_time,
                });
            let manifests = slice_manifests(&slices, carriage, &container, label, scaling)?;
            let manifest_path = output.join(match label {
                Some(label) => format!("{base}_{label}_manifest.json"),
                None => format!("{base}_manifest.json"),
            });
            SliceFileWriter::create(&manifest_path)?.write_manifests_json(&manifests)?;

            print!("{:<6} | {:<12} | {:<12}", "Slice", "Start (s)", "Stop (s)");
            for layout in &PANELS {
                print!(" | {:>11}", detector_key(carriage, layout.panel));
            }
            println!();
            println!("{:-<92}", "");
            for (i, slice) in slices.iter().enumerate() {
                print!(
                    "{:<6} | {:<12.6} | {:<12.6}",
                    i + 1,
                    slice.start(),
                    slice.stop()
                );
                for layout in &PANELS {
                    print!(" | {:>11}", slice.integrated_count(layout.panel));
                }
                println!();
            }
            println!(
                "Wrote {} files and {} to {}",
                written.len(),
                manifest_path.display(),
                output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstpix_hst::EventRecord;

    #[test]
    fn test_parse_region() {
        assert_eq!(
            "0.5:2".parse::<Region>().unwrap(),
            Region {
                start: 0.5,
                stop: 2.0
            }
        );
        assert!("0.5".parse::<Region>().is_err());
        assert!("a:1".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_flags() {
        let cli = Cli::try_parse_from([
            "hstpix", "rebin", "run.hst", "--region", "1:2", "--region", "0:1", "--label", "hot",
        ])
        .unwrap();
        let Commands::Rebin { region, label, .. } = cli.command else {
            panic!("expected rebin");
        };
        assert_eq!(region.len(), 2);
        assert_eq!(label.as_deref(), Some("hot"));

        assert!(
            Cli::try_parse_from(["hstpix", "rebin", "run.hst", "--bins", "3", "--region", "0:1"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["hstpix", "rebin", "run.hst"]).is_err());
        assert!(
            Cli::try_parse_from(["hstpix", "rebin", "run.hst", "--bins", "3", "--monitor", "9"])
                .is_err()
        );
    }

    #[test]
    fn test_region_slices_in_start_order() {
        let events = [
            EventRecord::new(0, 0, 5_000_000),
            EventRecord::new(0, 0, 15_000_000),
            EventRecord::new(0, 0, 16_000_000),
        ]
        .into_iter()
        .collect();
        let file = EventFile::from_parts(FileHeader::default(), Vec::new(), events).unwrap();

        let slices = region_slices(&Rebinner::new(), &file, &[(1.0, 2.0), (0.0, 1.0)]).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].total_count(), 1);
        assert_eq!(slices[1].total_count(), 2);
        assert!((slices[1].start() - 1.0).abs() < 1e-12);
    }
}
