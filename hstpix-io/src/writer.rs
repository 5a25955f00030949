//! File writers for rebinned data.

use crate::manifest::SliceManifest;
use crate::naming::slice_name;
use crate::{Error, Result};
use hstpix_rebin::{SliceSummary, TimeHistogram, TimeSlice};
use ndarray::Array2;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// On-disk layout for panel images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// One CSV row per image row.
    #[default]
    Csv,
    /// Little-endian `u32` rows, `u32` cols, then `u64` counts row-major.
    Binary,
}

impl ImageFormat {
    /// File extension including the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Csv => ".csv",
            ImageFormat::Binary => ".bin",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(ImageFormat::Csv),
            "bin" | "binary" => Ok(ImageFormat::Binary),
            other => Err(Error::InvalidOutput(format!("unknown image format {other:?}"))),
        }
    }
}

/// Writer for images and histograms.
pub struct SliceFileWriter {
    writer: BufWriter<File>,
}

impl SliceFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes an image in the given format.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_image(&mut self, image: &Array2<u64>, format: ImageFormat) -> Result<()> {
        match format {
            ImageFormat::Csv => self.write_image_csv(image),
            ImageFormat::Binary => self.write_image_binary(image),
        }
    }

    /// Writes an image as CSV, one line per row.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_image_csv(&mut self, image: &Array2<u64>) -> Result<()> {
        for row in image.rows() {
            let line = row
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            writeln!(self.writer, "{line}")?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Writes an image as binary data.
    ///
    /// Format: u32 (rows) + u32 (cols) + rows * cols * u64, little-endian
    ///
    /// # Errors
    /// Returns an error if writing fails or a dimension exceeds `u32`.
    pub fn write_image_binary(&mut self, image: &Array2<u64>) -> Result<()> {
        let (rows, cols) = image.dim();
        for dim in [rows, cols] {
            let dim = u32::try_from(dim)
                .map_err(|_| Error::InvalidOutput(format!("image dimension {dim} too large")))?;
            self.writer.write_all(&dim.to_le_bytes())?;
        }
        for &count in image {
            self.writer.write_all(&count.to_le_bytes())?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Writes a coarse time histogram as CSV.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_histogram_csv(&mut self, histogram: &TimeHistogram) -> Result<()> {
        writeln!(self.writer, "time_s,counts")?;

        for (time, count) in histogram.iter() {
            writeln!(self.writer, "{time},{count}")?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Writes slice summaries as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write_summaries_json(&mut self, summaries: &[SliceSummary]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, summaries)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes container manifests as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write_manifests_json(&mut self, manifests: &[SliceManifest]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, manifests)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one image file per slice per panel into `dir`.
///
/// Slices are numbered by position, so single-bin region results can be
/// written together. Files are named `{base}_{panel}_{i+1}_of_{n}.{ext}`,
/// or `{base}_{label}_{panel}_{i+1}_of_{n}.{ext}` with a label. Returns the
/// paths written, slice-major.
///
/// # Errors
/// Returns an error if the directory cannot be created or a file fails to
/// write.
pub fn write_slices(
    slices: &[TimeSlice],
    dir: &Path,
    base: &str,
    label: Option<&str>,
    format: ImageFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let count = slices.len();
    let mut written = Vec::with_capacity(count * 4);

    for (i, slice) in slices.iter().enumerate() {
        for (panel, image) in slice.images() {
            let tag = match label {
                Some(label) => format!("{label}_{}", panel.name()),
                None => panel.name().to_string(),
            };
            let name = slice_name(base, Some(&tag), i, count, format.extension());
            let path = dir.join(name);
            SliceFileWriter::create(&path)?.write_image(image, format)?;
            written.push(path);
        }
    }

    log::debug!("wrote {} slice images to {}", written.len(), dir.display());
    Ok(written)
}
