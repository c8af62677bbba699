//! `tiffdiff`: absolute difference of two TIFF images.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, trace};
use xyz_ops::{diff_images, DiffOptions};

use crate::{GlobalArgs, Tool};

/// Command line of `tiffdiff`.
#[derive(Parser, Debug)]
#[command(name = "tiffdiff", version, about = "Write |input - input2| per sample to a TIFF image")]
pub struct DiffCli {
    /// First input TIFF
    pub input: PathBuf,

    /// Second input TIFF (same size, depth and channels)
    pub input2: PathBuf,

    /// Difference image
    pub output: PathBuf,

    /// Make each strip have no more than N rows
    #[arg(short = 'r', value_name = "N", default_value_t = 0)]
    pub rows_per_strip: u32,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Tool for DiffCli {
    const NAME: &'static str = "tiffdiff";

    fn global(&self) -> &GlobalArgs {
        &self.global
    }

    fn run(self) -> Result<()> {
        trace!(
            input = %self.input.display(),
            input2 = %self.input2.display(),
            output = %self.output.display(),
            "diff::run"
        );
        let mut first = super::open_input(&self.input)?;
        let mut second = super::open_input(&self.input2)?;
        let options = DiffOptions::default().with_rows_per_strip(self.rows_per_strip);

        let report = diff_images(&mut first, &mut second, &options, || {
            xyz_io::open_write(&self.output)
        })
        .with_context(|| {
            format!(
                "Failed to compare {} and {}",
                self.input.display(),
                self.input2.display()
            )
        })?;

        info!(
            rows = report.rows_processed,
            max_r = report.max_diff[0],
            max_g = report.max_diff[1],
            max_b = report.max_diff[2],
            differing_pixels = report.differing_pixels,
            output = %self.output.display(),
            "Difference written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cli = DiffCli::try_parse_from(["tiffdiff", "-r", "8", "a.tif", "b.tif", "d.tif"]).unwrap();
        assert_eq!(cli.rows_per_strip, 8);
        assert_eq!(cli.input2, PathBuf::from("b.tif"));
        assert!(DiffCli::try_parse_from(["tiffdiff", "a.tif", "b.tif"]).is_err());
    }
}
