//! `tiffhist`: level histogram printed to stdout.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, trace};
use xyz_ops::Histogram;

use crate::{GlobalArgs, Tool};

/// Command line of `tiffhist`.
#[derive(Parser, Debug)]
#[command(name = "tiffhist", version, about = "Print the per-channel level histogram of a TIFF image")]
#[command(after_help = "Each line is: level r_count g_count b_count. 16-bit levels are divided by 16.")]
pub struct HistCli {
    /// Input TIFF (8 or 16 bits, at least 3 samples per pixel)
    pub input: PathBuf,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Tool for HistCli {
    const NAME: &'static str = "tiffhist";

    fn global(&self) -> &GlobalArgs {
        &self.global
    }

    fn run(self) -> Result<()> {
        trace!(input = %self.input.display(), "hist::run");
        let mut input = super::open_input(&self.input)?;
        let hist = Histogram::compute(&mut input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;

        let stdout = io::stdout();
        hist.write_to(BufWriter::new(stdout.lock()))
            .context("Failed to write histogram")?;

        info!(
            rows = hist.rows_processed(),
            levels = hist.levels(),
            "Histogram written"
        );
        Ok(())
    }
}
