//! `toxyz`: RGB to X'Y'Z' conversion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, trace};
use xyz_color::{ColorMatrix, GammaStrategy};
use xyz_ops::{ConversionPipeline, ConvertOptions, DEFAULT_GAMMA_IN, DEFAULT_GAMMA_OUT};

use crate::{GlobalArgs, Tool};

/// Command line of `toxyz`.
#[derive(Parser, Debug)]
#[command(name = "toxyz", version, about = "Convert an RGB TIFF image to X'Y'Z'")]
#[command(disable_version_flag = true)]
#[command(after_help = "The DC28.30 matrix (2006-02-24) is used by default.")]
pub struct ConvertCli {
    /// Input RGB TIFF (8 or 16 bits per sample)
    pub input: PathBuf,

    /// Output X'Y'Z' TIFF (16 bits per sample)
    pub output: PathBuf,

    /// Make each strip have no more than N rows
    #[arg(short = 'r', value_name = "N", default_value_t = 0)]
    pub rows_per_strip: u32,

    /// Input gamma
    #[arg(short = 'g', value_name = "GAMMA", default_value_t = DEFAULT_GAMMA_IN, allow_hyphen_values = true)]
    pub gamma: f32,

    /// Output gamma exponent [default: 1/2.6]
    #[arg(long = "gamma-out", value_name = "EXP", allow_hyphen_values = true)]
    pub gamma_out: Option<f32>,

    /// Use an identity matrix (1:1)
    #[arg(short = '1', overrides_with = "stem")]
    pub identity: bool,

    /// Use the StEM matrix
    #[arg(short = 'S', overrides_with = "identity")]
    pub stem: bool,

    /// Use the power function instead of lookup tables (slow)
    #[arg(short = 'p')]
    pub power: bool,

    /// Print version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl ConvertCli {
    /// Selected matrix; the last of `-1` / `-S` wins.
    pub fn matrix(&self) -> ColorMatrix {
        if self.stem {
            ColorMatrix::Stem
        } else if self.identity {
            ColorMatrix::Identity
        } else {
            ColorMatrix::Smpte
        }
    }

    /// Pipeline options from the flags.
    pub fn options(&self) -> ConvertOptions {
        let strategy = if self.power {
            GammaStrategy::Power
        } else {
            GammaStrategy::Lut
        };
        ConvertOptions::default()
            .with_gamma_in(self.gamma)
            .with_gamma_out(self.gamma_out.unwrap_or(DEFAULT_GAMMA_OUT))
            .with_matrix(self.matrix())
            .with_strategy(strategy)
            .with_rows_per_strip(self.rows_per_strip)
    }
}

impl Tool for ConvertCli {
    const NAME: &'static str = "toxyz";

    fn global(&self) -> &GlobalArgs {
        &self.global
    }

    fn run(self) -> Result<()> {
        trace!(input = %self.input.display(), output = %self.output.display(), "convert::run");
        let options = self.options();
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            matrix = %options.matrix,
            strategy = %options.strategy,
            gamma_in = options.gamma_in,
            gamma_out = options.gamma_out,
            "Converting image"
        );

        let mut input = super::open_input(&self.input)?;
        let mut pipeline = ConversionPipeline::new(options);
        let report = pipeline
            .run(&mut input, || xyz_io::open_write(&self.output))
            .with_context(|| {
                format!(
                    "Failed to convert {} -> {}",
                    self.input.display(),
                    self.output.display()
                )
            })?;

        info!(
            rows = report.rows_processed,
            height = report.height,
            output = %self.output.display(),
            "Done"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ConvertCli {
        ConvertCli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["toxyz", "in.tif", "out.tif"]);
        assert_eq!(cli.input, PathBuf::from("in.tif"));
        assert_eq!(cli.output, PathBuf::from("out.tif"));
        assert_eq!(cli.options(), ConvertOptions::default());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["toxyz", "-g", "2.2", "-S", "-p", "-r", "16", "a.tif", "b.tif"]);
        let opts = cli.options();
        assert_eq!(opts.gamma_in, 2.2);
        assert_eq!(opts.gamma_out, DEFAULT_GAMMA_OUT);
        assert_eq!(opts.matrix, ColorMatrix::Stem);
        assert_eq!(opts.strategy, GammaStrategy::Power);
        assert_eq!(opts.rows_per_strip, 16);
    }

    #[test]
    fn test_gamma_out_and_identity() {
        let cli = parse(&["toxyz", "-1", "--gamma-out", "0.5", "a.tif", "b.tif"]);
        assert_eq!(cli.matrix(), ColorMatrix::Identity);
        assert_eq!(cli.options().gamma_out, 0.5);
    }

    #[test]
    fn test_last_matrix_flag_wins() {
        assert_eq!(parse(&["toxyz", "-1", "-S", "a", "b"]).matrix(), ColorMatrix::Stem);
        assert_eq!(parse(&["toxyz", "-S", "-1", "a", "b"]).matrix(), ColorMatrix::Identity);
    }

    #[test]
    fn test_global_args() {
        let cli = parse(&["toxyz", "--verbose", "--verbose", "-j", "4", "a", "b"]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.threads, 4);
    }

    #[test]
    fn test_usage_errors() {
        assert!(ConvertCli::try_parse_from(["toxyz", "only-input.tif"]).is_err());
        assert!(ConvertCli::try_parse_from(["toxyz", "-g", "abc", "a", "b"]).is_err());
        assert!(ConvertCli::try_parse_from(["toxyz", "-x", "a", "b"]).is_err());
    }

    #[test]
    fn test_version_flag() {
        let err = ConvertCli::try_parse_from(["toxyz", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
