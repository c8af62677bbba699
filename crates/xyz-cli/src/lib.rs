//! # xyz-cli
//!
//! Command-line front ends for the xyz-rs crates:
//!
//! | Binary | Purpose |
//! |--------|---------|
//! | `toxyz` | RGB TIFF to 16-bit X'Y'Z' TIFF |
//! | `tiffdiff` | `|a - b|` per sample of two TIFF images |
//! | `tiffhist` | per-channel level histogram as text on stdout |
//!
//! Every binary goes through [`launch`], which parses arguments, installs
//! logging, sizes the rayon pool and maps failures to an [`ExitStatus`].
//!
//! # Logging
//!
//! Logs go to stderr. `RUST_LOG` takes precedence; otherwise the level is
//! `warn`, raised by each `--verbose`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
mod exit;
mod logging;

use std::ffi::OsString;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser};

pub use exit::{status_of, ExitStatus};
pub use logging::init_logging;

/// Options shared by every tool.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Increase log detail (repeat for more)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,
}

/// A parsed command line that can be executed.
pub trait Tool: Parser {
    /// Program name used in error messages.
    const NAME: &'static str;

    /// Shared options.
    fn global(&self) -> &GlobalArgs;

    /// Runs the tool.
    fn run(self) -> Result<()>;
}

/// Sizes the global rayon pool; 0 keeps rayon's default.
pub fn configure_threads(threads: usize) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }
    Ok(())
}

/// Runs `T` with the process arguments and returns its exit code.
pub fn launch<T: Tool>() -> i32 {
    launch_from::<T, _, _>(std::env::args_os())
}

/// Runs `T` with explicit arguments (first item is the program name).
pub fn launch_from<T, I, S>(args: I) -> i32
where
    T: Tool,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let tool = match T::try_parse_from(args) {
        Ok(tool) => tool,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Success.code(),
                _ => ExitStatus::Usage.code(),
            };
        }
    };

    init_logging(tool.global().verbose);
    if let Err(err) = configure_threads(tool.global().threads) {
        eprintln!("{}: {err:#}", T::NAME);
        return ExitStatus::Usage.code();
    }

    match tool.run() {
        Ok(()) => ExitStatus::Success.code(),
        Err(err) => {
            eprintln!("{}: {err:#}", T::NAME);
            status_of(&err).code()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::path::Path;

    use xyz_core::{BitDepth, ImageSpec, Samples};
    use xyz_io::{ScanlineSink, ScanlineSource, TiffSink, TiffSource};

    use super::*;
    use crate::commands::convert::ConvertCli;
    use crate::commands::diff::DiffCli;
    use crate::commands::hist::HistCli;

    fn write_rgb16(path: &Path, width: u32, height: u32, data: &[u16]) {
        let mut sink = TiffSink::create(path).unwrap();
        sink.set_spec(ImageSpec::rgb(width, height, BitDepth::U16)).unwrap();
        for (row, line) in data.chunks(width as usize * 3).enumerate() {
            sink.write_scanline(row as u32, Samples::U16(line)).unwrap();
        }
        sink.finish().unwrap();
    }

    fn read_rgb16(path: &Path) -> Vec<u16> {
        let mut src = TiffSource::open(path).unwrap();
        let height = src.spec().height;
        let mut out = Vec::new();
        for row in 0..height {
            match src.read_scanline(row).unwrap() {
                Samples::U16(line) => out.extend_from_slice(line),
                other => panic!("unexpected samples {other:?}"),
            }
        }
        out
    }

    const PIXELS: [u16; 12] = [0, 1000, 65535, 32768, 16384, 8192, 4096, 2048, 1024, 65535, 0, 1];

    #[test]
    fn test_help_and_version_succeed() {
        assert_eq!(launch_from::<ConvertCli, _, _>(["toxyz", "--help"]), 0);
        assert_eq!(launch_from::<ConvertCli, _, _>(["toxyz", "-v"]), 0);
        assert_eq!(launch_from::<HistCli, _, _>(["tiffhist", "--version"]), 0);
    }

    #[test]
    fn test_usage_error() {
        assert_eq!(launch_from::<ConvertCli, _, _>(["toxyz", "only-one.tif"]), -1);
        assert_eq!(launch_from::<DiffCli, _, _>(["tiffdiff", "a.tif"]), -1);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.tif");
        let output = dir.path().join("out.tif");
        let code = launch_from::<ConvertCli, _, _>([
            OsStr::new("toxyz"),
            input.as_os_str(),
            output.as_os_str(),
        ]);
        assert_eq!(code, -6);
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_gamma_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.tif");
        let output = dir.path().join("out.tif");
        write_rgb16(&input, 2, 2, &PIXELS);
        let code = launch_from::<ConvertCli, _, _>([
            OsStr::new("toxyz"),
            OsStr::new("-g"),
            OsStr::new("0"),
            input.as_os_str(),
            output.as_os_str(),
        ]);
        assert_eq!(code, -1);
        assert!(!output.exists());
    }

    #[test]
    fn test_identity_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.tif");
        let output = dir.path().join("out.tif");
        write_rgb16(&input, 2, 2, &PIXELS);
        let code = launch_from::<ConvertCli, _, _>([
            OsStr::new("toxyz"),
            OsStr::new("-1"),
            OsStr::new("-g"),
            OsStr::new("1"),
            OsStr::new("--gamma-out"),
            OsStr::new("1"),
            input.as_os_str(),
            output.as_os_str(),
        ]);
        assert_eq!(code, 0);
        assert_eq!(read_rgb16(&output), PIXELS);
    }

    #[test]
    fn test_diff_and_hist() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.tif");
        let b = dir.path().join("b.tif");
        let wide = dir.path().join("wide.tif");
        let out = dir.path().join("d.tif");
        write_rgb16(&a, 2, 2, &PIXELS);
        let mut shifted = PIXELS;
        shifted[0] = 10;
        write_rgb16(&b, 2, 2, &shifted);
        write_rgb16(&wide, 4, 1, &PIXELS);

        let code = launch_from::<DiffCli, _, _>([
            OsStr::new("tiffdiff"),
            a.as_os_str(),
            b.as_os_str(),
            out.as_os_str(),
        ]);
        assert_eq!(code, 0);
        let diff = read_rgb16(&out);
        assert_eq!(diff[0], 10);
        assert!(diff[1..].iter().all(|&v| v == 0));

        let mismatch = dir.path().join("m.tif");
        let code = launch_from::<DiffCli, _, _>([
            OsStr::new("tiffdiff"),
            a.as_os_str(),
            wide.as_os_str(),
            mismatch.as_os_str(),
        ]);
        assert_eq!(code, -7);
        assert!(!mismatch.exists());

        assert_eq!(
            launch_from::<HistCli, _, _>([OsStr::new("tiffhist"), a.as_os_str()]),
            0
        );
    }
}
