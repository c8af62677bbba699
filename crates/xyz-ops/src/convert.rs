//! RGB to X'Y'Z' conversion pipeline.
//!
//! # State machine
//!
//! ```text
//! Init --> Validating --> PreparingOutput --> Processing --> Done
//!   |          |                |                 |
//!   +----------+----------------+-----------------+--> Failed(kind)
//! ```
//!
//! - `Init`: gamma exponents are checked.
//! - `Validating`: the input must be 8/16-bit contiguous RGB.
//! - `PreparingOutput`: the output is opened (only now) and given a
//!   16-bit 3-channel spec with description and software tags.
//! - `Processing`: rows are converted in batches. A row that cannot be read
//!   ends processing early without error; a write failure fails the run.
//!
//! # Batching
//!
//! Rows of a batch are read sequentially into per-row buffers, converted in
//! parallel with rayon, then written in row order. Tables and matrices are
//! shared read-only across workers.

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};
use xyz_color::{ColorMatrix, GammaStrategy, PowerCurve, RgbConverter, TransferCurve};
use xyz_core::{BitDepth, ImageSpec, Samples, Widening, RGB_CHANNELS};
use xyz_io::{default_rows_per_strip, IoResult, Normalizer, ScanlineSink, ScanlineSource};
use xyz_lut::{check_gamma, GammaLut};

use crate::validate::validate_rgb_input;
use crate::{FailureKind, OpsError, OpsResult};

/// Default decode exponent.
pub const DEFAULT_GAMMA_IN: f32 = 2.6;

/// Default encode exponent.
pub const DEFAULT_GAMMA_OUT: f32 = 1.0 / 2.6;

/// Rows converted per parallel batch.
pub const DEFAULT_BATCH_ROWS: usize = 64;

/// Program name written into the `Software` tag.
pub const SOFTWARE_NAME: &str = "toxyz";

/// `Software` tag value for converted images.
pub fn software_tag() -> String {
    format!("{SOFTWARE_NAME} (Version: {})", env!("CARGO_PKG_VERSION"))
}

/// Conversion settings.
///
/// # Example
///
/// ```rust
/// use xyz_color::{ColorMatrix, GammaStrategy};
/// use xyz_ops::ConvertOptions;
///
/// let opts = ConvertOptions::default()
///     .with_gamma_in(2.2)
///     .with_matrix(ColorMatrix::Stem)
///     .with_strategy(GammaStrategy::Power);
/// assert_eq!(opts.gamma_out, 1.0 / 2.6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Decode exponent applied to input codes.
    pub gamma_in: f32,
    /// Encode exponent applied to linear X'Y'Z'.
    pub gamma_out: f32,
    /// RGB to XYZ matrix.
    pub matrix: ColorMatrix,
    /// Table lookups or direct `powf`.
    pub strategy: GammaStrategy,
    /// Rows per output strip, 0 for the default strip size.
    pub rows_per_strip: u32,
    /// Rows converted per parallel batch.
    pub batch_rows: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            gamma_in: DEFAULT_GAMMA_IN,
            gamma_out: DEFAULT_GAMMA_OUT,
            matrix: ColorMatrix::default(),
            strategy: GammaStrategy::default(),
            rows_per_strip: 0,
            batch_rows: DEFAULT_BATCH_ROWS,
        }
    }
}

impl ConvertOptions {
    /// Sets the decode exponent.
    pub fn with_gamma_in(mut self, gamma: f32) -> Self {
        self.gamma_in = gamma;
        self
    }

    /// Sets the encode exponent.
    pub fn with_gamma_out(mut self, gamma: f32) -> Self {
        self.gamma_out = gamma;
        self
    }

    /// Sets the matrix.
    pub fn with_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets the transfer strategy.
    pub fn with_strategy(mut self, strategy: GammaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets rows per output strip (0 = default).
    pub fn with_rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = rows;
        self
    }

    /// Sets the parallel batch size (clamped to at least one row).
    pub fn with_batch_rows(mut self, rows: usize) -> Self {
        self.batch_rows = rows.max(1);
        self
    }

    /// `ImageDescription` text recorded in the output.
    ///
    /// ```rust
    /// use xyz_ops::ConvertOptions;
    ///
    /// assert_eq!(
    ///     ConvertOptions::default().description(),
    ///     "RGB->X'Y'Z' photometric interpretation with 2.60 input gamma, \
    ///      1/2.60 output gamma, Matrix used: SMPTE DC28.30 2006-02-24"
    /// );
    /// ```
    pub fn description(&self) -> String {
        format!(
            "RGB->X'Y'Z' photometric interpretation with {:4.2} input gamma, \
             1/{:4.2} output gamma, Matrix used: {}",
            self.gamma_in,
            1.0 / self.gamma_out,
            self.matrix.label()
        )
    }

    /// Spec of the converted image for a given input.
    ///
    /// Same dimensions, 16 bits, three RGB channels (extra input channels
    /// are dropped), contiguous, with description and software tags.
    pub fn output_spec(&self, input: &ImageSpec) -> ImageSpec {
        let spec = ImageSpec::rgb(input.width, input.height, BitDepth::U16);
        let rows = default_rows_per_strip(spec.scanline_bytes(), self.rows_per_strip);
        spec.with_rows_per_strip(rows)
            .with_description(self.description())
            .with_software(software_tag())
    }
}

/// Pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// Not started, or checking options.
    Init,
    /// Checking the input layout.
    Validating,
    /// Opening and configuring the output.
    PreparingOutput,
    /// Converting rows.
    Processing,
    /// Finished; possibly fewer rows than the declared height.
    Done,
    /// Aborted.
    Failed(FailureKind),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    /// Image width.
    pub width: u32,
    /// Declared image height.
    pub height: u32,
    /// Rows read, converted and written.
    pub rows_processed: u32,
    /// Matrix used.
    pub matrix: ColorMatrix,
    /// Transfer strategy used.
    pub strategy: GammaStrategy,
}

impl ConvertReport {
    /// True when the input ended before its declared height.
    pub fn is_truncated(&self) -> bool {
        self.rows_processed < self.height
    }
}

/// Drives one conversion through its states.
///
/// # Example
///
/// ```rust
/// use xyz_color::{ColorMatrix, GammaStrategy};
/// use xyz_io::{MemorySink, MemorySource};
/// use xyz_ops::{ConversionPipeline, ConversionState, ConvertOptions};
///
/// let mut src = MemorySource::rgb16(1, 1, vec![65535, 0, 0])?;
/// let mut sink = MemorySink::new();
/// let opts = ConvertOptions::default()
///     .with_matrix(ColorMatrix::Identity)
///     .with_strategy(GammaStrategy::Power);
/// let mut pipeline = ConversionPipeline::new(opts);
/// let report = pipeline.run(&mut src, || Ok(&mut sink))?;
/// assert_eq!(report.rows_processed, 1);
/// assert_eq!(pipeline.state(), ConversionState::Done);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConversionPipeline {
    options: ConvertOptions,
    state: ConversionState,
}

impl ConversionPipeline {
    /// Creates a pipeline in the `Init` state.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            state: ConversionState::Init,
        }
    }

    /// Settings in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Current state.
    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// Runs the conversion.
    ///
    /// `open_output` is called only after the input has been validated, so
    /// a rejected input never creates an output file.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidGamma`] for a non-positive exponent
    /// - [`OpsError::Validation`] for unsupported inputs
    /// - [`OpsError::OpenOutput`] if the output cannot be opened or configured
    /// - [`OpsError::Write`] if a row or the final flush fails
    pub fn run<S, K, F>(&mut self, source: &mut S, open_output: F) -> OpsResult<ConvertReport>
    where
        S: ScanlineSource + ?Sized,
        K: ScanlineSink,
        F: FnOnce() -> IoResult<K>,
    {
        self.state = ConversionState::Init;
        let result = self.execute(source, open_output);
        self.state = match &result {
            Ok(_) => ConversionState::Done,
            Err(err) => ConversionState::Failed(err.kind()),
        };
        result
    }

    fn execute<S, K, F>(&mut self, source: &mut S, open_output: F) -> OpsResult<ConvertReport>
    where
        S: ScanlineSource + ?Sized,
        K: ScanlineSink,
        F: FnOnce() -> IoResult<K>,
    {
        let opts = self.options.clone();
        trace!(
            gamma_in = opts.gamma_in,
            gamma_out = opts.gamma_out,
            matrix = opts.matrix.name(),
            strategy = %opts.strategy,
            "ConversionPipeline::run"
        );
        check_gamma(opts.gamma_in)?;
        check_gamma(opts.gamma_out)?;

        self.state = ConversionState::Validating;
        let input = source.spec().clone();
        let depth = validate_rgb_input(&input)?;
        debug!(
            width = input.width,
            height = input.height,
            bits = depth.bits(),
            samples_per_pixel = input.samples_per_pixel,
            "Input validated"
        );
        if input.samples_per_pixel as usize > RGB_CHANNELS {
            debug!(
                extra = input.samples_per_pixel as usize - RGB_CHANNELS,
                "Dropping extra channels"
            );
        }

        self.state = ConversionState::PreparingOutput;
        let out_spec = opts.output_spec(&input);
        debug!(rows_per_strip = ?out_spec.rows_per_strip, "Output prepared");
        let mut sink = open_output().map_err(OpsError::OpenOutput)?;
        sink.set_spec(out_spec).map_err(OpsError::OpenOutput)?;

        let converted = match opts.strategy {
            GammaStrategy::Lut => {
                let lut = GammaLut::build(opts.gamma_in, opts.gamma_out)?;
                self.state = ConversionState::Processing;
                let converter = RgbConverter::new(opts.matrix, lut);
                convert_rows(source, &mut sink, &converter, opts.batch_rows)
            }
            GammaStrategy::Power => {
                self.state = ConversionState::Processing;
                let converter =
                    RgbConverter::new(opts.matrix, PowerCurve::new(opts.gamma_in, opts.gamma_out));
                convert_rows(source, &mut sink, &converter, opts.batch_rows)
            }
        };
        let rows_processed = converted.map_err(|err| err.closing(&mut sink))?;

        sink.finish().map_err(OpsError::finish)?;

        let report = ConvertReport {
            width: input.width,
            height: input.height,
            rows_processed,
            matrix: opts.matrix,
            strategy: opts.strategy,
        };
        info!(
            rows = report.rows_processed,
            height = report.height,
            truncated = report.is_truncated(),
            "Conversion finished"
        );
        Ok(report)
    }
}

/// Converts every readable row; returns the number of rows written.
fn convert_rows<S, K, C>(
    source: &mut S,
    sink: &mut K,
    converter: &RgbConverter<C>,
    batch_rows: usize,
) -> OpsResult<u32>
where
    S: ScanlineSource + ?Sized,
    K: ScanlineSink + ?Sized,
    C: TransferCurve,
{
    let spec = source.spec();
    let (width, height) = (spec.width, spec.height);
    let samples_per_pixel = spec.samples_per_pixel as usize;
    let in_len = spec.samples_per_row();
    let out_len = width as usize * RGB_CHANNELS;

    let batch = batch_rows.clamp(1, height.max(1) as usize);
    let mut inputs: Vec<Vec<u16>> = (0..batch).map(|_| Vec::with_capacity(in_len)).collect();
    let mut outputs: Vec<Vec<u16>> = vec![vec![0; out_len]; batch];

    let mut row = 0u32;
    while row < height {
        let want = batch.min((height - row) as usize);
        let mut filled = 0usize;
        let mut ended = false;
        for buf in inputs.iter_mut().take(want) {
            let r = row + filled as u32;
            if let Err(err) = Normalizer::normalize_with(Widening::Shift, source, r, buf) {
                warn!(row = r, height, error = %err, "Input ended before declared height");
                ended = true;
                break;
            }
            filled += 1;
        }

        inputs[..filled]
            .par_iter()
            .zip(outputs[..filled].par_iter_mut())
            .try_for_each(|(input, output)| converter.convert_row(input, samples_per_pixel, output))?;

        for (i, output) in outputs[..filled].iter().enumerate() {
            let r = row + i as u32;
            sink.write_scanline(r, Samples::U16(output))
                .map_err(|e| OpsError::write(r, e))?;
        }
        row += filled as u32;
        trace!(rows = row, "Batch written");

        if ended {
            break;
        }
    }
    Ok(row)
}
