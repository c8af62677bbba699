//! Strip-based TIFF scanline reader and streaming writer.
//!
//! # Reading
//!
//! [`TiffSource`] reads the baseline tags up front and decodes one strip at
//! a time through the `tiff` crate's `read_chunk()` API, caching the strip
//! that holds the most recently requested row. Rows are expected in
//! ascending order, so each strip is decoded once.
//!
//! # Writing
//!
//! [`TiffSink`] creates the file immediately. Once the spec is set, a
//! writer thread owns the `tiff` encoder, writes the tags, and encodes
//! uncompressed RGB strips as the sink hands them over. The sink only
//! buffers the strip currently being filled, so rows must arrive in
//! ascending strip order.
//!
//! [`finish`](ScanlineSink::finish) zero-fills the strips that were never
//! reached and finalizes the file. Dropping an unfinished sink does the
//! same, so rows written before a failure stay readable.
//!
//! # Example
//!
//! ```rust,no_run
//! use xyz_io::{ScanlineSink, ScanlineSource, TiffSink, TiffSource};
//!
//! let mut src = TiffSource::open("in.tif")?;
//! let mut sink = TiffSink::create("copy.tif")?;
//! sink.set_spec(src.spec().clone())?;
//! for row in 0..src.spec().height {
//!     let line = src.read_scanline(row)?;
//!     sink.write_scanline(row, line)?;
//! }
//! sink.finish()?;
//! # Ok::<(), xyz_io::IoError>(())
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::{debug, trace, warn};
use xyz_core::{BitDepth, ImageSpec, Photometric, PlanarConfig, SampleBuf, Samples};

use crate::strip::StripLayout;
use crate::{IoError, IoResult, ScanlineSink, ScanlineSource};

fn bad_format(err: tiff::TiffError) -> IoError {
    IoError::BadFormat(err.to_string())
}

fn write_failed(err: tiff::TiffError) -> IoError {
    IoError::WriteFailed(err.to_string())
}

/// First element of a scalar or list tag value.
fn first_u16(tag: Tag, value: Value) -> IoResult<u16> {
    let value = match value {
        Value::List(list) => list
            .into_iter()
            .next()
            .ok_or_else(|| IoError::InvalidMetadata(format!("{tag:?} is empty")))?,
        other => other,
    };
    value
        .into_u16()
        .map_err(|e| IoError::InvalidMetadata(format!("{tag:?}: {e}")))
}

fn find_u16<R>(decoder: &mut Decoder<R>, tag: Tag) -> IoResult<Option<u16>>
where
    R: io::Read + io::Seek,
{
    decoder
        .find_tag(tag)
        .map_err(bad_format)?
        .map(|value| first_u16(tag, value))
        .transpose()
}

fn find_string<R>(decoder: &mut Decoder<R>, tag: Tag) -> IoResult<Option<String>>
where
    R: io::Read + io::Seek,
{
    decoder
        .find_tag(tag)
        .map_err(bad_format)?
        .map(|value| {
            value
                .into_string()
                .map_err(|e| IoError::InvalidMetadata(format!("{tag:?}: {e}")))
        })
        .transpose()
}

/// Scanline reader over a strip-organized TIFF file.
pub struct TiffSource {
    path: PathBuf,
    spec: ImageSpec,
    decoder: Decoder<BufReader<File>>,
    strip_rows: u32,
    strip: Option<(u32, SampleBuf)>,
}

impl TiffSource {
    /// Opens a TIFF file and reads its layout tags.
    ///
    /// # Errors
    ///
    /// - [`IoError::NotFound`] if the file does not exist
    /// - [`IoError::BadFormat`] if it is not a readable strip TIFF
    pub fn open<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IoError::NotFound(path.clone()),
            _ => IoError::Io(e),
        })?;

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| IoError::BadFormat(format!("{}: {e}", path.display())))?;
        let (width, height) = decoder.dimensions().map_err(bad_format)?;

        let (chunk_w, chunk_h) = decoder.chunk_dimensions();
        if chunk_w < width {
            return Err(IoError::BadFormat(format!(
                "{}: tiled TIFF ({chunk_w}x{chunk_h} tiles) is not supported",
                path.display()
            )));
        }

        let bits_per_sample = find_u16(&mut decoder, Tag::BitsPerSample)?.unwrap_or(1);
        let samples_per_pixel = find_u16(&mut decoder, Tag::SamplesPerPixel)?.unwrap_or(1);
        let photometric = find_u16(&mut decoder, Tag::PhotometricInterpretation)?
            .map(Photometric::from_u16)
            .ok_or_else(|| {
                IoError::BadFormat(format!("{}: missing photometric tag", path.display()))
            })?;
        let planar = find_u16(&mut decoder, Tag::PlanarConfiguration)?
            .map(PlanarConfig::from_u16)
            .unwrap_or_default();
        let description = find_string(&mut decoder, Tag::ImageDescription)?;
        let software = find_string(&mut decoder, Tag::Software)?;
        let strip_rows = chunk_h.clamp(1, height.max(1));

        let spec = ImageSpec {
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            photometric,
            planar,
            rows_per_strip: Some(strip_rows),
            description,
            software,
        };

        debug!(
            path = %path.display(),
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            photometric = ?photometric,
            planar = ?planar,
            strip_rows,
            "Opened TIFF"
        );

        Ok(Self {
            path,
            spec,
            decoder,
            strip_rows,
            strip: None,
        })
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows stored per strip in the file.
    pub fn strip_rows(&self) -> u32 {
        self.strip_rows
    }

    fn load_strip(&mut self, strip: u32, row: u32) -> IoResult<SampleBuf> {
        let data = self
            .decoder
            .read_chunk(strip)
            .map_err(|e| IoError::end_of_data(row, format!("strip {strip}: {e}")))?;
        let buf = match data {
            DecodingResult::U8(v) => SampleBuf::U8(v),
            DecodingResult::U16(v) => SampleBuf::U16(v),
            _ => return Err(IoError::UnsupportedBitDepth(self.spec.bits_per_sample)),
        };
        trace!(strip, samples = buf.len(), "Decoded strip");
        Ok(buf)
    }
}

impl std::fmt::Debug for TiffSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiffSource")
            .field("path", &self.path)
            .field("spec", &self.spec)
            .field("strip_rows", &self.strip_rows)
            .finish()
    }
}

impl ScanlineSource for TiffSource {
    fn spec(&self) -> &ImageSpec {
        &self.spec
    }

    fn read_scanline(&mut self, row: u32) -> IoResult<Samples<'_>> {
        if row >= self.spec.height {
            return Err(IoError::end_of_data(row, "past last row"));
        }
        if self.spec.planar != PlanarConfig::Contiguous {
            return Err(IoError::end_of_data(row, "planar layout has no interleaved rows"));
        }

        let strip = row / self.strip_rows;
        if !matches!(&self.strip, Some((cached, _)) if *cached == strip) {
            self.strip = None;
            let buf = self.load_strip(strip, row)?;
            self.strip = Some((strip, buf));
        }
        let Some((_, buf)) = &self.strip else {
            return Err(IoError::end_of_data(row, "strip not loaded"));
        };

        let per_row = self.spec.samples_per_row();
        let start = (row - strip * self.strip_rows) as usize * per_row;
        let end = start + per_row;
        if end > buf.len() {
            return Err(IoError::end_of_data(
                row,
                format!("strip {strip} holds {} samples, need {end}", buf.len()),
            ));
        }
        Ok(buf.as_samples().slice(start..end))
    }
}

/// One strip on its way to the writer thread. `len` trims the short last
/// strip.
struct Strip {
    data: SampleBuf,
    len: usize,
}

fn clear(buf: &mut SampleBuf) {
    match buf {
        SampleBuf::U8(v) => v.fill(0),
        SampleBuf::U16(v) => v.fill(0),
    }
}

/// Body of the writer thread: tags first, then strips in arrival order.
///
/// Returns the number of strips encoded.
fn encode_strips(
    file: File,
    spec: &ImageSpec,
    rows_per_strip: u32,
    queue: Receiver<Strip>,
    recycle: Sender<SampleBuf>,
) -> IoResult<u32> {
    let mut encoder = TiffEncoder::new(file).map_err(write_failed)?;
    let mut strips = 0u32;

    macro_rules! write_rgb {
        ($color:ty, $variant:ident) => {{
            let mut image = encoder
                .new_image::<$color>(spec.width, spec.height)
                .map_err(write_failed)?;
            image.rows_per_strip(rows_per_strip).map_err(write_failed)?;
            if let Some(text) = &spec.description {
                image
                    .encoder()
                    .write_tag(Tag::ImageDescription, text.as_str())
                    .map_err(write_failed)?;
            }
            if let Some(text) = &spec.software {
                image
                    .encoder()
                    .write_tag(Tag::Software, text.as_str())
                    .map_err(write_failed)?;
            }
            for Strip { data, len } in queue {
                let SampleBuf::$variant(samples) = &data else {
                    return Err(IoError::WriteFailed(format!(
                        "strip {strips}: {}-bit samples for a {}-bit image",
                        data.bit_depth().bits(),
                        spec.bits_per_sample
                    )));
                };
                image.write_strip(&samples[..len]).map_err(write_failed)?;
                trace!(strip = strips, samples = len, "Encoded strip");
                strips += 1;
                // The sink may already be gone; the buffer is then just dropped.
                let _ = recycle.send(data);
            }
            image.finish().map_err(write_failed)?;
        }};
    }

    match spec.bit_depth()? {
        BitDepth::U8 => write_rgb!(colortype::RGB8, U8),
        BitDepth::U16 => write_rgb!(colortype::RGB16, U16),
    }
    Ok(strips)
}

/// Sink-side half of an open output: the strip being filled and the
/// channel to the writer thread.
#[derive(Debug)]
struct StripWriter {
    spec: ImageSpec,
    layout: StripLayout,
    current: u32,
    buf: SampleBuf,
    rows_written: u32,
    strips: Option<SyncSender<Strip>>,
    recycled: Receiver<SampleBuf>,
    thread: Option<JoinHandle<IoResult<u32>>>,
}

impl StripWriter {
    fn start(file: File, spec: ImageSpec) -> IoResult<Self> {
        spec.check_dimensions()?;
        let depth = spec.bit_depth()?;
        let layout = StripLayout::new(&spec);

        let (strips, queue) = mpsc::sync_channel::<Strip>(1);
        let (recycle, recycled) = mpsc::channel::<SampleBuf>();
        let thread_spec = spec.clone();
        let rows_per_strip = layout.rows_per_strip();
        let thread = thread::Builder::new()
            .name("tiff-writer".into())
            .spawn(move || encode_strips(file, &thread_spec, rows_per_strip, queue, recycle))?;

        debug!(
            width = spec.width,
            height = spec.height,
            bits = spec.bits_per_sample,
            rows_per_strip,
            strips = layout.strip_count(),
            "Started TIFF writer"
        );

        Ok(Self {
            buf: SampleBuf::zeroed(depth, layout.full_strip_samples()),
            spec,
            layout,
            current: 0,
            rows_written: 0,
            strips: Some(strips),
            recycled,
            thread: Some(thread),
        })
    }

    fn write(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        if row >= self.spec.height {
            return Err(IoError::WriteFailed(format!(
                "row {row} out of range (height {})",
                self.spec.height
            )));
        }
        let per_row = self.layout.samples_per_row();
        if samples.len() != per_row {
            return Err(IoError::WriteFailed(format!(
                "row {row}: expected {per_row} samples, got {}",
                samples.len()
            )));
        }
        let strip = self.layout.strip_of(row);
        if strip < self.current {
            return Err(IoError::WriteFailed(format!(
                "row {row}: strip {strip} was already written"
            )));
        }
        while self.current < strip {
            self.flush()?;
        }
        if !self.buf.copy_from(self.layout.offset_in_strip(row), samples) {
            return Err(IoError::WriteFailed(format!(
                "row {row}: {}-bit samples written to {}-bit image",
                samples.bit_depth().bits(),
                self.spec.bits_per_sample
            )));
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Hands the current strip to the writer thread and starts a zeroed one.
    fn flush(&mut self) -> IoResult<()> {
        let len = self.layout.strip_samples(self.current);
        let next = match self.recycled.try_recv() {
            Ok(mut buf) => {
                clear(&mut buf);
                buf
            }
            Err(_) => SampleBuf::zeroed(self.buf.bit_depth(), self.buf.len()),
        };
        let data = std::mem::replace(&mut self.buf, next);
        let sender = self
            .strips
            .as_ref()
            .ok_or_else(|| IoError::WriteFailed("output already finished".into()))?;
        if sender.send(Strip { data, len }).is_err() {
            // Receiver gone: the thread stopped on an error it can report.
            return Err(self
                .join()
                .err()
                .unwrap_or_else(|| IoError::WriteFailed("TIFF writer stopped early".into())));
        }
        self.current += 1;
        Ok(())
    }

    /// Flushes every remaining strip and waits for the file to be finalized.
    fn close(&mut self) -> IoResult<u32> {
        while self.current < self.layout.strip_count() {
            self.flush()?;
        }
        self.join()
    }

    fn join(&mut self) -> IoResult<u32> {
        self.strips = None;
        let thread = self
            .thread
            .take()
            .ok_or_else(|| IoError::WriteFailed("output already finished".into()))?;
        thread
            .join()
            .map_err(|_| IoError::WriteFailed("TIFF writer thread panicked".into()))?
    }
}

/// Streaming RGB TIFF writer.
#[derive(Debug)]
pub struct TiffSink {
    path: PathBuf,
    file: Option<File>,
    writer: Option<StripWriter>,
    finished: bool,
}

impl TiffSink {
    /// Creates (or truncates) the output file.
    ///
    /// # Errors
    ///
    /// [`IoError::Io`] if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file: Some(file),
            writer: None,
            finished: false,
        })
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanlineSink for TiffSink {
    fn set_spec(&mut self, spec: ImageSpec) -> IoResult<()> {
        if self.writer.is_some() {
            return Err(IoError::WriteFailed("output spec already set".into()));
        }
        if spec.samples_per_pixel as usize != xyz_core::RGB_CHANNELS
            || spec.photometric != Photometric::Rgb
            || spec.planar != PlanarConfig::Contiguous
        {
            return Err(IoError::InvalidMetadata(format!(
                "TIFF output must be contiguous 3-channel RGB, got {} samples, {:?}, {:?}",
                spec.samples_per_pixel, spec.photometric, spec.planar
            )));
        }
        spec.check_dimensions()?;
        spec.bit_depth()?;
        let file = self
            .file
            .take()
            .ok_or_else(|| IoError::WriteFailed("output already finished".into()))?;
        self.writer = Some(StripWriter::start(file, spec)?);
        Ok(())
    }

    fn spec(&self) -> Option<&ImageSpec> {
        self.writer.as_ref().map(|w| &w.spec)
    }

    fn write_scanline(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        if self.finished {
            return Err(IoError::WriteFailed("output already finished".into()));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| IoError::WriteFailed("output spec not set".into()))?
            .write(row, samples)
    }

    fn finish(&mut self) -> IoResult<()> {
        if self.finished {
            return Err(IoError::WriteFailed("output already finished".into()));
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| IoError::WriteFailed("output spec not set".into()))?;
        self.finished = true;
        let strips = writer.close()?;
        debug!(
            path = %self.path.display(),
            strips,
            rows_written = writer.rows_written,
            "Finalized TIFF"
        );
        Ok(())
    }
}

impl Drop for TiffSink {
    fn drop(&mut self) {
        if self.finished || self.writer.is_none() {
            return;
        }
        if let Err(err) = self.finish() {
            warn!(path = %self.path.display(), error = %err, "Could not finalize TIFF");
        }
    }
}
