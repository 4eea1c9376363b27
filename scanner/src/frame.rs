//! Frame sources and QR decoding capabilities.

use std::io::BufRead;

/// One captured image. `luma` is row-major 8-bit grayscale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub luma: Vec<u8>,
}

impl Frame {
    /// A single-row frame carrying `text` as its pixel bytes.
    ///
    /// Used where the "camera" is a text stream and the decoder is
    /// [`TextDecoder`].
    pub fn text(text: &str) -> Self {
        Self {
            width: u32::try_from(text.len()).unwrap_or(u32::MAX),
            height: 1,
            luma: text.as_bytes().to_vec(),
        }
    }
}

/// A lazy sequence of frames. `None` means the source is closed.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Maps a frame to zero or one decoded string.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// Decodes frames built by [`Frame::text`]: the pixel bytes as UTF-8,
/// trimmed. Blank or non-UTF-8 frames decode to nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextDecoder;

impl QrDecoder for TextDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let text = std::str::from_utf8(&frame.luma).ok()?.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Frames read line by line from a text stream (stdin, a file).
///
/// Read errors end the stream.
pub struct LineFrames<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineFrames<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead + Send> FrameSource for LineFrames<R> {
    fn next_frame(&mut self) -> Option<Frame> {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => None,
            Ok(_) => Some(Frame::text(self.line.trim_end_matches(['\r', '\n']))),
            Err(e) => {
                tracing::warn!(error = %e, "frame stream read failed; closing");
                None
            }
        }
    }
}
