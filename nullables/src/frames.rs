//! Scripted and test-fed text frame sources.

use badged_scanner::{Frame, FrameSource};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

/// Yields the scripted frames in order, then closes.
///
/// `None` entries are frames in which no code is visible; they decode to
/// nothing with [`badged_scanner::TextDecoder`].
pub struct ScriptedFrames {
    frames: VecDeque<Frame>,
}

impl ScriptedFrames {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let frames = script
            .into_iter()
            .map(|entry| match entry {
                Some(text) => Frame::text(text.as_ref()),
                None => Frame::text(""),
            })
            .collect();
        Self { frames }
    }

    /// The same payload repeated `count` times, as a camera held steady
    /// over one code would produce.
    pub fn repeated(payload: &str, count: usize) -> Self {
        Self::new(std::iter::repeat(Some(payload)).take(count))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }
}

/// Frames pushed by the test through a channel.
///
/// `next_frame` blocks until a frame is sent; dropping every sender closes
/// the source.
pub struct ChannelFrames {
    rx: Receiver<Frame>,
}

impl ChannelFrames {
    pub fn new() -> (Sender<Frame>, Self) {
        let (tx, rx) = std::sync::mpsc::channel();
        (tx, Self { rx })
    }
}

impl FrameSource for ChannelFrames {
    fn next_frame(&mut self) -> Option<Frame> {
        self.rx.recv().ok()
    }
}
