use std::path::{Path, PathBuf};

use crate::assets::decode::{ImageKind, decode_path};
use crate::foundation::core::SourceImage;
use crate::foundation::error::{GlyphError, GlyphResult};

/// A device or stream that yields one still frame per grab.
///
/// `open` runs on the caller's thread before capture starts so access failures surface
/// immediately; `grab` runs on the capture thread.
pub trait FrameSource: Send + 'static {
    fn describe(&self) -> String;

    fn open(&mut self) -> GlyphResult<()>;

    fn grab(&mut self) -> GlyphResult<Option<SourceImage>>;
}

/// Replays the images of a directory in file-name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    next: usize,
    looping: bool,
}

impl ImageSequenceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Vec::new(),
            next: 0,
            looping: false,
        }
    }

    /// Start over at the first frame instead of ending the sequence.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn list_frames(dir: &Path) -> GlyphResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| GlyphError::capture(format!("open '{}': {e}", dir.display())))?;
    let mut frames = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && ImageKind::from_path(p).is_some())
        .collect::<Vec<_>>();
    frames.sort();
    Ok(frames)
}

impl FrameSource for ImageSequenceSource {
    fn describe(&self) -> String {
        format!("image sequence '{}'", self.dir.display())
    }

    fn open(&mut self) -> GlyphResult<()> {
        self.frames = list_frames(&self.dir)?;
        self.next = 0;
        if self.frames.is_empty() {
            return Err(GlyphError::capture(format!(
                "no PNG, JPEG, WebP or SVG frames in '{}'",
                self.dir.display()
            )));
        }
        Ok(())
    }

    fn grab(&mut self) -> GlyphResult<Option<SourceImage>> {
        if self.next >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Ok(None);
            }
            self.next = 0;
        }
        let path = &self.frames[self.next];
        self.next += 1;
        let decoded = decode_path(path)?;
        Ok(Some(decoded.image))
    }
}
