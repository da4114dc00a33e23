use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::shared::constants;

/// Why a frame could not be loaded
#[derive(Debug)]
pub enum FrameError {
    NotFound { index: u32, path: PathBuf },
    Truncated { index: u32, path: PathBuf },
    Io { index: u32, path: PathBuf, source: io::Error },
}

impl FrameError {
    pub fn index(&self) -> u32 {
        match self {
            FrameError::NotFound { index, .. }
            | FrameError::Truncated { index, .. }
            | FrameError::Io { index, .. } => *index,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FrameError::NotFound { .. })
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::NotFound { index, path } => {
                write!(f, "frame {} not found: {}", index, path.display())
            }
            FrameError::Truncated { index, path } => {
                write!(f, "frame {} is truncated: {}", index, path.display())
            }
            FrameError::Io { index, path, source } => {
                write!(f, "failed to read frame {} ({}): {}", index, path.display(), source)
            }
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Loads numbered bitmap frames from disk, one whole buffer at a time.
///
/// The reader skips the fixed 54-byte header and takes the next
/// `width * height * 3` bytes verbatim. Row order and row padding are not
/// interpreted, so only widths whose rows are already 4-byte aligned load
/// correctly.
pub struct FrameSource {
    base_path: String,
    width: usize,
    height: usize,
    start_frame: u32,
    current_frame: u32,
    buffer: Option<Vec<u8>>,
}

impl FrameSource {
    pub fn new(base_path: impl Into<String>, width: u32, height: u32, start_frame: u32) -> Self {
        Self {
            base_path: base_path.into(),
            width: width as usize,
            height: height as usize,
            start_frame,
            current_frame: start_frame,
            buffer: None,
        }
    }

    /// Payload bytes per frame, `None` when the size does not fit in memory
    pub fn frame_size(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(constants::CHANNEL_STRIDE)
    }

    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    /// Index the next `load_next` will request
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Pixel data of the last successful load
    pub fn buffer(&self) -> Option<&[u8]> {
        self.buffer.as_deref()
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}.{}",
            self.base_path,
            index,
            constants::FRAME_EXTENSION
        ))
    }

    pub fn set_base_path(&mut self, base_path: impl Into<String>) {
        self.base_path = base_path.into();
        crate::utils::logger::info(&format!("Setting new frame base path: {}", self.base_path));
    }

    /// Force the index of the next load. Values below the start frame are raised to it.
    pub fn set_current_frame(&mut self, index: u32) {
        self.current_frame = index.max(self.start_frame);
    }

    /// Load the current frame and advance the counter.
    ///
    /// On failure neither the held buffer nor the counter change.
    pub fn load_next(&mut self) -> Result<&[u8], FrameError> {
        let index = self.current_frame;
        let data = self.read_frame(index)?;
        // Previous buffer is dropped here
        self.buffer = Some(data);
        self.current_frame = index.saturating_add(1);
        Ok(self.buffer.as_deref().unwrap_or_default())
    }

    fn read_frame(&self, index: u32) -> Result<Vec<u8>, FrameError> {
        let path = self.frame_path(index);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FrameError::NotFound { index, path });
            }
            Err(source) => return Err(FrameError::Io { index, path, source }),
        };

        let Some(size) = self.frame_size() else {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "frame size overflows");
            return Err(FrameError::Io { index, path, source });
        };
        let file_len = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(source) => return Err(FrameError::Io { index, path, source }),
        };
        if file_len < constants::BMP_HEADER_SIZE.saturating_add(size as u64) {
            return Err(FrameError::Truncated { index, path });
        }

        let mut reader = BufReader::new(file);
        let mut data = vec![0u8; size];
        let result = reader
            .seek(SeekFrom::Start(constants::BMP_HEADER_SIZE))
            .and_then(|_| reader.read_exact(&mut data));

        match result {
            Ok(()) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(FrameError::Truncated { index, path })
            }
            Err(source) => Err(FrameError::Io { index, path, source }),
        }
    }
}
