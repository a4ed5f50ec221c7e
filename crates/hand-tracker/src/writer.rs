//! Append-only landmark recording writer.
//!
//! A recording is readable up to its last complete line, so a crash mid-session
//! still leaves a usable replay.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lorbital_common::error::{LorbitalError, LorbitalResult};
use lorbital_gesture_model::landmark::{LandmarkFrame, LandmarkStreamHeader};

/// Frames between automatic flushes.
const FLUSH_EVERY: u64 = 300;

/// Writes landmark frames to a JSONL file, header first.
pub struct LandmarkWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl LandmarkWriter {
    pub fn create(path: impl Into<PathBuf>, header: &LandmarkStreamHeader) -> LorbitalResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| LorbitalError::recording(format!("Failed to write header: {e}")))?;

        tracing::debug!(path = %path.display(), source = %header.source, "Recording landmarks");
        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &LandmarkFrame) -> LorbitalResult<()> {
        let json = serde_json::to_string(frame)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| LorbitalError::recording(format!("Failed to write frame: {e}")))?;
        self.frames_written += 1;

        if self.frames_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> LorbitalResult<()> {
        self.writer
            .flush()
            .map_err(|e| LorbitalError::recording(format!("Failed to flush recording: {e}")))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LandmarkWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
