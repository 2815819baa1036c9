// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropitError {
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("selection overlay failed: {0}")]
    OverlayFailed(String),

    #[error("could not hand the selection to the output: {0}")]
    OutputCommitFailed(String),

    #[error("selection has no area ({width}x{height})")]
    DegenerateSelection { width: i32, height: i32 },
}

pub type Result<T> = std::result::Result<T, CropitError>;
