use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to access trace at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed trace")]
    Json(#[from] serde_json::Error),
    #[error("frame {frame}: controller port {port} is out of range")]
    InvalidPort { frame: usize, port: u8 },
    #[error("frame {frame}: pad queue slot {slot} is out of range for a queue of {queue_len}")]
    InvalidQueueSlot { frame: usize, slot: u8, queue_len: u8 },
}
