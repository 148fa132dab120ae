use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built browser UI, served with an `index.html` fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Media root holding `videos/` and `thumbnails/`
    #[serde(default = "default_media_root")]
    pub root: PathBuf,

    /// SQLite catalog file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Content type for streamed files with an unknown extension
    #[serde(default = "default_mime")]
    pub default_mime: String,

    /// Per-file upload limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}
fn default_database() -> PathBuf {
    PathBuf::from("./homestream.db")
}
fn default_mime() -> String {
    "video/mp4".to_string()
}
fn default_max_upload_bytes() -> u64 {
    8 * 1024 * 1024 * 1024
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            database: default_database(),
            default_mime: default_mime(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl MediaConfig {
    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Read size per response body chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    64 * 1024
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}
