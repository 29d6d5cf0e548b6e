//! JSON runtime configuration of the `tri_fit` tool.
//!
//! ```json
//! {
//!   "input": "photo.png",
//!   "params": { "grid": { "cells_x": 32, "cells_y": 32 }, "mode": { "kind": "linear_split" } },
//!   "output": {
//!     "coefficients_json": "out/coefficients.json",
//!     "preview_image": "out/preview.png",
//!     "edges_image": "out/edges.png",
//!     "saliency_image": "out/saliency_map.png"
//!   }
//! }
//! ```
//!
//! `params` may be partial or omitted; missing fields take [`FitParams`]
//! defaults.
use crate::driver::FitParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    pub coefficients_json: PathBuf,
    #[serde(default)]
    pub preview_image: Option<PathBuf>,
    #[serde(default)]
    pub edges_image: Option<PathBuf>,
    #[serde(default)]
    pub saliency_image: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub params: FitParams,
    pub output: OutputConfig,
}

impl RuntimeConfig {
    /// Default parameters for `input`, coefficients written to
    /// `coefficients_json`.
    pub fn for_image(input: PathBuf, coefficients_json: PathBuf) -> Self {
        Self {
            input,
            params: FitParams::default(),
            output: OutputConfig {
                coefficients_json,
                preview_image: None,
                edges_image: None,
                saliency_image: None,
            },
        }
    }
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<RuntimeConfig, String> {
    serde_json::from_str(contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", origin.display()))
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents, path)
}
