//! Manifest loading from strings, files and directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use surrogate_proxy::Protocol;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::registry::ProtocolRegistry;
use crate::types::ProxyManifest;

/// Pseudo-path reported for manifests parsed from strings.
const INLINE_PATH: &str = "<inline>";

impl ProxyManifest {
    /// Parse a manifest from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the TOML is malformed or does
    /// not match the manifest schema.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        parse(content, Path::new(INLINE_PATH))
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it cannot be parsed.
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded proxy manifest");
        parse(&content, path)
    }
}

fn parse(content: &str, path: &Path) -> ConfigResult<ProxyManifest> {
    toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: path.display().to_string(),
        source,
    })
}

impl ProtocolRegistry {
    /// Load a manifest file into the registry.
    ///
    /// # Errors
    ///
    /// See [`ProxyManifest::load_file`] and
    /// [`ProtocolRegistry::register_manifest`].
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Arc<Protocol>> {
        let manifest = ProxyManifest::load_file(path)?;
        self.register_manifest(manifest)
    }

    /// Load every `*.toml` manifest in `dir`, in file-name order.
    ///
    /// A protocol may adopt only protocols that are already registered or
    /// whose files sort earlier. Loading stops at the first error; manifests
    /// loaded before it stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the directory cannot be listed,
    /// or the first error from loading a manifest.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> ConfigResult<Vec<Arc<Protocol>>> {
        let dir = dir.as_ref();
        let mut loaded = Vec::new();
        for path in manifest_paths(dir)? {
            loaded.push(self.load_file(&path)?);
        }
        info!(
            dir = %dir.display(),
            count = loaded.len(),
            "loaded protocol manifests"
        );
        Ok(loaded)
    }
}

fn manifest_paths(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    let read_error = |source: std::io::Error| ConfigError::ReadError {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
