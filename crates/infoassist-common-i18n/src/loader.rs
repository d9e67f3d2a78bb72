//! Catalog loading from YAML and JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Catalog, I18nError, Locale};

const BUILTIN: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en.yaml")),
    ("es", include_str!("../locales/es.yaml")),
];

/// Catalog file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Format implied by a file extension (`yaml`, `yml`, `json`).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format of a path, judged by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse catalog text. The document root must be a mapping; an empty
    /// document is an empty catalog.
    pub fn parse(self, content: &str, origin: &Path) -> Result<Catalog, I18nError> {
        if content.trim().is_empty() {
            return Ok(Catalog::new());
        }

        let parsed: Result<Catalog, String> = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(catalog @ Catalog::Node(_)) => Ok(catalog),
            Ok(Catalog::Leaf(_)) => Err(I18nError::ParseError {
                path: origin.to_path_buf(),
                message: "catalog root must be a mapping".to_string(),
            }),
            Err(message) => Err(I18nError::ParseError {
                path: origin.to_path_buf(),
                message,
            }),
        }
    }
}

/// Load a single catalog file.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, I18nError> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)
        .ok_or_else(|| I18nError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = format.parse(&content, path)?;
    debug!(path = %path.display(), templates = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Load every `<locale>.<ext>` catalog in a directory, sorted by locale.
///
/// A missing directory yields no catalogs. Files with other extensions are
/// skipped. Two files for the same locale (`es.yaml` and `es.json`) are both
/// returned and merge on registration.
pub fn load_catalog_dir(dir: impl AsRef<Path>) -> Result<Vec<(Locale, Catalog)>, I18nError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        debug!(dir = %dir.display(), "catalog directory does not exist");
        return Ok(Vec::new());
    }

    let io_error = |source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && CatalogFormat::from_path(&path).is_some() {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-catalog entry");
        }
    }
    paths.sort();

    let mut catalogs = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let locale = locale.to_string();
        catalogs.push((locale, load_catalog_file(&path)?));
    }
    Ok(catalogs)
}

/// The application's bundled catalogs.
pub fn builtin_catalogs() -> Result<Vec<(Locale, Catalog)>, I18nError> {
    BUILTIN
        .iter()
        .map(|(locale, content)| {
            let origin = PathBuf::from(format!("<builtin>/{locale}.yaml"));
            let catalog = CatalogFormat::Yaml.parse(content, &origin)?;
            Ok((locale.to_string(), catalog))
        })
        .collect()
}
