//! Build-time asset resolution.
//!
//! Every file under `static/` is registered under a symbolic name (its path
//! relative to `static/`) and bundled under a content-fingerprinted path:
//!
//! ```text
//! static/img/cards/planning-light.png  →  assets/img/cards/planning-light.3f9a01bc.png
//! ```
//!
//! Homepage records, the navbar logo and the favicon refer to images by
//! symbolic name. Names are resolved once while the site is built; a name with
//! no file behind it is a fatal [`AssetError::Unresolved`], never a runtime
//! fallback.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Output directory (relative to the site root) holding bundled assets.
pub const ASSETS_DIR: &str = "assets";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Unresolved asset reference \"{name}\" (no such file under static/)")]
    Unresolved { name: String },
}

/// A static file and the site-relative path it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledAsset {
    pub source: PathBuf,
    /// `assets/<dir>/<stem>.<hash8>.<ext>`, `/`-separated.
    pub bundled_path: String,
}

/// Symbolic name → bundled asset.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    entries: BTreeMap<String, BundledAsset>,
}

impl AssetTable {
    /// Register every file under `static_dir`. A missing directory yields an
    /// empty table.
    pub fn scan(static_dir: &Path) -> Result<Self, AssetError> {
        let mut entries = BTreeMap::new();
        if !static_dir.is_dir() {
            return Ok(Self { entries });
        }

        for entry in WalkDir::new(static_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let name = path
                .strip_prefix(static_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            let bytes = fs::read(path)?;
            let bundled_path = bundled_path_for(&name, &fingerprint(&bytes));
            entries.insert(
                name,
                BundledAsset {
                    source: path.to_path_buf(),
                    bundled_path,
                },
            );
        }

        Ok(Self { entries })
    }

    /// Resolve a symbolic name. A leading `/` is ignored, so `"/img/x.png"`
    /// and `"img/x.png"` name the same asset.
    pub fn resolve(&self, name: &str) -> Result<&BundledAsset, AssetError> {
        self.entries
            .get(name.trim_start_matches('/'))
            .ok_or_else(|| AssetError::Unresolved {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every bundled asset into `output_dir`. Returns the number copied.
    pub fn copy_to(&self, output_dir: &Path) -> std::io::Result<usize> {
        for asset in self.entries.values() {
            let dst = output_dir.join(&asset.bundled_path);
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&asset.source, &dst)?;
        }
        Ok(self.entries.len())
    }
}

/// First 8 hex digits of the SHA-256 of the content.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)[..8].to_string()
}

fn bundled_path_for(name: &str, hash: &str) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file = match path.extension() {
        Some(ext) => format!("{stem}.{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{hash}"),
    };
    match name.rsplit_once('/') {
        Some((dir, _)) => format!("{ASSETS_DIR}/{dir}/{file}"),
        None => format!("{ASSETS_DIR}/{file}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn static_dir_with(files: &[(&str, &[u8])]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (rel, bytes) in files {
            let path = tmp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, bytes).unwrap();
        }
        tmp
    }

    #[test]
    fn resolves_symbolic_names() {
        let tmp = static_dir_with(&[("img/cards/planning-light.png", b"light")]);
        let table = AssetTable::scan(tmp.path()).unwrap();

        let asset = table.resolve("img/cards/planning-light.png").unwrap();
        let hash = fingerprint(b"light");
        assert_eq!(
            asset.bundled_path,
            format!("assets/img/cards/planning-light.{hash}.png")
        );
        assert_eq!(table.resolve("/img/cards/planning-light.png").unwrap(), asset);
    }

    #[test]
    fn unknown_name_is_unresolved() {
        let tmp = static_dir_with(&[("img/a.png", b"a")]);
        let table = AssetTable::scan(tmp.path()).unwrap();
        let err = table.resolve("img/missing.png").unwrap_err();
        assert!(matches!(err, AssetError::Unresolved { ref name } if name == "img/missing.png"));
        assert!(err.to_string().contains("img/missing.png"));
    }

    #[test]
    fn fingerprint_is_stable_and_content_based() {
        assert_eq!(fingerprint(b"same"), fingerprint(b"same"));
        assert_ne!(fingerprint(b"same"), fingerprint(b"other"));
        assert_eq!(fingerprint(b"same").len(), 8);
    }

    #[test]
    fn top_level_and_extensionless_names() {
        assert_eq!(bundled_path_for("favicon.ico", "abcd1234"), "assets/favicon.abcd1234.ico");
        assert_eq!(bundled_path_for("img/LICENSE", "abcd1234"), "assets/img/LICENSE.abcd1234");
    }

    #[test]
    fn copy_to_writes_bundled_files() {
        let src = static_dir_with(&[("img/logo.svg", b"<svg/>"), ("favicon.ico", b"ico")]);
        let table = AssetTable::scan(src.path()).unwrap();
        let out = TempDir::new().unwrap();

        let copied = table.copy_to(out.path()).unwrap();
        assert_eq!(copied, 2);
        let logo = table.resolve("img/logo.svg").unwrap();
        assert_eq!(fs::read(out.path().join(&logo.bundled_path)).unwrap(), b"<svg/>");
    }

    #[test]
    fn missing_static_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let table = AssetTable::scan(&tmp.path().join("static")).unwrap();
        assert!(table.is_empty());
    }
}
