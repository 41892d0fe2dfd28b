//! Net export.
//!
//! Writes [`MeshData`] (the renderer buffers of a myriahedron at its current
//! unfold scale) to common mesh formats so a net can be inspected or printed
//! outside a renderer.
//!
//! # Supported Formats
//!
//! | Format | Extension | Positions | UVs | Notes |
//! |--------|-----------|-----------|-----|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | `vt` records, `f v/vt` faces |
//! | PLY | `.ply` | ✓ | ✓ | ASCII, `s`/`t` vertex properties |
//!
//! # Usage
//!
//! ```no_run
//! use myriahedral::io::save;
//! use myriahedral::{Myriahedron, MyriahedronOptions};
//!
//! let mut myria = Myriahedron::build(&MyriahedronOptions::default()).unwrap();
//! myria.unfold(1.0).unwrap();
//!
//! // Format from the extension
//! save(&myria.mesh_data(), "net.ply").unwrap();
//! ```
//!
//! You can also use format-specific functions, or write to any
//! [`std::io::Write`]:
//!
//! ```
//! use myriahedral::io::obj;
//! use myriahedral::{Myriahedron, MyriahedronOptions};
//!
//! let myria = Myriahedron::build(&MyriahedronOptions::default().with_subdivisions(0)).unwrap();
//! let mut out = Vec::new();
//! obj::write(&myria.mesh_data(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("# myriahedral"));
//! ```

pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::MeshData;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Obj => "obj",
            Format::Ply => "ply",
        }
    }
}

/// Save mesh data to a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Errors
/// Returns [`MeshError::UnsupportedFormat`] for unknown extensions and
/// [`MeshError::Io`] if writing fails.
pub fn save<P: AsRef<Path>>(data: &MeshData, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::save(data, path),
        Format::Ply => ply::save(data, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("net.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("a/b/net.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("net.stl"), None);
        assert_eq!(Format::from_path("net"), None);
        assert_eq!(Format::Ply.extension(), "ply");
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let data = MeshData {
            vertices: vec![],
            index: vec![],
            uv: vec![],
            folds: vec![],
            cuts: vec![],
        };
        let err = save(&data, "net.gltf").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { extension } if extension == "gltf"));
    }
}
