//! PLY (Stanford polygon) export.
//!
//! Writes ASCII PLY with per-vertex texture coordinates as the `s` and `t`
//! properties.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::MeshData;

/// Save mesh data to a PLY file.
///
/// # Example
///
/// ```no_run
/// use myriahedral::io::ply;
/// use myriahedral::{Myriahedron, MyriahedronOptions};
///
/// let mut myria = Myriahedron::build(&MyriahedronOptions::default()).unwrap();
/// myria.unfold(1.0).unwrap();
/// ply::save(&myria.mesh_data(), "net.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(data: &MeshData, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(data, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write mesh data as ASCII PLY.
pub fn write<W: Write>(data: &MeshData, writer: &mut W) -> Result<()> {
    let num_vertices = data.num_vertices();
    let has_uv = data.uv.len() == 2 * num_vertices && num_vertices > 0;

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by myriahedral")?;
    writeln!(writer, "element vertex {}", num_vertices)?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if has_uv {
        writeln!(writer, "property float s")?;
        writeln!(writer, "property float t")?;
    }
    writeln!(writer, "element face {}", data.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for (i, v) in data.vertices.chunks_exact(3).enumerate() {
        if has_uv {
            writeln!(
                writer,
                "{} {} {} {} {}",
                v[0],
                v[1],
                v[2],
                data.uv[2 * i],
                data.uv[2 * i + 1]
            )?;
        } else {
            writeln!(writer, "{} {} {}", v[0], v[1], v[2])?;
        }
    }

    // Write faces
    for f in data.index.chunks_exact(3) {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_counts() {
        let data = MeshData {
            vertices: vec![0.0; 18],
            index: vec![0, 1, 2, 3, 4, 5],
            uv: vec![0.5; 12],
            folds: vec![],
            cuts: vec![],
        };
        let mut out = Vec::new();
        write(&data, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("element vertex 6"));
        assert!(text.contains("element face 2"));
        assert!(text.contains("property float s"));
        assert!(text.contains("3 3 4 5"));

        let body: Vec<&str> = text.lines().skip_while(|l| *l != "end_header").skip(1).collect();
        assert_eq!(body.len(), 8);
        assert_eq!(body[0].split_whitespace().count(), 5);
    }
}
