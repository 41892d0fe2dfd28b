//! Wavefront OBJ export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::MeshData;

/// Save mesh data to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use myriahedral::io::obj;
/// use myriahedral::{Myriahedron, MyriahedronOptions};
///
/// let myria = Myriahedron::build(&MyriahedronOptions::default()).unwrap();
/// obj::save(&myria.mesh_data(), "sphere.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(data: &MeshData, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(data, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write mesh data as OBJ text.
///
/// Texture coordinates are written when there is one per vertex; faces then
/// reference them with the same index as the position.
pub fn write<W: Write>(data: &MeshData, writer: &mut W) -> Result<()> {
    let num_vertices = data.num_vertices();
    let has_uv = data.uv.len() == 2 * num_vertices && num_vertices > 0;

    writeln!(writer, "# myriahedral net")?;
    writeln!(
        writer,
        "# {} vertices, {} faces, {} folds, {} cuts",
        num_vertices,
        data.num_faces(),
        data.folds.len(),
        data.cuts.len()
    )?;

    for v in data.vertices.chunks_exact(3) {
        writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
    }

    if has_uv {
        for t in data.uv.chunks_exact(2) {
            writeln!(writer, "vt {} {}", t[0], t[1])?;
        }
    }

    // OBJ indices are 1-based
    for f in data.index.chunks_exact(3) {
        let (a, b, c) = (f[0] + 1, f[1] + 1, f[2] + 1);
        if has_uv {
            writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }

    Ok(())
}
