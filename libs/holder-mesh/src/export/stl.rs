//! # STL Serialization
//!
//! ASCII and binary STL writers over flat vertex buffers.
//!
//! ## Binary layout
//!
//! | Offset     | Size | Content                               |
//! |------------|------|---------------------------------------|
//! | 0          | 80   | header, zero filled                   |
//! | 80         | 4    | triangle count, u32 LE                |
//! | 84 + 50·i  | 12   | facet normal, 3 × f32 LE              |
//! | 96 + 50·i  | 36   | vertices, 9 × f32 LE                  |
//! | 132 + 50·i | 2    | attribute byte count, zero            |

use crate::error::{MeshError, MeshResult};
use config::constants::{
    FLOATS_PER_TRIANGLE, STL_COUNT_BYTES, STL_HEADER_BYTES, STL_SOLID_NAME, STL_TRIANGLE_BYTES,
};
use glam::DVec3;
use std::io::Write;

/// Rejects buffers that do not hold whole triangles.
fn check_buffer(vertices: &[f32]) -> MeshResult<usize> {
    if vertices.len() % FLOATS_PER_TRIANGLE != 0 {
        return Err(MeshError::MalformedVertexBuffer {
            len: vertices.len(),
        });
    }
    Ok(vertices.len() / FLOATS_PER_TRIANGLE)
}

/// Triangle count as stored in the binary header.
fn count_field(triangles: usize) -> MeshResult<u32> {
    u32::try_from(triangles).map_err(|_| MeshError::StlTooLarge { triangles })
}

/// Unit face normal from the winding; zero for degenerate triangles.
fn facet_normal(tri: &[f32]) -> [f32; 3] {
    let v = |i: usize| DVec3::new(tri[i] as f64, tri[i + 1] as f64, tri[i + 2] as f64);
    let (v0, v1, v2) = (v(0), v(3), v(6));
    let n = (v1 - v0).cross(v2 - v0);
    let length = n.length();
    if !(length > 0.0) || !length.is_finite() {
        return [0.0; 3];
    }
    let n = n / length;
    // +0.0 turns -0.0 into 0.0
    [n.x as f32 + 0.0, n.y as f32 + 0.0, n.z as f32 + 0.0]
}

/// ASCII STL lines with the default solid name.
///
/// # Example
///
/// ```rust
/// use holder_mesh::export::to_ascii_stl;
///
/// let lines = to_ascii_stl(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
/// assert_eq!(lines[0], "solid THT-holder");
/// assert_eq!(lines[1], "facet normal 0 0 1");
/// assert_eq!(lines.len(), 9);
/// ```
pub fn to_ascii_stl(vertices: &[f32]) -> MeshResult<Vec<String>> {
    to_ascii_stl_named(vertices, STL_SOLID_NAME)
}

/// ASCII STL lines for a named solid.
pub fn to_ascii_stl_named(vertices: &[f32], name: &str) -> MeshResult<Vec<String>> {
    let triangles = check_buffer(vertices)?;
    let mut lines = Vec::with_capacity(2 + triangles * 7);

    lines.push(format!("solid {name}"));
    for tri in vertices.chunks_exact(FLOATS_PER_TRIANGLE) {
        let [nx, ny, nz] = facet_normal(tri);
        lines.push(format!("facet normal {nx} {ny} {nz}"));
        lines.push("    outer loop".to_string());
        for v in tri.chunks_exact(3) {
            lines.push(format!(
                "        vertex {} {} {}",
                v[0] + 0.0,
                v[1] + 0.0,
                v[2] + 0.0
            ));
        }
        lines.push("    endloop".to_string());
        lines.push("endfacet".to_string());
    }
    lines.push(format!("endsolid {name}"));

    Ok(lines)
}

/// Binary STL file contents.
///
/// # Example
///
/// ```rust
/// use holder_mesh::export::to_binary_stl;
///
/// let bytes = to_binary_stl(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
/// assert_eq!(bytes.len(), 134);
/// assert_eq!(&bytes[80..84], &1u32.to_le_bytes());
/// ```
pub fn to_binary_stl(vertices: &[f32]) -> MeshResult<Vec<u8>> {
    check_buffer(vertices)?;
    let mut out = Vec::with_capacity(estimate_binary_stl_size_bytes(vertices.len()));
    write_binary_stl(&mut out, vertices)?;
    Ok(out)
}

/// Streams binary STL to `writer`.
///
/// The buffer is validated before the first byte is written.
pub fn write_binary_stl<W: Write>(writer: &mut W, vertices: &[f32]) -> MeshResult<()> {
    let triangles = check_buffer(vertices)?;
    let count = count_field(triangles)?;

    writer.write_all(&[0u8; STL_HEADER_BYTES])?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; STL_TRIANGLE_BYTES];
    for tri in vertices.chunks_exact(FLOATS_PER_TRIANGLE) {
        let normal = facet_normal(tri);
        for (slot, value) in record
            .chunks_exact_mut(4)
            .zip(normal.iter().chain(tri.iter()))
        {
            slot.copy_from_slice(&value.to_le_bytes());
        }
        // Attribute byte count
        record[48..].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }

    Ok(())
}

/// Size in bytes of the binary STL for a buffer of `vertex_count` floats.
///
/// # Example
///
/// ```rust
/// use holder_mesh::export::estimate_binary_stl_size_bytes;
///
/// assert_eq!(estimate_binary_stl_size_bytes(0), 84);
/// assert_eq!(estimate_binary_stl_size_bytes(9), 134);
/// ```
pub fn estimate_binary_stl_size_bytes(vertex_count: usize) -> usize {
    STL_HEADER_BYTES + STL_COUNT_BYTES + STL_TRIANGLE_BYTES * (vertex_count / FLOATS_PER_TRIANGLE)
}

/// Binary STL size rounded to the nearest kilobyte, for size previews.
pub fn estimate_binary_stl_size_kb(vertex_count: usize) -> u64 {
    (estimate_binary_stl_size_bytes(vertex_count) as f64 / 1024.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    #[test]
    fn test_ascii_single_triangle() {
        let lines = to_ascii_stl(&TRIANGLE).unwrap();
        assert_eq!(
            lines,
            vec![
                "solid THT-holder",
                "facet normal 0 0 1",
                "    outer loop",
                "        vertex 0 0 0",
                "        vertex 1 0 0",
                "        vertex 0 1 0",
                "    endloop",
                "endfacet",
                "endsolid THT-holder",
            ]
        );
    }

    #[test]
    fn test_ascii_degenerate_and_negative_zero() {
        let tri = [-0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let lines = to_ascii_stl_named(&tri, "part").unwrap();
        assert_eq!(lines[0], "solid part");
        assert_eq!(lines[1], "facet normal 0 0 0");
        assert_eq!(lines[3], "        vertex 0 0 0");
        assert_eq!(lines.last().unwrap(), "endsolid part");
    }

    #[test]
    fn test_ascii_flipped_winding_has_no_negative_zero() {
        let tri = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let lines = to_ascii_stl(&tri).unwrap();
        assert_eq!(lines[1], "facet normal 0 0 -1");
    }

    #[test]
    fn test_ascii_empty_buffer() {
        let lines = to_ascii_stl(&[]).unwrap();
        assert_eq!(lines, vec!["solid THT-holder", "endsolid THT-holder"]);
    }

    #[test]
    fn test_binary_single_triangle_layout() {
        let bytes = to_binary_stl(&TRIANGLE).unwrap();
        assert_eq!(bytes.len(), 134);
        assert!(bytes[..80].iter().all(|b| *b == 0));
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 1);

        let float_at = |offset: usize| f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());
        assert_eq!([float_at(84), float_at(88), float_at(92)], [0.0, 0.0, 1.0]);
        assert_eq!(float_at(96 + 12), 1.0); // v1.x
        assert_eq!(float_at(96 + 28), 1.0); // v2.y
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn test_binary_empty_buffer() {
        let bytes = to_binary_stl(&[]).unwrap();
        assert_eq!(bytes.len(), 84);
        assert_eq!(&bytes[80..84], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_malformed_buffer_is_rejected() {
        let bad = [0.0f32; 10];
        assert!(matches!(
            to_ascii_stl(&bad),
            Err(MeshError::MalformedVertexBuffer { len: 10 })
        ));
        assert!(to_binary_stl(&bad).is_err());

        let mut sink = Vec::new();
        assert!(write_binary_stl(&mut sink, &bad).is_err());
        assert!(sink.is_empty());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_count_field_overflow_is_stl_too_large() {
        let triangles = u32::MAX as usize + 1;
        assert!(matches!(
            count_field(triangles),
            Err(MeshError::StlTooLarge { triangles: t }) if t == triangles
        ));
        assert_eq!(count_field(7).unwrap(), 7);
    }

    #[test]
    fn test_size_estimates() {
        assert_eq!(estimate_binary_stl_size_bytes(0), 84);
        assert_eq!(estimate_binary_stl_size_bytes(9), 134);
        assert_eq!(estimate_binary_stl_size_bytes(9 * 100), 5084);
        assert_eq!(estimate_binary_stl_size_kb(9 * 100), 5);
        assert_eq!(estimate_binary_stl_size_kb(0), 0);
    }

    #[test]
    fn test_binary_matches_estimate() {
        let vertices: Vec<f32> = TRIANGLE.iter().cycle().take(9 * 7).copied().collect();
        let bytes = to_binary_stl(&vertices).unwrap();
        assert_eq!(bytes.len(), estimate_binary_stl_size_bytes(vertices.len()));
    }
}
