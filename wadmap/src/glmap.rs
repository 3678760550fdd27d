use glam::Vec2;
use log::{debug, warn};

use crate::Vertex;
use crate::error::WadError;
use crate::lumps::{GLSegment, GLSubSector, GLVertexRef, GlLump, NO_LINEDEF};
use crate::map::check_index;
use crate::wad::Wad;

/// Expected magic at the start of a GL vertex lump. Node builders have
/// shipped several revisions of the tag, so a mismatch is only logged.
const GL_VERT_MAGIC: [u8; 4] = *b"gNd2";

/// Magic some node builders write at the start of the GL segs lump.
const GL_SEG_MAGIC: [u8; 4] = *b"gNd3";

const GL_VERTEX_SIZE: usize = 8;
const GL_SEGMENT_SIZE: usize = 10;
const GL_SUBSECTOR_SIZE: usize = 4;

/// The marker lump name for the GL-nodes companion of a map: `E1M1`
/// pairs with `GL_E1M1`.
pub fn gl_name(map_name: &str) -> String {
    format!("GL_{map_name}")
}

/// The GL tessellation of one map: the node builder's extra vertices,
/// the seg edges, and the convex subsector polygons they form.
///
/// Produced by [`Wad::read_gl_map`]. Each subsector's seg run has been
/// checked against the seg array, so walking a polygon cannot overrun.
/// Seg vertex references into the gameplay map ([`GLVertexRef::Map`])
/// are the caller's to resolve against that map.
#[derive(Debug, Clone)]
pub struct GLMap {
    name: String,
    vertices: Vec<Vertex>,
    segments: Vec<GLSegment>,
    subsectors: Vec<GLSubSector>,
    min: Vec2,
    max: Vec2,
}

impl GLMap {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extra vertices introduced by the node builder. GL segs index
    /// these through [`GLVertexRef::Gl`].
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn segments(&self) -> &[GLSegment] {
        &self.segments
    }

    pub fn subsectors(&self) -> &[GLSubSector] {
        &self.subsectors
    }

    /// Lowest X and Y over the GL vertices. Stays at positive infinity
    /// when the lump holds none.
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Highest X and Y over the GL vertices. Stays at negative infinity
    /// when the lump holds none.
    pub fn max(&self) -> Vec2 {
        self.max
    }
}

impl Wad {
    /// Decode the GL-nodes data anchored at the marker lump `name`,
    /// conventionally the map name with a `GL_` prefix (see
    /// [`gl_name`]).
    ///
    /// GL vertices are stored as 16.16 fixed-point and come out as the
    /// exact binary fraction, so coordinates the node builder derived
    /// from map vertices reconstruct bit-for-bit.
    pub fn read_gl_map(&self, name: &str) -> Result<GLMap, WadError> {
        let marker = self
            .find_lump(name)
            .ok_or_else(|| WadError::NotFound(name.to_string()))?;

        let vertex_lump = self.lump_at(marker + GlLump::Vertexes as usize)?;
        // The magic is structurally part of the lump: vertex data starts
        // after it, so a lump too short for it cannot be decoded at all.
        let magic: [u8; 4] = crate::bytes::read_array(&vertex_lump.data, 0)?;
        if magic != GL_VERT_MAGIC {
            warn!(
                "{name}: GL vertex lump tagged {:?}, expected {:?}, decoding anyway",
                String::from_utf8_lossy(&magic),
                String::from_utf8_lossy(&GL_VERT_MAGIC)
            );
        }
        let count = (vertex_lump.size() - 4) / GL_VERTEX_SIZE;
        let mut vertices = Vec::with_capacity(count);
        for i in 0..count {
            let offset = 4 + i * GL_VERTEX_SIZE;
            vertices.push(Vertex::new(
                vertex_lump.read_i32(offset)? as f32 / 65536.0,
                vertex_lump.read_i32(offset + 4)? as f32 / 65536.0,
            ));
        }
        let (min, max) = vertices.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        );

        let seg_lump = self.lump_at(marker + GlLump::Segs as usize)?;
        if seg_lump.size() >= 4 {
            let tag: [u8; 4] = crate::bytes::read_array(&seg_lump.data, 0)?;
            if tag == GL_SEG_MAGIC {
                warn!("{name}: GL seg lump carries a version tag, decoding records from the start");
            }
        }
        let segments = seg_lump.decode_records(GL_SEGMENT_SIZE, |offset| {
            let linedef = seg_lump.read_u16(offset + 4)?;
            Ok(GLSegment {
                start_vertex: GLVertexRef::from_raw(seg_lump.read_u16(offset)?),
                end_vertex: GLVertexRef::from_raw(seg_lump.read_u16(offset + 2)?),
                linedef: (linedef != NO_LINEDEF).then_some(linedef),
                side: seg_lump.read_u16(offset + 6)?,
            })
        })?;

        let subsector_lump = self.lump_at(marker + GlLump::SSectors as usize)?;
        let subsectors = subsector_lump.decode_records(GL_SUBSECTOR_SIZE, |offset| {
            Ok(GLSubSector {
                seg_count: subsector_lump.read_u16(offset)?,
                start_seg: subsector_lump.read_u16(offset + 2)?,
            })
        })?;

        for subsector in &subsectors {
            let end = subsector.start_seg as usize + subsector.seg_count as usize;
            if end > segments.len() {
                return Err(WadError::OutOfBounds {
                    what: "subsector seg run",
                    at: end,
                    limit: segments.len(),
                });
            }
        }
        for segment in &segments {
            for vertex in [segment.start_vertex, segment.end_vertex] {
                if let GLVertexRef::Gl(index) = vertex {
                    check_index("seg GL vertex", index, vertices.len())?;
                }
            }
        }

        debug!(
            "{name}: {} GL vertices, {} segs, {} subsectors",
            vertices.len(),
            segments.len(),
            subsectors.len()
        );

        Ok(GLMap {
            name: name.to_string(),
            vertices,
            segments,
            subsectors,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_archive;

    fn gl_vertex_bytes(magic: &[u8; 4], coords: &[(i32, i32)]) -> Vec<u8> {
        let mut out = magic.to_vec();
        for (x, y) in coords {
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
        }
        out
    }

    fn gl_seg_bytes(segs: &[[u16; 5]]) -> Vec<u8> {
        let mut out = Vec::new();
        for fields in segs {
            for field in fields {
                out.extend_from_slice(&field.to_le_bytes());
            }
        }
        out
    }

    fn gl_subsector_bytes(runs: &[(u16, u16)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (count, start) in runs {
            out.extend_from_slice(&count.to_le_bytes());
            out.extend_from_slice(&start.to_le_bytes());
        }
        out
    }

    fn gl_archive(vertices: &[u8], segs: &[u8], subsectors: &[u8]) -> Vec<u8> {
        build_archive(
            b"PWAD",
            &[
                ("GL_E1M1", b""),
                ("GL_VERT", vertices),
                ("GL_SEGS", segs),
                ("GL_SSECT", subsectors),
            ],
        )
    }

    #[test]
    fn marker_name() {
        assert_eq!(gl_name("E1M1"), "GL_E1M1");
        assert_eq!(gl_name("MAP01"), "GL_MAP01");
    }

    #[test]
    fn fixed_point_vertices() {
        let image = gl_archive(
            &gl_vertex_bytes(
                b"gNd2",
                &[(0x0001_0000, -0x0001_0000), (0x0000_8000, 0x0001_4000)],
            ),
            b"",
            b"",
        );
        let wad = Wad::from_bytes(&image).unwrap();
        let gl = wad.read_gl_map("GL_E1M1").unwrap();

        assert_eq!(gl.name(), "GL_E1M1");
        assert_eq!(gl.vertices()[0], Vertex::new(1.0, -1.0));
        assert_eq!(gl.vertices()[1], Vertex::new(0.5, 1.25));
        assert_eq!(gl.min(), Vec2::new(0.5, -1.0));
        assert_eq!(gl.max(), Vec2::new(1.0, 1.25));
    }

    #[test]
    fn empty_vertex_lump_has_infinite_bounds() {
        let image = gl_archive(b"gNd2", b"", b"");
        let wad = Wad::from_bytes(&image).unwrap();
        let gl = wad.read_gl_map("GL_E1M1").unwrap();
        assert!(gl.vertices().is_empty());
        assert_eq!(gl.min(), Vec2::splat(f32::INFINITY));
        assert_eq!(gl.max(), Vec2::splat(f32::NEG_INFINITY));
    }

    #[test]
    fn unknown_vertex_magic_still_decodes() {
        let image = gl_archive(&gl_vertex_bytes(b"gNd4", &[(0, 0)]), b"", b"");
        let wad = Wad::from_bytes(&image).unwrap();
        let gl = wad.read_gl_map("GL_E1M1").unwrap();
        assert_eq!(gl.vertices().len(), 1);
    }

    #[test]
    fn vertex_lump_shorter_than_magic_fails() {
        let image = gl_archive(b"gN", b"", b"");
        let wad = Wad::from_bytes(&image).unwrap();
        assert!(matches!(
            wad.read_gl_map("GL_E1M1"),
            Err(WadError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn segs_split_references_and_minisegs() {
        let image = gl_archive(
            &gl_vertex_bytes(b"gNd2", &[(0, 0), (0x10_0000, 0)]),
            &gl_seg_bytes(&[
                [0x8003, 1, 7, 0, 0],
                [1, 0x8003, 0xFFFF, 1, 0],
            ]),
            &gl_subsector_bytes(&[(2, 0)]),
        );
        let wad = Wad::from_bytes(&image).unwrap();
        let gl = wad.read_gl_map("GL_E1M1").unwrap();

        let first = gl.segments()[0];
        assert_eq!(first.start_vertex, GLVertexRef::Map(3));
        assert_eq!(first.end_vertex, GLVertexRef::Gl(1));
        assert_eq!(first.linedef, Some(7));
        assert_eq!(first.side, 0);

        let second = gl.segments()[1];
        assert_eq!(second.linedef, None);
        assert_eq!(second.side, 1);

        assert_eq!(gl.subsectors()[0], GLSubSector { seg_count: 2, start_seg: 0 });
    }

    #[test]
    fn seg_gl_vertex_out_of_range() {
        let image = gl_archive(
            &gl_vertex_bytes(b"gNd2", &[(0, 0)]),
            &gl_seg_bytes(&[[5, 0, 0xFFFF, 0, 0]]),
            b"",
        );
        let wad = Wad::from_bytes(&image).unwrap();
        assert!(matches!(
            wad.read_gl_map("GL_E1M1"),
            Err(WadError::OutOfBounds { what: "seg GL vertex", at: 5, limit: 1 })
        ));
    }

    #[test]
    fn subsector_run_past_segs_fails() {
        let image = gl_archive(
            &gl_vertex_bytes(b"gNd2", &[(0, 0)]),
            &gl_seg_bytes(&[[0, 0, 0xFFFF, 0, 0]]),
            &gl_subsector_bytes(&[(2, 0)]),
        );
        let wad = Wad::from_bytes(&image).unwrap();
        assert!(matches!(
            wad.read_gl_map("GL_E1M1"),
            Err(WadError::OutOfBounds { what: "subsector seg run", at: 2, limit: 1 })
        ));
    }

    #[test]
    fn missing_gl_marker_is_not_found() {
        let image = build_archive(b"PWAD", &[("E1M1", b"")]);
        let wad = Wad::from_bytes(&image).unwrap();
        assert!(matches!(
            wad.read_gl_map("GL_E1M1"),
            Err(WadError::NotFound(name)) if name == "GL_E1M1"
        ));
    }

    #[test]
    fn partial_trailing_seg_dropped() {
        let mut segs = gl_seg_bytes(&[[0, 0, 0xFFFF, 0, 0]]);
        segs.extend_from_slice(&[1, 2, 3]);
        let image = gl_archive(&gl_vertex_bytes(b"gNd2", &[(0, 0)]), &segs, b"");
        let wad = Wad::from_bytes(&image).unwrap();
        let gl = wad.read_gl_map("GL_E1M1").unwrap();
        assert_eq!(gl.segments().len(), 1);
    }
}
