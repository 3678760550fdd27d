use glam::Vec2;
use log::debug;

use crate::Vertex;
use crate::error::WadError;
use crate::lumps::{LineDef, MapLump, Sector, SideDef};
use crate::wad::Wad;

const VERTEX_SIZE: usize = 4;
const LINEDEF_SIZE: usize = 14;
const SIDEDEF_SIZE: usize = 30;
const SECTOR_SIZE: usize = 26;

/// The gameplay geometry of one map: vertices, lines, sides and sectors,
/// plus the bounding box of the vertex cloud.
///
/// Produced by [`Wad::read_map`]. Every index stored in the record arrays
/// has been checked against the array it points into, so subscripting
/// with them cannot panic.
#[derive(Debug, Clone)]
pub struct Map {
    name: String,
    vertices: Vec<Vertex>,
    linedefs: Vec<LineDef>,
    sidedefs: Vec<SideDef>,
    sectors: Vec<Sector>,
    min: Vec2,
    max: Vec2,
}

impl Map {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Lowest X and Y over all vertices. Stays at positive infinity for
    /// a map with no vertices.
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Highest X and Y over all vertices. Stays at negative infinity for
    /// a map with no vertices.
    pub fn max(&self) -> Vec2 {
        self.max
    }
}

/// Fail with [`WadError::OutOfBounds`] when a decoded index can't
/// subscript the array it refers to.
pub(crate) fn check_index(what: &'static str, index: u16, limit: usize) -> Result<(), WadError> {
    if (index as usize) < limit {
        Ok(())
    } else {
        Err(WadError::OutOfBounds {
            what,
            at: index as usize,
            limit,
        })
    }
}

impl Wad {
    /// Decode the gameplay geometry of the map whose marker lump is
    /// `name`.
    ///
    /// The marker itself carries no data; the vertex, linedef, sidedef
    /// and sector lumps sit at fixed offsets after it. A marker close
    /// enough to the directory end that a data lump is missing decodes
    /// to [`WadError::OutOfBounds`], and an unknown name to
    /// [`WadError::NotFound`].
    pub fn read_map(&self, name: &str) -> Result<Map, WadError> {
        let marker = self
            .find_lump(name)
            .ok_or_else(|| WadError::NotFound(name.to_string()))?;

        let vertex_lump = self.lump_at(marker + MapLump::Vertexes as usize)?;
        let vertices = vertex_lump.decode_records(VERTEX_SIZE, |offset| {
            Ok(Vertex::new(
                vertex_lump.read_i16(offset)? as f32,
                vertex_lump.read_i16(offset + 2)? as f32,
            ))
        })?;

        let linedef_lump = self.lump_at(marker + MapLump::LineDefs as usize)?;
        let linedefs = linedef_lump.decode_records(LINEDEF_SIZE, |offset| {
            Ok(LineDef {
                start_vertex: linedef_lump.read_u16(offset)?,
                end_vertex: linedef_lump.read_u16(offset + 2)?,
                flags: linedef_lump.read_u16(offset + 4)?,
                front_sidedef: linedef_lump.read_u16(offset + 10)?,
                back_sidedef: linedef_lump.read_u16(offset + 12)?,
            })
        })?;

        let sidedef_lump = self.lump_at(marker + MapLump::SideDefs as usize)?;
        let sidedefs = sidedef_lump.decode_records(SIDEDEF_SIZE, |offset| {
            Ok(SideDef {
                sector: sidedef_lump.read_u16(offset + 28)?,
            })
        })?;

        let sector_lump = self.lump_at(marker + MapLump::Sectors as usize)?;
        let sectors = sector_lump.decode_records(SECTOR_SIZE, |offset| {
            Ok(Sector {
                floor_height: sector_lump.read_i16(offset)?,
                ceil_height: sector_lump.read_i16(offset + 2)?,
                light_level: sector_lump.read_i16(offset + 20)?,
            })
        })?;

        for line in &linedefs {
            check_index("linedef start vertex", line.start_vertex, vertices.len())?;
            check_index("linedef end vertex", line.end_vertex, vertices.len())?;
            check_index("linedef front sidedef", line.front_sidedef, sidedefs.len())?;
            if line.is_two_sided() {
                check_index("linedef back sidedef", line.back_sidedef, sidedefs.len())?;
            }
        }
        for side in &sidedefs {
            check_index("sidedef sector", side.sector, sectors.len())?;
        }

        let (min, max) = vertices.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        );

        debug!(
            "{name}: {} vertices, {} linedefs, {} sidedefs, {} sectors",
            vertices.len(),
            linedefs.len(),
            sidedefs.len(),
            sectors.len()
        );

        Ok(Map {
            name: name.to_string(),
            vertices,
            linedefs,
            sidedefs,
            sectors,
            min,
            max,
        })
    }
}
