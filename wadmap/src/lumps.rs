//! Record types decoded from the per-map lumps, and the canonical lump
//! ordering that locates each record array relative to its map marker.

/// Offsets of the standard data lumps relative to a map marker lump.
///
/// A map is stored as a zero-size marker (`E1M1`) followed by its data
/// lumps in this exact order, so `marker_index + MapLump::Vertexes as
/// usize` is always the vertex lump.
#[derive(Debug, Copy, Clone)]
pub enum MapLump {
    /// Position, angle and type for every monster, powerup and spawn spot
    Things = 1,
    /// Lines connecting two vertices, pointing at one or two `SideDef`s
    /// depending on whether the line is a wall or a portal
    LineDefs,
    /// Per-side wall texture data; ties a linedef side to its `Sector`
    SideDefs,
    /// Signed 16-bit X, Y pairs. All map geometry indexes this array
    Vertexes,
    /// Portions of linedefs cut during binary space partitioning
    Segs,
    /// Runs of segs forming convex subspaces
    SSectors,
    /// The BSP tree over segs and subsectors
    Nodes,
    /// Floor and ceiling heights and light level for each enclosed area
    Sectors,
    /// Sector-to-sector visibility matrix
    Reject,
    /// Grid partition of the linedefs for collision tests
    Blockmap,
}

/// Offsets of the GL-nodes data lumps relative to a GL marker lump
/// (`GL_E1M1`). Same marker-plus-offset scheme as [`MapLump`].
#[derive(Debug, Copy, Clone)]
pub enum GlLump {
    /// Extra vertices introduced by the GL node builder, in 16.16
    /// fixed-point
    Vertexes = 1,
    /// GL segs: linedef fragments plus the extra miniseg edges closing
    /// each subsector
    Segs,
    /// Runs of GL segs forming closed convex polygons
    SSectors,
}

/// Attribute bits from a linedef's flags field.
#[derive(Debug, Copy, Clone)]
pub enum LineDefFlags {
    /// Blocks players and monsters
    Blocking = 1,
    /// Blocks monsters only
    BlockMonsters = 1 << 1,
    /// The line has both a front and a back sidedef
    TwoSided = 1 << 2,
    /// Upper texture drawn from the top down
    UnpegTop = 1 << 3,
    /// Lower and middle textures drawn from the bottom up
    UnpegBottom = 1 << 4,
    /// Shown as one-sided on the automap
    Secret = 1 << 5,
    /// Blocks sound propagation
    SoundBlock = 1 << 6,
    /// Never drawn on the automap
    DontDraw = 1 << 7,
    /// Drawn on the automap before being seen
    Mapped = 1 << 8,
}

/// A line between two vertices, the basic unit of map geometry.
///
/// The record in the WAD lump is structured as follows:
///
/// | Bytes     | Type | Content                                   |
/// |-----------|------|-------------------------------------------|
/// | 0x00-0x01 | u16  | Start vertex                              |
/// | 0x02-0x03 | u16  | End vertex                                |
/// | 0x04-0x05 | u16  | Flags, see [`LineDefFlags`]               |
/// | 0x06-0x07 | u16  | Special / action type                     |
/// | 0x08-0x09 | u16  | Sector tag                                |
/// | 0x0A-0x0B | u16  | Front (right) sidedef                     |
/// | 0x0C-0x0D | u16  | Back (left) sidedef, 0xFFFF when missing  |
///
/// Each record is 14 bytes. The special and tag fields are not carried:
/// they drive gameplay behaviour, not geometry.
///
/// A linedef always has a front side. If you imagine the line running
/// from the bottom of the screen upwards, the front is on the right.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineDef {
    /// The line starts at this index into the map's vertex array
    pub start_vertex: u16,
    /// The line ends at this index into the map's vertex array
    pub end_vertex: u16,
    /// Attribute bits, see [`LineDefFlags`]
    pub flags: u16,
    /// Index of the front (right) sidedef, always present
    pub front_sidedef: u16,
    /// Index of the back (left) sidedef. Only meaningful when
    /// [`LineDef::is_two_sided`] holds; one-sided lines carry 0xFFFF or
    /// garbage here
    pub back_sidedef: u16,
}

impl LineDef {
    pub fn is_two_sided(&self) -> bool {
        self.flags & LineDefFlags::TwoSided as u16 != 0
    }
}

/// One side of a linedef.
///
/// On disk a sidedef record is 30 bytes: two i16 texture offsets, three
/// 8 byte texture names, and a trailing u16 sector index. Only the
/// sector link matters for geometry so the texture fields are skipped
/// during decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SideDef {
    /// Index of the sector this side faces into
    pub sector: u16,
}

/// An enclosed area of the map with a floor and a ceiling.
///
/// The record in the WAD lump is structured as follows:
///
/// | Bytes     | Type     | Content                  |
/// |-----------|----------|--------------------------|
/// | 0x00-0x01 | i16      | Floor height             |
/// | 0x02-0x03 | i16      | Ceiling height           |
/// | 0x04-0x0B | 8 ASCII  | Floor texture (skipped)  |
/// | 0x0C-0x13 | 8 ASCII  | Ceiling texture (skipped)|
/// | 0x14-0x15 | i16      | Light level              |
/// | 0x16-0x17 | i16      | Special type (skipped)   |
/// | 0x18-0x19 | i16      | Tag (skipped)            |
///
/// Each record is 26 bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sector {
    pub floor_height: i16,
    pub ceil_height: i16,
    pub light_level: i16,
}

/// A vertex index carried by a GL seg, which can point into either the
/// map's own vertex array or the extra GL vertex array.
///
/// The raw u16 uses bit 15 as the discriminant: set means the low 15
/// bits index the map vertices, clear means they index the GL vertices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GLVertexRef {
    /// Index into the GL-map's own vertex array
    Gl(u16),
    /// Index into the gameplay map's vertex array
    Map(u16),
}

impl GLVertexRef {
    pub fn from_raw(raw: u16) -> GLVertexRef {
        if raw & 0x8000 != 0 {
            GLVertexRef::Map(raw & 0x7FFF)
        } else {
            GLVertexRef::Gl(raw)
        }
    }
}

/// Sentinel in a GL seg's linedef field marking a miniseg, an edge
/// invented by the node builder to close a subsector polygon.
pub const NO_LINEDEF: u16 = 0xFFFF;

/// One edge of a subsector polygon.
///
/// The record in the GL segs lump is structured as follows:
///
/// | Bytes     | Type | Content                                  |
/// |-----------|------|------------------------------------------|
/// | 0x00-0x01 | u16  | Start vertex, see [`GLVertexRef`]        |
/// | 0x02-0x03 | u16  | End vertex, see [`GLVertexRef`]          |
/// | 0x04-0x05 | u16  | Source linedef, 0xFFFF for a miniseg     |
/// | 0x06-0x07 | u16  | Side of that linedef, 0 front 1 back     |
/// | 0x08-0x09 | u16  | Partner seg (skipped)                    |
///
/// Each record is 10 bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GLSegment {
    pub start_vertex: GLVertexRef,
    pub end_vertex: GLVertexRef,
    /// The linedef this seg was cut from, or `None` for a miniseg
    pub linedef: Option<u16>,
    /// 0 when the seg runs along the linedef's front side, 1 for back
    pub side: u16,
}

/// A convex polygon leaf of the GL BSP, stored as a contiguous run of
/// GL segs. The record is two u16s: seg count then first seg index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GLSubSector {
    pub seg_count: u16,
    pub start_seg: u16,
}
