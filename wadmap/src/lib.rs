//! Decoding for WAD archives and the level data stored inside them.
//!
//! A WAD is a flat container of named binary blobs ("lumps"). The file
//! starts with a 12 byte header:
//!
//! | Bytes     | Content                                        |
//! |-----------|------------------------------------------------|
//! | 0x00-0x03 | ASCII archive id, `IWAD` or `PWAD`             |
//! | 0x04-0x07 | u32, number of lumps                           |
//! | 0x08-0x0B | u32, byte offset of the directory              |
//!
//! The directory is an array of 16 byte entries, one per lump: a u32 data
//! offset, a u32 size, and an 8 byte NUL-padded name. Lump order follows
//! the directory and is meaningful: a map is stored as a named marker lump
//! (`E1M1`) followed by its data lumps at fixed relative offsets, and a
//! GL-nodes map (`GL_E1M1`) works the same way.
//!
//! [`Wad`] loads the container, [`Wad::read_map`] decodes the gameplay
//! geometry and [`Wad::read_gl_map`] decodes the GL tessellation data.
//! Both produce owned value objects with no remaining tie to the archive.

pub use glam::Vec2;

pub use crate::error::WadError;
pub use crate::glmap::{GLMap, gl_name};
pub use crate::lumps::{
    GLSegment, GLSubSector, GLVertexRef, GlLump, LineDef, LineDefFlags, MapLump, Sector, SideDef,
};
pub use crate::map::Map;
pub use crate::wad::{Lump, Wad};

/// Little-endian integer reads over byte buffers
pub mod bytes;

pub mod error;

/// The GLMap structure and decoder for GL-nodes lumps
pub mod glmap;

/// Record types for the per-map lumps, and the canonical lump ordering
pub mod lumps;

/// The Map structure and decoder for the gameplay lumps
pub mod map;

/// The WAD container: header, directory, and lump storage
pub mod wad;

/// A decoded 2D point in model space
pub type Vertex = Vec2;
