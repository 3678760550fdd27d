use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::warn;

use crate::bytes::{self, read_array, read_u32};
use crate::error::WadError;

/// One named blob of bytes pulled out of the archive.
///
/// The directory entry it came from looks like this on disk:
///
/// | Bytes     | Content                                      |
/// |-----------|----------------------------------------------|
/// | 0x00-0x03 | u32, offset of the lump data in the file     |
/// | 0x04-0x07 | u32, size of the lump data in bytes          |
/// | 0x08-0x0F | 8 ASCII chars, lump name padded with NULs    |
///
/// The offset is resolved at load time so a `Lump` owns its bytes and
/// has no remaining tie to the file image.
pub struct Lump {
    /// Directory name with the NUL padding stripped
    pub name: String,
    /// The raw lump bytes, copied out of the archive
    pub data: Vec<u8>,
}

impl Lump {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, WadError> {
        bytes::read_u16(&self.data, offset)
    }

    pub fn read_i16(&self, offset: usize) -> Result<i16, WadError> {
        bytes::read_i16(&self.data, offset)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, WadError> {
        bytes::read_u32(&self.data, offset)
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32, WadError> {
        bytes::read_i32(&self.data, offset)
    }

    /// Decode this lump as an array of fixed-size records. `func` is called
    /// with the byte offset of each record start. The record count is
    /// `size / record_size` rounded down, so a partial trailing record is
    /// ignored rather than rejected.
    pub fn decode_records<T, F>(&self, record_size: usize, mut func: F) -> Result<Vec<T>, WadError>
    where
        F: FnMut(usize) -> Result<T, WadError>,
    {
        let count = self.data.len() / record_size;
        let mut v = Vec::with_capacity(count);
        for i in 0..count {
            v.push(func(i * record_size)?);
        }
        Ok(v)
    }
}

impl fmt::Debug for Lump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lump {{ name: {}, size: {} }}", self.name, self.size())
    }
}

/// Header which tells us the archive type and where the directory is
///
/// | Bytes     | Content                                     |
/// |-----------|---------------------------------------------|
/// | 0x00-0x03 | 4 ASCII chars, either "IWAD" or "PWAD"      |
/// | 0x04-0x07 | u32, number of entries in the directory     |
/// | 0x08-0x0B | u32, offset in bytes to the directory       |
struct WadHeader {
    wad_type: [u8; 4],
    dir_count: u32,
    dir_offset: u32,
}

/// An archive loaded fully into memory, with every lump's bytes copied
/// out of the file image.
///
/// Lump order follows the on-disk directory and is meaningful: map data
/// lumps are located by their offset from a named marker lump.
pub struct Wad {
    wad_type: [u8; 4],
    lumps: Vec<Lump>,
}

impl fmt::Debug for Wad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Wad {{ wad_type: {}, lumps: {} }}",
            self.id_str(),
            self.lumps.len()
        )
    }
}

impl Wad {
    /// Read an archive from disk and decode its directory.
    ///
    /// A missing file maps to [`WadError::NotFound`] with the path in the
    /// message; any other filesystem failure passes through as
    /// [`WadError::Io`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Wad, WadError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                WadError::NotFound(path.display().to_string())
            } else {
                WadError::Io(e)
            }
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Wad::from_bytes(&data)
    }

    /// Decode an archive from a complete in-memory file image.
    pub fn from_bytes(data: &[u8]) -> Result<Wad, WadError> {
        if data.len() < 12 {
            return Err(WadError::Truncated(data.len()));
        }
        let header = WadHeader {
            wad_type: read_array(data, 0)?,
            dir_count: read_u32(data, 4)?,
            dir_offset: read_u32(data, 8)?,
        };

        if &header.wad_type != b"IWAD" && &header.wad_type != b"PWAD" {
            warn!(
                "unrecognised archive id {:?}, continuing anyway",
                String::from_utf8_lossy(&header.wad_type)
            );
        }

        // A hostile dir_count can't force a huge allocation: entries are
        // 16 bytes each so the file length caps how many can exist.
        let capacity = (header.dir_count as usize).min(data.len() / 16);
        let mut lumps = Vec::with_capacity(capacity);

        for i in 0..header.dir_count as usize {
            let entry = header.dir_offset as usize + i * 16;
            let lump_offset = read_u32(data, entry)? as usize;
            let lump_size = read_u32(data, entry + 4)? as usize;
            let name_bytes: [u8; 8] = read_array(data, entry + 8)?;
            let name = String::from_utf8_lossy(&name_bytes)
                .trim_end_matches('\u{0}')
                .to_string();

            let end = lump_offset
                .checked_add(lump_size)
                .filter(|end| *end <= data.len())
                .ok_or(WadError::OutOfBounds {
                    what: "lump data",
                    at: lump_offset,
                    limit: data.len(),
                })?;

            lumps.push(Lump {
                name,
                data: data[lump_offset..end].to_vec(),
            });
        }

        Ok(Wad {
            wad_type: header.wad_type,
            lumps,
        })
    }

    /// Directory index of the first lump with this exact name, if any.
    /// Names are matched case-sensitively; duplicates resolve to the
    /// earliest entry.
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.lumps.iter().position(|lump| lump.name == name)
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.find_lump(name).is_some()
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn lump(&self, index: usize) -> Option<&Lump> {
        self.lumps.get(index)
    }

    /// Like [`Wad::lump`] but an out-of-range index is an error. Used by
    /// the map decoders, where a marker too close to the directory end
    /// means the expected data lumps are missing.
    pub(crate) fn lump_at(&self, index: usize) -> Result<&Lump, WadError> {
        self.lumps.get(index).ok_or(WadError::OutOfBounds {
            what: "directory index",
            at: index,
            limit: self.lumps.len(),
        })
    }

    pub fn id(&self) -> [u8; 4] {
        self.wad_type
    }

    /// The archive id as text, with any non-ASCII bytes replaced
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.wad_type).to_string()
    }
}
