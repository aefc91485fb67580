//! Interned constant pools: `ints`, `int64s`, `floats`, `strings`, `bytes`,
//! `debug_files`. Every pool is addressed by a stable, load-order index
//! (spec.md §3.1); this module only knows how to read/write the pools
//! themselves, not how other parts of the module reference into them.

use crate::error::DecodeError;
use crate::varint::{Reader, Writer};

/// The string and debug-file pools share one on-disk shape: a 4-byte blob
/// length, the UTF-8 blob itself, then one VarInt length per string that
/// slices the blob into its entries (spec.md §6.1).
pub fn read_string_pool(r: &mut Reader<'_>, count: usize) -> Result<Vec<String>, DecodeError> {
    let blob_len = r.read_u32_le()? as usize;
    let blob = r.read_bytes(blob_len)?.to_vec();
    let mut strings = Vec::with_capacity(count);
    let mut pos = 0usize;
    for _ in 0..count {
        let len = r.read_index()? as usize;
        let end = pos
            .checked_add(len)
            .filter(|&end| end <= blob.len())
            .ok_or(DecodeError::MalformedInput {
                offset: r.offset(),
                reason: "string pool entry overruns blob",
            })?;
        let s = String::from_utf8(blob[pos..end].to_vec()).map_err(|_| {
            DecodeError::MalformedInput {
                offset: r.offset(),
                reason: "invalid utf-8 in string pool",
            }
        })?;
        strings.push(s);
        pos = end;
    }
    Ok(strings)
}

pub fn write_string_pool(w: &mut Writer, strings: &[String]) {
    let blob: Vec<u8> = strings.iter().flat_map(|s| s.as_bytes().to_vec()).collect();
    w.write_u32_le(blob.len() as u32);
    w.write_bytes(&blob);
    for s in strings {
        w.write_index(s.len() as u32);
    }
}

/// The bytes pool: a 4-byte blob length, the raw blob, then one VarInt
/// *starting position* per entry (spec.md §6.1). An entry's length is the
/// distance to the next entry's position, or to the blob's end for the last
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytesPool {
    pub blob: Vec<u8>,
    pub positions: Vec<usize>,
}

impl BytesPool {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let start = *self.positions.get(index)?;
        let end = self
            .positions
            .get(index + 1)
            .copied()
            .unwrap_or(self.blob.len());
        self.blob.get(start..end)
    }
}

pub fn read_bytes_pool(r: &mut Reader<'_>, count: usize) -> Result<BytesPool, DecodeError> {
    let blob_len = r.read_i32_le()? as usize;
    let blob = r.read_bytes(blob_len)?.to_vec();
    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        positions.push(r.read_index()? as usize);
    }
    Ok(BytesPool { blob, positions })
}

pub fn write_bytes_pool(w: &mut Writer, pool: &BytesPool) {
    w.write_i32_le(pool.blob.len() as i32);
    w.write_bytes(&pool.blob);
    for &pos in &pool.positions {
        w.write_index(pos as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_pool_roundtrip() {
        let strings = vec!["hello".to_string(), "".to_string(), "world!".to_string()];
        let mut w = Writer::new();
        write_string_pool(&mut w, &strings);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = read_string_pool(&mut r, strings.len()).unwrap();
        assert_eq!(back, strings);
    }

    #[test]
    fn bytes_pool_lookup() {
        let pool = BytesPool {
            blob: b"abcdefghij".to_vec(),
            positions: vec![0, 3, 7],
        };
        assert_eq!(pool.get(0), Some(&b"abc"[..]));
        assert_eq!(pool.get(1), Some(&b"defg"[..]));
        assert_eq!(pool.get(2), Some(&b"hij"[..]));
        assert_eq!(pool.get(3), None);
    }

    #[test]
    fn bytes_pool_roundtrip() {
        let pool = BytesPool {
            blob: b"xxyyyz".to_vec(),
            positions: vec![0, 2, 5],
        };
        let mut w = Writer::new();
        write_bytes_pool(&mut w, &pool);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = read_bytes_pool(&mut r, pool.positions.len()).unwrap();
        assert_eq!(back.blob, pool.blob);
        assert_eq!(back.positions, pool.positions);
    }
}
