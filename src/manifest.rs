//! Chunk naming, layout math, and the manifest record.
//!
//! A file larger than the chunk threshold is stored as consecutive chunk
//! objects plus one manifest describing how they map back to the original.

use serde::{Deserialize, Serialize};

/// One chunk of a large file, as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    /// Chunk object name with a leading `/`, e.g. `/movie.bin_000002`.
    pub filename: String,
    /// Byte offset of this chunk in the original file.
    pub offset: u64,
    pub size: u64,
}

/// Manifest uploaded to the `fileinfo` route after every chunk of a
/// multi-chunk upload has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub filename: String,
    pub filesize: u64,
    pub chunksize: u64,
    pub chunks: Vec<ChunkInfo>,
}

impl ChunkManifest {
    /// Builds the manifest for `filename` of `filesize` bytes split at
    /// `chunksize`. Offsets increase by exactly `chunksize`; every chunk is
    /// `chunksize` bytes except the last, which holds the remainder.
    pub fn build(filename: &str, filesize: u64, chunksize: u64) -> ChunkManifest {
        let count = chunk_count(filesize, chunksize);
        let chunks = (0..count)
            .map(|index| ChunkInfo {
                filename: format!("/{}", chunk_name(filename, index)),
                offset: index * chunksize,
                size: chunk_len(filesize, chunksize, index),
            })
            .collect();
        ChunkManifest {
            filename: filename.to_string(),
            filesize,
            chunksize,
            chunks,
        }
    }
}

/// Object name for chunk `index`: `{base}_{index:06}`. Also applied to the
/// chunk upload URI, whose query ends in the base name.
pub fn chunk_name(base: &str, index: u64) -> String {
    format!("{}_{:06}", base, index)
}

/// ⌈total / chunk_size⌉.
pub fn chunk_count(total: u64, chunk_size: u64) -> u64 {
    total.div_ceil(chunk_size)
}

/// Size of chunk `index` for a `total`-byte file split at `chunk_size`.
pub fn chunk_len(total: u64, chunk_size: u64, index: u64) -> u64 {
    chunk_size.min(total - index * chunk_size)
}
