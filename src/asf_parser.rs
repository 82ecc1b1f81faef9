use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::asf_reader::{latin1_to_string, read_cstring, read_u32_be};
use crate::chunk_decoder::{self, DecodedChunks};
use crate::error::{Result, SavestateError};
use crate::metadata::DecodedMetadata;

/// The "AmigaStateFile" identifier at the start of every savestate.
pub const ASF_MAGIC: [u8; 4] = *b"ASF ";
/// 4 bytes tag + 4 bytes big-endian size.
pub const CHUNK_HEADER_SIZE: usize = 8;
/// Tag of the chunk that ends the stream.
pub const END_TAG: [u8; 4] = *b"END ";

const MAGIC_SIZE: usize = 4;
const VERSION_SIZE: usize = 4;
const HEADER_STRING_COUNT: usize = 3;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AsfHeader {
    /// Always equal to [`ASF_MAGIC`] once parsed.
    pub magic: [u8; MAGIC_SIZE],
    pub format_version: Option<u32>,
    /// Name of the emulator that wrote the file.
    pub tool_name: Option<String>,
    pub tool_version: Option<String>,
    /// Free-text comment entered by the user.
    pub description: Option<String>,
}

impl AsfHeader {
    /// Parse the file header and return it with the offset of the first chunk.
    ///
    /// Only a missing magic is an error. A header string without terminator
    /// ends header parsing and leaves that field and the following ones unset.
    pub fn parse(buffer: &[u8]) -> Result<(AsfHeader, usize)> {
        if buffer.len() < MAGIC_SIZE || buffer[..MAGIC_SIZE] != ASF_MAGIC {
            return Err(SavestateError::MalformedInput("missing ASF header".to_string()));
        }

        let mut header = AsfHeader {
            magic: ASF_MAGIC,
            ..AsfHeader::default()
        };
        let mut offset = MAGIC_SIZE;
        if offset + VERSION_SIZE > buffer.len() {
            return Ok((header, offset));
        }
        header.format_version = Some(read_u32_be(buffer, offset));
        offset += VERSION_SIZE;

        let mut strings = Vec::with_capacity(HEADER_STRING_COUNT);
        while strings.len() < HEADER_STRING_COUNT && offset < buffer.len() {
            let (text, consumed) = read_cstring(buffer, offset);
            if consumed == 0 {
                log::debug!("unterminated header string at {:#x}", offset);
                break;
            }
            strings.push(text);
            offset += consumed;
        }
        let mut strings = strings.into_iter();
        header.tool_name = strings.next();
        header.tool_version = strings.next();
        header.description = strings.next();

        Ok((header, offset))
    }
}

/// One tagged, length-prefixed record of the chunk stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    pub tag: [u8; 4],
    /// Offset of the chunk header from the start of the file.
    pub offset: usize,
    /// Size of the whole chunk, header included.
    pub total_size: u32,
    pub payload: &'a [u8],
}

impl Chunk<'_> {
    pub fn tag_name(&self) -> String {
        latin1_to_string(&self.tag)
    }

    pub fn is_end(&self) -> bool {
        self.tag == END_TAG
    }
}

/// Iterates the chunks that follow the header.
///
/// Iteration ends after the `END ` chunk, or silently at the first chunk whose
/// declared size is zero or runs past the end of the buffer.
pub struct ChunkWalker<'a> {
    buffer: &'a [u8],
    offset: usize,
    finished: bool,
}

impl<'a> ChunkWalker<'a> {
    pub fn new(buffer: &'a [u8], start: usize) -> Self {
        ChunkWalker {
            buffer,
            offset: start,
            finished: false,
        }
    }

    /// Offset of the next chunk header.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        if self.finished || self.offset + CHUNK_HEADER_SIZE > self.buffer.len() {
            self.finished = true;
            return None;
        }

        let offset = self.offset;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.buffer[offset..offset + 4]);
        let total_size = read_u32_be(self.buffer, offset + 4);
        let remaining = self.buffer.len() - offset;

        if total_size == 0 {
            log::debug!("zero-sized chunk {:?} at {:#x}, stopping", latin1_to_string(&tag), offset);
            self.finished = true;
            return None;
        }
        if total_size as usize > remaining {
            log::debug!(
                "chunk {:?} at {:#x} declares {} bytes but only {} remain, stopping",
                latin1_to_string(&tag),
                offset,
                total_size,
                remaining
            );
            self.finished = true;
            return None;
        }

        let end = offset + total_size as usize;
        let payload = self.buffer.get(offset + CHUNK_HEADER_SIZE..end).unwrap_or(&[]);
        let chunk = Chunk {
            tag,
            offset,
            total_size,
            payload,
        };

        if chunk.is_end() {
            self.finished = true;
        } else {
            self.offset = end;
        }
        Some(chunk)
    }
}

/// Structural view of one chunk, without decoding its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkDirectoryEntry {
    #[serde(rename = "name")]
    pub tag: String,
    pub offset: usize,
    #[serde(rename = "size")]
    pub total_size: u32,
    #[serde(rename = "data_size")]
    pub payload_size: u32,
}

impl From<&Chunk<'_>> for ChunkDirectoryEntry {
    fn from(chunk: &Chunk<'_>) -> Self {
        ChunkDirectoryEntry {
            tag: chunk.tag_name(),
            offset: chunk.offset,
            total_size: chunk.total_size,
            payload_size: chunk.total_size.saturating_sub(CHUNK_HEADER_SIZE as u32),
        }
    }
}

/// Decode a savestate already held in memory. `path` only provides the file
/// identity reported in the result.
pub fn inspect_bytes(path: &Path, buffer: &[u8]) -> Result<DecodedMetadata> {
    let (header, start) = AsfHeader::parse(buffer)?;
    let mut decoded = DecodedChunks::default();
    for chunk in ChunkWalker::new(buffer, start) {
        chunk_decoder::dispatch(&chunk, &mut decoded);
    }
    log::debug!("decoded {} chunks from {}", decoded.tags.len(), path.display());
    Ok(DecodedMetadata::assemble(path, buffer.len(), header, decoded))
}

/// Read and decode the savestate at `path`.
pub fn inspect(path: &Path) -> Result<DecodedMetadata> {
    let buffer = read_savestate(path)?;
    inspect_bytes(path, &buffer)
}

/// List the chunk directory of an in-memory savestate.
pub fn list_chunks_bytes(buffer: &[u8]) -> Result<Vec<ChunkDirectoryEntry>> {
    let (_, start) = AsfHeader::parse(buffer)?;
    Ok(ChunkWalker::new(buffer, start)
        .map(|chunk| ChunkDirectoryEntry::from(&chunk))
        .collect())
}

/// List the chunk directory of the savestate at `path`.
pub fn list_chunks(path: &Path) -> Result<Vec<ChunkDirectoryEntry>> {
    let buffer = read_savestate(path)?;
    list_chunks_bytes(&buffer)
}

fn read_savestate(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(SavestateError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}
