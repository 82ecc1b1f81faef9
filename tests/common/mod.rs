#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

/// Builds savestate images chunk by chunk.
pub struct SavestateBuilder {
    data: Vec<u8>,
}

impl SavestateBuilder {
    pub fn new(version: u32, tool_name: &str, tool_version: &str, description: &str) -> Self {
        let mut data = b"ASF ".to_vec();
        data.extend_from_slice(&version.to_be_bytes());
        for text in [tool_name, tool_version, description] {
            data.extend_from_slice(text.as_bytes());
            data.push(0);
        }
        SavestateBuilder { data }
    }

    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.data.extend_from_slice(tag);
        self.data.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
        self.data.extend_from_slice(payload);
        self
    }

    pub fn end(self) -> Self {
        self.chunk(b"END ", &[])
    }

    /// Append raw bytes, e.g. a chunk header with a bogus size.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

pub fn be(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_be_bytes()).collect()
}

pub fn create_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join(format!("test-{label}-{}-{nanos}", process::id()));
    fs::create_dir_all(&dir).expect("Create temp dir");
    dir
}

pub fn write_file(path: &Path, contents: &[u8]) {
    fs::write(path, contents).expect("Write test file");
}
