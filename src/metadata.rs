use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::asf_parser::AsfHeader;
use crate::chunk_decoder::DecodedChunks;

const BYTES_PER_KB: u32 = 1024;

/// Custom chip generation recorded in the `CHIP` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Chipset {
    #[serde(rename = "OCS")]
    Ocs,
    #[serde(rename = "ECS")]
    Ecs,
    #[serde(rename = "AGA")]
    Aga,
}

impl Chipset {
    /// Bit 2 selects AGA; either of bits 0-1 selects ECS.
    pub fn from_flags(flags: u32) -> Self {
        if flags & 0b100 != 0 {
            Chipset::Aga
        } else if flags & 0b011 != 0 {
            Chipset::Ecs
        } else {
            Chipset::Ocs
        }
    }
}

impl fmt::Display for Chipset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chipset::Ocs => "OCS",
            Chipset::Ecs => "ECS",
            Chipset::Aga => "AGA",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    /// Processor name such as "68020".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Raw CPU flags word. Decoded but not part of the serialized report.
    #[serde(skip)]
    pub flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chipset: Option<Chipset>,
}

impl CpuInfo {
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.flags.is_none() && self.fpu.is_none() && self.chipset.is_none()
    }
}

/// Kickstart ROM descriptor from the `ROM ` chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RomInfo {
    pub start: u32,
    pub size: u32,
    #[serde(rename = "type")]
    pub rom_type: u32,
    pub flags: u32,
    pub version: u16,
    pub revision: u16,
    /// Eight uppercase hex digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Memory bank sizes in KB. Zero means the bank is absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub chip: u32,
    pub bogo: u32,
    pub fast: u32,
    pub z3: u32,
}

/// Memory bank sizes in bytes, as stored in the RAM chunks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBanks {
    pub chip: u32,
    pub bogo: u32,
    pub fast: u32,
    pub z3: u32,
}

impl MemoryBanks {
    pub fn is_empty(&self) -> bool {
        self.chip == 0 && self.bogo == 0 && self.fast == 0 && self.z3 == 0
    }

    pub fn to_kilobytes(self) -> MemoryInfo {
        MemoryInfo {
            chip: self.chip / BYTES_PER_KB,
            bogo: self.bogo / BYTES_PER_KB,
            fast: self.fast / BYTES_PER_KB,
            z3: self.z3 / BYTES_PER_KB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskInfo {
    /// Drive number, serialized as "DF<n>".
    #[serde(serialize_with = "serialize_drive")]
    pub drive: u8,
    pub id: u32,
    pub state: u8,
    pub track: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DiskInfo {
    pub fn drive_name(&self) -> String {
        format!("DF{}", self.drive)
    }

    pub fn motor_on(&self) -> bool {
        self.state & 1 != 0
    }
}

fn serialize_drive<S: Serializer>(drive: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("DF{drive}"))
}

/// Everything recovered from one savestate file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMetadata {
    pub file: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
    #[serde(rename = "version", skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
    #[serde(rename = "emulator", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(rename = "emulator_version", skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rom: Option<RomInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<DiskInfo>,
    pub chunks: Vec<String>,
}

impl DecodedMetadata {
    /// Merge file identity, header fields and decoder output into the final
    /// result. Memory is reported only when at least one bank is nonzero.
    pub fn assemble(path: &Path, size_bytes: usize, header: AsfHeader, decoded: DecodedChunks) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let cpu = (!decoded.cpu.is_empty()).then_some(decoded.cpu);
        let memory = (!decoded.memory.is_empty()).then(|| decoded.memory.to_kilobytes());

        DecodedMetadata {
            file: path.to_path_buf(),
            filename,
            size_bytes: size_bytes as u64,
            format_version: header.format_version,
            tool_name: header.tool_name,
            tool_version: header.tool_version,
            description: header.description,
            cpu,
            rom: decoded.rom,
            memory,
            disks: decoded.disks,
            chunks: decoded.tags,
        }
    }
}
