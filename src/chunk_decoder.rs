use crate::asf_parser::Chunk;
use crate::asf_reader::{read_cstring, read_u16_be, read_u32_be};
use crate::metadata::{Chipset, CpuInfo, DiskInfo, MemoryBanks, RomInfo};

const CPU_CHUNK_MIN: usize = 8;
const FPU_CHUNK_MIN: usize = 4;
const CHIP_CHUNK_MIN: usize = 4;
const ROM_CHUNK_MIN: usize = 20;
/// ROM payloads at least this long carry a CRC; longer ones also carry an id.
const ROM_CRC_END: usize = 24;
const RAM_CHUNK_MIN: usize = 8;
const DISK_CHUNK_MIN: usize = 8;
/// Disk payloads longer than this carry the inserted image path.
const DISK_IMAGE_OFFSET: usize = 20;

/// Signature shared by every per-tag decoder.
pub type ChunkDecoder = fn(&Chunk<'_>, &mut DecodedChunks);

/// Accumulator filled in by the decoders during one walk.
#[derive(Debug, Default)]
pub struct DecodedChunks {
    pub cpu: CpuInfo,
    pub rom: Option<RomInfo>,
    /// Bank sizes in bytes.
    pub memory: MemoryBanks,
    pub disks: Vec<DiskInfo>,
    /// Every tag seen, in order.
    pub tags: Vec<String>,
}

/// Look up the decoder registered for `tag`. Unknown tags have none.
pub fn decoder_for(tag: &[u8; 4]) -> Option<ChunkDecoder> {
    let decoder: ChunkDecoder = match tag {
        b"CPU " => decode_cpu,
        b"FPU " => decode_fpu,
        b"CHIP" => decode_chipset,
        b"ROM " => decode_rom,
        b"CRAM" | b"BRAM" | b"FRAM" | b"ZRAM" => decode_ram,
        [b'D', b'S', b'K', digit] if digit.is_ascii_digit() => decode_disk,
        _ => return None,
    };
    Some(decoder)
}

/// Record the chunk's tag and run its decoder, if any.
pub fn dispatch(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    decoded.tags.push(chunk.tag_name());
    match decoder_for(&chunk.tag) {
        Some(decoder) => decoder(chunk, decoded),
        None => log::debug!("no decoder for chunk {:?} at {:#x}", chunk.tag_name(), chunk.offset),
    }
}

fn too_short(chunk: &Chunk<'_>, required: usize) -> bool {
    if chunk.payload.len() < required {
        log::debug!(
            "skipping chunk {:?} at {:#x}: payload {} bytes, need {}",
            chunk.tag_name(),
            chunk.offset,
            chunk.payload.len(),
            required
        );
        return true;
    }
    false
}

fn motorola_name(model: u32) -> String {
    format!("68{model:03}")
}

fn decode_cpu(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, CPU_CHUNK_MIN) {
        return;
    }
    decoded.cpu.model = Some(motorola_name(read_u32_be(chunk.payload, 0)));
    decoded.cpu.flags = Some(read_u32_be(chunk.payload, 4));
}

fn decode_fpu(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, FPU_CHUNK_MIN) {
        return;
    }
    let model = read_u32_be(chunk.payload, 0);
    if model != 0 {
        decoded.cpu.fpu = Some(motorola_name(model));
    }
}

fn decode_chipset(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, CHIP_CHUNK_MIN) {
        return;
    }
    decoded.cpu.chipset = Some(Chipset::from_flags(read_u32_be(chunk.payload, 0)));
}

fn decode_rom(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, ROM_CHUNK_MIN) {
        return;
    }
    let payload = chunk.payload;
    let crc = (payload.len() >= ROM_CRC_END)
        .then(|| format!("{:08X}", read_u32_be(payload, ROM_CRC_END - 4)));
    let id = if payload.len() > ROM_CRC_END {
        let (id, _) = read_cstring(payload, ROM_CRC_END);
        (!id.is_empty()).then_some(id)
    } else {
        None
    };

    decoded.rom = Some(RomInfo {
        start: read_u32_be(payload, 0),
        size: read_u32_be(payload, 4),
        rom_type: read_u32_be(payload, 8),
        flags: read_u32_be(payload, 12),
        version: read_u16_be(payload, 16),
        revision: read_u16_be(payload, 18),
        crc,
        id,
    });
}

/// The four RAM chunks share a layout: start address, then size in bytes.
fn decode_ram(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, RAM_CHUNK_MIN) {
        return;
    }
    let size = read_u32_be(chunk.payload, 4);
    let bank = match &chunk.tag {
        b"CRAM" => &mut decoded.memory.chip,
        b"BRAM" => &mut decoded.memory.bogo,
        b"FRAM" => &mut decoded.memory.fast,
        b"ZRAM" => &mut decoded.memory.z3,
        _ => return,
    };
    *bank = size;
}

fn decode_disk(chunk: &Chunk<'_>, decoded: &mut DecodedChunks) {
    if too_short(chunk, DISK_CHUNK_MIN) {
        return;
    }
    let payload = chunk.payload;
    let image = if payload.len() > DISK_IMAGE_OFFSET {
        let (image, _) = read_cstring(payload, DISK_IMAGE_OFFSET);
        (!image.is_empty()).then_some(image)
    } else {
        None
    };

    decoded.disks.push(DiskInfo {
        drive: chunk.tag[3] - b'0',
        id: read_u32_be(payload, 0),
        state: payload[4],
        track: payload[5],
        image,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk<'a>(tag: &[u8; 4], payload: &'a [u8]) -> Chunk<'a> {
        Chunk {
            tag: *tag,
            offset: 0,
            total_size: (payload.len() + 8) as u32,
            payload,
        }
    }

    fn be(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_be_bytes()).collect()
    }

    fn decode(tag: &[u8; 4], payload: &[u8]) -> DecodedChunks {
        let mut decoded = DecodedChunks::default();
        dispatch(&chunk(tag, payload), &mut decoded);
        decoded
    }

    #[test]
    fn unknown_tags_are_recorded_only() {
        let decoded = decode(b"XYZW", &be(&[1, 2, 3]));
        assert_eq!(decoded.tags, vec!["XYZW"]);
        assert!(decoded.cpu.is_empty());
        assert!(decoded.rom.is_none());
        assert!(decoded.memory.is_empty());
        assert!(decoded.disks.is_empty());
    }

    #[test]
    fn cpu_model_is_zero_padded() {
        let decoded = decode(b"CPU ", &be(&[0, 0x55]));
        assert_eq!(decoded.cpu.model.as_deref(), Some("68000"));
        assert_eq!(decoded.cpu.flags, Some(0x55));

        let decoded = decode(b"CPU ", &be(&[40, 0]));
        assert_eq!(decoded.cpu.model.as_deref(), Some("68040"));
    }

    #[test]
    fn short_cpu_payload_is_ignored() {
        let decoded = decode(b"CPU ", &be(&[20]));
        assert!(decoded.cpu.model.is_none());
        assert_eq!(decoded.tags, vec!["CPU "]);
    }

    #[test]
    fn zero_fpu_is_absent() {
        assert!(decode(b"FPU ", &be(&[0])).cpu.fpu.is_none());
        assert_eq!(decode(b"FPU ", &be(&[881])).cpu.fpu.as_deref(), Some("68881"));
    }

    #[test]
    fn chipset_from_flags() {
        assert_eq!(decode(b"CHIP", &be(&[4])).cpu.chipset, Some(Chipset::Aga));
        assert_eq!(decode(b"CHIP", &be(&[2])).cpu.chipset, Some(Chipset::Ecs));
        assert_eq!(decode(b"CHIP", &be(&[0])).cpu.chipset, Some(Chipset::Ocs));
    }

    #[test]
    fn rom_without_crc() {
        let mut payload = be(&[0xF8_0000, 0x8_0000, 0, 0]);
        payload.extend_from_slice(&[0, 40, 0, 68]);
        let rom = decode(b"ROM ", &payload).rom.unwrap();
        assert_eq!(rom.start, 0xF8_0000);
        assert_eq!(rom.size, 0x8_0000);
        assert_eq!(rom.version, 40);
        assert_eq!(rom.revision, 68);
        assert!(rom.crc.is_none());
        assert!(rom.id.is_none());
    }

    #[test]
    fn rom_with_crc_and_id() {
        let mut payload = be(&[0xF8_0000, 0x8_0000, 1, 2]);
        payload.extend_from_slice(&[0, 40, 0, 68]);
        payload.extend_from_slice(&be(&[0x1483_A091]));
        payload.extend_from_slice(b"KS ROM v3.1 (A1200)\0");
        let rom = decode(b"ROM ", &payload).rom.unwrap();
        assert_eq!(rom.rom_type, 1);
        assert_eq!(rom.flags, 2);
        assert_eq!(rom.crc.as_deref(), Some("1483A091"));
        assert_eq!(rom.id.as_deref(), Some("KS ROM v3.1 (A1200)"));
    }

    #[test]
    fn rom_crc_is_uppercase_and_padded() {
        let mut payload = be(&[0, 0, 0, 0, 0]);
        payload.extend_from_slice(&be(&[0xab]));
        assert_eq!(decode(b"ROM ", &payload).rom.unwrap().crc.as_deref(), Some("000000AB"));
    }

    #[test]
    fn rom_unterminated_id_is_absent() {
        let mut payload = be(&[0, 0, 0, 0, 0, 0]);
        payload.extend_from_slice(b"abc");
        assert!(decode(b"ROM ", &payload).rom.unwrap().id.is_none());
    }

    #[test]
    fn ram_chunks_fill_their_banks() {
        let mut decoded = DecodedChunks::default();
        for (tag, size) in [(b"CRAM", 0x20_0000), (b"BRAM", 0x8_0000), (b"FRAM", 0x80_0000), (b"ZRAM", 0x100_0000)] {
            dispatch(&chunk(tag, &be(&[0, size])), &mut decoded);
        }
        assert_eq!(
            decoded.memory,
            MemoryBanks {
                chip: 0x20_0000,
                bogo: 0x8_0000,
                fast: 0x80_0000,
                z3: 0x100_0000,
            }
        );
    }

    #[test]
    fn disk_with_image_path() {
        let mut payload = be(&[0xFFFF_FFFF]);
        payload.extend_from_slice(&[1, 79]);
        payload.resize(20, 0);
        payload.extend_from_slice(b"/floppies/Turrican.adf\0");
        let decoded = decode(b"DSK2", &payload);
        assert_eq!(
            decoded.disks,
            vec![DiskInfo {
                drive: 2,
                id: 0xFFFF_FFFF,
                state: 1,
                track: 79,
                image: Some("/floppies/Turrican.adf".to_string()),
            }]
        );
    }

    #[test]
    fn disk_without_image() {
        let mut payload = be(&[0]);
        payload.extend_from_slice(&[0, 3, 0, 0]);
        let disk = &decode(b"DSK0", &payload).disks[0];
        assert_eq!(disk.drive, 0);
        assert_eq!(disk.track, 3);
        assert!(disk.image.is_none());
    }

    #[test]
    fn non_digit_disk_tag_is_unknown() {
        let decoded = decode(b"DSKX", &be(&[0, 0, 0]));
        assert!(decoded.disks.is_empty());
        assert_eq!(decoded.tags, vec!["DSKX"]);
    }
}
