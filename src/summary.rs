use crate::metadata::{DecodedMetadata, MemoryInfo};

/// Render a human-readable report of decoded savestate metadata, one fact per
/// line. Sections with nothing to show are left out.
pub fn summary(metadata: &DecodedMetadata) -> String {
    let mut lines = vec![
        format!("Savestate: {}", metadata.filename),
        format!("Size: {:.1} KB", metadata.size_bytes as f64 / 1024.0),
    ];

    if let Some(description) = non_empty(&metadata.description) {
        lines.push(format!("Description: {description}"));
    }

    if let Some(tool_name) = non_empty(&metadata.tool_name) {
        let mut creator = tool_name.to_string();
        if let Some(tool_version) = non_empty(&metadata.tool_version) {
            creator.push(' ');
            creator.push_str(tool_version);
        }
        lines.push(format!("Created by: {creator}"));
    }

    if let Some(cpu) = &metadata.cpu {
        let mut line = cpu.model.clone().unwrap_or_else(|| "Unknown".to_string());
        if let Some(fpu) = &cpu.fpu {
            line.push_str(&format!(" + {fpu} FPU"));
        }
        if let Some(chipset) = cpu.chipset {
            line.push_str(&format!(" ({chipset})"));
        }
        lines.push(format!("CPU: {line}"));
    }

    if let Some(memory) = &metadata.memory {
        let banks = memory_banks(memory);
        if !banks.is_empty() {
            lines.push(format!("Memory: {}", banks.join(", ")));
        }
    }

    if let Some(rom) = &metadata.rom {
        let mut line = format!("v{}.{}", rom.version, rom.revision);
        if let Some(id) = non_empty(&rom.id) {
            line.push_str(&format!(" ({id})"));
        }
        if let Some(crc) = non_empty(&rom.crc) {
            line.push_str(&format!(" [CRC: {crc}]"));
        }
        lines.push(format!("Kickstart: {line}"));
    }

    for disk in &metadata.disks {
        if let Some(image) = non_empty(&disk.image) {
            lines.push(format!("Floppy {}: {image}", disk.drive_name()));
        } else if disk.motor_on() {
            lines.push(format!("Floppy {}: (motor on)", disk.drive_name()));
        }
    }

    lines.join("\n")
}

fn memory_banks(memory: &MemoryInfo) -> Vec<String> {
    [
        (memory.chip, "Chip"),
        (memory.bogo, "Slow"),
        (memory.fast, "Fast"),
        (memory.z3, "Z3"),
    ]
    .into_iter()
    .filter(|(size, _)| *size > 0)
    .map(|(size, label)| format!("{size}KB {label}"))
    .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
