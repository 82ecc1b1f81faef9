//! Inspect Amiberry savestates (`.uss` files in the ASF chunk format) without
//! running the emulator.

pub mod asf_parser;
pub mod asf_reader;
pub mod chunk_decoder;
pub mod config;
pub mod error;
pub mod http_server;
pub mod metadata;
pub mod savestate_dir;
pub mod summary;

pub use asf_parser::{ChunkDirectoryEntry, inspect, inspect_bytes, list_chunks, list_chunks_bytes};
pub use config::Config;
pub use error::{Result, SavestateError};
pub use metadata::DecodedMetadata;
pub use summary::summary;
