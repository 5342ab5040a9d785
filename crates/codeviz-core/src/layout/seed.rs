//! Layout seed derivation.

use sha2::{Digest, Sha256};

use crate::parser::Language;
use crate::pipeline::DiagramType;

/// Seed for one `(source, language, diagram)` request.
///
/// First eight bytes (big-endian) of
/// `SHA-256(source 0x00 language 0x00 diagram)`.
pub fn layout_seed(source: &str, language: Language, diagram: DiagramType) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(language.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(diagram.as_str().as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}
