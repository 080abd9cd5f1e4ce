//! Kind-specific value producers for scalar nodes.

pub mod numeric;
pub mod temporal;
pub mod text;

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Word};
use rand::{Rng, RngCore};
use uuid::Uuid;

pub use numeric::number;
pub use temporal::timestamp;
pub use text::text;

/// Random version 4 identifier drawn from `rng`.
pub(crate) fn random_uuid(rng: &mut dyn RngCore) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

/// Lorem text with a character count drawn uniformly from `[min, max]`.
pub(crate) fn lorem(rng: &mut dyn RngCore, min: usize, max: usize) -> String {
    let target = if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    };
    let mut out = String::new();
    while out.chars().count() < target {
        if !out.is_empty() {
            out.push(' ');
        }
        let paragraph: String = Paragraph(3..6).fake_with_rng(rng);
        out.push_str(&paragraph);
    }
    out.chars().take(target).collect()
}

pub(crate) fn lorem_word(rng: &mut dyn RngCore) -> String {
    Word().fake_with_rng(rng)
}
