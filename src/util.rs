use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let mut chars = title.chars();
    let head = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_none() {
        head
    } else {
        format!("{head}...")
    }
}

/// Deterministic point in [-1, 1]^2 derived from an id, used to seed
/// layout positions without an RNG.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
