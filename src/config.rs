//! World configuration.

use crate::cell::MAX_TYPES;
use crate::chunk::S;
use crate::light::light_queue_capacity;

#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Chunk edge length. `S` is a compile-time constant in this version;
    /// this field exists for documentation and forward compatibility, and
    /// `WorldConfig::new`-style construction validates it matches `S`.
    pub chunk_edge: i32,
    pub max_types: u32,
    pub max_light_radius: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_edge: S,
            max_types: MAX_TYPES,
            max_light_radius: 18,
        }
    }
}

impl WorldConfig {
    /// Sizing hint for the light-queue capacity implied by this config;
    /// the substrate currently always sizes to the proven worst case
    /// (`S^3 * 9 * 2`) regardless, but this surfaces the same number so a
    /// caller auditing capacity does not need to reach into `light.rs`.
    pub fn light_queue_capacity_hint(&self) -> usize {
        light_queue_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.max_types, 4096);
        assert_eq!(cfg.max_light_radius, 18);
        assert_eq!(cfg.chunk_edge, 12);
    }
}
