//! The WGSL block catalog and the two composed kernels.
//!
//! Block sources live in `src/shaders/` and are embedded at compile time.
//! Kernel sources carry placeholder tokens that are filled in after
//! composition: the agent count for the render kernel and the workgroup
//! size for the compute kernel.

use crate::blocks::{BlockRegistry, ShaderBlock};
use crate::error::ComposeError;

pub const BEZIER_SDF: &str = "bezier-sdf";
pub const COLOR: &str = "color";
pub const RANDOM: &str = "random";
pub const RAY_MARCHING: &str = "ray-marching";
pub const SCREEN: &str = "screen";
pub const SDF: &str = "sdf";
pub const TOON: &str = "toon";
pub const WORMS_TYPES: &str = "worms-types";
pub const WORMS_COMPUTE: &str = "worms-compute";
pub const WORMS_RENDER: &str = "worms-render";

/// Replaced by the number of agents in the render kernel.
pub const WORMS_COUNT_TOKEN: &str = "__WORMS_COUNT__";
/// Replaced by the compute workgroup size.
pub const PER_WORKGROUP_TOKEN: &str = "__PER_WORKGROUP__";

/// Every block the kernels are built from.
pub fn catalog() -> Result<BlockRegistry, ComposeError> {
    BlockRegistry::new(vec![
        ShaderBlock::new(BEZIER_SDF, include_str!("shaders/bezier_sdf.wgsl")),
        ShaderBlock::new(COLOR, include_str!("shaders/color.wgsl")),
        ShaderBlock::new(WORMS_RENDER, include_str!("shaders/worms_render.wgsl"))
            .with_dependencies([RAY_MARCHING, SCREEN, SDF, TOON, WORMS_TYPES]),
        ShaderBlock::new(RANDOM, include_str!("shaders/random.wgsl")),
        ShaderBlock::new(RAY_MARCHING, include_str!("shaders/ray_marching.wgsl")),
        ShaderBlock::new(SCREEN, include_str!("shaders/screen.wgsl")),
        ShaderBlock::new(SDF, include_str!("shaders/sdf.wgsl")).with_dependencies([BEZIER_SDF]),
        ShaderBlock::new(TOON, include_str!("shaders/toon.wgsl")).with_dependencies([COLOR]),
        ShaderBlock::new(WORMS_TYPES, include_str!("shaders/worms_types.wgsl")),
        ShaderBlock::new(WORMS_COMPUTE, include_str!("shaders/worms_compute.wgsl"))
            .with_dependencies([RANDOM, WORMS_TYPES]),
    ])
}

/// Source of the compute kernel, entry point `main`.
pub fn compute_source(registry: &BlockRegistry, per_workgroup: u32) -> Result<String, ComposeError> {
    let per_workgroup = per_workgroup.to_string();
    registry.compose_with(WORMS_COMPUTE, &[(PER_WORKGROUP_TOKEN, per_workgroup.as_str())])
}

/// Source of the render kernel for `count` agents, entry points `vs_main` and `fs_main`.
pub fn render_source(registry: &BlockRegistry, count: u32) -> Result<String, ComposeError> {
    let count = count.to_string();
    registry.compose_with(WORMS_RENDER, &[(WORMS_COUNT_TOKEN, count.as_str())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_acyclic() {
        let registry = catalog().unwrap();
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.sorted().unwrap().len(), 10);
    }

    #[test]
    fn test_render_closure() {
        let registry = catalog().unwrap();
        let required = registry.required(WORMS_RENDER).unwrap();
        for name in [
            WORMS_RENDER,
            RAY_MARCHING,
            SCREEN,
            SDF,
            BEZIER_SDF,
            TOON,
            COLOR,
            WORMS_TYPES,
        ] {
            assert!(required.contains(name), "{} missing", name);
        }
        assert!(!required.contains(RANDOM));
        assert!(!required.contains(WORMS_COMPUTE));
    }

    #[test]
    fn test_compute_closure() {
        let registry = catalog().unwrap();
        let mut required: Vec<_> = registry.required(WORMS_COMPUTE).unwrap().into_iter().collect();
        required.sort();
        assert_eq!(required, vec![RANDOM, WORMS_COMPUTE, WORMS_TYPES]);
    }

    #[test]
    fn test_render_source_substitutes_count() {
        let registry = catalog().unwrap();
        let source = render_source(&registry, 20).unwrap();
        assert!(!source.contains(WORMS_COUNT_TOKEN));
        assert!(source.contains("array<Worm, 20>"));
        assert!(source.contains("const WORMS_COUNT: u32 = 20u;"));
        assert!(!source.contains("fn pcg_hash"));
    }

    #[test]
    fn test_compute_source_substitutes_workgroup() {
        let registry = catalog().unwrap();
        let source = compute_source(&registry, 64).unwrap();
        assert!(!source.contains(PER_WORKGROUP_TOKEN));
        assert!(source.contains("const PER_WORKGROUP: u32 = 64u;"));
        assert!(!source.contains("fn toon_shade"));
    }

    #[test]
    fn test_types_precede_kernels() {
        let registry = catalog().unwrap();
        let source = compute_source(&registry, 64).unwrap();
        let types = source.find("struct Worm {").unwrap();
        let kernel = source.find("fn main(").unwrap();
        assert!(types < kernel);
    }
}
