//! Shader block registry and composer.
//!
//! Kernels are assembled from small WGSL fragments ("blocks"). Each block
//! names the blocks it depends on; composing an entry block yields the
//! source of its whole dependency closure, every block placed after the
//! blocks it needs.
//!
//! Blocks are opaque text. Nothing here parses WGSL.
//!
//! ```ignore
//! let registry = BlockRegistry::new(vec![
//!     ShaderBlock::new("random", RANDOM_WGSL),
//!     ShaderBlock::new("kernel", KERNEL_WGSL).with_dependencies(["random"]),
//! ])?;
//! let source = registry.compose_with("kernel", &[("__COUNT__", "20")])?;
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::ComposeError;

/// A named WGSL fragment and the names of the blocks it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBlock {
    name: String,
    source: String,
    dependencies: Vec<String>,
}

impl ShaderBlock {
    /// Create a block with no dependencies.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            dependencies: Vec::new(),
        }
    }

    /// Declare the blocks this one needs.
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// An immutable catalog of shader blocks.
///
/// Registration order is kept: blocks that become eligible in the same
/// sorting pass are emitted in catalog order.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<ShaderBlock>,
    indices: HashMap<String, usize>,
}

impl BlockRegistry {
    /// Build a registry, rejecting duplicate names and dangling dependencies.
    ///
    /// Cycles are accepted here and reported by [`compose`](Self::compose).
    pub fn new(blocks: Vec<ShaderBlock>) -> Result<Self, ComposeError> {
        let mut indices = HashMap::with_capacity(blocks.len());
        for (idx, block) in blocks.iter().enumerate() {
            if indices.insert(block.name.clone(), idx).is_some() {
                return Err(ComposeError::DuplicateBlock(block.name.clone()));
            }
        }

        for block in &blocks {
            if let Some(missing) = block
                .dependencies
                .iter()
                .find(|dependency| !indices.contains_key(dependency.as_str()))
            {
                return Err(ComposeError::UnknownDependency {
                    block: block.name.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        Ok(Self { blocks, indices })
    }

    pub fn get(&self, name: &str) -> Option<&ShaderBlock> {
        self.indices.get(name).map(|&idx| &self.blocks[idx])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate blocks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ShaderBlock> {
        self.blocks.iter()
    }

    /// Names of every block reachable from `entry`, the entry included.
    pub fn required(&self, entry: &str) -> Result<HashSet<&str>, ComposeError> {
        let root = self
            .get(entry)
            .ok_or_else(|| ComposeError::UnknownBlock(entry.to_string()))?;

        let mut required = HashSet::new();
        self.visit(root, &mut required);
        Ok(required)
    }

    fn visit<'a>(&'a self, block: &'a ShaderBlock, required: &mut HashSet<&'a str>) {
        if !required.insert(block.name.as_str()) {
            return;
        }
        for dependency in &block.dependencies {
            if let Some(next) = self.get(dependency) {
                self.visit(next, required);
            }
        }
    }

    /// Order the whole catalog so every block follows its dependencies.
    ///
    /// Each pass extracts all pending blocks whose dependencies are already
    /// placed. A pass that extracts nothing means the remaining blocks form
    /// (or wait on) a cycle.
    pub fn sorted(&self) -> Result<Vec<&ShaderBlock>, ComposeError> {
        let mut placed: HashSet<&str> = HashSet::with_capacity(self.blocks.len());
        let mut sorted = Vec::with_capacity(self.blocks.len());
        let mut pending: Vec<&ShaderBlock> = self.blocks.iter().collect();

        while !pending.is_empty() {
            let (ready, waiting): (Vec<&ShaderBlock>, Vec<&ShaderBlock>) =
                pending.into_iter().partition(|block| {
                    block
                        .dependencies
                        .iter()
                        .all(|dependency| placed.contains(dependency.as_str()))
                });

            if ready.is_empty() {
                return Err(ComposeError::CircularDependency {
                    pending: waiting.iter().map(|block| block.name.clone()).collect(),
                });
            }

            placed.extend(ready.iter().map(|block| block.name.as_str()));
            sorted.extend(ready);
            pending = waiting;
        }

        Ok(sorted)
    }

    /// Compose the source for `entry` and its dependency closure.
    pub fn compose(&self, entry: &str) -> Result<String, ComposeError> {
        let required = self.required(entry)?;
        let sorted = self.sorted()?;

        Ok(sorted
            .into_iter()
            .filter(|block| required.contains(block.name.as_str()))
            .map(|block| block.source.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Compose `entry`, then replace every occurrence of each placeholder.
    ///
    /// Replacements run in the given order on the concatenated source.
    pub fn compose_with(
        &self,
        entry: &str,
        replacements: &[(&str, &str)],
    ) -> Result<String, ComposeError> {
        let composed = self.compose(entry)?;
        Ok(substitute(composed, replacements))
    }
}

/// Replace every occurrence of each `(token, value)` pair, in order.
pub fn substitute(source: String, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(source, |code, (token, value)| code.replace(token, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, deps: &[&str]) -> ShaderBlock {
        ShaderBlock::new(name, format!("// {}", name)).with_dependencies(deps.iter().copied())
    }

    fn position(source: &str, name: &str) -> usize {
        source
            .find(&format!("// {}", name))
            .unwrap_or_else(|| panic!("block {} missing from output", name))
    }

    #[test]
    fn test_compose_single_block() {
        let registry = BlockRegistry::new(vec![block("a", &[])]).unwrap();
        assert_eq!(registry.compose("a").unwrap(), "// a");
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let registry = BlockRegistry::new(vec![
            block("kernel", &["sdf", "types"]),
            block("sdf", &["bezier"]),
            block("bezier", &[]),
            block("types", &[]),
        ])
        .unwrap();

        let source = registry.compose("kernel").unwrap();
        assert!(position(&source, "bezier") < position(&source, "sdf"));
        assert!(position(&source, "sdf") < position(&source, "kernel"));
        assert!(position(&source, "types") < position(&source, "kernel"));
    }

    #[test]
    fn test_shared_dependency_emitted_once() {
        let registry = BlockRegistry::new(vec![
            block("shared", &[]),
            block("left", &["shared"]),
            block("right", &["shared"]),
            block("top", &["left", "right"]),
        ])
        .unwrap();

        let source = registry.compose("top").unwrap();
        assert_eq!(source.matches("// shared").count(), 1);
        assert_eq!(source.lines().count(), 4);
    }

    #[test]
    fn test_unrelated_blocks_excluded() {
        let registry = BlockRegistry::new(vec![
            block("random", &[]),
            block("color", &[]),
            block("compute", &["random"]),
        ])
        .unwrap();

        let source = registry.compose("compute").unwrap();
        assert!(!source.contains("// color"));
        assert_eq!(source, "// random\n// compute");
    }

    #[test]
    fn test_equal_eligibility_follows_catalog_order() {
        let registry = BlockRegistry::new(vec![
            block("zeta", &[]),
            block("alpha", &[]),
            block("entry", &["alpha", "zeta"]),
        ])
        .unwrap();

        assert_eq!(
            registry.compose("entry").unwrap(),
            "// zeta\n// alpha\n// entry"
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let registry = BlockRegistry::new(vec![
            block("a", &["b"]),
            block("b", &["c"]),
            block("c", &["a"]),
            block("entry", &["a"]),
        ])
        .unwrap();

        match registry.compose("entry") {
            Err(ComposeError::CircularDependency { pending }) => {
                assert!(pending.contains(&"a".to_string()));
                assert!(pending.contains(&"entry".to_string()));
            }
            other => panic!("expected circular dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let registry = BlockRegistry::new(vec![block("loop", &["loop"])]).unwrap();
        assert!(matches!(
            registry.compose("loop"),
            Err(ComposeError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_unknown_entry() {
        let registry = BlockRegistry::new(vec![block("a", &[])]).unwrap();
        assert_eq!(
            registry.compose("missing"),
            Err(ComposeError::UnknownBlock("missing".to_string()))
        );
    }

    #[test]
    fn test_unknown_dependency_rejected_at_registration() {
        let result = BlockRegistry::new(vec![block("a", &["ghost"])]);
        assert_eq!(
            result.unwrap_err(),
            ComposeError::UnknownDependency {
                block: "a".to_string(),
                dependency: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = BlockRegistry::new(vec![block("a", &[]), block("a", &[])]);
        assert_eq!(result.unwrap_err(), ComposeError::DuplicateBlock("a".to_string()));
    }

    #[test]
    fn test_substitution_replaces_every_occurrence_in_order() {
        let registry = BlockRegistry::new(vec![ShaderBlock::new(
            "kernel",
            "array<Worm, __COUNT__>; const N = __COUNT__; __STAGE__",
        )])
        .unwrap();

        let source = registry
            .compose_with("kernel", &[("__COUNT__", "20"), ("__STAGE__", "__COUNT__")])
            .unwrap();
        // The second replacement runs after the first, so its output is not re-substituted.
        assert_eq!(source, "array<Worm, 20>; const N = 20; __COUNT__");
    }
}
