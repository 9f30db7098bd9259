//! Archive loading: container blocks to per-level states.

use std::fmt;
use std::path::Path;

use catalog::{ObjectCatalog, TypeRules};
use container::{decode_container, Container, Limits};
use tracing::{debug, warn};

use crate::decode::decode_level;
use crate::error::{LoadError, LoadResult};
use crate::layout::ArchiveLayout;
use crate::state::LevelState;

/// Immutable configuration shared by every decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub catalog: &'a ObjectCatalog,
    pub rules: &'a TypeRules,
    pub layout: ArchiveLayout,
}

impl<'a> DecodeContext<'a> {
    /// Creates a context with the default archive layout.
    #[must_use]
    pub fn new(catalog: &'a ObjectCatalog, rules: &'a TypeRules) -> Self {
        Self {
            catalog,
            rules,
            layout: ArchiveLayout::default(),
        }
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: ArchiveLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// A level whose block is absent from the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingLevelBlock {
    pub level: u8,
    /// `None` when the layout has no block for this level number at all.
    pub block_index: Option<u16>,
}

impl fmt::Display for MissingLevelBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_index {
            Some(index) => write!(f, "level {} block {index} is missing", self.level),
            None => write!(f, "level {} is not in the archive layout", self.level),
        }
    }
}

/// Every level of an archive, plus the levels that had to be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedArchive {
    /// One state per layout level, in level order.
    pub levels: Vec<LevelState>,
    pub missing: Vec<MissingLevelBlock>,
}

impl LoadedArchive {
    /// Returns the state of a one-indexed level.
    #[must_use]
    pub fn level(&self, level: u8) -> Option<&LevelState> {
        self.levels.iter().find(|state| state.level() == level)
    }
}

/// Decodes, resolves and enriches one level block.
#[must_use]
pub fn decode_level_state(bytes: &[u8], level: u8, ctx: &DecodeContext<'_>) -> LevelState {
    LevelState::build(&decode_level(bytes), level, ctx)
}

/// Loads one level from a decoded container.
pub fn load_level(
    container: &Container<'_>,
    level: u8,
    ctx: &DecodeContext<'_>,
) -> Result<LevelState, MissingLevelBlock> {
    let block_index = ctx.layout.block_index(level);
    let block = block_index.and_then(|index| container.block(index));
    match block {
        Some(block) => Ok(decode_level_state(block.bytes, level, ctx)),
        None => Err(MissingLevelBlock { level, block_index }),
    }
}

fn load_or_substitute(
    container: &Container<'_>,
    level: u8,
    ctx: &DecodeContext<'_>,
) -> (LevelState, Option<MissingLevelBlock>) {
    match load_level(container, level, ctx) {
        Ok(state) => (state, None),
        Err(missing) => {
            warn!(level, block = ?missing.block_index, "level block missing, loading it empty");
            (LevelState::empty(level), Some(missing))
        }
    }
}

fn collect(
    results: impl IntoIterator<Item = (LevelState, Option<MissingLevelBlock>)>,
) -> LoadedArchive {
    let mut levels = Vec::new();
    let mut missing = Vec::new();
    for (state, diagnostic) in results {
        levels.push(state);
        missing.extend(diagnostic);
    }
    LoadedArchive { levels, missing }
}

/// Loads every level of the layout, substituting empty states for missing blocks.
#[must_use]
pub fn load_levels(container: &Container<'_>, ctx: &DecodeContext<'_>) -> LoadedArchive {
    collect(
        ctx.layout
            .levels()
            .map(|level| load_or_substitute(container, level, ctx)),
    )
}

/// Same as [`load_levels`], decoding each level on its own scoped thread.
#[must_use]
pub fn load_levels_parallel(
    container: &Container<'_>,
    ctx: &DecodeContext<'_>,
) -> LoadedArchive {
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = ctx
            .layout
            .levels()
            .map(|level| scope.spawn(move || load_or_substitute(container, level, ctx)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });
    collect(results)
}

/// Decodes an archive image and loads every level in it.
pub fn load_archive(
    bytes: &[u8],
    limits: &Limits,
    ctx: &DecodeContext<'_>,
) -> LoadResult<LoadedArchive> {
    let container = decode_container(bytes, limits)?;
    debug!(
        declared = container.declared_block_count(),
        present = container.present_block_count(),
        "archive directory decoded"
    );
    Ok(load_levels(&container, ctx))
}

/// Reads an archive file and loads every level in it.
pub fn load_archive_file(
    path: impl AsRef<Path>,
    limits: &Limits,
    ctx: &DecodeContext<'_>,
) -> LoadResult<LoadedArchive> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_archive(&bytes, limits, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{ArchiveImage, LevelImage, RawObject};
    use crate::state::LevelSource;
    use crate::types::SlotIndex;

    fn level_with_torch() -> LevelImage {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x095));
        image.place(8, 8, &[300]);
        image
    }

    #[test]
    fn loads_present_levels_and_substitutes_missing() {
        let archive = ArchiveImage::new(3)
            .with_block(0, level_with_torch().into_bytes())
            .with_block(2, LevelImage::new().into_bytes())
            .into_bytes();
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules).with_layout(ArchiveLayout {
            level_count: 3,
            first_level_block: 0,
        });

        let loaded = load_archive(&archive, &Limits::default(), &ctx).unwrap();
        assert_eq!(loaded.levels.len(), 3);
        assert_eq!(
            loaded.missing,
            vec![MissingLevelBlock {
                level: 2,
                block_index: Some(1)
            }]
        );
        let first = loaded.level(1).unwrap();
        assert!(first.object(SlotIndex::new(300)).is_some());
        assert_eq!(loaded.level(2).unwrap().source(), LevelSource::MissingBlock);
        assert_eq!(loaded.level(3).unwrap().source(), LevelSource::Decoded);
    }

    #[test]
    fn malformed_container_is_an_error() {
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        let err = load_archive(&[1], &Limits::default(), &ctx).unwrap_err();
        assert!(matches!(err, LoadError::MalformedContainer(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        let err = load_archive_file("/nonexistent/arkdiff/lev.ark", &Limits::default(), &ctx)
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn parallel_matches_sequential() {
        let archive = ArchiveImage::new(9)
            .with_block(0, level_with_torch().into_bytes())
            .with_block(4, level_with_torch().into_bytes())
            .into_bytes();
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        let container = decode_container(&archive, &Limits::default()).unwrap();
        assert_eq!(
            load_levels(&container, &ctx),
            load_levels_parallel(&container, &ctx)
        );
    }

    #[test]
    fn level_outside_layout() {
        let archive = ArchiveImage::new(1).into_bytes();
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        let container = decode_container(&archive, &Limits::default()).unwrap();
        let missing = load_level(&container, 12, &ctx).unwrap_err();
        assert_eq!(missing.block_index, None);
        assert_eq!(missing.to_string(), "level 12 is not in the archive layout");
    }
}
