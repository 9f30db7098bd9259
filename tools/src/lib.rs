//! Inspection, dump and diff tooling for arkdiff.
//!
//! This crate turns decoder output into reports:
//!
//! - Block directory layout of an archive
//! - Enriched objects of one level
//! - Projected comparison of two saves
//!
//! Reports serialize to JSON and have a plain-text rendering.
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what changed and where.

use std::fmt::Write as _;

use container::{decode_container, ContainerResult, Limits};
use diff::{DiffSummary, ProjectedLevel, ProjectedRecord};
use level::{LevelObject, LevelSource, LevelState};
use serde::Serialize;

/// One block of an archive directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    pub index: u16,
    pub offset: u32,
    pub size: usize,
}

/// Directory summary of an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub len: usize,
    pub declared_blocks: u16,
    pub present_blocks: usize,
    /// Present blocks in offset order.
    pub blocks: Vec<BlockReport>,
}

/// Reads an archive's block directory.
pub fn inspect_container(bytes: &[u8], limits: &Limits) -> ContainerResult<InspectReport> {
    let container = decode_container(bytes, limits)?;
    Ok(InspectReport {
        len: container.len(),
        declared_blocks: container.declared_block_count(),
        present_blocks: container.present_block_count(),
        blocks: container
            .iter()
            .map(|block| BlockReport {
                index: block.index,
                offset: block.offset,
                size: block.size(),
            })
            .collect(),
    })
}

/// Enriched objects of one level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelReport<'a> {
    pub level: u8,
    pub source: LevelSource,
    pub catalog_hash: String,
    pub objects: Vec<&'a LevelObject>,
}

impl<'a> LevelReport<'a> {
    #[must_use]
    pub fn new(state: &'a LevelState, catalog_hash: u64) -> Self {
        Self {
            level: state.level(),
            source: state.source(),
            catalog_hash: format_hash(catalog_hash),
            objects: state.objects().collect(),
        }
    }
}

/// Comparison of one level between two saves.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub level: u8,
    pub catalog_hash: String,
    pub summary: DiffSummary,
    pub projected: ProjectedLevel,
}

impl DiffReport {
    #[must_use]
    pub fn new(projected: ProjectedLevel, summary: DiffSummary, catalog_hash: u64) -> Self {
        Self {
            level: projected.level,
            catalog_hash: format_hash(catalog_hash),
            summary,
            projected,
        }
    }
}

#[must_use]
pub fn format_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

#[must_use]
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "len: {} bytes, blocks: {} declared, {} present",
        report.len, report.declared_blocks, report.present_blocks
    );
    for block in &report.blocks {
        let _ = writeln!(
            out,
            "  block {:>3}: offset 0x{:06x} size {} bytes",
            block.index, block.offset, block.size
        );
    }
    out
}

fn describe_object(object: &LevelObject) -> String {
    let mut line = format!(
        "{:>5} 0x{:03x} {:<24} {} z{}",
        object.slot.to_string(),
        object.type_id(),
        object.info.name,
        object.tile(),
        object.position.z
    );
    if let Some(quantity) = object.quantity {
        let _ = write!(line, " x{quantity}");
    }
    if let Some(door) = &object.door {
        let _ = write!(line, " door {:?} {:?}", door.state, door.condition);
        if door.locked {
            let _ = write!(line, " locked");
        }
        if let Some(lock) = door.lock_id {
            let _ = write!(line, " lock#{lock}");
        }
    }
    if let Some(stairs) = &object.stairs {
        let _ = write!(
            line,
            " stairs -> level {} {}",
            stairs.destination_level, stairs.destination
        );
    }
    if object.enchanted {
        let _ = write!(line, " enchanted");
    }
    line
}

#[must_use]
pub fn format_level_pretty(report: &LevelReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "level {} ({:?}), {} objects, catalog {}",
        report.level,
        report.source,
        report.objects.len(),
        report.catalog_hash
    );
    for object in &report.objects {
        let _ = writeln!(out, "  {}", describe_object(object));
    }
    out
}

fn describe_change(record: &ProjectedRecord) -> String {
    let mut line = format!("{:<9} {}", record.change_type, describe_object(&record.object));
    if let Some(delta) = &record.position_delta {
        let _ = write!(line, " [{delta}]");
    }
    for change in &record.changed_properties {
        let _ = write!(line, " [{change}]");
    }
    line
}

/// Renders a diff; unchanged objects are listed only when `all` is set.
#[must_use]
pub fn format_diff_pretty(report: &DiffReport, all: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "level {}: {} (catalog {})",
        report.level, report.summary, report.catalog_hash
    );
    let records = report
        .projected
        .records
        .iter()
        .filter(|record| all || record.change_type != diff::ChangeKind::Unchanged);
    for record in records.chain(&report.projected.removed) {
        let _ = writeln!(out, "  {}", describe_change(record));
    }
    out
}
