use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arkdiff_tools::{
    format_diff_pretty, format_inspect_pretty, format_level_pretty, inspect_container,
    DiffReport, LevelReport,
};
use catalog::{catalog_hash, CatalogFile, ObjectCatalog, TypeRules};
use clap::{Parser, Subcommand, ValueEnum};
use container::Limits;
use glob::Pattern;
use level::{load_archive_file, DecodeContext, LoadedArchive};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "arkdiff",
    version,
    about = "Level archive inspection and save comparison"
)]
struct Cli {
    /// Log decoder diagnostics at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect an archive's block directory.
    Inspect {
        /// Archive file, or a directory of archives.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
    },
    /// Print the enriched objects of one level.
    Dump {
        archive: PathBuf,
        /// One-indexed level number.
        #[arg(long)]
        level: u8,
        /// Object catalog JSON.
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Compare a save archive against its base.
    Diff {
        base: PathBuf,
        save: PathBuf,
        /// Compare only this level; every level when omitted.
        #[arg(long)]
        level: Option<u8>,
        /// Object catalog JSON.
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        /// List unchanged objects too.
        #[arg(long)]
        all: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let rules = TypeRules::default();

    match cli.command {
        Command::Inspect { path, glob } => {
            if path.is_dir() {
                for entry in collect_archive_entries(&path, glob.as_deref())? {
                    println!("== {} ==", entry.display());
                    inspect(&entry)?;
                }
            } else {
                inspect(&path)?;
            }
        }
        Command::Dump {
            archive,
            level,
            catalog,
            format,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let ctx = DecodeContext::new(&catalog, &rules);
            let loaded = load(&archive, &ctx)?;
            let Some(state) = loaded.level(level) else {
                bail!("archive has no level {level}");
            };
            let report = LevelReport::new(state, catalog_hash(&catalog));
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Pretty => print!("{}", format_level_pretty(&report)),
            }
        }
        Command::Diff {
            base,
            save,
            level,
            catalog,
            format,
            all,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let ctx = DecodeContext::new(&catalog, &rules);
            let base = load(&base, &ctx)?;
            let save = load(&save, &ctx)?;
            let hash = catalog_hash(&catalog);

            let levels: Vec<u8> = match level {
                Some(level) => vec![level],
                None => ctx.layout.levels().collect(),
            };
            let mut reports = Vec::with_capacity(levels.len());
            for level in levels {
                let (Some(before), Some(after)) = (base.level(level), save.level(level)) else {
                    bail!("archive has no level {level}");
                };
                let diff = diff::compare_levels(before, after, &rules);
                let projected = diff::project_changes(after, &diff);
                reports.push(DiffReport::new(projected, diff.summary(), hash));
            }

            match format {
                OutputFormat::Json => print_json(&reports)?,
                OutputFormat::Pretty => {
                    for report in &reports {
                        print!("{}", format_diff_pretty(report, all));
                    }
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read archive {}", path.display()))?;
    let report = inspect_container(&bytes, &Limits::default())
        .with_context(|| format!("decode directory of {}", path.display()))?;
    print!("{}", format_inspect_pretty(&report));
    Ok(())
}

fn load(path: &Path, ctx: &DecodeContext<'_>) -> Result<LoadedArchive> {
    let loaded = load_archive_file(path, &Limits::default(), ctx)
        .with_context(|| format!("load archive {}", path.display()))?;
    for missing in &loaded.missing {
        warn!(archive = %path.display(), "{missing}");
    }
    Ok(loaded)
}

fn load_catalog(path: Option<&Path>) -> Result<ObjectCatalog> {
    let Some(path) = path else {
        return Ok(ObjectCatalog::new());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&contents).context("parse catalog json")?;
    ObjectCatalog::from_file(file).context("catalog validation failed")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{json}");
    Ok(())
}

fn collect_archive_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        entries.push(path);
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::CatalogError;

    #[test]
    fn invalid_catalog_keeps_source_error() {
        let path = std::env::temp_dir().join(format!("arkdiff-dup-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"objects": [
                {"id": 7, "name": "a", "category": "x"},
                {"id": 7, "name": "b", "category": "x"}
            ]}"#,
        )
        .unwrap();
        let err = load_catalog(Some(&path)).unwrap_err();
        let _ = fs::remove_file(&path);

        assert_eq!(err.to_string(), "catalog validation failed");
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::DuplicateTypeId { id: 7 })
        );
    }

    #[test]
    fn missing_catalog_is_empty() {
        assert!(load_catalog(None).unwrap().is_empty());
    }
}
