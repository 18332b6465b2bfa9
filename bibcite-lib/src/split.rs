//! The end-to-end pass: read the bibliography, write one file per entry, and
//! publish a verbatim copy of the source.

use crate::error::SplitError;
use crate::parser::parse;
use crate::sanitize::safe_filename;
use crate::serialize::entry_to_bib;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Source bibliography, relative to the project root.
pub const DEFAULT_INPUT: &str = "src/data/publications.bib";
/// Directory receiving the per-entry files, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = "public/cite";
/// Destination of the verbatim copy, relative to the project root.
pub const DEFAULT_PUBLIC_COPY: &str = "public/publications.bib";

/// Resolved locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub public_copy: PathBuf,
    /// Parse and report without touching the filesystem.
    pub dry_run: bool,
}

impl SplitConfig {
    /// The default layout under `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            input: root.join(DEFAULT_INPUT),
            out_dir: root.join(DEFAULT_OUT_DIR),
            public_copy: root.join(DEFAULT_PUBLIC_COPY),
            dry_run: false,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Every per-entry file written, in entry order. A path appears twice
    /// when two keys sanitize to the same name.
    pub written: Vec<PathBuf>,
    /// Records without a citation key.
    pub skipped: usize,
    pub out_dir: PathBuf,
    pub dry_run: bool,
}

impl SplitReport {
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run {
            "Would generate"
        } else {
            "Generated"
        };
        write!(
            f,
            "{verb} {} per-entry BibTeX files in {}",
            self.count(),
            self.out_dir.display()
        )
    }
}

/// Runs the split described by `config`.
///
/// Fails with [`SplitError::MissingInput`] before writing anything when the
/// input file does not exist. Files written before a later failure are left
/// in place.
pub fn run(config: &SplitConfig) -> Result<SplitReport, SplitError> {
    if !config.input.exists() {
        return Err(SplitError::MissingInput(config.input.clone()));
    }

    let raw = fs::read(&config.input).map_err(|e| SplitError::io("read", &config.input, e))?;
    let text = String::from_utf8_lossy(&raw);
    let bibliography = parse(&text).map_err(|source| SplitError::Parse {
        path: config.input.clone(),
        source,
    })?;
    log::info!(
        "Parsed {} records from {}",
        bibliography.len(),
        config.input.display()
    );

    if !config.dry_run {
        fs::create_dir_all(&config.out_dir)
            .map_err(|e| SplitError::io("create directory", &config.out_dir, e))?;
    }

    let mut written = Vec::new();
    let mut skipped = 0;
    let mut claimed: HashMap<String, &str> = HashMap::new();

    for entry in &bibliography {
        let Some(key) = entry.key() else {
            skipped += 1;
            if entry.is_directive() {
                log::debug!("Skipping @{} block", entry.entry_type);
            } else {
                log::warn!(
                    "Skipping @{} entry without a citation key",
                    entry.entry_type
                );
            }
            continue;
        };

        let filename = format!("{}.bib", safe_filename(Some(key)));
        if let Some(previous) = claimed.insert(filename.clone(), key) {
            if previous != key {
                log::warn!("Keys `{previous}` and `{key}` both map to {filename}; keeping `{key}`");
            }
        }

        let path = config.out_dir.join(&filename);
        if config.dry_run {
            log::debug!("Would write {}", path.display());
        } else {
            fs::write(&path, entry_to_bib(entry))
                .map_err(|e| SplitError::io("write", &path, e))?;
            log::debug!("Wrote {}", path.display());
        }
        written.push(path);
    }

    if !config.dry_run {
        copy_verbatim(&config.input, &config.public_copy)?;
    }

    Ok(SplitReport {
        written,
        skipped,
        out_dir: config.out_dir.clone(),
        dry_run: config.dry_run,
    })
}

fn copy_verbatim(from: &Path, to: &Path) -> Result<(), SplitError> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| SplitError::io("create directory", parent, e))?;
    }

    if same_file(from, to) {
        log::debug!("{} is already the public copy", to.display());
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| SplitError::io("copy bibliography to", to, e))?;
    log::debug!("Copied {} to {}", from.display(), to.display());
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
