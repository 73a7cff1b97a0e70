//! # isagen driver
//!
//! Everything the `isagen` binary does, minus argument parsing: resolve the
//! configuration against a workspace root, load and check the table, render
//! every artifact in memory, then either write them or compare them with the
//! files on disk.

use anyhow::{Context, Result};
use isagen_emit::{generate_all, Artifact};
use isagen_spec::{GenConfig, Manifest, OpcodeTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Optional configuration file looked up in the workspace root
pub const CONFIG_FILE: &str = "isagen.json";

#[derive(Clone, Debug)]
pub struct Options {
    /// Directory every configured path is relative to
    pub root: PathBuf,
    /// Explicit configuration file, instead of `<root>/isagen.json`
    pub config: Option<PathBuf>,
    /// Compare with disk instead of writing
    pub check: bool,
}

/// What a run did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Artifacts (and the manifest) were written
    Written { artifacts: usize },
    /// Check mode: everything on disk matches
    UpToDate,
    /// Check mode: these files differ from what would be generated
    Stale(Vec<PathBuf>),
}

/// Rendered output of one run, not yet written
#[derive(Clone, Debug)]
pub struct Rendered {
    pub artifacts: Vec<Artifact>,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
}

/// Load `isagen.json` (or the explicit file) and resolve it against `root`
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<GenConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(root.join(CONFIG_FILE)).filter(|path| path.exists()),
    };
    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            GenConfig::load(&path).with_context(|| format!("load {}", path.display()))?
        }
        None => GenConfig::default(),
    };
    Ok(config.resolved(root))
}

/// Load the table, check it against the published manifest and render everything
pub fn render(config: &GenConfig) -> Result<Rendered> {
    let table = OpcodeTable::load(&config.table)
        .with_context(|| format!("load {}", config.table.display()))?;

    let published = Manifest::load(&config.manifest)
        .with_context(|| format!("load {}", config.manifest.display()))?;
    published.check(&table).with_context(|| {
        format!(
            "{} is not an append-only extension of {}",
            config.table.display(),
            config.manifest.display()
        )
    })?;

    let artifacts = generate_all(&table, config).context("generate artifacts")?;
    tracing::info!(
        opcodes = table.len(),
        published = published.len(),
        artifacts = artifacts.len(),
        "rendered opcode table"
    );

    Ok(Rendered {
        artifacts,
        manifest: Manifest::from_table(&table),
        manifest_path: config.manifest.clone(),
    })
}

/// Write every artifact, then the manifest
pub fn write(rendered: &Rendered) -> Result<()> {
    for artifact in &rendered.artifacts {
        write_file(&artifact.path, &artifact.text)?;
        tracing::debug!(artifact = %artifact.kind, path = %artifact.path.display(), "wrote artifact");
    }
    write_file(&rendered.manifest_path, &rendered.manifest.to_json_string()?)?;
    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

/// Files on disk that differ from the rendered text (missing files included)
pub fn stale(rendered: &Rendered) -> Result<Vec<PathBuf>> {
    let manifest = rendered.manifest.to_json_string()?;
    let expected = rendered
        .artifacts
        .iter()
        .map(|a| (a.path.as_path(), a.text.as_str()))
        .chain(std::iter::once((rendered.manifest_path.as_path(), manifest.as_str())));

    let mut out = Vec::new();
    for (path, text) in expected {
        let current = match fs::read_to_string(path) {
            Ok(current) => Some(current),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
        };
        // Line endings may be rewritten by checkouts; compare content only.
        if current.map(|c| normalize_newlines(&c)) != Some(normalize_newlines(text)) {
            tracing::warn!(path = %path.display(), "out of date");
            out.push(path.to_path_buf());
        }
    }
    Ok(out)
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// One full run
pub fn run(options: &Options) -> Result<Outcome> {
    let config = load_config(&options.root, options.config.as_deref())?;
    let rendered = render(&config)?;

    if options.check {
        let stale = stale(&rendered)?;
        if stale.is_empty() {
            return Ok(Outcome::UpToDate);
        }
        return Ok(Outcome::Stale(stale));
    }

    write(&rendered)?;
    Ok(Outcome::Written {
        artifacts: rendered.artifacts.len(),
    })
}
