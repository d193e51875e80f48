//! Subcommand implementations over [`FileStorage`].

use anyhow::{bail, Context, Result};
use mindmap_core::layout::LayoutEngine;
use mindmap_core::storage::DEFAULT_FILE_NAME;
use mindmap_core::{Editor, EditorConfig, FileStorage, RootAmbiguity, Storage};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Map name used when none is given: the default file name without extension.
pub const DEFAULT_MAP: &str = "mindmap";

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn open_storage(dir: Option<PathBuf>) -> Result<FileStorage> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    }
    .context("Failed to open map directory")?;
    log::debug!("Using map directory {}", storage.base_path().display());
    Ok(storage)
}

fn open(storage: &dyn Storage, config: EditorConfig, name: &str) -> Result<Editor> {
    let mut editor = Editor::new(config);
    editor
        .load(storage, name)
        .with_context(|| format!("Failed to load map {name:?}"))?;
    Ok(editor)
}

pub fn new_map(storage: &dyn Storage, config: EditorConfig, name: &str, force: bool) -> Result<()> {
    if !force && storage.exists(name)? {
        bail!("Map {name:?} already exists (use --force to replace it)");
    }
    Editor::new(config)
        .save(storage, name)
        .with_context(|| format!("Failed to save map {name:?}"))?;
    if name == DEFAULT_MAP {
        log::info!("Created {DEFAULT_FILE_NAME}");
    }
    Ok(())
}

/// Summary of an automatic layout.
#[derive(Debug)]
pub struct LayoutReport {
    pub placed: usize,
    pub total: usize,
    pub saved_as: String,
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Placed {} of {} nodes, saved as {}",
            self.placed, self.total, self.saved_as
        )
    }
}

pub fn layout_map(
    storage: &dyn Storage,
    config: EditorConfig,
    name: &str,
    output: Option<&str>,
) -> Result<LayoutReport> {
    let mut editor = open(storage, config, name)?;
    let placed = editor
        .auto_layout()
        .map_or(0, |outcome| outcome.positions.len());

    let saved_as = output.unwrap_or(name);
    editor
        .save(storage, saved_as)
        .with_context(|| format!("Failed to save map {saved_as:?}"))?;

    Ok(LayoutReport {
        placed,
        total: editor.store().len(),
        saved_as: saved_as.to_string(),
    })
}

/// Counts and root information for a map.
#[derive(Debug)]
pub struct Stats {
    pub nodes: usize,
    pub edges: usize,
    pub root: Option<String>,
    pub ambiguity: Option<RootAmbiguity>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes: {}", self.nodes)?;
        writeln!(f, "edges: {}", self.edges)?;
        match (&self.root, self.ambiguity) {
            (None, _) => write!(f, "root:  none"),
            (Some(root), None) => write!(f, "root:  {root}"),
            (Some(root), Some(ambiguity)) => write!(f, "root:  {root} ({ambiguity})"),
        }
    }
}

pub fn stats(storage: &dyn Storage, config: EditorConfig, name: &str) -> Result<Stats> {
    let editor = open(storage, config, name)?;
    let store = editor.store();
    let choice = LayoutEngine::new(config.layout).find_root(store);

    Ok(Stats {
        nodes: store.len(),
        edges: store.edges().count(),
        root: choice.and_then(|c| store.get(c.root)).map(|n| n.label.clone()),
        ambiguity: choice.and_then(|c| c.ambiguity),
    })
}

pub fn list(storage: &dyn Storage) -> Result<Vec<String>> {
    storage.list().context("Failed to list maps")
}
