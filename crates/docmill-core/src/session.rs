//! Directory-backed session store
//!
//! One directory per session under the store root, holding exactly one
//! `template.docx`, at most one `dataset.{xlsx|csv}`, and any previously
//! generated per-row outputs. Sessions survive process restarts; deleting
//! one removes its directory recursively.
//!
//! Replacing a session's template or dataset overwrites the stored file in
//! place and deliberately leaves previously generated outputs stale: an
//! overwrite prepares the next generation run, it does not rewrite history.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::dataset::DATASET_EXTENSIONS;
use crate::error::{DocmillError, Result};

/// Stored template filename, fixed per session.
pub const TEMPLATE_FILE: &str = "template.docx";

/// Stored dataset filename stem; the extension tags the format.
pub const DATASET_STEM: &str = "dataset";

/// Reserved directory for bundled example assets, never listed as a
/// session.
pub const SAMPLES_DIR: &str = "samples";

/// A loaded session: its directory plus resolved input paths.
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub dir: PathBuf,
    pub template_path: PathBuf,
    /// Absent when the directory holds no recognized dataset file; callers
    /// must treat that as "session has no usable dataset".
    pub dataset_path: Option<PathBuf>,
}

/// Store rooted at a directory, one subdirectory per session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Open a store, creating the root directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new session from a template and a dataset file.
    ///
    /// All validation (name, template extension, dataset extension,
    /// duplicate check) happens before anything is written.
    pub fn create(&self, name: &str, template: &Path, dataset: &Path) -> Result<Session> {
        validate_name(name)?;

        let dir = self.root.join(name);
        if dir.exists() {
            return Err(DocmillError::SessionExists(name.to_string()));
        }

        if template.extension().and_then(|e| e.to_str()) != Some("docx") {
            return Err(DocmillError::InvalidDocument {
                path: template.to_path_buf(),
                reason: "template must be a .docx file".to_string(),
            });
        }
        let extension = dataset_extension(dataset)?;

        fs::create_dir_all(&dir)?;
        fs::copy(template, dir.join(TEMPLATE_FILE))?;
        let dataset_name = format!("{DATASET_STEM}.{extension}");
        fs::copy(dataset, dir.join(&dataset_name))?;

        Ok(Session {
            name: name.to_string(),
            template_path: dir.join(TEMPLATE_FILE),
            dataset_path: Some(dir.join(dataset_name)),
            dir,
        })
    }

    /// Load an existing session.
    pub fn load(&self, name: &str) -> Result<Session> {
        validate_name(name)?;

        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(DocmillError::SessionNotFound(name.to_string()));
        }

        let dataset_path = DATASET_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{DATASET_STEM}.{ext}")))
            .find(|path| path.exists());

        Ok(Session {
            name: name.to_string(),
            template_path: dir.join(TEMPLATE_FILE),
            dataset_path,
            dir,
        })
    }

    /// All session names, sorted. Hidden directories and the reserved
    /// samples directory are excluded.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') || name == SAMPLES_DIR {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Recursively delete a session. Irreversible. The filesystem is left
    /// untouched when the session does not exist.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(DocmillError::SessionNotFound(name.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    /// Atomically overwrite the stored template. Previously generated
    /// outputs are not invalidated.
    pub fn replace_template(&self, name: &str, source: &Path) -> Result<()> {
        let session = self.load(name)?;
        if source.extension().and_then(|e| e.to_str()) != Some("docx") {
            return Err(DocmillError::InvalidDocument {
                path: source.to_path_buf(),
                reason: "template must be a .docx file".to_string(),
            });
        }
        atomic_copy(source, &session.dir, &session.template_path)
    }

    /// Atomically overwrite the stored dataset. A previous dataset file of
    /// a different extension is removed, keeping at most one per session.
    pub fn replace_dataset(&self, name: &str, source: &Path) -> Result<()> {
        let session = self.load(name)?;
        let extension = dataset_extension(source)?;
        let target = session.dir.join(format!("{DATASET_STEM}.{extension}"));

        atomic_copy(source, &session.dir, &target)?;

        if let Some(previous) = session.dataset_path {
            if previous != target {
                fs::remove_file(previous)?;
            }
        }
        Ok(())
    }
}

/// Copy `source` over `target` via a tempfile in the same directory, so
/// the overwrite is a single rename.
fn atomic_copy(source: &Path, dir: &Path, target: &Path) -> Result<()> {
    let mut reader = fs::File::open(source)?;
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut reader, staged.as_file_mut())?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

fn dataset_extension(path: &Path) -> Result<&'static str> {
    let extension = path.extension().and_then(|e| e.to_str());
    DATASET_EXTENSIONS
        .iter()
        .find(|known| Some(**known) == extension)
        .copied()
        .ok_or_else(|| DocmillError::UnsupportedFormat(path.to_path_buf()))
}

/// Session names must be single directory names: no separators, no `..`,
/// no absolute paths, not empty, not the reserved samples name.
fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| DocmillError::SessionInvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name == SAMPLES_DIR {
        return Err(invalid("name is reserved for example assets"));
    }

    let path = Path::new(name);
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::Prefix(_) | Component::RootDir => {
                return Err(invalid("name cannot be an absolute path"));
            }
            Component::CurDir => return Err(invalid("name cannot contain '.'")),
            Component::ParentDir => return Err(invalid("name cannot contain '..'")),
        }
    }
    if normal != 1 {
        return Err(invalid("name must be a single directory name"));
    }

    Ok(())
}
