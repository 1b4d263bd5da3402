use std::path::{Path, PathBuf};

use super::validate_name;

/// Local template tier: one `{name}.txt` UTF-8 file per template.
///
/// Reads degrade to absence — an unreadable entry is logged and treated as
/// missing so resolution can fall through to the next tier. Writes are plain
/// last-write-wins with no locking.
pub struct LocalTemplateDir {
    dir: PathBuf,
}

impl LocalTemplateDir {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        // Invalid names can never have been written; rejecting them here also
        // keeps lookups from escaping the template directory.
        validate_name(name).ok()?;
        Some(self.dir.join(format!("{name}.txt")))
    }

    /// Read the entry for `name`, or `None` if absent or unreadable.
    pub fn read(&self, name: &str) -> Option<String> {
        let path = self.path_for(name)?;
        match std::fs::read_to_string(&path) {
            Ok(body) => Some(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(template = %name, error = %e, "unreadable local template entry");
                None
            }
        }
    }

    /// Write or overwrite the entry for `name`, creating the directory on
    /// first use.
    pub fn write(&self, name: &str, body: &str) -> Result<(), std::io::Error> {
        let Some(path) = self.path_for(name) else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid template name: {name}"),
            ));
        };
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, body)
    }

    /// Remove the entry for `name`. Returns whether an entry existed.
    pub fn remove(&self, name: &str) -> Result<bool, std::io::Error> {
        let Some(path) = self.path_for(name) else {
            return Ok(false);
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_some_and(|p| p.is_file())
    }

    /// Names of all stored entries (unordered).
    pub fn names(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot enumerate local template directory");
                return Vec::new();
            }
        };

        entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                file_name.strip_suffix(".txt").map(str::to_string)
            })
            .collect()
    }
}
