//! Tiered named-template storage.
//!
//! Resolution consults an ordered list of sources — the local flat-file store,
//! the compiled-in baseline set, then the remote fetch — and the first hit
//! wins. A remote hit warms the local cache, so the next lookup of the same
//! name is a local hit. The local store is authoritative once populated.

pub mod builtin;
pub mod local;
pub mod remote;

pub use builtin::BuiltinTemplates;
pub use local::LocalTemplateDir;
pub use remote::RemoteTemplateSource;

use serde::Serialize;
use thiserror::Error;

use crate::config;

/// Upper bound on template name length (storage-key safety).
pub const MAX_TEMPLATE_NAME_LEN: usize = 128;

/// Which resolution tier satisfied a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    Local,
    BuiltIn,
    Remote,
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::BuiltIn => write!(f, "built-in"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// A template body together with where it was found.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTemplate {
    pub name: String,
    pub body: String,
    pub source: TemplateSource,
}

/// Errors from template store operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template name '{0}'. Names must be non-empty, at most 128 characters, and must not contain path separators or control characters.")]
    InvalidName(String),

    #[error("Template '{0}' was not found in the local store, the built-in set, or the remote source. Create it or select a template manually.")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Is `name` safe to use as a storage key?
pub fn validate_name(name: &str) -> Result<(), TemplateError> {
    let invalid = || TemplateError::InvalidName(name.to_string());

    // The cap counts characters, not bytes: accented names stay usable.
    if name.trim().is_empty() || name.chars().count() > MAX_TEMPLATE_NAME_LEN {
        return Err(invalid());
    }
    if name == "." || name == ".." {
        return Err(invalid());
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(invalid());
    }
    Ok(())
}

/// One fallback tier consulted when a name is absent locally.
///
/// Lookup failures inside a tier (network errors, unreadable data) degrade to
/// `None` — a tier never surfaces an error to `TemplateStore::get`.
pub trait FallbackSource: Send + Sync {
    fn source(&self) -> TemplateSource;

    fn lookup(&self, name: &str) -> Option<String>;

    /// Names this tier can enumerate without a network round trip.
    fn names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Should a hit from this tier be written back to the local store?
    /// Only the remote tier returns `true`.
    fn warms_local_cache(&self) -> bool {
        false
    }
}

/// The template store: local tier plus an ordered list of fallback sources.
pub struct TemplateStore {
    local: LocalTemplateDir,
    fallbacks: Vec<Box<dyn FallbackSource>>,
}

impl TemplateStore {
    /// Store rooted at the configured templates directory with the standard
    /// tier order: Local, BuiltIn, Remote.
    pub fn open_default() -> Self {
        Self::with_fallbacks(
            LocalTemplateDir::new(config::templates_dir()),
            vec![
                Box::new(BuiltinTemplates),
                Box::new(RemoteTemplateSource::from_env()),
            ],
        )
    }

    /// Store with explicit tiers (tests substitute stub sources here).
    pub fn with_fallbacks(
        local: LocalTemplateDir,
        fallbacks: Vec<Box<dyn FallbackSource>>,
    ) -> Self {
        Self { local, fallbacks }
    }

    /// Resolve `name` through the tier order. A remote hit is persisted to the
    /// local store before returning; a write-back failure is logged and the
    /// body is still returned.
    pub fn get(&self, name: &str) -> Result<ResolvedTemplate, TemplateError> {
        if let Some(body) = self.local.read(name) {
            return Ok(ResolvedTemplate {
                name: name.to_string(),
                body,
                source: TemplateSource::Local,
            });
        }

        for tier in &self.fallbacks {
            let Some(body) = tier.lookup(name) else {
                continue;
            };
            if tier.warms_local_cache() {
                if let Err(e) = self.local.write(name, &body) {
                    tracing::warn!(template = %name, error = %e, "failed to cache remote template locally");
                }
            }
            return Ok(ResolvedTemplate {
                name: name.to_string(),
                body,
                source: tier.source(),
            });
        }

        Err(TemplateError::NotFound(name.to_string()))
    }

    /// Write or overwrite the local entry for `name`. Last write wins.
    pub fn put(&self, name: &str, body: &str) -> Result<(), TemplateError> {
        validate_name(name)?;
        self.local.write(name, body)?;
        Ok(())
    }

    /// Remove the local entry only. Built-in and remote resolution of the same
    /// name still works afterwards.
    pub fn delete(&self, name: &str) -> Result<(), TemplateError> {
        if !self.local.remove(name)? {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Does a local entry exist for `name`?
    pub fn has_local(&self, name: &str) -> bool {
        self.local.exists(name)
    }

    /// Local entry names, sorted. Fallback tiers are excluded to keep the
    /// operation local and fast.
    pub fn list(&self) -> Vec<String> {
        let mut names = self.local.names();
        names.sort();
        names
    }

    /// The closed candidate set for delegated classification: local names
    /// plus every enumerable fallback name, sorted and deduplicated.
    pub fn known_names(&self) -> Vec<String> {
        let mut names = self.local.names();
        for tier in &self.fallbacks {
            names.extend(tier.names());
        }
        names.sort();
        names.dedup();
        names
    }
}
