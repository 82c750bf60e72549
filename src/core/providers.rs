//! Collaborators that supply form schemas, profile data and label translations

use crate::core::error::{FieldError, Result};
use crate::core::models::{FormContext, FormContextType, FormSchema, ProfileData};
use crate::{debug, verbose};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Source of compiled form schemas
pub trait SchemaProvider {
    /// Read the form for a context and context type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::FormNotFound`] when no form exists, or a parse error.
    fn read_form(&self, context: FormContext, context_type: FormContextType) -> Result<FormSchema>;
}

/// Source of per-user profile data
pub trait ProfileProvider {
    /// Read the profile of a user.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ProfileNotFound`] when the user is unknown, or a parse error.
    fn profile(&self, user_id: &str) -> Result<ProfileData>;
}

/// Maps label keys such as `FORM.GENDER` to display text
pub trait LabelTranslator {
    /// Text for `key`, or `fallback` when there is no translation
    fn translate(&self, key: &str, fallback: &str) -> String;
}

/// Translator that never translates
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl LabelTranslator for PassthroughTranslator {
    fn translate(&self, _key: &str, fallback: &str) -> String {
        fallback.to_string()
    }
}

/// Translator backed by a flat key to text catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    /// Build from key and text pairs
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Load a `{"KEY": "text"}` catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a flat string map.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }
}

impl LabelTranslator for CatalogTranslator {
    fn translate(&self, key: &str, fallback: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Reads form definitions from `<dir>/<context>.<context_type>.json`
#[derive(Debug, Clone)]
pub struct DirectorySchemaProvider {
    dir: PathBuf,
}

impl DirectorySchemaProvider {
    /// Provider rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a form is read from
    #[must_use]
    pub fn form_path(&self, context: FormContext, context_type: FormContextType) -> PathBuf {
        self.dir.join(format!("{context}.{context_type}.json"))
    }
}

impl SchemaProvider for DirectorySchemaProvider {
    fn read_form(&self, context: FormContext, context_type: FormContextType) -> Result<FormSchema> {
        let path = self.form_path(context, context_type);
        verbose!("Reading form {context}/{context_type} from {}", path.display());

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FieldError::FormNotFound {
                context: context.to_string(),
                context_type: context_type.to_string(),
                path: path.clone(),
            },
            _ => FieldError::Io(e),
        })?;
        FormSchema::from_json(&content)
    }
}

/// Reads profiles from `<dir>/<user_id>.json`
#[derive(Debug, Clone)]
pub struct DirectoryProfileProvider {
    dir: PathBuf,
}

impl DirectoryProfileProvider {
    /// Provider rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a profile is read from
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidInput`] for ids that are empty or contain path separators.
    pub fn profile_path(&self, user_id: &str) -> Result<PathBuf> {
        if user_id.is_empty() || user_id.contains(['/', '\\']) || user_id == ".." {
            return Err(FieldError::invalid(format!("invalid user id '{user_id}'")));
        }
        Ok(self.dir.join(format!("{user_id}.json")))
    }
}

impl ProfileProvider for DirectoryProfileProvider {
    fn profile(&self, user_id: &str) -> Result<ProfileData> {
        let path = self.profile_path(user_id)?;
        verbose!("Reading profile {user_id} from {}", path.display());

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FieldError::ProfileNotFound {
                user_id: user_id.to_string(),
                path: path.clone(),
            },
            _ => FieldError::Io(e),
        })?;
        ProfileData::from_json(&content)
    }
}

type FormKey = (FormContext, FormContextType);

/// Caches the forms read through another provider until invalidated.
///
/// Failed reads are not cached.
#[derive(Debug)]
pub struct CachedSchemaProvider<P> {
    inner: P,
    cache: Mutex<HashMap<FormKey, FormSchema>>,
}

impl<P: SchemaProvider> CachedSchemaProvider<P> {
    /// Wrap a provider
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop the cached form for one context
    pub fn invalidate(&self, context: FormContext, context_type: FormContextType) {
        self.lock().remove(&(context, context_type));
    }

    /// Drop every cached form
    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    /// Number of cached forms
    #[must_use]
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    /// The wrapped provider
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    // The cache holds plain data, so a panic elsewhere cannot leave it inconsistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<FormKey, FormSchema>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: SchemaProvider> SchemaProvider for CachedSchemaProvider<P> {
    fn read_form(&self, context: FormContext, context_type: FormContextType) -> Result<FormSchema> {
        let key = (context, context_type);
        if let Some(schema) = self.lock().get(&key) {
            debug!("Form cache hit for {context}/{context_type}");
            return Ok(schema.clone());
        }

        let schema = self.inner.read_form(context, context_type)?;
        self.lock().insert(key, schema.clone());
        Ok(schema)
    }
}
