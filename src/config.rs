use crate::{
    error::{is_missing_only, ConfigError},
    field::FieldMetadata,
    source::{EnvSource, ProcessEnv},
};
use std::{fmt, sync::Arc};

type Eval<T> = dyn Fn(&dyn EnvSource) -> Result<T, Vec<ConfigError>> + Send + Sync;

/// A composable description of how to produce a `T` from the environment
///
/// Descriptors do nothing until evaluated with [`Config::load_from`] or
/// [`Config::load`]. Cloning is cheap; clones share the same evaluation logic.
///
/// # Example
/// ```rust
/// use env_shape::env;
///
/// let port = env::number_or("PORT", 8080.0).validate("must be a valid port", |p| *p < 65536.0);
/// let source = [("PORT", "3000")];
/// assert_eq!(port.load_from(&source).unwrap(), 3000.0);
/// ```
pub struct Config<T> {
    key: Option<Arc<str>>,
    fields: Vec<FieldMetadata>,
    eval: Arc<Eval<T>>,
}

impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fields: self.fields.clone(),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Config<T> {
    /// Build a descriptor from an evaluation function and the fields it reads
    pub fn from_fn<F>(fields: Vec<FieldMetadata>, eval: F) -> Self
    where
        F: Fn(&dyn EnvSource) -> Result<T, Vec<ConfigError>> + Send + Sync + 'static,
    {
        Self {
            key: None,
            fields,
            eval: Arc::new(eval),
        }
    }

    /// Read one variable and convert its raw text with `parse`
    ///
    /// An unset variable is `Missing`. A value the source cannot read as text,
    /// or a parse failure, becomes `InvalidData` carrying the message.
    pub fn primitive<F>(key: &str, kind: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
    {
        let name: Arc<str> = Arc::from(key);
        let lookup = Arc::clone(&name);
        let mut config = Self::from_fn(vec![FieldMetadata::required(key, kind)], move |source| {
            match source.var(&lookup) {
                Ok(Some(raw)) => parse(&raw)
                    .map_err(|message| vec![ConfigError::invalid_data(&*lookup, message)]),
                Ok(None) => Err(vec![ConfigError::missing(&*lookup)]),
                Err(message) => Err(vec![ConfigError::invalid_data(&*lookup, message)]),
            }
        });
        config.key = Some(name);
        config
    }

    /// Variable key when this descriptor reads exactly one variable
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Metadata for every variable this descriptor reads
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Evaluate against the given environment
    pub fn load_from(&self, source: &dyn EnvSource) -> Result<T, Vec<ConfigError>> {
        (self.eval)(source)
    }

    /// Evaluate against the live process environment
    pub fn load(&self) -> Result<T, Vec<ConfigError>> {
        self.load_from(&ProcessEnv)
    }

    fn derive<U: 'static, F>(self, eval: F) -> Config<U>
    where
        F: Fn(&dyn EnvSource) -> Result<U, Vec<ConfigError>> + Send + Sync + 'static,
    {
        Config {
            key: self.key,
            fields: self.fields,
            eval: Arc::new(eval),
        }
    }

    fn error_key(&self) -> String {
        self.key.as_deref().unwrap_or_default().to_string()
    }

    /// Transform the loaded value
    pub fn map<U: 'static, F>(self, f: F) -> Config<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = Arc::clone(&self.eval);
        self.derive(move |source| inner(source).map(&f))
    }

    /// Fallible transform; an `Err(message)` becomes `InvalidData` on this key
    pub fn try_map<U: 'static, F>(self, f: F) -> Config<U>
    where
        F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
    {
        let inner = Arc::clone(&self.eval);
        let key = self.error_key();
        self.derive(move |source| {
            let value = inner(source)?;
            f(value).map_err(|message| vec![ConfigError::invalid_data(key.as_str(), message)])
        })
    }

    /// Reject values for which `predicate` returns false
    pub fn validate<F>(self, message: impl Into<String>, predicate: F) -> Config<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.try_map(move |value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(message.clone())
            }
        })
    }

    /// Use `default` when every failure is a missing variable
    ///
    /// A variable that is set but invalid is still an error. The default
    /// itself is returned as-is and is never validated. Field metadata does
    /// not record the default; see [`Config::with_default_shown`].
    pub fn with_default(mut self, default: T) -> Config<T>
    where
        T: Clone + Send + Sync,
    {
        for field in &mut self.fields {
            field.required = false;
        }

        let inner = Arc::clone(&self.eval);
        self.derive(move |source| match inner(source) {
            Err(errors) if is_missing_only(&errors) => Ok(default.clone()),
            other => other,
        })
    }

    /// Like [`Config::with_default`], also recording the rendered default in
    /// field metadata when this descriptor reads a single variable
    pub fn with_default_shown(self, default: T) -> Config<T>
    where
        T: Clone + fmt::Display + Send + Sync,
    {
        let rendered = default.to_string();
        let mut config = self.with_default(default);
        if let [field] = config.fields.as_mut_slice() {
            field.default = Some(rendered);
        }
        config
    }

    /// `None` when every failure is a missing variable
    pub fn optional(mut self) -> Config<Option<T>> {
        for field in &mut self.fields {
            field.required = false;
        }

        let inner = Arc::clone(&self.eval);
        self.derive(move |source| match inner(source) {
            Ok(value) => Ok(Some(value)),
            Err(errors) if is_missing_only(&errors) => Ok(None),
            Err(errors) => Err(errors),
        })
    }

    /// Attach a human-readable description to metadata and errors
    ///
    /// Fields and errors that already carry a description keep it, so the
    /// innermost description wins in both docs and error reports.
    pub fn describe(mut self, description: impl Into<String>) -> Config<T> {
        let description: String = description.into();
        for field in &mut self.fields {
            if field.description.is_none() {
                field.description = Some(description.clone());
            }
        }

        let inner = Arc::clone(&self.eval);
        self.derive(move |source| {
            inner(source).map_err(|errors| {
                errors
                    .into_iter()
                    .map(|e| e.with_description(&description))
                    .collect()
            })
        })
    }

    /// Evaluate both descriptors, accumulating errors from each
    pub fn zip<U: 'static>(self, other: Config<U>) -> Config<(T, U)> {
        let mut fields = self.fields;
        fields.extend(other.fields);
        let left = self.eval;
        let right = other.eval;

        Config::from_fn(fields, move |source| match (left(source), right(source)) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(mut a), Err(b)) => {
                a.extend(b);
                Err(a)
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        })
    }

    /// Evaluate every descriptor, accumulating errors from each
    pub fn all(configs: impl IntoIterator<Item = Config<T>>) -> Config<Vec<T>> {
        let configs: Vec<Config<T>> = configs.into_iter().collect();
        let fields = configs
            .iter()
            .flat_map(|c| c.fields.iter().cloned())
            .collect();

        Config::from_fn(fields, move |source| {
            let mut values = Vec::with_capacity(configs.len());
            let mut errors = Vec::new();
            for config in &configs {
                match config.load_from(source) {
                    Ok(value) => values.push(value),
                    Err(e) => errors.extend(e),
                }
            }
            if errors.is_empty() {
                Ok(values)
            } else {
                Err(errors)
            }
        })
    }
}
