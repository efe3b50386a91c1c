use crate::{
    config::Config,
    error::{format_config_errors, ConfigError},
    field::{render_markdown, FieldMetadata},
    source::{EnvSource, ProcessEnv},
};
use std::{fmt, fs, path::Path, sync::Arc};

/// A named loader for one composite configuration
///
/// The handle holds a descriptor and evaluates it on demand. Nothing is
/// cached: every load reads the environment again.
pub struct EnvHandle<T> {
    identifier: Arc<str>,
    config: Config<T>,
}

/// Pair a descriptor with an identifier used in logs and error reports
///
/// Identifiers are for diagnostics only; two handles may share one.
///
/// # Example
/// ```rust
/// use env_shape::{env, make_env};
///
/// let handle = make_env("database", env::url("DATABASE_URL").zip(env::number_or("POOL_SIZE", 5.0)));
/// let (url, pool) = handle
///     .load_from(&[("DATABASE_URL", "postgres://localhost/app")])
///     .unwrap();
/// assert_eq!(url, "postgres://localhost/app");
/// assert_eq!(pool, 5.0);
/// ```
pub fn make_env<T: 'static>(identifier: impl Into<String>, config: Config<T>) -> EnvHandle<T> {
    EnvHandle {
        identifier: Arc::from(identifier.into()),
        config,
    }
}

impl<T: 'static> EnvHandle<T> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The composite descriptor, for evaluation outside this handle
    pub fn config(&self) -> &Config<T> {
        &self.config
    }

    pub fn fields(&self) -> &[FieldMetadata] {
        self.config.fields()
    }

    /// Evaluate against the given environment
    pub fn load_from(&self, source: &dyn EnvSource) -> Result<T, Vec<ConfigError>> {
        tracing::debug!(
            identifier = %self.identifier,
            fields = self.config.fields().len(),
            "loading environment configuration"
        );

        match self.config.load_from(source) {
            Ok(value) => {
                tracing::debug!(identifier = %self.identifier, "environment configuration loaded");
                Ok(value)
            }
            Err(errors) => {
                tracing::warn!(
                    identifier = %self.identifier,
                    errors = errors.len(),
                    "environment configuration failed to load"
                );
                Err(errors)
            }
        }
    }

    /// Evaluate against the live process environment
    pub fn load_or_error(&self) -> Result<T, Vec<ConfigError>> {
        self.load_from(&ProcessEnv)
    }

    /// Evaluate against the live process environment, panicking on errors
    ///
    /// Intended for program start-up, where a bad environment should abort
    /// with a report listing every problem.
    pub fn load(&self) -> T {
        match self.load_or_error() {
            Ok(value) => value,
            Err(errors) => panic!("{}", format_config_errors(&errors)),
        }
    }

    /// Markdown table documenting every variable this handle reads
    pub fn docs_markdown(&self) -> String {
        let mut md = format!("# {}\n\n", self.identifier);
        md.push_str(&render_markdown(self.fields()));
        md
    }

    /// Write configuration documentation to a markdown file
    ///
    /// # Example
    /// ```no_run
    /// use env_shape::{env, make_env};
    ///
    /// let handle = make_env("server", env::number_or("PORT", 8080.0).describe("Server port"));
    /// handle.write_docs("CONFIG.md").unwrap();
    /// ```
    pub fn write_docs(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.docs_markdown())
    }
}

impl<T> Clone for EnvHandle<T> {
    fn clone(&self) -> Self {
        Self {
            identifier: Arc::clone(&self.identifier),
            config: self.config.clone(),
        }
    }
}

impl<T> fmt::Debug for EnvHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvHandle")
            .field("identifier", &self.identifier)
            .field("config", &self.config)
            .finish()
    }
}
