use crate::{
    config::Config,
    error::ConfigError,
    field::FieldMetadata,
    handle::{make_env, EnvHandle},
    source::EnvSource,
};

/// A typed record assembled from named environment descriptors
///
/// Usually implemented through [`define_env!`](crate::define_env). A
/// `T: Shape` bound lets code depend on a configuration record without
/// knowing where or when it gets loaded.
pub trait Shape: Sized + 'static {
    /// Name used in logs and error reports
    const IDENTIFIER: &'static str;

    /// Composite descriptor evaluating every field
    fn config() -> Config<Self>;

    fn handle() -> EnvHandle<Self> {
        make_env(Self::IDENTIFIER, Self::config())
    }

    /// Load from the process environment, panicking on errors
    fn load() -> Self {
        Self::handle().load()
    }

    /// Load from the process environment, returning every error
    fn load_or_error() -> Result<Self, Vec<ConfigError>> {
        Self::handle().load_or_error()
    }

    fn load_from(source: &dyn EnvSource) -> Result<Self, Vec<ConfigError>> {
        Self::handle().load_from(source)
    }

    fn fields() -> Vec<FieldMetadata> {
        Self::config().fields().to_vec()
    }
}

/// Evaluates fields one by one, collecting errors instead of stopping
///
/// # Example
/// ```rust
/// use env_shape::{env, ShapeBuilder};
///
/// let source = [("HOST", "localhost")];
/// let mut builder = ShapeBuilder::new(&source);
/// let host = builder.field(&env::string("HOST"));
/// let port = builder.field(&env::number("PORT"));
///
/// assert_eq!(host.as_deref(), Some("localhost"));
/// assert_eq!(port, None);
/// assert_eq!(builder.finish().unwrap_err().len(), 1);
/// ```
pub struct ShapeBuilder<'a> {
    source: &'a dyn EnvSource,
    errors: Vec<ConfigError>,
}

impl<'a> ShapeBuilder<'a> {
    pub fn new(source: &'a dyn EnvSource) -> Self {
        Self {
            source,
            errors: Vec::new(),
        }
    }

    /// Evaluate one field, recording its errors if it fails
    pub fn field<T: 'static>(&mut self, config: &Config<T>) -> Option<T> {
        match config.load_from(self.source) {
            Ok(value) => Some(value),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors collected so far, consuming the builder
    pub fn into_errors(self) -> Vec<ConfigError> {
        self.errors
    }

    /// Return any errors that were collected
    pub fn finish(self) -> Result<(), Vec<ConfigError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
