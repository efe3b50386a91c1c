//! Declarative, type-safe environment variable shapes
//!
//! Describe each variable with a combinator from [`env`], group them into a
//! struct with [`define_env!`], and load the whole record at once. Loading
//! reports every missing or invalid variable, not just the first.
//!
//! ```rust
//! use env_shape::{define_env, env, Redacted, Shape};
//!
//! define_env! {
//!     #[derive(Debug)]
//!     #[env(id = "app")]
//!     pub struct AppEnv {
//!         #[field(config = env::string("APP_NAME"), doc = "Service name")]
//!         pub name: String,
//!         #[field(config = env::number_or("APP_PORT", 8080.0))]
//!         pub port: f64,
//!         #[field(config = env::redacted("APP_TOKEN"))]
//!         pub token: Redacted,
//!     }
//! }
//!
//! let source = [("APP_NAME", "api"), ("APP_TOKEN", "s3cr3t")];
//! let app = AppEnv::load_from(&source).unwrap();
//! assert_eq!(app.name, "api");
//! assert_eq!(app.port, 8080.0);
//! assert!(!format!("{:?}", app).contains("s3cr3t"));
//! ```

extern crate self as env_shape;

pub mod config;
pub mod env;
pub mod error;
pub mod field;
pub mod handle;
pub mod redacted;
pub mod shape;
pub mod source;

// Re-export main types
pub use config::Config;
pub use error::{format_config_errors, ConfigError};
pub use field::FieldMetadata;
pub use handle::{make_env, EnvHandle};
pub use redacted::{Redacted, REDACTED};
pub use shape::{Shape, ShapeBuilder};
pub use source::{EnvSource, ProcessEnv};

// Re-export macro
pub use env_shape_macros::define_env;
