use std::{
    collections::{BTreeMap, HashMap},
    env::{self, VarError},
    hash::BuildHasher,
};

/// Read-only view of an environment variable table
///
/// Lookups are exact and case-sensitive. Descriptors only ever read from a
/// source, so the same source can back any number of evaluations.
pub trait EnvSource {
    /// Returns the raw value of `key`, `Ok(None)` if it is not set, or an
    /// error message if it is set but cannot be read as text
    fn var(&self, key: &str) -> Result<Option<String>, String>;
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Result<Option<String>, String> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(raw)) => Err(format!(
                "Expected valid Unicode but received '{}'",
                raw.to_string_lossy()
            )),
        }
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.get(key).cloned())
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.get(key).cloned())
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn var(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string()))
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Result<Option<String>, String> {
        (**self).var(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_env() {
        env::set_var("ENV_SHAPE_SOURCE_TEST", "value");
        assert_eq!(
            ProcessEnv.var("ENV_SHAPE_SOURCE_TEST"),
            Ok(Some("value".to_string()))
        );
        assert_eq!(ProcessEnv.var("ENV_SHAPE_SOURCE_TEST_UNSET"), Ok(None));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_env_not_unicode() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        env::set_var("ENV_SHAPE_SOURCE_NOT_UNICODE", OsStr::from_bytes(&[0x66, 0xff, 0x6f]));

        let message = ProcessEnv.var("ENV_SHAPE_SOURCE_NOT_UNICODE").unwrap_err();
        assert!(message.contains("Unicode"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let source = [("PORT", "8080")];
        assert_eq!(source.var("PORT"), Ok(Some("8080".to_string())));
        assert_eq!(source.var("port"), Ok(None));
    }

    #[test]
    fn test_maps() {
        let mut hash = HashMap::new();
        hash.insert("HOST".to_string(), "localhost".to_string());
        let btree: BTreeMap<_, _> = hash.clone().into_iter().collect();

        assert_eq!(hash.var("HOST"), Ok(Some("localhost".to_string())));
        assert_eq!(btree.var("HOST"), Ok(Some("localhost".to_string())));
        assert_eq!(btree.var("MISSING"), Ok(None));
    }
}
