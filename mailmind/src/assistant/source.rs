use std::collections::{BTreeMap, HashMap};
use std::env;

/// Somewhere configuration values can be looked up by variable name.
///
/// The process environment is the usual source; maps stand in for it in
/// tests and for callers that collect settings from elsewhere.
pub trait ConfigSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values count as unset.
        env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}
