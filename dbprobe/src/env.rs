// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Access to the process environment.

use std::collections::BTreeMap;

/// A source of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the value of the variable, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the names of all variables.
    fn keys(&self) -> Vec<String>;
}

/// The environment of the running process. Every call reads the live
/// environment; nothing is cached between invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn keys(&self) -> Vec<String> {
        std::env::vars_os()
            .map(|(key, _)| key.to_string_lossy().into_owned())
            .collect()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_environment_lists_path() {
        let env = ProcessEnvironment;
        if let Some(path) = std::env::var_os("PATH") {
            assert_eq!(path.into_string().ok(), env.var("PATH"));
            assert!(env.keys().iter().any(|k| k == "PATH"));
        }
    }

    #[test]
    fn map_environment() {
        let mut env = BTreeMap::new();
        env.insert("B".to_owned(), "2".to_owned());
        env.insert("A".to_owned(), "1".to_owned());
        assert_eq!(Some("1".to_owned()), env.var("A"));
        assert_eq!(None, env.var("C"));
        assert_eq!(vec!["A".to_owned(), "B".to_owned()], Environment::keys(&env));
    }
}
