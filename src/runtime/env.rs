//! Environment and process-level path operations.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_exe_impl(&self) -> Result<PathBuf> {
        env::current_exe().context("Failed to determine the running executable's path")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine the current directory")
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_env_and_paths() {
        let runtime = RealRuntime;

        // PATH should exist on all systems.
        assert!(runtime.env_var("PATH").is_ok());

        let exe = runtime.current_exe().unwrap();
        assert!(exe.is_absolute());

        let cwd = runtime.current_dir().unwrap();
        assert!(cwd.is_absolute());
    }
}
