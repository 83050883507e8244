use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::CONFIG_FILE_NAME;
use crate::config::UpdaterConfig;
use crate::error::ProjectError;

/// A checkout to update together with its resolved configuration.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory holding `sdkup.toml`, or the start directory when there is none.
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config: UpdaterConfig,
}

impl Project {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.repository.manifest)
    }

    /// Compiles the configured import patterns.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::InvalidImportPattern` for the first pattern that
    /// is not a valid regex.
    pub fn import_patterns(&self) -> Result<Vec<Regex>, ProjectError> {
        compile_patterns(&self.config.sdk.import_patterns)
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ProjectError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ProjectError::InvalidImportPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Walks up from `start_dir` looking for `sdkup.toml`.
#[must_use]
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// # Errors
///
/// Returns `ProjectError::ConfigRead` or `ProjectError::ConfigParse` if the
/// file cannot be read or is not a valid config.
pub fn load_config(path: &Path) -> Result<UpdaterConfig, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: UpdaterConfig =
        toml::from_str(&content).map_err(|source| ProjectError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    validate(path, &config)?;
    Ok(config)
}

fn validate(path: &Path, config: &UpdaterConfig) -> Result<(), ProjectError> {
    if config.sdk.packages.is_empty() {
        return Err(ProjectError::EmptyField {
            path: path.to_path_buf(),
            field: "sdk.packages",
        });
    }
    if config.sdk.release_repository.trim().is_empty() {
        return Err(ProjectError::EmptyField {
            path: path.to_path_buf(),
            field: "sdk.release-repository",
        });
    }
    compile_patterns(&config.sdk.import_patterns)?;
    Ok(())
}

/// Resolves the project for `start_dir`.
///
/// An explicit config path must exist. Without one, the nearest `sdkup.toml`
/// at or above `start_dir` is used, falling back to built-in defaults.
///
/// # Errors
///
/// Returns `ProjectError::ConfigNotFound` if `explicit_config` does not exist,
/// or a read/parse error from loading the config.
pub fn load_project(
    start_dir: &Path,
    explicit_config: Option<&Path>,
) -> Result<Project, ProjectError> {
    let start_dir = start_dir.canonicalize()?;

    let config_path = match explicit_config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                start_dir.join(path)
            };
            if !path.is_file() {
                return Err(ProjectError::ConfigNotFound { path });
            }
            Some(path)
        }
        None => find_config_file(&start_dir),
    };

    let Some(config_path) = config_path else {
        debug!(root = %start_dir.display(), "no config file, using defaults");
        return Ok(Project {
            root: start_dir,
            config_path: None,
            config: UpdaterConfig::default(),
        });
    };

    let config = load_config(&config_path)?;
    let root = if explicit_config.is_some() {
        start_dir
    } else {
        config_path
            .parent()
            .map_or_else(|| start_dir.clone(), Path::to_path_buf)
    };
    debug!(config = %config_path.display(), root = %root.display(), "loaded config");

    Ok(Project {
        root,
        config_path: Some(config_path),
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_with_config(toml_content: &str) -> anyhow::Result<TempDir> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(CONFIG_FILE_NAME), toml_content)?;
        Ok(dir)
    }

    #[test]
    fn defaults_without_config_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let project = load_project(dir.path(), None)?;

        assert!(project.config_path.is_none());
        assert_eq!(project.root, dir.path().canonicalize()?);
        assert_eq!(
            project.manifest_path(),
            dir.path().canonicalize()?.join("backend/requirements.txt")
        );
        assert_eq!(project.import_patterns()?.len(), 6);
        Ok(())
    }

    #[test]
    fn config_found_from_subdirectory() -> anyhow::Result<()> {
        let dir = setup_with_config("[repository]\nmanifest = \"requirements.txt\"\n")?;
        let nested = dir.path().join("backend/app");
        fs::create_dir_all(&nested)?;

        let project = load_project(&nested, None)?;

        assert_eq!(project.root, dir.path().canonicalize()?);
        assert_eq!(
            project.manifest_path(),
            dir.path().canonicalize()?.join("requirements.txt")
        );
        Ok(())
    }

    #[test]
    fn explicit_config_must_exist() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let result = load_project(dir.path(), Some(Path::new("missing.toml")));

        assert!(matches!(result, Err(ProjectError::ConfigNotFound { .. })));
        Ok(())
    }

    #[test]
    fn explicit_config_keeps_start_dir_as_root() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let config_dir = TempDir::new()?;
        let config_path = config_dir.path().join("ci.toml");
        fs::write(&config_path, "[http]\npage-size = 5\n")?;

        let project = load_project(dir.path(), Some(&config_path))?;

        assert_eq!(project.root, dir.path().canonicalize()?);
        assert_eq!(project.config.http.page_size, 5);
        Ok(())
    }

    #[test]
    fn malformed_config_is_parse_error() -> anyhow::Result<()> {
        let dir = setup_with_config("[sdk\n")?;

        let result = load_project(dir.path(), None);

        assert!(matches!(result, Err(ProjectError::ConfigParse { .. })));
        Ok(())
    }

    #[test]
    fn empty_package_list_is_rejected() -> anyhow::Result<()> {
        let dir = setup_with_config("[sdk]\npackages = []\n")?;

        let result = load_project(dir.path(), None);

        assert!(matches!(
            result,
            Err(ProjectError::EmptyField { field: "sdk.packages", .. })
        ));
        Ok(())
    }

    #[test]
    fn invalid_import_pattern_is_rejected() -> anyhow::Result<()> {
        let dir = setup_with_config("[sdk]\nimport-patterns = [\"(unclosed\"]\n")?;

        let result = load_project(dir.path(), None);

        assert!(matches!(
            result,
            Err(ProjectError::InvalidImportPattern { ref pattern, .. }) if pattern == "(unclosed"
        ));
        Ok(())
    }
}
