use std::path::PathBuf;

const TOKEN_VAR: &str = "GITHUB_TOKEN";
const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
const OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// Settings taken from the process environment, usually set by GitHub Actions.
#[derive(Clone, Default, PartialEq, Eq)]
pub(crate) struct Environment {
    pub(crate) token: Option<String>,
    /// `owner/repo` of the checkout being updated.
    pub(crate) repository: Option<String>,
    /// Step outputs file.
    pub(crate) output_path: Option<PathBuf>,
}

impl Environment {
    pub(crate) fn from_env() -> Self {
        Self {
            token: non_empty(TOKEN_VAR),
            repository: non_empty(REPOSITORY_VAR),
            output_path: non_empty(OUTPUT_VAR).map(PathBuf::from),
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("repository", &self.repository)
            .field("output_path", &self.output_path)
            .finish()
    }
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[TOKEN_VAR, REPOSITORY_VAR, OUTPUT_VAR];

    fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().expect("mutex poisoned");

        let old_values: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|var| (*var, std::env::var(var).ok()))
            .collect();

        for var in ALL_VARS {
            // SAFETY: Test code runs sequentially with ENV_MUTEX held.
            unsafe { std::env::remove_var(var) };
        }
        for (key, value) in vars {
            // SAFETY: Test code runs sequentially with ENV_MUTEX held.
            unsafe { std::env::set_var(key, value) };
        }

        let result = f();

        for (key, old_value) in old_values {
            match old_value {
                // SAFETY: Test code runs sequentially with ENV_MUTEX held.
                Some(v) => unsafe { std::env::set_var(key, v) },
                // SAFETY: Test code runs sequentially with ENV_MUTEX held.
                None => unsafe { std::env::remove_var(key) },
            }
        }

        result
    }

    #[test]
    fn reads_github_actions_variables() {
        let env = with_env(
            &[
                (TOKEN_VAR, "ghs_secret"),
                (REPOSITORY_VAR, "acme/agent-app"),
                (OUTPUT_VAR, "/tmp/step-output"),
            ],
            Environment::from_env,
        );

        assert_eq!(env.token.as_deref(), Some("ghs_secret"));
        assert_eq!(env.repository.as_deref(), Some("acme/agent-app"));
        assert_eq!(env.output_path, Some(PathBuf::from("/tmp/step-output")));
    }

    #[test]
    fn empty_values_are_unset() {
        let env = with_env(&[(TOKEN_VAR, ""), (REPOSITORY_VAR, "  ")], Environment::from_env);

        assert_eq!(env, Environment::default());
    }

    #[test]
    fn debug_redacts_token() {
        let env = Environment {
            token: Some("ghs_secret".to_string()),
            ..Environment::default()
        };

        let rendered = format!("{env:?}");

        assert!(!rendered.contains("ghs_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
