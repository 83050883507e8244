use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::{debug, info};

use crate::{GitError, Repository, Result};

const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Credentials offered to the remote during a push.
#[derive(Clone, Default)]
pub enum PushAuth {
    /// SSH agent for SSH remotes, the git credential helper otherwise.
    #[default]
    Default,
    /// HTTPS token sent as the password for `x-access-token`.
    Token(String),
}

impl fmt::Debug for PushAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let Ok(remote) = self.inner.find_remote(name) else {
            return Ok(None);
        };

        Ok(remote.url().map(String::from))
    }

    /// Pushes the local branch to the same name on `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteNotFound`] for an unknown remote,
    /// [`GitError::PushRejected`] if the remote refuses the update, or a git
    /// error for transport or authentication failures.
    pub fn push(&self, remote: &str, branch: &str, auth: &PushAuth) -> Result<()> {
        let mut origin = self
            .inner
            .find_remote(remote)
            .map_err(|_| GitError::RemoteNotFound {
                name: remote.to_string(),
            })?;

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let rejection: RefCell<Option<String>> = RefCell::new(None);
        let attempts = Cell::new(0usize);
        let config = self.inner.config()?;

        {
            let mut callbacks = git2::RemoteCallbacks::new();
            callbacks.credentials(|url, username, allowed| {
                attempts.set(attempts.get() + 1);
                if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
                    return Err(git2::Error::from_str("authentication failed"));
                }
                match auth {
                    PushAuth::Token(token)
                        if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) =>
                    {
                        git2::Cred::userpass_plaintext("x-access-token", token)
                    }
                    _ if allowed.contains(git2::CredentialType::SSH_KEY) => {
                        git2::Cred::ssh_key_from_agent(username.unwrap_or("git"))
                    }
                    _ => git2::Cred::credential_helper(&config, url, username),
                }
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(reason) = status {
                    debug!(refname, reason, "remote rejected reference");
                    *rejection.borrow_mut() = Some(reason.to_string());
                }
                Ok(())
            });

            let mut options = git2::PushOptions::new();
            options.remote_callbacks(callbacks);
            origin.push(&[refspec.as_str()], Some(&mut options))?;
        }

        if let Some(reason) = rejection.into_inner() {
            return Err(GitError::PushRejected { refspec, reason });
        }

        info!(remote, branch, "pushed branch");
        Ok(())
    }
}
