//! Credential Store & Failover
//!
//! A node may carry several credential sets (rotated secrets, per-team accounts).
//! [`CredentialStore::authenticate`] tries them in stored order against a device:
//!
//! 1. First pass: skip every credential flagged as failed by an earlier attempt.
//! 2. Second pass (only if the first found nothing): retry the flagged credentials,
//!    skipping those already tried in this cycle.
//!
//! A successful attempt clears the credential's flag, a failed one sets it. The
//! flag only biases ordering; it never excludes a credential for good.

use crate::device::types::SystemInfo;
use crate::device::DeviceClient;
use crate::error::{ExporterError, Result};
use secrecy::SecretString;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Outcome of the most recent authentication attempt with a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialState {
    #[default]
    Untried,
    Working,
    Failed,
}

#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: SecretString,
    state: CredentialState,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            state: CredentialState::Untried,
        }
    }

    pub fn failed(&self) -> bool {
        self.state == CredentialState::Failed
    }

    pub fn state(&self) -> CredentialState {
        self.state
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Result of a successful failover run
#[derive(Debug, Clone)]
pub struct Session {
    /// Position of the working credential in the store
    pub credential_index: usize,
    pub username: String,
    pub info: SystemInfo,
}

/// Ordered credential list of one node
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Replace every credential; flags start over
    pub fn replace(&mut self, credentials: Vec<Credential>) {
        self.credentials = credentials;
    }

    /// Run credential failover against `client`.
    ///
    /// Returns `ExporterError::AuthExhausted` when no credential works on either pass.
    pub async fn authenticate(&mut self, node: &str, client: &dyn DeviceClient) -> Result<Session> {
        let mut tried: HashSet<usize> = HashSet::new();

        for include_failed in [false, true] {
            for (index, credential) in self.credentials.iter_mut().enumerate() {
                if tried.contains(&index) || (credential.failed() && !include_failed) {
                    continue;
                }
                tried.insert(index);

                match client
                    .authenticate(&credential.username, &credential.password)
                    .await
                {
                    Ok(info) => {
                        credential.state = CredentialState::Working;
                        debug!(
                            "{}: authenticated as {} (credential #{})",
                            node, credential.username, index
                        );
                        return Ok(Session {
                            credential_index: index,
                            username: credential.username.clone(),
                            info,
                        });
                    }
                    Err(e) => {
                        credential.state = CredentialState::Failed;
                        debug!(
                            "{}: authentication as {} failed: {}",
                            node, credential.username, e
                        );
                    }
                }
            }
        }

        Err(ExporterError::AuthExhausted {
            node: node.to_string(),
        })
    }
}
