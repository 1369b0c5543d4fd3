//! Inventory and Vault Loading
//!
//! The inventory lists the managed hosts with a string-keyed variable map; the vault
//! holds the credential list of each host. Both are YAML files:
//!
//! ```yaml
//! # inventory
//! hosts:
//!   - name: ny-sw01
//!     vars:
//!       os: cisco_nxos
//!       host_overwrite: 10.1.1.1   # optional connection address
//!       api_port: "443"            # optional
//!       api_proto: https           # optional, http or https
//! ```
//!
//! ```yaml
//! # vault
//! credentials:
//!   ny-sw01:
//!     - username: admin
//!       password: secret
//! ```

use crate::credentials::Credential;
use crate::device::{Protocol, Target};
use crate::error::{ExporterError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostCredential {
    pub username: String,
    pub password: String,
}

impl From<&HostCredential> for Credential {
    fn from(c: &HostCredential) -> Self {
        Credential::new(c.username.clone(), c.password.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vault {
    #[serde(default)]
    pub credentials: HashMap<String, Vec<HostCredential>>,
}

/// A host accepted for management, with its resolved connection target
#[derive(Debug, Clone)]
pub struct ManagedHost {
    pub name: String,
    pub module: String,
    pub target: Target,
}

impl Inventory {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExporterError::Config(format!("error reading inventory {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    /// Hosts eligible for scraping with one of `modules`.
    ///
    /// Hosts without `os`, with an unsupported `os` or with an unsupported
    /// `api_proto` are skipped. An inventory without any host is an error.
    pub fn managed_hosts(&self, modules: &[String]) -> Result<Vec<ManagedHost>> {
        if self.hosts.is_empty() {
            return Err(ExporterError::Config("the inventory has no hosts".to_string()));
        }

        let mut managed = Vec::new();
        for host in &self.hosts {
            let Some(os) = host.vars.get("os") else {
                debug!("The host '{}' was skipped because it lacks 'os' attribute", host.name);
                continue;
            };
            if !modules.iter().any(|m| m == os) {
                debug!(
                    "The host '{}' was skipped because 'os' value '{}' is unsupported",
                    host.name, os
                );
                continue;
            }
            let protocol = match host.vars.get("api_proto") {
                None => Protocol::default(),
                Some(value) => match Protocol::parse(value) {
                    Some(protocol) => protocol,
                    None => {
                        debug!(
                            "The host '{}' was skipped because 'api_proto' value '{}' is unsupported",
                            host.name, value
                        );
                        continue;
                    }
                },
            };
            let port = host
                .vars
                .get("api_port")
                .and_then(|p| p.parse::<u16>().ok());
            let address = host
                .vars
                .get("host_overwrite")
                .cloned()
                .unwrap_or_else(|| host.name.clone());

            managed.push(ManagedHost {
                name: host.name.clone(),
                module: os.clone(),
                target: Target::new(address, port, protocol),
            });
        }
        Ok(managed)
    }
}

impl Vault {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExporterError::Config(format!("error reading vault {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    pub fn credentials_for(&self, host: &str) -> Result<Vec<Credential>> {
        match self.credentials.get(host) {
            Some(list) if !list.is_empty() => Ok(list.iter().map(Credential::from).collect()),
            _ => Err(ExporterError::Config(format!(
                "error getting credentials for host {}",
                host
            ))),
        }
    }
}
