//! Org identity resolution.
//!
//! objexport never performs a login. It turns the target-org identity into
//! an instance URL and an access token that some other tool already
//! obtained, from one of two places:
//!
//! 1. Explicit credentials (`--access-token`/`--instance-url` or the
//!    `SF_ACCESS_TOKEN`/`SF_INSTANCE_URL` environment variables)
//! 2. The CLI auth directory (`~/.sfdx` by default), which holds
//!    `alias.json`, `sfdx-config.json` and one `<username>.json` per org
//!
//! # Security
//! - Tokens are moved into [`AccessToken`] immediately and zeroed on drop
//! - `Debug` output of every type here masks the token

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use crate::Result;
use crate::error::{ObjExportError, redact_token};

/// Name of the directory under the home directory holding org auth files
pub const AUTH_DIR_NAME: &str = ".sfdx";
/// Alias file inside the auth directory
pub const ALIAS_FILE: &str = "alias.json";
/// Local config file naming the default org
pub const CONFIG_FILE: &str = "sfdx-config.json";

/// OAuth access token (session id) that is zeroed when dropped.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw token, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the token is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", redact_token(&self.0))
    }
}

/// Credentials for one org.
#[derive(Debug, Clone)]
pub struct OrgAuth {
    /// Username the credentials belong to, when known
    pub username: Option<String>,
    /// Org instance, e.g. `https://acme.my.salesforce.com`
    pub instance_url: Url,
    /// Session id used as bearer token
    pub access_token: AccessToken,
    /// API version recorded with the auth, if any
    pub api_version: Option<String>,
}

impl OrgAuth {
    /// Name used in log lines: the username when known, else the instance host.
    pub fn display_name(&self) -> String {
        self.username.clone().unwrap_or_else(|| {
            self.instance_url
                .host_str()
                .unwrap_or("unknown-instance")
                .to_string()
        })
    }
}

/// Where credentials were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Explicit flags or environment variables
    Explicit,
    /// Org auth file in the auth directory
    AuthFile(PathBuf),
}

/// Explicitly supplied credentials, usually populated by clap from flags or env.
#[derive(Debug, Clone, Default)]
pub struct ExplicitCredentials {
    /// Access token
    pub access_token: Option<AccessToken>,
    /// Instance URL
    pub instance_url: Option<String>,
}

impl ExplicitCredentials {
    /// Builds explicit credentials from optional raw values.
    pub fn new(access_token: Option<String>, instance_url: Option<String>) -> Self {
        Self {
            access_token: access_token.map(AccessToken::new),
            instance_url,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthFileRecord {
    access_token: String,
    instance_url: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    instance_api_version: Option<String>,
}

impl fmt::Debug for AuthFileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFileRecord")
            .field("access_token", &redact_token(&self.access_token))
            .field("instance_url", &self.instance_url)
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct AliasFile {
    #[serde(default)]
    orgs: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default, rename = "target-org")]
    target_org: Option<String>,
    #[serde(default, rename = "defaultusername")]
    default_username: Option<String>,
}

/// Resolves a target-org identity to [`OrgAuth`].
#[derive(Debug, Clone)]
pub struct OrgResolver {
    auth_dir: PathBuf,
}

impl OrgResolver {
    /// Resolver reading auth files from `auth_dir`.
    pub fn new(auth_dir: impl Into<PathBuf>) -> Self {
        Self {
            auth_dir: auth_dir.into(),
        }
    }

    /// `~/.sfdx`, if a home directory can be determined.
    pub fn default_auth_dir() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(AUTH_DIR_NAME))
    }

    /// Directory auth files are read from.
    pub fn auth_dir(&self) -> &Path {
        &self.auth_dir
    }

    /// Resolves credentials for `target` (username or alias).
    ///
    /// # Errors
    /// - `Configuration` if only one of access token / instance URL is
    ///   given explicitly, or an instance URL does not parse
    /// - `Authentication` if no org is named and no default is configured,
    ///   or no auth file exists for the org
    /// - `Io`/`Serialization` if an auth file exists but cannot be read
    pub fn resolve(
        &self,
        target: Option<&str>,
        explicit: &ExplicitCredentials,
    ) -> Result<(OrgAuth, CredentialSource)> {
        match (&explicit.access_token, &explicit.instance_url) {
            (Some(token), Some(instance_url)) => {
                if token.is_blank() {
                    return Err(ObjExportError::authentication("Access token is empty"));
                }
                let auth = OrgAuth {
                    username: target.map(str::to_string),
                    instance_url: parse_instance_url(instance_url)?,
                    access_token: token.clone(),
                    api_version: None,
                };
                debug!(org = %auth.display_name(), "Using explicitly supplied credentials");
                return Ok((auth, CredentialSource::Explicit));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ObjExportError::configuration(
                    "Access token and instance URL must be supplied together \
                     (SF_ACCESS_TOKEN and SF_INSTANCE_URL)",
                ));
            }
            (None, None) => {}
        }

        let requested = match target {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => self.default_target()?.ok_or_else(|| {
                ObjExportError::authentication(
                    "No target org specified. Use --target-org or configure a default org",
                )
            })?,
        };

        let username = self.expand_alias(&requested)?;
        let path = self.auth_dir.join(format!("{username}.json"));
        if !path.is_file() {
            return Err(ObjExportError::authentication(format!(
                "No authorization information found for org '{requested}'"
            )));
        }

        let record: AuthFileRecord = read_json(&path)?;
        if record.access_token.trim().is_empty() {
            return Err(ObjExportError::authentication(format!(
                "Auth file for org '{requested}' has no access token"
            )));
        }

        let auth = OrgAuth {
            username: Some(record.username.clone().unwrap_or(username)),
            instance_url: parse_instance_url(&record.instance_url)?,
            access_token: AccessToken::new(record.access_token.clone()),
            api_version: record.instance_api_version.clone(),
        };
        debug!(org = %auth.display_name(), auth_file = %path.display(), "Resolved org from auth file");
        Ok((auth, CredentialSource::AuthFile(path)))
    }

    /// Default org from the config file, if configured.
    fn default_target(&self) -> Result<Option<String>> {
        let path = self.auth_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let config: ConfigFile = read_json(&path)?;
        Ok(config.target_org.or(config.default_username))
    }

    /// Maps an alias to its username; anything else is returned unchanged.
    fn expand_alias(&self, name: &str) -> Result<String> {
        let path = self.auth_dir.join(ALIAS_FILE);
        if !path.is_file() {
            return Ok(name.to_string());
        }
        let aliases: AliasFile = read_json(&path)?;
        Ok(aliases
            .orgs
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string()))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ObjExportError::io(format!("Failed to read {}", path.display()), e))?;
    serde_json::from_str(&content)
        .map_err(|e| ObjExportError::serialization(format!("Failed to parse {}", path.display()), e))
}

fn parse_instance_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim())
        .map_err(|e| ObjExportError::configuration(format!("Invalid instance URL '{raw}': {e}")))
}
