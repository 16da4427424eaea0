//! The harness between parsed flags and the export pipeline.

use std::io::Write;

use objexport_core::{
    ConnectionConfig, DescriptionCollection, Messages, ObjExportError, OrgAuth, OrgResolver,
    Result, SalesforceAdapter, SchemaSource, run,
};
use tracing::{debug, info};

use crate::Cli;

/// Runs the export described by `cli` against the resolved org.
///
/// Progress lines go to stdout unless `--json` is set, in which case they
/// are discarded so stdout carries only the result document.
///
/// # Errors
/// Returns an error if the message table, the org credentials, or the
/// connection settings are invalid, or if the export itself fails.
pub async fn execute(cli: &Cli) -> Result<DescriptionCollection> {
    let messages = load_messages(cli)?;
    let auth = resolve_org(cli)?;
    let config = connection_config(cli, &auth);
    info!(org = %auth.display_name(), connection = %config, "Connecting to org");

    let adapter = SalesforceAdapter::new(&auth, config)?;
    if cli.json {
        export(cli, &adapter, &messages, &mut std::io::sink()).await
    } else {
        export(cli, &adapter, &messages, &mut std::io::stdout()).await
    }
}

/// Runs the export described by `cli` against an already connected source.
///
/// # Errors
/// Propagates any error from [`objexport_core::run`].
pub async fn export<S, W>(
    cli: &Cli,
    source: &S,
    messages: &Messages,
    progress: &mut W,
) -> Result<DescriptionCollection>
where
    S: SchemaSource + ?Sized,
    W: Write + ?Sized,
{
    run(&cli.export_config(), source, messages, progress).await
}

/// The built-in message table, with `--messages` overrides applied.
///
/// # Errors
/// Returns an error if the override file cannot be read or names an
/// unknown key.
pub fn load_messages(cli: &Cli) -> Result<Messages> {
    match &cli.messages {
        Some(path) => {
            debug!(path = %path.display(), "Loading message overrides");
            Messages::load(path)
        }
        None => Ok(Messages::new()),
    }
}

/// Resolves credentials for the target org.
///
/// # Errors
/// Returns `Configuration` if no auth directory can be determined, or any
/// error from [`OrgResolver::resolve`].
pub fn resolve_org(cli: &Cli) -> Result<OrgAuth> {
    let auth_dir = cli
        .org
        .auth_dir
        .clone()
        .or_else(OrgResolver::default_auth_dir)
        .ok_or_else(|| {
            ObjExportError::configuration(
                "Cannot determine the auth directory; set --auth-dir or OBJEXPORT_AUTH_DIR",
            )
        })?;

    let resolver = OrgResolver::new(auth_dir);
    let (auth, source) = resolver.resolve(
        cli.org.target_org.as_deref(),
        &cli.org.explicit_credentials(),
    )?;
    debug!(org = %auth.display_name(), source = ?source, "Org credentials resolved");
    Ok(auth)
}

/// Connection settings for `auth`.
///
/// The API version comes from `--api-version`, then the version recorded
/// with the org's auth, then the built-in default.
pub fn connection_config(cli: &Cli, auth: &OrgAuth) -> ConnectionConfig {
    let config = ConnectionConfig::new(auth.instance_url.clone())
        .with_request_timeout(cli.org.request_timeout());
    match cli.org.api_version.as_ref().or(auth.api_version.as_ref()) {
        Some(version) => config.with_api_version(version.clone()),
        None => config,
    }
}
