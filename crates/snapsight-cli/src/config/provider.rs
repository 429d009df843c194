//! Annotation provider configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use snapsight_core::Base64Encoder;
use snapsight_core::annotate::AnnotationGateway;

use super::Cli;

/// Creates the annotation gateway from CLI configuration.
///
/// # Errors
///
/// Returns an error if the vision client cannot be initialized.
pub fn create_gateway(cli: &Cli) -> anyhow::Result<AnnotationGateway> {
    let gateway = build_gateway(cli)?;
    Ok(gateway.with_timeout(Duration::from_secs(cli.timeout_secs)))
}

/// Builds a gateway backed by the remote annotation endpoint.
fn remote_gateway(cli: &Cli) -> anyhow::Result<AnnotationGateway> {
    let config = cli
        .connect
        .clone()
        .into_config()
        .context("invalid annotation endpoint configuration")?;

    let authenticator = config
        .authenticator()
        .context("failed to create authenticator")?;
    let client = config
        .into_client()
        .context("failed to create annotation client")?;

    Ok(AnnotationGateway::from_shared(
        authenticator,
        Arc::new(Base64Encoder),
        Arc::new(client),
    ))
}

#[cfg(not(feature = "mock"))]
fn build_gateway(cli: &Cli) -> anyhow::Result<AnnotationGateway> {
    remote_gateway(cli)
}

/// Prefers the canned backend whenever one is configured.
#[cfg(feature = "mock")]
fn build_gateway(cli: &Cli) -> anyhow::Result<AnnotationGateway> {
    use snapsight_core::mock::MockAuthenticator;

    if cli.mock.is_configured() {
        return Ok(AnnotationGateway::new(
            MockAuthenticator::signed_in(),
            Base64Encoder,
            cli.mock.clone().into_backend(),
        ));
    }

    remote_gateway(cli)
}
