//! Emits the `CustomResourceDefinition` manifest for the microservice API group.
//!
//! Writes YAML to stdout by default, or to a file given as the first
//! argument, so it can be piped straight into `kubectl apply -f -`.
use anyhow::{Context, Result};
use kube::CustomResourceExt;
use microservice_api::v1alpha1::Microservice;
use tracing::info;

fn main() -> Result<()> {
    // logs go to stderr so stdout stays parseable yaml
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let manifest = serde_yaml::to_string(&Microservice::crd())
        .context("failed to render CustomResourceDefinition")?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, &manifest).with_context(|| format!("failed to write {path}"))?;
            info!("wrote {} to {path}", Microservice::crd_name());
        }
        None => print!("---\n{manifest}"),
    }
    Ok(())
}
