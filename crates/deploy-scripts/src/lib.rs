//! # deploy-scripts
//!
//! Single-run deployment tooling for the PHP site:
//! - [`deploy`]: upload an archive over SSH/SFTP and unpack it into the web root
//! - [`validate`]: HTTP smoke checks against the live deployment

pub mod deploy;
pub mod validate;

pub use deploy::{DeployConfig, DeployError, DeployStep, Password, RemoteShell, SshShell};
pub use validate::{Report, SuiteOutcome, ValidationPlan, Validator, Verdict};

/// Install the `tracing` subscriber for the deployment binaries.
///
/// Progress goes to stdout; diagnostics go to stderr under `RUST_LOG` (default `warn`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}
