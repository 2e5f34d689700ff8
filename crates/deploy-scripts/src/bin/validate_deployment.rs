//! validate-deployment - smoke-test a live deployment over HTTP
//!
//! Exits 0 only when every suite passes.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use deploy_scripts::{ValidationPlan, Validator};

#[derive(Parser, Debug)]
#[command(name = "validate-deployment")]
#[command(version)]
#[command(about = "Validate a deployed site")]
struct Args {
    /// Base URL of the deployment, e.g. http://203.0.113.10
    #[arg(long, env = "DEPLOY_URL")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    deploy_scripts::init_logging();
    let args = Args::parse();

    let validator = Validator::new(&args.url, ValidationPlan::default())?;

    println!("🧪 Deployment Validation");
    println!("{}", "=".repeat(40));
    println!("🎯 Testing: {}", validator.base_url());
    println!("⏱️ Starting comprehensive tests...");

    let report = validator.run_all().await;
    print!("{}", report.render());

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
