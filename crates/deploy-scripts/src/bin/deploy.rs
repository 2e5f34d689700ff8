//! deploy - push the site archive to the web server
//!
//! Exits 0 on success and 1 on any failure.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use deploy_scripts::deploy::{
    archive_size, backup_stamp, run_deployment, site_urls, DEFAULT_ARCHIVE, DEFAULT_BACKUP_ROOT,
    DEFAULT_WEB_ROOT,
};
use deploy_scripts::{DeployConfig, Password, SshShell};

#[derive(Parser, Debug)]
#[command(name = "deploy")]
#[command(version)]
#[command(about = "Deploy the site archive over SSH")]
struct Args {
    /// Server hostname or IP
    #[arg(long, env = "DEPLOY_HOST")]
    host: String,

    /// SSH port
    #[arg(long, default_value = "22")]
    port: u16,

    /// SSH user
    #[arg(long, env = "DEPLOY_USER", default_value = "root")]
    user: String,

    /// SSH password (prompted when omitted)
    #[arg(long, env = "DEPLOY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Local .tar.gz to deploy
    #[arg(long, default_value = DEFAULT_ARCHIVE)]
    archive: PathBuf,

    /// Remote web root
    #[arg(long, default_value = DEFAULT_WEB_ROOT)]
    web_root: String,

    /// Remote directory for timestamped backups
    #[arg(long, default_value = DEFAULT_BACKUP_ROOT)]
    backup_root: String,
}

fn main() -> ExitCode {
    deploy_scripts::init_logging();
    let args = Args::parse();

    match deploy(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("❌ Deployment failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn deploy(args: Args) -> Result<()> {
    println!("🚀 Starting deployment");
    println!("📡 Target: {}", args.host);

    let size = archive_size(&args.archive)?;
    println!("📦 Package size: {:.1} KB", size as f64 / 1024.0);

    let password = match args.password {
        Some(password) => Password::new(password),
        None => {
            print!("SSH password for {}@{}: ", args.user, args.host);
            io::stdout().flush()?;
            Password::new(rpassword::read_password().context("Failed to read password")?)
        }
    };

    let mut config = DeployConfig::new(&args.host, &args.user, password);
    config.port = args.port;
    config.archive = args.archive;
    config.web_root = args.web_root;
    config.backup_root = args.backup_root;

    println!("🔐 Connecting to server...");
    let mut shell = SshShell::connect(&config)
        .with_context(|| format!("Could not connect to {}:{}", config.host, config.port))?;
    println!("✅ Connected to server!");

    let stamp = backup_stamp(chrono::Local::now());
    let mut stdout = io::stdout().lock();
    run_deployment(&config, &mut shell, &stamp, &mut stdout)?;

    writeln!(stdout, "🌐 Your application is now live at:")?;
    for (label, url) in site_urls(&config.host) {
        writeln!(stdout, "   {}: {}", label, url)?;
    }

    Ok(())
}
