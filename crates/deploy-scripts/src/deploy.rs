//! Push a site archive to a web server over SSH and unpack it in place
//!
//! The flow: check the local archive, upload it to `/tmp` over SFTP, then run
//! a fixed command sequence (backup, extract, permissions, cleanup, reload).
//! Each command runs in its own SSH channel, so every step names absolute
//! paths instead of relying on a working directory.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ssh2::{ExtendedData, Session};
use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_ARCHIVE: &str = "ezedit-complete-deployment.tar.gz";
pub const DEFAULT_WEB_ROOT: &str = "/var/www/html";
pub const DEFAULT_BACKUP_ROOT: &str = "/backup";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Deployment file '{0}' not found!")]
    ArchiveNotFound(PathBuf),

    #[error("Cannot resolve {0}")]
    InvalidAddress(String),

    #[error("SSH error - {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Authentication failed for {0}")]
    Authentication(String),

    #[error("Step '{label}' failed with exit status {status}: {output}")]
    CommandFailed {
        label: String,
        status: i32,
        output: String,
    },

    #[error("IOError - {0}")]
    Io(#[from] io::Error),
}

/// SSH password - zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Where and what to deploy
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Password,
    pub archive: PathBuf,
    pub web_root: String,
    pub backup_root: String,
    pub timeout: Duration,
}

impl DeployConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: Password) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            password,
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            web_root: DEFAULT_WEB_ROOT.to_string(),
            backup_root: DEFAULT_BACKUP_ROOT.to_string(),
            timeout: CONNECT_TIMEOUT,
        }
    }

    /// Archive file name without directories
    pub fn archive_name(&self) -> String {
        self.archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_ARCHIVE.to_string())
    }

    /// Upload target: `/tmp/<archive name>`
    pub fn remote_archive(&self) -> String {
        format!("/tmp/{}", self.archive_name())
    }
}

/// One remote command with the progress label printed before it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployStep {
    pub label: &'static str,
    pub command: String,
    /// Non-zero exit aborts the deployment
    pub required: bool,
}

impl DeployStep {
    fn required(label: &'static str, command: String) -> Self {
        Self {
            label,
            command,
            required: true,
        }
    }

    fn optional(label: &'static str, command: String) -> Self {
        Self {
            label,
            command,
            required: false,
        }
    }
}

/// Quote `value` for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Backup directory name for a deployment started at `now`
pub fn backup_stamp(now: chrono::DateTime<chrono::Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// The remote command sequence, in order. `stamp` names the backup directory.
pub fn deploy_steps(config: &DeployConfig, stamp: &str) -> Vec<DeployStep> {
    let web_root = shell_quote(&config.web_root);
    let backup_dir = shell_quote(&format!(
        "{}/{}",
        config.backup_root.trim_end_matches('/'),
        stamp
    ));
    let archive = shell_quote(&config.remote_archive());

    let mut steps = vec![
        DeployStep::required("Creating backup...", format!("mkdir -p {}", backup_dir)),
        DeployStep::optional(
            "Copying current site to backup...",
            format!("cp -r {}/. {}/ 2>/dev/null || true", web_root, backup_dir),
        ),
        DeployStep::required(
            "Extracting deployment package...",
            format!(
                "mkdir -p {root} && tar -xzf {archive} --strip-components=1 -C {root}",
                root = web_root,
                archive = archive
            ),
        ),
        DeployStep::required(
            "Setting permissions...",
            format!("chown -R www-data:www-data {}", web_root),
        ),
        DeployStep::required(
            "Setting directory permissions...",
            format!("chmod -R 755 {}", web_root),
        ),
    ];

    for ext in ["php", "css", "js"] {
        steps.push(DeployStep::required(
            "Setting file permissions...",
            format!("find {} -name '*.{}' -exec chmod 644 {{}} \\;", web_root, ext),
        ));
    }

    steps.push(DeployStep::required(
        "Cleaning up...",
        format!("rm -f {}", archive),
    ));
    steps.push(DeployStep::optional(
        "Restarting web server...",
        "systemctl reload nginx 2>/dev/null || true".to_string(),
    ));

    steps
}

/// Size of the local archive in bytes
pub fn archive_size(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => Err(DeployError::ArchiveNotFound(path.to_path_buf())),
    }
}

/// Pages worth opening after a deployment
pub fn site_urls(host: &str) -> Vec<(&'static str, String)> {
    [
        ("Homepage", "index.php"),
        ("Dashboard", "dashboard.php"),
        ("Editor", "editor.php"),
        ("Login", "auth/login.php"),
        ("Register", "auth/register.php"),
        ("Documentation", "docs.php"),
    ]
    .into_iter()
    .map(|(label, path)| (label, format!("http://{}/{}", host, path)))
    .collect()
}

/// Output of one remote command; stderr is interleaved into `output`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub output: String,
}

/// What a deployment needs from the remote host
pub trait RemoteShell {
    /// Copy a local file to `remote_path`, returning bytes written
    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<u64>;

    /// Run one command and wait for it to exit
    fn exec(&mut self, command: &str) -> Result<CommandOutput>;
}

/// Password-authenticated SSH session
pub struct SshShell {
    session: Session,
}

impl SshShell {
    pub fn connect(config: &DeployConfig) -> Result<Self> {
        let address = format!("{}:{}", config.host, config.port);
        let addr = address
            .to_socket_addrs()
            .map_err(|e| DeployError::InvalidAddress(format!("{}: {}", address, e)))?
            .next()
            .ok_or_else(|| DeployError::InvalidAddress(address.clone()))?;

        info!("Connecting to {}@{}", config.username, address);

        let tcp = TcpStream::connect_timeout(&addr, config.timeout)?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(config.timeout.as_millis().min(u32::MAX as u128) as u32);
        session.handshake()?;
        session.userauth_password(&config.username, config.password.expose())?;

        if !session.authenticated() {
            return Err(DeployError::Authentication(config.username.clone()));
        }

        // Commands may run longer than the connect timeout
        session.set_timeout(0);
        Ok(Self { session })
    }
}

impl RemoteShell for SshShell {
    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<u64> {
        let sftp = self.session.sftp()?;
        let mut source = File::open(local)?;
        let mut target = sftp.create(Path::new(remote_path))?;
        let written = io::copy(&mut source, &mut target)?;
        debug!("Uploaded {} bytes to {}", written, remote_path);
        Ok(written)
    }

    fn exec(&mut self, command: &str) -> Result<CommandOutput> {
        let mut channel = self.session.channel_session()?;
        // One stream to drain, so a chatty stderr cannot stall the channel
        channel.handle_extended_data(ExtendedData::Merge)?;
        channel.exec(command)?;

        let mut raw = Vec::new();
        channel.read_to_end(&mut raw)?;

        channel.wait_close()?;
        Ok(CommandOutput {
            status: channel.exit_status()?,
            output: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

/// Upload the archive and run every step, reporting progress to `out`
pub fn run_deployment(
    config: &DeployConfig,
    shell: &mut dyn RemoteShell,
    stamp: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let remote_archive = config.remote_archive();

    writeln!(out, "📤 Uploading deployment package...")?;
    let written = shell.upload(&config.archive, &remote_archive)?;
    writeln!(out, "✅ Upload completed! ({:.1} KB)", written as f64 / 1024.0)?;

    writeln!(out, "🔧 Deploying application...")?;
    let mut last_label = "";
    for step in deploy_steps(config, stamp) {
        if step.label != last_label {
            writeln!(out, "   {}", step.label)?;
            last_label = step.label;
        }

        debug!("Running: {}", step.command);
        let output = shell.exec(&step.command)?;

        let text = output.output.trim();
        if !text.is_empty() {
            writeln!(out, "   {}", text)?;
        }

        if output.status != 0 {
            if step.required {
                return Err(DeployError::CommandFailed {
                    label: step.label.to_string(),
                    status: output.status,
                    output: text.to_string(),
                });
            }
            warn!("{} exited with {}", step.command, output.status);
        }
    }

    writeln!(out, "✅ Deployment completed successfully!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingShell {
        uploads: Vec<(PathBuf, String)>,
        commands: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl RemoteShell for RecordingShell {
        fn upload(&mut self, local: &Path, remote_path: &str) -> Result<u64> {
            self.uploads.push((local.to_path_buf(), remote_path.to_string()));
            Ok(2048)
        }

        fn exec(&mut self, command: &str) -> Result<CommandOutput> {
            self.commands.push(command.to_string());
            let failed = self.fail_on.map(|f| command.starts_with(f)).unwrap_or(false);
            Ok(CommandOutput {
                status: if failed { 2 } else { 0 },
                output: if failed { "tar: Error".into() } else { String::new() },
            })
        }
    }

    fn config() -> DeployConfig {
        let mut config = DeployConfig::new("203.0.113.10", "root", Password::new("secret"));
        config.archive = PathBuf::from("build/site.tar.gz");
        config
    }

    #[test]
    fn test_steps_use_absolute_paths() {
        let steps = deploy_steps(&config(), "20240501_101500");
        let commands: Vec<&str> = steps.iter().map(|s| s.command.as_str()).collect();

        assert_eq!(commands[0], "mkdir -p '/backup/20240501_101500'");
        assert_eq!(
            commands[1],
            "cp -r '/var/www/html'/. '/backup/20240501_101500'/ 2>/dev/null || true"
        );
        assert_eq!(
            commands[2],
            "mkdir -p '/var/www/html' && tar -xzf '/tmp/site.tar.gz' --strip-components=1 -C '/var/www/html'"
        );
        assert_eq!(commands[3], "chown -R www-data:www-data '/var/www/html'");
        assert_eq!(commands[4], "chmod -R 755 '/var/www/html'");
        assert_eq!(
            commands[5],
            "find '/var/www/html' -name '*.php' -exec chmod 644 {} \\;"
        );
        assert!(commands[7].contains("'*.js'"));
        assert_eq!(commands[8], "rm -f '/tmp/site.tar.gz'");
        assert_eq!(commands[9], "systemctl reload nginx 2>/dev/null || true");
        assert_eq!(steps.len(), 10);
        assert!(!steps[9].required);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/var/www"), "'/var/www'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_run_deployment_order() {
        let config = config();
        let mut shell = RecordingShell::default();
        let mut out = Vec::new();

        run_deployment(&config, &mut shell, "20240501_101500", &mut out).unwrap();

        assert_eq!(
            shell.uploads,
            vec![(PathBuf::from("build/site.tar.gz"), "/tmp/site.tar.gz".to_string())]
        );
        assert_eq!(shell.commands.len(), 10);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("✅ Upload completed! (2.0 KB)"));
        assert_eq!(out.matches("Setting file permissions...").count(), 1);
        assert!(out.ends_with("✅ Deployment completed successfully!\n"));
    }

    #[test]
    fn test_required_step_failure_stops() {
        let config = config();
        let mut shell = RecordingShell {
            fail_on: Some("mkdir -p '/var/www/html' && tar"),
            ..Default::default()
        };
        let mut out = Vec::new();

        let err = run_deployment(&config, &mut shell, "stamp", &mut out).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Step 'Extracting deployment package...' failed with exit status 2: tar: Error"
        );
        assert_eq!(shell.commands.len(), 3);
        // Error text arrives on the merged output stream and is echoed
        assert!(String::from_utf8(out).unwrap().contains("   tar: Error\n"));
    }

    #[test]
    fn test_archive_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.tar.gz");
        assert!(matches!(
            archive_size(&path),
            Err(DeployError::ArchiveNotFound(_))
        ));

        std::fs::write(&path, vec![0u8; 3072]).unwrap();
        assert_eq!(archive_size(&path).unwrap(), 3072);
    }

    #[test]
    fn test_site_urls() {
        let urls = site_urls("203.0.113.10");
        assert_eq!(urls[0], ("Homepage", "http://203.0.113.10/index.php".to_string()));
        assert_eq!(urls.len(), 6);
    }
}
