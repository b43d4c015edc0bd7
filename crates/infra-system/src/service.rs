// Systemd service manager
// Registers the daemon binary as a systemd unit and drives it through systemctl

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use queue_daemon_core::port::{ServiceError, ServiceManager};

/// Default service name
pub const DEFAULT_SERVICE_NAME: &str = "queue-daemon";

/// Default service description
pub const DEFAULT_SERVICE_DESCRIPTION: &str = "queue consumer";

/// Where system units are installed
pub const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

/// Service registration settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
    /// Binary started by the unit (normally the current executable)
    pub exec_path: PathBuf,
    /// Extra arguments appended to ExecStart
    pub exec_args: Vec<String>,
    pub unit_dir: PathBuf,
    /// systemctl binary
    pub systemctl: PathBuf,
    /// Refuse mutating commands unless running as root
    pub require_root: bool,
}

impl ServiceConfig {
    pub fn new(exec_path: impl Into<PathBuf>) -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            description: DEFAULT_SERVICE_DESCRIPTION.to_string(),
            exec_path: exec_path.into(),
            exec_args: Vec::new(),
            unit_dir: PathBuf::from(DEFAULT_UNIT_DIR),
            systemctl: PathBuf::from("systemctl"),
            require_root: true,
        }
    }

    /// Unit for the running executable
    pub fn for_current_exe() -> Result<Self, ServiceError> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn unit_file(&self) -> PathBuf {
        self.unit_dir.join(format!("{}.service", self.name))
    }
}

/// ServiceManager backed by systemd
pub struct SystemdServiceManager {
    config: ServiceConfig,
}

impl SystemdServiceManager {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Render the unit file contents
    pub fn render_unit(&self) -> String {
        let mut exec_start = quote_exec_arg(&self.config.exec_path.display().to_string());
        for arg in &self.config.exec_args {
            exec_start.push(' ');
            exec_start.push_str(&quote_exec_arg(arg));
        }

        format!(
            "[Unit]\n\
             Description={description}\n\
             After=network.target\n\
             \n\
             [Service]\n\
             Type=simple\n\
             ExecStart={exec_start}\n\
             KillSignal=SIGTERM\n\
             Restart=on-failure\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n",
            description = self.config.description,
            exec_start = exec_start,
        )
    }

    fn is_installed(&self) -> bool {
        self.config.unit_file().is_file()
    }

    fn ensure_installed(&self) -> Result<(), ServiceError> {
        if self.is_installed() {
            Ok(())
        } else {
            Err(ServiceError::NotInstalled)
        }
    }

    fn ensure_root(&self) -> Result<(), ServiceError> {
        if !self.config.require_root {
            return Ok(());
        }

        #[cfg(unix)]
        {
            if !nix::unistd::geteuid().is_root() {
                return Err(ServiceError::PermissionDenied);
            }
        }

        Ok(())
    }

    /// Run systemctl and fail on a non-zero exit
    fn systemctl(&self, args: &[&str]) -> Result<String, ServiceError> {
        let command = format!("{} {}", self.config.systemctl.display(), args.join(" "));
        debug!(command = %command, "Running systemctl");

        let output = Command::new(&self.config.systemctl)
            .args(args)
            .output()
            .map_err(|e| ServiceError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ServiceError::Command {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `systemctl is-active` exits non-zero for inactive units, so only stdout counts
    fn is_running(&self) -> Result<bool, ServiceError> {
        let output = Command::new(&self.config.systemctl)
            .args(["is-active", self.config.name.as_str()])
            .output()
            .map_err(|e| ServiceError::Command {
                command: format!("systemctl is-active {}", self.config.name),
                message: e.to_string(),
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).trim() == "active")
    }

    fn write_unit(&self, path: &Path) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.config.unit_dir)?;
        fs::write(path, self.render_unit())?;
        Ok(())
    }
}

impl ServiceManager for SystemdServiceManager {
    fn install(&self) -> Result<String, ServiceError> {
        let action = format!("Installing {}:", self.config.description);

        if self.is_installed() {
            return Err(ServiceError::AlreadyInstalled);
        }
        self.ensure_root()?;

        let unit_file = self.config.unit_file();
        self.write_unit(&unit_file)?;

        let registered = self
            .systemctl(&["daemon-reload"])
            .and_then(|_| self.systemctl(&["enable", &format!("{}.service", self.config.name)]));
        if let Err(e) = registered {
            // Leave nothing behind so the next install starts clean
            if let Err(cleanup) = fs::remove_file(&unit_file) {
                warn!(unit = %unit_file.display(), error = %cleanup, "Failed to remove unit file");
            }
            return Err(e);
        }

        info!(unit = %unit_file.display(), "Service installed");
        Ok(format!("{} OK", action))
    }

    fn remove(&self) -> Result<String, ServiceError> {
        let action = format!("Removing {}:", self.config.description);

        self.ensure_installed()?;
        self.ensure_root()?;

        self.systemctl(&["disable", &format!("{}.service", self.config.name)])?;
        fs::remove_file(self.config.unit_file())?;

        info!(service = %self.config.name, "Service removed");
        Ok(format!("{} OK", action))
    }

    fn start(&self) -> Result<String, ServiceError> {
        let action = format!("Starting {}:", self.config.description);

        self.ensure_installed()?;
        self.ensure_root()?;
        if self.is_running()? {
            return Err(ServiceError::AlreadyRunning);
        }

        self.systemctl(&["start", &format!("{}.service", self.config.name)])?;
        Ok(format!("{} OK", action))
    }

    fn stop(&self) -> Result<String, ServiceError> {
        let action = format!("Stopping {}:", self.config.description);

        self.ensure_installed()?;
        self.ensure_root()?;
        if !self.is_running()? {
            return Err(ServiceError::NotRunning);
        }

        self.systemctl(&["stop", &format!("{}.service", self.config.name)])?;
        Ok(format!("{} OK", action))
    }

    fn status(&self) -> Result<String, ServiceError> {
        self.ensure_installed()?;

        if !self.is_running()? {
            return Ok("Service is stopped".to_string());
        }

        let pid = self.systemctl(&[
            "show",
            "--property=MainPID",
            "--value",
            &format!("{}.service", self.config.name),
        ])?;
        Ok(format!("Service (pid {}) is running...", pid))
    }
}

/// Quote one ExecStart word the way systemd splits command lines.
///
/// `%` and `$` are doubled so systemd does not treat them as specifiers or
/// variable references.
fn quote_exec_arg(arg: &str) -> String {
    let escaped = arg.replace('%', "%%").replace('$', "$$");
    let needs_quotes = escaped.is_empty()
        || escaped
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | ';'));
    if !needs_quotes {
        return escaped;
    }

    let mut quoted = String::with_capacity(escaped.len() + 2);
    quoted.push('"');
    for c in escaped.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
