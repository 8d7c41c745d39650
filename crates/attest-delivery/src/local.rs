//! Local shell delivery using `std::process::Command`.
//!
//! Runs every command through `sh -c` on this machine, once per entry in the
//! host group, with the entry exported as `ATTEST_HOST`. Useful for
//! verifying the machine attest runs on and for smoke-testing manifests.

use std::process::{Command, Output};

use tracing::{debug, warn};

use attest_contracts::{
    error::{AttestError, AttestResult},
    host::HostGroup,
};
use attest_core::traits::Delivery;

/// Environment variable carrying the current host-group entry.
pub const HOST_ENV: &str = "ATTEST_HOST";

/// Delivery that runs commands on the local machine.
#[derive(Debug, Clone)]
pub struct LocalShellDelivery {
    shell: String,
    sudo: bool,
    verbose: bool,
}

impl LocalShellDelivery {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
            sudo: false,
            verbose: false,
        }
    }

    /// Wrap privileged batches in `sudo -n`.
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// Log each command's stdout and stderr at debug level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Use a different POSIX shell than `sh`.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Program and arguments for one command. sudo resets the environment,
    /// so under sudo the host entry is passed through `env`.
    fn invocation(&self, command: &str, host: Option<&str>, privileged: bool) -> (String, Vec<String>) {
        let mut args = Vec::new();
        let program = if privileged && self.sudo {
            args.push("-n".to_string());
            if let Some(host) = host {
                args.push("env".to_string());
                args.push(format!("{HOST_ENV}={host}"));
            }
            args.push(self.shell.clone());
            "sudo".to_string()
        } else {
            self.shell.clone()
        };
        args.push("-c".to_string());
        args.push(command.to_string());
        (program, args)
    }

    fn run(&self, command: &str, host: Option<&str>, privileged: bool) -> AttestResult<Output> {
        let (program, args) = self.invocation(command, host, privileged);
        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if let Some(host) = host {
            cmd.env(HOST_ENV, host);
        }

        cmd.output().map_err(|e| AttestError::DeliveryFailed {
            reason: format!("failed to spawn '{}': {e}", self.shell),
        })
    }
}

impl Default for LocalShellDelivery {
    fn default() -> Self {
        Self::new()
    }
}

impl Delivery for LocalShellDelivery {
    /// Every command runs for every host entry, even after a failure, so the
    /// log shows the complete picture. An empty group runs the batch once.
    fn process(&self, commands: &[String], hosts: &HostGroup, privileged: bool) -> AttestResult<bool> {
        let targets: Vec<Option<&str>> = if hosts.is_empty() {
            vec![None]
        } else {
            hosts.names().iter().map(|h| Some(h.as_str())).collect()
        };

        let mut all_passed = true;
        for host in targets {
            for command in commands {
                let output = self.run(command, host, privileged)?;
                let host_label = host.unwrap_or("localhost");

                if self.verbose {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    debug!(
                        host = host_label,
                        command = %command,
                        stdout = %stdout.trim_end(),
                        stderr = %stderr.trim_end(),
                        "command output"
                    );
                }

                if !output.status.success() {
                    warn!(
                        host = host_label,
                        command = %command,
                        exit_code = output.status.code().unwrap_or(-1),
                        "predicate command failed"
                    );
                    all_passed = false;
                }
            }
        }

        Ok(all_passed)
    }
}
