// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted stand-in for the `aws` executable.

use super::AwsCli;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

/// A shell script posing as `aws`, plus the file its arguments are logged to.
pub struct ScriptedCli {
    pub cli: AwsCli,
    dir: TempDir,
}

impl ScriptedCli {
    /// `body` runs with the CLI arguments in `$@`; `$1` is the service and
    /// `$2` the operation. Every invocation appends its arguments to
    /// `args.log`, one line per call.
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aws");
        let log = dir.path().join("args.log");
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\n{}\n",
            log.display(),
            body
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cli = AwsCli {
            bin: path.display().to_string(),
            region: Some("us-west-2".to_string()),
            profile: None,
            timeout: None,
        };
        Self { cli, dir }
    }

    /// Logged argument lines, one per invocation.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("args.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
