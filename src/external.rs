use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Command that is not a builtin: an executable resolved on the search path.
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: PathBuf, args: Vec<OsString>) -> Self {
        Self { program, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        // PATH is consulted fresh on every attempt; a directory added
        // mid-session is visible to the next lookup.
        let search_paths = env::var_os("PATH")?;
        let program = find_in_path(&search_paths, OsStr::new(name))?;
        Some(Box::new(ExternalCommand::new(
            program,
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program.display()))?;

        // Copy the child's entire standard output, then reap the child.
        // The wait happens even when the copy fails, so no zombie is left
        // behind on an error path.
        let forwarded = match child.stdout.take() {
            Some(mut child_out) => io::copy(&mut child_out, stdout).map(|_| ()),
            None => Ok(()),
        };
        let status = child.wait()?;
        forwarded?;

        Ok(status.code().unwrap_or(0))
    }
}

/// Search the directories of `search_paths` in order for an executable
/// regular file named exactly `name`.
///
/// Returns the first match, or `None` when no directory contains one.
/// There is no suffix inference, no partial matching, and no memoization;
/// the lookup is recomputed on every call.
pub fn find_in_path(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(search_paths) {
        let candidate = dir.join(name);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && has_execute_permission(&meta),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_execute_permission(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_permission(_meta: &fs::Metadata) -> bool {
    true
}
