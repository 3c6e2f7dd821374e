use crate::command::ExitCode;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable session state threaded through every command the shell executes.
///
/// The environment contains:
/// - `current_dir`: the shell's own notion of the working directory. It is
///   initialized from the process's starting directory, mutated only by the
///   `cd` builtin and read by `pwd`; it is never written back to the
///   operating system's working directory.
/// - `requested_exit`: set by the `exit` builtin; the read loop observes it
///   after each dispatch and terminates with the carried code.
///
/// The search path is deliberately *not* part of this state: it is re-read
/// from the process environment on every lookup so that directories added
/// mid-session are visible to the next lookup.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The shell's current working directory.
    pub current_dir: PathBuf,
    /// When set, the read loop should terminate with this exit code.
    pub requested_exit: Option<ExitCode>,
}

impl Environment {
    /// Capture the process's starting directory into a new `Environment`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            requested_exit: None,
        }
    }

    /// Ask the read loop to terminate with `code` once the current command
    /// finishes.
    pub fn request_exit(&mut self, code: ExitCode) {
        self.requested_exit = Some(code);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_env_starts_in_process_dir_without_exit_request() {
        let env = Environment::new();
        assert_eq!(env.current_dir, stdenv::current_dir().unwrap());
        assert_eq!(env.requested_exit, None);
    }

    #[test]
    fn test_request_exit_records_code() {
        let mut env = Environment::new();
        env.request_exit(5);
        assert_eq!(env.requested_exit, Some(5));
    }
}
