use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::external::find_in_path;
use crate::interpreter::Factory;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// The immutable set of command names implemented inside the shell process.
///
/// Used by `type` to report builtins; dispatch itself goes through the
/// factory list, which matches the same names case-sensitively.
pub(crate) const BUILTIN_NAMES: [&str; 5] = ["exit", "echo", "type", "pwd", "cd"];

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command using the provided output stream and environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Print the shell's current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the shell's working directory. Only absolute paths are accepted.
pub struct Cd {
    #[argh(positional)]
    /// absolute path of the directory to switch to.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(target) = self.target else {
            writeln!(stdout, "Usage: cd <path>")?;
            return Ok(1);
        };

        let target = PathBuf::from(target);

        // Relative paths are rejected by design; there is no "resolve
        // relative to current dir" logic in this shell.
        if !target.is_absolute() {
            writeln!(stdout, "Not supported")?;
            return Ok(1);
        }

        match fs::metadata(&target) {
            Ok(meta) if meta.is_dir() => {
                env.current_dir = target;
                Ok(0)
            }
            _ => {
                writeln!(stdout, "cd: {}: No such file or directory", target.display())?;
                Ok(1)
            }
        }
    }
}

#[derive(FromArgs)]
/// Terminate the shell, optionally with an integer exit code.
pub struct Exit {
    #[argh(positional, greedy)]
    /// exit code to terminate with; 0 when omitted or unparsable.
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let code = match self.args.first() {
            None => 0,
            Some(raw) => match raw.parse::<ExitCode>() {
                Ok(code) => code,
                Err(_) => {
                    writeln!(stdout, "Invalid exit code; using 0")?;
                    0
                }
            },
        };

        env.request_exit(code);
        Ok(code)
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by spaces and followed
/// by a newline.
pub struct Echo {
    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.args.join(" "))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Report how a command name would be interpreted: as a shell builtin or as
/// an executable found on the search path.
pub struct Type {
    #[argh(positional)]
    /// command name to look up; compared in lowercase.
    pub name: Option<String>,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        let Some(name) = self.name else {
            writeln!(stdout, "Usage: type <command>")?;
            return Ok(1);
        };

        let name = name.to_lowercase();

        if BUILTIN_NAMES.contains(&name.as_str()) {
            writeln!(stdout, "{} is a shell builtin", name)?;
            return Ok(0);
        }

        // PATH is read fresh on every lookup rather than cached.
        if let Some(search_paths) = env::var_os("PATH") {
            if let Some(path) = find_in_path(&search_paths, OsStr::new(&name)) {
                writeln!(stdout, "{} is {}", name, path.display())?;
                return Ok(0);
            }
        }

        writeln!(stdout, "{}: not found", name)?;
        Ok(1)
    }
}
