use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use crate::lexer;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only support commands defined in this crate — BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter maintains an [`Environment`] and an ordered list of
/// [`CommandFactory`] objects that are queried to create commands by name.
/// See [`Default`] for the built-in factories included out of the box.
///
/// Example
/// ```
/// use minishell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let code = sh.eval_line("echo hello world", &mut out).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"hello world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// The interpreter's session state.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Tokenize and dispatch a single input line, writing all command output
    /// and user-facing error messages to `stdout`.
    ///
    /// An empty or all-whitespace line is a no-op. The first token is matched
    /// case-sensitively against each factory in order; when no factory
    /// recognizes it (builtin or search-path executable), the original input
    /// is reported as not found and the caller's loop simply continues.
    pub fn eval_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let tokens = lexer::split_into_tokens(line);
        let Some((name, args)) = tokens.split_first() else {
            return Ok(0);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }

        writeln!(stdout, "{}: command not found", line)?;
        Ok(127)
    }

    /// The Read-Eval-Print Loop.
    ///
    /// Prompts with `$ `, dispatches one line at a time, and returns the exit
    /// code to terminate with: the code requested by the `exit` builtin, or 0
    /// on end-of-input. Dispatch failures are printed and the loop continues;
    /// only `exit` and end-of-input end the session.
    pub fn repl(&mut self) -> anyhow::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    let mut stdout = io::stdout();
                    if let Err(err) = self.eval_line(&line, &mut stdout) {
                        writeln!(stdout, "{}", err)?;
                    }
                    if let Some(code) = self.env.requested_exit {
                        return Ok(code);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(0),
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `exit`, `echo`, `type`, `pwd`, `cd`
    /// - external command launcher, queried last
    fn default() -> Self {
        use crate::builtin::{Cd, Echo, Exit, Pwd, Type};
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Echo>::default()),
            Box::new(Factory::<Type>::default()),
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_lines_are_noops() {
        let mut sh = Interpreter::default();

        let mut out: Vec<u8> = Vec::new();
        assert_eq!(sh.eval_line("", &mut out).unwrap(), 0);
        assert_eq!(sh.eval_line("   ", &mut out).unwrap(), 0);

        assert!(out.is_empty());
    }

    #[test]
    fn test_unresolvable_command_reports_original_input() {
        let mut sh = Interpreter::default();

        let mut out = Vec::new();
        let code = sh
            .eval_line("zzz_not_a_command_9f3 bar baz", &mut out)
            .unwrap();

        assert_eq!(code, 127);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "zzz_not_a_command_9f3 bar baz: command not found\n"
        );

        // The loop accepts further input afterwards.
        let mut out = Vec::new();
        assert_eq!(sh.eval_line("echo still alive", &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "still alive\n");
    }

    #[test]
    fn test_builtin_dispatch_is_case_sensitive() {
        let mut sh = Interpreter::default();

        let mut out = Vec::new();
        let code = sh.eval_line("ECHO hi", &mut out).unwrap();

        // "ECHO" is not a builtin and is (presumably) on no search path.
        assert_eq!(code, 127);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ECHO hi: command not found\n"
        );
    }

    #[test]
    fn test_exit_builtin_requests_termination() {
        let mut sh = Interpreter::default();

        let mut out: Vec<u8> = Vec::new();
        assert_eq!(sh.eval_line("exit 5", &mut out).unwrap(), 5);
        assert_eq!(sh.env().requested_exit, Some(5));
        assert!(out.is_empty());
    }

    #[test]
    fn test_exit_with_malformed_code_warns_and_requests_zero() {
        let mut sh = Interpreter::default();

        let mut out = Vec::new();
        sh.eval_line("exit abc", &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Invalid exit code; using 0\n");
        assert_eq!(sh.env().requested_exit, Some(0));
    }

    #[test]
    fn test_pwd_is_idempotent_through_dispatch() {
        let mut sh = Interpreter::default();

        let mut out1: Vec<u8> = Vec::new();
        sh.eval_line("pwd", &mut out1).unwrap();
        let mut out2: Vec<u8> = Vec::new();
        sh.eval_line("pwd", &mut out2).unwrap();

        assert_eq!(out1, out2);
        assert!(!out1.is_empty());
    }

    #[test]
    fn test_tokenizer_feeds_dispatch_with_trimmed_words() {
        let mut sh = Interpreter::default();

        let mut out = Vec::new();
        assert_eq!(sh.eval_line("  echo   hi there  ", &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "hi there\n");
    }

    #[test]
    fn test_type_dispatches_as_builtin() {
        let mut sh = Interpreter::default();

        let mut out = Vec::new();
        sh.eval_line("type type", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "type is a shell builtin\n");
    }
}
