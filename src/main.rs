use minishell::Interpreter;

fn main() -> anyhow::Result<()> {
    let code = Interpreter::default().repl()?;
    std::process::exit(code);
}
