//! Line-at-a-time interactive shell
//!
//! Each line is a complete program run on a fresh VM; nothing carries over
//! between lines.

use crate::{
    config::VmConfig,
    vm::{BfVm, RunStats},
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    io::{self, Read, Write},
    path::PathBuf,
};
use tracing::debug;

const PROMPT: &str = "tape> ";
const HISTORY_FILE: &str = ".tapevm_history";

/// Runs lines of code read from the terminal.
pub struct Shell {
    config: VmConfig,
    fold: bool,
}

impl Shell {
    pub fn new(config: VmConfig, fold: bool) -> Self {
        Shell { config, fold }
    }

    /// Load and run one line as a whole program.
    pub fn eval<R: Read, W: Write>(
        &self,
        line: &str,
        input: R,
        output: W,
    ) -> anyhow::Result<RunStats> {
        let mut vm = BfVm::load(line.as_bytes(), self.fold, &self.config, input, output)?;
        vm.run()
    }

    /// Read lines until end of input. Errors in a line are reported and the shell goes on.
    pub fn repl(&self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let history = history_path();
        if let Some(ref path) = history {
            let _ = rl.load_history(path);
        }

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let code = line.trim();
                    if code.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(code);

                    let mut stdout = io::stdout().lock();
                    match self.eval(code, io::stdin(), &mut stdout) {
                        Ok(stats) => {
                            debug!(instructions = stats.instructions, "line finished");
                            writeln!(stdout)?;
                        }
                        Err(err) => eprintln!("Error: {:#}", err),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(ref path) = history {
            let _ = rl.save_history(path);
        }
        Ok(())
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(HISTORY_FILE);
        p
    })
}
