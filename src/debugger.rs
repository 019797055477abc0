//! Interactive step debugger
//!
//! After each step the VM hands the debugger a [`Step`] report and a view of the
//! tape. The debugger prints them, reads one operator command and tells the VM
//! how to resume. It never touches VM state itself.

use crate::{tape::Tape, vm::Step};
use std::io::{BufRead, Write};

const PROMPT: &str = "(s)tep, (c)ontinue, (p)rint, (q)uit > ";

/// Operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step,
    Continue,
    Print,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn new(line: &str) -> Self {
        match line.trim() {
            "" | "s" | "step" => Command::Step,
            "c" | "continue" => Command::Continue,
            "p" | "print" => Command::Print,
            "q" | "quit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// What the VM should do after a suspension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Step,
    Continue,
    Quit,
}

/// Reads commands from `input` and writes reports to `output`.
pub struct Debugger<I: BufRead, O: Write> {
    input: I,
    output: O,
    radius: usize,
}

impl<I: BufRead, O: Write> Debugger<I, O> {
    /// * `radius` cells shown on each side of the data pointer by `print`
    pub fn new(input: I, output: O, radius: usize) -> Self {
        Debugger {
            input,
            output,
            radius,
        }
    }

    /// Report `step` and wait for a command. `print` re-prompts on the same step.
    pub fn suspend(&mut self, step: &Step, tape: &Tape) -> anyhow::Result<Resume> {
        self.report(step)?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // Operator input is gone, nobody is left to ask
                writeln!(self.output)?;
                return Ok(Resume::Continue);
            }

            match Command::new(&line) {
                Command::Step => return Ok(Resume::Step),
                Command::Continue => return Ok(Resume::Continue),
                Command::Quit => return Ok(Resume::Quit),
                Command::Print => self.print_window(step.dp, tape)?,
                Command::Unknown(cmd) => {
                    writeln!(self.output, "Unknown command '{}', stepping", cmd)?;
                    return Ok(Resume::Step);
                }
            }
        }
    }

    /// Give back the report destination
    pub fn into_output(self) -> O {
        self.output
    }

    fn report(&mut self, step: &Step) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Executed '{}' at position {}",
            step.instruction, step.position
        )?;
        writeln!(self.output, "Next PC: {}", step.pc)?;
        writeln!(self.output, "Data pointer: {}", step.dp)?;
        writeln!(self.output, "Current cell value: {}", step.cell)?;
        Ok(())
    }

    fn print_window(&mut self, dp: isize, tape: &Tape) -> anyhow::Result<()> {
        for (addr, value) in tape.window(dp, self.radius) {
            let marker = if addr == dp { '>' } else { ' ' };
            writeln!(self.output, "{} [{:>4}] {:>3}", marker, addr, value)?;
        }
        Ok(())
    }
}
