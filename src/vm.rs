//! Virtual machine that runs the bytecode

use crate::{
    bytecode::{Bytecode, Instruction, Parser},
    config::VmConfig,
    debugger::{Debugger, Resume},
    error::ExecError,
    io::{InputSource, OutputSink},
    tape::Tape,
};
use std::io::{BufRead, Read, Write};
use tracing::info;

/// What happened in one step, as seen right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Position of the instruction that just ran
    pub position: usize,
    pub instruction: Instruction,
    /// Position of the next instruction to run
    pub pc: usize,
    pub dp: isize,
    /// Value of the cell under `dp`
    pub cell: u8,
}

/// Counters gathered over one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub instructions: u64,
    /// Tape cells allocated at the end, which is also the peak
    pub tape_cells: usize,
    pub output_bytes: u64,
    pub input_bytes: u64,
}

/// How a debug session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Completed(RunStats),
    /// Operator quit; buffered output was not flushed
    Quit,
}

/// Virtual machine representation
pub struct BfVm<R: Read, W: Write> {
    bytecode: Bytecode,
    pc: usize,   // next instruction
    dp: isize,   // data pointer
    tape: Tape,
    input: InputSource<R>,
    output: OutputSink<W>,
    executed: u64,
    finished: bool,
}

impl<R: Read, W: Write> BfVm<R, W> {
    /// Parse `program` and prepare a VM for it.
    pub fn load(
        program: &[u8],
        fold: bool,
        config: &VmConfig,
        input: R,
        output: W,
    ) -> anyhow::Result<Self> {
        let bytecode = Parser::new(program).fold(fold).parse()?;
        Ok(Self::new(bytecode, config, input, output))
    }

    pub fn new(bytecode: Bytecode, config: &VmConfig, input: R, output: W) -> Self {
        BfVm {
            bytecode,
            pc: 0,
            dp: 0,
            tape: Tape::new(config.tape_limit),
            input: InputSource::new(input),
            output: OutputSink::new(output, config.output_threshold),
            executed: 0,
            finished: false,
        }
    }

    /// Run to the end of the program and flush output.
    pub fn run(&mut self) -> anyhow::Result<RunStats> {
        if self.finished {
            return Err(ExecError::AlreadyFinished.into());
        }

        while self.pc < self.bytecode.len() {
            self.execute_current()?;
        }

        self.finish()
    }

    /// Run with `debugger` suspending after every step until it says otherwise.
    pub fn run_debug<I: BufRead, O: Write>(
        &mut self,
        debugger: &mut Debugger<I, O>,
    ) -> anyhow::Result<Exit> {
        if self.finished {
            return Err(ExecError::AlreadyFinished.into());
        }

        let mut suspended = true;
        while self.pc < self.bytecode.len() {
            let step = self.next_instruction()?;
            if !suspended {
                continue;
            }

            match debugger.suspend(&step, &self.tape)? {
                Resume::Step => {}
                Resume::Continue => suspended = false,
                Resume::Quit => {
                    self.finished = true;
                    return Ok(Exit::Quit);
                }
            }
        }

        Ok(Exit::Completed(self.finish()?))
    }

    /// Execute exactly one instruction and report the resulting state.
    pub fn next_instruction(&mut self) -> anyhow::Result<Step> {
        if self.finished || self.pc >= self.bytecode.len() {
            return Err(ExecError::AlreadyFinished.into());
        }

        let position = self.pc;
        let instruction = self.bytecode.instructions[position];
        self.execute_current()?;

        Ok(Step {
            position,
            instruction,
            pc: self.pc,
            dp: self.dp,
            cell: self.tape.read(self.dp),
        })
    }

    #[inline]
    fn execute_current(&mut self) -> anyhow::Result<()> {
        let instruction = self.bytecode.instructions[self.pc];

        match instruction {
            Instruction::Right => {
                self.dp += 1;
                self.tape.grow_to(self.dp)?;
            }
            Instruction::Left => {
                self.dp -= 1;
                self.tape.grow_to(self.dp)?;
            }
            Instruction::Incr(n) => {
                let cell = self.tape.cell_mut(self.dp)?;
                *cell = cell.wrapping_add(n);
            }
            Instruction::Decr(n) => {
                let cell = self.tape.cell_mut(self.dp)?;
                *cell = cell.wrapping_sub(n);
            }
            Instruction::Output => self.output.push(self.tape.read(self.dp))?,
            Instruction::Input => {
                let byte = self.input.read_byte();
                self.tape.write(self.dp, byte)?;
            }
            Instruction::LoopOpen => {
                if self.tape.read(self.dp) == 0 {
                    self.pc = self.bytecode.jump_table.target(self.pc);
                }
            }
            Instruction::LoopClose => {
                if self.tape.read(self.dp) != 0 {
                    self.pc = self.bytecode.jump_table.target(self.pc);
                }
            }
        }

        // A taken jump lands on the partner bracket; stepping past it is the same
        // as re-testing there, since both test the same cell.
        self.pc += 1;
        self.executed += 1;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<RunStats> {
        self.output.flush()?;
        self.finished = true;

        let stats = self.stats();
        info!(
            instructions = stats.instructions,
            tape_cells = stats.tape_cells,
            output_bytes = stats.output_bytes,
            "program finished"
        );
        Ok(stats)
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            instructions: self.executed,
            tape_cells: self.tape.len(),
            output_bytes: self.output.written(),
            input_bytes: self.input.consumed(),
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn dp(&self) -> isize {
        self.dp
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Give back the output destination. Only flushed output is in it.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    type TestVm<'a> = BfVm<&'a [u8], Vec<u8>>;

    fn load<'a>(program: &str, input: &'a [u8]) -> TestVm<'a> {
        BfVm::load(
            program.as_bytes(),
            false,
            &VmConfig::default(),
            input,
            Vec::new(),
        )
        .unwrap()
    }

    fn run(program: &str, input: &[u8]) -> Vec<u8> {
        let mut vm = load(program, input);
        vm.run().unwrap();
        vm.into_output()
    }

    #[test]
    fn multiply_loop() {
        assert_eq!(run("++++[>++++<-]>.", b""), vec![16]);
    }

    #[test]
    fn hello() {
        let program = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        assert_eq!(run(program, b""), b"Hello World!\n");
    }

    #[test]
    fn echo() {
        let mut vm = load(",.", b"AB");
        let stats = vm.run().unwrap();
        assert_eq!(stats.input_bytes, 1);
        assert_eq!(stats.output_bytes, 1);
        assert_eq!(vm.into_output(), b"A");
    }

    #[test]
    fn echo_without_input() {
        assert_eq!(run("+,.", b""), vec![0]);
    }

    #[test]
    fn wraparound() {
        let program = "+".repeat(257) + ".";
        assert_eq!(run(&program, b""), vec![1]);
        assert_eq!(run("-.", b""), vec![255]);
    }

    #[test]
    fn left_of_origin() {
        // Write 5 at address -1 and come back: address 0 must still be 3
        let mut vm = load("+++<+++++>", b"");
        vm.run().unwrap();
        assert_eq!(vm.dp(), 0);
        assert_eq!(vm.tape().read(0), 3);
        assert_eq!(vm.tape().read(-1), 5);
        assert_eq!(vm.tape().extent(), (-1, 0));
    }

    #[test]
    fn skips_loop_on_zero() {
        assert_eq!(run("[.+]+.", b""), vec![1]);
    }

    #[test]
    fn repeatable() {
        let program = "++[>+++[>++<-]<-]<<-";
        let mut first = load(program, b"");
        let mut second = load(program, b"");
        let a = first.run().unwrap();
        let b = second.run().unwrap();

        assert_eq!(a, b);
        assert_eq!(first.tape().cells(), second.tape().cells());
        assert_eq!(first.tape().cells(), vec![255, 0, 0, 0, 12]);
    }

    #[test]
    fn counts_instructions() {
        let mut vm = load("+[-]", b"");
        let stats = vm.run().unwrap();
        // + [ - ] (exit)
        assert_eq!(stats.instructions, 4);
        assert_eq!(stats.tape_cells, 1);
    }

    #[test]
    fn folded_matches_unfolded() {
        let program = "+++++[>+++++++<-]>---.";
        let mut folded = BfVm::load(
            program.as_bytes(),
            true,
            &VmConfig::default(),
            &b""[..],
            Vec::new(),
        )
        .unwrap();
        let stats = folded.run().unwrap();

        assert_eq!(folded.into_output(), run(program, b""));
        assert!(stats.instructions < load(program, b"").run().unwrap().instructions);
    }

    #[test]
    fn unmatched_open_never_runs() {
        let result = TestVm::load(b"[", false, &VmConfig::default(), &b""[..], Vec::new());
        let err = result.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnmatchedOpen { position: 0 })
        ));
    }

    #[test]
    fn already_finished() {
        let mut vm = load("+", b"");
        vm.run().unwrap();
        let err = vm.run().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExecError>(),
            Some(&ExecError::AlreadyFinished)
        );
    }

    #[test]
    fn step_reports_state() {
        let mut vm = load("+>+<[-]", b"");
        let step = vm.next_instruction().unwrap();
        assert_eq!(
            step,
            Step {
                position: 0,
                instruction: Instruction::Incr(1),
                pc: 1,
                dp: 0,
                cell: 1,
            }
        );

        let step = vm.next_instruction().unwrap();
        assert_eq!(step.dp, 1);
        assert_eq!(step.cell, vm.tape().read(1));
    }

    #[test]
    fn flushes_at_threshold_mid_run() {
        let config = VmConfig {
            output_threshold: 2,
            ..VmConfig::default()
        };
        let mut vm = BfVm::load(b"+...", false, &config, &b""[..], Vec::new()).unwrap();
        vm.next_instruction().unwrap();
        vm.next_instruction().unwrap();
        vm.next_instruction().unwrap();
        vm.next_instruction().unwrap();
        // Two bytes flushed, one still buffered and lost without `run`'s final flush
        assert_eq!(vm.into_output(), vec![1, 1]);
    }

    #[test]
    fn tape_limit() {
        let config = VmConfig {
            tape_limit: Some(4),
            ..VmConfig::default()
        };
        let mut vm = BfVm::load(b"+[>+]", false, &config, &b""[..], Vec::new()).unwrap();
        let err = vm.run().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExecError>(),
            Some(&ExecError::OutOfMemory {
                address: 4,
                limit: 4
            })
        );
    }
}
