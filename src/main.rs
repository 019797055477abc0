use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{
    fs,
    io::{self, BufReader, Write},
    path::PathBuf,
    process,
    time::Instant,
};
use tapevm::{
    bytecode::{Bytecode, Parser as BytecodeParser},
    config::{VmConfig, DEFAULT_DEBUG_RADIUS, DEFAULT_OUTPUT_THRESHOLD},
    debugger::Debugger,
    error::LoadError,
    format::format_program,
    shell::Shell,
    terminal::RawMode,
    vm::{BfVm, Exit},
};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(name = "tapevm", version, about = "Tape language virtual machine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program
    Run(ProgramArgs),
    /// Run a program, suspending after every instruction
    Debug(ProgramArgs),
    /// Run a program and report timing and counters on stderr
    Benchmark(ProgramArgs),
    /// Print the program re-indented
    Format(ProgramArgs),
    /// Read lines of code and run each one on a fresh tape
    Shell(VmArgs),
}

#[derive(Args)]
struct ProgramArgs {
    /// Program file
    file: PathBuf,

    #[command(flatten)]
    vm: VmArgs,
}

#[derive(Args)]
struct VmArgs {
    /// Fold runs of `+` and `-` before executing
    #[arg(short = 'O', long)]
    optimize: bool,

    /// Flush program output once this many bytes are buffered
    #[arg(long, default_value_t = DEFAULT_OUTPUT_THRESHOLD)]
    flush_threshold: usize,

    /// Maximum number of tape cells, counting cell 0 (unbounded when omitted)
    #[arg(long, value_parser = parse_tape_limit)]
    tape_limit: Option<usize>,

    /// Cells shown on each side of the data pointer by the debugger's print
    #[arg(long, default_value_t = DEFAULT_DEBUG_RADIUS)]
    radius: usize,
}

impl VmArgs {
    fn config(&self) -> VmConfig {
        VmConfig {
            output_threshold: self.flush_threshold,
            tape_limit: self.tape_limit,
            debug_radius: self.radius,
        }
    }
}

impl ProgramArgs {
    fn config(&self) -> VmConfig {
        self.vm.config()
    }

    fn load(&self) -> Result<Bytecode> {
        let source = fs::read(&self.file).map_err(|source| LoadError::Unreadable {
            path: self.file.clone(),
            source,
        })?;
        BytecodeParser::new(&source)
            .fold(self.vm.optimize)
            .parse()
            .with_context(|| format!("could not load {}", self.file.display()))
    }
}

/// Cell 0 always exists, so a limit has to leave room for it.
fn parse_tape_limit(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("the tape always holds cell 0, the limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(err) => Err(err.to_string()),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(&args, false),
        Commands::Benchmark(args) => run(&args, true),
        Commands::Debug(args) => debug(&args),
        Commands::Format(args) => {
            let bytecode = args.load()?;
            println!("{}", format_program(&bytecode.instructions));
            Ok(())
        }
        Commands::Shell(args) => Shell::new(args.config(), args.optimize).repl(),
    }
}

fn run(args: &ProgramArgs, benchmark: bool) -> Result<()> {
    let bytecode = args.load()?;
    let _raw = RawMode::enable_if(bytecode.reads_input());

    let config = args.config();
    let mut vm = BfVm::new(bytecode, &config, io::stdin().lock(), io::stdout().lock());
    let start = Instant::now();
    let stats = vm.run()?;
    let elapsed = start.elapsed();

    if benchmark {
        eprintln!("Execution time: {:.6} seconds", elapsed.as_secs_f64());
        eprintln!("Instructions executed: {}", stats.instructions);
        eprintln!("Tape cells: {}", stats.tape_cells);
        eprintln!("Output bytes: {}", stats.output_bytes);
    }

    Ok(())
}

fn debug(args: &ProgramArgs) -> Result<()> {
    let bytecode = args.load()?;
    let config = args.config();

    // Operator commands and program input share stdin, so line mode stays on. A one
    // byte reader keeps the debugger from buffering past the end of a command line.
    let commands = BufReader::with_capacity(1, io::stdin());
    let mut debugger = Debugger::new(commands, io::stderr(), config.debug_radius);
    let mut vm = BfVm::new(bytecode, &config, io::stdin(), io::stdout());

    match vm.run_debug(&mut debugger)? {
        Exit::Completed(_) => Ok(()),
        Exit::Quit => {
            io::stderr().flush()?;
            process::exit(0);
        }
    }
}
