//! Command-line front end.
//!
//! ```text
//! c64 [OPTIONS] [PRG]                 boot to BASIC, optionally load and RUN a program
//! c64 test FILE                       run a 6502 functional test image
//! c64 dir IMAGE.d64                   list a disk directory
//! c64 extract IMAGE.d64 T S OUT       extract the file starting at track T, sector S
//! ```

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use c64_core::debugger::{memory_dump, snapshot};
use c64_core::{
    Command, D64Image, Debugger, Machine, MachineConfig, NullIo, Region, StopReason, TestVerdict,
};
use clap::{Parser, Subcommand};

/// Cycles a debugger command may run before control returns to the prompt.
const DEBUG_CYCLE_BUDGET: u64 = 50_000_000;

#[derive(Parser, Debug)]
#[command(name = "c64", about = "Commodore 64 emulator")]
struct Args {
    /// Directory holding the ROM images.
    #[arg(long, value_name = "DIR", default_value = "rom")]
    rom_dir: PathBuf,

    /// Start the single-key debugger (s: step over, r: run, o: step out, enter: step, q: quit).
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Breakpoint address, hex ($C000, 0xC000) or decimal (can repeat).
    #[arg(long = "break", value_name = "ADDR", value_parser = parse_address)]
    breakpoints: Vec<u16>,

    /// Decode the supported undocumented opcodes.
    #[arg(long, default_value_t = false)]
    illegal_opcodes: bool,

    /// Beam positions the VIC-II advances per instruction.
    #[arg(long, value_name = "N", default_value_t = 64)]
    pixel_steps: u32,

    /// Keep the full KERNAL RAM test at boot.
    #[arg(long, default_value_t = false)]
    no_boot_patch: bool,

    /// Use NTSC timing instead of PAL.
    #[arg(long, default_value_t = false)]
    ntsc: bool,

    /// Program (.prg) to load and RUN once BASIC is ready.
    #[arg(value_name = "PRG")]
    program: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Run a 6502 functional test binary loaded over all of RAM.
    Test {
        file: PathBuf,
        /// Give up after this many instructions.
        #[arg(long, default_value_t = 200_000_000)]
        max_cycles: u64,
    },
    /// List the directory of a D64 image.
    Dir { image: PathBuf },
    /// Extract a file from a D64 image by its first track and sector.
    Extract {
        image: PathBuf,
        track: u8,
        sector: u8,
        out: PathBuf,
    },
}

fn parse_address(text: &str) -> Result<u16, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", text, e))
}

fn config_from(args: &Args) -> MachineConfig {
    let region = if args.ntsc { Region::NTSC } else { Region::PAL };
    MachineConfig {
        rom_dir: args.rom_dir.clone(),
        patch_kernal_boot: !args.no_boot_patch,
        illegal_opcodes: args.illegal_opcodes,
        vic_pixel_steps: args.pixel_steps,
        cia_frequency_hz: region.mains_hz(),
        region,
        ..MachineConfig::default()
    }
}

fn run_functional_test(
    config: MachineConfig,
    file: &Path,
    max_cycles: u64,
) -> Result<(), Box<dyn Error>> {
    let mut machine = Machine::without_roms(config, NullIo);
    machine.load_functional_test(file)?;

    match machine.run_functional_test(max_cycles) {
        Some(TestVerdict::Passed { pc }) => {
            println!("Functional test passed (trapped at ${:04X})", pc);
            Ok(())
        }
        Some(TestVerdict::Failed { pc, test }) => {
            println!("{}", snapshot(&machine));
            Err(format!("functional test {} failed at ${:04X}", test, pc).into())
        }
        None => Err(format!("no result after {} instructions", max_cycles).into()),
    }
}

fn list_directory(image: &Path) -> Result<(), Box<dyn Error>> {
    let disk = D64Image::from_bytes(&std::fs::read(image)?)?;
    println!("{}", disk.directory()?);
    Ok(())
}

fn extract(image: &Path, track: u8, sector: u8, out: &Path) -> Result<(), Box<dyn Error>> {
    let disk = D64Image::from_bytes(&std::fs::read(image)?)?;
    let contents = disk.read_file(track, sector)?;
    std::fs::write(out, &contents)?;
    println!("Wrote {} bytes to {}", contents.len(), out.display());
    Ok(())
}

/// Reads one command key. Returns `None` on end of input or `q`.
fn read_command(input: &mut impl BufRead) -> io::Result<Option<Command>> {
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().chars().next() {
            None => return Ok(Some(Command::Step)),
            Some('q') | Some('Q') => return Ok(None),
            Some(key) => {
                if let Some(command) = Command::from_key(key) {
                    return Ok(Some(command));
                }
                println!("keys: s step over, r run, o step out, enter step, q quit");
            }
        }
    }
}

fn debug_loop(machine: &mut Machine<NullIo>, debugger: &Debugger) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut command = if debugger.breakpoints().next().is_some() {
        Command::Run
    } else {
        Command::Step
    };

    loop {
        let reason = debugger.execute(machine, command, DEBUG_CYCLE_BUDGET);
        match reason {
            StopReason::Breakpoint(pc) => println!("Breakpoint at ${:04X}", pc),
            StopReason::Deadlock(pc) => println!("Deadlock at ${:04X}", pc),
            StopReason::Limit => println!("Stopped after {} cycles", DEBUG_CYCLE_BUDGET),
            StopReason::Stepped | StopReason::Returned => {}
        }

        println!("{}", snapshot(machine));
        print!("{}", memory_dump(machine.memory(), 0x0000, 1));
        print!("{}", memory_dump(machine.memory(), 0x0800, 1));

        command = match read_command(&mut input)? {
            Some(command) => command,
            None => return Ok(()),
        };
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = config_from(&args);

    match &args.command {
        Some(Action::Test { file, max_cycles }) => {
            return run_functional_test(config, file, *max_cycles)
        }
        Some(Action::Dir { image }) => return list_directory(image),
        Some(Action::Extract {
            image,
            track,
            sector,
            out,
        }) => return extract(image, *track, *sector, out),
        None => {}
    }

    let mut machine = Machine::new(config, NullIo)?;
    machine.boot(true)?;

    if let Some(program) = &args.program {
        let address = machine.load_program(program, true)?;
        log::info!("Loaded {} at ${:04X}", program.display(), address);
    }

    if args.debug {
        let debugger = Debugger::with_breakpoints(args.breakpoints.iter().copied());
        return debug_loop(&mut machine, &debugger);
    }

    loop {
        machine.cycle();
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}
