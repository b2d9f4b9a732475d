use clap::{Parser, Subcommand, ValueEnum};
use rvnode::arbiter::WritePriority;
use rvnode::config::{DEFAULT_RX_GAP_CYCLES, NodeConfig};
use rvnode::cpu::FetchWalker;
use rvnode::error::Result;
use rvnode::mem::MemImage;
use rvnode::prog::{
    DemoProgram, encode_frame, encode_program, encode_words, load_program,
};
use rvnode::serial::DEFAULT_TX_PATTERN;
use rvnode::sim::Simulation;
use std::io::{self, Write};
use std::path::PathBuf;

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulates a node with a core fetching from the bottom of memory.
    Run {
        /// The memory image to load at start-up (a .hex/.mem listing, or a
        /// raw little-endian binary).  Defaults to the seed program.
        #[arg(long)]
        image: Option<PathBuf>,
        /// A memory image to send to the node over the serial link.
        #[arg(long, conflicts_with = "demo")]
        program: Option<PathBuf>,
        /// A built-in demo program to send over the serial link.
        #[arg(long, value_enum)]
        demo: Option<DemoArg>,
        /// The word index, in hex, that the program is loaded at.  Listing
        /// `@` positions are shifted up by this much.
        #[arg(long, value_parser = parse_hex_u8, default_value = "0")]
        start: u8,
        /// The number of cycles to run after programming completes.
        #[arg(long, default_value_t = 1000)]
        cycles: u64,
        /// Which write survives a same-cycle collision.
        #[arg(long, value_enum, default_value_t = PriorityArg::Programmer)]
        priority: PriorityArg,
        /// Idle cycles between bytes on the serial link.
        #[arg(long, default_value_t = DEFAULT_RX_GAP_CYCLES)]
        gap: u32,
        /// The number of words the core fetches before wrapping.
        #[arg(long, default_value_t = 8)]
        window: u32,
        /// Print the final memory contents as a listing.
        #[arg(long)]
        dump: bool,
    },
    /// Prints a memory image as a hex listing.
    Dump {
        /// The image to print.  Defaults to the seed program.
        image: Option<PathBuf>,
    },
    /// Prints the serial programming bytes that write words to memory.
    Encode {
        /// The word index of the first word, in hex.
        #[arg(value_parser = parse_hex_u8)]
        index: u8,
        /// The words to write, in hex.
        #[arg(value_parser = parse_hex_u32, required = true)]
        words: Vec<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Programmer,
    Data,
}

impl From<PriorityArg> for WritePriority {
    fn from(arg: PriorityArg) -> WritePriority {
        match arg {
            PriorityArg::Programmer => WritePriority::ProgrammerWins,
            PriorityArg::Data => WritePriority::DataWins,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoArg {
    SimpleStore,
    CountingLoop,
    Hello,
}

impl From<DemoArg> for DemoProgram {
    fn from(arg: DemoArg) -> DemoProgram {
        match arg {
            DemoArg::SimpleStore => DemoProgram::SimpleStore,
            DemoArg::CountingLoop => DemoProgram::CountingLoop,
            DemoArg::Hello => DemoProgram::Hello,
        }
    }
}

fn parse_hex_u8(arg: &str) -> std::result::Result<u8, String> {
    let digits = arg.trim_start_matches("0x");
    u8::from_str_radix(digits, 16).map_err(|err| err.to_string())
}

fn parse_hex_u32(arg: &str) -> std::result::Result<u32, String> {
    let digits = arg.trim_start_matches("0x").replace('_', "");
    u32::from_str_radix(&digits, 16).map_err(|err| err.to_string())
}

//===========================================================================//

fn load_image(path: Option<PathBuf>) -> Result<MemImage> {
    match path {
        Some(path) => MemImage::load_file(&path),
        None => Ok(MemImage::seed()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::builder()
        .format(|buf, record| {
            writeln!(buf, "{}: {}", record.level(), record.args())
        })
        .init();
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Run {
            image,
            program,
            demo,
            start,
            cycles,
            priority,
            gap,
            window,
            dump,
        } => {
            let config = NodeConfig {
                image: load_image(image)?,
                write_priority: priority.into(),
                tx_pattern: DEFAULT_TX_PATTERN,
                rx_gap_cycles: gap,
            };
            let bytes = match (program, demo) {
                (Some(path), _) => encode_words(&load_program(&path, start)?),
                (None, Some(demo)) => {
                    encode_program(start, DemoProgram::from(demo).words())
                }
                (None, None) => Vec::new(),
            };
            let core = FetchWalker::new(0, window.saturating_mul(4));
            let mut sim = Simulation::new(&config, Box::new(core));
            sim.reset(4);
            if !bytes.is_empty() {
                sim.program(&bytes);
                let limit = (bytes.len() as u64 + 1)
                    * (u64::from(gap) + 1)
                    + 16;
                let taken = sim.drain_link(limit)?;
                log::info!("programming finished after {taken} cycles");
            }
            sim.run(cycles);
            writeln!(stdout, "core: {}", sim.core().description())?;
            writeln!(stdout, "{}", sim.node().stats())?;
            let received = sim.link_mut().take_received();
            if !received.is_empty() {
                let echoed: Vec<String> =
                    received.iter().map(|byte| format!("{byte:02x}")).collect();
                writeln!(stdout, "host received: {}", echoed.join(" "))?;
            }
            if dump {
                write!(stdout, "{}", sim.node().snapshot().to_listing())?;
            }
        }
        Command::Dump { image } => {
            write!(stdout, "{}", load_image(image)?.to_listing())?;
        }
        Command::Encode { index, words } => {
            for (offset, &word) in words.iter().enumerate() {
                let frame = encode_frame(index.wrapping_add(offset as u8), word);
                let hex: Vec<String> =
                    frame.iter().map(|byte| format!("{byte:02x}")).collect();
                writeln!(stdout, "{}", hex.join(" "))?;
            }
        }
    }
    Ok(())
}

//===========================================================================//
