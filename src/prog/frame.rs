use super::load::{encode_words, place_words};
use crate::mem::NOP_WORD;

//===========================================================================//

/// Encodes one programming frame: the word index, then the word's four
/// bytes, least significant first.
pub fn encode_frame(index: u8, word: u32) -> [u8; 5] {
    let [b0, b1, b2, b3] = word.to_le_bytes();
    [index, b0, b1, b2, b3]
}

/// Encodes frames that write `words` to consecutive word indices starting at
/// `start`.  Indices wrap around after `0xff`.
pub fn encode_program(start: u8, words: &[u32]) -> Vec<u8> {
    encode_words(&place_words(start, words))
}

/// Encodes frames that overwrite `count` words starting at `start` with
/// NOPs, parking the core on a harmless instruction stream.
pub fn nop_fill(start: u8, count: usize) -> Vec<u8> {
    encode_program(start, &vec![NOP_WORD; count])
}

//===========================================================================//

/// Small programs that host tooling loads into a node for bring-up.  Their
/// contents are opaque payloads as far as the node is concerned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DemoProgram {
    /// Stores one byte and spins.
    SimpleStore,
    /// Stores an incrementing counter to consecutive bytes, then spins.
    CountingLoop,
    /// Stores a "HELLO" word pattern, then spins.
    Hello,
}

impl DemoProgram {
    /// All demo programs.
    pub const ALL: [DemoProgram; 3] =
        [DemoProgram::SimpleStore, DemoProgram::CountingLoop, DemoProgram::Hello];

    /// Returns the short name used to select this program.
    pub fn name(self) -> &'static str {
        match self {
            DemoProgram::SimpleStore => "simple-store",
            DemoProgram::CountingLoop => "counting-loop",
            DemoProgram::Hello => "hello",
        }
    }

    /// Looks up a demo program by its short name.
    pub fn from_name(name: &str) -> Option<DemoProgram> {
        DemoProgram::ALL.into_iter().find(|demo| demo.name() == name)
    }

    /// Returns the program's words, to be loaded starting at index zero.
    pub fn words(self) -> &'static [u32] {
        match self {
            DemoProgram::SimpleStore => {
                &[0x0aa0_0513, 0x2000_0597, 0x00a5_8023, 0x0000_006f]
            }
            DemoProgram::CountingLoop => &[
                0x0000_0513,
                0x1000_0593,
                0x2000_0617,
                0x00a6_0023,
                0x0015_0513,
                0x0016_0613,
                0xfeb5_4ce3,
                0x0000_006f,
            ],
            DemoProgram::Hello => &[
                0x4845_4537,
                0xc4c5_0513,
                0x4f00_0597,
                0x2000_0617,
                0x00a6_2023,
                0x00b6_2223,
                0x0000_006f,
            ],
        }
    }
}

//===========================================================================//


//===========================================================================//
