//! Facilities for representing the node's shared word memory.

mod image;

pub use image::MemImage;
pub(crate) use image::is_listing_path;

use std::fmt;

//===========================================================================//

/// The number of 32-bit words in the node's memory.
pub const MEM_WORDS: usize = 256;

/// The RISC-V `addi x0, x0, 0` encoding, used to fill unprogrammed memory.
pub const NOP_WORD: u32 = 0x0000_0013;

/// Converts a byte address, as driven onto one of the core's buses, into a
/// word index.  The low two bits select byte lanes, not array entries.
pub fn word_index(byte_addr: u32) -> u32 {
    byte_addr >> 2
}

//===========================================================================//

/// A set of byte lanes within a 32-bit word.  Bit `n` selects bits
/// `[8n+7:8n]` of the word.  Only the low four bits are meaningful.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Lanes(u8);

impl Lanes {
    /// No lanes selected.
    pub const NONE: Lanes = Lanes(0);

    /// All four lanes selected (a full-word write).
    pub const ALL: Lanes = Lanes(0xf);

    /// Constructs a lane set from a 4-bit select mask.  Bits above the low
    /// four are ignored, as though those wires weren't connected.
    pub fn from_bits(bits: u8) -> Lanes {
        Lanes(bits & 0xf)
    }

    /// Returns true if the given lane (0-3) is selected.
    pub fn contains(self, lane: u32) -> bool {
        lane < 4 && (self.0 >> lane) & 1 != 0
    }

    /// Returns true if any lane is selected in both sets.
    pub fn overlaps(self, other: Lanes) -> bool {
        self.0 & other.0 != 0
    }

    /// Expands the lane set into a 32-bit mask with `0xff` in each selected
    /// lane.
    pub fn word_mask(self) -> u32 {
        (0..4)
            .filter(|&lane| self.contains(lane))
            .fold(0, |mask, lane| mask | (0xff << (8 * lane)))
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}

//===========================================================================//

/// The node's memory: 256 words of 32 bits each.
///
/// Indices wider than eight bits are truncated, mirroring the array across
/// the whole index range the way a narrower set of address lines would.  No
/// access ever faults.
#[derive(Clone, Eq, PartialEq)]
pub struct MemoryArray {
    words: Box<[u32; MEM_WORDS]>,
}

impl MemoryArray {
    /// Returns a memory array with every word set to [`NOP_WORD`].
    pub fn new() -> MemoryArray {
        MemoryArray { words: Box::new([NOP_WORD; MEM_WORDS]) }
    }

    /// Returns a memory array holding the contents of the given image.
    pub fn from_image(image: &MemImage) -> MemoryArray {
        let mut mem = MemoryArray::new();
        for (index, &word) in image.words().iter().enumerate() {
            mem.words[index] = word;
        }
        mem
    }

    pub(crate) fn slot(index: u32) -> usize {
        (index as usize) & (MEM_WORDS - 1)
    }

    /// Reads the word at the given index.
    pub fn read(&self, index: u32) -> u32 {
        self.words[MemoryArray::slot(index)]
    }

    /// Overwrites the whole word at the given index.
    pub fn write(&mut self, index: u32, word: u32) {
        self.words[MemoryArray::slot(index)] = word;
    }

    /// Writes only the selected byte lanes of `data` into the word at the
    /// given index, leaving the other lanes untouched.
    pub fn write_lanes(&mut self, index: u32, lanes: Lanes, data: u32) {
        let mask = lanes.word_mask();
        let slot = &mut self.words[MemoryArray::slot(index)];
        *slot = (*slot & !mask) | (data & mask);
    }

    /// Returns a copy of the memory contents as an image.
    pub fn snapshot(&self) -> MemImage {
        MemImage::from_array(&self.words)
    }
}

impl Default for MemoryArray {
    fn default() -> MemoryArray {
        MemoryArray::new()
    }
}

impl fmt::Debug for MemoryArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let programmed =
            self.words.iter().filter(|&&word| word != NOP_WORD).count();
        write!(f, "MemoryArray({programmed} non-NOP words)")
    }
}

//===========================================================================//


//===========================================================================//
