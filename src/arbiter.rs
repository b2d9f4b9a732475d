//! Facilities for sharing the node's single memory between its three
//! initiators.

use crate::mem::{Lanes, MemImage, MemoryArray};
use std::fmt;

//===========================================================================//

/// One of the three agents that access the node's memory.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Initiator {
    /// The instruction-fetch port.  Only ever reads.
    Fetch,
    /// The load/store data port.
    Data,
    /// The serial programming decoder.  Only ever writes whole words.
    Programmer,
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Initiator::Fetch => "fetch",
            Initiator::Data => "data",
            Initiator::Programmer => "programmer",
        })
    }
}

//===========================================================================//

/// Which initiator's write survives when two writes land on the same word
/// (and overlapping byte lanes) in the same clock cycle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum WritePriority {
    /// Programming-decoder writes win over data-port writes.
    #[default]
    ProgrammerWins,
    /// Data-port writes win over programming-decoder writes.
    DataWins,
}

impl WritePriority {
    /// Returns the position at which writes from the given initiator are
    /// applied within a cycle.  Higher ranks are applied later, and so win.
    fn rank(self, initiator: Initiator) -> u8 {
        match (self, initiator) {
            (_, Initiator::Fetch) => 0,
            (WritePriority::ProgrammerWins, Initiator::Data) => 1,
            (WritePriority::ProgrammerWins, Initiator::Programmer) => 2,
            (WritePriority::DataWins, Initiator::Programmer) => 1,
            (WritePriority::DataWins, Initiator::Data) => 2,
        }
    }
}

//===========================================================================//

/// A tagged memory access, as presented to the arbiter during one cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemRequest {
    /// The agent making the access.
    pub initiator: Initiator,
    /// The access itself.
    pub op: MemOp,
}

/// A single memory access.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemOp {
    /// Read the whole word at the given index.
    Read(u32),
    /// Write the selected byte lanes of `data` into the word at `index`.
    Write {
        /// The word index.
        index: u32,
        /// The byte lanes to update.
        lanes: Lanes,
        /// The data to write.
        data: u32,
    },
}

//===========================================================================//

/// A record of two same-cycle writes that touched the same byte lanes of the
/// same word.  Collisions are not errors; they are resolved by the
/// arbiter's [`WritePriority`] and reported for observation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Collision {
    /// The (truncated) word index that both writes targeted.
    pub index: u32,
    /// The initiator whose data ended up in memory.
    pub winner: Initiator,
    /// The initiator whose overlapping lanes were overwritten.
    pub loser: Initiator,
}

//===========================================================================//

/// The single owner of the node's memory.  Every access from the ports and
/// the programming decoder goes through a [`MemCycle`].
#[derive(Debug)]
pub struct Arbiter {
    mem: MemoryArray,
    priority: WritePriority,
}

impl Arbiter {
    /// Returns an arbiter whose memory is loaded with the given image.
    pub fn new(image: &MemImage, priority: WritePriority) -> Arbiter {
        Arbiter { mem: MemoryArray::from_image(image), priority }
    }

    /// Returns the memory, for inspection.
    pub fn memory(&self) -> &MemoryArray {
        &self.mem
    }

    /// Begins one clock cycle of memory traffic.  Reads made through the
    /// returned [`MemCycle`] see memory as it was before the clock edge;
    /// writes take effect when the cycle is committed.
    pub fn begin_cycle(&mut self) -> MemCycle<'_> {
        MemCycle { arbiter: self, writes: Vec::new() }
    }
}

//===========================================================================//

/// The memory traffic of one clock edge.
pub struct MemCycle<'a> {
    arbiter: &'a mut Arbiter,
    writes: Vec<(Initiator, u32, Lanes, u32)>,
}

impl MemCycle<'_> {
    /// Performs a tagged access.  Returns the word read for
    /// [`MemOp::Read`], or `None` for a write.
    pub fn access(&mut self, request: MemRequest) -> Option<u32> {
        match request.op {
            MemOp::Read(index) => Some(self.arbiter.mem.read(index)),
            MemOp::Write { index, lanes, data } => {
                self.writes.push((request.initiator, index, lanes, data));
                None
            }
        }
    }

    /// Applies all writes queued during this cycle, in priority order, and
    /// returns any collisions between them.
    pub fn commit(self) -> Vec<Collision> {
        let MemCycle { arbiter, mut writes } = self;
        let priority = arbiter.priority;
        writes.sort_by_key(|&(initiator, ..)| priority.rank(initiator));
        let mut collisions = Vec::new();
        for (later, &(winner, index, lanes, _)) in writes.iter().enumerate() {
            let slot = MemoryArray::slot(index);
            for &(loser, other_index, other_lanes, _) in &writes[..later] {
                if MemoryArray::slot(other_index) == slot
                    && lanes.overlaps(other_lanes)
                {
                    log::warn!(
                        "write collision at word {slot:#04x}: \
                         {winner} overrides {loser}"
                    );
                    collisions.push(Collision {
                        index: slot as u32,
                        winner,
                        loser,
                    });
                }
            }
        }
        for (initiator, index, lanes, data) in writes {
            log::debug!(
                "{initiator} write word {:#04x} lanes {lanes} data {data:#010x}",
                MemoryArray::slot(index)
            );
            arbiter.mem.write_lanes(index, lanes, data);
        }
        collisions
    }
}

//===========================================================================//


//===========================================================================//
