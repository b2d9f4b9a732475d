use super::Handshake;
use crate::arbiter::{Initiator, MemCycle, MemOp, MemRequest};
use crate::mem::{NOP_WORD, word_index};

//===========================================================================//

/// The signals the core drives onto the instruction bus.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FetchBus {
    /// The byte address to fetch from.  The low two bits are ignored.
    pub addr: u32,
    /// True while the core is requesting a fetch.
    pub cyc: bool,
}

impl FetchBus {
    /// Returns the bus with no request present.
    pub fn idle() -> FetchBus {
        FetchBus::default()
    }

    /// Returns the bus requesting a fetch from the given byte address.
    pub fn fetch(addr: u32) -> FetchBus {
        FetchBus { addr, cyc: true }
    }
}

/// The signals the instruction port drives back to the core.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FetchReply {
    /// The most recently fetched word.
    pub data: u32,
    /// True for the one cycle after a fetch was serviced.
    pub ack: bool,
}

//===========================================================================//

/// The instruction-fetch port: a read-only adapter between the core's
/// instruction bus and the shared memory.
#[derive(Clone, Debug)]
pub struct FetchPort {
    state: Handshake,
    latch: u32,
}

impl FetchPort {
    /// Returns a port in its reset state.
    pub fn new() -> FetchPort {
        FetchPort { state: Handshake::Idle, latch: NOP_WORD }
    }

    /// Advances the port by one clock edge.
    pub fn clock(
        &mut self,
        reset: bool,
        bus: &FetchBus,
        cycle: &mut MemCycle<'_>,
    ) {
        let (state, fire) = self.state.next(reset, bus.cyc);
        self.state = state;
        if reset {
            self.latch = NOP_WORD;
        } else if fire {
            let request = MemRequest {
                initiator: Initiator::Fetch,
                op: MemOp::Read(word_index(bus.addr)),
            };
            if let Some(word) = cycle.access(request) {
                self.latch = word;
            }
            log::debug!(
                "fetch ack addr {:#06x} word {:#010x}",
                bus.addr,
                self.latch
            );
        }
    }

    /// Returns the signals currently driven back to the core.
    pub fn reply(&self) -> FetchReply {
        FetchReply { data: self.latch, ack: self.state.ack() }
    }

    /// Returns the port's handshake state.
    pub fn state(&self) -> Handshake {
        self.state
    }
}

impl Default for FetchPort {
    fn default() -> FetchPort {
        FetchPort::new()
    }
}

//===========================================================================//


//===========================================================================//
