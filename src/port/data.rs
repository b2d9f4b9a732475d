use super::Handshake;
use crate::arbiter::{Initiator, MemCycle, MemOp, MemRequest};
use crate::mem::{Lanes, word_index};

//===========================================================================//

/// The signals the core drives onto the data bus.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DataBus {
    /// The byte address of the access.  The low two bits are ignored; byte
    /// lanes are selected with `sel`.
    pub addr: u32,
    /// The data to store, for writes.
    pub data: u32,
    /// The byte lanes to update, for writes.
    pub sel: Lanes,
    /// True for a write, false for a read.
    pub we: bool,
    /// True when the other fields of the request are valid.
    pub stb: bool,
    /// True while a bus transaction is in progress.
    pub cyc: bool,
}

impl DataBus {
    /// Returns the bus with no transaction in progress.
    pub fn idle() -> DataBus {
        DataBus::default()
    }

    /// Returns the bus requesting a word read from the given byte address.
    pub fn load(addr: u32) -> DataBus {
        DataBus { addr, stb: true, cyc: true, ..DataBus::default() }
    }

    /// Returns the bus requesting a write of the selected lanes of `data` to
    /// the given byte address.
    pub fn store(addr: u32, sel: Lanes, data: u32) -> DataBus {
        DataBus { addr, data, sel, we: true, stb: true, cyc: true }
    }

    /// Returns true if this is a qualified request: strobed, within an
    /// active bus cycle.
    pub fn is_request(&self) -> bool {
        self.stb && self.cyc
    }
}

/// The signals the data port drives back to the core.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DataReply {
    /// The word returned by the most recent read.
    pub data: u32,
    /// True for the one cycle after an access was serviced.
    pub ack: bool,
}

//===========================================================================//

/// The load/store port: a byte-lane read/modify/write adapter between the
/// core's data bus and the shared memory.
#[derive(Clone, Debug, Default)]
pub struct DataPort {
    state: Handshake,
    latch: u32,
}

impl DataPort {
    /// Returns a port in its reset state.
    pub fn new() -> DataPort {
        DataPort::default()
    }

    /// Advances the port by one clock edge.  A request without both strobe
    /// and cycle-active is never serviced, however long it is held.
    pub fn clock(
        &mut self,
        reset: bool,
        bus: &DataBus,
        cycle: &mut MemCycle<'_>,
    ) {
        let (state, fire) = self.state.next(reset, bus.is_request());
        self.state = state;
        if reset {
            self.latch = 0;
        } else if fire {
            let index = word_index(bus.addr);
            let op = if bus.we {
                MemOp::Write { index, lanes: bus.sel, data: bus.data }
            } else {
                MemOp::Read(index)
            };
            let request = MemRequest { initiator: Initiator::Data, op };
            if let Some(word) = cycle.access(request) {
                self.latch = word;
                log::debug!(
                    "data read ack addr {:#06x} word {word:#010x}",
                    bus.addr
                );
            } else {
                log::debug!(
                    "data write ack addr {:#06x} lanes {} data {:#010x}",
                    bus.addr,
                    bus.sel,
                    bus.data
                );
            }
        }
    }

    /// Returns the signals currently driven back to the core.
    pub fn reply(&self) -> DataReply {
        DataReply { data: self.latch, ack: self.state.ack() }
    }

    /// Returns the port's handshake state.
    pub fn state(&self) -> Handshake {
        self.state
    }
}

//===========================================================================//


//===========================================================================//
