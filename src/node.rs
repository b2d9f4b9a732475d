//! Facilities for simulating a complete node, one clock edge at a time.

use crate::arbiter::{Arbiter, Collision};
use crate::config::NodeConfig;
use crate::mem::MemImage;
use crate::port::{DataBus, DataPort, DataReply, FetchBus, FetchPort, FetchReply};
use crate::prog::{Commit, ProgramDecoder};
use crate::serial::{RxByte, TxRegister};
use std::fmt;

//===========================================================================//

/// Everything driven into the node for one clock edge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NodeInputs {
    /// The level-sensitive reset signal.
    pub reset: bool,
    /// The core's instruction bus.
    pub ibus: FetchBus,
    /// The core's data bus.
    pub dbus: DataBus,
    /// The transceiver's receive side.
    pub rx: RxByte,
    /// True when the transceiver is ready for the next byte to transmit.
    pub tx_ready: bool,
}

/// What happened on one clock edge.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EdgeReport {
    /// The word committed by the programming decoder, if any.
    pub commit: Option<Commit>,
    /// Same-cycle write collisions, already resolved by priority.
    pub collisions: Vec<Collision>,
}

//===========================================================================//

/// Running counters for a node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NodeStats {
    /// Clock edges simulated, including edges under reset.
    pub cycles: u64,
    /// Clock edges with reset asserted.
    pub reset_cycles: u64,
    /// Instruction fetches acknowledged.
    pub fetch_acks: u64,
    /// Data-port reads acknowledged.
    pub load_acks: u64,
    /// Data-port writes acknowledged.
    pub store_acks: u64,
    /// Words written by the programming decoder.
    pub commits: u64,
    /// Same-cycle write collisions.
    pub collisions: u64,
    /// Times the transmit register was reloaded.
    pub tx_reloads: u64,
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cycles:       {}", self.cycles)?;
        writeln!(f, "reset cycles: {}", self.reset_cycles)?;
        writeln!(f, "fetch acks:   {}", self.fetch_acks)?;
        writeln!(f, "load acks:    {}", self.load_acks)?;
        writeln!(f, "store acks:   {}", self.store_acks)?;
        writeln!(f, "commits:      {}", self.commits)?;
        writeln!(f, "collisions:   {}", self.collisions)?;
        write!(f, "tx reloads:   {}", self.tx_reloads)
    }
}

//===========================================================================//

/// A simulated node: the shared memory, both bus ports, the programming
/// decoder and the transmit register, all in one clock domain.
#[derive(Debug)]
pub struct Node {
    arbiter: Arbiter,
    fetch: FetchPort,
    data: DataPort,
    decoder: ProgramDecoder,
    tx: TxRegister,
    stats: NodeStats,
}

impl Node {
    /// Builds a node in its power-on state, with memory loaded from the
    /// configured image.
    pub fn new(config: &NodeConfig) -> Node {
        Node {
            arbiter: Arbiter::new(&config.image, config.write_priority),
            fetch: FetchPort::new(),
            data: DataPort::new(),
            decoder: ProgramDecoder::new(),
            tx: TxRegister::new(config.tx_pattern),
            stats: NodeStats::default(),
        }
    }

    /// Advances every component by one clock edge.
    ///
    /// All reads on this edge see memory as it was before the edge.  Writes
    /// from the data port and the programming decoder are then applied in
    /// the configured priority order.  Reset clears the ports, the decoder
    /// and the transmit register, but never memory.
    pub fn tick(&mut self, inputs: &NodeInputs) -> EdgeReport {
        let reset = inputs.reset;
        let mut cycle = self.arbiter.begin_cycle();
        self.fetch.clock(reset, &inputs.ibus, &mut cycle);
        self.data.clock(reset, &inputs.dbus, &mut cycle);
        let commit = self.decoder.clock(reset, inputs.rx, &mut cycle);
        let collisions = cycle.commit();
        let reloaded = self.tx.clock(reset, inputs.tx_ready);

        let stats = &mut self.stats;
        stats.cycles += 1;
        if reset {
            stats.reset_cycles += 1;
            log::info!("reset asserted (cycle {})", stats.cycles);
        }
        if self.fetch.reply().ack {
            stats.fetch_acks += 1;
        }
        if self.data.reply().ack {
            if inputs.dbus.we {
                stats.store_acks += 1;
            } else {
                stats.load_acks += 1;
            }
        }
        stats.commits += commit.is_some() as u64;
        stats.collisions += collisions.len() as u64;
        stats.tx_reloads += reloaded as u64;
        log::trace!(
            "cycle {}: fetch {:?}, data {:?}, decoder phase {}",
            stats.cycles,
            self.fetch.state(),
            self.data.state(),
            self.decoder.phase()
        );
        EdgeReport { commit, collisions }
    }

    /// Returns what the instruction port currently drives to the core.
    pub fn fetch_reply(&self) -> FetchReply {
        self.fetch.reply()
    }

    /// Returns what the data port currently drives to the core.
    pub fn data_reply(&self) -> DataReply {
        self.data.reply()
    }

    /// Returns the byte the transceiver will transmit next.
    pub fn tx_byte(&self) -> u8 {
        self.tx.value()
    }

    /// Returns the word at the given index, without simulating an access.
    pub fn peek(&self, index: u32) -> u32 {
        self.arbiter.memory().read(index)
    }

    /// Returns a copy of the current memory contents.
    pub fn snapshot(&self) -> MemImage {
        self.arbiter.memory().snapshot()
    }

    /// Returns the programming decoder, for inspection.
    pub fn decoder(&self) -> &ProgramDecoder {
        &self.decoder
    }

    /// Returns the node's running counters.
    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }
}

//===========================================================================//


//===========================================================================//
