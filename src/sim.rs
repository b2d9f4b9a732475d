//! Facilities for running a node together with a core and a serial host.

use crate::config::NodeConfig;
use crate::cpu::SimCore;
use crate::error::{NodeError, Result};
use crate::node::{EdgeReport, Node, NodeInputs};
use crate::serial::SerialLink;

//===========================================================================//

/// A node wired to a simulated core on its buses and a simulated host on its
/// serial link.
pub struct Simulation {
    node: Node,
    core: Box<dyn SimCore>,
    link: SerialLink,
    reset: bool,
}

impl Simulation {
    /// Builds a simulation in its power-on state.
    pub fn new(config: &NodeConfig, core: Box<dyn SimCore>) -> Simulation {
        log::debug!("attaching {}", core.description());
        Simulation {
            node: Node::new(config),
            core,
            link: SerialLink::new(config.rx_gap_cycles),
            reset: false,
        }
    }

    /// Returns the node, for inspection.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the simulated core.
    pub fn core(&self) -> &dyn SimCore {
        self.core.as_ref()
    }

    /// Returns the serial host, for inspection.
    pub fn link(&self) -> &SerialLink {
        &self.link
    }

    /// Returns the serial host, for queueing or dropping bytes.
    pub fn link_mut(&mut self) -> &mut SerialLink {
        &mut self.link
    }

    /// Holds reset for the given number of cycles, then releases it.  The
    /// core is returned to its power-on state as well.
    pub fn reset(&mut self, cycles: u64) {
        self.core.reset();
        self.reset = true;
        for _ in 0..cycles {
            self.step();
        }
        self.reset = false;
    }

    /// Queues bytes for the host to send to the node over the serial link.
    pub fn program(&mut self, bytes: &[u8]) {
        log::info!("queueing {} programming bytes", bytes.len());
        self.link.send(bytes);
    }

    /// Simulates one clock edge.
    pub fn step(&mut self) -> EdgeReport {
        let (ibus, dbus) =
            self.core.drive(self.node.fetch_reply(), self.node.data_reply());
        let rx = self.link.exchange(self.node.tx_byte());
        let inputs =
            NodeInputs { reset: self.reset, ibus, dbus, rx, tx_ready: rx.valid };
        self.node.tick(&inputs)
    }

    /// Simulates the given number of clock edges.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Simulates clock edges until `done` returns true, and returns the
    /// number of edges simulated.  Fails if `done` is still false after
    /// `max_cycles` edges.
    pub fn run_until<F>(&mut self, mut done: F, max_cycles: u64) -> Result<u64>
    where
        F: FnMut(&Simulation) -> bool,
    {
        let mut cycles = 0;
        while !done(&*self) {
            if cycles >= max_cycles {
                return Err(NodeError::Timeout { cycles });
            }
            self.step();
            cycles += 1;
        }
        Ok(cycles)
    }

    /// Simulates clock edges until every queued programming byte has been
    /// delivered and the decoder is idle again.
    pub fn drain_link(&mut self, max_cycles: u64) -> Result<u64> {
        self.run_until(
            |sim| sim.link.pending() == 0 && sim.node.decoder().is_idle(),
            max_cycles,
        )
    }
}

//===========================================================================//


//===========================================================================//
