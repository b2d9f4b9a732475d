//! Facilities for configuring a simulated node.

use crate::arbiter::WritePriority;
use crate::mem::MemImage;
use crate::serial::DEFAULT_TX_PATTERN;

//===========================================================================//

/// The number of idle cycles the serial link waits before each byte, unless
/// configured otherwise.
pub const DEFAULT_RX_GAP_CYCLES: u32 = 8;

//===========================================================================//

/// Settings for building a simulated node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeConfig {
    /// The memory contents loaded at start-up.
    pub image: MemImage,
    /// How same-cycle write collisions are resolved.
    pub write_priority: WritePriority,
    /// The byte the transmit register reloads with.
    pub tx_pattern: u8,
    /// Idle cycles the serial link inserts before each received byte.
    pub rx_gap_cycles: u32,
}

impl Default for NodeConfig {
    fn default() -> NodeConfig {
        NodeConfig {
            image: MemImage::seed(),
            write_priority: WritePriority::default(),
            tx_pattern: DEFAULT_TX_PATTERN,
            rx_gap_cycles: DEFAULT_RX_GAP_CYCLES,
        }
    }
}

//===========================================================================//
