//! Facilities for connecting the node to its byte-serial transceiver.

use std::collections::VecDeque;

//===========================================================================//

/// The canned byte the transmit register reloads with, unless configured
/// otherwise.
pub const DEFAULT_TX_PATTERN: u8 = 0xa5;

//===========================================================================//

/// The transceiver's receive-side signals for one clock cycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RxByte {
    /// The most recently received byte.  Only meaningful when `valid`.
    pub data: u8,
    /// Pulsed high for one cycle when a new byte has been received.
    pub valid: bool,
}

impl RxByte {
    /// No byte received this cycle.
    pub const IDLE: RxByte = RxByte { data: 0, valid: false };

    /// A byte received this cycle.
    pub fn valid(data: u8) -> RxByte {
        RxByte { data, valid: true }
    }
}

//===========================================================================//

/// The byte the transceiver will shift out next.  There is no data path
/// from memory; the register only ever holds a fixed diagnostic pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxRegister {
    pattern: u8,
    value: u8,
}

impl TxRegister {
    /// Returns a transmit register that reloads with the given pattern.
    pub fn new(pattern: u8) -> TxRegister {
        TxRegister { pattern, value: pattern }
    }

    /// Advances the register by one clock edge.  Returns true if the
    /// register was reloaded.
    pub fn clock(&mut self, reset: bool, ready: bool) -> bool {
        if reset || ready {
            self.value = self.pattern;
            true
        } else {
            false
        }
    }

    /// Returns the byte to transmit next.
    pub fn value(&self) -> u8 {
        self.value
    }
}

impl Default for TxRegister {
    fn default() -> TxRegister {
        TxRegister::new(DEFAULT_TX_PATTERN)
    }
}

//===========================================================================//

/// A host on the far end of the serial link.  Queued bytes are delivered to
/// the node one at a time, each as a one-cycle valid pulse, with a fixed
/// number of idle cycles before each byte.  The link is full duplex: on
/// every delivered byte, the host also receives whatever the node's
/// transmit register held.
#[derive(Clone, Debug, Default)]
pub struct SerialLink {
    outgoing: VecDeque<u8>,
    incoming: Vec<u8>,
    gap_cycles: u32,
    wait: u32,
    delivered: u64,
}

impl SerialLink {
    /// Returns an empty link that waits `gap_cycles` idle cycles before
    /// delivering each byte.
    pub fn new(gap_cycles: u32) -> SerialLink {
        SerialLink { gap_cycles, wait: gap_cycles, ..SerialLink::default() }
    }

    /// Queues bytes to be sent to the node.
    pub fn send(&mut self, bytes: &[u8]) {
        self.outgoing.extend(bytes.iter().copied());
    }

    /// Returns the number of queued bytes not yet delivered.
    pub fn pending(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the total number of bytes delivered to the node.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Returns the bytes the host has received from the node so far.
    pub fn received(&self) -> &[u8] {
        &self.incoming
    }

    /// Returns and clears the bytes the host has received from the node.
    pub fn take_received(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.incoming)
    }

    /// Discards the next queued byte without delivering it, as though it
    /// were lost on the wire.
    pub fn drop_next(&mut self) -> Option<u8> {
        self.outgoing.pop_front()
    }

    /// Produces the receive-side signals for one clock cycle.  When a byte
    /// is delivered, `tx` (the node's transmit register before the edge) is
    /// captured as the byte the host receives in exchange.
    pub fn exchange(&mut self, tx: u8) -> RxByte {
        match self.outgoing.front() {
            None => RxByte::IDLE,
            Some(_) if self.wait > 0 => {
                self.wait -= 1;
                RxByte::IDLE
            }
            Some(&data) => {
                self.outgoing.pop_front();
                self.wait = self.gap_cycles;
                self.delivered += 1;
                self.incoming.push(tx);
                RxByte::valid(data)
            }
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{RxByte, SerialLink, TxRegister};

    #[test]
    fn tx_register_reloads_on_ready_or_reset() {
        let mut tx = TxRegister::new(0x5a);
        assert_eq!(tx.value(), 0x5a);
        assert!(!tx.clock(false, false));
        assert!(tx.clock(false, true));
        assert!(tx.clock(true, false));
        assert_eq!(tx.value(), 0x5a);
    }

    #[test]
    fn link_inserts_gaps() {
        let mut link = SerialLink::new(2);
        link.send(&[0x10, 0x20]);
        let events: Vec<RxByte> = (0..7).map(|_| link.exchange(0xa5)).collect();
        assert_eq!(
            events,
            vec![
                RxByte::IDLE,
                RxByte::IDLE,
                RxByte::valid(0x10),
                RxByte::IDLE,
                RxByte::IDLE,
                RxByte::valid(0x20),
                RxByte::IDLE,
            ]
        );
        assert_eq!(link.received(), &[0xa5, 0xa5]);
        assert_eq!(link.delivered(), 2);
        assert_eq!(link.pending(), 0);
        assert_eq!(link.take_received(), vec![0xa5, 0xa5]);
        assert!(link.received().is_empty());
        assert_eq!(link.delivered(), 2);
    }

    #[test]
    fn link_without_gaps() {
        let mut link = SerialLink::new(0);
        link.send(&[1, 2, 3]);
        assert_eq!(link.drop_next(), Some(1));
        assert_eq!(link.exchange(0), RxByte::valid(2));
        assert_eq!(link.exchange(0), RxByte::valid(3));
        assert_eq!(link.exchange(0), RxByte::IDLE);
    }
}

//===========================================================================//
