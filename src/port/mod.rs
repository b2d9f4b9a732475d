//! Facilities for adapting the core's request/acknowledge buses to the
//! node's shared memory.

mod data;
mod fetch;

pub use data::{DataBus, DataPort, DataReply};
pub use fetch::{FetchBus, FetchPort, FetchReply};

//===========================================================================//

/// The acknowledge state of a bus port.
///
/// A port acknowledges on the edge after it first sees a qualified request,
/// and the acknowledge lasts exactly one cycle: the next edge always drops
/// it, whether or not the request is still held.  A request that is held
/// across that edge is therefore serviced again one edge later.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Handshake {
    /// No acknowledge is being driven.
    #[default]
    Idle,
    /// An acknowledge is being driven for the access serviced on the last
    /// edge.
    Acked,
}

impl Handshake {
    /// Computes the state after one clock edge, given whether reset is
    /// asserted and whether a qualified request is present.  Returns the new
    /// state, and true if the request is serviced on this edge.
    pub fn next(self, reset: bool, request: bool) -> (Handshake, bool) {
        match (reset, self, request) {
            (true, _, _) => (Handshake::Idle, false),
            (false, Handshake::Idle, true) => (Handshake::Acked, true),
            (false, Handshake::Idle, false) => (Handshake::Idle, false),
            (false, Handshake::Acked, _) => (Handshake::Idle, false),
        }
    }

    /// Returns true if this state drives the acknowledge signal.
    pub fn ack(self) -> bool {
        matches!(self, Handshake::Acked)
    }
}

//===========================================================================//


//===========================================================================//
