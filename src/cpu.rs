//! Facilities for attaching a processing core to the node's buses.
//!
//! The real core is an external black box; the node only sees its bus
//! requests.  The stub cores here drive the buses the same way, for tests
//! and for the command-line front end.

use crate::mem::Lanes;
use crate::port::{DataBus, DataReply, FetchBus, FetchReply};
use std::collections::VecDeque;

//===========================================================================//

/// A simulated processing core, seen only through its two buses.
pub trait SimCore {
    /// Returns a human-readable description of this simulated core.
    fn description(&self) -> String;

    /// Returns the core to its power-on state.
    fn reset(&mut self);

    /// Given the replies the node is currently driving, returns the signals
    /// the core drives onto the instruction and data buses for the next
    /// clock edge.
    fn drive(&mut self, ibus: FetchReply, dbus: DataReply) -> (FetchBus, DataBus);
}

//===========================================================================//

/// A core that never makes a request.
#[derive(Clone, Debug, Default)]
pub struct IdleCore;

impl SimCore for IdleCore {
    fn description(&self) -> String {
        "idle core".to_string()
    }

    fn reset(&mut self) {}

    fn drive(&mut self, _: FetchReply, _: DataReply) -> (FetchBus, DataBus) {
        (FetchBus::idle(), DataBus::idle())
    }
}

//===========================================================================//

/// A core that fetches consecutive words, wrapping back to the start of a
/// window of memory, and keeps the last word it fetched.
#[derive(Clone, Debug)]
pub struct FetchWalker {
    start: u32,
    end: u32,
    pc: u32,
    fetching: bool,
    fetched: u64,
    last: Option<u32>,
}

impl FetchWalker {
    /// Returns a walker that fetches from byte addresses `start..end`.
    pub fn new(start: u32, end: u32) -> FetchWalker {
        FetchWalker {
            start,
            end,
            pc: start,
            fetching: false,
            fetched: 0,
            last: None,
        }
    }

    /// Returns the byte address of the next (or current) fetch.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Returns the number of fetches completed.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    /// Returns the most recently fetched word.
    pub fn last_word(&self) -> Option<u32> {
        self.last
    }
}

impl SimCore for FetchWalker {
    fn description(&self) -> String {
        format!("fetch walker ({:#x}..{:#x})", self.start, self.end)
    }

    fn reset(&mut self) {
        *self = FetchWalker::new(self.start, self.end);
    }

    fn drive(&mut self, ibus: FetchReply, _: DataReply) -> (FetchBus, DataBus) {
        if self.fetching && ibus.ack {
            self.fetching = false;
            self.fetched += 1;
            self.last = Some(ibus.data);
            self.pc = self.pc.wrapping_add(4);
            if self.pc >= self.end {
                self.pc = self.start;
            }
            return (FetchBus::idle(), DataBus::idle());
        }
        self.fetching = true;
        (FetchBus::fetch(self.pc), DataBus::idle())
    }
}

//===========================================================================//

/// One bus transaction for a [`ScriptedCore`] to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BusOp {
    /// Fetch the word at the given byte address.
    Fetch(u32),
    /// Load the word at the given byte address.
    Load(u32),
    /// Store the selected lanes of `data` to the given byte address.
    Store {
        /// The byte address.
        addr: u32,
        /// The byte lanes to write.
        sel: Lanes,
        /// The data to write.
        data: u32,
    },
}

impl BusOp {
    fn signals(self) -> (FetchBus, DataBus) {
        match self {
            BusOp::Fetch(addr) => (FetchBus::fetch(addr), DataBus::idle()),
            BusOp::Load(addr) => (FetchBus::idle(), DataBus::load(addr)),
            BusOp::Store { addr, sel, data } => {
                (FetchBus::idle(), DataBus::store(addr, sel, data))
            }
        }
    }
}

/// The result of a completed [`BusOp`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Completion {
    /// A fetch returned the given word.
    Fetched(u32, u32),
    /// A load returned the given word.
    Loaded(u32, u32),
    /// A store was acknowledged.
    Stored(u32),
}

//===========================================================================//

/// A core that performs a fixed script of bus transactions, one at a time.
/// Each request is held until acknowledged, then dropped for one cycle
/// before the next request is made.  A request that is never acknowledged
/// is held forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCore {
    script: Vec<BusOp>,
    queue: VecDeque<BusOp>,
    current: Option<BusOp>,
    waited: u64,
    completions: Vec<Completion>,
}

impl ScriptedCore {
    /// Returns a core that will perform the given transactions in order.
    pub fn new(script: Vec<BusOp>) -> ScriptedCore {
        let queue = script.iter().copied().collect();
        ScriptedCore { script, queue, ..ScriptedCore::default() }
    }

    /// Returns the results of the transactions completed so far.
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Returns true once every transaction in the script has completed.
    pub fn is_done(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Returns the number of cycles the current request has been held
    /// without an acknowledge.
    pub fn waited(&self) -> u64 {
        self.waited
    }
}

impl SimCore for ScriptedCore {
    fn description(&self) -> String {
        format!("scripted core ({} transactions)", self.script.len())
    }

    fn reset(&mut self) {
        *self = ScriptedCore::new(std::mem::take(&mut self.script));
    }

    fn drive(&mut self, ibus: FetchReply, dbus: DataReply) -> (FetchBus, DataBus) {
        if let Some(op) = self.current {
            let completion = match op {
                BusOp::Fetch(addr) if ibus.ack => {
                    Some(Completion::Fetched(addr, ibus.data))
                }
                BusOp::Load(addr) if dbus.ack => {
                    Some(Completion::Loaded(addr, dbus.data))
                }
                BusOp::Store { addr, .. } if dbus.ack => {
                    Some(Completion::Stored(addr))
                }
                _ => None,
            };
            if let Some(completion) = completion {
                log::trace!("core completed {completion:?}");
                self.completions.push(completion);
                self.current = None;
                self.waited = 0;
                return (FetchBus::idle(), DataBus::idle());
            }
            self.waited += 1;
            return op.signals();
        }
        match self.queue.pop_front() {
            Some(op) => {
                self.current = Some(op);
                op.signals()
            }
            None => (FetchBus::idle(), DataBus::idle()),
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{BusOp, Completion, FetchWalker, IdleCore, ScriptedCore, SimCore};
    use crate::port::{DataBus, DataReply, FetchBus, FetchReply};

    const NO_ACK_I: FetchReply = FetchReply { data: 0, ack: false };
    const NO_ACK_D: DataReply = DataReply { data: 0, ack: false };

    #[test]
    fn idle_core_never_requests() {
        let mut core = IdleCore;
        for _ in 0..10 {
            assert_eq!(
                core.drive(NO_ACK_I, NO_ACK_D),
                (FetchBus::idle(), DataBus::idle())
            );
        }
    }

    #[test]
    fn scripted_core_holds_until_ack() {
        let mut core = ScriptedCore::new(vec![BusOp::Load(0x40), BusOp::Fetch(0x8)]);
        assert_eq!(core.drive(NO_ACK_I, NO_ACK_D).1, DataBus::load(0x40));
        assert_eq!(core.drive(NO_ACK_I, NO_ACK_D).1, DataBus::load(0x40));
        assert_eq!(core.waited(), 1);
        let ack = DataReply { data: 0x77, ack: true };
        assert_eq!(core.drive(NO_ACK_I, ack), (FetchBus::idle(), DataBus::idle()));
        assert_eq!(core.drive(NO_ACK_I, NO_ACK_D).0, FetchBus::fetch(0x8));
        let ack = FetchReply { data: 0x13, ack: true };
        core.drive(ack, NO_ACK_D);
        assert!(core.is_done());
        assert_eq!(
            core.completions(),
            &[Completion::Loaded(0x40, 0x77), Completion::Fetched(0x8, 0x13)]
        );
        core.reset();
        assert!(!core.is_done());
        assert!(core.completions().is_empty());
    }

    #[test]
    fn fetch_walker_wraps() {
        let mut core = FetchWalker::new(0x0, 0x8);
        let ack = FetchReply { data: 0x13, ack: true };
        assert_eq!(core.drive(NO_ACK_I, NO_ACK_D).0, FetchBus::fetch(0x0));
        assert_eq!(core.drive(ack, NO_ACK_D).0, FetchBus::idle());
        assert_eq!(core.drive(NO_ACK_I, NO_ACK_D).0, FetchBus::fetch(0x4));
        core.drive(ack, NO_ACK_D);
        assert_eq!(core.pc(), 0x0);
        assert_eq!(core.fetched(), 2);
        assert_eq!(core.last_word(), Some(0x13));
    }
}

//===========================================================================//
