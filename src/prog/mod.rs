//! Facilities for reprogramming the node's memory over the serial link.
//!
//! # Framing
//!
//! Each programming operation is five received bytes:
//!
//! ```text
//! [index] [bits 7:0] [bits 15:8] [bits 23:16] [bits 31:24]
//! ```
//!
//! The decoder only has a two-bit phase counter, so it cannot name five
//! distinct phases.  Instead, phase 3 is visited twice: the first byte
//! received in phase 3 is stored as bits 23:16 and arms the decoder, and the
//! second byte received in phase 3 becomes bits 31:24 and commits the whole
//! word.  Host tooling already sends five-byte frames, so this shape is kept
//! exactly.
//!
//! There is no resynchronization marker.  A lost byte shifts every later
//! byte into the wrong phase until the next reset.

mod frame;
mod load;

pub use frame::{DemoProgram, encode_frame, encode_program, nop_fill};
pub use load::{encode_words, load_program, place_words};

use crate::arbiter::{Initiator, MemCycle, MemOp, MemRequest};
use crate::mem::Lanes;
use crate::serial::RxByte;

//===========================================================================//

/// A word written into memory by the programming decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Commit {
    /// The word index that was written.
    pub index: u8,
    /// The word that was written.
    pub word: u32,
}

//===========================================================================//

/// The serial programming decoder: assembles received bytes into
/// index/word frames and writes each completed word into memory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgramDecoder {
    phase: u8,
    armed: bool,
    index: u8,
    word: u32,
}

impl ProgramDecoder {
    /// Returns a decoder in its reset state.
    pub fn new() -> ProgramDecoder {
        ProgramDecoder::default()
    }

    /// Returns the two-bit phase counter.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Returns true if bits 23:16 have been received and the next byte will
    /// complete the frame.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns true if no part of a frame has been received since the last
    /// commit or reset.
    pub fn is_idle(&self) -> bool {
        self.phase == 0 && !self.armed
    }

    /// Advances the decoder by one clock edge.  Only a valid received byte
    /// moves the state machine; otherwise all state holds.  Returns the
    /// word committed on this edge, if any.
    pub fn clock(
        &mut self,
        reset: bool,
        rx: RxByte,
        cycle: &mut MemCycle<'_>,
    ) -> Option<Commit> {
        if reset {
            *self = ProgramDecoder::new();
            return None;
        }
        if !rx.valid {
            return None;
        }
        let byte = rx.data;
        match self.phase {
            0 => {
                self.index = byte;
                self.phase = 1;
            }
            1 => {
                self.word = (self.word & !0x0000_00ff) | u32::from(byte);
                self.phase = 2;
            }
            2 => {
                self.word = (self.word & !0x0000_ff00) | (u32::from(byte) << 8);
                self.phase = 3;
            }
            _ if !self.armed => {
                self.word =
                    (self.word & !0x00ff_0000) | (u32::from(byte) << 16);
                self.armed = true;
            }
            _ => {
                let commit = Commit {
                    index: self.index,
                    word: (u32::from(byte) << 24) | (self.word & 0x00ff_ffff),
                };
                cycle.access(MemRequest {
                    initiator: Initiator::Programmer,
                    op: MemOp::Write {
                        index: u32::from(commit.index),
                        lanes: Lanes::ALL,
                        data: commit.word,
                    },
                });
                log::debug!(
                    "programmed word {:#04x} = {:#010x}",
                    commit.index,
                    commit.word
                );
                *self = ProgramDecoder::new();
                return Some(commit);
            }
        }
        log::trace!(
            "programming byte {byte:#04x}, phase now {} (armed: {})",
            self.phase,
            self.armed
        );
        None
    }
}

//===========================================================================//


//===========================================================================//
