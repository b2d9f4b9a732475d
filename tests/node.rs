use rvnode::arbiter::WritePriority;
use rvnode::config::NodeConfig;
use rvnode::cpu::{BusOp, Completion, FetchWalker, ScriptedCore, SimCore};
use rvnode::mem::{Lanes, MemImage, NOP_WORD};
use rvnode::node::{Node, NodeInputs};
use rvnode::port::{DataBus, FetchBus};
use rvnode::prog::{
    DemoProgram, encode_frame, encode_program, encode_words, load_program,
};
use rvnode::serial::RxByte;
use rvnode::sim::Simulation;
use std::path::PathBuf;

//===========================================================================//

const SEED_WORDS: [u32; 8] = [
    0x1000_0093,
    0x0000_0113,
    0x0100_0193,
    0x0020_8023,
    0x0010_8093,
    0x0011_0113,
    0xfe31_4ae3,
    0x0000_006f,
];

fn seeded_node() -> Node {
    Node::new(&NodeConfig::default())
}

fn feed(node: &mut Node, bytes: &[u8]) {
    for &byte in bytes {
        node.tick(&NodeInputs { rx: RxByte::valid(byte), ..NodeInputs::default() });
        node.tick(&NodeInputs::default());
    }
}

/// Runs a scripted core against a bare node until the script finishes.
fn run_script(node: &mut Node, script: Vec<BusOp>) -> Vec<Completion> {
    let mut core = ScriptedCore::new(script);
    for _ in 0..1000 {
        if core.is_done() {
            break;
        }
        let (ibus, dbus) = core.drive(node.fetch_reply(), node.data_reply());
        node.tick(&NodeInputs { ibus, dbus, ..NodeInputs::default() });
    }
    assert!(core.is_done(), "script did not finish");
    core.completions().to_vec()
}

//===========================================================================//

#[test]
fn seed_image_after_power_on() {
    let node = seeded_node();
    for (index, &word) in SEED_WORDS.iter().enumerate() {
        assert_eq!(node.peek(index as u32), word, "word {index}");
    }
    for index in 8..256 {
        assert_eq!(node.peek(index), NOP_WORD, "word {index}");
    }
}

#[test]
fn seed_listing_matches_builtin_seed() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("images/seed.hex");
    assert_eq!(MemImage::load_file(&path).unwrap(), MemImage::seed());
}

#[test]
fn fetch_acks_one_cycle_later() {
    let mut node = seeded_node();
    assert!(!node.fetch_reply().ack);
    node.tick(&NodeInputs { ibus: FetchBus::fetch(0x8), ..NodeInputs::default() });
    let reply = node.fetch_reply();
    assert!(reply.ack);
    assert_eq!(reply.data, 0x0100_0193);
    node.tick(&NodeInputs::default());
    assert!(!node.fetch_reply().ack);
    assert_eq!(node.fetch_reply().data, 0x0100_0193);
}

#[test]
fn fetch_samples_memory_before_same_edge_write() {
    let mut node = seeded_node();
    node.tick(&NodeInputs {
        ibus: FetchBus::fetch(0x0),
        dbus: DataBus::store(0x0, Lanes::ALL, 0x1234_5678),
        ..NodeInputs::default()
    });
    assert_eq!(node.fetch_reply().data, SEED_WORDS[0]);
    assert_eq!(node.peek(0), 0x1234_5678);
}

#[test]
fn five_byte_frame_writes_deadbeef() {
    let mut node = seeded_node();
    feed(&mut node, &[0x10, 0xef, 0xbe, 0xad, 0xde]);
    assert_eq!(node.peek(0x10), 0xdead_beef);
    assert_eq!(node.stats().commits, 1);
    assert!(node.decoder().is_idle());
}

#[test]
fn four_byte_frame_is_incomplete() {
    let mut node = seeded_node();
    feed(&mut node, &[0x10, 0xef, 0xbe, 0xad]);
    assert_eq!(node.peek(0x10), NOP_WORD);
    assert!(node.decoder().is_armed());
}

#[test]
fn reset_is_idempotent_and_keeps_memory() {
    let mut node = seeded_node();
    run_script(&mut node, vec![BusOp::Store {
        addr: 0x80,
        sel: Lanes::ALL,
        data: 0x0bad_f00d,
    }]);
    feed(&mut node, &[0x30, 0x01]);
    node.tick(&NodeInputs {
        ibus: FetchBus::fetch(0x4),
        dbus: DataBus::load(0x80),
        ..NodeInputs::default()
    });
    assert!(node.fetch_reply().ack);
    assert!(node.data_reply().ack);
    let before = node.snapshot();
    for _ in 0..3 {
        node.tick(&NodeInputs {
            reset: true,
            ibus: FetchBus::fetch(0x4),
            dbus: DataBus::load(0x80),
            rx: RxByte::valid(0x55),
            tx_ready: false,
        });
        assert!(!node.fetch_reply().ack);
        assert_eq!(node.fetch_reply().data, NOP_WORD);
        assert!(!node.data_reply().ack);
        assert_eq!(node.data_reply().data, 0);
        assert!(node.decoder().is_idle());
        assert_eq!(node.tx_byte(), 0xa5);
        assert_eq!(node.snapshot(), before);
    }
    assert_eq!(node.peek(0x20), 0x0bad_f00d);
}

#[test]
fn data_request_without_cycle_stalls_forever() {
    let mut node = seeded_node();
    let dbus = DataBus { cyc: false, ..DataBus::store(0x0, Lanes::ALL, 0) };
    for _ in 0..10_000 {
        node.tick(&NodeInputs { dbus, ..NodeInputs::default() });
        assert!(!node.data_reply().ack);
    }
    assert_eq!(node.peek(0), SEED_WORDS[0]);
    assert_eq!(node.stats().store_acks, 0);
}

#[test]
fn scripted_loads_and_stores() {
    let mut node = Node::new(&NodeConfig {
        image: MemImage::nop(),
        ..NodeConfig::default()
    });
    let completions = run_script(&mut node, vec![
        BusOp::Store { addr: 0x100, sel: Lanes::ALL, data: 0x4433_2211 },
        BusOp::Store { addr: 0x100, sel: Lanes::from_bits(0b0100), data: 0x00aa_0000 },
        BusOp::Load(0x100),
        BusOp::Fetch(0x100),
    ]);
    assert_eq!(completions, vec![
        Completion::Stored(0x100),
        Completion::Stored(0x100),
        Completion::Loaded(0x100, 0x44aa_2211),
        Completion::Fetched(0x100, 0x44aa_2211),
    ]);
    assert_eq!(node.stats().store_acks, 2);
    assert_eq!(node.stats().load_acks, 1);
    assert_eq!(node.stats().fetch_acks, 1);
}

#[test]
fn addresses_wrap_to_word_index() {
    let mut node = Node::new(&NodeConfig {
        image: MemImage::nop(),
        ..NodeConfig::default()
    });
    let completions = run_script(&mut node, vec![
        BusOp::Store { addr: 0x404, sel: Lanes::ALL, data: 0x7777_7777 },
        BusOp::Load(0x4),
    ]);
    assert_eq!(completions[1], Completion::Loaded(0x4, 0x7777_7777));
}

#[test]
fn collision_priority_is_configurable() {
    for (priority, expected) in [
        (WritePriority::ProgrammerWins, 0x1111_1111),
        (WritePriority::DataWins, 0x2222_2222),
    ] {
        let mut node = Node::new(&NodeConfig {
            image: MemImage::nop(),
            write_priority: priority,
            ..NodeConfig::default()
        });
        let frame = encode_frame(0x05, 0x1111_1111);
        feed(&mut node, &frame[..4]);
        let report = node.tick(&NodeInputs {
            dbus: DataBus::store(0x14, Lanes::ALL, 0x2222_2222),
            rx: RxByte::valid(frame[4]),
            ..NodeInputs::default()
        });
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(node.peek(0x05), expected);
    }
}

//===========================================================================//

#[test]
fn program_over_link_then_fetch() {
    let config = NodeConfig { rx_gap_cycles: 2, ..NodeConfig::default() };
    let core = FetchWalker::new(0x40, 0x44);
    let mut sim = Simulation::new(&config, Box::new(core));
    sim.reset(2);
    sim.program(&encode_frame(0x10, 0xdead_beef));
    sim.drain_link(100).unwrap();
    sim.run(4);
    assert_eq!(sim.node().peek(0x10), 0xdead_beef);
    assert_eq!(sim.node().fetch_reply().data, 0xdead_beef);
    assert!(sim.node().stats().fetch_acks > 0);
}

#[test]
fn host_reads_back_test_pattern() {
    let config = NodeConfig { rx_gap_cycles: 0, ..NodeConfig::default() };
    let mut sim = Simulation::new(&config, Box::new(FetchWalker::new(0, 0x20)));
    let bytes = encode_program(0, DemoProgram::Hello.words());
    sim.program(&bytes);
    sim.drain_link(1000).unwrap();
    assert_eq!(sim.link().received().len(), bytes.len());
    assert!(sim.link().received().iter().all(|&byte| byte == 0xa5));
    for (index, &word) in DemoProgram::Hello.words().iter().enumerate() {
        assert_eq!(sim.node().peek(index as u32), word);
    }
}

#[test]
fn listing_program_only_writes_given_words() {
    let config = NodeConfig { rx_gap_cycles: 0, ..NodeConfig::default() };
    let mut sim = Simulation::new(&config, Box::new(FetchWalker::new(0, 0x20)));
    let words = MemImage::listing_words("@40\ndeadbeef\n").unwrap();
    let bytes = encode_words(&words);
    assert_eq!(bytes.len(), 5);
    sim.program(&bytes);
    sim.drain_link(100).unwrap();
    assert_eq!(sim.node().stats().commits, 1);
    assert_eq!(sim.link().received(), &[0xa5; 5]);
    assert_eq!(sim.node().peek(0x40), 0xdead_beef);
    for (index, &word) in SEED_WORDS.iter().enumerate() {
        assert_eq!(sim.node().peek(index as u32), word, "word {index}");
    }
    assert_eq!(sim.node().peek(0x41), NOP_WORD);
}

#[test]
fn program_file_loads_at_start_index() {
    let config = NodeConfig {
        image: MemImage::nop(),
        rx_gap_cycles: 1,
        ..NodeConfig::default()
    };
    let mut sim = Simulation::new(&config, Box::new(FetchWalker::new(0, 4)));
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("images/seed.hex");
    sim.program(&encode_words(&load_program(&path, 0x80).unwrap()));
    sim.drain_link(200).unwrap();
    assert_eq!(sim.node().stats().commits, 8);
    for (index, &word) in SEED_WORDS.iter().enumerate() {
        assert_eq!(sim.node().peek(0x80 + index as u32), word);
        assert_eq!(sim.node().peek(index as u32), NOP_WORD);
    }
}

#[test]
fn dropped_byte_shifts_framing() {
    let config = NodeConfig {
        image: MemImage::nop(),
        rx_gap_cycles: 1,
        ..NodeConfig::default()
    };
    let mut sim = Simulation::new(&config, Box::new(FetchWalker::new(0, 4)));
    sim.program(&encode_program(0x10, &[0xdead_beef, 0x0102_0304]));
    sim.link_mut().drop_next();
    sim.run(40);
    // Without the index byte, 0xef is taken as the index.
    assert_eq!(sim.node().peek(0x10), NOP_WORD);
    assert_eq!(sim.node().peek(0xef), 0x11de_adbe);
    assert!(!sim.node().decoder().is_idle());
}

//===========================================================================//
