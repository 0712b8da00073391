// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! End-to-end test of the host-word pipeline: framer -> ring -> classifier
//! -> echo -> GSW, without any real SPI/ALSA/TCP hardware.

use plato_bridge::audio::oscillator::Voice;
use plato_bridge::config::VOICES;
use plato_bridge::protocol::classifier::Classifier;
use plato_bridge::protocol::echo::EchoState;
use plato_bridge::protocol::framer::Framer;
use plato_bridge::protocol::gsw::Gsw;
use plato_bridge::protocol::ring::Ring;
use plato_bridge::protocol::word::{command_payload, is_data_word, make_word, opcode_of, Opcode};

fn frame_bytes(payload19: u32) -> [u8; 3] {
    [
        ((payload19 >> 12) & 0x7F) as u8,
        0x80 | (((payload19 >> 6) & 0x3F) as u8),
        0xC0 | ((payload19 & 0x3F) as u8),
    ]
}

fn command_payload19(op: Opcode, low15: u32) -> u32 {
    ((op as u32) << 15) | (low15 & 0x7FFF)
}

struct Pipeline {
    framer: Framer,
    ring: Ring,
    classifier: Classifier,
    echo: EchoState,
    gsw: Gsw,
    voices: [Voice; VOICES],
}

impl Pipeline {
    fn new() -> Self {
        Self {
            framer: Framer::new(),
            ring: Ring::new(),
            classifier: Classifier::new(),
            echo: EchoState::new(),
            gsw: Gsw::new(),
            voices: std::array::from_fn(|_| Voice::new()),
        }
    }

    /// Feed one wire-framed word in, through enqueue bookkeeping.
    fn host_send(&mut self, payload19: u32) {
        for byte in frame_bytes(payload19) {
            if let Some(word) = self.framer.feed(byte) {
                self.classifier.observe_enqueue(word);
                self.ring.enqueue(word);
            }
        }
    }

    /// Dequeue and run one word through classifier/echo/GSW, returning the
    /// word actually transmitted to the terminal and any echo reply.
    fn terminal_tick(&mut self) -> Option<(u32, Option<u16>)> {
        let (word, _edge) = self.ring.dequeue()?;
        if !self.classifier.observe_dequeue(word) {
            return None; // discarded under erase-abort
        }
        let ring_depth = self.ring.count();
        let (word, reply) = self.echo.on_dequeue(word, ring_depth);
        let word = self.gsw.on_dequeue(word, &mut self.voices);
        Some((word, reply))
    }
}

#[test]
fn plain_data_word_passes_through_unchanged() {
    let mut p = Pipeline::new();
    p.host_send(0x5_4321);
    let (word, reply) = p.terminal_tick().expect("one word transmitted");
    assert!(reply.is_none());
    assert!(is_data_word(word));
}

#[test]
fn lde_is_replaced_with_nop_and_triggers_an_echo_reply() {
    let mut p = Pipeline::new();
    p.host_send(command_payload19(Opcode::Lde, 0x55));
    let (word, reply) = p.terminal_tick().expect("one word transmitted");
    assert_eq!(opcode_of(word), Opcode::Nop);
    assert_eq!(reply, Some(0x80 | 0x55));
}

#[test]
fn aud_and_ext_never_reach_the_terminal() {
    let mut p = Pipeline::new();
    // Nonzero selector bits (13..10 of the payload) so this isn't a GSW-NOP.
    let aud_payload = 0xF << 10;
    p.host_send(command_payload19(Opcode::Aud, aud_payload));
    let (word, _) = p.terminal_tick().unwrap();
    assert_eq!(opcode_of(word), Opcode::Nop);

    p.host_send(command_payload19(Opcode::Ext, 100));
    let (word, _) = p.terminal_tick().unwrap();
    assert_eq!(opcode_of(word), Opcode::Nop);
}

#[test]
fn erase_abort_discards_queued_garbage_ahead_of_the_matching_ldm() {
    let mut p = Pipeline::new();
    // Stale commands queued ahead of an erase: the erase-abort counter is
    // already 1 by the time these are dequeued, since it's incremented on
    // enqueue of the LDM below, and the ring is FIFO.
    p.host_send(command_payload19(Opcode::Nop, 0)); // abortable
    p.host_send(command_payload19(Opcode::Aud, 0)); // abortable
    p.host_send(command_payload19(Opcode::Ldm, 0b1)); // erase bit set

    assert!(p.terminal_tick().is_none(), "stale NOP discarded");
    assert!(p.terminal_tick().is_none(), "stale AUD discarded");

    let (word, _) = p.terminal_tick().expect("LDM transmitted");
    assert_eq!(opcode_of(word), Opcode::Ldm);
    assert_eq!(p.classifier.erase_abort_count(), 0);
}

#[test]
fn flow_control_edge_fires_when_ring_crosses_xoff1() {
    let mut p = Pipeline::new();
    let limit = plato_bridge::config::XOFF1_LIMIT;
    let mut saw_edge = false;
    for i in 0..limit {
        p.host_send((i as u32) & 0x7_FFFF);
        if i + 1 == limit {
            saw_edge = p.ring.count() == limit;
        }
    }
    assert!(saw_edge, "ring depth should reach XOFF1_LIMIT exactly");
}

#[test]
fn command_payload_extraction_matches_word_layout() {
    let word = make_word(command_payload19(Opcode::Ssl, 0x1234));
    assert_eq!(command_payload(word), 0x1234);
}
