// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! `Session`: the period scheduler (component I) that wires the protocol
//! pipeline, oscillator bank, SPI link, TCP connection, and audio device
//! into the single-threaded event loop driven by `poll::Multiplexer`.

use std::time::Duration;

use crate::audio::device::AudioDevice;
use crate::audio::oscillator::Voice;
use crate::config::{FRAMES_PER_PERIOD, NOP_WORD, NVSHIFT, VOICES};
use crate::error::Result;
use crate::net::HostConnection;
use crate::poll::{Multiplexer, Readiness};
use crate::protocol::classifier::Classifier;
use crate::protocol::echo::{key_to_bytes, EchoState};
use crate::protocol::framer::Framer;
use crate::protocol::gsw::Gsw;
use crate::protocol::keyset::{is_abort_key, KeysetDecoder};
use crate::protocol::ring::{FlowEdge, Ring};
use crate::spi::SpiLink;

/// Poll wait timeout; the original's `do_poll(5)` used 5 ms.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(5);

pub struct Session {
    ring: Ring,
    classifier: Classifier,
    echo: EchoState,
    gsw: Gsw,
    voices: [Voice; VOICES],
    framer: Framer,
    keyset: KeysetDecoder,
    spi: SpiLink,
    host: HostConnection,
    audio: AudioDevice,
    mux: Multiplexer,
    /// Samples rendered during the previous period, written at the start
    /// of the next one (matches the original's double-buffering-by-reuse
    /// of `sess->samples`).
    samples: Vec<i16>,
    tcp_buf: [u8; 256],
}

impl Session {
    pub fn new(spi: SpiLink, host: HostConnection, audio: AudioDevice) -> Result<Self> {
        let mut mux = Multiplexer::new()?;
        mux.register_host(host.as_raw_fd())?;
        for pfd in audio.poll_descriptors()? {
            mux.register_audio(pfd.fd)?;
        }
        Ok(Self {
            ring: Ring::new(),
            classifier: Classifier::new(),
            echo: EchoState::new(),
            gsw: Gsw::new(),
            voices: std::array::from_fn(|_| Voice::new()),
            framer: Framer::new(),
            keyset: KeysetDecoder::new(),
            spi,
            host,
            audio,
            mux,
            samples: vec![0i16; FRAMES_PER_PERIOD * 2],
            tcp_buf: [0u8; 256],
        })
    }

    /// Run the event loop forever, reacting to host and audio readiness.
    pub fn run(&mut self) -> ! {
        loop {
            match self.mux.wait(POLL_TIMEOUT) {
                Ok(readiness) => self.on_ready(readiness),
                Err(e) => log::error!("poll wait failed: {e}"),
            }
        }
    }

    fn on_ready(&mut self, readiness: Readiness) {
        if readiness.host {
            self.drain_host_bytes();
        }
        if readiness.audio {
            self.period_tick();
        }
    }

    /// Read framed host words off the TCP socket and enqueue them.
    fn drain_host_bytes(&mut self) {
        let n = match self.host.read(&mut self.tcp_buf) {
            Ok(0) => return,
            Ok(n) => n,
            Err(e) => {
                log::warn!("host read error: {e}");
                return;
            }
        };
        for &byte in &self.tcp_buf[..n] {
            if let Some(word) = self.framer.feed(byte) {
                self.classifier.observe_enqueue(word);
                if let Some(edge) = self.ring.enqueue(word) {
                    self.send_flow_key(edge);
                }
            }
        }
    }

    /// One 1/60s period: write the previously rendered audio, consume one
    /// host word through the pipeline, transmit/receive over SPI, decode
    /// any keys, and render the next period of samples.
    fn period_tick(&mut self) {
        self.audio.write_period(&self.samples);

        let word = self.next_transmit_word();
        match self.spi.transfer(word) {
            Ok(rx) => self.decode_keyset(&rx),
            Err(e) => log::warn!("SPI transfer error: {e}"),
        }

        self.render_period();
    }

    /// Dequeue words via the classifier/echo/GSW pipeline until one survives
    /// erase-abort (or the ring runs dry), then handle flow-control key
    /// emission and echo flush.
    ///
    /// The flow-control edge check runs exactly once per call, against the
    /// ring depth left after the whole discard batch, matching the
    /// original's single `host_word_count` evaluation per `do_host_word`
    /// rather than re-checking on every discarded word.
    fn next_transmit_word(&mut self) -> u32 {
        let mut last_edge = None;
        let mut surviving = None;
        while let Some((word, edge)) = self.ring.dequeue() {
            last_edge = edge;
            if self.classifier.observe_dequeue(word) {
                surviving = Some(word);
                break;
            }
        }
        if let Some(edge) = last_edge {
            self.send_flow_key(edge);
        }
        let Some(word) = surviving else {
            return NOP_WORD;
        };
        let ring_depth = self.ring.count();
        let (word, reply) = self.echo.on_dequeue(word, ring_depth);
        if let Some(reply) = reply {
            self.host.send_key(key_to_bytes(reply));
        }
        let word = self.gsw.on_dequeue(word, &mut self.voices);
        log::trace!(
            "gsw diag log: {} entries, most recent {:#x}",
            self.gsw.log().len(),
            self.gsw.log().iter().last().unwrap_or(0)
        );
        word
    }

    fn decode_keyset(&mut self, rx: &[u8]) {
        for &byte in rx {
            for key in self.keyset.feed(byte) {
                self.host.send_key(key_to_bytes(key));
                if is_abort_key(key) {
                    self.ring.abort_all();
                    self.classifier.clear_abort();
                    self.echo.clear();
                }
            }
        }
    }

    fn render_period(&mut self) {
        for frame in 0..FRAMES_PER_PERIOD {
            let mut sum: i32 = 0;
            for voice in &mut self.voices {
                sum += voice.generate() as i32;
            }
            let sample = (sum >> NVSHIFT) as i16;
            self.samples[frame * 2] = sample;
            self.samples[frame * 2 + 1] = sample;
        }
    }

    fn send_flow_key(&mut self, edge: FlowEdge) {
        self.host
            .send_key(key_to_bytes(crate::protocol::echo::flow_control_key(edge)));
    }
}
