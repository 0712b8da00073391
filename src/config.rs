// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! Protocol, audio, and flow-control constants.
//!
//! Mirrors the original adapter's magic numbers in one place rather than
//! scattering them across the modules that use them.

/// GSW crystal clock frequency, in Hz.
pub const GSW_CRYSTAL: u32 = 3_872_000;

/// Sound sample rate, in Hz.
pub const SND_RATE: u32 = 24_000;
/// Number of ALSA hardware periods.
pub const SND_PERIODS: u32 = 2;
/// Stereo output.
pub const SND_CHANNELS: u32 = 2;
/// Frames rendered per 1/60s terminal tick.
pub const FRAMES_PER_PERIOD: usize = (SND_RATE / 60) as usize;
/// Total ring-buffer-style device buffer, in frames.
pub const SND_BUFFER_SIZE: alsa::pcm::Frames = (FRAMES_PER_PERIOD as i64) * (SND_PERIODS as i64);

/// log2(VOICES); used to average the four-voice sum down to one sample.
pub const NVSHIFT: u32 = 2;
/// Number of GSW voices.
pub const VOICES: usize = 1 << NVSHIFT;

/// Crystal ticks consumed per rendered sample (ceil(GSW_CRYSTAL / SND_RATE)).
pub const PHASEINCR: u32 = (GSW_CRYSTAL + SND_RATE - 1) / SND_RATE;

/// Host-word ring buffer capacity.
pub const HOST_IN_WORDS: usize = 5000;

/// Ring-depth flow-control thresholds, derived from capacity.
pub const XOFF1_LIMIT: usize = (2 * HOST_IN_WORDS) / 3;
pub const XOFF2_LIMIT: usize = (3 * HOST_IN_WORDS) / 4;
pub const XON1_LIMIT: usize = HOST_IN_WORDS / 3;
pub const XON2_LIMIT: usize = HOST_IN_WORDS / 4;

/// Size of the bounded GSW diagnostic log.
pub const GSW_LOG_LEN: usize = 32;

/// Default two-sample square wave, matching the terminal's onboard tone.
pub static SQUARE_WAVE: [i16; 2] = [0x7FFF, 0];
/// Sample count of the default waveform (`SQUARE_WAVE`), used by `setdiv`'s
/// `step = ceil(div / nsamp)` indirection.
pub const SQUARE_WAVE_NSAMP: u32 = 2;

/// Amplitude table: (multiplier, right-shift) pairs equivalent to scaling by
/// (3/4)^n, loudest first.
pub static AMPLITUDE_TABLE: [(u16, u8); 8] = [
    (2187, 14),
    (729, 12),
    (243, 10),
    (81, 8),
    (27, 6),
    (9, 4),
    (3, 2),
    (1, 0),
];

/// Keyset and flow-control key codes, in the terminal's 10-bit key space.
pub mod keys {
    pub const NEXT: u16 = 0x16;
    pub const DATA: u16 = 0x19;
    pub const STOP: u16 = 0x1A;
    pub const STOP1: u16 = 0x3A;
    pub const TURNON: u16 = 0x3C0;
    pub const XON: u16 = 0x346; // 01606 octal
    pub const XOFF: u16 = 0x347; // 01607 octal

    /// Key code for a lowercase ASCII letter.
    pub const fn lowercase(c: char) -> u16 {
        0x41 + (c as u16 - 'a' as u16)
    }
}

/// Replacement word sent to the terminal in place of an intercepted or
/// abort-discarded command: start bit + NOP opcode + odd parity bit.
pub const NOP_WORD: u32 = 0x400003;

/// Default CLI values, per SPEC_FULL.md §4.K.
pub mod defaults {
    pub const PORT: u16 = 5004;
    pub const SPI_SPEED_HZ: u32 = 4000;
    pub const SPI_DEVICE: &str = "/dev/spidev0.0";
    pub const HOST: &str = "cyberserv.org";
}
