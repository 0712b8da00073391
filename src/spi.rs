// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! SPI link to the terminal (component H collaborator).
//!
//! One full-duplex 6-byte transfer per period: the TX half carries a
//! transmitted host word, the RX half carries whatever the terminal's
//! keyset logic has shifted out since the last transfer.

use std::io;

use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};

/// Bits per SPI word; the terminal link is byte-oriented.
const BITS_PER_WORD: u8 = 8;

/// Six bytes: three for the word (MSB-aligned, shifted left 11), three pad.
const FRAME_LEN: usize = 6;

pub struct SpiLink {
    dev: Spidev,
    rx: [u8; FRAME_LEN],
}

impl SpiLink {
    /// Open and configure the SPI device at `path`, matching the terminal's
    /// expected mode (`SPI_NO_CS | SPI_MODE_1`) and the given clock speed.
    pub fn open(path: &str, speed_hz: u32) -> io::Result<Self> {
        log::debug!("opening SPI device {path} at {speed_hz} Hz");
        let mut dev = Spidev::open(path)?;
        let options = SpidevOptions::new()
            .bits_per_word(BITS_PER_WORD)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_NO_CS | SpiModeFlags::SPI_MODE_1)
            .build();
        dev.configure(&options)?;
        log::debug!("SPI device {path} configured");
        Ok(Self {
            dev,
            rx: [0; FRAME_LEN],
        })
    }

    /// Transmit `word` (a full 20-bit in-memory word, start bit included)
    /// and return the bytes the terminal shifted back during the same
    /// transfer, for the keyset decoder to consume.
    pub fn transfer(&mut self, word: u32) -> io::Result<[u8; FRAME_LEN]> {
        let shifted = word << 11;
        let mut tx = [0u8; FRAME_LEN];
        tx[0] = (shifted >> 24) as u8;
        tx[1] = (shifted >> 16) as u8;
        tx[2] = (shifted >> 8) as u8;

        let mut xfer = SpidevTransfer::read_write(&tx, &mut self.rx);
        if let Err(e) = self.dev.transfer(&mut xfer) {
            log::warn!("SPI transfer failed: {e}");
            return Err(e);
        }
        Ok(self.rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_is_left_shifted_and_byte_packed() {
        // Verify the bit layout independently of any real device: the same
        // arithmetic `transfer` uses to build `tx`.
        let word = 0x3_5A5Au32;
        let shifted = word << 11;
        let expected = [
            (shifted >> 24) as u8,
            (shifted >> 16) as u8,
            (shifted >> 8) as u8,
            0,
            0,
            0,
        ];
        let mut tx = [0u8; FRAME_LEN];
        tx[0] = (shifted >> 24) as u8;
        tx[1] = (shifted >> 16) as u8;
        tx[2] = (shifted >> 8) as u8;
        assert_eq!(tx, expected);
    }
}
