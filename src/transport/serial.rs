/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::IoTransport;
use crate::codec::IoCodec;
use crate::consts::READY_BANNER;
use crate::error::BridgeError;
use async_trait::async_trait;
use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{self, SerialPortBuilderExt, SerialStream};
use tokio_util::codec::{Decoder, Encoder};

use pretty_hex::*;

const BOARD_BAUD: u32 = 115200;

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Wired link to the board, for bench bring-up without a BLE adapter.
pub struct SerialTransport {
    port: SerialStream,
    codec: IoCodec,
    rxbuf: BytesMut,
}

impl SerialTransport {
    pub fn new(tty: &str) -> Result<Self, BridgeError> {
        let port = tokio_serial::new(tty, BOARD_BAUD)
            .open_native_async()
            .map_err(|e| BridgeError::IOFailure(e.to_string()))?;
        Ok(Self {
            port,
            codec: IoCodec::default(),
            rxbuf: BytesMut::new(),
        })
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<(), BridgeError> {
        trace!("Serial TX - {}", data.hex_dump());
        let mut pos = 0;
        while pos < data.len() {
            let n = self.port.write(&data[pos..]).await?;
            pos += n;
        }

        self.port.flush().await?;
        Ok(())
    }

    async fn drain_until_pattern(&mut self, pattern: &[u8]) -> Result<(), BridgeError> {
        let mut patternbuf: Vec<u8> = vec![];
        let mut buf = [0u8; 1024];

        loop {
            let readsz = self.port.read(&mut buf).await?;
            if readsz == 0 {
                return Err(BridgeError::IOFailure("serial port closed".to_string()));
            }

            trace!("Serial RX - {}", buf[0..readsz].hex_dump());
            patternbuf.extend_from_slice(&buf[0..readsz]);

            // Only the tail can still contain the pattern.
            if patternbuf.len() > 64 {
                patternbuf.drain(0..(patternbuf.len() - 64));
            }

            if find_subsequence(&patternbuf, pattern).is_some() {
                return Ok(());
            }
        }
    }
}

#[async_trait]
impl IoTransport for SerialTransport {
    async fn init(&mut self) -> Result<(), BridgeError> {
        self.drain_until_pattern(&READY_BANNER).await?;
        debug!("Board ready banner seen, switching to framed IO");
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, BridgeError> {
        let mut buf = [0u8; 1024];
        loop {
            if let Some(frame) = self
                .codec
                .decode(&mut self.rxbuf)
                .map_err(|e| BridgeError::IOFailure(e.to_string()))?
            {
                return Ok(frame);
            }

            let readsz = self.port.read(&mut buf).await?;
            if readsz == 0 {
                return Err(BridgeError::IOFailure("serial port closed".to_string()));
            }
            self.rxbuf.extend_from_slice(&buf[0..readsz]);
        }
    }

    async fn write_frame(&mut self, data: &[u8]) -> Result<(), BridgeError> {
        let mut frame = BytesMut::new();
        self.codec
            .encode(data, &mut frame)
            .map_err(|_| BridgeError::DataTooLarge(data.len()))?;
        self.write_raw(&frame).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn banner_is_found_in_noise() {
        let stream = b"boot: pins ok\r\nREADY\r\njunk";
        assert_eq!(find_subsequence(stream, &READY_BANNER), Some(15));
        assert_eq!(find_subsequence(b"no banner here", &READY_BANNER), None);
    }
}
