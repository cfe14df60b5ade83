/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::consts::MAX_FRAME_LENGTH;
use bytes::{Buf, BufMut, BytesMut};
use integer_encoding::VarInt;
use std::io::{Error, ErrorKind, Result};
use tokio_util::codec::{Decoder, Encoder};

/// Varint-length-delimited framing. Frame bodies survive BLE
/// notification and serial stream fragmentation; partial input stays in
/// the caller's buffer until the rest arrives.
#[derive(Default)]
pub(crate) struct IoCodec;

impl Decoder for IoCodec {
    type Item = Vec<u8>;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Vec<u8>>> {
        let (len, consumed) = match u64::decode_var(&src[..]) {
            Some(header) => header,
            None => return Ok(None),
        };

        // Check data length sanity
        if len as usize > MAX_FRAME_LENGTH {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("frame of {} bytes exceeds limit", len),
            ));
        }

        if src.len() < consumed + len as usize {
            // Header seen, body still in flight.
            return Ok(None);
        }

        src.advance(consumed);
        let body = src.split_to(len as usize);
        Ok(Some(body.to_vec()))
    }
}

impl Encoder<&[u8]> for IoCodec {
    type Error = Error;

    fn encode(&mut self, data: &[u8], dst: &mut BytesMut) -> Result<()> {
        // Check data length sanity
        if data.len() > MAX_FRAME_LENGTH {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("frame of {} bytes exceeds limit", data.len()),
            ));
        }

        let mut header = [0u8; 8];
        let header_len = (data.len() as u64).encode_var(&mut header);
        dst.put_slice(&header[..header_len]);
        dst.put_slice(data);
        Ok(())
    }
}
