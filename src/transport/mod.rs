/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::BridgeError;
use async_trait::async_trait;

#[cfg(feature = "ble")]
pub mod ble;
#[cfg(feature = "serial")]
pub mod serial;

/// Transport interface definition
#[async_trait]
pub trait IoTransport {
    /// Bring the link up and prepare it for framed IO.
    /// Must be called before start sending / receiving frames.
    async fn init(&mut self) -> Result<(), BridgeError>;
    /// Read one frame. Returns the frame body without its length header.
    async fn read_frame(&mut self) -> Result<Vec<u8>, BridgeError>;
    /// Write(send) one frame. The length header is calculated and
    /// prepended automatically.
    async fn write_frame(&mut self, data: &[u8]) -> Result<(), BridgeError>;
}
