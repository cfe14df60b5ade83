/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::device::{DeviceKind, Direction};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BridgeError {
    #[error("Failed to fetch adapter list: {0}")]
    BTAdapterError(String),
    #[error("Generic BT error: {0}")]
    BTFailure(String),
    #[error("IO characteristics do not exist. Maybe not an IO board?")]
    BTNoCharacteristics,
    #[error("Failed to do I/O: {0}")]
    IOFailure(String),
    #[error("Data too large to process: {0}")]
    DataTooLarge(usize),
    #[error("Index out of bounds.")]
    OutOfBounds,
    #[error("Transport used before init().")]
    NotInitialized,
    #[error("Frame shorter than its two tag bytes.")]
    TruncatedFrame,
    #[error("Unknown device tag: {0}")]
    UnknownDeviceTag(u8),
    #[error("Unknown direction tag: {0}")]
    UnknownDirectionTag(u8),
    #[error("Unknown device name: {0}")]
    UnknownDeviceName(String),
    #[error("Malformed payload in a {0:?} frame.")]
    MalformedPayload(DeviceKind),
    #[error("{0:?} cannot appear in a {1:?} frame.")]
    UnsupportedKind(DeviceKind, Direction),
    #[error("Expected a {expected:?} frame, got {got:?}.")]
    UnexpectedDirection { expected: Direction, got: Direction },
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::IOFailure(e.to_string())
    }
}
