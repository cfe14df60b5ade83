/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Host-side communication bridge for the hobbyist IO board.
//!
//! The board exposes a set of peripherals (digital/analog pins, OLED,
//! RGB LED, joystick, MPU6050, buzzer, relay, temperature and humidity
//! sensors) behind a small tagged-frame protocol, reachable over BLE or
//! a wired serial link. This crate provides the typed message layer,
//! the frame codec and the transports, plus [`bridge::IoBridge`] as the
//! high-level entry point.

#[macro_use]
extern crate lazy_static;

pub mod bridge;
pub(crate) mod codec;
pub mod consts;
pub mod device;
pub mod error;
pub mod message;
pub mod transport;

pub use bridge::{IoBridge, LatestBuffer};
pub use device::{DeviceKind, Direction};
pub use error::BridgeError;
pub use message::{Command, Report};
