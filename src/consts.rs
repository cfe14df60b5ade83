/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use uuid::Uuid;

/// Device type tags, as understood by the board firmware.
/// Values from firmware Communication.h
pub const DIGITAL: u8 = 0;
pub const ANALOG: u8 = 1;
pub const OLED: u8 = 2;
pub const RGBLED: u8 = 3;
pub const JOYSTICK: u8 = 4;
pub const ACCMPU6050: u8 = 5;
pub const BUZZER: u8 = 6;
pub const RELAY: u8 = 7;
pub const TEMPERATURE: u8 = 8;
pub const HUMIDITY: u8 = 9;
pub const INFORMATION: u8 = 10;

/// Direction tags. WRITE marks a command frame, READ marks a sensor
/// report or a read request.
pub const WRITE: u8 = 0;
pub const READ: u8 = 1;

/// Max frame body length. Matches the RX buffer the firmware reserves
/// for a single frame.
pub const MAX_FRAME_LENGTH: usize = 512;

/// Banner the firmware prints once its serial console is up.
pub const READY_BANNER: [u8; 7] = *b"READY\r\n";

lazy_static! {
    /// UART-style IO service the board advertises (NUS layout).
    pub static ref BLE_IOSVC_UUID: Uuid =
        Uuid::parse_str("6e400001-b5a3-f393-e0a9-e50e24dcca9e").unwrap();
    /// Host-to-board characteristic (write without response).
    pub static ref BLE_TX_CHARACTERISTIC_UUID: Uuid =
        Uuid::parse_str("6e400002-b5a3-f393-e0a9-e50e24dcca9e").unwrap();
    /// Board-to-host characteristic (notify).
    pub static ref BLE_RX_CHARACTERISTIC_UUID: Uuid =
        Uuid::parse_str("6e400003-b5a3-f393-e0a9-e50e24dcca9e").unwrap();
}
