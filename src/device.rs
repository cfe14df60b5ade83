/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::consts;
use crate::error::BridgeError;
use std::str::FromStr;

/// Peripheral class attached to the board. The discriminant is the wire
/// tag the firmware expects in the first frame byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceKind {
    Digital = 0,
    Analog = 1,
    Oled = 2,
    RgbLed = 3,
    Joystick = 4,
    AccMpu6050 = 5,
    Buzzer = 6,
    Relay = 7,
    Temperature = 8,
    Humidity = 9,
    Information = 10,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 11] = [
        DeviceKind::Digital,
        DeviceKind::Analog,
        DeviceKind::Oled,
        DeviceKind::RgbLed,
        DeviceKind::Joystick,
        DeviceKind::AccMpu6050,
        DeviceKind::Buzzer,
        DeviceKind::Relay,
        DeviceKind::Temperature,
        DeviceKind::Humidity,
        DeviceKind::Information,
    ];

    /// Wire tag of this device class.
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, BridgeError> {
        match tag {
            consts::DIGITAL => Ok(DeviceKind::Digital),
            consts::ANALOG => Ok(DeviceKind::Analog),
            consts::OLED => Ok(DeviceKind::Oled),
            consts::RGBLED => Ok(DeviceKind::RgbLed),
            consts::JOYSTICK => Ok(DeviceKind::Joystick),
            consts::ACCMPU6050 => Ok(DeviceKind::AccMpu6050),
            consts::BUZZER => Ok(DeviceKind::Buzzer),
            consts::RELAY => Ok(DeviceKind::Relay),
            consts::TEMPERATURE => Ok(DeviceKind::Temperature),
            consts::HUMIDITY => Ok(DeviceKind::Humidity),
            consts::INFORMATION => Ok(DeviceKind::Information),
            _ => Err(BridgeError::UnknownDeviceTag(tag)),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "digital" => Ok(DeviceKind::Digital),
            "analog" => Ok(DeviceKind::Analog),
            "oled" => Ok(DeviceKind::Oled),
            "rgbled" => Ok(DeviceKind::RgbLed),
            "joystick" => Ok(DeviceKind::Joystick),
            "mpu6050" | "accel" => Ok(DeviceKind::AccMpu6050),
            "buzzer" => Ok(DeviceKind::Buzzer),
            "relay" => Ok(DeviceKind::Relay),
            "temperature" | "temp" => Ok(DeviceKind::Temperature),
            "humidity" => Ok(DeviceKind::Humidity),
            "information" | "info" => Ok(DeviceKind::Information),
            other => Err(BridgeError::UnknownDeviceName(other.to_string())),
        }
    }
}

/// Frame nature marker: commands travel as WRITE, sensor reports and
/// read requests travel as READ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

impl Direction {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, BridgeError> {
        match tag {
            consts::WRITE => Ok(Direction::Write),
            consts::READ => Ok(Direction::Read),
            _ => Err(BridgeError::UnknownDirectionTag(tag)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tags_match_firmware_header() {
        assert_eq!(DeviceKind::Digital.tag(), consts::DIGITAL);
        assert_eq!(DeviceKind::Analog.tag(), consts::ANALOG);
        assert_eq!(DeviceKind::Oled.tag(), consts::OLED);
        assert_eq!(DeviceKind::RgbLed.tag(), consts::RGBLED);
        assert_eq!(DeviceKind::Joystick.tag(), consts::JOYSTICK);
        assert_eq!(DeviceKind::AccMpu6050.tag(), consts::ACCMPU6050);
        assert_eq!(DeviceKind::Buzzer.tag(), consts::BUZZER);
        assert_eq!(DeviceKind::Relay.tag(), consts::RELAY);
        assert_eq!(DeviceKind::Temperature.tag(), consts::TEMPERATURE);
        assert_eq!(DeviceKind::Humidity.tag(), consts::HUMIDITY);
        assert_eq!(DeviceKind::Information.tag(), consts::INFORMATION);
    }

    #[test]
    fn tags_are_distinct() {
        let tags: HashSet<u8> = DeviceKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), DeviceKind::ALL.len());
    }

    #[test]
    fn tag_roundtrip() {
        for kind in DeviceKind::ALL {
            assert_eq!(DeviceKind::from_tag(kind.tag()), Ok(kind));
        }
        assert_eq!(
            DeviceKind::from_tag(11),
            Err(BridgeError::UnknownDeviceTag(11))
        );
    }

    #[test]
    fn direction_tags() {
        assert_eq!(Direction::Write.tag(), consts::WRITE);
        assert_eq!(Direction::Read.tag(), consts::READ);
        assert_ne!(Direction::Write.tag(), Direction::Read.tag());
        assert_eq!(
            Direction::from_tag(2),
            Err(BridgeError::UnknownDirectionTag(2))
        );
    }

    #[test]
    fn names_parse() {
        assert_eq!("joystick".parse::<DeviceKind>(), Ok(DeviceKind::Joystick));
        assert_eq!("TEMP".parse::<DeviceKind>(), Ok(DeviceKind::Temperature));
        assert!("thermostat".parse::<DeviceKind>().is_err());
    }
}
