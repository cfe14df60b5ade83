/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Typed frame bodies.
//!
//! A frame body is `[device tag][direction tag][payload...]`. Commands
//! travel with the WRITE tag, sensor reports with the READ tag. A READ
//! frame with an empty payload is a read request: it asks the board to
//! report the named device. Multi-byte payload fields are little-endian.

use crate::device::{DeviceKind, Direction};
use crate::error::BridgeError;

/// Host-to-board frame: actuate a peripheral, or request a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Digital { pin: u8, high: bool },
    Analog { pin: u8, value: u16 },
    OledText(String),
    RgbLed { r: u8, g: u8, b: u8 },
    Buzzer { freq_hz: u16, duration_ms: u16 },
    Relay { channel: u8, closed: bool },
    /// Ask the board to report the named device.
    Poll(DeviceKind),
}

impl Command {
    pub fn device_kind(&self) -> DeviceKind {
        match self {
            Command::Digital { .. } => DeviceKind::Digital,
            Command::Analog { .. } => DeviceKind::Analog,
            Command::OledText(_) => DeviceKind::Oled,
            Command::RgbLed { .. } => DeviceKind::RgbLed,
            Command::Buzzer { .. } => DeviceKind::Buzzer,
            Command::Relay { .. } => DeviceKind::Relay,
            Command::Poll(kind) => *kind,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Command::Poll(_) => Direction::Read,
            _ => Direction::Write,
        }
    }

    /// Encode into a frame body, tags included.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = vec![self.device_kind().tag(), self.direction().tag()];
        match self {
            Command::Digital { pin, high } => {
                body.push(*pin);
                body.push(u8::from(*high));
            }
            Command::Analog { pin, value } => {
                body.push(*pin);
                body.extend_from_slice(&value.to_le_bytes());
            }
            Command::OledText(text) => body.extend_from_slice(text.as_bytes()),
            Command::RgbLed { r, g, b } => body.extend_from_slice(&[*r, *g, *b]),
            Command::Buzzer {
                freq_hz,
                duration_ms,
            } => {
                body.extend_from_slice(&freq_hz.to_le_bytes());
                body.extend_from_slice(&duration_ms.to_le_bytes());
            }
            Command::Relay { channel, closed } => {
                body.push(*channel);
                body.push(u8::from(*closed));
            }
            Command::Poll(_) => {}
        }
        body
    }

    /// Board-side decode of a host frame.
    pub fn decode(frame: &[u8]) -> Result<Self, BridgeError> {
        let (kind, direction, payload) = split_tags(frame)?;
        match direction {
            Direction::Read => {
                if payload.is_empty() {
                    Ok(Command::Poll(kind))
                } else {
                    Err(BridgeError::MalformedPayload(kind))
                }
            }
            Direction::Write => match kind {
                DeviceKind::Digital => match payload {
                    [pin, level] => Ok(Command::Digital {
                        pin: *pin,
                        high: *level != 0,
                    }),
                    _ => Err(BridgeError::MalformedPayload(kind)),
                },
                DeviceKind::Analog => match payload {
                    [pin, lo, hi] => Ok(Command::Analog {
                        pin: *pin,
                        value: u16::from_le_bytes([*lo, *hi]),
                    }),
                    _ => Err(BridgeError::MalformedPayload(kind)),
                },
                DeviceKind::Oled => String::from_utf8(payload.to_vec())
                    .map(Command::OledText)
                    .map_err(|_| BridgeError::MalformedPayload(kind)),
                DeviceKind::RgbLed => match payload {
                    [r, g, b] => Ok(Command::RgbLed {
                        r: *r,
                        g: *g,
                        b: *b,
                    }),
                    _ => Err(BridgeError::MalformedPayload(kind)),
                },
                DeviceKind::Buzzer => match payload {
                    [f0, f1, d0, d1] => Ok(Command::Buzzer {
                        freq_hz: u16::from_le_bytes([*f0, *f1]),
                        duration_ms: u16::from_le_bytes([*d0, *d1]),
                    }),
                    _ => Err(BridgeError::MalformedPayload(kind)),
                },
                DeviceKind::Relay => match payload {
                    [channel, state] => Ok(Command::Relay {
                        channel: *channel,
                        closed: *state != 0,
                    }),
                    _ => Err(BridgeError::MalformedPayload(kind)),
                },
                _ => Err(BridgeError::UnsupportedKind(kind, direction)),
            },
        }
    }
}

/// Board-to-host frame: one sensor reading or an info string.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Digital { pin: u8, high: bool },
    Analog { pin: u8, value: u16 },
    Joystick { x: u16, y: u16, pressed: bool },
    /// Raw MPU6050 register values, accelerometer then gyroscope.
    AccMpu6050 { accel: [i16; 3], gyro: [i16; 3] },
    /// Degrees Celsius.
    Temperature(f32),
    /// Relative humidity, percent.
    Humidity(f32),
    Information(String),
}

impl Report {
    pub fn device_kind(&self) -> DeviceKind {
        match self {
            Report::Digital { .. } => DeviceKind::Digital,
            Report::Analog { .. } => DeviceKind::Analog,
            Report::Joystick { .. } => DeviceKind::Joystick,
            Report::AccMpu6050 { .. } => DeviceKind::AccMpu6050,
            Report::Temperature(_) => DeviceKind::Temperature,
            Report::Humidity(_) => DeviceKind::Humidity,
            Report::Information(_) => DeviceKind::Information,
        }
    }

    /// Encode into a frame body, tags included.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = vec![self.device_kind().tag(), Direction::Read.tag()];
        match self {
            Report::Digital { pin, high } => {
                body.push(*pin);
                body.push(u8::from(*high));
            }
            Report::Analog { pin, value } => {
                body.push(*pin);
                body.extend_from_slice(&value.to_le_bytes());
            }
            Report::Joystick { x, y, pressed } => {
                body.extend_from_slice(&x.to_le_bytes());
                body.extend_from_slice(&y.to_le_bytes());
                body.push(u8::from(*pressed));
            }
            Report::AccMpu6050 { accel, gyro } => {
                for word in accel.iter().chain(gyro.iter()) {
                    body.extend_from_slice(&word.to_le_bytes());
                }
            }
            Report::Temperature(t) => body.extend_from_slice(&t.to_le_bytes()),
            Report::Humidity(h) => body.extend_from_slice(&h.to_le_bytes()),
            Report::Information(text) => body.extend_from_slice(text.as_bytes()),
        }
        body
    }

    /// Host-side decode of a board frame.
    pub fn decode(frame: &[u8]) -> Result<Self, BridgeError> {
        let (kind, direction, payload) = split_tags(frame)?;
        if direction != Direction::Read {
            return Err(BridgeError::UnexpectedDirection {
                expected: Direction::Read,
                got: direction,
            });
        }
        match kind {
            DeviceKind::Digital => match payload {
                [pin, level] => Ok(Report::Digital {
                    pin: *pin,
                    high: *level != 0,
                }),
                _ => Err(BridgeError::MalformedPayload(kind)),
            },
            DeviceKind::Analog => match payload {
                [pin, lo, hi] => Ok(Report::Analog {
                    pin: *pin,
                    value: u16::from_le_bytes([*lo, *hi]),
                }),
                _ => Err(BridgeError::MalformedPayload(kind)),
            },
            DeviceKind::Joystick => match payload {
                [x0, x1, y0, y1, btn] => Ok(Report::Joystick {
                    x: u16::from_le_bytes([*x0, *x1]),
                    y: u16::from_le_bytes([*y0, *y1]),
                    pressed: *btn != 0,
                }),
                _ => Err(BridgeError::MalformedPayload(kind)),
            },
            DeviceKind::AccMpu6050 => {
                if payload.len() != 12 {
                    return Err(BridgeError::MalformedPayload(kind));
                }
                let mut words = [0i16; 6];
                for (i, chunk) in payload.chunks_exact(2).enumerate() {
                    words[i] = i16::from_le_bytes([chunk[0], chunk[1]]);
                }
                Ok(Report::AccMpu6050 {
                    accel: [words[0], words[1], words[2]],
                    gyro: [words[3], words[4], words[5]],
                })
            }
            DeviceKind::Temperature => decode_f32(payload)
                .map(Report::Temperature)
                .ok_or(BridgeError::MalformedPayload(kind)),
            DeviceKind::Humidity => decode_f32(payload)
                .map(Report::Humidity)
                .ok_or(BridgeError::MalformedPayload(kind)),
            DeviceKind::Information => String::from_utf8(payload.to_vec())
                .map(Report::Information)
                .map_err(|_| BridgeError::MalformedPayload(kind)),
            _ => Err(BridgeError::UnsupportedKind(kind, direction)),
        }
    }
}

fn split_tags(frame: &[u8]) -> Result<(DeviceKind, Direction, &[u8]), BridgeError> {
    if frame.len() < 2 {
        return Err(BridgeError::TruncatedFrame);
    }
    let kind = DeviceKind::from_tag(frame[0])?;
    let direction = Direction::from_tag(frame[1])?;
    Ok((kind, direction, &frame[2..]))
}

fn decode_f32(payload: &[u8]) -> Option<f32> {
    let bytes: [u8; 4] = payload.try_into().ok()?;
    Some(f32::from_le_bytes(bytes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn digital_command_layout() {
        let cmd = Command::Digital { pin: 13, high: true };
        assert_eq!(cmd.encode(), vec![0x00, 0x00, 13, 1]);
        assert_eq!(Command::decode(&cmd.encode()), Ok(cmd));
    }

    #[test]
    fn analog_command_is_little_endian() {
        let cmd = Command::Analog { pin: 3, value: 0x0201 };
        assert_eq!(cmd.encode(), vec![0x01, 0x00, 3, 0x01, 0x02]);
    }

    #[test]
    fn poll_is_an_empty_read_frame() {
        let cmd = Command::Poll(DeviceKind::Temperature);
        assert_eq!(cmd.encode(), vec![0x08, 0x01]);
        assert_eq!(Command::decode(&[0x08, 0x01]), Ok(cmd));
    }

    #[test]
    fn sensor_kinds_are_not_writable() {
        assert_eq!(
            Command::decode(&[0x04, 0x00, 1, 2]),
            Err(BridgeError::UnsupportedKind(
                DeviceKind::Joystick,
                Direction::Write
            ))
        );
    }

    #[test]
    fn temperature_report_layout() {
        // 25.5 degC as f32 LE.
        let report = Report::Temperature(25.5);
        assert_eq!(report.encode(), vec![0x08, 0x01, 0x00, 0x00, 0xCC, 0x41]);
        assert_eq!(Report::decode(&report.encode()), Ok(report));
    }

    #[test]
    fn joystick_report_layout() {
        let report = Report::Joystick {
            x: 512,
            y: 300,
            pressed: true,
        };
        assert_eq!(
            report.encode(),
            vec![0x04, 0x01, 0x00, 0x02, 0x2C, 0x01, 1]
        );
        assert_eq!(Report::decode(&report.encode()), Ok(report));
    }

    #[test]
    fn mpu6050_report_roundtrip() {
        let report = Report::AccMpu6050 {
            accel: [16384, -3, 120],
            gyro: [-250, 0, 32767],
        };
        let body = report.encode();
        assert_eq!(body.len(), 2 + 12);
        assert_eq!(Report::decode(&body), Ok(report));
    }

    #[test]
    fn information_report_keeps_text() {
        let report = Report::Information("fw 1.2.0".to_string());
        assert_eq!(Report::decode(&report.encode()), Ok(report));
        // Empty info strings are legal.
        assert_eq!(
            Report::decode(&[0x0A, 0x01]),
            Ok(Report::Information(String::new()))
        );
    }

    #[test]
    fn truncated_and_unknown_frames_are_rejected() {
        assert_eq!(Report::decode(&[0x08]), Err(BridgeError::TruncatedFrame));
        assert_eq!(
            Report::decode(&[0xFF, 0x01]),
            Err(BridgeError::UnknownDeviceTag(0xFF))
        );
        assert_eq!(
            Report::decode(&[0x08, 0x02]),
            Err(BridgeError::UnknownDirectionTag(0x02))
        );
        // A three byte temperature payload is short one byte.
        assert_eq!(
            Report::decode(&[0x08, 0x01, 0x00, 0x00, 0xCC]),
            Err(BridgeError::MalformedPayload(DeviceKind::Temperature))
        );
    }

    #[test]
    fn command_frames_are_not_reports() {
        assert_eq!(
            Report::decode(&[0x00, 0x00, 13, 1]),
            Err(BridgeError::UnexpectedDirection {
                expected: Direction::Read,
                got: Direction::Write,
            })
        );
    }

    #[test]
    fn actuator_kinds_do_not_report() {
        assert_eq!(
            Report::decode(&[0x06, 0x01, 0x01]),
            Err(BridgeError::UnsupportedKind(
                DeviceKind::Buzzer,
                Direction::Read
            ))
        );
    }
}
