/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! High-level board session: typed sends plus a retained copy of the
//! most recent received frame.

use crate::error::BridgeError;
use crate::message::{Command, Report};
use crate::transport::IoTransport;
use async_lock::Mutex;
use async_stream::stream;
use futures::stream::Stream;
use std::sync::Arc;

/// Lock-guarded slot holding a copy of the most recent frame received
/// from the board. Clones share the slot, so another task can watch it
/// while the bridge keeps polling. Readers always get an owned copy.
#[derive(Clone, Default)]
pub struct LatestBuffer {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl LatestBuffer {
    /// Copy of the most recent frame body. None until the first frame
    /// arrives.
    pub async fn get(&self) -> Option<Vec<u8>> {
        self.slot.lock().await.clone()
    }

    async fn put(&self, frame: Vec<u8>) {
        *self.slot.lock().await = Some(frame);
    }
}

pub struct IoBridge<T: IoTransport> {
    transport: T,
    latest: LatestBuffer,
}

impl<T: IoTransport> IoBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            latest: LatestBuffer::default(),
        }
    }

    /// Bring the underlying link up. Must be called once before any IO.
    pub async fn init(&mut self) -> Result<(), BridgeError> {
        self.transport.init().await
    }

    /// Send a raw text buffer as one frame, verbatim.
    pub async fn send_data(&mut self, data: &str) -> Result<(), BridgeError> {
        self.transport.write_frame(data.as_bytes()).await
    }

    /// Send a temperature reading in degrees Celsius.
    pub async fn send_temperature(&mut self, t: f32) -> Result<(), BridgeError> {
        self.transport
            .write_frame(&Report::Temperature(t).encode())
            .await
    }

    /// Send a relative humidity reading in percent.
    pub async fn send_humidity(&mut self, h: f32) -> Result<(), BridgeError> {
        self.transport
            .write_frame(&Report::Humidity(h).encode())
            .await
    }

    /// Send a typed actuation command or read request.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), BridgeError> {
        self.transport.write_frame(&command.encode()).await
    }

    /// Handle to the latest-frame slot, usable from other tasks.
    pub fn latest_handle(&self) -> LatestBuffer {
        self.latest.clone()
    }

    /// Copy of the most recent received frame body.
    pub async fn latest_data(&self) -> Option<Vec<u8>> {
        self.latest.get().await
    }

    /// Receive one frame: retain a copy as the latest buffer, then
    /// decode it. A frame that fails to decode is still retained.
    pub async fn poll(&mut self) -> Result<Report, BridgeError> {
        let frame = self.transport.read_frame().await?;
        self.latest.put(frame.clone()).await;
        Report::decode(&frame)
    }

    /// Stream of decoded reports. Decode failures are yielded and the
    /// stream continues; a transport failure is yielded and ends it.
    pub fn reports(&mut self) -> impl Stream<Item = Result<Report, BridgeError>> + '_ {
        stream! {
            loop {
                let frame = match self.transport.read_frame().await {
                    Ok(frame) => frame,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                self.latest.put(frame.clone()).await;
                yield Report::decode(&frame);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::DeviceKind;
    use async_trait::async_trait;
    use futures::{pin_mut, StreamExt};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct LoopbackTransport {
        sent: Vec<Vec<u8>>,
        inbound: VecDeque<Vec<u8>>,
    }

    #[async_trait]
    impl IoTransport for LoopbackTransport {
        async fn init(&mut self) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn read_frame(&mut self) -> Result<Vec<u8>, BridgeError> {
            self.inbound
                .pop_front()
                .ok_or_else(|| BridgeError::IOFailure("link drained".to_string()))
        }

        async fn write_frame(&mut self, data: &[u8]) -> Result<(), BridgeError> {
            self.sent.push(data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn typed_sends_use_the_tagged_layout() {
        let mut bridge = IoBridge::new(LoopbackTransport::default());
        bridge.send_temperature(25.5).await.unwrap();
        bridge.send_humidity(40.0).await.unwrap();
        bridge
            .send_command(&Command::RgbLed { r: 255, g: 0, b: 16 })
            .await
            .unwrap();

        assert_eq!(
            bridge.transport.sent[0],
            vec![0x08, 0x01, 0x00, 0x00, 0xCC, 0x41]
        );
        assert_eq!(
            bridge.transport.sent[1],
            vec![0x09, 0x01, 0x00, 0x00, 0x20, 0x42]
        );
        assert_eq!(bridge.transport.sent[2], vec![0x03, 0x00, 255, 0, 16]);
    }

    #[tokio::test]
    async fn raw_sends_are_verbatim() {
        let mut bridge = IoBridge::new(LoopbackTransport::default());
        bridge.send_data("PING").await.unwrap();
        assert_eq!(bridge.transport.sent[0], b"PING".to_vec());
    }

    #[tokio::test]
    async fn latest_is_empty_before_first_frame() {
        let bridge = IoBridge::new(LoopbackTransport::default());
        assert_eq!(bridge.latest_data().await, None);
    }

    #[tokio::test]
    async fn poll_decodes_and_retains() {
        let mut transport = LoopbackTransport::default();
        let raw = Report::Joystick {
            x: 7,
            y: 1023,
            pressed: false,
        }
        .encode();
        transport.inbound.push_back(raw.clone());

        let mut bridge = IoBridge::new(transport);
        let handle = bridge.latest_handle();
        let report = bridge.poll().await.unwrap();
        assert_eq!(
            report,
            Report::Joystick {
                x: 7,
                y: 1023,
                pressed: false,
            }
        );
        assert_eq!(bridge.latest_data().await, Some(raw.clone()));
        // The shared handle sees the same slot.
        assert_eq!(handle.get().await, Some(raw));
    }

    #[tokio::test]
    async fn undecodable_frames_are_still_retained() {
        let mut transport = LoopbackTransport::default();
        transport.inbound.push_back(vec![0xFF, 0x00]);

        let mut bridge = IoBridge::new(transport);
        assert_eq!(
            bridge.poll().await,
            Err(BridgeError::UnknownDeviceTag(0xFF))
        );
        assert_eq!(bridge.latest_data().await, Some(vec![0xFF, 0x00]));
    }

    #[tokio::test]
    async fn report_stream_ends_on_transport_failure() {
        let mut transport = LoopbackTransport::default();
        transport
            .inbound
            .push_back(Report::Temperature(-4.25).encode());
        transport
            .inbound
            .push_back(Command::Poll(DeviceKind::Oled).encode());

        let mut bridge = IoBridge::new(transport);
        let reports = bridge.reports();
        pin_mut!(reports);

        assert_eq!(
            reports.next().await,
            Some(Ok(Report::Temperature(-4.25)))
        );
        // A poll frame is not a report; the stream keeps going.
        assert!(matches!(reports.next().await, Some(Err(_))));
        // Drained transport errors out and terminates the stream.
        assert!(matches!(
            reports.next().await,
            Some(Err(BridgeError::IOFailure(_)))
        ));
        assert_eq!(reports.next().await, None);
    }
}
