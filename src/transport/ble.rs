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
use crate::consts::{BLE_IOSVC_UUID, BLE_RX_CHARACTERISTIC_UUID, BLE_TX_CHARACTERISTIC_UUID};
use crate::error::BridgeError;
use async_trait::async_trait;
use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use bytes::BytesMut;
use futures::stream::StreamExt;
use log::{debug, trace};
use pretty_hex::*;
use tokio_util::codec::{Decoder, Encoder};

use std::time::Duration;
use tokio::time;

/// Writes are chunked to fit a default-MTU ATT payload.
const WRITE_CHUNK: usize = 20;
/// Time given to the adapter to collect advertisements.
const SCAN_SETTLE: Duration = Duration::from_secs(2);

pub struct BoardScanner {
    bt_adapters: Vec<Adapter>,
    adapter_idx: usize,
}

impl BoardScanner {
    pub async fn new() -> Result<Self, BridgeError> {
        let manager = Manager::new()
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|e| BridgeError::BTAdapterError(e.to_string()))?;

        if adapters.is_empty() {
            return Err(BridgeError::BTFailure(
                "Adapter does not exist.".to_string(),
            ));
        }

        Ok(Self {
            bt_adapters: adapters,
            adapter_idx: 0,
        })
    }

    /// Fetch adapters present in system
    pub async fn get_adapter_names(&self) -> Result<Vec<String>, BridgeError> {
        let mut ret: Vec<String> = vec![];
        for adapter in self.bt_adapters.iter() {
            let info = adapter
                .adapter_info()
                .await
                .map_err(|e| BridgeError::BTAdapterError(e.to_string()))?;

            ret.push(info);
        }

        Ok(ret)
    }

    /// Set adapter idx
    pub fn set_adapter(&mut self, idx: usize) -> Result<(), BridgeError> {
        if self.bt_adapters.len() > idx {
            self.adapter_idx = idx;
            Ok(())
        } else {
            Err(BridgeError::OutOfBounds)
        }
    }

    /// Scan for a board advertising the IO service. `name` narrows the
    /// match to peripherals whose advertised name contains it; the empty
    /// string matches any.
    pub async fn search_board_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Peripheral>, BridgeError> {
        let central = &self.bt_adapters[self.adapter_idx];
        central
            .start_scan(ScanFilter {
                services: vec![*BLE_IOSVC_UUID],
            })
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;
        time::sleep(SCAN_SETTLE).await;
        central
            .stop_scan()
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;

        for p in central
            .peripherals()
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?
        {
            let props = p
                .properties()
                .await
                .map_err(|e| BridgeError::BTFailure(e.to_string()))?;
            if let Some(props) = props {
                if props.local_name.iter().any(|n| n.contains(name)) {
                    debug!("Found IO board: {:?}", props.local_name);
                    return Ok(Some(p));
                }
            }
        }
        Ok(None)
    }
}

pub struct BleTransport {
    board: Peripheral,
    tx_char: Option<Characteristic>,
    codec: IoCodec,
    rxbuf: BytesMut,
}

impl BleTransport {
    pub fn new(board: Peripheral) -> Self {
        Self {
            board,
            tx_char: None,
            codec: IoCodec::default(),
            rxbuf: BytesMut::new(),
        }
    }
}

#[async_trait]
impl IoTransport for BleTransport {
    async fn init(&mut self) -> Result<(), BridgeError> {
        self.board
            .connect()
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;

        self.board
            .discover_services()
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;

        let chars = self.board.characteristics();
        let rx = chars
            .iter()
            .find(|c| c.uuid == *BLE_RX_CHARACTERISTIC_UUID)
            .ok_or(BridgeError::BTNoCharacteristics)?
            .clone();
        let tx = chars
            .iter()
            .find(|c| c.uuid == *BLE_TX_CHARACTERISTIC_UUID)
            .ok_or(BridgeError::BTNoCharacteristics)?
            .clone();

        self.board
            .subscribe(&rx)
            .await
            .map_err(|e| BridgeError::BTFailure(e.to_string()))?;

        self.tx_char = Some(tx);
        debug!("IO service discovered, notifications armed");

        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, BridgeError> {
        // Empty the reassembly buffer first.
        if let Ok(Some(frame)) = self.codec.decode(&mut self.rxbuf) {
            return Ok(frame);
        }

        let mut notifications = self
            .board
            .notifications()
            .await
            .map_err(|e| BridgeError::IOFailure(e.to_string()))?;

        while let Some(notif) = notifications.next().await {
            trace!("BLE RX: {:?}", notif.value.hex_dump());
            self.rxbuf.extend_from_slice(&notif.value);
            match self.codec.decode(&mut self.rxbuf) {
                Ok(Some(frame)) => return Ok(frame),
                Err(e) => return Err(BridgeError::IOFailure(e.to_string())),
                Ok(None) => {} // Frame is not complete yet, wait for the next notification.
            }
        }

        Err(BridgeError::IOFailure(
            "notification stream ended".to_string(),
        ))
    }

    async fn write_frame(&mut self, data: &[u8]) -> Result<(), BridgeError> {
        let tx = self.tx_char.clone().ok_or(BridgeError::NotInitialized)?;
        let mut frame = BytesMut::new();
        self.codec
            .encode(data, &mut frame)
            .map_err(|_| BridgeError::DataTooLarge(data.len()))?;
        trace!("BLE TX: {:?}", frame.hex_dump());

        for chunk in frame.chunks(WRITE_CHUNK) {
            self.board
                .write(&tx, chunk, WriteType::WithoutResponse)
                .await
                .map_err(|e| BridgeError::IOFailure(e.to_string()))?;
        }

        Ok(())
    }
}
