/*
 * SPDX-FileCopyrightText: 2022 perillamint
 *
 * SPDX-License-Identifier: MPL-2.0
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod bridge;
mod codec;
mod consts;
mod device;
mod error;
mod message;
mod transport;

use bridge::IoBridge;
use device::DeviceKind;
use message::Command;
use transport::ble::{BleTransport, BoardScanner};
use transport::serial::SerialTransport;
use transport::IoTransport;

use clap::Parser;
use futures::{pin_mut, StreamExt};
use pretty_hex::*;

#[macro_use]
extern crate lazy_static;

#[derive(clap::Parser)]
#[clap(about, version, author)]
struct Args {
    /// Transport to reach the board with: "ble" or "serial".
    #[clap(long, short = 't', value_name = "TRANSPORT")]
    transport: String,
    /// Advertised name fragment to match while scanning.
    #[clap(long, short = 'n', default_value = "")]
    name: String,
    /// Serial device path.
    #[clap(long, default_value = "/dev/ttyACM0")]
    tty: String,
    /// Device to request a report from after connecting.
    #[clap(long, short = 'p')]
    poll: Option<DeviceKind>,
}

lazy_static! {
    static ref ARGS: Args = Args::parse();
}

#[tokio::main]
async fn main() {
    env_logger::init();
    match ARGS.transport.as_str() {
        "ble" => {
            ble_session().await;
        }
        "serial" => {
            serial_session().await;
        }
        _ => {
            println!("Require transport type. Use --help for more information.");
        }
    }
}

async fn serial_session() {
    let transport = SerialTransport::new(&ARGS.tty).expect("failed to open serial port");
    run_bridge(transport).await;
}

async fn ble_session() {
    let mut scanner = BoardScanner::new().await.expect("no BT adapter available");
    let adapters = scanner.get_adapter_names().await.unwrap();
    println!("Adapters: {:?}", adapters);
    // Just use adapter zero.
    scanner.set_adapter(0).unwrap();

    let board = scanner
        .search_board_by_name(&ARGS.name)
        .await
        .unwrap()
        .expect("no IO board found");
    println!("{:?}", board);

    run_bridge(BleTransport::new(board)).await;
}

async fn run_bridge<T: IoTransport>(transport: T) {
    let mut bridge = IoBridge::new(transport);
    bridge.init().await.expect("transport init failed");

    if let Some(kind) = ARGS.poll {
        bridge.send_command(&Command::Poll(kind)).await.unwrap();
    }

    let latest = bridge.latest_handle();
    let reports = bridge.reports();
    pin_mut!(reports);
    while let Some(report) = reports.next().await {
        match report {
            Ok(report) => println!("{:?}", report),
            Err(e) => {
                eprintln!("frame error: {}", e);
                if let Some(raw) = latest.get().await {
                    println!("{}", raw.hex_dump());
                }
            }
        }
    }
}
