// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Executable entry point for the service adapter

use clap::Parser;
use minio_service_adapter::AdapterApp;

fn main() {
    let app = AdapterApp::parse();
    let log = match app.setup_log() {
        Ok(log) => log,
        Err(error) => {
            eprintln!("service-adapter: {:#}", error);
            std::process::exit(1);
        }
    };

    let result = app.exec(&log);
    // Flush the async drain before deciding the exit status.
    drop(log);
    if let Err(error) = result {
        eprintln!("service-adapter: {:#}", error);
        std::process::exit(AdapterApp::exit_status(&error));
    }
}
