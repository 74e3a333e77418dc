// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line boundary for the on-demand storage service adapter
//!
//! The broker invokes the `service-adapter` binary once per request with a
//! subcommand and positional JSON/YAML documents.  This crate decodes those
//! documents, hands them to `manifest-composer`, and writes the result (or a
//! failure) back in the form the broker expects.

mod dispatch;

pub use dispatch::{AdapterApp, NOT_IMPLEMENTED_EXIT_STATUS};
