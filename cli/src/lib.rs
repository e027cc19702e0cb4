// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface of tidecal.

mod cli;
mod cmd_expand;
mod cmd_export;
mod cmd_import;
mod config;
mod occurrence_formatter;
mod store;
mod table;
mod util;

pub use crate::cli::{Cli, Commands, run};
pub use crate::store::{DirStore, StoreError};
