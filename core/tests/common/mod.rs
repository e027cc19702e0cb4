// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Test data factories (fixtures)
//! - Custom assertion helpers
//! - An in-memory event store recording every call

mod assertions;
mod fixtures;
mod store;

#[allow(unused_imports)]
pub use assertions::{assert_local_starts, assert_same_fields};
#[allow(unused_imports)]
pub use fixtures::{
    at, berlin, dtstamp, full_event, ical, new_york, timed_event, utc, weekly_from,
};
#[allow(unused_imports)]
pub use store::{MemoryStore, StoreCall, UnreachableStore};
