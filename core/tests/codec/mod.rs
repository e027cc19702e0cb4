// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Encoding events into calendar text and reading them back.

mod exceptions;
mod round_trip;
