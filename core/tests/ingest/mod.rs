// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Ingestion of calendar text through validation into store calls.

mod cancel;
mod lifecycle;
mod outdated;
