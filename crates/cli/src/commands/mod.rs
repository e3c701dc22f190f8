// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod assignee;
pub mod chore;
pub mod daemon;
pub mod rotation;
pub mod schedule;
pub mod status;
pub mod tick;
pub mod workflow;
