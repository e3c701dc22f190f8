// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Announced chore events after they leave the orchestrator
//!
//! `EventBus` fans them out to in-process subscribers, `EventLog` keeps an
//! audit trail, and `EventFilter` narrows either to a chore, an assignee or
//! a set of event kinds.

mod bus;
mod filter;
mod log;

pub use bus::{EventBus, EventReceiver, EventSender, SubscriberId};
pub use filter::EventFilter;
pub use log::{EventLog, EventRecord};
