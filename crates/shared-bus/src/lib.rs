//! # Shared Bus - Subscription Fan-out Primitives
//!
//! Building blocks for delivering cached values to subscribers from a single
//! serial owner.
//!
//! ## Model
//!
//! ```text
//!   owner (serial context)                         subscribers
//! ┌──────────────────────────┐   UnboundedSender  ┌──────────────────┐
//! │ Topic<V>                 │ ─────────────────→ │ Subscription<V>  │
//! │   cached value           │                    │   (Stream)       │
//! │   SubscriberBag<V>       │ ←───────────────── │   drop → unsub   │
//! └──────────────────────────┘  unsubscribe hook  └──────────────────┘
//! ```
//!
//! - Every subscriber receives the current value before its handle is returned.
//! - Publishing is equality-gated: an unchanged value is never re-broadcast.
//! - Tokens are generation-stamped and never reused, so removal never depends
//!   on positions inside a collection that is being iterated.
//! - `KeyedTopics` materializes parameterized topics lazily and evicts a topic
//!   as soon as its last subscriber leaves.
//!
//! None of these types are `Sync`-shared; the owner confines them to one task.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod subscriber;
pub mod topic;

// Re-export main types
pub use subscriber::{SubscriberBag, Subscription, SubscriptionError, SubscriptionToken};
pub use topic::{KeyedTopics, Topic};
