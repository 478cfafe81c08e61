//! interleave-core — interleaving patterns, quiz assembly, flashcard sampling
//! and progress aggregation.
//!
//! The components here are pure and synchronous apart from the
//! [`StudyStore`](traits::StudyStore) trait, which the tool layer uses to
//! read and write per-user study state.

pub mod catalog;
pub mod error;
pub mod model;
pub mod pattern;
pub mod progress;
pub mod quiz;
pub mod sampler;
pub mod schedule;
pub mod sequencer;
pub mod traits;
