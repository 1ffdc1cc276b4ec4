//! # IO Module
//!
//! Seams to the platform the core runs on. The core never talks to the
//! operating system directly; the embedding app provides implementations of
//! these traits.
//!
//! - **clock**: supplies "now" to every entry point
//! - **notifications**: submits and cancels local notifications

pub mod clock;
pub mod notifications;

pub use clock::*;
pub use notifications::*;
