//! The effect chain and its scheduler.
//!
//! - [`EffectChain`]: pending entries (FIFO), the current entry, and a LIFO
//!   stack of saved continuations for reactive interrupts
//! - [`ActionRequired`] / [`Choice`]: a suspension prompt and its answer
//! - [`EffectScheduler`]: runs the chain, suspending on prompts
//! - [`resolution`]: validates and applies answers
//! - [`conditional`]: `then` / `if_executed` follow-ups
//! - [`snapshot`]: JSON snapshots of a whole match

pub mod conditional;
mod prompt;
mod queue;
pub mod resolution;
mod scheduler;
pub mod snapshot;

pub use prompt::{ActionRequired, BoardPurpose, Choice, HandPurpose, LanePurpose, PromptKind};
pub use queue::{ChainEntry, EffectChain, Progress, SavedContinuation};
pub use scheduler::{EffectScheduler, Resolution, SuspendedMatch};
