//! The scope session: acquire audio on request, then sample and draw once per tick.
//!
//! Everything environmental (the trigger, the frame scheduler, the error notification
//! and the drawing surfaces) is reached through the traits in [`controller`], so the
//! loop runs the same against the terminal and against test doubles.

pub mod controller;

pub use controller::{
    run_scope, FrameScheduler, FrameStatus, Notifier, ScopeController, ScopeOutcome,
    ScopeSession, ScopeSettings, ScopeView, Tick, Trigger,
};
