//! Page transitions
//!
//! - [`intercept`]: which link clicks become animated transitions
//! - [`orchestrator`]: the exit/entrance sequencing state machine
//! - [`form`]: submit control busy state
//! - [`easing`]: easing curves shared with the counter animator

pub mod easing;
pub mod form;
pub mod intercept;
pub mod orchestrator;

pub use easing::Easing;
pub use form::BusyButton;
pub use intercept::{decide, InterceptDecision, LinkInfo, SkipReason};
pub use orchestrator::{
    PageTransitions, SubmitDecision, TransitionOutcome, TransitionPhase, TransitionState,
};
