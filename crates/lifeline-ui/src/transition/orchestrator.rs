//! Page transition orchestrator
//!
//! Replaces the browser's instant jump between pages with a staged exit:
//! the loading overlay is shown, transition participants lose their
//! `loaded` state, one timed wait elapses, then the real navigation happens.
//!
//! ```text
//!            transition_to_page            navigate ok
//!   Idle ─────────────────────────▶ Transitioning ─────────▶ Navigated
//!    ▲                                    │
//!    └────────────── failure ─────────────┘
//! ```
//!
//! `Navigated` is terminal: the document is being replaced and every later
//! trigger is ignored.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::form::BusyButton;
use super::intercept::{decide, InterceptDecision, LinkInfo};
use crate::config::TransitionConfig;
use crate::dom::{classes, ids, selectors};
use crate::error::{UiError, UiResult};
use crate::host::Host;

/// Orchestrator phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    /// Exit sequence running
    Transitioning,
    /// Navigation issued; the page is going away
    Navigated,
}

/// Snapshot of the orchestrator state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionState {
    pub phase: TransitionPhase,
    /// Exit wait the next transition would use
    pub duration_ms: u32,
}

impl TransitionState {
    pub fn is_transitioning(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }
}

/// Result of [`PageTransitions::transition_to_page`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Navigation to the URL was issued
    Navigated(String),
    /// Another transition was already running
    Ignored,
    /// The sequence failed; the user stays on the current page
    Aborted(UiError),
}

/// What to do with a form submission
pub enum SubmitDecision<H: Host> {
    /// A transition is running; cancel the submission
    Suppress,
    /// Let the submission proceed; the submit control (if any) is busy
    Proceed(Option<BusyButton<H>>),
}

/// Navigation interception and page transition state machine.
pub struct PageTransitions<H: Host> {
    host: Rc<H>,
    config: TransitionConfig,
    phase: Cell<TransitionPhase>,
}

impl<H: Host> PageTransitions<H> {
    pub fn new(host: Rc<H>, config: TransitionConfig) -> Self {
        Self {
            host,
            config,
            phase: Cell::new(TransitionPhase::Idle),
        }
    }

    pub fn state(&self) -> TransitionState {
        TransitionState {
            phase: self.phase.get(),
            duration_ms: self.effective_duration_ms(),
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state().is_transitioning()
    }

    /// Exit wait, collapsed to zero when the user prefers reduced motion.
    pub fn effective_duration_ms(&self) -> u32 {
        if self.host.prefers_reduced_motion() {
            0
        } else {
            self.config.duration_ms
        }
    }

    fn effective_stagger_ms(&self) -> u32 {
        if self.host.prefers_reduced_motion() {
            0
        } else {
            self.config.stagger_ms
        }
    }

    // ========== Navigation ==========

    /// Decide whether a click on `link` becomes a transition.
    pub fn intercept(&self, link: Option<&LinkInfo>) -> InterceptDecision {
        let decision = decide(link, &self.host.current_path(), self.is_transitioning());
        debug!(?decision, "link click");
        decision
    }

    /// Run the exit sequence and navigate to `url`.
    ///
    /// A call made while another transition is running returns
    /// [`TransitionOutcome::Ignored`] without touching the page. On failure
    /// the overlay is hidden and the orchestrator is back to `Idle`.
    pub async fn transition_to_page(&self, url: &str) -> TransitionOutcome {
        if self.is_transitioning() {
            debug!(url, "transition already in flight");
            return TransitionOutcome::Ignored;
        }
        self.phase.set(TransitionPhase::Transitioning);
        info!(url, "starting page transition");

        match self.run_exit(url).await {
            Ok(()) => {
                self.phase.set(TransitionPhase::Navigated);
                TransitionOutcome::Navigated(url.to_string())
            }
            Err(err) => {
                warn!(url, error = %err, "page transition failed, staying on current page");
                if let Err(hide_err) = self.hide_loading() {
                    warn!(error = %hide_err, "could not hide loading overlay");
                }
                self.reveal_now();
                self.phase.set(TransitionPhase::Idle);
                TransitionOutcome::Aborted(err)
            }
        }
    }

    async fn run_exit(&self, url: &str) -> UiResult<()> {
        self.show_loading()?;
        self.animate_page_out().await?;
        self.host.navigate(url)
    }

    // ========== Overlay ==========

    pub fn show_loading(&self) -> UiResult<()> {
        match self.host.element_by_id(ids::PAGE_LOADER) {
            Some(loader) => self.host.add_class(&loader, classes::ACTIVE),
            None => Ok(()),
        }
    }

    pub fn hide_loading(&self) -> UiResult<()> {
        match self.host.element_by_id(ids::PAGE_LOADER) {
            Some(loader) => self.host.remove_class(&loader, classes::ACTIVE),
            None => Ok(()),
        }
    }

    pub fn is_loading_visible(&self) -> bool {
        self.host
            .element_by_id(ids::PAGE_LOADER)
            .is_some_and(|loader| self.host.has_class(&loader, classes::ACTIVE))
    }

    // ========== Animation ==========

    /// Drop the `loaded` state from every participant, then wait out the exit.
    ///
    /// With a zero duration no wait is scheduled and the future completes on
    /// its first poll.
    pub async fn animate_page_out(&self) -> UiResult<()> {
        for element in self.host.query_all(selectors::TRANSITION_PARTICIPANT) {
            self.host.remove_class(&element, classes::LOADED)?;
        }
        let duration = self.effective_duration_ms();
        if duration > 0 {
            self.host.sleep(duration).await;
        }
        Ok(())
    }

    /// Reveal every participant in document order, one stagger apart.
    ///
    /// Safe to run again on an already revealed page. A failing element does
    /// not stop the cascade; the first error is returned at the end.
    pub async fn animate_page_in(&self) -> UiResult<()> {
        let stagger = self.effective_stagger_ms();
        let mut result = Ok(());
        for (index, element) in self
            .host
            .query_all(selectors::TRANSITION_PARTICIPANT)
            .into_iter()
            .enumerate()
        {
            if index > 0 && stagger > 0 {
                self.host.sleep(stagger).await;
            }
            if let Err(err) = self.host.add_class(&element, classes::LOADED) {
                warn!(index, error = %err, "could not reveal transition element");
                result = result.and(Err(err));
            }
        }
        result
    }

    /// Put `loaded` back on every participant at once, skipping failures.
    fn reveal_now(&self) {
        for element in self.host.query_all(selectors::TRANSITION_PARTICIPANT) {
            if let Err(err) = self.host.add_class(&element, classes::LOADED) {
                warn!(error = %err, "could not reveal transition element");
            }
        }
    }

    // ========== Page Lifecycle ==========

    /// Page restored from the back/forward cache: clear leftovers of the
    /// transition that led away from it and reveal it again.
    pub async fn restore(&self) -> UiResult<()> {
        info!("page restored from history cache");
        self.phase.set(TransitionPhase::Idle);
        self.hide_loading()?;
        self.animate_page_in().await
    }

    /// Page became visible again. An overlay left active while idle is stale.
    pub fn on_visible(&self) -> UiResult<()> {
        if self.phase.get() == TransitionPhase::Idle && self.is_loading_visible() {
            debug!("hiding stale loading overlay");
            return self.hide_loading();
        }
        Ok(())
    }

    // ========== Forms ==========

    /// Gate a form submission on the transition state.
    ///
    /// While a transition is running the submission is suppressed. Otherwise
    /// the submit control, when there is one, is switched to its busy state.
    pub fn begin_form_submit(&self, button: Option<H::Node>) -> SubmitDecision<H> {
        if self.is_transitioning() {
            debug!("form submission suppressed during transition");
            return SubmitDecision::Suppress;
        }
        let busy = button.and_then(|node| {
            BusyButton::engage(self.host.clone(), node, &self.config.busy_label)
                .map_err(|err| warn!(error = %err, "could not mark submit button busy"))
                .ok()
        });
        SubmitDecision::Proceed(busy)
    }

    /// Release a native form post's submit control after the fallback delay.
    ///
    /// Native posts expose no response signal to the page, so this is a timer
    /// and not a response hook. Flows that own their request restore the
    /// [`BusyButton`] themselves when the response arrives.
    pub async fn restore_after_timeout(&self, busy: BusyButton<H>) {
        self.host.sleep(self.config.form_restore_ms).await;
        if let Err(err) = busy.restore() {
            warn!(error = %err, "could not restore submit button");
        }
    }
}
