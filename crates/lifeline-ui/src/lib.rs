//! Lifeline portal UI core
//!
//! Behavior layer of the Lifeline blood bank portal:
//! - Animated page transitions in place of instant navigation
//! - Responsive sidebar (overlay on narrow viewports, push on wide ones)
//! - Counting-up metric counters
//! - Transient toast notifications
//! - Dashboard and password recovery flows over a mock data service
//!
//! ## Architecture
//!
//! Every component is generic over [`Host`], the narrow set of page services
//! it needs. The browser host lives in the `lifeline-web` crate; this crate
//! ships [`MemoryHost`] so all behavior runs under plain `cargo test`.
//!
//! - [`transition`]: link interception, exit/entrance sequencing, form gating
//! - [`sidebar`]: sidebar open state and its presentation
//! - [`counter`]: time-based counter interpolation
//! - [`notify`]: toast lifecycle
//! - [`service`]: data service boundary and the fixture-backed mock
//! - [`dashboard`], [`recovery`]: page flows built on the above
//! - [`app`]: wires one instance of everything for a page
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use futures::executor::block_on;
//! use lifeline_ui::{MemoryHost, MockDataService, PortalApp, UiConfig};
//!
//! let host = Rc::new(MemoryHost::new());
//! let service = Rc::new(MockDataService::new(host.clone()));
//! let app = PortalApp::new(host, service, UiConfig::default());
//!
//! block_on(app.on_ready()).unwrap();
//! assert!(!app.transitions().is_transitioning());
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: no browser dependency, testable without a browser
//! 2. **Time Abstraction**: waits and frames come from the host, tests use a virtual clock
//! 3. **Single-threaded**: shared state is `Rc` + `Cell`, never a global

pub mod app;
pub mod config;
pub mod counter;
pub mod dashboard;
pub mod dom;
pub mod error;
pub mod host;
pub mod memory;
pub mod notify;
pub mod recovery;
pub mod service;
pub mod sidebar;
pub mod transition;

pub use app::PortalApp;
pub use config::{
    CounterConfig, NotificationConfig, SidebarConfig, TransitionConfig, UiConfig,
    SIDEBAR_BREAKPOINT_PX, STAGGER_MS, TRANSITION_DURATION_MS,
};
pub use counter::{animate_counter, format_grouped, CounterAnimation};
pub use dashboard::Dashboard;
pub use error::{ServiceError, ServiceResult, UiError, UiResult, ValidationError};
pub use host::Host;
pub use memory::{HostEvent, MemoryHost, NodeRef};
pub use notify::{Notification, NotificationKind, Notifier};
pub use recovery::{validate_email, PasswordRecovery, RecoveryOutcome};
pub use service::{
    ActivityEntry, ActivityKind, AppointmentStatus, BloodStock, BloodType, DashboardMetrics,
    DataService, MockDataService, ResetConfirmation, ScheduleEntry, StockLevel,
    INVALID_RESET_EMAIL,
};
pub use sidebar::{SidebarController, SidebarMode, SidebarState};
pub use transition::{
    BusyButton, Easing, InterceptDecision, LinkInfo, PageTransitions, SkipReason, SubmitDecision,
    TransitionOutcome, TransitionPhase, TransitionState,
};
