//! DOM contract: element ids, selectors and class names the core relies on.
//!
//! Markup and stylesheets are supplied by the site; this module is the single
//! list of hooks they must provide.

/// Element ids
pub mod ids {
    pub const PAGE_LOADER: &str = "page-loader";
    pub const SIDEBAR: &str = "sidebar";
    pub const SIDEBAR_OVERLAY: &str = "sidebar-overlay";
    pub const MENU_TOGGLE: &str = "menu-toggle";
    pub const SIDEBAR_CLOSE: &str = "sidebar-close";
    pub const MAIN_CONTENT: &str = "main-content";
    pub const NOTIFICATION_CONTAINER: &str = "notification-container";

    pub const DASHBOARD: &str = "dashboard";
    pub const REFRESH_DASHBOARD: &str = "refresh-dashboard";
    pub const TOTAL_DONORS: &str = "total-donors";
    pub const BLOOD_UNITS: &str = "blood-units";
    pub const DONATIONS_TODAY: &str = "donations-today";
    pub const PENDING_REQUESTS: &str = "pending-requests";
    pub const ACTIVITY_LIST: &str = "activity-list";
    pub const BLOOD_STOCK: &str = "blood-stock";
    pub const SCHEDULE_LIST: &str = "schedule-list";

    pub const RECOVERY_FORM: &str = "forgot-password-form";
    pub const RECOVERY_EMAIL: &str = "email";
    pub const RECOVERY_SUBMIT: &str = "reset-button";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const SUCCESS_MESSAGE: &str = "success-message";

    pub const CONFIG: &str = "lifeline-config";
}

/// Selectors
pub mod selectors {
    /// Elements taking part in the page entrance/exit animation
    pub const TRANSITION_PARTICIPANT: &str = ".page-transition";
    pub const NAV_LINK: &str = ".nav-link";
    pub const NOTIFICATION: &str = ".notification";
    pub const NOTIFICATION_CLOSE: &str = ".notification-close";
}

/// Visual state classes
pub mod classes {
    pub const OPEN: &str = "open";
    pub const LOADED: &str = "loaded";
    pub const ACTIVE: &str = "active";
    pub const HIDDEN: &str = "hidden";
    pub const SHOW: &str = "show";
    pub const SIDEBAR_OPEN: &str = "sidebar-open";
    pub const LOADING: &str = "loading";
}
