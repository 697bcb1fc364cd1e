//! Dashboard page
//!
//! Fetches the four dashboard datasets concurrently and renders them into
//! the page: headline counters, activity feed, blood stock grid and today's
//! schedule. Containers missing from the page are skipped.

use std::fmt::Write as _;
use std::rc::Rc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::CounterConfig;
use crate::counter::animate_counter;
use crate::dom::{classes, ids, selectors};
use crate::error::{ServiceError, UiError, UiResult};
use crate::host::Host;
use crate::notify::{NotificationKind, Notifier};
use crate::service::{
    ActivityEntry, BloodStock, BloodType, DashboardMetrics, DataService, ScheduleEntry,
};
use crate::transition::intercept::is_same_page;

/// Stock count drawn as a full bar
pub const STOCK_BAR_CAPACITY: u32 = 100;

pub struct Dashboard<H: Host, S: DataService> {
    host: Rc<H>,
    service: Rc<S>,
    notifier: Rc<Notifier<H>>,
    counters: CounterConfig,
}

impl<H: Host, S: DataService> Dashboard<H, S> {
    pub fn new(
        host: Rc<H>,
        service: Rc<S>,
        notifier: Rc<Notifier<H>>,
        counters: CounterConfig,
    ) -> Self {
        Self {
            host,
            service,
            notifier,
            counters,
        }
    }

    /// Whether the current page has a dashboard to fill.
    pub fn is_present(&self) -> bool {
        self.host.element_by_id(ids::DASHBOARD).is_some()
    }

    /// Fetch and render everything.
    ///
    /// Datasets that arrive are rendered even if another fetch, or another
    /// section's rendering, fails. A fetch failure shows an error toast and is
    /// returned once the toast is gone; otherwise the first rendering error
    /// is returned.
    pub async fn load(&self) -> UiResult<()> {
        let (metrics, activity, stock, schedule) = futures::join!(
            self.service.metrics(),
            self.service.recent_activity(),
            self.service.blood_stock(),
            self.service.schedule(),
        );

        let mut failure: Option<ServiceError> = None;
        let mut broken: Option<UiError> = None;
        match activity {
            Ok(entries) => record_render(&mut broken, "activity", self.render_activity(&entries)),
            Err(err) => record_failure(&mut failure, "recent_activity", err),
        }
        match stock {
            Ok(stock) => record_render(&mut broken, "stock", self.render_stock(&stock)),
            Err(err) => record_failure(&mut failure, "blood_stock", err),
        }
        match schedule {
            Ok(entries) => record_render(&mut broken, "schedule", self.render_schedule(&entries)),
            Err(err) => record_failure(&mut failure, "schedule", err),
        }
        match metrics {
            Ok(metrics) => {
                record_render(&mut broken, "metrics", self.animate_metrics(&metrics).await)
            }
            Err(err) => record_failure(&mut failure, "metrics", err),
        }

        if let Some(err) = failure {
            self.notifier
                .emit("Failed to load dashboard data", NotificationKind::Error)
                .await?;
            return Err(UiError::Service(err));
        }
        match broken {
            None => {
                info!("dashboard loaded");
                Ok(())
            }
            Some(err) => Err(err),
        }
    }

    /// Reload all data and confirm with a toast.
    pub async fn refresh(&self) -> UiResult<()> {
        let button = self.host.element_by_id(ids::REFRESH_DASHBOARD);
        if let Some(button) = &button {
            self.host.add_class(button, classes::LOADING)?;
        }
        let result = self.load().await;
        if let Some(button) = &button {
            self.host.remove_class(button, classes::LOADING)?;
        }
        result?;
        self.notifier
            .emit("Dashboard updated", NotificationKind::Success)
            .await?;
        Ok(())
    }

    /// Highlight the navigation links that point at the current page.
    pub fn mark_active_nav(&self) -> UiResult<()> {
        let path = self.host.current_path();
        for link in self.host.query_all(selectors::NAV_LINK) {
            let current = self
                .host
                .attribute(&link, "href")
                .is_some_and(|href| is_same_page(href.trim(), &path));
            if current {
                self.host.add_class(&link, classes::ACTIVE)?;
            } else {
                self.host.remove_class(&link, classes::ACTIVE)?;
            }
        }
        Ok(())
    }

    // ========== Rendering ==========

    async fn animate_metrics(&self, metrics: &DashboardMetrics) -> UiResult<()> {
        let targets = [
            (ids::TOTAL_DONORS, metrics.total_donors),
            (ids::BLOOD_UNITS, metrics.blood_units),
            (ids::DONATIONS_TODAY, metrics.donations_today),
            (ids::PENDING_REQUESTS, metrics.pending_requests),
        ];
        let nodes: Vec<(H::Node, u64)> = targets
            .iter()
            .filter_map(|&(id, target)| self.host.element_by_id(id).map(|node| (node, target)))
            .collect();
        let counters = nodes
            .iter()
            .map(|(node, target)| animate_counter(&*self.host, node, *target, &self.counters));
        for result in join_all(counters).await {
            result?;
        }
        Ok(())
    }

    fn render_activity(&self, entries: &[ActivityEntry]) -> UiResult<()> {
        let Some(list) = self.host.element_by_id(ids::ACTIVITY_LIST) else {
            return Ok(());
        };
        let mut html = String::new();
        for entry in entries {
            let _ = write!(
                html,
                r#"<li class="activity-item activity-{}"><span class="activity-message">{}</span><span class="activity-time">{}</span></li>"#,
                entry.kind.as_str(),
                escape_html(&entry.message),
                escape_html(&entry.time_ago),
            );
        }
        debug!(entries = entries.len(), "rendered activity feed");
        self.host.set_inner_html(&list, &html)
    }

    fn render_stock(&self, stock: &BloodStock) -> UiResult<()> {
        let Some(grid) = self.host.element_by_id(ids::BLOOD_STOCK) else {
            return Ok(());
        };
        let mut html = String::new();
        for blood_type in BloodType::ALL {
            let units = stock.units_of(blood_type);
            let _ = write!(
                html,
                r#"<div class="stock-item stock-{level}"><span class="stock-type">{label}</span><div class="stock-bar"><div class="stock-fill" style="width: {width}%"></div></div><span class="stock-units">{units} units</span></div>"#,
                level = stock.level_of(blood_type).as_str(),
                label = escape_html(blood_type.label()),
                width = stock_bar_width(units),
                units = units,
            );
        }
        debug!(total = stock.total(), "rendered blood stock");
        let shortages = stock.shortages();
        if !shortages.is_empty() {
            warn!(?shortages, "blood stock running low");
        }
        self.host.set_inner_html(&grid, &html)
    }

    fn render_schedule(&self, entries: &[ScheduleEntry]) -> UiResult<()> {
        let Some(list) = self.host.element_by_id(ids::SCHEDULE_LIST) else {
            return Ok(());
        };
        let mut html = String::new();
        for entry in entries {
            let _ = write!(
                html,
                r#"<li class="schedule-item"><span class="schedule-time">{}</span><span class="schedule-donor">{}</span><span class="schedule-type">{}</span><span class="status status-{}">{}</span></li>"#,
                escape_html(&entry.time),
                escape_html(&entry.donor),
                escape_html(entry.blood_type.label()),
                entry.status.as_str(),
                entry.status.label(),
            );
        }
        self.host.set_inner_html(&list, &html)
    }
}

fn record_failure(slot: &mut Option<ServiceError>, call: &'static str, err: ServiceError) {
    warn!(call, error = %err, "dashboard fetch failed");
    slot.get_or_insert(err);
}

fn record_render(slot: &mut Option<UiError>, section: &'static str, result: UiResult<()>) {
    if let Err(err) = result {
        warn!(section, error = %err, "dashboard section not rendered");
        slot.get_or_insert(err);
    }
}

/// Bar width in percent of [`STOCK_BAR_CAPACITY`], capped at 100.
pub fn stock_bar_width(units: u32) -> u32 {
    (units.min(STOCK_BAR_CAPACITY) * 100) / STOCK_BAR_CAPACITY
}

/// Escape text for interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
