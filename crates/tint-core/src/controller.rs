//! Reactive recomputation of the live health state
//!
//! `BudgetFeed` holds the latest budgets and transactions and notifies
//! listeners synchronously whenever either changes. `ReactiveController`
//! registers itself as a listener, re-runs the pipeline on every
//! notification and publishes the result on a `tokio::sync::watch` channel.
//!
//! Pipeline:
//! 1. Keep transactions in the current calendar month that are debits
//! 2. Sum absolute spend per category
//! 3. Zip the sums against each budget's allotment into `BudgetPeriod`s
//! 4. Aggregate into one `BudgetStatus`
//! 5. Build the theme and overwrite its primary/accent with the gradient color
//! 6. Select the icon variant for the aggregate percentage

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::color::ColorScale;
use crate::config::HealthConfig;
use crate::icon::{AppIconVariant, IconSelector};
use crate::models::{Budget, BudgetPeriod, Transaction};
use crate::status::{BudgetStatus, StatusClassifier};
use crate::theme::{generate_smooth_theme, DynamicTheme};

/// Latest input data held by a feed
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub budgets: Vec<Budget>,
    pub transactions: Vec<Transaction>,
}

/// Handle returned by [`BudgetFeed::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn Fn(&FeedSnapshot) + Send + Sync>;

/// Source of budget/transaction data with change notification
///
/// Listeners run synchronously on the updating thread, in subscription
/// order. A listener must not subscribe or unsubscribe on the same feed.
#[derive(Default)]
pub struct BudgetFeed {
    data: RwLock<Arc<FeedSnapshot>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicUsize,
}

impl BudgetFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&FeedSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Current data
    pub fn snapshot(&self) -> Arc<FeedSnapshot> {
        Arc::clone(&self.data.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set_budgets(&self, budgets: Vec<Budget>) {
        self.update(|data| data.budgets = budgets);
    }

    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.update(|data| data.transactions = transactions);
    }

    /// Replace both collections with a single notification
    pub fn replace(&self, budgets: Vec<Budget>, transactions: Vec<Transaction>) {
        self.update(|data| {
            data.budgets = budgets;
            data.transactions = transactions;
        });
    }

    fn update(&self, apply: impl FnOnce(&mut FeedSnapshot)) {
        let snapshot = {
            let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
            apply(Arc::make_mut(&mut data));
            Arc::clone(&data)
        };

        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, listener) in listeners.iter() {
            listener(&snapshot);
        }
    }
}

/// Everything downstream consumers need from one recompute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub status: BudgetStatus,
    pub theme: DynamicTheme,
    pub icon_variant: AppIconVariant,
    /// Current-month debit totals per budgeted category
    pub category_spend: BTreeMap<String, f64>,
    pub periods: Vec<BudgetPeriod>,
}

struct ControllerInner {
    classifier: StatusClassifier,
    selector: IconSelector,
    scale: ColorScale,
    clock: Arc<dyn Clock>,
    transition_window: Duration,
    /// Transitions started but not yet expired
    pending_transitions: AtomicUsize,
    published: watch::Sender<HealthSnapshot>,
}

/// Owns the live status/theme pair and recomputes it on data changes
#[derive(Clone)]
pub struct ReactiveController {
    inner: Arc<ControllerInner>,
}

impl ReactiveController {
    /// Controller on the system clock
    pub fn new(config: &HealthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &HealthConfig, clock: Arc<dyn Clock>) -> Self {
        let classifier = StatusClassifier::new(config.status_thresholds);
        let selector = IconSelector::new(config.icon_thresholds);
        let scale = ColorScale::budget();

        let initial = build_snapshot(&classifier, &selector, &scale, Vec::new(), BTreeMap::new());
        let (published, _) = watch::channel(initial);

        Self {
            inner: Arc::new(ControllerInner {
                classifier,
                selector,
                scale,
                clock,
                transition_window: config.transition_window,
                pending_transitions: AtomicUsize::new(0),
                published,
            }),
        }
    }

    /// Recompute now from the feed's current data, then on every change
    pub fn attach(&self, feed: &BudgetFeed) -> SubscriptionId {
        let snapshot = feed.snapshot();
        self.recompute(&snapshot.budgets, &snapshot.transactions);

        let controller = self.clone();
        feed.subscribe(move |data| {
            controller.recompute(&data.budgets, &data.transactions);
        })
    }

    /// Run the pipeline and publish the result
    pub fn recompute(&self, budgets: &[Budget], transactions: &[Transaction]) -> HealthSnapshot {
        self.begin_transition();

        let today = self.inner.clock.today();
        let category_spend = monthly_debits_by_category(transactions, today);
        let periods = budget_periods(budgets, &category_spend, today);

        let snapshot = build_snapshot(
            &self.inner.classifier,
            &self.inner.selector,
            &self.inner.scale,
            periods,
            category_spend,
        );

        debug!(
            budgets = budgets.len(),
            transactions = transactions.len(),
            percentage = snapshot.status.percentage,
            status = snapshot.status.status.as_str(),
            icon = snapshot.icon_variant.as_str(),
            "Recomputed budget health"
        );

        self.inner.published.send_replace(snapshot.clone());
        snapshot
    }

    /// Last published state
    pub fn snapshot(&self) -> HealthSnapshot {
        self.inner.published.borrow().clone()
    }

    /// Receiver notified on every publish
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.inner.published.subscribe()
    }

    /// True from the start of a recompute until the transition window has
    /// elapsed. Overlapping recomputes extend the window.
    pub fn is_transitioning(&self) -> bool {
        self.inner.pending_transitions.load(Ordering::SeqCst) > 0
    }

    fn begin_transition(&self) {
        let inner = Arc::clone(&self.inner);
        inner.pending_transitions.fetch_add(1, Ordering::SeqCst);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let window = inner.transition_window;
                handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    inner.pending_transitions.fetch_sub(1, Ordering::SeqCst);
                });
            }
            Err(_) => {
                debug!("No async runtime, skipping transition window");
                inner.pending_transitions.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }
}

fn build_snapshot(
    classifier: &StatusClassifier,
    selector: &IconSelector,
    scale: &ColorScale,
    periods: Vec<BudgetPeriod>,
    category_spend: BTreeMap<String, f64>,
) -> HealthSnapshot {
    let status = classifier.aggregate(&periods);
    let theme = generate_smooth_theme(&status, scale);
    let icon_variant = selector.select(status.percentage);

    HealthSnapshot {
        status,
        theme,
        icon_variant,
        category_spend,
        periods,
    }
}

/// Sum absolute debit amounts per category for the calendar month of `today`
///
/// Credits and uncategorized transactions are skipped.
pub fn monthly_debits_by_category(
    transactions: &[Transaction],
    today: NaiveDate,
) -> BTreeMap<String, f64> {
    let mut spend = BTreeMap::new();

    for tx in transactions {
        if tx.date.year() != today.year() || tx.date.month() != today.month() || !tx.is_debit() {
            continue;
        }
        if let Some(category) = &tx.category_id {
            *spend.entry(category.clone()).or_insert(0.0) += tx.amount.abs();
        }
    }

    spend
}

/// One period per budget for the month of `today`; spend in categories
/// without a budget is not represented
pub fn budget_periods(
    budgets: &[Budget],
    category_spend: &BTreeMap<String, f64>,
    today: NaiveDate,
) -> Vec<BudgetPeriod> {
    let (start, end) = month_bounds(today);

    budgets
        .iter()
        .map(|budget| {
            let spent = category_spend
                .get(&budget.category_id)
                .copied()
                .unwrap_or(0.0);
            BudgetPeriod::new(
                format!("{}-{}", budget.id, start.format("%Y-%m")),
                budget.id.clone(),
                budget.category_id.clone(),
                budget.amount,
                spent,
                start,
                end,
            )
        })
        .collect()
}

/// First and last day of the month containing `date`
fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::color::smooth_color;
    use crate::status::HealthStatus;
    use crate::test_utils::{budget, date, transaction};

    fn controller() -> ReactiveController {
        let clock = Arc::new(FixedClock::on(date(2024, 1, 15)));
        ReactiveController::with_clock(&HealthConfig::default(), clock)
    }

    fn january_data() -> (Vec<Budget>, Vec<Transaction>) {
        let budgets = vec![budget("food", 500.0), budget("rent", 300.0)];
        let transactions = vec![
            transaction("t1", date(2024, 1, 3), -120.0, "food"),
            transaction("t2", date(2024, 1, 9), -80.0, "food"),
            transaction("t3", date(2024, 1, 1), -250.0, "rent"),
            // Previous month
            transaction("t4", date(2023, 12, 30), -999.0, "food"),
            // Credit
            transaction("t5", date(2024, 1, 10), 50.0, "food"),
            // No budget for this category
            transaction("t6", date(2024, 1, 11), -75.0, "fun"),
            Transaction::new("t7", date(2024, 1, 12), -10.0),
        ];
        (budgets, transactions)
    }

    #[test]
    fn test_monthly_debits_filtering() {
        let (_, transactions) = january_data();
        let spend = monthly_debits_by_category(&transactions, date(2024, 1, 15));
        assert_eq!(spend.get("food"), Some(&200.0));
        assert_eq!(spend.get("rent"), Some(&250.0));
        assert_eq!(spend.get("fun"), Some(&75.0));
        assert_eq!(spend.len(), 3);
    }

    #[test]
    fn test_same_month_previous_year_excluded() {
        let txs = vec![transaction("t1", date(2023, 1, 15), -10.0, "food")];
        assert!(monthly_debits_by_category(&txs, date(2024, 1, 15)).is_empty());
    }

    #[test]
    fn test_budget_periods_cover_month() {
        let spend = BTreeMap::from([("food".to_string(), 600.0)]);
        let periods = budget_periods(&[budget("food", 500.0), budget("gas", 100.0)], &spend, date(2024, 2, 10));

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start_date, date(2024, 2, 1));
        assert_eq!(periods[0].end_date, date(2024, 2, 29));
        assert!(periods[0].is_over_budget);
        assert_eq!(periods[1].spent_amount, 0.0);
        assert_eq!(periods[0].id, "budget-food-2024-02");
    }

    #[test]
    fn test_month_bounds_december() {
        assert_eq!(
            month_bounds(date(2023, 12, 31)),
            (date(2023, 12, 1), date(2023, 12, 31))
        );
    }

    #[tokio::test]
    async fn test_recompute_pipeline() {
        let ctl = controller();
        let (budgets, transactions) = january_data();
        let snapshot = ctl.recompute(&budgets, &transactions);

        assert!((snapshot.status.percentage - 56.25).abs() < 1e-9);
        assert_eq!(snapshot.status.status, HealthStatus::Good);
        assert_eq!(snapshot.icon_variant, AppIconVariant::Good);
        assert_eq!(snapshot.theme.primary, smooth_color(56.25));
        assert_eq!(snapshot.theme.accent, snapshot.theme.primary);
        assert_eq!(snapshot.periods.len(), 2);
        assert_eq!(ctl.snapshot(), snapshot);
    }

    #[test]
    fn test_initial_snapshot_has_no_budgets() {
        let ctl = controller();
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.status.status, HealthStatus::Good);
        assert!(snapshot.status.description.contains("No active budgets"));
        assert!(!ctl.is_transitioning());
    }

    #[test]
    fn test_without_runtime_flag_clears_immediately() {
        let ctl = controller();
        let (budgets, transactions) = january_data();
        ctl.recompute(&budgets, &transactions);
        assert!(!ctl.is_transitioning());
    }

    #[tokio::test]
    async fn test_feed_changes_trigger_recompute() {
        let ctl = controller();
        let feed = BudgetFeed::new();
        let mut rx = ctl.subscribe();

        ctl.attach(&feed);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        feed.set_budgets(vec![budget("food", 100.0)]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status.percentage, 0.0);

        feed.set_transactions(vec![transaction("t1", date(2024, 1, 2), -105.0, "food")]);
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.status.status, HealthStatus::Danger);
        assert_eq!(snapshot.icon_variant, AppIconVariant::Danger);
    }

    #[test]
    fn test_feed_listeners_and_unsubscribe() {
        let feed = BudgetFeed::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = feed.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        feed.replace(vec![budget("food", 1.0)], Vec::new());
        feed.set_transactions(Vec::new());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(feed.unsubscribe(id));
        assert!(!feed.unsubscribe(id));
        feed.set_budgets(Vec::new());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(feed.snapshot().budgets.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_flag_clears_after_window() {
        let ctl = controller();
        let (budgets, transactions) = january_data();

        ctl.recompute(&budgets, &transactions);
        assert!(ctl.is_transitioning());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(ctl.is_transitioning());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!ctl.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_transitions_extend_window() {
        let ctl = controller();
        let (budgets, transactions) = january_data();

        ctl.recompute(&budgets, &transactions);
        tokio::time::sleep(Duration::from_millis(200)).await;
        ctl.recompute(&budgets, &transactions);

        // First window expired at 300ms, second runs until 500ms
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(ctl.is_transitioning());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!ctl.is_transitioning());
    }
}
