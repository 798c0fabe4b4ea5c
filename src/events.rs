//! Typed event channel between the chart and its host.
//!
//! The chart never calls back into host code directly. It publishes
//! [`ChartEvent`]s on an [`EventBus`] and the host subscribes to the
//! categories it cares about.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ProjectTask, ViewportState};

/// Output formats a user can ask for. Serialization lives outside the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
    Excel,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Svg,
        ExportFormat::Png,
        ExportFormat::Excel,
        ExportFormat::Csv,
        ExportFormat::Json,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Svg => "SVG",
            ExportFormat::Png => "PNG",
            ExportFormat::Excel => "Excel",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// Everything the chart reports to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// A drag produced a new version of a task. Always the whole record.
    TaskUpdated(ProjectTask),
    /// A drag gesture ended.
    DragFinished(Uuid),
    TaskSelected(Uuid),
    SelectionCleared,
    EditRequested(Uuid),
    DeleteRequested(Uuid),
    ExportRequested(ExportFormat),
    ViewportChanged(ViewportState),
}

/// Coarse grouping used for subscription filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Mutation,
    Selection,
    Intent,
    View,
}

impl ChartEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            ChartEvent::TaskUpdated(_) | ChartEvent::DragFinished(_) => EventCategory::Mutation,
            ChartEvent::TaskSelected(_) | ChartEvent::SelectionCleared => EventCategory::Selection,
            ChartEvent::EditRequested(_)
            | ChartEvent::DeleteRequested(_)
            | ChartEvent::ExportRequested(_) => EventCategory::Intent,
            ChartEvent::ViewportChanged(_) => EventCategory::View,
        }
    }
}

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Which events a subscriber receives.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &ChartEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(&ChartEvent) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct EventBusConfig {
    pub enable_history: bool,
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 256,
        }
    }
}

/// Synchronous publish/subscribe hub.
///
/// Handlers run on the publishing thread in no particular order and must
/// not subscribe or unsubscribe from inside the callback.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    history: Arc<RwLock<VecDeque<ChartEvent>>>,
    config: EventBusConfig,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Deliver `event` to every matching handler. Returns how many ran.
    pub fn publish(&self, event: ChartEvent) -> usize {
        if self.config.enable_history {
            let mut history = self.history.write();
            history.push_back(event.clone());
            while history.len() > self.config.max_history_size {
                history.pop_front();
            }
        }

        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(&event);
                delivered += 1;
            }
        }
        tracing::trace!(?event, delivered, "event published");
        delivered
    }

    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&ChartEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Subscribe with a queue the host drains on its own schedule, e.g. once
    /// per UI frame.
    pub fn subscribe_queue(&self, filter: EventFilter) -> (SubscriptionId, EventQueue) {
        let queue = EventQueue::default();
        let sink = queue.clone();
        let id = self.subscribe(filter, move |event| sink.push(event.clone()));
        (id, queue)
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Recorded events, oldest first. Empty unless history is enabled.
    pub fn history(&self) -> Vec<ChartEvent> {
        self.history.read().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.write().clear();
    }
}

/// Shared FIFO filled by a bus subscription.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<parking_lot::Mutex<VecDeque<ChartEvent>>>,
}

impl EventQueue {
    fn push(&self, event: ChartEvent) {
        self.inner.lock().push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<ChartEvent> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn filtered_subscribers_only_see_their_categories() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Intent]),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        assert_eq!(bus.publish(ChartEvent::SelectionCleared), 0);
        assert_eq!(bus.publish(ChartEvent::ExportRequested(ExportFormat::Png)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (id, queue) = bus.subscribe_queue(EventFilter::All);
        bus.publish(ChartEvent::SelectionCleared);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(ChartEvent::SelectionCleared);
        assert_eq!(queue.drain(), vec![ChartEvent::SelectionCleared]);
        assert!(queue.is_empty());
    }

    #[test]
    fn history_is_bounded() {
        let bus = EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 2,
        });
        let a = Uuid::new_v4();
        bus.publish(ChartEvent::TaskSelected(a));
        bus.publish(ChartEvent::EditRequested(a));
        bus.publish(ChartEvent::DeleteRequested(a));
        assert_eq!(
            bus.history(),
            vec![ChartEvent::EditRequested(a), ChartEvent::DeleteRequested(a)]
        );
        bus.clear_history();
        assert!(bus.history().is_empty());
    }
}
