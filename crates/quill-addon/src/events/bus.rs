//! Event bus — addons register listeners by event name with priority
//! ordering; the core triggers events and passes a mutable context.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use quill_core::AppError;

use super::context::EventContext;

/// Default listener priority (lower runs first).
pub const DEFAULT_PRIORITY: i32 = 10;

/// Trait for event listener implementations.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Handles one trigger. Mutations to the context are observed by
    /// listeners that run later in the same trigger.
    async fn handle(&self, ctx: &mut EventContext) -> Result<(), AppError>;
}

/// A closure-based listener for quick registration of synchronous work.
pub struct FnListener {
    f: Box<dyn Fn(&mut EventContext) -> Result<(), AppError> + Send + Sync>,
}

impl FnListener {
    /// Wraps a closure into an `Arc<dyn EventListener>`.
    pub fn wrap<F>(f: F) -> Arc<dyn EventListener>
    where
        F: Fn(&mut EventContext) -> Result<(), AppError> + Send + Sync + 'static,
    {
        Arc::new(Self { f: Box::new(f) })
    }
}

#[async_trait]
impl EventListener for FnListener {
    async fn handle(&self, ctx: &mut EventContext) -> Result<(), AppError> {
        (self.f)(ctx)
    }
}

/// Entry in the event bus.
struct ListenerEntry {
    /// The listener.
    listener: Arc<dyn EventListener>,
    /// Priority (lower = earlier execution).
    priority: i32,
    /// Addon that registered this listener.
    registered_by: String,
    /// Registration order, breaks priority ties.
    seq: u64,
}

/// Registry of event listeners organized by event name.
///
/// Built fresh for each request during the addon load phase; triggering
/// only needs `&self`, so handlers may fire events mid-dispatch.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<String, Vec<ListenerEntry>>,
    next_seq: u64,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for an event name.
    pub fn on(
        &mut self,
        event: &str,
        priority: i32,
        registered_by: &str,
        listener: Arc<dyn EventListener>,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let entries = self.listeners.entry(event.to_string()).or_default();
        entries.push(ListenerEntry {
            listener,
            priority,
            registered_by: registered_by.to_string(),
            seq,
        });
        entries.sort_by_key(|e| (e.priority, e.seq));

        debug!(
            event = %event,
            addon = %registered_by,
            priority = priority,
            "Event listener registered"
        );
    }

    /// Triggers an event, invoking every listener in priority order.
    ///
    /// A listener that fails is logged and skipped; remaining listeners
    /// still run and the error never propagates to the caller. An event
    /// with zero listeners is a no-op.
    pub async fn trigger(&self, event: &str, ctx: &mut EventContext) {
        let Some(entries) = self.listeners.get(event) else {
            return;
        };

        for entry in entries {
            if let Err(e) = entry.listener.handle(ctx).await {
                error!(
                    event = %event,
                    addon = %entry.registered_by,
                    error = %e,
                    "Event listener failed; continuing with remaining listeners"
                );
            }
        }
    }

    /// Removes every listener registered by the given addon.
    ///
    /// Idempotent; returns the number of listeners removed.
    pub fn unregister_by(&mut self, registered_by: &str) -> usize {
        let mut removed = 0;
        for entries in self.listeners.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.registered_by != registered_by);
            removed += before - entries.len();
        }
        self.listeners.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Returns whether any listeners are registered for an event.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners
            .get(event)
            .map(|entries| !entries.is_empty())
            .unwrap_or(false)
    }

    /// Returns the number of listeners registered for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map(Vec::len).unwrap_or(0)
    }
}
