//! Typed publish/subscribe for dashboard events

use std::any::TypeId;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Dashboard-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events emitted by the coordinator
pub mod events {
    use super::Event;

    /// A dataset was loaded and installed
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub record_count: usize,
        pub column_count: usize,
    }

    /// Loading failed and the dashboard is in the "no data" state
    #[derive(Debug, Clone)]
    pub struct DatasetUnavailable {
        pub source_name: String,
        pub error: String,
    }

    /// Criteria changed and the filtered set was recomputed
    #[derive(Debug, Clone)]
    pub struct FiltersChanged {
        pub filtered_count: usize,
    }

    /// A record was selected, or the selection was cleared
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub name: Option<String>,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(DatasetLoaded, DatasetUnavailable, FiltersChanged, SelectionChanged);
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of type `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let mut handlers = self.handlers.lock();
        handlers.entry(TypeId::of::<E>()).or_default().push(handler);
    }

    /// Publish an event to the handlers subscribed to its type
    ///
    /// Handlers run without the lock held, so they may publish or subscribe.
    /// A nested publish of the same event type skips the handlers that are
    /// currently running.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let mut running = match self.handlers.lock().get_mut(&type_id) {
            Some(event_handlers) => std::mem::take(event_handlers),
            None => return,
        };

        for handler in running.iter_mut() {
            handler.handle(&event);
        }

        let mut handlers = self.handlers.lock();
        let event_handlers = handlers.entry(type_id).or_default();
        // Handlers subscribed during dispatch go after the existing ones
        running.append(event_handlers);
        *event_handlers = running;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler backed by a closure
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{FiltersChanged, SelectionChanged};
    use super::*;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<FiltersChanged>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<FiltersChanged>() {
                sink.lock().push(e.filtered_count);
            }
        }));

        bus.publish(FiltersChanged { filtered_count: 7 });
        bus.publish(SelectionChanged { name: None });
        bus.publish(FiltersChanged { filtered_count: 2 });

        assert_eq!(*seen.lock(), vec![7, 2]);
    }

    #[test]
    fn test_handlers_may_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner_bus = bus.clone();
        let sink = seen.clone();
        bus.subscribe::<FiltersChanged>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<FiltersChanged>() {
                sink.lock().push(format!("filters {}", e.filtered_count));
                inner_bus.publish(SelectionChanged { name: None });
                inner_bus.subscribe::<FiltersChanged>(handler_from_fn(|_| {}));
            }
        }));

        let sink = seen.clone();
        bus.subscribe::<SelectionChanged>(handler_from_fn(move |_| {
            sink.lock().push("selection".to_string());
        }));

        bus.publish(FiltersChanged { filtered_count: 3 });
        bus.publish(FiltersChanged { filtered_count: 1 });

        assert_eq!(
            *seen.lock(),
            vec!["filters 3", "selection", "filters 1", "selection"]
        );
        assert_eq!(bus.handlers.lock()[&TypeId::of::<FiltersChanged>()].len(), 3);
    }
}
