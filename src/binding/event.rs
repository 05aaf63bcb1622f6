// Change events and the observer bus
//
// Observers do not mutate a shared cancel flag. Each one returns a Verdict and
// the bus folds them in registration order: a Commit hands its (possibly
// altered) value to the next observer, the first Reject ends the fold.

use super::field::{ConfigField, ConfigSection, FieldValue};

/// A proposed change to one config field
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeConfigEvent {
    field: ConfigField,
    new_value: FieldValue,
    old_value: FieldValue,
}

impl ChangeConfigEvent {
    pub fn new(field: ConfigField, new_value: FieldValue, old_value: FieldValue) -> Self {
        Self {
            field,
            new_value,
            old_value,
        }
    }

    pub fn field(&self) -> ConfigField {
        self.field
    }

    /// Owning config object of the changed field
    pub fn target(&self) -> ConfigSection {
        self.field.section()
    }

    pub fn key(&self) -> &'static str {
        self.field.name()
    }

    pub fn new_value(&self) -> &FieldValue {
        &self.new_value
    }

    pub fn old_value(&self) -> &FieldValue {
        &self.old_value
    }

    fn with_value(self, new_value: FieldValue) -> Self {
        Self { new_value, ..self }
    }
}

/// An observer's decision about a proposed change
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Let the change through with this value
    Commit(FieldValue),
    /// Block the change; the control reverts to the old value
    Reject(String),
}

impl Verdict {
    /// Commit the event's value unchanged
    pub fn pass(event: &ChangeConfigEvent) -> Self {
        Verdict::Commit(event.new_value().clone())
    }
}

/// Receives every proposed config change before it is written
pub trait ConfigObserver {
    fn on_config_changed(&self, event: &ChangeConfigEvent) -> Verdict;
}

impl<F> ConfigObserver for F
where
    F: Fn(&ChangeConfigEvent) -> Verdict,
{
    fn on_config_changed(&self, event: &ChangeConfigEvent) -> Verdict {
        self(event)
    }
}

/// Ordered registry of config observers.
///
/// Dispatch is synchronous on the calling (UI) thread.
#[derive(Default)]
pub struct ConfigEventBus {
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl ConfigEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<O>(&mut self, observer: O)
    where
        O: ConfigObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Fold the event through every observer in registration order
    pub fn dispatch(&self, event: ChangeConfigEvent) -> Verdict {
        let mut event = event;

        for (index, observer) in self.observers.iter().enumerate() {
            match observer.on_config_changed(&event) {
                Verdict::Commit(value) => event = event.with_value(value),
                Verdict::Reject(reason) => {
                    tracing::debug!(
                        "Change to {} rejected by observer #{}: {}",
                        event.field(),
                        index,
                        reason
                    );
                    return Verdict::Reject(reason);
                }
            }
        }

        Verdict::Commit(event.new_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn theme_event(new: &str) -> ChangeConfigEvent {
        ChangeConfigEvent::new(
            ConfigField::Theme,
            FieldValue::Text(new.to_string()),
            FieldValue::Text("dark".to_string()),
        )
    }

    #[test]
    fn test_empty_bus_commits_proposed_value() {
        let bus = ConfigEventBus::new();
        assert!(bus.is_empty());
        assert_eq!(
            bus.dispatch(theme_event("light")),
            Verdict::Commit(FieldValue::Text("light".to_string()))
        );
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ConfigEventBus::new();

        for id in 0..3 {
            let order = Rc::clone(&order);
            bus.register(move |event: &ChangeConfigEvent| {
                order.borrow_mut().push(id);
                Verdict::pass(event)
            });
        }

        bus.dispatch(theme_event("light"));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_altered_value_reaches_next_observer() {
        let seen = Rc::new(RefCell::new(None));
        let mut bus = ConfigEventBus::new();

        bus.register(|_: &ChangeConfigEvent| {
            Verdict::Commit(FieldValue::Text("unset".to_string()))
        });
        let seen_clone = Rc::clone(&seen);
        bus.register(move |event: &ChangeConfigEvent| {
            *seen_clone.borrow_mut() = Some(event.new_value().clone());
            Verdict::pass(event)
        });

        let verdict = bus.dispatch(theme_event("light"));

        assert_eq!(verdict, Verdict::Commit(FieldValue::Text("unset".to_string())));
        assert_eq!(*seen.borrow(), Some(FieldValue::Text("unset".to_string())));
    }

    #[test]
    fn test_reject_stops_fold() {
        let reached = Rc::new(RefCell::new(false));
        let mut bus = ConfigEventBus::new();

        bus.register(|_: &ChangeConfigEvent| Verdict::Reject("nope".to_string()));
        let reached_clone = Rc::clone(&reached);
        bus.register(move |event: &ChangeConfigEvent| {
            *reached_clone.borrow_mut() = true;
            Verdict::pass(event)
        });

        assert_eq!(
            bus.dispatch(theme_event("light")),
            Verdict::Reject("nope".to_string())
        );
        assert!(!*reached.borrow());
    }
}
