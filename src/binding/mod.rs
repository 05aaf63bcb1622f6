//! Auto-saving bindings between settings controls and config fields.
//!
//! A [`Binding`] owns one control and the [`ConfigField`] it mirrors. When the
//! control commits a value the binding:
//!
//! 1. runs the optional hook with an [`AutoSave`] wrapper (alter or revert)
//! 2. logs the attempted change
//! 3. folds a [`ChangeConfigEvent`] through the observers of the [`SettingsStore`]
//! 4. writes the folded value and saves the config, or redisplays the old value
//!    when an observer rejected the change
//!
//! Everything runs on the UI thread; there is no locking here.

pub mod control;
pub mod event;
pub mod field;

pub use control::{CheckBox, ChoiceItem, ComboBox, Control, Slider, Spinner, TextField};
pub use event::{ChangeConfigEvent, ConfigEventBus, ConfigObserver, Verdict};
pub use field::{BindingError, ConfigField, ConfigSection, FieldValue, ValueKind};

use crate::config::ConfigManager;
use crate::models::LauncherConfig;
use thiserror::Error;

/// Non-fatal problems after a change was committed
#[derive(Error, Debug)]
pub enum PersistenceWarning {
    #[error("Failed to save launcher config: {0:#}")]
    Save(anyhow::Error),

    #[error("Failed to refresh control for {field}: {source}")]
    Display {
        field: ConfigField,
        source: BindingError,
    },
}

/// Result of a user interaction with a bound control
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// The interaction did not commit (keystroke, drag tick)
    Pending,
    /// The committed value equals the field's current value
    Unchanged,
    /// The field now holds this value
    Committed(FieldValue),
    /// An observer blocked the change; field and control keep the old value
    Rejected(String),
}

/// Mutable view of a pending change handed to a binding's hook
#[derive(Debug, Clone)]
pub struct AutoSave {
    field: ConfigField,
    value: FieldValue,
    old_value: FieldValue,
}

impl AutoSave {
    fn new(field: ConfigField, value: FieldValue, old_value: FieldValue) -> Self {
        Self {
            field,
            value,
            old_value,
        }
    }

    pub fn field(&self) -> ConfigField {
        self.field
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn old_value(&self) -> &FieldValue {
        &self.old_value
    }

    pub fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }

    /// Drop the edit and keep the field's current value
    pub fn revert(&mut self) {
        self.value = self.old_value.clone();
    }
}

/// Hook run on every committed edit before observers see it
pub type ChangeHook = Box<dyn FnMut(&mut AutoSave)>;

/// The live configuration, its observers and where it is saved
pub struct SettingsStore {
    config: LauncherConfig,
    bus: ConfigEventBus,
    persistence: Option<ConfigManager>,
}

impl SettingsStore {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config,
            bus: ConfigEventBus::new(),
            persistence: None,
        }
    }

    /// Save the config through `manager` after every committed change
    pub fn with_persistence(mut self, manager: ConfigManager) -> Self {
        self.persistence = Some(manager);
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn register<O>(&mut self, observer: O)
    where
        O: ConfigObserver + 'static,
    {
        self.bus.register(observer);
    }

    /// Dispatch a change and write it if no observer rejects it.
    ///
    /// Returns the value now stored in the field, or the rejection reason.
    pub fn apply(&mut self, event: ChangeConfigEvent) -> Result<FieldValue, String> {
        let field = event.field();

        let value = match self.bus.dispatch(event) {
            Verdict::Commit(value) => value,
            Verdict::Reject(reason) => return Err(reason),
        };

        if let Err(e) = field.set(&mut self.config, value.clone()) {
            tracing::error!("Observer produced an unusable value for {}: {}", field, e);
            return Err(e.to_string());
        }

        self.persist();
        Ok(value)
    }

    /// Overwrite a field with a value a control can show, without notifying
    /// observers. Used when the loaded config holds a value outside a
    /// control's bounds.
    pub fn correct(&mut self, field: ConfigField, value: FieldValue) -> Result<(), BindingError> {
        field.set(&mut self.config, value)?;
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        if let Some(manager) = &self.persistence {
            if let Err(e) = manager.save_config(&self.config) {
                tracing::warn!("{}", PersistenceWarning::Save(e));
            }
        }
    }
}

/// A control kept in sync with one config field
pub struct Binding<C: Control> {
    field: ConfigField,
    control: C,
    hook: Option<ChangeHook>,
}

impl<C: Control> Binding<C> {
    /// Bind `control` to `field`, showing the field's current value.
    ///
    /// Fails when the control cannot display the field's kind of value.
    pub fn bind(
        mut control: C,
        field: ConfigField,
        config: &LauncherConfig,
    ) -> Result<Self, BindingError> {
        if !control.accepts(field.kind()) {
            return Err(BindingError::TypeMismatch {
                field: field.path(),
                expected: field.kind(),
                found: control.value().kind(),
            });
        }

        control.display(&field.get(config))?;

        Ok(Self {
            field,
            control,
            hook: None,
        })
    }

    /// Install a hook that may alter or revert each committed value
    pub fn with_hook(mut self, hook: impl FnMut(&mut AutoSave) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn field(&self) -> ConfigField {
        self.field
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Perform a user action on the control and handle any commit it makes.
    ///
    /// ```ignore
    /// binding.interact(&mut store, |text| {
    ///     text.type_text("https://api.example.com");
    ///     text.focus_lost()
    /// });
    /// ```
    pub fn interact<F>(&mut self, store: &mut SettingsStore, action: F) -> ChangeOutcome
    where
        F: FnOnce(&mut C) -> Option<FieldValue>,
    {
        match action(&mut self.control) {
            Some(proposed) => self.commit(store, proposed),
            None => ChangeOutcome::Pending,
        }
    }

    fn commit(&mut self, store: &mut SettingsStore, proposed: FieldValue) -> ChangeOutcome {
        let old_value = self.field.get(store.config());

        let mut auto_save = AutoSave::new(self.field, proposed, old_value.clone());
        if let Some(hook) = self.hook.as_mut() {
            hook(&mut auto_save);
        }
        let value = auto_save.value;

        tracing::debug!(
            "Saving {} (key={}, value={})",
            self.field.section().type_name(),
            self.field.name(),
            value
        );

        if value == old_value {
            self.redisplay(&old_value);
            return ChangeOutcome::Unchanged;
        }

        let event = ChangeConfigEvent::new(self.field, value, old_value.clone());
        match store.apply(event) {
            Ok(stored) => {
                self.redisplay(&stored);
                ChangeOutcome::Committed(stored)
            }
            Err(reason) => {
                tracing::info!("Change to {} rolled back: {}", self.field, reason);
                self.redisplay(&old_value);
                ChangeOutcome::Rejected(reason)
            }
        }
    }

    fn redisplay(&mut self, value: &FieldValue) {
        if let Err(source) = self.control.display(value) {
            tracing::warn!(
                "{}",
                PersistenceWarning::Display {
                    field: self.field,
                    source,
                }
            );
        }
    }
}
