// Headless settings controls
//
// Each control keeps the value it displays and decides when a user action is a
// commit. User-action methods return Some(value) only for a commit; anything
// else (a keystroke, a drag tick) returns None.

use super::field::{BindingError, FieldValue, ValueKind};
use crate::models::Language;

/// A control that can display a config field's value
pub trait Control {
    /// Whether this control can display values of the given kind
    fn accepts(&self, kind: ValueKind) -> bool;

    /// Show a value without committing anything
    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError>;

    /// The value currently shown
    fn value(&self) -> FieldValue;
}

fn out_of_range(value: i64) -> BindingError {
    BindingError::OutOfRange {
        field: "control",
        value,
    }
}

fn wrong_kind(expected: ValueKind, value: &FieldValue) -> BindingError {
    BindingError::TypeMismatch {
        field: "control",
        expected,
        found: value.kind(),
    }
}

/// Single-line text input, committed on focus loss or submit
#[derive(Debug, Clone, Default)]
pub struct TextField {
    text: String,
    committed: String,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the edit buffer. Keystrokes never commit.
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn focus_lost(&mut self) -> Option<FieldValue> {
        self.take_edit()
    }

    /// Enter pressed
    pub fn submit(&mut self) -> Option<FieldValue> {
        self.take_edit()
    }

    fn take_edit(&mut self) -> Option<FieldValue> {
        if self.text == self.committed {
            return None;
        }
        self.committed = self.text.clone();
        Some(FieldValue::Text(self.text.clone()))
    }
}

impl Control for TextField {
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Text
    }

    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError> {
        match value {
            FieldValue::Text(text) => {
                self.text = text.clone();
                self.committed = text.clone();
                Ok(())
            }
            other => Err(wrong_kind(ValueKind::Text, other)),
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.text.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    label: String,
    checked: bool,
}

impl CheckBox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Toggle the box; commits immediately
    pub fn click(&mut self) -> Option<FieldValue> {
        self.checked = !self.checked;
        Some(FieldValue::Flag(self.checked))
    }
}

impl Control for CheckBox {
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Flag
    }

    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError> {
        match value {
            FieldValue::Flag(flag) => {
                self.checked = *flag;
                Ok(())
            }
            other => Err(wrong_kind(ValueKind::Flag, other)),
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Flag(self.checked)
    }
}

/// Numeric spinner with inclusive bounds.
///
/// Requested values outside `[min, max]` are clamped to the nearest bound.
/// Displaying an out-of-bounds value is an error.
#[derive(Debug, Clone)]
pub struct Spinner {
    value: i64,
    min: i64,
    max: i64,
    step: i64,
}

impl Spinner {
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        Self {
            value: min,
            min,
            max,
            step: step.max(1),
        }
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    pub fn current(&self) -> i64 {
        self.value
    }

    /// Commits immediately when the clamped value differs from the shown one
    pub fn set_value(&mut self, requested: i64) -> Option<FieldValue> {
        let clamped = requested.clamp(self.min, self.max);
        if clamped == self.value {
            return None;
        }
        self.value = clamped;
        Some(FieldValue::Integer(clamped))
    }

    pub fn step_up(&mut self) -> Option<FieldValue> {
        self.set_value(self.value.saturating_add(self.step))
    }

    pub fn step_down(&mut self) -> Option<FieldValue> {
        self.set_value(self.value.saturating_sub(self.step))
    }
}

impl Control for Spinner {
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Integer
    }

    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError> {
        match value {
            FieldValue::Integer(value) if !(self.min..=self.max).contains(value) => {
                Err(out_of_range(*value))
            }
            FieldValue::Integer(value) => {
                self.value = *value;
                Ok(())
            }
            other => Err(wrong_kind(ValueKind::Integer, other)),
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Integer(self.value)
    }
}

/// Continuous slider with a value label.
///
/// Dragging only moves the knob and refreshes the label; the value is
/// committed when the knob is released.
pub struct Slider {
    value: i64,
    min: i64,
    max: i64,
    adjusting: bool,
    label: String,
    format_label: Box<dyn Fn(i64) -> String>,
}

impl Slider {
    pub fn new(min: i64, max: i64, format_label: impl Fn(i64) -> String + 'static) -> Self {
        let label = format_label(min);
        Self {
            value: min,
            min,
            max,
            adjusting: false,
            label,
            format_label: Box::new(format_label),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    pub fn current(&self) -> i64 {
        self.value
    }

    pub fn drag_to(&mut self, value: i64) -> Option<FieldValue> {
        self.adjusting = true;
        self.move_knob(value);
        None
    }

    pub fn release(&mut self) -> Option<FieldValue> {
        if !self.adjusting {
            return None;
        }
        self.adjusting = false;
        Some(FieldValue::Integer(self.value))
    }

    fn move_knob(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
        self.label = (self.format_label)(self.value);
    }
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("adjusting", &self.adjusting)
            .field("label", &self.label)
            .finish()
    }
}

impl Control for Slider {
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Integer
    }

    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError> {
        match value {
            FieldValue::Integer(value) if !(self.min..=self.max).contains(value) => {
                Err(out_of_range(*value))
            }
            FieldValue::Integer(value) => {
                self.adjusting = false;
                self.move_knob(*value);
                Ok(())
            }
            other => Err(wrong_kind(ValueKind::Integer, other)),
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Integer(self.value)
    }
}

/// Item type of a [`ComboBox`]
pub trait ChoiceItem: Clone + PartialEq {
    const KIND: ValueKind;

    fn to_value(&self) -> FieldValue;

    fn from_value(value: &FieldValue) -> Option<Self>;

    /// Stable identifier used when a choice is made by name
    fn key(&self) -> String;

    fn label(&self) -> String;
}

impl ChoiceItem for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }

    fn key(&self) -> String {
        self.clone()
    }

    fn label(&self) -> String {
        self.clone()
    }
}

impl ChoiceItem for Language {
    const KIND: ValueKind = ValueKind::Language;

    fn to_value(&self) -> FieldValue {
        FieldValue::Language(*self)
    }

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Language(lang) => Some(*lang),
            _ => None,
        }
    }

    fn key(&self) -> String {
        self.code().to_string()
    }

    fn label(&self) -> String {
        self.display_name().to_string()
    }
}

/// Drop-down choice, committed as soon as a different item is selected.
///
/// Selection is tracked by position and matched by item equality, so items
/// sharing a label stay distinct.
#[derive(Debug, Clone)]
pub struct ComboBox<T: ChoiceItem> {
    items: Vec<T>,
    selected: Option<usize>,
}

impl<T: ChoiceItem> ComboBox<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|index| self.items.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> Option<FieldValue> {
        if index >= self.items.len() || self.selected == Some(index) {
            return None;
        }
        self.selected = Some(index);
        Some(self.items[index].to_value())
    }

    /// Select by [`ChoiceItem::key`]
    pub fn select_key(&mut self, key: &str) -> Option<FieldValue> {
        let index = self.items.iter().position(|item| item.key() == key)?;
        self.select(index)
    }
}

impl<T: ChoiceItem> Control for ComboBox<T> {
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == T::KIND
    }

    fn display(&mut self, value: &FieldValue) -> Result<(), BindingError> {
        let target = T::from_value(value).ok_or_else(|| wrong_kind(T::KIND, value))?;
        let index = self
            .items
            .iter()
            .position(|item| *item == target)
            .ok_or_else(|| BindingError::NotInChoices {
                field: "choice",
                value: value.to_string(),
            })?;
        self.selected = Some(index);
        Ok(())
    }

    fn value(&self) -> FieldValue {
        match self.selected() {
            Some(item) => item.to_value(),
            None => match T::KIND {
                ValueKind::Language => FieldValue::Language(Language::default()),
                _ => FieldValue::Text(String::new()),
            },
        }
    }
}
