//! Value models behind the small panel widgets. Drawing lives with the
//! renderer; these keep the state and enforce the limits.

pub const DEFAULT_MIN_VALUE: f64 = -2e9;
pub const DEFAULT_MAX_VALUE: f64 = 2e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Double,
}

pub struct NumberEdit {
    kind: NumberKind,
    value: f64,
    min_value: f64,
    max_value: f64,
    decimal_digits: Option<usize>,
    on_value_changed: Option<Box<dyn FnMut(f64)>>,
}

impl NumberEdit {
    pub fn new(kind: NumberKind) -> Self {
        Self {
            kind,
            value: 0.0,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            decimal_digits: None,
            on_value_changed: None,
        }
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    pub fn int_value(&self) -> i64 {
        self.value as i64
    }

    pub fn double_value(&self) -> f64 {
        self.value
    }

    fn coerce(&self, v: f64) -> f64 {
        match self.kind {
            NumberKind::Int => v.round(),
            NumberKind::Double => v,
        }
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = self.coerce(value);
    }

    pub fn minimum_value(&self) -> f64 {
        self.min_value
    }

    pub fn maximum_value(&self) -> f64 {
        self.max_value
    }

    /// Sets the allowed range and pulls the current value into it.
    pub fn set_limits(&mut self, min_value: f64, max_value: f64) {
        self.min_value = self.coerce(min_value);
        self.max_value = self.coerce(max_value);
        self.value = self.value.max(self.min_value).min(self.max_value);
    }

    pub fn set_decimal_precision(&mut self, digits: Option<usize>) {
        self.decimal_digits = digits;
    }

    /// Text shown in the field. Without an explicit precision, doubles get
    /// fewer decimals as they grow.
    pub fn display_text(&self) -> String {
        if self.kind == NumberKind::Int {
            return format!("{}", self.int_value());
        }
        let digits = self.decimal_digits.unwrap_or(if self.value < 10.0 {
            3
        } else if self.value < 100.0 {
            2
        } else if self.value < 1000.0 {
            1
        } else {
            0
        });
        format!("{:.*}", digits, self.value)
    }

    pub fn set_on_value_changed<F>(&mut self, on_changed: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.on_value_changed = Some(Box::new(on_changed));
    }

    /// Finishes an edit: stores the value and notifies the listener.
    pub fn commit(&mut self, value: f64) {
        self.set_value(value);
        let value = self.value;
        if let Some(on_changed) = self.on_value_changed.as_mut() {
            on_changed(value);
        }
    }
}

#[derive(Default)]
pub struct ListView {
    items: Vec<String>,
    selected_index: Option<usize>,
    on_value_changed: Option<Box<dyn FnMut(&str, bool)>>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected_index = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn set_selected_index(&mut self, index: usize) {
        self.selected_index = if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        };
    }

    pub fn selected_value(&self) -> &str {
        self.selected_index
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_on_value_changed<F>(&mut self, on_changed: F)
    where
        F: FnMut(&str, bool) + 'static,
    {
        self.on_value_changed = Some(Box::new(on_changed));
    }

    /// A click on row `index`. Fires the listener when the selection moved or
    /// on a double click.
    pub fn click(&mut self, index: usize, is_double_click: bool) {
        let before = self.selected_index;
        self.set_selected_index(index);
        if before == self.selected_index && !is_double_click {
            return;
        }
        let value = self.selected_value().to_string();
        if let Some(on_changed) = self.on_value_changed.as_mut() {
            on_changed(&value, is_double_click);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressBar {
    value: f32,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0.0 is not started, 1.0 is complete.
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}
