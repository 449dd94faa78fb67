use crate::routes::{batch_start_target, batch_toggle_target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCheckbox {
    pub name: String,
    pub checked: bool,
}

/// A bulk action control: enabled with a target, or disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchControl {
    pub target: Option<String>,
}

impl BatchControl {
    pub fn enabled(&self) -> bool {
        self.target.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchControls {
    pub start: BatchControl,
    pub toggle: BatchControl,
}

/// Table-view checkbox state. The selection set is never stored; it is
/// recomputed from the checkboxes on every query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSelection {
    rows: Vec<RowCheckbox>,
    master: bool,
}

impl BatchSelection {
    pub fn register(&mut self, name: &str) {
        if !self.rows.iter().any(|row| row.name == name) {
            self.rows.push(RowCheckbox {
                name: name.to_string(),
                checked: false,
            });
        }
    }

    /// Returns `false` when no row belongs to `name`.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.rows.iter_mut().find(|row| row.name == name) {
            Some(row) => {
                row.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Master checkbox: every row follows it.
    pub fn set_all(&mut self, checked: bool) {
        self.master = checked;
        for row in &mut self.rows {
            row.checked = checked;
        }
    }

    pub fn master(&self) -> bool {
        self.master
    }

    pub fn rows(&self) -> &[RowCheckbox] {
        &self.rows
    }

    /// Checked names in row order.
    pub fn selected(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| row.name.as_str())
            .collect()
    }

    pub fn controls(&self) -> BatchControls {
        let selected = self.selected();
        if selected.is_empty() {
            return BatchControls::default();
        }
        BatchControls {
            start: BatchControl {
                target: Some(batch_start_target(&selected)),
            },
            toggle: BatchControl {
                target: Some(batch_toggle_target(&selected)),
            },
        }
    }
}
