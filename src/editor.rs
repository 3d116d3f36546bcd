use anyhow::Result;

use crate::model::{ArgEdit, CommandSpec};
use crate::store::CommandStore;

/// Which single field is under edit. At most one selection is active;
/// every edit session must close before another opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    EditingCommand,
    EditingArgument(usize),
    CreatingArgument,
}

/// One edit session: the active selection plus a working copy of the
/// text under edit. The working value is seeded on open and discarded
/// on submit, cancel, or removal of the field being edited.
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    value: String,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Closed,
            value: String::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != EditorState::Closed
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: String) {
        self.value = value;
    }

    /// Closed -> EditingCommand, seeded with the current base. A no-op
    /// while another session is open.
    pub fn open_command(&mut self, spec: &CommandSpec) {
        if self.is_open() {
            return;
        }
        self.state = EditorState::EditingCommand;
        self.value = spec.base.clone();
    }

    /// Closed -> EditingArgument(index), seeded with `args[index]`.
    /// The index must be valid at selection time.
    pub fn open_argument(&mut self, index: usize, spec: &CommandSpec) {
        if self.is_open() || index >= spec.args.len() {
            return;
        }
        self.state = EditorState::EditingArgument(index);
        self.value = spec.args[index].clone();
    }

    /// Closed -> CreatingArgument, seeded empty.
    pub fn open_new_argument(&mut self) {
        if self.is_open() {
            return;
        }
        self.state = EditorState::CreatingArgument;
        self.value.clear();
    }

    /// Commit the working value through the store and close. An empty
    /// new-argument value is silently discarded, not an error.
    pub fn submit(&mut self, store: &CommandStore) -> Result<CommandSpec> {
        let state = std::mem::replace(&mut self.state, EditorState::Closed);
        let value = std::mem::take(&mut self.value);
        match state {
            EditorState::Closed => {}
            EditorState::EditingCommand => store.set_base(&value)?,
            EditorState::EditingArgument(index) => {
                store.apply(ArgEdit::SetAt { index, value })?;
            }
            EditorState::CreatingArgument => {
                if !value.is_empty() {
                    store.apply(ArgEdit::Append(value))?;
                }
            }
        }
        Ok(store.load())
    }

    /// Delete the argument under edit and close, discarding the working
    /// value. Only legal from EditingArgument; anything else keeps the
    /// session as it was.
    pub fn remove(&mut self, store: &CommandStore) -> Result<CommandSpec> {
        if let EditorState::EditingArgument(index) = self.state {
            self.state = EditorState::Closed;
            self.value.clear();
            store.apply(ArgEdit::RemoveAt(index))?;
        }
        Ok(store.load())
    }

    /// Close without committing; no store write happens.
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
        self.value.clear();
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
