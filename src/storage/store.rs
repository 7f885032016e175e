//! Persistence handle
//!
//! The engine never knows where its tasks live. It is handed a
//! [`ForestStore`] and calls it after every mutation.

use std::cell::{Cell, RefCell};

use anyhow::{bail, Result};

use super::codec;
use crate::domain::Forest;

/// Saves and loads a whole forest as one unit
pub trait ForestStore {
    /// Overwrites the stored forest
    fn save(&self, forest: &Forest) -> Result<()>;

    /// Loads the stored forest, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<Forest>>;
}

/// In-memory store holding the encoded text, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with already encoded content
    pub fn with_text(text: impl Into<String>) -> Self {
        let store = Self::default();
        *store.text.borrow_mut() = Some(text.into());
        store
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// The last saved content
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    /// Makes subsequent saves fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl ForestStore for MemoryStore {
    fn save(&self, forest: &Forest) -> Result<()> {
        if self.fail_writes.get() {
            bail!("Memory store is read-only");
        }

        *self.text.borrow_mut() = Some(codec::encode(forest)?);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load(&self) -> Result<Option<Forest>> {
        match self.text.borrow().as_deref() {
            Some(text) => Ok(Some(codec::decode(text)?)),
            None => Ok(None),
        }
    }
}

impl<S: ForestStore + ?Sized> ForestStore for &S {
    fn save(&self, forest: &Forest) -> Result<()> {
        (**self).save(forest)
    }

    fn load(&self) -> Result<Option<Forest>> {
        (**self).load()
    }
}
