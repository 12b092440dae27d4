//! Routine store contract.
//!
//! The store owns the canonical routine list. Implementations only provide
//! the primitive reads and writes; completion, reopening, journal entries
//! and edits are expressed on top of them so every store applies the same
//! streak rules.

use crate::error::{Result, StoreError};
use crate::routine::{NewRoutine, Routine, RoutineUpdate};

pub trait RoutineStore {
    /// All routines in insertion order.
    fn routines(&self) -> Result<Vec<Routine>>;

    /// # Errors
    /// `StoreError::NotFound` if no routine has this id.
    fn get_routine(&self, id: &str) -> Result<Routine>;

    fn add_routine(&mut self, new: NewRoutine) -> Result<Routine>;

    /// Overwrite an existing routine.
    fn save_routine(&mut self, routine: &Routine) -> Result<()>;

    fn delete_routine(&mut self, id: &str) -> Result<Routine>;

    /// Load, change and save a routine in one step.
    fn modify_routine<F>(&mut self, id: &str, f: F) -> Result<Routine>
    where
        F: FnOnce(&mut Routine) -> Result<()>,
        Self: Sized,
    {
        let mut routine = self.get_routine(id)?;
        f(&mut routine)?;
        self.save_routine(&routine)?;
        Ok(routine)
    }

    fn edit_routine(&mut self, id: &str, update: &RoutineUpdate) -> Result<Routine>
    where
        Self: Sized,
    {
        self.modify_routine(id, |r| Ok(r.apply_update(update)?))
    }

    /// Forward completion: marks the routine done and advances its streak.
    /// Completing an already completed routine changes nothing.
    fn complete_routine(&mut self, id: &str) -> Result<Routine>
    where
        Self: Sized,
    {
        self.modify_routine(id, |r| {
            r.mark_completed();
            Ok(())
        })
    }

    /// Undo a completion. The streak is left as is.
    fn reopen_routine(&mut self, id: &str) -> Result<Routine>
    where
        Self: Sized,
    {
        self.modify_routine(id, |r| {
            r.mark_incomplete();
            Ok(())
        })
    }

    fn update_routine_input(&mut self, id: &str, text: &str) -> Result<Routine>
    where
        Self: Sized,
    {
        self.modify_routine(id, |r| {
            r.input_value = Some(text.to_string());
            Ok(())
        })
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Volatile store, used by tests and embedders with their own persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    routines: Vec<Routine>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routines(routines: Vec<Routine>) -> Self {
        Self { routines }
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }
}

impl RoutineStore for MemoryStore {
    fn routines(&self) -> Result<Vec<Routine>> {
        Ok(self.routines.clone())
    }

    fn get_routine(&self, id: &str) -> Result<Routine> {
        let index = self.position(id)?;
        Ok(self.routines[index].clone())
    }

    fn add_routine(&mut self, new: NewRoutine) -> Result<Routine> {
        let routine = Routine::from_new(new_id(), new);
        self.routines.push(routine.clone());
        Ok(routine)
    }

    fn save_routine(&mut self, routine: &Routine) -> Result<()> {
        let index = self.position(&routine.id)?;
        self.routines[index] = routine.clone();
        Ok(())
    }

    fn delete_routine(&mut self, id: &str) -> Result<Routine> {
        let index = self.position(id)?;
        Ok(self.routines.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::routine::{Category, CustomRoutine};

    fn stretch() -> NewRoutine {
        CustomRoutine::new("Stretch", Category::Morning, 10).build().unwrap()
    }

    #[test]
    fn add_assigns_unique_ids() {
        let mut store = MemoryStore::new();
        let a = store.add_routine(stretch()).unwrap();
        let b = store.add_routine(stretch()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.routines().unwrap().len(), 2);
    }

    #[test]
    fn complete_then_reopen_keeps_streak() {
        let mut store = MemoryStore::new();
        let id = store.add_routine(stretch()).unwrap().id;

        assert_eq!(store.complete_routine(&id).unwrap().streak, 1);
        assert_eq!(store.complete_routine(&id).unwrap().streak, 1);
        let reopened = store.reopen_routine(&id).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.streak, 1);
    }

    #[test]
    fn missing_id_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.complete_routine("nope"),
            Err(CoreError::Store(StoreError::NotFound(_)))
        ));
        assert!(store.delete_routine("nope").is_err());
    }

    #[test]
    fn failed_edit_leaves_routine_untouched() {
        let mut store = MemoryStore::new();
        let id = store.add_routine(stretch()).unwrap().id;
        let update = RoutineUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(store.edit_routine(&id, &update).is_err());
        assert_eq!(store.get_routine(&id).unwrap().title, "Stretch");
    }
}
