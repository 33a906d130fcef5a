//! User field bag guarded against reserved names

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Fields, ReservedNames};
use crate::error::{CheckpointError, Result};

/// Thread-safe mapping from field name to plain-data value.
///
/// Every mutator validates the name against the reserved set, so the map
/// never holds a control attribute name.
#[derive(Debug)]
pub struct FieldStore {
    reserved: ReservedNames,
    fields: RwLock<Fields>,
}

impl FieldStore {
    pub fn new(reserved: ReservedNames) -> Self {
        Self {
            reserved,
            fields: RwLock::new(Fields::new()),
        }
    }

    pub fn reserved_names(&self) -> &ReservedNames {
        &self.reserved
    }

    fn read(&self) -> RwLockReadGuard<'_, Fields> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Fields> {
        self.fields.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.reserved.contains(name) {
            return Err(CheckpointError::ReservedName(name.to_string()));
        }
        Ok(())
    }

    /// Insert or overwrite a field.
    pub fn set(&self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        self.check_name(&name)?;
        self.write().insert(name, value);
        Ok(())
    }

    /// Serialize `value` to plain data and store it.
    pub fn set_serialized<T: Serialize + ?Sized>(
        &self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<()> {
        let name = name.into();
        self.check_name(&name)?;
        let value = serde_json::to_value(value).map_err(|source| CheckpointError::Conversion {
            name: name.clone(),
            source,
        })?;
        self.write().insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.read().get(name).cloned()
    }

    /// Read a field and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)
            .ok_or_else(|| CheckpointError::NotFound(name.to_string()))?;
        serde_json::from_value(value).map_err(|source| CheckpointError::Conversion {
            name: name.to_string(),
            source,
        })
    }

    /// Read-modify-write a typed field under a single write lock.
    ///
    /// Returns the stored result. Concurrent saves see either the old or
    /// the new value, never an intermediate one.
    pub fn update<T, F>(&self, name: &str, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        self.check_name(name)?;
        let mut fields = self.write();
        let current = fields
            .get(name)
            .cloned()
            .ok_or_else(|| CheckpointError::NotFound(name.to_string()))?;
        let current: T =
            serde_json::from_value(current).map_err(|source| CheckpointError::Conversion {
                name: name.to_string(),
                source,
            })?;
        let next = f(current);
        let stored = serde_json::to_value(&next).map_err(|source| CheckpointError::Conversion {
            name: name.to_string(),
            source,
        })?;
        fields.insert(name.to_string(), stored);
        Ok(next)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.write().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Overwrite fields with values from a loaded snapshot.
    ///
    /// Loaded values win over existing ones. Entries named like a control
    /// attribute are skipped without error. Returns how many entries were applied.
    pub fn merge(&self, loaded: Fields) -> usize {
        let mut fields = self.write();
        let mut merged = 0;
        for (name, value) in loaded {
            if self.reserved.contains(&name) {
                tracing::debug!(field = %name, "skipping reserved name in loaded snapshot");
                continue;
            }
            fields.insert(name, value);
            merged += 1;
        }
        merged
    }

    /// Consistent copy of all user fields.
    pub fn snapshot(&self) -> Fields {
        self.read()
            .iter()
            .filter(|(name, _)| !self.reserved.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new(ReservedNames::default())
    }
}
