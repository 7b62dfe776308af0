//! The set of available modes and the active one
//!
//! Modes are kept in registration order, which is the order [`ModeRegistry::cycle_next`] walks
//! them in. Every switch is persisted through a [`PreferenceStore`] and reported to the observers
//! added with [`ModeRegistry::add_observer`]. An observer that fails is logged and the remaining
//! observers are still notified.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{error, info, warn};

use crate::mode::ueb::{CATEGORY_ID, CATEGORY_NAME, Grade1, Grade2};
use crate::mode::{Mode, ModeInfo};

/// Key under which the active mode is persisted
pub const PREFERENCE_KEY: &str = "brailleEditorMode";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
    #[error("Mode already registered: {0}")]
    DuplicateModeRegistration(String),
    #[error("Invalid mode: must have id and name")]
    InvalidMode,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("No modes registered")]
    NoModes,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("preference store failed: {0}")]
pub struct StoreError(pub String);

/// Key/value persistence for the mode preference
pub trait PreferenceStore: fmt::Debug + Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// A [`PreferenceStore`] that forgets everything when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key);
        Ok(())
    }
}

/// Reported to the observers on every switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub previous: Option<ModeInfo>,
    pub current: ModeInfo,
}

pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;
type Observer = Box<dyn FnMut(&ModeChange) -> Result<(), ObserverError> + Send>;

/// Handle returned by [`ModeRegistry::add_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// A named group of modes, e.g. the grades of one braille code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub modes: Vec<String>,
}

pub struct ModeRegistry {
    modes: Vec<Arc<dyn Mode>>,
    current: Option<Arc<dyn Mode>>,
    categories: Vec<Category>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: usize,
    store: Box<dyn PreferenceStore>,
}

impl fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.modes.iter().map(|m| m.info().id).collect::<Vec<_>>())
            .field("current", &self.current.as_ref().map(|m| m.info().id))
            .field("categories", &self.categories)
            .field("observers", &self.observers.len())
            .field("store", &self.store)
            .finish()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        ModeRegistry {
            modes: Vec::new(),
            current: None,
            categories: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
            store,
        }
    }

    /// A registry with both UEB grades in the UEB category, nothing selected yet
    pub fn with_default_modes() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_category(CATEGORY_ID, CATEGORY_NAME);
        registry.register_with_category(Arc::new(Grade1::new()), CATEGORY_ID)?;
        registry.register_with_category(Arc::new(Grade2::new()), CATEGORY_ID)?;
        Ok(registry)
    }

    pub fn register(&mut self, mode: Arc<dyn Mode>) -> Result<(), RegistryError> {
        let info = mode.info();
        if info.id.is_empty() || info.name.is_empty() {
            return Err(RegistryError::InvalidMode);
        }
        if self.has_mode(info.id) {
            return Err(RegistryError::DuplicateModeRegistration(info.id.to_string()));
        }
        info!("Registered mode: {} ({})", info.name, info.id);
        self.modes.push(mode);
        Ok(())
    }

    /// Add a category, or rename it if it exists
    pub fn register_category(&mut self, id: &str, name: &str) {
        match self.categories.iter_mut().find(|c| c.id == id) {
            Some(category) => category.name = name.to_string(),
            None => self.categories.push(Category {
                id: id.to_string(),
                name: name.to_string(),
                modes: Vec::new(),
            }),
        }
    }

    pub fn register_with_category(
        &mut self,
        mode: Arc<dyn Mode>,
        category: &str,
    ) -> Result<(), RegistryError> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == category)
            .ok_or_else(|| RegistryError::UnknownCategory(category.to_string()))?;
        let id = mode.info().id.to_string();
        self.register(mode)?;
        self.categories[index].modes.push(id);
        Ok(())
    }

    /// Remove a mode, returns whether it was registered
    pub fn unregister(&mut self, id: &str) -> bool {
        if self.is_mode_active(id) {
            self.current = None;
        }
        for category in &mut self.categories {
            category.modes.retain(|m| m != id);
        }
        let before = self.modes.len();
        self.modes.retain(|m| m.info().id != id);
        self.modes.len() != before
    }

    /// Make `id` the active mode, persist the choice and notify the observers
    pub fn set_mode(&mut self, id: &str) -> Result<Arc<dyn Mode>, RegistryError> {
        let mode = self
            .mode_by_id(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownMode(id.to_string()))?;
        let previous = self.current.replace(mode.clone());
        self.save_preference(id);
        let change = ModeChange {
            previous: previous.map(|m| m.info().clone()),
            current: mode.info().clone(),
        };
        self.notify(&change);
        info!("Switched to mode: {}", mode.info().name);
        Ok(mode)
    }

    pub fn mode(&self) -> Option<&Arc<dyn Mode>> {
        self.current.as_ref()
    }

    pub fn mode_by_id(&self, id: &str) -> Option<&Arc<dyn Mode>> {
        self.modes.iter().find(|m| m.info().id == id)
    }

    pub fn modes(&self) -> &[Arc<dyn Mode>] {
        &self.modes
    }

    pub fn mode_options(&self) -> Vec<ModeInfo> {
        self.modes.iter().map(|m| m.info().clone()).collect()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.modes
            .iter()
            .position(|m| m.info().id == current.info().id)
    }

    pub fn cycle_next(&mut self) -> Result<Arc<dyn Mode>, RegistryError> {
        if self.modes.is_empty() {
            return Err(RegistryError::NoModes);
        }
        let next = self
            .current_index()
            .map_or(0, |index| (index + 1) % self.modes.len());
        let id = self.modes[next].info().id;
        self.set_mode(id)
    }

    pub fn cycle_previous(&mut self) -> Result<Arc<dyn Mode>, RegistryError> {
        if self.modes.is_empty() {
            return Err(RegistryError::NoModes);
        }
        let len = self.modes.len();
        let previous = self
            .current_index()
            .map_or(len - 1, |index| (index + len - 1) % len);
        let id = self.modes[previous].info().id;
        self.set_mode(id)
    }

    pub fn save_preference(&mut self, id: &str) {
        if let Err(e) = self.store.set(PREFERENCE_KEY, id) {
            warn!("Failed to save mode preference: {e}");
        }
    }

    /// The persisted mode if it is still registered, `default` otherwise
    pub fn load_preference(&self, default: &str) -> String {
        match self.store.get(PREFERENCE_KEY) {
            Ok(Some(saved)) if self.has_mode(&saved) => saved,
            Ok(_) => default.to_string(),
            Err(e) => {
                warn!("Failed to load mode preference: {e}");
                default.to_string()
            }
        }
    }

    pub fn clear_preference(&mut self) {
        if let Err(e) = self.store.remove(PREFERENCE_KEY) {
            warn!("Failed to clear mode preference: {e}");
        }
    }

    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ModeChange) -> Result<(), ObserverError> + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer, _)| *observer != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: &ModeChange) {
        for (id, observer) in &mut self.observers {
            if let Err(e) = observer(change) {
                error!("Mode change observer {} failed: {e}", id.0);
            }
        }
    }

    pub fn has_mode(&self, id: &str) -> bool {
        self.mode_by_id(id).is_some()
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn is_mode_active(&self, id: &str) -> bool {
        self.current.as_ref().is_some_and(|m| m.info().id == id)
    }
}
