use brainblast_core::{KeyValueStore, StoreError};
use gloo::storage::{LocalStorage, Storage};

/// Browser `localStorage`, shared by every tab of the origin.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Could not read {:?}: {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(key, &value)
            .map_err(|err| StoreError::Backend {
                key: key.to_string(),
                reason: format!("{:?}", err),
            })
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = LocalStorage::raw().remove_item(key) {
            log::error!("Could not remove {:?}: {:?}", key, err);
        }
    }
}
