use brainblast_core::Repository;
use wasm_bindgen::prelude::*;

use crate::storage::LocalStore;
use crate::utils::{to_json, utc_now};

/// Profile, history and statistics of the local player, all backed by `localStorage`.
#[wasm_bindgen]
pub struct Account {
    repo: Repository<LocalStore>,
}

#[wasm_bindgen]
impl Account {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            repo: Repository::new(LocalStore),
        }
    }

    /// JSON profile, or `null` when signed out.
    pub fn profile(&self) -> String {
        to_json(&self.repo.profile())
    }

    pub fn history(&self) -> String {
        to_json(&self.repo.history())
    }

    pub fn stats(&self) -> String {
        to_json(&self.repo.stats())
    }

    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(&mut self, username: &str, email: &str) -> String {
        to_json(&self.repo.sign_in(username, email, utc_now()))
    }

    pub fn register(&mut self, username: &str, email: &str) -> String {
        to_json(&self.repo.register(username, email, utc_now()))
    }

    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out(&mut self) {
        self.repo.sign_out();
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}
