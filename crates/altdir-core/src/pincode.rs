use std::sync::Arc;

use altdir_cache::KeyValueStore;

use crate::{Error, Result};

pub const PINCODE_KEY: &str = "userPincode";

/// Exactly six ASCII digits, surrounding whitespace ignored
pub fn validate_pincode(raw: &str) -> Result<String> {
    let pincode = raw.trim();
    if pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit()) {
        Ok(pincode.to_string())
    } else {
        Err(Error::Validation(format!(
            "'{}' is not a 6-digit pincode",
            pincode
        )))
    }
}

/// The user's pincode, remembered between sessions
pub struct PincodeStore {
    store: Arc<dyn KeyValueStore>,
}

impl PincodeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A stored value that no longer validates is ignored
    pub fn get(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(PINCODE_KEY)?
            .and_then(|raw| validate_pincode(&raw).ok()))
    }

    pub fn set(&self, pincode: &str) -> Result<String> {
        let pincode = validate_pincode(pincode)?;
        self.store.set(PINCODE_KEY, &pincode)?;
        Ok(pincode)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(PINCODE_KEY)?;
        Ok(())
    }
}
