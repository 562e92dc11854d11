//! Environment isolation for tests that touch `CHATRIG_*` or credential variables.

use std::env;
use std::sync::Mutex;

/// Held by every test that reads or writes process environment.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Restores one variable to its prior value when dropped.
pub struct EnvVarGuard {
    key: String,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    pub fn unset(key: &str) -> Self {
        Self::replace(key, None)
    }

    fn replace(key: &str, value: Option<&str>) -> Self {
        let previous = env::var(key).ok();
        write_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        write_var(&self.key, self.previous.as_deref());
    }
}

// Callers hold ENV_LOCK, so no other test thread touches the environment.
#[allow(unsafe_code)]
fn write_var(key: &str, value: Option<&str>) {
    match value {
        Some(v) => unsafe { env::set_var(key, v) },
        None => unsafe { env::remove_var(key) },
    }
}
