//! Configuration access port trait.

use crate::domain::error::ScreenerError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `default` when the key is absent; an error when it is present but not a boolean.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, ScreenerError>;

    /// Section names in declaration order.
    fn sections(&self) -> Vec<String>;

    /// Keys of `section` in declaration order; empty if the section is absent.
    fn keys(&self, section: &str) -> Vec<String>;
}
