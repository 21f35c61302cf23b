//! Configuration access port trait.
//!
//! Missing keys fall back to the supplied default. A present value that does
//! not parse is an error.

use crate::domain::error::QuantError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, QuantError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, QuantError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
