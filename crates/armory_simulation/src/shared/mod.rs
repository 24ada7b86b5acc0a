//! Shared domain — типы, общие для weapon и explosion подсистем
//!
//! - Lifecycle (Active / Terminal) — результат `advance()` любой in-flight сущности

pub mod lifecycle;

pub use lifecycle::*;
