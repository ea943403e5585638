//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod date_filter;
pub mod history;
pub mod password;
pub mod product;
pub mod user;

pub use date_filter::{DateRange, HistoryFilter};
pub use history::{HistoryAction, HistoryRecord, HistoryUser, NewHistoryEntry, ProductHistory};
pub use password::Password;
pub use product::{NewProduct, Product, ProductChanges};
pub use user::{Actor, Registration, User, UserRole, UserSummary};
