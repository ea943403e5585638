//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach storage only through the
//! `UnitOfWork` abstraction.

mod auth_service;
pub mod container;
mod history_service;
mod product_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, AuthSession, Authenticator, Claims};
pub use history_service::{HistoryReporter, HistoryService};
pub use product_service::{ProductManager, ProductService};
