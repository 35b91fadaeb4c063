//! # eMenu Infrastructure
//! 
//! Database, in-memory and mail implementations (adapters).

pub mod database;
pub mod mail;
pub mod memory;

pub use database::{create_pool, run_migrations, PgDishRepository, PgMenuRepository, PgUserRepository};
pub use mail::{LogMailer, SmtpMailer};
pub use memory::InMemoryStore;
