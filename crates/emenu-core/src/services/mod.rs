//! Domain services (business logic)

pub mod auth_service;
pub mod digest_service;
pub mod dish_service;
pub mod mailer;
pub mod menu_service;

pub use auth_service::{AccessToken, AuthService, Principal};
pub use digest_service::{DeliveryReport, DigestMessage, DigestService, DigestWindow, DishChangeSet};
pub use dish_service::DishService;
pub use mailer::{MailError, Mailer};
pub use menu_service::MenuService;
