//! Request and response bodies

pub mod auth;
pub mod dish;
pub mod menu;

pub use auth::{LoginRequest, TokenResponse};
pub use dish::{DishPatchRequest, DishRequest, DishResponse};
pub use menu::{MenuPatchRequest, MenuRequest, PrivateMenuResponse, PublicMenuDetail, PublicMenuSummary};
