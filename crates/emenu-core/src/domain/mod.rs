//! # eMenu Core - Domain Module
//! 
//! Domain entities for the eMenu application.

pub mod dish;
pub mod menu;
pub mod user;
pub mod preparation_time;

// Re-export all entities
pub use dish::{Dish, DishChanges, DishDraft, DishId};
pub use menu::{Menu, MenuChanges, MenuDetail, MenuDraft, MenuId};
pub use user::{NewUser, User, UserId};
