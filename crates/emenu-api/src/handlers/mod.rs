//! HTTP handlers

pub mod auth;
pub mod docs;
pub mod health;
pub mod private_dish;
pub mod private_menu;
pub mod public_menu;
pub mod root;
