//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const DISH_NAME_MAX_LENGTH: u64 = 200;
pub const MENU_NAME_MAX_LENGTH: u64 = 100;
pub const DEFAULT_DIGEST_SUBJECT: &str = "eMenu - Dish updates";
pub const DEFAULT_DIGEST_RUN_AT: &str = "06:00";
