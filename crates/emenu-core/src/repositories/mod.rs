//! Repository traits (ports)

pub mod dish_repository;
pub mod menu_repository;
pub mod user_repository;

pub use dish_repository::DishRepository;
pub use menu_repository::MenuRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use dish_repository::MockDishRepository;
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
