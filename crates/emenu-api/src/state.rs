use std::sync::Arc;

use emenu_core::repositories::{DishRepository, MenuRepository, UserRepository};
use emenu_core::services::{AuthService, DishService, MenuService};
use emenu_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub dishes: Arc<DishService>,
    pub menus: Arc<MenuService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        dish_repo: Arc<dyn DishRepository>,
        menu_repo: Arc<dyn MenuRepository>,
        user_repo: Arc<dyn UserRepository>,
        jwt: JwtService,
    ) -> Self {
        Self {
            dishes: Arc::new(DishService::new(dish_repo.clone())),
            menus: Arc::new(MenuService::new(menu_repo, dish_repo)),
            auth: Arc::new(AuthService::new(user_repo, jwt)),
        }
    }
}
