use std::sync::Arc;

use crate::config::AppConfig;
use crate::screens::Screens;
use crate::storage::FavoritesStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub screens: Screens,
    pub favorites: Arc<FavoritesStore>,
    pub config: Arc<AppConfig>,
}
