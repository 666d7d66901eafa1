pub mod auth_service;
pub mod customer_service;
pub mod draw_log_service;
pub mod points_service;
pub mod promotion_service;
pub mod roulette_service;

pub use auth_service::*;
pub use customer_service::*;
pub use draw_log_service::*;
pub use points_service::*;
pub use promotion_service::*;
pub use roulette_service::*;
