pub mod customers;
pub mod draw_records;
pub mod points_movements;
pub mod promotions;

pub use customers as customer_entity;
pub use draw_records as draw_record_entity;
pub use points_movements as points_movement_entity;
pub use promotions as promotion_entity;
