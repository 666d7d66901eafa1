pub mod common;
pub mod customer;
pub mod draw_record;
pub mod pagination;
pub mod points;
pub mod promotion;

pub use common::*;
pub use customer::*;
pub use draw_record::*;
pub use pagination::*;
pub use points::*;
pub use promotion::*;
