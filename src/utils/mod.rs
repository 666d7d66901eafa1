pub mod password;
pub mod weighted_draw;

pub use password::*;
pub use weighted_draw::{
    DrawError, FixedRandom, RandomSource, ThreadRandom, Weighted, select_winner, total_weight,
};
