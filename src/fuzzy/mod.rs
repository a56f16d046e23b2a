pub mod distance;
pub mod variations;
