pub mod accumulated;
pub mod dataset;
pub mod distribution;
pub mod overlap;
pub mod participation;
pub mod rankings;
