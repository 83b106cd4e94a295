pub mod normalize;
pub mod provision;
pub mod replay;
