pub mod partner;
pub mod spots;
