pub mod emotion;
pub mod youtube;
