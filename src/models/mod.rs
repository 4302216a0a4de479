pub mod detection;
pub mod video;
