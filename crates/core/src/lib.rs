pub mod alignment;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod stylization;
pub mod video;
