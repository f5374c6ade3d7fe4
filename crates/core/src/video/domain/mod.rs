pub mod image_writer;
pub mod media_io;
pub mod video_reader;
pub mod video_writer;
