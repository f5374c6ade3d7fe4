pub mod face_parser;
pub mod style_code;
pub mod style_degree;
pub mod style_encoder;
pub mod style_preset;
pub mod toonify_generator;
