pub mod crop_parameters;
pub mod face_quad;
pub mod padding;
