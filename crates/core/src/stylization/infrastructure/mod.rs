pub mod onnx_face_parser;
pub mod onnx_style_encoder;
pub mod onnx_toonify_generator;
pub mod style_code_store;
pub mod tensor;
