pub mod onnx_network_factory;
