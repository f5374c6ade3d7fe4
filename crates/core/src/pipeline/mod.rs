pub mod align_frame_use_case;
pub mod align_video_use_case;
pub mod infrastructure;
pub mod load_style_use_case;
pub mod model_adapter;
pub mod network_factory;
pub mod pipeline_logger;
pub mod toonify_image_use_case;
pub mod toonify_model;
pub mod toonify_video_use_case;
