pub mod job_dispatcher;
pub mod model_cache;
