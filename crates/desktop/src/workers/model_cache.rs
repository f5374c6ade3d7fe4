use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use toonify_core::pipeline::infrastructure::onnx_network_factory::DownloadProgress;
use toonify_core::pipeline::model_adapter::ModelAdapter;
use toonify_core::pipeline::toonify_model::{ToonifyConfig, ToonifyModel};

/// The one adapter instance every job runs against.
pub type SharedAdapter = Arc<Mutex<dyn ModelAdapter>>;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Loading {
        file: Option<String>,
        downloaded: u64,
        total: u64,
    },
    Ready,
    Failed(String),
}

/// Builds the model adapter in the background at startup. Jobs submitted
/// before it is ready wait for it.
pub struct ModelCache {
    result: Mutex<Option<Result<SharedAdapter, String>>>,
    ready: Condvar,
    progress: Arc<Mutex<Option<(String, u64, u64)>>>,
}

pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ModelCache {
    fn pending() -> Self {
        Self {
            result: Mutex::new(None),
            ready: Condvar::new(),
            progress: Arc::new(Mutex::new(None)),
        }
    }

    /// Start downloading model files and building networks.
    pub fn spawn(config: ToonifyConfig) -> Arc<Self> {
        let cache = Arc::new(Self::pending());

        let progress_slot = Arc::clone(&cache.progress);
        let progress: DownloadProgress = Arc::new(move |file: &str, downloaded: u64, total: u64| {
            *lock(&progress_slot) = Some((file.to_string(), downloaded, total));
        });

        let worker = Arc::clone(&cache);
        thread::spawn(move || {
            let result = ToonifyModel::with_download_progress(config, progress)
                .map(|model| Arc::new(Mutex::new(model)) as SharedAdapter)
                .map_err(|e| e.to_string());
            match &result {
                Ok(_) => log::info!("Models ready"),
                Err(e) => log::error!("Failed to prepare models: {e}"),
            }
            worker.finish(result);
        });

        cache
    }

    /// A cache that already holds `adapter`.
    #[cfg(test)]
    pub fn ready(adapter: SharedAdapter) -> Arc<Self> {
        let cache = Self::pending();
        cache.finish(Ok(adapter));
        Arc::new(cache)
    }

    fn finish(&self, result: Result<SharedAdapter, String>) {
        *lock(&self.result) = Some(result);
        self.ready.notify_all();
    }

    pub fn state(&self) -> CacheState {
        match &*lock(&self.result) {
            Some(Ok(_)) => CacheState::Ready,
            Some(Err(e)) => CacheState::Failed(e.clone()),
            None => {
                let progress = lock(&self.progress).clone();
                let (file, downloaded, total) = match progress {
                    Some((file, downloaded, total)) => (Some(file), downloaded, total),
                    None => (None, 0, 0),
                };
                CacheState::Loading {
                    file,
                    downloaded,
                    total,
                }
            }
        }
    }

    /// Block until the adapter is built.
    pub fn wait(&self) -> Result<SharedAdapter, String> {
        let mut guard = lock(&self.result);
        loop {
            if let Some(result) = guard.as_ref() {
                return result.clone();
            }
            guard = self
                .ready
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pending_cache_reports_progress() {
        let cache = ModelCache::pending();
        assert_eq!(
            cache.state(),
            CacheState::Loading {
                file: None,
                downloaded: 0,
                total: 0
            }
        );
        *lock(&cache.progress) = Some(("encoder.onnx".into(), 5, 10));
        assert_eq!(
            cache.state(),
            CacheState::Loading {
                file: Some("encoder.onnx".into()),
                downloaded: 5,
                total: 10
            }
        );
    }

    #[test]
    fn test_wait_returns_once_finished() {
        let cache = Arc::new(ModelCache::pending());
        let waiter = Arc::clone(&cache);
        let handle = thread::spawn(move || waiter.wait().map(|_| ()));
        thread::sleep(Duration::from_millis(20));
        cache.finish(Err("no network".into()));
        assert_eq!(handle.join().unwrap(), Err("no network".to_string()));
        assert_eq!(cache.state(), CacheState::Failed("no network".into()));
    }
}
