//! Asset loading progress.
//!
//! Decoding belongs to the host; this module only drives an async `AssetSource`
//! and turns results into a progress percentage. A failed asset is logged and
//! forces the bar to 100 % so the session continues with degraded visuals.

use std::future::Future;

use crate::error::VignetteError;
use crate::overlay::Overlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    Font,
    Texture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub kind: AssetKind,
    pub path: String,
}

impl AssetRequest {
    pub fn new(kind: AssetKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Async loader contract. The resolved bytes are handed back to the host untouched.
pub trait AssetSource {
    fn load(
        &self,
        kind: AssetKind,
        path: &str,
    ) -> impl Future<Output = Result<Vec<u8>, VignetteError>>;
}

#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    total: usize,
    completed: usize,
    failed: Vec<String>,
    forced: bool,
}

impl LoadingTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn progress(&self) -> u8 {
        if self.forced || self.total == 0 {
            return 100;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.progress() == 100
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn record_success(&mut self) {
        self.completed += 1;
    }

    pub fn record_failure(&mut self, error: &VignetteError) {
        log::error!("{}", error);
        if !self.forced {
            log::warn!("Forcing loading screen to completion after asset failure");
        }
        self.completed += 1;
        self.failed.push(error.to_string());
        self.forced = true;
    }
}

/// Everything that loaded, keyed by request, plus the final tracker.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<(AssetRequest, Vec<u8>)>,
    pub tracker: LoadingTracker,
}

/// Load every request in order, reporting progress to the overlay when present.
pub async fn load_all<S: AssetSource>(
    source: &S,
    requests: &[AssetRequest],
    mut overlay: Option<&mut dyn Overlay>,
) -> LoadReport {
    let mut report = LoadReport {
        loaded: Vec::with_capacity(requests.len()),
        tracker: LoadingTracker::new(requests.len()),
    };
    for request in requests {
        match source.load(request.kind, &request.path).await {
            Ok(bytes) => {
                log::debug!("Loaded {:?} {}", request.kind, request.path);
                report.tracker.record_success();
                report.loaded.push((request.clone(), bytes));
            }
            Err(e) => report.tracker.record_failure(&e),
        }
        if let Some(o) = overlay.as_deref_mut() {
            o.set_loading_progress(report.tracker.progress());
        }
    }
    report
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: std::path::PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    async fn load(&self, kind: AssetKind, path: &str) -> Result<Vec<u8>, VignetteError> {
        std::fs::read(self.root.join(path)).map_err(|e| VignetteError::AssetLoad {
            kind,
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource;

    impl AssetSource for FakeSource {
        async fn load(&self, kind: AssetKind, path: &str) -> Result<Vec<u8>, VignetteError> {
            if path.starts_with("missing") {
                Err(VignetteError::AssetLoad {
                    kind,
                    path: path.to_string(),
                    reason: "not found".into(),
                })
            } else {
                Ok(path.as_bytes().to_vec())
            }
        }
    }

    #[derive(Default)]
    struct ProgressLog(Vec<u8>);

    impl Overlay for ProgressLog {
        fn set_loading_progress(&mut self, percent: u8) {
            self.0.push(percent);
        }
    }

    #[test]
    fn progress_counts_up() {
        let requests = [
            AssetRequest::new(AssetKind::Model, "penguin.glb"),
            AssetRequest::new(AssetKind::Font, "title.json"),
            AssetRequest::new(AssetKind::Texture, "snow.png"),
            AssetRequest::new(AssetKind::Texture, "rock.png"),
        ];
        let mut log = ProgressLog::default();
        let report = pollster::block_on(load_all(&FakeSource, &requests, Some(&mut log)));
        assert_eq!(log.0, vec![25, 50, 75, 100]);
        assert_eq!(report.loaded.len(), 4);
        assert!(report.tracker.failed().is_empty());
    }

    #[test]
    fn failure_forces_completion() {
        let requests = [
            AssetRequest::new(AssetKind::Model, "missing.glb"),
            AssetRequest::new(AssetKind::Font, "title.json"),
            AssetRequest::new(AssetKind::Texture, "snow.png"),
        ];
        let mut log = ProgressLog::default();
        let report = pollster::block_on(load_all(&FakeSource, &requests, Some(&mut log)));
        assert_eq!(log.0, vec![100, 100, 100]);
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.tracker.failed().len(), 1);
        assert!(report.tracker.is_complete());
    }

    #[test]
    fn nothing_to_load_is_complete() {
        let report = pollster::block_on(load_all(&FakeSource, &[], None));
        assert_eq!(report.tracker.progress(), 100);
    }
}
