use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for alignment and stylization runs.
///
/// The CLI prints stage timings; the desktop app reports through its own
/// status line and plugs in [`NullPipelineLogger`].
pub trait PipelineLogger: Send {
    /// Frames finished so far out of the expected total.
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of one call to a named stage (`crop`, `parse`, `generate`).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. generator batch size).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and peak of one stage or metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stat {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl Stat {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Logs throttled progress and a per-stage breakdown once the run ends.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    stages: BTreeMap<String, Stat>,
    metrics: BTreeMap<String, Stat>,
    started: Instant,
    frames: usize,
}

impl StdoutPipelineLogger {
    /// Progress is logged every `throttle_frames` frames and at the end.
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            frames: 0,
        }
    }

    pub fn stage(&self, stage: &str) -> Option<Stat> {
        self.stages.get(stage).copied()
    }

    pub fn metric_stat(&self, name: &str) -> Option<Stat> {
        self.metrics.get(name).copied()
    }

    /// `None` until something has been timed or measured.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let wall_ms = elapsed_ms(self.started);
        let share = |ms: f64| if wall_ms > 0.0 { ms / wall_ms * 100.0 } else { 0.0 };

        let mut out = format!(
            "Toonify summary ({} frames, {:.1}s total):",
            self.frames,
            wall_ms / 1000.0
        );
        for (stage, stat) in &self.stages {
            out.push_str(&format!(
                "\n  {stage:10} x{:<4} mean {:7.1}ms  max {:7.1}ms  ({:4.1}%)",
                stat.count,
                stat.mean(),
                stat.max,
                share(stat.total)
            ));
        }
        for (name, stat) in &self.metrics {
            out.push_str(&format!("\n  {name}: avg {:.1}", stat.mean()));
        }
        if self.frames > 0 && wall_ms > 0.0 {
            out.push_str(&format!(
                "\n  {:.2} frames/s",
                self.frames as f64 * 1000.0 / wall_ms
            ));
        }
        Some(out)
    }
}

/// Milliseconds since `start`, as reported to [`PipelineLogger::timing`].
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames = total;
        let due = current % self.throttle_frames == 0 || current == total;
        if total > 0 && due {
            log::info!("Toonified {current}/{total} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("generate", 5.0);
        logger.metric("batch_size", 4.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_stage_stats_accumulate() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("parse", 20.0);
        logger.timing("parse", 30.0);
        logger.timing("generate", 500.0);

        let parse = logger.stage("parse").unwrap();
        assert_eq!(parse.count, 2);
        assert_relative_eq!(parse.total, 50.0);
        assert_relative_eq!(parse.max, 30.0);
        assert_relative_eq!(parse.mean(), 25.0);
        assert_eq!(logger.stage("generate").unwrap().count, 1);
        assert!(logger.stage("crop").is_none());
    }

    #[test]
    fn test_summary_lists_stages_in_order_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(8, 8);
        logger.timing("generate", 400.0);
        logger.timing("crop", 10.0);
        logger.metric("batch_size", 4.0);
        logger.metric("batch_size", 3.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Toonify summary (8 frames"));
        let crop = summary.find("crop").unwrap();
        let generate = summary.find("generate").unwrap();
        assert!(crop < generate);
        assert!(summary.contains("batch_size: avg 3.5"));
        assert_relative_eq!(logger.metric_stat("batch_size").unwrap().max, 4.0);
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::default();
        assert!(logger.summary_string().is_none());
        assert_eq!(logger.throttle_frames, 10);
    }

    #[test]
    fn test_progress_tracks_total_with_zero_throttle() {
        let mut logger = StdoutPipelineLogger::new(0);
        for i in 1..=5 {
            logger.progress(i, 5);
        }
        logger.info("Model of pixar loaded.");
        assert_eq!(logger.frames, 5);
        assert_eq!(logger.throttle_frames, 1);
    }

    #[test]
    fn test_empty_stat_mean_is_zero() {
        assert_eq!(Stat::default().mean(), 0.0);
    }

    #[test]
    fn test_elapsed_ms_is_non_negative() {
        assert!(elapsed_ms(Instant::now()) >= 0.0);
    }
}
