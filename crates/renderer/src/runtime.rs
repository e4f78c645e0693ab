use std::path::PathBuf;
use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames should animate continuously in a
/// window or be evaluated once at a fixed timestamp and written to disk.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Render a frame on the CPU and write the result to disk.
    Export {
        /// Timestamp to evaluate the shader at.
        time: f32,
        /// Destination PNG path.
        path: PathBuf,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Shader time (not wall-clock seconds; see [`FrameStepTimeSource`]).
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Creates a new time sample.
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
///
/// `sample` reports the time for the frame about to be drawn; `advance` moves
/// on once that frame has actually been presented.
pub trait TimeSource: Send {
    /// Time sample for the pending frame.
    fn sample(&self) -> TimeSample;
    /// Commits the pending frame.
    fn advance(&mut self);
}

/// Advances time by a fixed step per rendered frame.
///
/// Animation speed therefore follows the frame rate: a slow machine plays the
/// effect back slower instead of skipping ahead.
#[derive(Debug, Clone, Copy)]
pub struct FrameStepTimeSource {
    step: f32,
    frame: u64,
}

impl FrameStepTimeSource {
    /// Creates a source that starts at `0.0` and adds `step` per frame.
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(0.0),
            frame: 0,
        }
    }
}

impl Default for FrameStepTimeSource {
    fn default() -> Self {
        Self::new(glitchfx::params::DEFAULT_TIME_STEP)
    }
}

impl TimeSource for FrameStepTimeSource {
    fn sample(&self) -> TimeSample {
        // Multiply rather than accumulate so long sessions do not drift.
        TimeSample::new(self.step * self.frame as f32, self.frame)
    }

    fn advance(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
}

impl FixedTimeSource {
    /// Constructs a fixed time source that always returns the provided time.
    pub fn new(time: f32) -> Self {
        Self { time }
    }
}

impl TimeSource for FixedTimeSource {
    fn sample(&self) -> TimeSample {
        TimeSample::new(self.time, 0)
    }

    fn advance(&mut self) {}
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy, time_step: f32) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(FrameStepTimeSource::new(time_step)),
        RenderPolicy::Export { time, .. } => Box::new(FixedTimeSource::new(*time)),
    }
}

/// Decides when the next frame is due under an optional FPS cap.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        let interval = match policy {
            RenderPolicy::Animate {
                target_fps: Some(fps),
            } if *fps > 0.0 => Some(Duration::from_secs_f32(1.0 / fps)),
            _ => None,
        };
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    /// Instant at which the next frame becomes due, when capped.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn render_frames(source: &mut impl TimeSource, frames: usize) {
        for _ in 0..frames {
            source.advance();
        }
    }

    #[test]
    fn frame_step_source_advances_by_step() {
        let mut source = FrameStepTimeSource::new(0.01);
        assert_eq!(source.sample(), TimeSample::new(0.0, 0));
        source.advance();
        let second = source.sample();
        assert_eq!(second.frame_index, 1);
        assert_abs_diff_eq!(second.seconds, 0.01, epsilon = 1e-7);

        render_frames(&mut source, 99);
        let hundredth = source.sample();
        assert_eq!(hundredth.frame_index, 100);
        assert_abs_diff_eq!(hundredth.seconds, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn sampling_without_advancing_repeats_the_frame() {
        let mut source = FrameStepTimeSource::new(0.01);
        render_frames(&mut source, 3);
        let pending = source.sample();
        assert_eq!(source.sample(), pending);
        assert_eq!(pending.frame_index, 3);
    }

    #[test]
    fn frame_step_source_is_monotonic() {
        let mut source = FrameStepTimeSource::default();
        let mut last = -1.0;
        for _ in 0..1000 {
            let sample = source.sample();
            assert!(sample.seconds > last);
            last = sample.seconds;
            source.advance();
        }
    }

    #[test]
    fn negative_step_is_clamped() {
        let mut source = FrameStepTimeSource::new(-1.0);
        source.advance();
        assert_eq!(source.sample().seconds, 0.0);
    }

    #[test]
    fn fixed_source_never_moves() {
        let mut source = FixedTimeSource::new(2.5);
        assert_eq!(source.sample(), TimeSample::new(2.5, 0));
        source.advance();
        assert_eq!(source.sample(), TimeSample::new(2.5, 0));
    }

    #[test]
    fn policy_selects_time_source() {
        let mut export = time_source_for_policy(
            &RenderPolicy::Export {
                time: 1.25,
                path: PathBuf::from("frame.png"),
            },
            0.01,
        );
        export.advance();
        assert_eq!(export.sample().seconds, 1.25);

        let mut animate = time_source_for_policy(&RenderPolicy::default(), 0.5);
        animate.advance();
        assert_eq!(animate.sample().seconds, 0.5);
    }

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let mut scheduler = FrameScheduler::new(&RenderPolicy::default());
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn capped_scheduler_waits_for_interval() {
        let mut scheduler = FrameScheduler::new(&RenderPolicy::Animate {
            target_fps: Some(10.0),
        });
        let start = Instant::now();
        assert!(scheduler.ready_for_frame(start));
        scheduler.mark_rendered(start);
        assert!(!scheduler.ready_for_frame(start + Duration::from_millis(50)));
        assert!(scheduler.ready_for_frame(start + Duration::from_millis(110)));
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_secs_f32(0.1))
        );
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let mut scheduler = FrameScheduler::new(&RenderPolicy::Animate {
            target_fps: Some(0.0),
        });
        let now = Instant::now();
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert_eq!(scheduler.next_deadline(), None);
    }
}
