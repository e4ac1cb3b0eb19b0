// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Frame loop runner: drives a [`ColumnAnimator`] on a dedicated thread.

The loop thread is the only place frames are computed. Each iteration drains pending control
commands, steps the animator, hands the frame to every publisher, then sleeps until the next
frame deadline. `start` mounts the view, `stop` unmounts it; once stopped no further frames
or phase changes happen.
*/

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::animator::{ColumnAnimator, RenderFrame};
use crate::controls::ControlQueue;
use crate::error::{AnimationError, AnimationResult};
use crate::phase::Phase;

/// Longest single sleep, so a stop request is noticed quickly
const MAX_SLEEP_CHUNK: Duration = Duration::from_millis(50);

/// Receives every rendered frame
pub trait FramePublisher: Send + Sync {
    /// Called on the frame loop thread; errors are logged and the loop continues
    fn publish(&self, frame: &RenderFrame) -> AnimationResult<()>;
}

pub struct FrameLoopRunner {
    animator: Arc<Mutex<ColumnAnimator>>,
    frame_interval: Duration,
    /// Running flag (atomic for thread-safe stop)
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
    controls: ControlQueue,
    publishers: Vec<Arc<dyn FramePublisher>>,
    /// Frames computed so far (lock-free reads)
    frame_count: Arc<AtomicU64>,
    /// Latest phase, updated by a phase clock subscription (lock-free reads)
    current_phase: Arc<AtomicU8>,
}

impl FrameLoopRunner {
    pub fn new(mut animator: ColumnAnimator, frame_interval: Duration) -> Self {
        let current_phase = Arc::new(AtomicU8::new(animator.phase().as_u8()));
        let observer = Arc::clone(&current_phase);
        animator.subscribe_phase(Arc::new(move |phase: Phase| {
            observer.store(phase.as_u8(), Ordering::Relaxed);
        }));

        Self {
            animator: Arc::new(Mutex::new(animator)),
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            controls: ControlQueue::new(),
            publishers: Vec::new(),
            frame_count: Arc::new(AtomicU64::new(0)),
            current_phase,
        }
    }

    /// Add a frame publisher; takes effect at the next `start`
    pub fn add_publisher(&mut self, publisher: Arc<dyn FramePublisher>) {
        self.publishers.push(publisher);
    }

    /// Queue that control commands should be pushed to
    pub fn control_queue(&self) -> ControlQueue {
        self.controls.clone()
    }

    /// Start the frame loop in a background thread
    pub fn start(&mut self) -> AnimationResult<()> {
        if self.running.load(Ordering::Acquire) {
            return Err(AnimationError::AlreadyRunning);
        }

        info!(
            "[FRAME-RUNNER] Starting frame loop at {:.1} Hz",
            1.0 / self.frame_interval.as_secs_f64()
        );
        self.running.store(true, Ordering::Release);

        let animator = Arc::clone(&self.animator);
        let running = Arc::clone(&self.running);
        let controls = self.controls.clone();
        let publishers = self.publishers.clone();
        let frame_count = Arc::clone(&self.frame_count);
        let interval = self.frame_interval;

        let spawned = thread::Builder::new()
            .name("column-frame-loop".to_string())
            .spawn(move || {
                frame_loop(animator, running, controls, publishers, frame_count, interval);
            });

        match spawned {
            Ok(handle) => {
                self.thread_handle = Some(handle);
                info!("[FRAME-RUNNER] Frame loop started");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(AnimationError::ThreadSpawn(e.to_string()))
            }
        }
    }

    /// Stop the frame loop and wait up to 2 seconds for the thread to finish
    pub fn stop(&mut self) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }

        info!("[FRAME-RUNNER] Stopping frame loop...");
        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.thread_handle.take() {
            let stop_timeout = Duration::from_secs(2);
            let start = Instant::now();

            // JoinHandle has no timed join; wait for it on a helper thread instead
            let (tx, rx) = std::sync::mpsc::channel();
            thread::spawn(move || {
                let _ = tx.send(handle.join());
            });

            match rx.recv_timeout(stop_timeout) {
                Ok(Ok(())) => info!("[FRAME-RUNNER] Frame loop stopped cleanly"),
                Ok(Err(_)) => warn!("[FRAME-RUNNER] Frame loop thread panicked during shutdown"),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => warn!(
                    "[FRAME-RUNNER] Frame loop did not stop within {:?}, proceeding with shutdown",
                    start.elapsed()
                ),
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    warn!("[FRAME-RUNNER] Join thread disconnected unexpectedly")
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Frames computed so far (lock-free)
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Latest phase (lock-free)
    pub fn current_phase(&self) -> Phase {
        Phase::from_u8(self.current_phase.load(Ordering::Relaxed))
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run `f` with exclusive access to the animator, between frames
    pub fn with_animator<R>(&self, f: impl FnOnce(&mut ColumnAnimator) -> R) -> R {
        let mut animator = self.animator.lock();
        f(&mut animator)
    }
}

impl Drop for FrameLoopRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn frame_loop(
    animator: Arc<Mutex<ColumnAnimator>>,
    running: Arc<AtomicBool>,
    controls: ControlQueue,
    publishers: Vec<Arc<dyn FramePublisher>>,
    frame_count: Arc<AtomicU64>,
    interval: Duration,
) {
    debug!(
        "[FRAME-LOOP] Entering loop with {} publisher(s)",
        publishers.len()
    );

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();

        let frame = {
            let mut animator = animator.lock();
            for command in controls.drain_all() {
                animator.apply(command, frame_start);
            }
            animator.step(frame_start)
        };

        for publisher in &publishers {
            if let Err(e) = publisher.publish(&frame) {
                warn!(
                    "[FRAME-LOOP] Publisher failed on frame {}: {}",
                    frame.snapshot.tick, e
                );
            }
        }
        frame_count.fetch_add(1, Ordering::Relaxed);

        let target_time = frame_start + interval;
        let now = Instant::now();
        if now > target_time {
            let overshoot = now.duration_since(target_time);
            if overshoot > interval {
                warn!(
                    "[FRAME-LOOP] Frame {} overshot its deadline by {:.2}ms",
                    frame.snapshot.tick,
                    overshoot.as_secs_f64() * 1000.0
                );
            }
        }

        loop {
            let now = Instant::now();
            if now >= target_time || !running.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep((target_time - now).min(MAX_SLEEP_CHUNK));
        }
    }

    info!(
        "[FRAME-LOOP] Loop stopped after {} frames",
        frame_count.load(Ordering::Relaxed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlCommand;
    use crate::settings::AnimationSettings;
    use column_structures::Topology;

    fn runner() -> FrameLoopRunner {
        let topology = Arc::new(Topology::cortical_column().unwrap());
        let animator =
            ColumnAnimator::new(topology, &AnimationSettings::default(), Instant::now()).unwrap();
        FrameLoopRunner::new(animator, Duration::from_millis(5))
    }

    struct CountingPublisher {
        frames: AtomicU64,
    }

    impl FramePublisher for CountingPublisher {
        fn publish(&self, _frame: &RenderFrame) -> AnimationResult<()> {
            self.frames.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    struct FailingPublisher;

    impl FramePublisher for FailingPublisher {
        fn publish(&self, _frame: &RenderFrame) -> AnimationResult<()> {
            Err(AnimationError::Publish("sink closed".to_string()))
        }
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut runner = runner();
        runner.start().unwrap();
        assert!(matches!(runner.start(), Err(AnimationError::AlreadyRunning)));
        runner.stop();
        assert!(!runner.is_running());
    }

    #[test]
    fn test_frames_flow_to_publishers_despite_failures() {
        let counter = Arc::new(CountingPublisher {
            frames: AtomicU64::new(0),
        });
        let mut runner = runner();
        runner.add_publisher(Arc::new(FailingPublisher));
        runner.add_publisher(counter.clone());

        runner.start().unwrap();
        thread::sleep(Duration::from_millis(100));
        runner.stop();

        let published = counter.frames.load(Ordering::Relaxed);
        assert!(published > 0);
        assert_eq!(published, runner.frame_count());
    }

    #[test]
    fn test_no_frames_after_stop() {
        let mut runner = runner();
        runner.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        runner.stop();

        let after_stop = runner.frame_count();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(runner.frame_count(), after_stop);
    }

    #[test]
    fn test_controls_reach_animator_and_phase_observer() {
        let mut runner = runner();
        let queue = runner.control_queue();
        queue.push(ControlCommand::SelectPhase(Phase::Update));

        runner.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        runner.stop();

        assert!(queue.is_empty());
        assert_eq!(runner.current_phase(), Phase::Update);
        assert_eq!(runner.with_animator(|a| a.phase()), Phase::Update);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut runner = runner();
        runner.start().unwrap();
        runner.stop();
        runner.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        runner.stop();
        assert!(runner.frame_count() > 0);
    }
}
