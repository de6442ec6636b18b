use crate::simulation::{InputState, Scene, TimeState};
use glam::Quat;
use rand::Rng;
use std::time::{Duration, Instant};

/// Rotation advance per gated tick, radians about the viewing axis.
const RING_ROTATION_STEP: f32 = 0.1;

/// How the next tick gets scheduled after a frame completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePacing {
    /// Chain redraws directly; the FIFO present mode paces to vsync.
    Immediate,
    /// Hold the next redraw until this much time has passed since the last
    /// frame, capping the animation rate below display refresh.
    MinInterval(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

/// Scheduling decision handed back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RedrawAt {
    Now,
    At(Instant),
}

/// Drives the steady animation loop: one controls step, the stochastic ring
/// rotation gate, then a render request, repeating until teardown stops the
/// scheduling. Idle only before the first tick.
pub struct FrameScheduler<R: Rng> {
    pacing: FramePacing,
    phase: Phase,
    rng: R,
    time: TimeState,
    last_frame: Option<Instant>,
}

impl<R: Rng> FrameScheduler<R> {
    pub fn new(pacing: FramePacing, rng: R) -> Self {
        Self {
            pacing,
            phase: Phase::Idle,
            rng,
            time: TimeState::default(),
            last_frame: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one tick: damping step first, then the rotation gate.
    ///
    /// The gate: a uniform draw from [0,1) only passes when its ceiling is
    /// not 1, so rings advance only on the measure-zero draw of exactly 0.0
    /// and the disk sits in a stochastic near-freeze. That is the intended
    /// shipped behavior; see DESIGN.md before "fixing" it.
    pub fn tick(&mut self, scene: &mut Scene, input: &mut InputState) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
            log::debug!("first tick; entering steady animation loop");
        }
        self.time.update();
        if let Some(fps) = self.time.fps_sample() {
            log::info!("FPS: {fps:.1}");
        }

        scene.apply_input(input);
        scene.controls.update(&mut scene.camera);

        if scene.config.rotating_disk && !scene.paused {
            for ring in &mut scene.rings {
                let draw: f32 = self.rng.gen();
                if draw.ceil() == 1.0 {
                    continue;
                }
                ring.rotation += RING_ROTATION_STEP;
                scene.nodes[ring.node].rotation = Quat::from_rotation_z(ring.rotation);
            }
        }
    }

    /// Record a presented frame; the pacing clock starts from here.
    pub fn frame_completed(&mut self) {
        self.last_frame = Some(Instant::now());
    }

    /// Where the event loop should pick the next redraw up.
    pub fn next_redraw(&self, now: Instant) -> RedrawAt {
        match (self.pacing, self.last_frame) {
            (FramePacing::Immediate, _) | (_, None) => RedrawAt::Now,
            (FramePacing::MinInterval(min), Some(last)) => {
                let deadline = last + min;
                if now >= deadline {
                    RedrawAt::Now
                } else {
                    RedrawAt::At(deadline)
                }
            }
        }
    }
}
