use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, trace, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{
    time_source_for_policy, BoxedTimeSource, FrameScheduler, RenderPolicy, TimeSample,
};
use crate::types::{AdapterProfile, RendererConfig};

const WINDOW_TITLE: &str = "Glitch Sphere";
const SOFTWARE_FPS_CAP: f32 = 15.0;

/// Window plus the GPU state drawing into it.
pub(crate) struct WindowState {
    // Field order matters: the surface in `gpu` must drop before the window.
    gpu: GpuState,
    window: Arc<Window>,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        Ok(Self { gpu, window })
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        self.gpu.adapter_profile()
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn render_frame(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        self.gpu.render(sample)
    }
}

/// Couples the frame scheduler with the time source feeding the shader.
pub(crate) struct RenderPolicyDriver {
    scheduler: FrameScheduler,
    time_source: BoxedTimeSource,
}

impl RenderPolicyDriver {
    pub(crate) fn new(policy: &RenderPolicy, time_step: f32) -> Self {
        Self {
            scheduler: FrameScheduler::new(policy),
            time_source: time_source_for_policy(policy, time_step),
        }
    }

    /// Time for the frame about to be drawn. Repeats until that frame is
    /// presented, so dropped frames do not consume a time step.
    pub(crate) fn sample(&self) -> TimeSample {
        self.time_source.sample()
    }

    pub(crate) fn mark_rendered(&mut self, now: Instant) {
        self.scheduler.mark_rendered(now);
        self.time_source.advance();
    }

    pub(crate) fn ready_for_frame(&self, now: Instant) -> bool {
        self.scheduler.ready_for_frame(now)
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

/// Applies the software-rasterizer frame cap unless the caller chose a rate.
fn effective_policy(
    policy: &RenderPolicy,
    profile: &AdapterProfile,
) -> (RenderPolicy, Option<f32>) {
    match policy {
        RenderPolicy::Animate { target_fps: None } if profile.is_software() => (
            RenderPolicy::Animate {
                target_fps: Some(SOFTWARE_FPS_CAP),
            },
            Some(SOFTWARE_FPS_CAP),
        ),
        other => (other.clone(), None),
    }
}

fn is_exit_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
}

/// Opens the window and animates the sphere until it is closed.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state =
        WindowState::new(window, &config).context("failed to initialise window renderer")?;

    let profile = state.adapter_profile().clone();
    let (policy, software_cap) = effective_policy(&config.policy, &profile);
    if let Some(cap) = software_cap {
        warn!(
            adapter = %profile.name,
            backend = ?profile.backend,
            cap,
            "software rasterizer detected; capping animation to {} FPS (override with --fps)",
            cap
        );
    }
    info!(
        adapter = %profile.name,
        width = state.size().width,
        height = state.size().height,
        time_step = config.time_step,
        "glitch sphere running"
    );

    let mut policy_driver = RenderPolicyDriver::new(&policy, config.time_step);
    state.window().request_redraw();

    let mut failure = None;
    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } if is_exit_key(&event) => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::RedrawRequested => {
                        let sample = policy_driver.sample();
                        match state.render_frame(sample) {
                            Ok(()) => {
                                if glitchfx::glitch::is_glitch_frame(sample.seconds) {
                                    trace!(
                                        frame = sample.frame_index,
                                        time = sample.seconds,
                                        "glitch frame"
                                    );
                                }
                                policy_driver.mark_rendered(Instant::now());
                            }
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting");
                                failure = Some(anyhow!("GPU surface ran out of memory"));
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                warn!("surface error: {other:?}; retrying next frame");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if policy_driver.ready_for_frame(now) {
                    trace!("scheduler: issuing redraw now");
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = policy_driver.next_deadline() {
                    let ms = deadline.saturating_duration_since(now).as_millis();
                    trace!(deadline_ms = ms, "scheduler: waiting until next frame");
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
