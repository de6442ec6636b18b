use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

mod generation;
mod rendering;
mod simulation;

use generation::{ring_layout, star_field};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rendering::{renderer::Renderer, RenderResult};
use simulation::frame::RedrawAt;
use simulation::scene::{
    ACCRETION_GAP, ACCRETION_MAX_DISTANCE, ACCRETION_MIN_DISTANCE, STAR_COUNT, STAR_INNER_RADIUS,
    STAR_OUTER_RADIUS,
};
use simulation::{FramePacing, FrameScheduler, InputState, Scene, SceneConfig};
use std::time::{Duration, Instant};

/// Everything the tick path touches, owned in one place instead of loose
/// globals: the scene (camera, rings), the renderer and the scheduler.
struct App<'w> {
    scene: Scene,
    renderer: Renderer<'w>,
    scheduler: FrameScheduler<StdRng>,
    input: InputState,
}

impl App<'_> {
    fn frame(&mut self) -> RenderResult<()> {
        self.scheduler.tick(&mut self.scene, &mut self.input);
        self.renderer.render(&self.scene)?;
        self.scheduler.frame_completed();
        Ok(())
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        self.scene.handle_resize(size.width, size.height);
        self.renderer.resize(size);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Black Hole")
        .with_inner_size(PhysicalSize::new(1280, 720))
        .build(&event_loop)?;
    let window = std::sync::Arc::new(window);

    // Static geometry is generated exactly once, before the loop starts.
    let mut rng = StdRng::from_entropy();
    let config = SceneConfig::default();
    let levels = ring_layout(ACCRETION_MIN_DISTANCE, ACCRETION_MAX_DISTANCE, ACCRETION_GAP)?;
    let stars = star_field(STAR_COUNT, STAR_INNER_RADIUS, STAR_OUTER_RADIUS, &mut rng)?;
    log::info!(
        "generated {} accretion rings and {} stars",
        levels.len(),
        stars.len()
    );

    let size = window.inner_size();
    let scene = Scene::assemble(&config, &levels, &stars, (size.width, size.height), &mut rng)?;
    let renderer = pollster::block_on(Renderer::new(&window, &scene))?;
    let mut app = App {
        scene,
        renderer,
        scheduler: FrameScheduler::new(
            FramePacing::MinInterval(Duration::from_millis(50)),
            StdRng::from_entropy(),
        ),
        input: InputState::default(),
    };

    println!("Black Hole Visualization");
    println!("Controls: drag = orbit, wheel = zoom, right-drag / arrows = pan, P = pause");

    let win_id = window.id();
    let win_clone = window.clone();
    event_loop.run(move |event, target| match event {
        Event::WindowEvent { event, window_id } if window_id == win_id => match event {
            WindowEvent::CloseRequested => target.exit(),
            WindowEvent::Resized(size) => app.handle_resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(e) = app.frame() {
                    log::error!("render failed: {e}");
                    target.exit();
                }
            }
            other => app.input.handle_window_event(&other),
        },
        Event::AboutToWait => match app.scheduler.next_redraw(Instant::now()) {
            RedrawAt::Now => win_clone.request_redraw(),
            RedrawAt::At(deadline) => target.set_control_flow(ControlFlow::WaitUntil(deadline)),
        },
        _ => {}
    })?;
    Ok(())
}
