use clap::Parser;
use phototaxis::config::SimulationConfig;
use phototaxis::constants::*;
use phototaxis::renderer::Renderer;
use phototaxis::simulation::{SimulationState, Stats};
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "phototaxis")]
#[command(about = "Worms in a circular dish evolving toward (or away from) the light", long_about = None)]
struct Args {
    /// Side of the square bounding the dish, in length units
    #[arg(long, default_value_t = DEFAULT_SIDE_LENGTH)]
    side_length: u32,

    /// Size of one grid cell; must divide the side length
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Initial population, also the mean carrying capacity
    #[arg(long, default_value_t = DEFAULT_POPULATION)]
    population: usize,

    #[arg(long, default_value_t = DEFAULT_FOOD_PER_TICK)]
    food_per_tick: usize,

    #[arg(long, default_value_t = DEFAULT_BREEDING_CHANCE)]
    breeding_chance: f64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    ticks_per_second: f64,

    /// Run without a window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value_t = 1000)]
    ticks: u64,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            side_length: self.side_length,
            cell_size: self.cell_size,
            initial_population: self.population,
            food_per_tick: self.food_per_tick,
            breeding_chance: self.breeding_chance,
            seed: self.seed,
            ..SimulationConfig::default()
        }
    }
}

fn status_line(tick: u64, stats: &Stats) -> String {
    format!(
        "tick {} - worms: {}, food credit: {}, light exposure: {}, food items: {}",
        tick,
        stats.population,
        stats.total_food_credit,
        stats.total_light_exposure,
        stats.food_items
    )
}

fn run_headless(
    mut simulation_state: SimulationState,
    ticks: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..ticks {
        let report = simulation_state.update()?;
        log::info!(
            "{} (births {}, deaths {})",
            status_line(report.tick, &simulation_state.stats()),
            report.births,
            report.deaths
        );
        if simulation_state.worms.is_empty() {
            log::warn!("Population died out at tick {}", report.tick);
            break;
        }
    }
    Ok(())
}

// --- Main Function ---
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    if !(args.ticks_per_second > 0.0) {
        return Err(format!(
            "ticks-per-second must be positive, got {}",
            args.ticks_per_second
        )
        .into());
    }
    let mut simulation_state = SimulationState::new(args.simulation_config())?;

    if args.headless {
        return run_headless(simulation_state, args.ticks);
    }

    let fixed_timestep = 1.0 / args.ticks_per_second;
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Phototaxis")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );
    let cell_count = simulation_state.world.grid().len();
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), cell_count))?;
    let mut last_sim_update_time = Instant::now();
    let mut time_accumulator = 0.0;
    let mut last_status_log_time = Instant::now();

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                let now = Instant::now();
                time_accumulator += now.duration_since(last_sim_update_time).as_secs_f64();
                last_sim_update_time = now;
                while time_accumulator >= fixed_timestep {
                    if let Err(e) = simulation_state.update() {
                        log::error!("Simulation update failed: {}", e);
                        elwt.exit();
                        return;
                    }
                    time_accumulator -= fixed_timestep;
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => renderer.resize(physical_size),
                WindowEvent::ScaleFactorChanged { .. } => renderer.resize(window.inner_size()),
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::Escape)
                            | PhysicalKey::Code(KeyCode::KeyQ) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    match renderer.render(&simulation_state.world) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU Error: OutOfMemory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("WGPU Error: {:?}", e),
                    }
                    let status =
                        status_line(simulation_state.tick_count(), &simulation_state.stats());
                    let now = Instant::now();
                    if now.duration_since(last_status_log_time).as_secs_f64()
                        >= STATUS_LOG_INTERVAL_SECS
                    {
                        log::info!("{}", status);
                        last_status_log_time = now;
                    }
                    window.set_title(&format!("Phototaxis - {}", status));
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
