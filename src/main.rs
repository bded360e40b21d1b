//! Parkour - headless runner for the locomotion controller
//!
//! Builds a small obstacle course, spawns the character and plays a scripted
//! input timeline through the controller at a fixed timestep, logging every
//! controller event along the way.

mod course;
mod script;
mod settings;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use parkour_controller::{CharacterController, ControllerEvent};
use parkour_core::{GameTime, TimeConfig};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use course::{Course, PointMassCourse, RapierCourse};
use script::InputScript;
use settings::RunnerSettings;

/// Command line switches
#[derive(Debug, Default)]
struct Options {
    point_mass: bool,
    write_default_settings: bool,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Self::default();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--point-mass" => options.point_mass = true,
                "--write-default-settings" => options.write_default_settings = true,
                other => warn!("Ignoring unknown argument {}", other),
            }
        }
        options
    }
}

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let options = Options::from_args();

    if options.write_default_settings {
        let path = RunnerSettings::default()
            .save()
            .context("Failed to write default settings")?;
        info!("Wrote default settings to {:?}", path);
        return Ok(());
    }

    let settings = RunnerSettings::load();
    let mut controller = CharacterController::new(settings.controller.clone())
        .context("Invalid controller settings")?;

    // Tally every event for the final summary
    let tally: Rc<RefCell<BTreeMap<String, u32>>> = Rc::default();
    let sink = Rc::clone(&tally);
    controller.subscribe(move |event: ControllerEvent| {
        *sink.borrow_mut().entry(event.to_string()).or_default() += 1;
    });

    if options.point_mass {
        let course = PointMassCourse::build(&settings, &mut controller);
        run(course, &mut controller, &settings)?;
    } else {
        let course = RapierCourse::build(&settings, &mut controller);
        run(course, &mut controller, &settings)?;
    }

    for (event, count) in tally.borrow().iter() {
        info!("{:>26}: {}", event, count);
    }
    Ok(())
}

/// Play the scripted run to the end of the configured duration
fn run(
    mut course: impl Course,
    controller: &mut CharacterController,
    settings: &RunnerSettings,
) -> Result<()> {
    let simulation = &settings.simulation;
    let mut time = GameTime::new(TimeConfig {
        time_scale: simulation.time_scale,
        fixed_timestep: settings.physics.timestep,
        ..TimeConfig::default()
    });
    let dt = time.fixed_delta();
    let frame_delta = 1.0 / simulation.frame_rate.max(1.0);
    let report_every = ((simulation.report_interval / dt).round() as u64).max(1);

    let mut script = InputScript::obstacle_course();
    info!(
        "Running {} course for {:.1}s at {:.0} Hz",
        course.name(),
        simulation.duration,
        1.0 / dt
    );

    let mut step_index: u64 = 0;
    while time.total_time < simulation.duration as f64 {
        time.update(frame_delta);

        for _ in 0..time.fixed_steps() {
            let now = step_index as f32 * dt;
            if let Some(label) = script.apply(now, controller.input_mut()) {
                info!("[{:6.2}s] > {}", now, label);
            }

            let events = course
                .step(controller, dt)
                .with_context(|| format!("Step {} failed", step_index))?;
            for event in events {
                info!("[{:6.2}s] {}", now, event);
            }

            step_index += 1;
            if step_index % report_every == 0 {
                let state = controller.state();
                info!(
                    "[{:6.2}s] pos {:>6.2?} speed {:5.2} m/s grounded {} wall-run {:?} sliding {}",
                    now,
                    course.position().to_array(),
                    state.horizontal_speed,
                    state.grounded,
                    state.wall_run,
                    state.sliding
                );
            }
        }
    }

    info!(
        "Finished after {} fixed steps, {} frames",
        time.fixed_step_count, time.frame_count
    );
    Ok(())
}
