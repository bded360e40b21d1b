//! The character controller orchestrator
//!
//! One call to [`CharacterController::tick_with`] runs a full fixed step:
//! sensors first, then mode transitions, then forces, then timers. The body
//! is borrowed for the duration of the call and the controller is its only
//! writer.

use glam::Vec3;
use parkour_core::{CharacterBody, ContactSample, Heading, SurfaceId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::events::{ControllerEvent, EventBus, EventListener};
use crate::gravity::{GravityContext, GravityModule};
use crate::ground::{GroundTracker, GroundTransition};
use crate::input::{InputSnapshot, InputState};
use crate::jump::JumpModule;
use crate::launch_pad::LaunchPads;
use crate::mantle::{MantleContext, MantleModule};
use crate::movement::{horizontal, MovementModule};
use crate::respawn::RespawnModule;
use crate::slide::{SlideModule, SlideTransition};
use crate::wall_climb::{WallClimbContext, WallClimbModule, WallClimbTransition};
use crate::wall_detection::{detect_side_wall, FrontWall, HeightBand, WallSide};
use crate::wall_jump::WallJumpModule;
use crate::wall_run::{WallRunContext, WallRunModule};

/// Read-only snapshot of the controller's modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub grounded: bool,
    pub wall_run: Option<WallSide>,
    pub sliding: bool,
    pub mantling: bool,
    pub wall_climbing: bool,
    pub horizontal_speed: f32,
    pub mantle_progress: f32,
}

impl MotionState {
    /// Whether either side is active
    pub fn is_wall_running(&self) -> bool {
        self.wall_run.is_some()
    }
}

/// Physically driven first-person locomotion
pub struct CharacterController {
    config: ControllerConfig,
    input: InputState,
    events: EventBus,
    heading: Heading,
    horizontal_speed: f32,

    ground: GroundTracker,
    gravity: GravityModule,
    movement: MovementModule,
    jump: JumpModule,
    wall_run: WallRunModule,
    wall_jump: WallJumpModule,
    slide: SlideModule,
    mantle: MantleModule,
    wall_climb: WallClimbModule,
    launch_pads: LaunchPads,
    respawn: RespawnModule,
}

impl CharacterController {
    /// Build a controller, rejecting invalid tuning up front
    pub fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        config.validate()?;

        let controller = Self {
            input: InputState::new(),
            events: EventBus::new(),
            heading: Heading::default(),
            horizontal_speed: 0.0,

            ground: GroundTracker::new(config.ground.clone()),
            gravity: GravityModule::new(&config),
            movement: MovementModule::new(config.movement.clone()),
            jump: JumpModule::new(config.jump.clone()),
            wall_run: WallRunModule::new(config.wall_run.clone()),
            wall_jump: WallJumpModule::new(config.wall_jump.clone()),
            slide: SlideModule::new(config.slide.clone()),
            mantle: MantleModule::new(config.mantle.clone(), config.movement.top_speed),
            wall_climb: WallClimbModule::new(config.wall_climb.clone()),
            launch_pads: LaunchPads::new(),
            respawn: RespawnModule::new(config.respawn.clone()),
            config,
        };

        info!("Character controller created");
        Ok(controller)
    }

    /// Device-level input, folded into one snapshot per tick
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Register a listener for every future event
    pub fn subscribe<L: EventListener + 'static>(&mut self, listener: L) {
        self.events.subscribe(listener);
    }

    /// Make `surface` a launch pad: `launch.x`/`launch.z` are horizontal
    /// velocity, `launch.y` is the apex height
    pub fn register_launch_pad(&mut self, surface: SurfaceId, launch: Vec3) {
        self.launch_pads.register(surface, launch);
    }

    /// Where `respawn` puts the character
    pub fn set_checkpoint(&mut self, checkpoint: Vec3) {
        self.respawn.set_checkpoint(checkpoint);
    }

    /// Run one fixed step using the accumulated device input
    pub fn tick(
        &mut self,
        body: &mut impl CharacterBody,
        contacts: &[ContactSample],
        camera_yaw: f32,
        dt: f32,
    ) -> Vec<ControllerEvent> {
        let snapshot = self.input.take_snapshot();
        self.tick_with(body, contacts, &snapshot, camera_yaw, dt)
    }

    /// Run one fixed step with an explicit input snapshot.
    ///
    /// Returns the events of this step in emission order; they are also
    /// broadcast to every subscribed listener.
    pub fn tick_with(
        &mut self,
        body: &mut impl CharacterBody,
        contacts: &[ContactSample],
        input: &InputSnapshot,
        camera_yaw: f32,
        dt: f32,
    ) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        self.step(body, contacts, input, camera_yaw, dt, &mut events);

        self.horizontal_speed = horizontal(body.velocity()).length();
        for event in &events {
            self.events.publish(*event);
        }
        events
    }

    fn step(
        &mut self,
        body: &mut impl CharacterBody,
        contacts: &[ContactSample],
        input: &InputSnapshot,
        camera_yaw: f32,
        dt: f32,
        events: &mut Vec<ControllerEvent>,
    ) {
        body.clear_forces();
        self.heading = Heading::from_yaw_degrees(camera_yaw);
        body.set_heading(self.heading);
        let heading = self.heading;

        if self.respawn.should_respawn(body.position()) {
            self.reset_modes(body);
            self.respawn.respawn(body);
            events.push(ControllerEvent::Respawned);
            return;
        }

        if self.mantle.is_mantling() {
            if input.jump_requested {
                self.jump.buffer_request();
            }
            if self.mantle.advance(body, dt) {
                events.push(ControllerEvent::MantleFinished);
            }
            self.slide.ease_camera(dt);
            self.tick_counters(dt);
            return;
        }

        // Sensors
        if let Some(GroundTransition::Landed) = self.ground.update(contacts) {
            events.push(ControllerEvent::Landed);
        }
        let grounded = self.ground.is_grounded();
        if grounded {
            self.wall_jump.on_grounded();
        }
        self.jump.refresh(grounded);

        let center = body.collider().world_center(body.position());
        let band = HeightBand::around_center(
            center,
            self.config.wall_run.band_min_offset,
            self.config.wall_run.band_max_offset,
        );
        let side_wall =
            detect_side_wall(contacts, heading, band, self.config.wall_run.detection_threshold);
        let ledge_front = FrontWall::scan(contacts, heading, self.mantle.detection_threshold());
        let climb_front = FrontWall::scan(contacts, heading, self.wall_climb.detection_threshold());

        if self
            .launch_pads
            .update(body, contacts, self.gravity.default_scale())
        {
            self.jump.cancel_coyote();
            events.push(ControllerEvent::Launched);
        }

        // Mode transitions
        match self.slide.update(body, input.slide_held, dt) {
            Some(SlideTransition::Started) => events.push(ControllerEvent::StartedSliding),
            Some(SlideTransition::Stopped) => events.push(ControllerEvent::StoppedSliding),
            None => {}
        }
        let sliding = self.slide.is_sliding();

        let started = self.wall_run.evaluate(
            side_wall,
            WallRunContext {
                grounded,
                sliding,
                move_axis: input.move_axis,
                velocity: body.velocity(),
                heading,
            },
        );
        match started {
            Some(WallSide::Left) => events.push(ControllerEvent::StartedWallRunLeft),
            Some(WallSide::Right) => events.push(ControllerEvent::StartedWallRunRight),
            None => {}
        }

        let mantle_context = MantleContext {
            grounded,
            sliding,
            move_axis: input.move_axis,
            center_height: center.y,
        };
        if self.mantle.detect(&ledge_front, mantle_context) && self.mantle.begin(body, heading) {
            self.wall_run.clear();
            if self.wall_climb.stop() {
                events.push(ControllerEvent::StoppedWallClimbing);
            }
            events.push(ControllerEvent::Mantle);
            return;
        }

        // Forces
        self.gravity.apply(
            body,
            GravityContext {
                grounded,
                sliding,
                wall_running: self.wall_run.is_wall_running(),
                vertical_velocity: body.velocity().y,
            },
        );

        if sliding {
            self.slide
                .apply_movement(body, heading, input.move_axis, grounded, self.ground.is_flat());
        } else if !self.wall_run.is_wall_running() {
            let ground_normal = grounded.then(|| self.ground.ground_normal());
            self.movement.apply(body, heading, input.move_axis, ground_normal);
        }

        if input.jump_requested {
            match self.wall_run.active_wall() {
                Some(wall) => {
                    let jumped = self.wall_jump.try_execute(
                        body,
                        wall,
                        heading,
                        self.gravity.default_scale(),
                    );
                    if let Some(side) = jumped {
                        self.wall_run.clear();
                        self.jump.cancel_coyote();
                        events.push(match side {
                            WallSide::Left => ControllerEvent::LeftWallJump,
                            WallSide::Right => ControllerEvent::RightWallJump,
                        });
                    }
                }
                None => self.jump.buffer_request(),
            }
        }
        if self
            .jump
            .try_execute(body, grounded, self.gravity.default_scale())
        {
            events.push(ControllerEvent::Jumped);
        }

        self.wall_run.apply_forces(body, heading);

        let climb_context = WallClimbContext {
            grounded,
            suspended: sliding,
            move_axis: input.move_axis,
            center_height: center.y,
            gravity_scale: self.gravity.default_scale(),
            jump_height: self.jump.jump_height(),
        };
        match self.wall_climb.update(body, &climb_front, climb_context) {
            Some(WallClimbTransition::Started) => events.push(ControllerEvent::StartedWallClimbing),
            Some(WallClimbTransition::Stopped) => events.push(ControllerEvent::StoppedWallClimbing),
            None => {}
        }

        self.tick_counters(dt);
    }

    fn tick_counters(&mut self, dt: f32) {
        self.jump.tick(dt, self.ground.is_grounded());
        self.wall_jump.tick(dt);
    }

    /// Drop every mode and timer, restoring the standing collider
    fn reset_modes(&mut self, body: &mut impl CharacterBody) {
        self.mantle.cancel(body);
        self.slide.cancel(body);
        self.wall_run.clear();
        self.wall_climb.reset();
        self.jump.reset();
        self.wall_jump.reset();
        self.ground.reset();
        self.launch_pads.rearm();
    }

    /// Snapshot of the current motion state for readouts and logs
    pub fn state(&self) -> MotionState {
        MotionState {
            grounded: self.ground.is_grounded(),
            wall_run: self.wall_run.side(),
            sliding: self.slide.is_sliding(),
            mantling: self.mantle.is_mantling(),
            wall_climbing: self.wall_climb.is_climbing(),
            horizontal_speed: self.horizontal_speed,
            mantle_progress: self.mantle.progress(),
        }
    }

    /// Grounded as of the last tick
    pub fn is_grounded(&self) -> bool {
        self.ground.is_grounded()
    }

    /// Normal of the last walkable surface touched, straight up before the
    /// first landing
    pub fn ground_normal(&self) -> Vec3 {
        self.ground.ground_normal()
    }

    /// Whether the slide is engaged, collider morph included
    pub fn is_sliding(&self) -> bool {
        self.slide.is_sliding()
    }

    /// Whether a wall-run is active on either side
    pub fn is_wall_running(&self) -> bool {
        self.wall_run.is_wall_running()
    }

    /// Side of the active wall-run
    pub fn wall_run_side(&self) -> Option<WallSide> {
        self.wall_run.side()
    }

    /// True while a ledge traversal owns the body
    pub fn is_mantling(&self) -> bool {
        self.mantle.is_mantling()
    }

    /// Whether a boosted wall climb is running
    pub fn is_wall_climbing(&self) -> bool {
        self.wall_climb.is_climbing()
    }

    /// Horizontal speed at the end of the last tick
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_speed
    }

    /// Fraction of the current mantle completed, 0 when not mantling
    pub fn mantle_progress(&self) -> f32 {
        self.mantle.progress()
    }

    /// Eased camera anchor offset, local to the body pivot
    pub fn camera_anchor_offset(&self) -> Vec3 {
        self.slide.camera_anchor()
    }

    /// Yaw applied to the body on the last tick
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Remaining same-wall cooldown and the wall it applies to
    pub fn wall_jump_cooldown(&self) -> (Option<SurfaceId>, f32) {
        (self.wall_jump.last_wall(), self.wall_jump.cooldown_remaining())
    }

    /// Whether a jump press is waiting for a legal moment
    pub fn is_jump_buffered(&self) -> bool {
        self.jump.is_buffered()
    }
}

impl std::fmt::Debug for CharacterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterController")
            .field("state", &self.state())
            .field("heading", &self.heading)
            .field("listeners", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MovementConfig;
    use crate::error::ConfigError;
    use glam::Vec2;
    use parkour_core::{CapsuleShape, PointMassBody};

    const DT: f32 = 1.0 / 60.0;
    const FLOOR: SurfaceId = SurfaceId(1);

    fn floor() -> Vec<ContactSample> {
        vec![ContactSample::new(Vec3::ZERO, Vec3::Y, FLOOR)]
    }

    fn body() -> PointMassBody {
        PointMassBody::new(Vec3::ZERO, Vec3::new(0.0, -9.81, 0.0))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ControllerConfig {
            movement: MovementConfig {
                top_speed: -1.0,
                ..MovementConfig::default()
            },
            ..ControllerConfig::default()
        };
        assert!(matches!(
            CharacterController::new(config),
            Err(ControllerError::InvalidConfig(ConfigError::NotPositive { .. }))
        ));
    }

    #[test]
    fn test_heading_follows_camera() {
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut body = body();
        controller.tick(&mut body, &floor(), 90.0, DT);
        assert_eq!(body.heading.yaw_degrees(), 90.0);
        assert_eq!(controller.heading().yaw_degrees(), 90.0);
    }

    #[test]
    fn test_landing_and_grounded_gravity() {
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut body = body();

        let events = controller.tick_with(&mut body, &floor(), &InputSnapshot::default(), 0.0, DT);
        assert_eq!(events, vec![ControllerEvent::Landed]);
        assert!(controller.is_grounded());
        // No gravity while standing on flat ground
        assert_eq!(body.pending_acceleration(), Vec3::ZERO);

        let events = controller.tick_with(&mut body, &floor(), &InputSnapshot::default(), 0.0, DT);
        assert!(events.is_empty());
    }

    #[test]
    fn test_running_accelerates_forward() {
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut body = body();
        let run = InputSnapshot::new(Vec2::Y, false, false);

        for _ in 0..120 {
            controller.tick_with(&mut body, &floor(), &run, 0.0, DT);
            body.integrate(DT);
        }
        // Settles close to top speed along -Z
        assert!(body.velocity.z < -7.5);
        assert!((controller.horizontal_speed() - 8.0).abs() < 0.5);
    }

    #[test]
    fn test_listeners_receive_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        controller.subscribe(move |event: ControllerEvent| sink.borrow_mut().push(event));

        let mut body = body();
        controller.input_mut().press_jump();
        controller.tick(&mut body, &floor(), 0.0, DT);

        assert_eq!(
            *seen.borrow(),
            vec![ControllerEvent::Landed, ControllerEvent::Jumped]
        );
    }

    #[test]
    fn test_respawn_resets_modes() {
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut body = body();
        controller.tick_with(&mut body, &floor(), &InputSnapshot::new(Vec2::ZERO, false, true), 0.0, DT);
        assert!(controller.is_sliding());

        body.position = Vec3::new(0.0, -20.0, 0.0);
        body.velocity = Vec3::new(0.0, -30.0, 0.0);
        let events = controller.tick_with(&mut body, &[], &InputSnapshot::default(), 0.0, DT);

        assert_eq!(events, vec![ControllerEvent::Respawned]);
        assert!(!controller.is_sliding());
        assert_eq!(body.collider, CapsuleShape::default());
        assert_eq!(body.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
