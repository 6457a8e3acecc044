//! Synchronizer behavior against recording test doubles

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3, Vec4};
use physics::{BodyPose, DebugRenderBuffers};
use render::LineSystemOptions;
use runtime::sync::{FrameSynchronizer, OverlayPort, SimulationPort, SyncError, OVERLAY_NAME};
use runtime::DebugBufferError;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    ReadTranslation,
    ReadRotation,
    DebugRender,
    Step,
    Reset(BodyPose),
    SetPose(Vec3, Quat),
    Create(String, usize),
    Update(u32, usize),
}

type Log = Rc<RefCell<Vec<Call>>>;

/// Body falls one unit and spins a little on every step; the debug buffer
/// carries the number of completed steps in its first coordinate.
struct MockSim {
    log: Log,
    translation: Vec3,
    rotation: Quat,
    linvel: Vec3,
    angvel: Vec3,
    steps: u32,
    ragged: bool,
}

impl MockSim {
    fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            translation: Vec3::new(2.5, 5.0, 0.0),
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            steps: 0,
            ragged: false,
        }
    }
}

impl SimulationPort for MockSim {
    type Body = u8;
    type Collider = u16;

    fn body_translation(&self, _body: u8) -> Result<Vec3, SyncError> {
        self.log.borrow_mut().push(Call::ReadTranslation);
        Ok(self.translation)
    }

    fn collider_rotation(&self, _collider: u16) -> Result<Quat, SyncError> {
        self.log.borrow_mut().push(Call::ReadRotation);
        Ok(self.rotation)
    }

    fn debug_render(&mut self) -> DebugRenderBuffers {
        self.log.borrow_mut().push(Call::DebugRender);
        let mut vertices = vec![self.steps as f32, 0.0, 0.0, 0.0, 1.0, 0.0];
        if self.ragged {
            vertices.pop();
        }
        DebugRenderBuffers {
            vertices,
            colors: vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
        }
    }

    fn step(&mut self) {
        self.log.borrow_mut().push(Call::Step);
        self.steps += 1;
        self.translation.y -= 1.0;
        self.rotation = (self.rotation * Quat::from_rotation_z(0.05)).normalize();
        self.linvel = Vec3::new(0.0, -3.0, 0.0);
        self.angvel = Vec3::new(0.0, 0.0, 1.0);
    }

    fn reset_body(&mut self, _body: u8, pose: &BodyPose) -> Result<(), SyncError> {
        self.log.borrow_mut().push(Call::Reset(*pose));
        self.translation = pose.translation;
        self.rotation = pose.rotation;
        self.linvel = pose.linvel;
        self.angvel = pose.angvel;
        Ok(())
    }
}

#[derive(Default)]
struct MockOverlay {
    log: Log,
    pose: Option<(Vec3, Quat)>,
    line_systems: Vec<(Vec<Vec<Vec3>>, Vec<Vec<Vec4>>)>,
}

impl OverlayPort for MockOverlay {
    type Mesh = u32;

    fn set_pose(&mut self, _mesh: u32, position: Vec3, rotation: Quat) -> Result<(), SyncError> {
        self.log.borrow_mut().push(Call::SetPose(position, rotation));
        self.pose = Some((position, rotation));
        Ok(())
    }

    fn create_line_system(
        &mut self,
        name: &str,
        options: LineSystemOptions,
    ) -> Result<u32, SyncError> {
        assert!(options.updatable);
        let points = options.lines.iter().map(Vec::len).sum();
        self.log
            .borrow_mut()
            .push(Call::Create(name.to_owned(), points));
        self.line_systems.push((options.lines, options.colors));
        // ids start away from zero so they cannot be confused with the sphere
        Ok(100 + self.line_systems.len() as u32 - 1)
    }

    fn update_line_system(
        &mut self,
        mesh: u32,
        lines: Vec<Vec<Vec3>>,
        colors: Vec<Vec<Vec4>>,
    ) -> Result<(), SyncError> {
        let points = lines.iter().map(Vec::len).sum();
        self.log.borrow_mut().push(Call::Update(mesh, points));
        self.line_systems[(mesh - 100) as usize] = (lines, colors);
        Ok(())
    }
}

const SPAWN: Vec3 = Vec3::new(2.5, 5.0, 0.0);

fn setup() -> (Log, MockSim, MockOverlay, FrameSynchronizer<u8, u16, u32>) {
    let log = Log::default();
    let sim = MockSim::new(&log);
    let overlay = MockOverlay {
        log: log.clone(),
        ..MockOverlay::default()
    };
    let sync = FrameSynchronizer::new(7, 9, 0, BodyPose::at_rest(SPAWN), 400);
    (log, sim, overlay, sync)
}

#[test]
fn counter_reaches_interval_then_wraps_to_zero() {
    let (_log, mut sim, mut overlay, mut sync) = setup();
    assert_eq!(sync.frame(), 0);

    for i in 1..=400 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
        assert_eq!(sync.frame(), i);
    }
    assert_eq!(sync.resets(), 0);

    sync.on_before_render(&mut sim, &mut overlay).unwrap();
    assert_eq!(sync.frame(), 0);
    assert_eq!(sync.resets(), 1);

    sync.on_before_render(&mut sim, &mut overlay).unwrap();
    assert_eq!(sync.frame(), 1);
}

#[test]
fn counter_stays_in_range_over_many_cycles() {
    let (_log, mut sim, mut overlay, mut sync) = setup();
    for _ in 0..1203 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
        assert!(sync.frame() <= 400);
    }
    assert_eq!(sync.resets(), 3);
    assert_eq!(sync.frame(), 0);
}

#[test]
fn reset_restores_spawn_pose_exactly() {
    let (log, mut sim, mut overlay, mut sync) = setup();
    for _ in 0..401 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
    }

    assert_eq!(sim.translation, SPAWN);
    assert_eq!(sim.rotation, Quat::IDENTITY);
    assert_eq!(sim.linvel, Vec3::ZERO);
    assert_eq!(sim.angvel, Vec3::ZERO);

    let resets: Vec<_> = log
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Reset(_)))
        .cloned()
        .collect();
    assert_eq!(resets, vec![Call::Reset(BodyPose::at_rest(SPAWN))]);
}

#[test]
fn reset_happens_after_step_and_replaces_increment() {
    let (log, mut sim, mut overlay, mut sync) = setup();
    for _ in 0..400 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
    }
    log.borrow_mut().clear();

    sync.on_before_render(&mut sim, &mut overlay).unwrap();
    let calls = log.borrow();
    let tail = &calls[calls.len() - 2..];
    assert_eq!(tail[0], Call::Step);
    assert!(matches!(tail[1], Call::Reset(_)));
}

#[test]
fn overlay_created_once_then_updated_in_place() {
    let (log, mut sim, mut overlay, mut sync) = setup();
    assert_eq!(sync.overlay(), None);

    for _ in 0..10 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
    }

    assert_eq!(overlay.line_systems.len(), 1);
    assert_eq!(sync.overlay(), Some(100));

    let calls = log.borrow();
    let creates: Vec<_> = calls
        .iter()
        .filter(|c| matches!(c, Call::Create(..)))
        .collect();
    assert_eq!(creates, vec![&Call::Create(OVERLAY_NAME.to_owned(), 2)]);
    let updates = calls
        .iter()
        .filter(|c| matches!(c, Call::Update(100, 2)))
        .count();
    assert_eq!(updates, 9);
}

#[test]
fn visual_pose_mirrors_pre_step_state() {
    let (_log, mut sim, mut overlay, mut sync) = setup();
    for _ in 0..25 {
        let expected = (sim.translation, sim.rotation);
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
        assert_eq!(overlay.pose, Some(expected));
        assert_ne!(sim.translation, expected.0);
    }
}

#[test]
fn frame_calls_run_in_order() {
    let (log, mut sim, mut overlay, mut sync) = setup();
    sync.on_before_render(&mut sim, &mut overlay).unwrap();
    sync.on_before_render(&mut sim, &mut overlay).unwrap();

    let pose = |y: f32, q: Quat| Call::SetPose(Vec3::new(2.5, y, 0.0), q);
    let first_rotation = Quat::from_rotation_z(0.05).normalize();
    assert_eq!(
        *log.borrow(),
        vec![
            Call::ReadTranslation,
            Call::ReadRotation,
            pose(5.0, Quat::IDENTITY),
            Call::DebugRender,
            Call::Create(OVERLAY_NAME.to_owned(), 2),
            Call::Step,
            Call::ReadTranslation,
            Call::ReadRotation,
            pose(4.0, first_rotation),
            Call::DebugRender,
            Call::Update(100, 2),
            Call::Step,
        ]
    );
}

#[test]
fn overlay_shows_geometry_captured_before_step() {
    let (_log, mut sim, mut overlay, mut sync) = setup();
    for frame in 0..5_u32 {
        sync.on_before_render(&mut sim, &mut overlay).unwrap();
        let (lines, colors) = &overlay.line_systems[0];
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0].x, frame as f32);
        assert_eq!(colors[0][0], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(colors[0][1], Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}

#[test]
fn malformed_debug_buffer_is_fatal_and_keeps_counter() {
    let (log, mut sim, mut overlay, mut sync) = setup();
    sync.on_before_render(&mut sim, &mut overlay).unwrap();
    sim.ragged = true;
    log.borrow_mut().clear();

    let err = sync.on_before_render(&mut sim, &mut overlay).unwrap_err();
    assert!(matches!(
        err,
        SyncError::DebugBuffer(DebugBufferError::Misaligned { buffer: "vertex", .. })
    ));
    assert_eq!(sync.frame(), 1);
    assert!(!log.borrow().contains(&Call::Step));
}

#[test]
fn custom_interval_is_honored() {
    let (_log, mut sim, mut overlay, _) = setup();
    let mut sync = FrameSynchronizer::new(7_u8, 9_u16, 0_u32, BodyPose::at_rest(SPAWN), 3);
    let frames: Vec<u32> = (0..8)
        .map(|_| {
            sync.on_before_render(&mut sim, &mut overlay).unwrap();
            sync.frame()
        })
        .collect();
    assert_eq!(frames, vec![1, 2, 3, 0, 1, 2, 3, 0]);
}
