//! The running clock: owns the scene, renderer, camera and per-frame state.

use glam::Vec3;

use gimbal_engine::camera::{OrbitControls, PerspectiveCamera};
use gimbal_engine::coords::Viewport;
use gimbal_engine::core::{App, AppControl, FrameCtx};
use gimbal_engine::environment::EnvironmentMap;
use gimbal_engine::input::{InputFrame, InputState, Key, MouseButton};
use gimbal_engine::paint::Color;
use gimbal_engine::render::MeshRenderer;
use gimbal_engine::scene::SceneGraph;
use gimbal_engine::time::FrameRateMeter;

use crate::assembly::build_clock;
use crate::dial::WallTime;
use crate::pointer::PointerTracker;
use crate::updater::FrameUpdater;

const BACKGROUND: u32 = 0x212121;
const CAMERA_FOV_DEGREES: f32 = 45.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);

pub struct ClockSession {
    scene: SceneGraph,
    renderer: MeshRenderer,
    camera: PerspectiveCamera,
    orbit: OrbitControls,
    updater: FrameUpdater,
    pointer: PointerTracker,
    background: Color,
    frame_rate: FrameRateMeter,
}

impl ClockSession {
    /// Builds the scene and queues `environment` for upload on the first frame.
    pub fn new(environment: EnvironmentMap, viewport: Viewport, exposure: f32) -> Self {
        let mut scene = SceneGraph::new();
        let nodes = build_clock(&mut scene);

        let mut renderer = MeshRenderer::new();
        renderer.set_environment(environment);
        renderer.set_exposure(exposure);

        let camera = PerspectiveCamera::new(
            CAMERA_FOV_DEGREES,
            viewport.aspect(),
            CAMERA_NEAR,
            CAMERA_FAR,
            CAMERA_POSITION,
        );
        let orbit = OrbitControls::from_camera(&camera);

        Self {
            scene,
            renderer,
            camera,
            orbit,
            updater: FrameUpdater::new(nodes),
            pointer: PointerTracker::new(),
            background: Color::from_hex(BACKGROUND),
            frame_rate: FrameRateMeter::new(5.0),
        }
    }

    /// Routes one frame of input: pointer offset, orbit camera and shortcuts.
    fn apply_input(
        &mut self,
        input: &InputState,
        frame: &InputFrame,
        viewport: Viewport,
    ) -> AppControl {
        if frame.keys_pressed.contains(&Key::Escape) {
            log::info!("escape pressed, exiting");
            return AppControl::Exit;
        }

        self.pointer.apply_events(&frame.events, viewport);

        if frame.keys_pressed.contains(&Key::R) {
            self.orbit.reset();
        }

        if input.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            if dx != 0.0 || dy != 0.0 {
                self.orbit.rotate(dx, dy, viewport.height);
            }
        }

        self.orbit.dolly(frame.wheel_lines);
        self.orbit.apply(&mut self.camera);
        self.camera.set_aspect(viewport.aspect());

        AppControl::Continue
    }

    /// Advances ring smoothing and clock hands, then refreshes world transforms.
    fn advance(&mut self, time: WallTime) {
        self.updater.update(&mut self.scene, self.pointer.offset(), time);
        self.scene.update_world_transforms();
    }
}

impl App for ClockSession {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();

        if self.apply_input(ctx.input, ctx.input_frame, viewport) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.advance(WallTime::now());

        if let Some(fps) = self.frame_rate.record(&ctx.time) {
            log::debug!("{fps:.1} fps");
        }

        let renderer = &mut self.renderer;
        let camera = &self.camera;
        let scene = &self.scene;

        ctx.render(self.background, |rctx, target| {
            renderer.render(rctx, target, camera, scene);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gimbal_engine::environment::EquirectImage;
    use gimbal_engine::input::{
        InputEvent, KeyState, MouseButtonState, MouseWheelDelta, PointerButtonEvent,
        PointerMoveEvent,
    };

    use crate::rings::RingKind;

    const VIEW: Viewport = Viewport::new(1000.0, 500.0);

    fn session() -> ClockSession {
        let sky = EquirectImage {
            width: 4,
            height: 2,
            texels: vec![[0.5; 3]; 8],
        };
        ClockSession::new(EnvironmentMap::from_radiance(sky), VIEW, 1.25)
    }

    fn feed(
        session: &mut ClockSession,
        state: &mut InputState,
        events: Vec<InputEvent>,
    ) -> AppControl {
        let mut frame = InputFrame::default();
        for ev in events {
            state.apply_event(&mut frame, ev);
        }
        session.apply_input(state, &frame, VIEW)
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn escape_exits() {
        let mut s = session();
        let mut state = InputState::default();
        assert_eq!(feed(&mut s, &mut state, vec![key(Key::Escape)]), AppControl::Exit);
    }

    #[test]
    fn pointer_moves_drive_ring_targets() {
        let mut s = session();
        let mut state = InputState::default();
        let moved = InputEvent::PointerMoved(PointerMoveEvent { x: 1000.0, y: 250.0 });
        assert_eq!(feed(&mut s, &mut state, vec![moved]), AppControl::Continue);

        s.advance(WallTime::new(12, 0, 0));
        let inner = s.updater.rings().get(RingKind::Inner);
        assert!((inner.yaw - 0.5 * 1.2 * 0.05).abs() < 1e-6);
        assert_eq!(inner.pitch, 0.0);
    }

    #[test]
    fn drag_orbits_and_r_resets() {
        let mut s = session();
        let mut state = InputState::default();

        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 500.0,
            y: 250.0,
        });
        let hover = InputEvent::PointerMoved(PointerMoveEvent { x: 500.0, y: 250.0 });
        let drag = InputEvent::PointerMoved(PointerMoveEvent { x: 375.0, y: 250.0 });
        feed(&mut s, &mut state, vec![hover, press, drag]);

        // A quarter of the viewport height swings the camera a quarter turn.
        assert!((s.camera.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);

        feed(&mut s, &mut state, vec![key(Key::R)]);
        assert!((s.camera.position - CAMERA_POSITION).length() < 1e-3);
    }

    #[test]
    fn press_before_first_move_does_not_jump_camera() {
        let mut s = session();
        let mut state = InputState::default();

        // Button events carry (0, 0) until the cursor position is known.
        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        });
        let first_move = InputEvent::PointerMoved(PointerMoveEvent { x: 501.0, y: 250.0 });
        feed(&mut s, &mut state, vec![press, first_move]);

        assert!((s.camera.position - CAMERA_POSITION).length() < 1e-4);
    }

    #[test]
    fn wheel_dollies_toward_target() {
        let mut s = session();
        let mut state = InputState::default();
        let wheel = InputEvent::MouseWheel { delta: MouseWheelDelta::Line { x: 0.0, y: 2.0 } };
        feed(&mut s, &mut state, vec![wheel]);
        assert!((s.camera.position.z - 10.0 * 0.95 * 0.95).abs() < 1e-4);
    }

    #[test]
    fn camera_matches_viewport_aspect() {
        let s = session();
        assert_eq!(s.camera.aspect, 2.0);
        assert_eq!(s.camera.position, CAMERA_POSITION);
        assert!(s.renderer.has_environment());
        assert_eq!(s.renderer.exposure(), 1.25);
    }
}
