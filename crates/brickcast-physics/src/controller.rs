//! First-person camera with gravity and swept voxel collision.

use brickcast_core::{CameraPose, OccupancyQuery};
use glam::{EulerRot, IVec3, Mat4, Quat, Vec2, Vec3};
use tracing::trace;

use crate::config::MovementConfig;
use crate::sweep::sweep;

/// Default heading, looking down -X.
const DEFAULT_YAW: f32 = -90.0;
/// Pitch limit in degrees when constrained.
const PITCH_LIMIT: f32 = 89.0;
/// Scale applied to normalized view-space coordinates.
const SCREEN_SCALE: f32 = 1.5;

/// Abstract movement input, independent of any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Per-frame camera state: orientation, vertical velocity and contacts.
///
/// Angles are in degrees. All collision queries go through an
/// [`OccupancyQuery`] over a grid of `grid_size` voxels, each
/// `config.voxel_size` wide.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub world_up: Vec3,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical velocity in units per second
    pub y_velocity: f32,
    /// When set, gravity and collision are bypassed
    pub no_clip: bool,
    grounded: bool,
    head_blocked: bool,
    config: MovementConfig,
}

impl CameraController {
    /// Create a camera at `position` with the default heading, in no-clip mode.
    pub fn new(position: Vec3, config: MovementConfig) -> Self {
        let mut camera = Self {
            position,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            y_velocity: 0.0,
            no_clip: true,
            grounded: false,
            head_blocked: false,
            config,
        };
        camera.update_vectors();
        camera
    }

    /// Create a camera from a pose recovered at load time.
    pub fn from_pose(pose: CameraPose, config: MovementConfig) -> Self {
        let mut camera = Self::new(pose.position, config);
        camera.yaw = pose.yaw;
        camera.pitch = pose.pitch;
        camera.update_vectors();
        camera
    }

    #[inline]
    pub const fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Returns true if the last contact check found floor directly below.
    #[inline]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Returns true if the last contact check found a ceiling directly above.
    #[inline]
    pub const fn is_head_blocked(&self) -> bool {
        self.head_blocked
    }

    /// Current pose, suitable for saving or handing to a renderer.
    pub const fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Advance vertical motion by one frame.
    ///
    /// Applies gravity while airborne, then moves vertically by
    /// `|y_velocity| * dt`. Does nothing in no-clip mode.
    pub fn update<Q>(&mut self, dt: f32, world: &Q, grid_size: IVec3)
    where
        Q: OccupancyQuery + ?Sized,
    {
        if self.no_clip {
            return;
        }
        if !self.grounded {
            self.y_velocity -= self.config.gravity * dt;
        }

        let amount = self.y_velocity.abs() * dt;
        if amount > 0.0 {
            let direction = Vec3::new(0.0, self.y_velocity.signum(), 0.0);
            self.move_by(direction, amount, world, grid_size);
        } else {
            // Standing still: the floor may still have gone away.
            self.refresh_contacts(world, grid_size);
        }
    }

    /// Apply one frame of directional input.
    pub fn process_keyboard<Q>(
        &mut self,
        direction: MoveDirection,
        dt: f32,
        world: &Q,
        grid_size: IVec3,
    ) where
        Q: OccupancyQuery + ?Sized,
    {
        let amount = self.movement_speed * dt;
        let forward = self.right.cross(self.world_up).normalize_or_zero();

        match direction {
            MoveDirection::Forward => self.move_by(forward, amount, world, grid_size),
            MoveDirection::Backward => self.move_by(-forward, amount, world, grid_size),
            MoveDirection::Left => self.move_by(-self.right, amount, world, grid_size),
            MoveDirection::Right => self.move_by(self.right, amount, world, grid_size),
            MoveDirection::Up if self.no_clip => {
                self.move_by(self.world_up, amount, world, grid_size);
            }
            MoveDirection::Down if self.no_clip => {
                self.move_by(-self.world_up, amount, world, grid_size);
            }
            MoveDirection::Up => {
                if self.grounded {
                    self.y_velocity = self.config.jump_force;
                    trace!(velocity = self.y_velocity, "jump");
                }
            }
            MoveDirection::Down => {}
        }
    }

    /// Translate by up to `amount` along `direction`, colliding with the world.
    ///
    /// A non-positive amount or a zero direction is a no-op, including for
    /// the contact flags.
    pub fn move_by<Q>(&mut self, direction: Vec3, amount: f32, world: &Q, grid_size: IVec3)
    where
        Q: OccupancyQuery + ?Sized,
    {
        if amount <= 0.0 || amount.is_nan() {
            return;
        }
        let Some(direction) = direction.try_normalize() else {
            return;
        };

        if self.no_clip {
            self.position += direction * amount;
            return;
        }

        let step = self.config.effective_clamp_step();
        let mut remaining = amount;
        let mut target = sweep(self.position, direction, remaining, world, grid_size, &self.config);
        while world.is_occupied(target) {
            remaining -= step;
            if remaining <= 0.0 {
                trace!(position = ?self.position, "no free position along move, staying put");
                target = self.position;
                break;
            }
            target = sweep(self.position, direction, remaining, world, grid_size, &self.config);
        }
        self.position = target;

        self.refresh_contacts(world, grid_size);
    }

    /// Re-probe floor and ceiling contacts at the current position.
    ///
    /// Landing, or newly touching a ceiling, zeroes vertical velocity.
    pub fn refresh_contacts<Q>(&mut self, world: &Q, grid_size: IVec3)
    where
        Q: OccupancyQuery + ?Sized,
    {
        let grounded = self.probe_contact(Vec3::NEG_Y, world, grid_size);
        let head_blocked = self.probe_contact(Vec3::Y, world, grid_size);

        let landed = grounded && !self.grounded;
        let bumped = head_blocked && !self.head_blocked;
        if landed || bumped {
            trace!(
                landed,
                bumped,
                velocity = self.y_velocity,
                "vertical contact"
            );
            self.y_velocity = 0.0;
        }

        self.grounded = grounded;
        self.head_blocked = head_blocked;
    }

    fn probe_contact<Q>(&self, direction: Vec3, world: &Q, grid_size: IVec3) -> bool
    where
        Q: OccupancyQuery + ?Sized,
    {
        let probed = sweep(
            self.position,
            direction,
            self.config.probe_distance,
            world,
            grid_size,
            &self.config,
        );
        probed.distance(self.position) <= self.config.contact_epsilon
    }

    /// Rotate the view by a mouse offset.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Scale movement speed by a scroll offset.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.movement_speed += 0.1 * self.movement_speed * y_offset;
    }

    /// Orientation as a quaternion (yaw about Y, then pitch about X).
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            (-self.pitch).to_radians(),
            0.0,
        )
    }

    /// Left-handed view matrix: `right` maps to +X and `front` to +Z, the
    /// same frame [`Self::world_to_screen`] projects in.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.front, self.up)
    }

    /// Project a world point to screen space, centered at the origin.
    ///
    /// X is divided by the aspect ratio; points behind the camera are not
    /// clipped.
    pub fn world_to_screen(&self, point: Vec3, width: u32, height: u32) -> Vec2 {
        let local = (self.rotation().inverse() * (point - self.position)).normalize_or_zero();
        let aspect = width as f32 / height.max(1) as f32;
        Vec2::new(local.x / aspect, local.y) / local.z.max(1e-5) * SCREEN_SCALE
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
        .normalize();
        self.right = (-self.front).cross(self.world_up).normalize_or_zero();
        self.up = self.front.cross(self.right).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GRID: IVec3 = IVec3::splat(32);

    fn floor(p: Vec3) -> bool {
        p.y < 1.0
    }

    fn walking_at(position: Vec3) -> CameraController {
        let mut camera = CameraController::new(position, MovementConfig::default());
        camera.no_clip = false;
        camera
    }

    #[test]
    fn starts_in_no_clip() {
        let camera = CameraController::new(Vec3::ZERO, MovementConfig::default());
        assert!(camera.no_clip);
        assert!(!camera.is_grounded());
        assert_abs_diff_eq!(camera.front.x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.up.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn resting_on_floor_becomes_grounded() {
        let mut camera = walking_at(Vec3::new(2.0, 1.05, 2.0));
        camera.update(1.0 / 60.0, &floor, GRID);
        assert!(camera.is_grounded());
        assert_eq!(camera.y_velocity, 0.0);
        assert_abs_diff_eq!(camera.position.y, 1.05, epsilon = 1e-3);
    }

    #[test]
    fn falls_and_lands() {
        let mut camera = walking_at(Vec3::new(2.0, 3.0, 2.0));
        camera.update(1.0 / 60.0, &floor, GRID);
        assert!(camera.y_velocity < 0.0);
        assert!(camera.position.y < 3.0);

        for _ in 0..200 {
            camera.update(1.0 / 60.0, &floor, GRID);
            assert!(camera.position.y >= 1.0, "fell through: {}", camera.position);
        }
        assert!(camera.is_grounded());
        assert_eq!(camera.y_velocity, 0.0);
        assert_abs_diff_eq!(camera.position.y, 1.05, epsilon = 1e-3);
    }

    #[test]
    fn jump_needs_ground() {
        let mut camera = walking_at(Vec3::new(2.0, 2.0, 2.0));
        camera.process_keyboard(MoveDirection::Up, 0.1, &floor, GRID);
        assert_eq!(camera.y_velocity, 0.0);

        let mut camera = walking_at(Vec3::new(2.0, 1.05, 2.0));
        camera.update(1.0 / 60.0, &floor, GRID);
        camera.process_keyboard(MoveDirection::Up, 0.1, &floor, GRID);
        assert_eq!(camera.y_velocity, 1.2);
        camera.update(1.0 / 60.0, &floor, GRID);
        assert!(camera.position.y > 1.05);
    }

    #[test]
    fn ceiling_stops_upward_motion() {
        let room = |p: Vec3| p.y < 1.0 || p.y >= 2.0;
        let mut camera = walking_at(Vec3::new(2.0, 1.9, 2.0));
        camera.y_velocity = 1.2;

        let mut bumped = false;
        for _ in 0..30 {
            camera.update(1.0 / 60.0, &room, GRID);
            assert!(camera.position.y <= 1.95 + 1e-4, "{}", camera.position);
            if camera.is_head_blocked() {
                bumped = true;
                assert!(camera.y_velocity <= 0.0);
            }
        }
        assert!(bumped);
    }

    #[test]
    fn wall_stops_a_tunneling_move() {
        let world = |p: Vec3| floor(p) || p.x >= 3.0;
        let mut camera = walking_at(Vec3::new(2.5, 1.05, 2.0));
        camera.move_by(Vec3::X, 5.0, &world, GRID);
        assert!(camera.position.x <= 3.0 - 0.05 + 1e-4, "{}", camera.position);
        assert!(camera.position.x > 2.9);
        assert!(camera.is_grounded());
    }

    #[test]
    fn diagonal_walk_slides_along_a_touched_wall() {
        let world = |p: Vec3| floor(p) || p.x >= 3.0;
        let mut camera = walking_at(Vec3::new(2.5, 1.05, 2.0));
        camera.update(1.0 / 60.0, &world, GRID);

        let mut last_z = camera.position.z;
        for frame in 0..20 {
            camera.move_by(Vec3::new(1.0, 0.0, 1.0), 0.1, &world, GRID);
            assert!(camera.position.x <= 2.95 + 1e-4, "frame {frame}: {}", camera.position);
            assert!(camera.position.z > last_z + 0.05, "frame {frame}: {}", camera.position);
            last_z = camera.position.z;
        }
        assert_abs_diff_eq!(camera.position.x, 2.95, epsilon = 1e-3);
        assert!(camera.is_grounded());
    }

    #[test]
    fn zero_move_changes_nothing() {
        let mut camera = walking_at(Vec3::new(2.0, 1.05, 2.0));
        let before = camera.clone();
        camera.move_by(Vec3::X, 0.0, &floor, GRID);
        camera.move_by(Vec3::ZERO, 1.0, &floor, GRID);
        assert_eq!(camera.position, before.position);
        assert_eq!(camera.is_grounded(), before.is_grounded());
        assert_eq!(camera.is_head_blocked(), before.is_head_blocked());
    }

    #[test]
    fn no_clip_ignores_geometry() {
        let solid = |_: Vec3| true;
        let mut camera = CameraController::new(Vec3::new(1.0, 1.0, 1.0), MovementConfig::default());
        camera.update(1.0, &solid, GRID);
        assert_eq!(camera.position, Vec3::ONE);

        camera.move_by(Vec3::new(0.0, 0.0, 2.0), 3.0, &solid, GRID);
        assert_abs_diff_eq!(camera.position.z, 4.0, epsilon = 1e-6);
        camera.process_keyboard(MoveDirection::Down, 1.0, &solid, GRID);
        assert_abs_diff_eq!(camera.position.y, 1.0 - 2.5, epsilon = 1e-5);
    }

    #[test]
    fn keyboard_moves_relative_to_heading() {
        let mut camera = CameraController::from_pose(
            CameraPose {
                position: Vec3::splat(2.0),
                yaw: 0.0,
                pitch: 45.0,
            },
            MovementConfig::default(),
        );
        camera.process_keyboard(MoveDirection::Forward, 0.4, &floor, GRID);
        // Forward stays horizontal even when looking up.
        assert_abs_diff_eq!(camera.position.z, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.position.y, 2.0, epsilon = 1e-5);
        camera.process_keyboard(MoveDirection::Right, 0.4, &floor, GRID);
        assert_abs_diff_eq!(camera.position.x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn mouse_input() {
        let mut camera = CameraController::new(Vec3::ZERO, MovementConfig::default());
        camera.process_mouse_movement(900.0, 10_000.0, true);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        assert_abs_diff_eq!(camera.yaw, 0.0, epsilon = 1e-4);
        camera.process_mouse_movement(0.0, -10_000.0, false);
        assert_abs_diff_eq!(camera.pitch, 89.0 - 1000.0, epsilon = 1e-3);

        camera.process_mouse_scroll(1.0);
        assert_abs_diff_eq!(camera.movement_speed, 2.75, epsilon = 1e-6);
    }

    #[test]
    fn rotation_matches_front() {
        let mut camera = CameraController::new(Vec3::ZERO, MovementConfig::default());
        camera.yaw = 30.0;
        camera.pitch = 20.0;
        camera.update_vectors();
        let forward = camera.rotation() * Vec3::Z;
        assert_abs_diff_eq!(forward.x, camera.front.x, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, camera.front.y, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, camera.front.z, epsilon = 1e-5);

        let view = camera.view_matrix();
        assert_abs_diff_eq!(view.transform_point3(camera.front).z, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(view.transform_point3(camera.right).x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(view.transform_point3(camera.up).y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn world_to_screen_projection() {
        let pose = CameraPose {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        };
        let camera = CameraController::from_pose(pose, MovementConfig::default());
        let center = camera.world_to_screen(Vec3::new(0.0, 0.0, 5.0), 800, 600);
        assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-6);

        let off = camera.world_to_screen(Vec3::new(1.0, 0.0, 1.0), 100, 100);
        assert_abs_diff_eq!(off.x, 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(off.y, 0.0, epsilon = 1e-6);
    }
}
