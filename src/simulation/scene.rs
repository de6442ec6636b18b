use crate::generation::{RingInterval, StarPoint};
use crate::rendering::camera::{Camera, OrbitControls};
use crate::rendering::mesh::{self, MeshData};
use crate::simulation::InputState;
use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

// ---------------------------------------------------------------------------
// Scene Parameters (compile-time configuration, not runtime surface)
// ---------------------------------------------------------------------------
pub const ACCRETION_MIN_DISTANCE: f32 = 2.0;
pub const ACCRETION_MAX_DISTANCE: f32 = 5.0;
pub const ACCRETION_GAP: f32 = 0.01;

pub const STAR_COUNT: usize = 1000;
pub const STAR_INNER_RADIUS: f32 = 25.0;
pub const STAR_OUTER_RADIUS: f32 = 250.0;

const HOLE_RADIUS: f32 = 1.0;
const STAR_RADIUS: f32 = 0.1;

const LOBE_TOP_RADIUS: f32 = 2.0;
const LOBE_BOTTOM_RADIUS: f32 = 0.25;
const LOBE_LENGTH: f32 = 35.0;
const LOBE_TILT: f32 = 1.5; // radians about X, mirrored per pole
const LOBE_AXIAL_OFFSET: f32 = 18.0;
const LOBE_VERTICAL_OFFSET: f32 = 1.25;
const LOBE_OPACITY: f32 = 0.25;

const RING_SEGMENTS: u32 = 64;
const RING_THETA_LENGTH: f32 = 5.0; // radians of arc per ring segment

const CAMERA_START: Vec3 = Vec3::new(100.0, 50.0, 0.0);
const ORBIT_MIN_DISTANCE: f32 = 5.0;
const ORBIT_MAX_DISTANCE: f32 = 15.0;
const ORBIT_DAMPING: f32 = 0.05;

const FOG_COLOR: [f32; 3] = [0.8, 0.8, 0.8];
const FOG_DENSITY: f32 = 0.002;
const BACKGROUND: [f32; 3] = [0.0, 0.0, 0.0];

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
// #002288, the cool fill tint
const FILL_LIGHT_COLOR: Vec3 = Vec3::new(0.0, 0.133, 0.533);
const AMBIENT_COLOR: Vec3 = Vec3::new(0.133, 0.133, 0.133);

/// Feature flags selecting which scene variant gets assembled. One assembler
/// serves both the full scene and the bare-horizon variant.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub include_disk: bool,
    pub include_stars: bool,
    pub lobe_count: u8,
    /// Polar clamp for the orbit camera; used by the disk-less variant to
    /// keep the view above the horizon plane.
    pub max_polar_angle: Option<f32>,
    pub rotating_disk: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            include_disk: true,
            include_stars: true,
            lobe_count: 2,
            max_polar_angle: None,
            rotating_disk: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("lobe count must be 0, 1 or 2, got {0}")]
    LobeCount(u8),
    #[error("ring interval violates 0 < inner < outer: [{inner}, {outer}]")]
    BadInterval { inner: f32, outer: f32 },
}

/// One renderable instance: a mesh from the pool plus transform and material.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub mesh: usize,
    pub translation: Vec3,
    pub rotation: Quat,
    pub color: [f32; 4],
    pub transparent: bool,
}

impl SceneNode {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// A live accretion ring: its radial band, the random phase its arc was baked
/// with, and the rotation the scheduler advances about the viewing axis.
#[derive(Debug, Clone)]
pub struct RingEntity {
    pub node: usize,
    pub interval: RingInterval,
    pub theta_start: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Points from the light toward the origin, three.js style.
    pub position: Vec3,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub ambient: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct Fog {
    pub color: [f32; 3],
    pub density: f32,
}

/// The one scene instance: mesh pool, node list, live ring entities, lights,
/// camera and controls. Created once at startup, mutated only by the tick
/// path and the resize handler.
pub struct Scene {
    pub config: SceneConfig,
    pub meshes: Vec<MeshData>,
    pub nodes: Vec<SceneNode>,
    pub rings: Vec<RingEntity>,
    pub lights: LightRig,
    pub fog: Fog,
    pub background: [f32; 3],
    pub camera: Camera,
    pub controls: OrbitControls,
    pub paused: bool,
}

impl Scene {
    /// Build the full scene graph from generated layouts. Structurally
    /// idempotent: identical inputs give an independently owned scene with
    /// the same entity counts (star/ring phases differ with the rng).
    pub fn assemble<R: Rng>(
        config: &SceneConfig,
        levels: &[RingInterval],
        stars: &[StarPoint],
        viewport: (u32, u32),
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        if config.lobe_count > 2 {
            return Err(SceneError::LobeCount(config.lobe_count));
        }
        for level in levels {
            if !(level.inner > 0.0 && level.inner < level.outer) {
                return Err(SceneError::BadInterval {
                    inner: level.inner,
                    outer: level.outer,
                });
            }
        }

        let mut meshes = Vec::new();
        let mut nodes = Vec::new();
        let mut rings = Vec::new();

        // event horizon
        meshes.push(mesh::uv_sphere(HOLE_RADIUS, 32, 16));
        nodes.push(SceneNode {
            mesh: 0,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            color: BLACK,
            transparent: false,
        });

        // polar emission lobes, mirrored across the disk plane
        if config.lobe_count > 0 {
            meshes.push(mesh::open_tube(
                LOBE_TOP_RADIUS,
                LOBE_BOTTOM_RADIUS,
                LOBE_LENGTH,
                64,
                24,
            ));
            let lobe_mesh = meshes.len() - 1;
            for dir in [1.0f32, -1.0].iter().take(config.lobe_count as usize) {
                nodes.push(SceneNode {
                    mesh: lobe_mesh,
                    translation: Vec3::new(
                        0.0,
                        LOBE_VERTICAL_OFFSET,
                        LOBE_AXIAL_OFFSET * dir,
                    ),
                    rotation: Quat::from_rotation_x(LOBE_TILT * dir),
                    color: [1.0, 1.0, 1.0, LOBE_OPACITY],
                    transparent: true,
                });
            }
        }

        // accretion disk: one arc mesh per band, each with a random phase
        if config.include_disk {
            for level in levels {
                let theta_start = rng.gen_range(0.0..TAU);
                meshes.push(mesh::annulus_sector(
                    level.inner,
                    level.outer,
                    RING_SEGMENTS,
                    theta_start,
                    RING_THETA_LENGTH,
                ));
                nodes.push(SceneNode {
                    mesh: meshes.len() - 1,
                    translation: Vec3::ZERO,
                    rotation: Quat::IDENTITY,
                    color: WHITE,
                    transparent: false,
                });
                rings.push(RingEntity {
                    node: nodes.len() - 1,
                    interval: *level,
                    theta_start,
                    rotation: 0.0,
                });
            }
        }

        // background star field, one shared sphere mesh
        if config.include_stars && !stars.is_empty() {
            meshes.push(mesh::uv_sphere(STAR_RADIUS, 24, 24));
            let star_mesh = meshes.len() - 1;
            for star in stars {
                nodes.push(SceneNode {
                    mesh: star_mesh,
                    translation: (*star).into(),
                    rotation: Quat::IDENTITY,
                    color: WHITE,
                    transparent: false,
                });
            }
        }

        let lights = LightRig {
            key: DirectionalLight {
                position: Vec3::new(1.0, 1.0, 1.0),
                color: Vec3::ONE,
            },
            fill: DirectionalLight {
                position: Vec3::new(-1.0, -1.0, -1.0),
                color: FILL_LIGHT_COLOR,
            },
            ambient: AMBIENT_COLOR,
        };

        let aspect = viewport.0 as f32 / viewport.1.max(1) as f32;
        let camera = Camera::new(CAMERA_START, Vec3::ZERO, aspect);
        let mut controls = OrbitControls::new(Vec3::ZERO, viewport.1 as f32);
        controls.enable_damping = true;
        controls.damping_factor = ORBIT_DAMPING;
        controls.screen_space_panning = false;
        controls.min_distance = ORBIT_MIN_DISTANCE;
        controls.max_distance = ORBIT_MAX_DISTANCE;
        if let Some(max_polar) = config.max_polar_angle {
            controls.max_polar_angle = max_polar;
        }

        Ok(Self {
            config: config.clone(),
            meshes,
            nodes,
            rings,
            lights,
            fog: Fog {
                color: FOG_COLOR,
                density: FOG_DENSITY,
            },
            background: BACKGROUND,
            camera,
            controls,
            paused: false,
        })
    }

    /// Drain folded input into the controls; toggles are handled here.
    pub fn apply_input(&mut self, input: &mut InputState) {
        if input.take_pause() {
            self.paused = !self.paused;
            log::info!("animation {}", if self.paused { "paused" } else { "resumed" });
        }
        let (dx, dy) = input.rotate_delta;
        if dx != 0.0 || dy != 0.0 {
            self.controls.rotate(dx, dy);
        }
        let (px, py) = input.pan_delta;
        if px != 0.0 || py != 0.0 {
            self.controls.pan(px, py);
        }
        self.controls.dolly(input.scroll_delta);
        input.end_frame();
    }

    /// Keep camera aspect and control scaling in step with the viewport.
    /// Degenerate sizes are ignored, matching the renderer's resize guard.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        self.controls.set_viewport_height(height);
    }
}
