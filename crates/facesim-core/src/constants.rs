use glam::{Vec2, Vec3};

// Tuning constants shared by the core and both front-ends. The shader blend
// coefficients are emitted into the generated WGSL, so these are the only copy.

// Landmark input
pub const LANDMARK_COUNT: usize = 468;

// Projection of normalized landmarks into mesh space
pub const POSITION_SCALE: f32 = 2.0; // [0,1] -> [-1,1]
pub const DEPTH_SCALE: f32 = 2.0; // relative depth -> mesh z

// Morph target offsets (mesh-space units)
pub const MOUTH_CORNERS: [usize; 2] = [61, 291]; // left, right
pub const SMILE_LIFT: f32 = 0.05;
pub const SMILE_SPREAD: f32 = 0.02; // outward per corner
pub const FROWN_DROP: f32 = 0.03;
pub const FROWN_BROW_SHIFT: f32 = 0.02;
pub const EYES_CLOSED_LID_SHIFT: f32 = 0.05;

// Parameter clamps
pub const MIN_TARGET_RADIUS: f32 = 0.001;
pub const MAX_TARGET_RADIUS: f32 = 1.0;

// Treatment presets (UV space)
pub const FILLER_PRESET_CENTER: Vec2 = Vec2::new(0.5, 0.4); // cheek area
pub const FILLER_PRESET_RADIUS: f32 = 0.3;
pub const LASER_PRESET_CENTER: Vec2 = Vec2::new(0.5, 0.3); // forehead
pub const LASER_PRESET_RADIUS: f32 = 0.15;
pub const PRESET_INTENSITY: f32 = 0.5; // what a treatment button selects

// Flat material
pub const SKIN_TONE: Vec3 = Vec3::new(0.992, 0.737, 0.706); // #fdbcb4
pub const SKIN_OPACITY: f32 = 0.9;
pub const SKIN_ROUGHNESS: f32 = 0.8;
pub const SKIN_METALNESS: f32 = 0.1;

// Shared lighting
pub const AMBIENT_LIGHT: f32 = 0.4;
pub const DIFFUSE_LIGHT: f32 = 0.6;

// Filler
pub const FILLER_TINT: Vec3 = Vec3::new(1.0, 0.9, 0.88); // lighter, volumized
pub const FILLER_TINT_WEIGHT: f32 = 0.3;
pub const FILLER_SPECULAR_WEIGHT: f32 = 0.35;
pub const FILLER_SPECULAR_POWER: f32 = 24.0;

// Laser
pub const LASER_PULSE_FREQUENCY: f32 = 10.0; // radians per second
pub const LASER_NOISE_SCALE: f32 = 80.0;
pub const LASER_NOISE_STRENGTH: f32 = 0.12;
pub const LASER_TREATED_TINT: Vec3 = Vec3::new(1.0, 0.78, 0.76); // slight reddening
pub const LASER_TREATED_NOISE: f32 = 0.04;
pub const LASER_GLOW_COLOR: Vec3 = Vec3::new(1.0, 0.25, 0.2);
pub const LASER_GLOW_WEIGHT: f32 = 0.3;

// Laser overlay quad, drawn additively in front of the face
pub const LASER_OVERLAY_SIZE: f32 = 0.3; // mesh-space side length
pub const LASER_OVERLAY_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const LASER_OVERLAY_OPACITY: f32 = 0.3; // at full intensity
pub const LASER_OVERLAY_SWAY: f32 = 0.1; // radians, peak z rotation

// Skin improvement
pub const SKIN_NOISE_LOW: f32 = 24.0;
pub const SKIN_NOISE_HIGH: f32 = 96.0;
pub const SKIN_NOISE_LOW_WEIGHT: f32 = 0.65; // high octave gets the remainder
pub const SKIN_SMOOTHING_WEIGHT: f32 = 0.5;
pub const SKIN_BLEMISH_STRENGTH: f32 = 0.18;
pub const SKIN_BRIGHTEN: f32 = 0.15;
pub const SKIN_HEALTHY_TINT: Vec3 = Vec3::new(0.0, 0.05, 0.01); // slight green shift
pub const SKIN_HIGHLIGHT_WEIGHT: f32 = 0.25;
pub const SKIN_HIGHLIGHT_POWER: f32 = 16.0;

// Viewer scene
pub const CAMERA_Z: f32 = 2.0;
pub const LIGHT_DIR: Vec3 = Vec3::new(0.0, 0.0, -1.0);
