pub mod constants;
pub mod error;
pub mod landmarks;
pub mod material;
pub mod mesh;
pub mod morph;
pub mod orchestrator;
pub mod overlay;
pub mod regions;
pub mod synthetic;
pub mod treatment;
pub mod triangulate;

pub static COMMON_WGSL: &str = include_str!("../shaders/common.wgsl");
pub static FACE_VS_WGSL: &str = include_str!("../shaders/face_vs.wgsl");
pub static FLAT_FS_WGSL: &str = include_str!("../shaders/flat_fs.wgsl");
pub static FILLER_FS_WGSL: &str = include_str!("../shaders/filler_fs.wgsl");
pub static LASER_FS_WGSL: &str = include_str!("../shaders/laser_fs.wgsl");
pub static SKIN_FS_WGSL: &str = include_str!("../shaders/skin_fs.wgsl");

pub use error::*;
pub use landmarks::*;
pub use material::*;
pub use mesh::*;
pub use morph::*;
pub use orchestrator::*;
pub use overlay::*;
pub use regions::*;
pub use synthetic::*;
pub use treatment::*;
pub use triangulate::*;
