pub mod mode;
pub mod renderer;
pub mod shaders;
pub mod vertex_stage;
