pub mod depth;
pub mod phong;
pub mod unlit;
