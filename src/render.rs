/// Sky/ground gradient, ground grid and heading guide.
pub mod background;
/// RGB8 frame buffer.
pub mod frame;
/// 2D polygon rasterization onto frames.
pub mod painter;
/// Obstacle projection, shading and culling.
pub mod rasterize;
/// Palette and light model.
pub mod shading;
/// Optional 3x3 smoothing pass.
pub mod smooth;
