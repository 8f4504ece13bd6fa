pub mod block_direction;
pub mod blocks;
pub mod dye_color;
pub mod frame;

pub use block_direction::{Axis, BlockDirection};
pub use blocks::{BlockKind, FrameMaterial};
pub use dye_color::DyeColor;
pub use frame::{FrameShape, FrameType};
