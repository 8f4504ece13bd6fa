pub mod position;
pub mod vector2;
pub mod vector3;

/// Converts a block coordinate into the coordinate of the chunk (or section) holding it.
pub const fn get_section_cord(coord: i32) -> i32 {
    coord >> 4
}
