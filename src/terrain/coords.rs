//! # Coordinate Transform Module
//!
//! Pure, stateless conversions between the three coordinate spaces the
//! terrain code works in:
//!
//! * **world**: absolute integer position of a voxel.
//! * **local**: position relative to a chunk's origin.
//! * **slice**: a per-axis 2D-plus-depth space used by the greedy mesher.
//!
//! Slice space exists so the rectangle merge and split logic never has to
//! care which of the three cube axes a face belongs to: for any face family
//! "one cell below" is always `slice.y - 1` and "one cell left" is always
//! `slice.x - 1`, while `slice.z` is the depth along the face's axis.
//!
//! The axis mapping is:
//!
//! ```text
//!    axis  |  slice.x  |  slice.y  |  slice.z
//! ---------+-----------+-----------+----------
//!    X (0) |  local.y  |  local.z  |  local.x
//!    Y (1) |  local.x  |  local.z  |  local.y
//!    Z (2) |  local.x  |  local.y  |  local.z
//! ```
//!
//! `local_to_slice` and `slice_to_local` are exact inverses for every axis.

use cgmath::{Point3, Vector3};

/// Converts a world position into a chunk-local position.
#[inline]
pub fn world_to_local(world: Point3<i32>, chunk_origin: Point3<i32>) -> Point3<i32> {
    Point3::new(
        world.x - chunk_origin.x,
        world.y - chunk_origin.y,
        world.z - chunk_origin.z,
    )
}

/// Converts a chunk-local position into a world position.
#[inline]
pub fn local_to_world(local: Point3<i32>, chunk_origin: Point3<i32>) -> Point3<i32> {
    Point3::new(
        local.x + chunk_origin.x,
        local.y + chunk_origin.y,
        local.z + chunk_origin.z,
    )
}

/// Transforms a chunk-local position into the slice space of `axis`.
#[inline]
pub fn local_to_slice(position: Point3<i32>, axis: usize) -> Point3<i32> {
    let x = if axis != 0 { position.x } else { position.y };
    let y = if axis != 2 { position.z } else { position.y };
    let z = match axis {
        0 => position.x,
        1 => position.y,
        _ => position.z,
    };
    Point3::new(x, y, z)
}

/// Transforms a slice-space position of `axis` back into a chunk-local one.
#[inline]
pub fn slice_to_local(position: Point3<i32>, axis: usize) -> Point3<i32> {
    let x = if axis != 0 { position.x } else { position.z };
    let z = if axis != 2 { position.y } else { position.z };
    let y = match axis {
        0 => position.x,
        1 => position.z,
        _ => position.y,
    };
    Point3::new(x, y, z)
}

/// Applies the slice-to-local component shuffle of `axis` to an extent
/// vector. Used to turn a quad's slice-space (width, height, 1) scale into
/// the local-space scale its vertices are stretched by.
#[inline]
pub fn slice_extent_to_local(extent: Vector3<i32>, axis: usize) -> Vector3<i32> {
    let local = slice_to_local(Point3::new(extent.x, extent.y, extent.z), axis);
    Vector3::new(local.x, local.y, local.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_round_trips_on_every_axis() {
        for axis in 0..3 {
            for x in -3..4 {
                for y in -3..4 {
                    for z in -3..4 {
                        let local = Point3::new(x, y, z);
                        let slice = local_to_slice(local, axis);
                        assert_eq!(slice_to_local(slice, axis), local);
                        assert_eq!(local_to_slice(slice_to_local(slice, axis), axis), slice);
                    }
                }
            }
        }
    }

    #[test]
    fn slice_axis_convention_is_fixed() {
        let local = Point3::new(1, 2, 3);
        assert_eq!(local_to_slice(local, 0), Point3::new(2, 3, 1));
        assert_eq!(local_to_slice(local, 1), Point3::new(1, 3, 2));
        assert_eq!(local_to_slice(local, 2), Point3::new(1, 2, 3));
    }

    #[test]
    fn slice_neighbors_map_to_fixed_local_offsets() {
        // "One cell below" and "one cell left" in slice space must correspond
        // to the same local-space offset no matter where the cell is.
        for axis in 0..3 {
            let base = Point3::new(5, 6, 7);
            let slice = local_to_slice(base, axis);
            let below = slice_to_local(slice - Vector3::unit_y(), axis);
            let left = slice_to_local(slice - Vector3::unit_x(), axis);

            let other = Point3::new(-2, 9, 4);
            let other_slice = local_to_slice(other, axis);
            let other_below = slice_to_local(other_slice - Vector3::unit_y(), axis);
            let other_left = slice_to_local(other_slice - Vector3::unit_x(), axis);

            assert_eq!(below - base, other_below - other);
            assert_eq!(left - base, other_left - other);
        }
    }

    #[test]
    fn world_local_round_trip() {
        let origin = Point3::new(64, 0, -32);
        let world = Point3::new(70, 12, -30);
        let local = world_to_local(world, origin);
        assert_eq!(local, Point3::new(6, 12, 2));
        assert_eq!(local_to_world(local, origin), world);
    }
}
