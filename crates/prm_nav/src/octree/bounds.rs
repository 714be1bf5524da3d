//! Axis-aligned bounding box used for sampling bounds and octree cells.

use glam::Vec3;

/// Single-precision axis-aligned bounding box.
///
/// Describes the sampling volume of a roadmap and the cubic cells of the
/// octree built over it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb3 {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb3 {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Cube of the given side length centered on `center`.
	pub fn cube(center: Vec3, side_length: f32) -> Self {
		Self::from_center_half_extents(center, Vec3::splat(side_length * 0.5))
	}

	/// Check if this AABB contains a point (boundary included).
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Check if a point lies strictly inside (boundary excluded).
	#[inline]
	pub fn contains_point_strict(&self, point: Vec3) -> bool {
		point.x > self.min.x
			&& point.x < self.max.x
			&& point.y > self.min.y
			&& point.y < self.max.y
			&& point.z > self.min.z
			&& point.z < self.max.z
	}

	/// Shrink every face inward by `amount`.
	///
	/// Returns `None` when the box would invert on any axis.
	pub fn shrink(&self, amount: f32) -> Option<Self> {
		let min = self.min + Vec3::splat(amount);
		let max = self.max - Vec3::splat(amount);
		if min.x > max.x || min.y > max.y || min.z > max.z {
			return None;
		}
		Some(Self { min, max })
	}

	/// Closest point of the box to `point`.
	#[inline]
	pub fn closest_point(&self, point: Vec3) -> Vec3 {
		point.clamp(self.min, self.max)
	}

	/// Check if a sphere touches this box (boundary contact counts).
	#[inline]
	pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
		self.closest_point(center).distance_squared(center) <= radius * radius
	}

	/// Smallest cube that shares this box's center and encloses it.
	pub fn bounding_cube(&self) -> Self {
		Self::cube(self.center(), self.size().max_element())
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Smallest box enclosing every point, or `None` for an empty slice.
	pub fn from_points(points: &[Vec3]) -> Option<Self> {
		let first = *points.first()?;
		let (min, max) = points
			.iter()
			.fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
		Some(Self { min, max })
	}
}

impl Default for Aabb3 {
	fn default() -> Self {
		Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(10.0))
	}
}
