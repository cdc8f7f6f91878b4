//! Centers the city on the scene origin.
//!
//! The analysis engine lays buildings out in its own coordinate frame. The
//! scene wants the dataset centroid at the origin so that camera distance
//! from the origin is a meaningful LOD input and the default orbit target is
//! the middle of the city.

use crate::core::types::Vec2;
use crate::math::Rect;

use super::model::CitySnapshot;

/// Building and district positions translated by the negated centroid.
///
/// Vectors are parallel to `snapshot.buildings` / `snapshot.districts`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedLayout {
    /// Mean building position in the input frame (what was subtracted)
    pub centroid: Vec2,
    /// Building ground positions (x, z) after centering
    pub buildings: Vec<Vec2>,
    /// District centers after centering
    pub district_centers: Vec<Vec2>,
    /// Bounds of the centered building positions; `None` without buildings
    pub bounds: Option<Rect>,
}

impl NormalizedLayout {
    /// Centered position of building `index`
    pub fn building(&self, index: usize) -> Option<Vec2> {
        self.buildings.get(index).copied()
    }

    /// Map a point from the analysis frame into the centered frame
    pub fn to_scene(&self, point: Vec2) -> Vec2 {
        point - self.centroid
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Largest distance of any building from the origin
    pub fn radius(&self) -> f32 {
        self.buildings.iter().map(|p| p.length()).fold(0.0, f32::max)
    }
}

/// Center buildings and district centers on the building centroid.
///
/// One-shot per snapshot: applying it to already-centered positions is a
/// no-op only because their centroid is already zero.
pub fn normalize(snapshot: &CitySnapshot) -> NormalizedLayout {
    let count = snapshot.buildings.len();

    // Accumulate in f64 so large coordinate frames keep their precision
    let centroid = if count == 0 {
        Vec2::ZERO
    } else {
        let (sx, sz) = snapshot.buildings.iter().fold((0.0f64, 0.0f64), |(sx, sz), b| {
            (sx + b.position.x as f64, sz + b.position.z as f64)
        });
        Vec2::new((sx / count as f64) as f32, (sz / count as f64) as f32)
    };

    let buildings: Vec<Vec2> = snapshot
        .buildings
        .iter()
        .map(|b| b.position.to_vec2() - centroid)
        .collect();

    let district_centers = snapshot
        .districts
        .iter()
        .map(|d| d.center.to_vec2() - centroid)
        .collect();

    let bounds = Rect::from_points(buildings.iter().copied());

    NormalizedLayout {
        centroid,
        buildings,
        district_centers,
        bounds,
    }
}
