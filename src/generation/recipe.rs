//! Procedural building recipes.
//!
//! Each tier composes a fixed set of primitives: a foundation, a main
//! volume, a roof or crown, and tier-specific ornamentation. Parts are
//! placed in building-local space with the footprint centered on the
//! origin and the ground at y = 0. Every part stays inside the
//! `width x height x depth` box so the bounds of a recipe always equal the
//! building's dimensions, which is what the instanced path draws.
//!
//! Recipes are pure: the same input always produces the same parts.

use crate::city::{Building, Dimensions};
use crate::core::types::Vec3;
use crate::math::Aabb;

use super::palette::{self, shade};
use super::tier::Tier;

const GLASS: Vec3 = Vec3::new(0.62, 0.78, 0.91);
const AWNING: Vec3 = Vec3::new(0.86, 0.38, 0.31);
const METAL: Vec3 = Vec3::new(0.72, 0.74, 0.78);
const BEACON: Vec3 = Vec3::new(1.0, 0.23, 0.19);

/// Storey height used to space window rows
const FLOOR_HEIGHT: f32 = 3.0;
const MAX_WINDOW_ROWS: usize = 16;

/// Primitive shape of a part
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Box,
    /// Four-sided pyramid over the part's footprint
    Pyramid,
    Cylinder { segments: u32 },
    Cone { segments: u32 },
}

/// What a part represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    Foundation,
    Body,
    Roof,
    Awning,
    Window,
    Setback,
    Crown,
    Spire,
    Beacon,
}

/// One primitive of a building. `base` is the center of its bottom face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Part {
    pub kind: PartKind,
    pub shape: Shape,
    pub base: Vec3,
    pub size: Vec3,
    pub color: Vec3,
    pub emissive: bool,
}

impl Part {
    fn new(kind: PartKind, shape: Shape, base: Vec3, size: Vec3, color: Vec3) -> Self {
        Self { kind, shape, base, size, color, emissive: false }
    }

    fn boxed(kind: PartKind, base: Vec3, size: Vec3, color: Vec3) -> Self {
        Self::new(kind, Shape::Box, base, size, color)
    }

    fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }

    pub fn bounds(&self) -> Aabb {
        let half = Vec3::new(self.size.x * 0.5, 0.0, self.size.z * 0.5);
        Aabb::new(self.base - half, self.base + half + Vec3::Y * self.size.y)
    }

    /// Top face height
    pub fn top(&self) -> f32 {
        self.base.y + self.size.y
    }
}

/// Everything a recipe depends on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecipeInput<'a> {
    pub dimensions: Dimensions,
    pub language: &'a str,
    pub decay_level: f32,
    pub is_hotspot: bool,
}

impl<'a> RecipeInput<'a> {
    pub fn from_building(building: &'a Building) -> Self {
        Self {
            dimensions: building.dimensions,
            language: &building.language,
            decay_level: building.decay_level,
            is_hotspot: building.is_hotspot,
        }
    }
}

/// Output of a recipe: the parts plus the summary data the instanced path
/// needs.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingGeometry {
    pub tier: Tier,
    pub parts: Vec<Part>,
    pub bounds: Aabb,
    pub body_color: Vec3,
}

impl BuildingGeometry {
    /// Footprint extent (width, depth)
    pub fn footprint(&self) -> (f32, f32) {
        let size = self.bounds.size();
        (size.x, size.z)
    }

    pub fn count(&self, kind: PartKind) -> usize {
        self.parts.iter().filter(|p| p.kind == kind).count()
    }

    pub fn has_beacon(&self) -> bool {
        self.parts.iter().any(|p| p.kind == PartKind::Beacon && p.emissive)
    }
}

impl Tier {
    /// Run this tier's recipe
    pub fn build(self, input: &RecipeInput) -> BuildingGeometry {
        let Dimensions { width, height, depth } = input.dimensions;
        let body = palette::body_color(input.language, input.decay_level);
        let ctx = Ctx { w: width, h: height, d: depth, body };

        let mut parts = match self {
            Tier::Shop => shop(&ctx),
            Tier::Apartment => apartment(&ctx),
            Tier::OfficeTower => office_tower(&ctx),
            Tier::Skyscraper => skyscraper(&ctx),
        };
        if input.is_hotspot {
            parts.push(beacon(&ctx, &parts));
        }

        let bounds = parts
            .iter()
            .map(Part::bounds)
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_else(|| Aabb::new(Vec3::ZERO, Vec3::ZERO));

        BuildingGeometry { tier: self, parts, bounds, body_color: body }
    }
}

struct Ctx {
    w: f32,
    h: f32,
    d: f32,
    body: Vec3,
}

impl Ctx {
    fn foundation(&self) -> Part {
        let fh = (self.h * 0.05).min(0.5);
        Part::boxed(PartKind::Foundation, Vec3::ZERO, Vec3::new(self.w, fh, self.d), shade(self.body, 0.55))
    }

    /// Window rows on the front and back faces between `y0` and `y1`,
    /// filling the gap between an inset volume and its outer depth
    fn windows(&self, y0: f32, y1: f32, inset_w: f32, inset_d: f32, outer_d: f32, out: &mut Vec<Part>) {
        let span = y1 - y0;
        let rows = ((span / FLOOR_HEIGHT) as usize).clamp(1, MAX_WINDOW_ROWS);
        let row_h = span / rows as f32;
        let pane_h = row_h * 0.4;
        let pane_d = (outer_d - inset_d) * 0.5;
        for row in 0..rows {
            let y = y0 + row_h * row as f32 + (row_h - pane_h) * 0.5;
            for side in [-1.0f32, 1.0] {
                let z = side * (inset_d * 0.5 + pane_d * 0.5);
                out.push(Part::boxed(
                    PartKind::Window,
                    Vec3::new(0.0, y, z),
                    Vec3::new(inset_w * 0.85, pane_h, pane_d),
                    GLASS,
                ));
            }
        }
    }
}

/// Tier 1: low box with a flat slab roof and a front awning
fn shop(c: &Ctx) -> Vec<Part> {
    let foundation = c.foundation();
    let f = foundation.top();
    let slab_h = c.h * 0.12;
    let body_d = c.d * 0.85;
    let body_z = -(c.d - body_d) * 0.5;
    let awning_d = c.d - body_d;
    vec![
        foundation,
        Part::boxed(PartKind::Body, Vec3::new(0.0, f, body_z), Vec3::new(c.w, c.h - f - slab_h, body_d), c.body),
        Part::boxed(PartKind::Roof, Vec3::new(0.0, c.h - slab_h, 0.0), Vec3::new(c.w, slab_h, c.d), shade(c.body, 0.8)),
        Part::boxed(
            PartKind::Awning,
            Vec3::new(0.0, f + (c.h - f) * 0.45, c.d * 0.5 - awning_d * 0.5),
            Vec3::new(c.w * 0.8, (c.h * 0.06).max(0.05), awning_d),
            AWNING,
        ),
    ]
}

/// Tier 2: block with window rows under a pyramid roof
fn apartment(c: &Ctx) -> Vec<Part> {
    let foundation = c.foundation();
    let f = foundation.top();
    let roof_h = c.h * 0.2;
    let (bw, bd) = (c.w * 0.94, c.d * 0.94);
    let mut parts = vec![
        foundation,
        Part::boxed(PartKind::Body, Vec3::new(0.0, f, 0.0), Vec3::new(bw, c.h - f - roof_h, bd), c.body),
    ];
    c.windows(f, c.h - roof_h, bw, bd, c.d, &mut parts);
    parts.push(Part::new(
        PartKind::Roof,
        Shape::Pyramid,
        Vec3::new(0.0, c.h - roof_h, 0.0),
        Vec3::new(c.w, roof_h, c.d),
        shade(c.body, 0.7),
    ));
    parts
}

/// Tier 3: wide base with window bands, a setback upper block and a crown
fn office_tower(c: &Ctx) -> Vec<Part> {
    let foundation = c.foundation();
    let f = foundation.top();
    let lower_top = c.h * 0.55;
    let upper_top = c.h * 0.9;
    let (bw, bd) = (c.w * 0.94, c.d * 0.94);
    let mut parts = vec![
        foundation,
        Part::boxed(PartKind::Body, Vec3::new(0.0, f, 0.0), Vec3::new(bw, lower_top - f, bd), c.body),
        Part::boxed(
            PartKind::Setback,
            Vec3::new(0.0, lower_top, 0.0),
            Vec3::new(c.w * 0.75, upper_top - lower_top, c.d * 0.75),
            shade(c.body, 1.1),
        ),
    ];
    c.windows(f, lower_top, bw, bd, c.d, &mut parts);
    parts.push(Part::boxed(
        PartKind::Crown,
        Vec3::new(0.0, upper_top, 0.0),
        Vec3::new(c.w * 0.5, c.h - upper_top, c.d * 0.5),
        shade(c.body, 1.25),
    ));
    parts
}

/// Tier 4: podium, tall tower with window rows, top setback and a spire
fn skyscraper(c: &Ctx) -> Vec<Part> {
    let foundation = c.foundation();
    let f = foundation.top();
    let podium_top = c.h * 0.15;
    let tower_top = c.h * 0.75;
    let setback_top = c.h * 0.88;
    // Tower volume is inset slightly so the window rows sit flush with a 0.7 footprint
    let td = c.d * 0.7;
    let (tw_in, td_in) = (c.w * 0.7 * 0.96, td * 0.96);
    let spire_r = c.w.min(c.d) * 0.1;
    let mut parts = vec![
        foundation,
        Part::boxed(PartKind::Body, Vec3::new(0.0, f, 0.0), Vec3::new(c.w, podium_top - f, c.d), shade(c.body, 0.9)),
        Part::boxed(PartKind::Body, Vec3::new(0.0, podium_top, 0.0), Vec3::new(tw_in, tower_top - podium_top, td_in), c.body),
        Part::boxed(
            PartKind::Setback,
            Vec3::new(0.0, tower_top, 0.0),
            Vec3::new(c.w * 0.5, setback_top - tower_top, c.d * 0.5),
            shade(c.body, 1.15),
        ),
    ];
    c.windows(podium_top, tower_top, tw_in, td_in, td, &mut parts);
    parts.push(Part::new(
        PartKind::Spire,
        Shape::Cone { segments: 8 },
        Vec3::new(0.0, setback_top, 0.0),
        Vec3::new(spire_r * 2.0, c.h - setback_top, spire_r * 2.0),
        METAL,
    ));
    parts
}

/// Emissive ring sitting on the highest flat part
fn beacon(c: &Ctx, parts: &[Part]) -> Part {
    let top = parts
        .iter()
        .filter(|p| p.shape == Shape::Box && p.kind != PartKind::Window)
        .map(Part::top)
        .fold(0.0f32, f32::max);
    let ring_h = (c.h * 0.03).min(c.h - top).max(0.0);
    let r = c.w.min(c.d) * 0.2;
    Part::new(
        PartKind::Beacon,
        Shape::Cylinder { segments: 12 },
        Vec3::new(0.0, top.min(c.h - ring_h), 0.0),
        Vec3::new(r * 2.0, ring_h, r * 2.0),
        BEACON,
    )
    .emissive()
}
