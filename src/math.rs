//! Vector, quaternion and color types carried as fixed-length arrays of reals.
//!
//! None of these are native kinds: [`Llsd::from_vector3`] and friends produce an
//! [`Llsd::Array`] of [`Llsd::Real`] components in declaration order, and the
//! `as_vector3` family of accessors reads them back.

use crate::Llsd;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A single precision 2D vector.
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A single precision 3D vector.
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A double precision 3D vector.
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A single precision 4D vector.
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// A rotation quaternion. Defaults to [`Quaternion::IDENTITY`].
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// An RGBA color. Defaults to opaque [`Color4::BLACK`].
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Vector2 { Vector2 { x, y } }
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Vector3 { Vector3 { x, y, z } }
}

impl Vector3d {
    pub const ZERO: Vector3d = Vector3d { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Vector3d { Vector3d { x, y, z } }
}

impl Vector4 {
    pub const ZERO: Vector4 = Vector4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Vector4 { Vector4 { x, y, z, w } }
}

impl Quaternion {
    /// The identity rotation, the zero-equivalent quaternion.
    pub const IDENTITY: Quaternion = Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Quaternion { Quaternion { x, y, z, w } }
}

impl Default for Quaternion {
    fn default() -> Quaternion { Quaternion::IDENTITY }
}

impl Color4 {
    /// Opaque black, the zero-equivalent color.
    pub const BLACK: Color4 = Color4 { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Color4 { Color4 { r, g, b, a } }
}

impl Default for Color4 {
    fn default() -> Color4 { Color4::BLACK }
}

/// Builds the real-array representation from component values.
fn reals<I: IntoIterator<Item = f64>>(components: I) -> Llsd {
    Llsd::Array(components.into_iter().map(Llsd::Real).collect())
}

impl Llsd {
    /// `[x, y]`
    pub fn from_vector2(v: Vector2) -> Llsd { reals(vec![v.x.into(), v.y.into()]) }

    /// `[x, y, z]`
    pub fn from_vector3(v: Vector3) -> Llsd { reals(vec![v.x.into(), v.y.into(), v.z.into()]) }

    /// `[x, y, z]`
    pub fn from_vector3d(v: Vector3d) -> Llsd { reals(vec![v.x, v.y, v.z]) }

    /// `[x, y, z, w]`
    pub fn from_vector4(v: Vector4) -> Llsd {
        reals(vec![v.x.into(), v.y.into(), v.z.into(), v.w.into()])
    }

    /// `[x, y, z, w]`
    pub fn from_quaternion(q: Quaternion) -> Llsd {
        reals(vec![q.x.into(), q.y.into(), q.z.into(), q.w.into()])
    }

    /// `[r, g, b, a]`
    pub fn from_color4(c: Color4) -> Llsd {
        reals(vec![c.r.into(), c.g.into(), c.b.into(), c.a.into()])
    }
}

from_fn!(Llsd, Vector2, Llsd::from_vector2);
from_fn!(Llsd, Vector3, Llsd::from_vector3);
from_fn!(Llsd, Vector3d, Llsd::from_vector3d);
from_fn!(Llsd, Vector4, Llsd::from_vector4);
from_fn!(Llsd, Quaternion, Llsd::from_quaternion);
from_fn!(Llsd, Color4, Llsd::from_color4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_order() {
        let arr = Llsd::from_vector4(Vector4::new(1.0, 2.0, 3.0, 4.0));
        let reals: Vec<f64> = arr.to_array().unwrap().iter().map(Llsd::as_real).collect();
        assert_eq!(reals, vec![1.0, 2.0, 3.0, 4.0]);

        let arr = Llsd::from_color4(Color4::new(0.25, 0.5, 0.75, 1.0));
        assert_eq!(arr[2].as_real(), 0.75);
        assert_eq!(arr.len(), 4);
    }

    #[test]
    fn defaults() {
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
        assert_eq!(Color4::default().a, 1.0);
        assert_eq!(Vector3::default(), Vector3::ZERO);
    }
}
