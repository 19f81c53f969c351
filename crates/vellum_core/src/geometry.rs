//! 2D geometry and affine transform types
//!
//! The scene graph stores one flat affine transform per node; everything here
//! is a pure value type with no interior state.

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}

/// 2D affine transformation
///
/// Matrix elements `[a, b, c, d, tx, ty]`:
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn from_elements(elements: [f32; 6]) -> Self {
        Self { elements }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            elements: [c, s, -s, c, 0.0, 0.0],
        }
    }

    /// Translation by (x, y) composed with a uniform scale of `s`.
    ///
    /// This is the position+scale convenience form used by
    /// `Node::move_position`.
    pub fn translate_scale(x: f32, y: f32, s: f32) -> Self {
        Self {
            elements: [s, 0.0, 0.0, s, x, y],
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(a * point.x + c * point.y + tx, b * point.x + d * point.y + ty)
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// Invert the transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Affine2D> {
        let [a, b, c, d, tx, ty] = self.elements;
        let det = a * d - b * c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Affine2D {
            elements: [
                d * inv_det,
                -b * inv_det,
                -c * inv_det,
                a * inv_det,
                (c * ty - d * tx) * inv_det,
                (b * tx - a * ty) * inv_det,
            ],
        })
    }

    /// Component-wise interpolation over the 6 affine coefficients.
    pub fn lerp(&self, other: &Affine2D, t: f32) -> Affine2D {
        let mut elements = [0.0f32; 6];
        for (i, e) in elements.iter_mut().enumerate() {
            *e = self.elements[i] + (other.elements[i] - self.elements[i]) * t;
        }
        Affine2D { elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point() {
        let t = Affine2D::translation(10.0, 20.0);
        assert_eq!(t.transform_point(Point::new(1.0, 2.0)), Point::new(11.0, 22.0));

        let s = Affine2D::scale(2.0, 3.0);
        assert_eq!(s.transform_point(Point::new(1.0, 2.0)), Point::new(2.0, 6.0));
    }

    #[test]
    fn test_then_composition() {
        // translate then scale: point scaled first, then translated
        let combined = Affine2D::translation(10.0, 0.0).then(&Affine2D::scale(2.0, 2.0));
        assert_eq!(
            combined.transform_point(Point::new(1.0, 1.0)),
            Point::new(12.0, 2.0)
        );
    }

    #[test]
    fn test_invert_round_trip() {
        let t = Affine2D::translation(50.0, 50.0).then(&Affine2D::scale(2.0, 2.0));
        let inv = t.invert().unwrap();
        let p = Point::new(70.0, 90.0);
        let local = inv.transform_point(p);
        let back = t.transform_point(local);
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn test_invert_singular() {
        let degenerate = Affine2D::scale(0.0, 1.0);
        assert!(degenerate.invert().is_none());
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Affine2D::from_elements([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Affine2D::from_elements([6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(
            a.lerp(&b, 0.5),
            Affine2D::from_elements([3.5, 3.5, 3.5, 3.5, 3.5, 3.5])
        );
    }

    #[test]
    fn test_translate_scale() {
        let m = Affine2D::translate_scale(200.0, 250.0, 2.0);
        assert_eq!(m.elements, [2.0, 0.0, 0.0, 2.0, 200.0, 250.0]);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(50.0, 50.0, 50.0, 50.0);
        assert!(r.contains(Point::new(50.0, 50.0)));
        assert!(r.contains(Point::new(100.0, 100.0)));
        assert!(!r.contains(Point::new(101.0, 50.0)));
    }
}
