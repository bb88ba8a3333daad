//! Intervals, upright rectangles and ellipses in the plane.
//!
//! Intervals and rectangles are generic over their [`Bound`], ellipses always use [`Real`]. All
//! containment tests accept points within a tolerance band of the boundary.

use crate::errors::{GridSynthError, GridSynthResult};
use crate::grid_op::GridOp;
use crate::numeric::{NumericContext, Real};
use crate::types::Bound;
use num::{One, Signed, Zero};
use std::ops::{Add, Div, Mul, Sub};

/// A closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval<B: Bound> {
    lo: B,
    hi: B,
}

impl<B: Bound> Interval<B> {
    /// Make `[lo, hi]`, fails if `lo > hi`.
    pub fn new(lo: B, hi: B) -> GridSynthResult<Self> {
        if lo > hi {
            Err(GridSynthError::InvalidInterval {
                lo: format!("{:?}", lo),
                hi: format!("{:?}", hi),
            })
        } else {
            Ok(Self { lo, hi })
        }
    }

    /// Lower bound.
    pub fn lo(&self) -> &B {
        &self.lo
    }

    /// Upper bound.
    pub fn hi(&self) -> &B {
        &self.hi
    }

    /// `hi - lo`
    pub fn width(&self) -> B {
        self.hi.clone() - self.lo.clone()
    }

    /// Move both bounds outward by `|d|`.
    pub fn fatten(&self, d: &B) -> Self {
        let d = d.abs();
        Self {
            lo: self.lo.clone() - d.clone(),
            hi: self.hi.clone() + d,
        }
    }

    /// Multiply both bounds by `s`, swapping them when `s` is negative.
    pub fn rescale(&self, s: &B) -> Self {
        let lo = self.lo.clone() * s.clone();
        let hi = self.hi.clone() * s.clone();
        if s.is_negative() {
            Self { lo: hi, hi: lo }
        } else {
            Self { lo, hi }
        }
    }

    /// Translate by `d`.
    pub fn shift(&self, d: &B) -> Self {
        Self {
            lo: self.lo.clone() + d.clone(),
            hi: self.hi.clone() + d.clone(),
        }
    }

    /// Whether `(hi - x)(x - lo)` is positive or within `tol` of zero.
    pub fn contains(&self, x: &B, tol: &B) -> bool {
        let p = (self.hi.clone() - x.clone()) * (x.clone() - self.lo.clone());
        p.is_positive() || p.abs() < *tol
    }
}

impl<B: Bound> Add<B> for Interval<B> {
    type Output = Interval<B>;
    fn add(self, rhs: B) -> Interval<B> {
        self.shift(&rhs)
    }
}

impl<B: Bound> Sub<B> for Interval<B> {
    type Output = Interval<B>;
    fn sub(self, rhs: B) -> Interval<B> {
        self.shift(&-rhs)
    }
}

impl<B: Bound> Mul<B> for Interval<B> {
    type Output = Interval<B>;
    fn mul(self, rhs: B) -> Interval<B> {
        self.rescale(&rhs)
    }
}

impl<B: Bound> Div<B> for Interval<B> {
    type Output = Interval<B>;
    fn div(self, rhs: B) -> Interval<B> {
        self.rescale(&(B::one() / rhs))
    }
}

/// An axis aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct UprightRectangle<B: Bound> {
    /// Extent along x.
    pub x: Interval<B>,
    /// Extent along y.
    pub y: Interval<B>,
}

impl<B: Bound> UprightRectangle<B> {
    /// Make a rectangle from its two extents.
    pub fn new(x: Interval<B>, y: Interval<B>) -> Self {
        Self { x, y }
    }

    /// `width_x * width_y`
    pub fn area(&self) -> B {
        self.x.width() * self.y.width()
    }

    /// Grow both extents by `|d|`.
    pub fn fatten(&self, d: &B) -> Self {
        Self::new(self.x.fatten(d), self.y.fatten(d))
    }

    /// Scale both extents.
    pub fn rescale(&self, s: &B) -> Self {
        Self::new(self.x.rescale(s), self.y.rescale(s))
    }

    /// Translate by `(dx, dy)`.
    pub fn shift(&self, dx: &B, dy: &B) -> Self {
        Self::new(self.x.shift(dx), self.y.shift(dy))
    }

    /// Whether both coordinates are contained.
    pub fn contains(&self, p: &[B; 2], tol: &B) -> bool {
        self.x.contains(&p[0], tol) && self.y.contains(&p[1], tol)
    }
}

fn real(n: i64) -> Real {
    Real::from_integer(n.into())
}

/// The ellipse `{p : (p - c)ᵗ D (p - c) <= 1}` for a positive definite symmetric `D`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    center: [Real; 2],
    d00: Real,
    d01: Real,
    d11: Real,
}

impl Ellipse {
    /// Make an ellipse from its center and the entries of `D`.
    pub fn new(center: [Real; 2], d00: Real, d01: Real, d11: Real) -> GridSynthResult<Self> {
        let e = Self {
            center,
            d00,
            d01,
            d11,
        };
        if !e.d00.is_positive() || !e.det().is_positive() {
            return Err(GridSynthError::ellipse(
                "quadratic form is not positive definite",
            ));
        }
        Ok(e)
    }

    /// Ellipse with semi-axis `along` in direction `angle` and `across` perpendicular to it.
    pub fn from_axes(
        center: [Real; 2],
        along: &Real,
        across: &Real,
        angle: &Real,
        ctx: &NumericContext,
    ) -> GridSynthResult<Self> {
        if !along.is_positive() || !across.is_positive() {
            return Err(GridSynthError::ellipse("semi-axes must be positive"));
        }
        let (s, c) = ctx.sin_cos(angle);
        let ia = Real::one() / (along * along);
        let ib = Real::one() / (across * across);
        let d00 = &c * &c * &ia + &s * &s * &ib;
        let d01 = &c * &s * (&ia - &ib);
        let d11 = &s * &s * &ia + &c * &c * &ib;
        Self::new(center, ctx.round(&d00), ctx.round(&d01), ctx.round(&d11))
    }

    /// Ellipse enclosing the points of the unit disk whose projection on `(cos θ, sin θ)` is at
    /// least `1 - ε²/2`. Budgets of 1 or more give the region of `1 - tol`.
    pub fn epsilon_region(
        theta: &Real,
        epsilon: &Real,
        ctx: &NumericContext,
    ) -> GridSynthResult<Self> {
        let epsilon = Self::region_epsilon(epsilon, ctx);
        let e2 = &epsilon * &epsilon;
        let (s, c) = ctx.sin_cos(theta);
        let r = Real::one() - &e2 / real(3);
        let center = [ctx.round(&(&r * c)), ctx.round(&(&r * s))];
        let radial = &e2 / real(3);
        let chord = ctx.sqrt(&(Real::one() - &e2 / real(4)));
        let across = real(2) / ctx.sqrt(&real(3)) * &epsilon * chord;
        Self::from_axes(center, &radial, &ctx.round(&across), theta, ctx)
    }

    /// The budget [`Ellipse::epsilon_region`] is built from.
    ///
    /// The closed form needs `ε < 2`. Any point found for a budget just below 1 already meets a
    /// larger one, so budgets of 1 or more are searched with `1 - tol`.
    pub fn region_epsilon(epsilon: &Real, ctx: &NumericContext) -> Real {
        let cap = Real::one() - ctx.tol();
        if *epsilon < cap {
            epsilon.clone()
        } else {
            cap
        }
    }

    /// The unit disk.
    pub fn unit_disk() -> Self {
        Self {
            center: [Real::zero(), Real::zero()],
            d00: Real::one(),
            d01: Real::zero(),
            d11: Real::one(),
        }
    }

    /// Center of the ellipse.
    pub fn center(&self) -> &[Real; 2] {
        &self.center
    }

    /// Entries `(D00, D01, D11)` of the quadratic form.
    pub fn form(&self) -> (&Real, &Real, &Real) {
        (&self.d00, &self.d01, &self.d11)
    }

    /// `det D`
    pub fn det(&self) -> Real {
        &self.d00 * &self.d11 - &self.d01 * &self.d01
    }

    /// Eigenvalues of `D`, smaller first.
    fn eigenvalues(&self, ctx: &NumericContext) -> (Real, Real) {
        let half_tr = (&self.d00 + &self.d11) / real(2);
        let root = ctx.sqrt(&(&half_tr * &half_tr - self.det()));
        (&half_tr - &root, half_tr + root)
    }

    /// Semi-axis lengths, larger first.
    ///
    /// For a circle the two are equal and carry no direction.
    pub fn semi_axes(&self, ctx: &NumericContext) -> (Real, Real) {
        let (small, large) = self.eigenvalues(ctx);
        (
            Real::one() / ctx.sqrt(&small),
            Real::one() / ctx.sqrt(&large),
        )
    }

    /// Angle of the major axis in `(-π/2, π/2]`. Circles report zero.
    pub fn tilt(&self, ctx: &NumericContext) -> Real {
        let y = -&self.d01 * real(2);
        let x = &self.d11 - &self.d00;
        if y.is_zero() && x.is_zero() {
            return Real::zero();
        }
        ctx.atan2(&y, &x) / real(2)
    }

    /// `π/√det D`
    pub fn area(&self, ctx: &NumericContext) -> Real {
        ctx.round(&(ctx.pi() / ctx.sqrt(&self.det())))
    }

    /// Ratio of the area to the area of the bounding box, `(π/4)·√(det D/(D00·D11))`.
    pub fn uprightness(&self, ctx: &NumericContext) -> Real {
        let r = self.det() / (&self.d00 * &self.d11);
        ctx.round(&(ctx.pi() / real(4) * ctx.sqrt(&r)))
    }

    /// `ln(D11/D00) / (2 ln λ)`, so that `D00 = e·λ^-z` and `D11 = e·λ^z`.
    pub fn z(&self, ctx: &NumericContext) -> Real {
        ctx.round(&(ctx.ln(&(&self.d11 / &self.d00)) / (real(2) * ctx.ln_lambda())))
    }

    /// `√(D00·D11)`
    pub fn e(&self, ctx: &NumericContext) -> Real {
        ctx.sqrt(&(&self.d00 * &self.d11))
    }

    /// `D01²`
    pub fn skew(&self) -> Real {
        &self.d01 * &self.d01
    }

    /// Scale the ellipse geometrically by `s`: `D ← D/s²`, `center ← s·center`.
    pub fn rescale(&self, s: &Real, ctx: &NumericContext) -> Self {
        let s2 = s * s;
        Self {
            center: [
                ctx.round(&(&self.center[0] * s)),
                ctx.round(&(&self.center[1] * s)),
            ],
            d00: ctx.round(&(&self.d00 / &s2)),
            d01: ctx.round(&(&self.d01 / &s2)),
            d11: ctx.round(&(&self.d11 / &s2)),
        }
    }

    /// Translate by `v`.
    pub fn shift(&self, v: &[Real; 2]) -> Self {
        let mut e = self.clone();
        e.center = [&self.center[0] + &v[0], &self.center[1] + &v[1]];
        e
    }

    /// Grow both semi-axes by `|d|` keeping the axis directions.
    pub fn fatten(&self, d: &Real, ctx: &NumericContext) -> Self {
        let d = d.abs();
        let grow = |mu: &Real| {
            let r = Real::one() / ctx.sqrt(mu) + &d;
            ctx.round(&(Real::one() / (&r * &r)))
        };
        let (m1, m2) = self.eigenvalues(ctx);
        let (f1, f2) = (grow(&m1), grow(&m2));
        let mut e = self.clone();
        if m1 == m2 {
            e.d00 = f1.clone();
            e.d01 = Real::zero();
            e.d11 = f1;
        } else {
            // D' = αI + βD shares the eigenvectors of D.
            let beta = (&f2 - &f1) / (&m2 - &m1);
            let alpha = f1 - &beta * &m1;
            e.d00 = ctx.round(&(&alpha + &beta * &self.d00));
            e.d01 = ctx.round(&(&beta * &self.d01));
            e.d11 = ctx.round(&(&alpha + &beta * &self.d11));
        }
        e
    }

    /// Rescale to unit determinant, returns the ellipse and the factor applied.
    pub fn normalize(&self, ctx: &NumericContext) -> (Self, Real) {
        let s = ctx.sqrt(&ctx.sqrt(&self.det()));
        (self.rescale(&s, ctx), s)
    }

    /// Whether `p` satisfies the quadratic form within `tol`.
    pub fn contains(&self, p: &[Real; 2], tol: &Real) -> bool {
        let dx = &p[0] - &self.center[0];
        let dy = &p[1] - &self.center[1];
        let q = &self.d00 * &dx * &dx + real(2) * &self.d01 * &dx * &dy + &self.d11 * &dy * &dy;
        let v = Real::one() - q;
        v.is_positive() || v.abs() < *tol
    }

    /// Smallest upright rectangle containing the ellipse.
    pub fn bounding_box(&self, ctx: &NumericContext) -> GridSynthResult<UprightRectangle<Real>> {
        let det = self.det();
        let w = ctx.sqrt(&(&self.d11 / &det));
        let h = ctx.sqrt(&(&self.d00 / &det));
        Ok(UprightRectangle::new(
            Interval::new(&self.center[0] - &w, &self.center[0] + &w)?,
            Interval::new(&self.center[1] - &h, &self.center[1] + &h)?,
        ))
    }

    /// The y extent of the ellipse above abscissa `x`, `None` if the line misses it.
    pub fn slice(&self, x: &Real, ctx: &NumericContext) -> GridSynthResult<Option<Interval<Real>>> {
        let dx = x - &self.center[0];
        let disc = &self.d11 - &dx * &dx * self.det();
        if disc.is_negative() {
            return Ok(None);
        }
        let root = ctx.sqrt(&disc);
        let mid = -&self.d01 * &dx;
        let lo = &self.center[1] + (&mid - &root) / &self.d11;
        let hi = &self.center[1] + (mid + root) / &self.d11;
        Interval::new(lo, hi).map(Some)
    }

    /// Pull back by the grid operator `g`: `D ← gᵗ D g`, `center ← g⁻¹ center`.
    pub fn transform(&self, g: &GridOp, ctx: &NumericContext) -> Self {
        self.transform_with(&g.to_real(ctx), &g.inverse().to_real(ctx), ctx)
    }

    /// Pull back by an invertible real matrix given row major.
    pub fn transform_real(&self, m: &[Real; 4], ctx: &NumericContext) -> GridSynthResult<Self> {
        let det = &m[0] * &m[3] - &m[1] * &m[2];
        if det.is_zero() {
            return Err(GridSynthError::ellipse("transform matrix is singular"));
        }
        let inv = [
            &m[3] / &det,
            -&m[1] / &det,
            -&m[2] / &det,
            &m[0] / &det,
        ];
        Ok(self.transform_with(m, &inv, ctx))
    }

    fn transform_with(&self, m: &[Real; 4], inv: &[Real; 4], ctx: &NumericContext) -> Self {
        let [a, b, c, d] = m;
        // gᵗ D g for g = [[a, b], [c, d]]
        let p00 = &self.d00 * a + &self.d01 * c;
        let p01 = &self.d00 * b + &self.d01 * d;
        let p10 = &self.d01 * a + &self.d11 * c;
        let p11 = &self.d01 * b + &self.d11 * d;
        let d00 = a * &p00 + c * &p10;
        let d01 = a * &p01 + c * &p11;
        let d11 = b * &p01 + d * &p11;
        let [cx, cy] = &self.center;
        let center = [
            ctx.round(&(&inv[0] * cx + &inv[1] * cy)),
            ctx.round(&(&inv[2] * cx + &inv[3] * cy)),
        ];
        Self {
            center,
            d00: ctx.round(&d00),
            d01: ctx.round(&d01),
            d11: ctx.round(&d11),
        }
    }
}

/// The pair of ellipses searched together: `u` must land in `first` and `u•` in `second`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Region for the candidate itself.
    pub first: Ellipse,
    /// Region for its √2-conjugate.
    pub second: Ellipse,
}

impl SearchState {
    /// Pair two ellipses.
    pub fn new(first: Ellipse, second: Ellipse) -> Self {
        Self { first, second }
    }

    /// Pull back by `g` on the first ellipse and by `g•` on the second.
    pub fn transform(&self, g: &GridOp, ctx: &NumericContext) -> Self {
        Self::new(
            self.first.transform(g, ctx),
            self.second.transform(&g.conj_sqrt2(), ctx),
        )
    }

    /// Scale the two ellipses independently.
    pub fn rescale(&self, s_first: &Real, s_second: &Real, ctx: &NumericContext) -> Self {
        Self::new(
            self.first.rescale(s_first, ctx),
            self.second.rescale(s_second, ctx),
        )
    }

    /// Bring both ellipses to unit determinant.
    pub fn normalize(&self, ctx: &NumericContext) -> Self {
        Self::new(self.first.normalize(ctx).0, self.second.normalize(ctx).0)
    }

    /// `b² + β²`, the sum of the off-diagonal squares.
    pub fn skew(&self) -> Real {
        self.first.skew() + self.second.skew()
    }

    /// `ζ - z`
    pub fn bias(&self, ctx: &NumericContext) -> Real {
        self.second.z(ctx) - self.first.z(ctx)
    }
}
