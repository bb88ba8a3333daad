use crate::errors::{GridSynthError, GridSynthResult};
use crate::numeric::{NumericContext, Real};
use crate::rings::{ZOmega, ZSqrt2};
use num::bigint::BigInt;
use num::{One, Zero};
use std::ops::Mul;

/// A special grid operator: a real 2x2 matrix `M/√2^s`, `M` over `Z[√2]`, with determinant `±1`
/// in `Z[√2]` which maps `Z[ω]`, viewed as a lattice in the plane, onto itself.
///
/// Both the matrix and its exact inverse are kept, together with their action on the integral
/// basis `1, ω, ω², ω³`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOp {
    mat: [ZSqrt2; 4],
    scale: u32,
    inv_mat: [ZSqrt2; 4],
    inv_scale: u32,
    images: [ZOmega; 4],
    inv_images: [ZOmega; 4],
}

/// `√2·(1, ω, ω², ω³)` as points of the plane with coordinates in `Z[√2]`.
fn basis_points() -> [(ZSqrt2, ZSqrt2); 4] {
    [
        (ZSqrt2::sqrt2(), ZSqrt2::zero()),
        (ZSqrt2::one(), ZSqrt2::one()),
        (ZSqrt2::zero(), ZSqrt2::sqrt2()),
        (-ZSqrt2::one(), ZSqrt2::one()),
    ]
}

/// Images of the basis under `m/√2^scale`, `None` if some image leaves `Z[ω]`.
fn basis_images(m: &[ZSqrt2; 4], scale: u32) -> Option<[ZOmega; 4]> {
    let images = basis_points()
        .iter()
        .map(|(x, y)| {
            let px = &m[0] * x + &m[1] * y;
            let py = &m[2] * x + &m[3] * y;
            let mut z = ZOmega::from_zsqrt2(&px) + ZOmega::i() * ZOmega::from_zsqrt2(&py);
            for _ in 0..=scale {
                z = z.reduce()?;
            }
            Some(z)
        })
        .collect::<Option<Vec<_>>>()?;
    <[ZOmega; 4]>::try_from(images).ok()
}

fn det(m: &[ZSqrt2; 4]) -> ZSqrt2 {
    &m[0] * &m[3] - &m[1] * &m[2]
}

fn mat_mul(x: &[ZSqrt2; 4], y: &[ZSqrt2; 4]) -> [ZSqrt2; 4] {
    [
        &x[0] * &y[0] + &x[1] * &y[2],
        &x[0] * &y[1] + &x[1] * &y[3],
        &x[2] * &y[0] + &x[3] * &y[2],
        &x[2] * &y[1] + &x[3] * &y[3],
    ]
}

/// Divide out common factors of `√2`.
fn simplify(mut m: [ZSqrt2; 4], mut scale: u32) -> ([ZSqrt2; 4], u32) {
    while scale > 0 {
        let divided: Option<Vec<ZSqrt2>> = m.iter().map(|x| x.div_sqrt2()).collect();
        match divided.and_then(|v| <[ZSqrt2; 4]>::try_from(v).ok()) {
            Some(d) => {
                m = d;
                scale -= 1;
            }
            None => break,
        }
    }
    (m, scale)
}

/// `n·u`
fn scale_int(n: &BigInt, u: &ZOmega) -> ZOmega {
    ZOmega::new(n * &u.a, n * &u.b, n * &u.c, n * &u.d)
}

fn act(images: &[ZOmega; 4], u: &ZOmega) -> ZOmega {
    scale_int(&u.a, &images[0])
        + scale_int(&u.b, &images[1])
        + scale_int(&u.c, &images[2])
        + scale_int(&u.d, &images[3])
}

impl GridOp {
    /// Make the operator `mat/√2^scale`, row major.
    ///
    /// Fails unless the determinant is a unit of `Z[√2]` and both the operator and its inverse
    /// map `Z[ω]` into itself.
    pub fn new(mat: [ZSqrt2; 4], scale: u32) -> GridSynthResult<Self> {
        let (mat, scale) = simplify(mat, scale);
        let mut unit = det(&mat);
        for _ in 0..2 * scale {
            unit = unit
                .div_sqrt2()
                .ok_or_else(|| GridSynthError::grid_op("determinant is not a unit"))?;
        }
        if !unit.is_unit() {
            return Err(GridSynthError::grid_op(format!(
                "determinant {} is not a unit",
                unit
            )));
        }
        // u⁻¹ = N(u)·u• for a unit u.
        let unit_inv = ZSqrt2::from_int(unit.norm()) * unit.conj_sqrt2();
        let adj = [
            mat[3].clone(),
            -&mat[1],
            -&mat[2],
            mat[0].clone(),
        ];
        let inv_mat = [
            &adj[0] * &unit_inv,
            &adj[1] * &unit_inv,
            &adj[2] * &unit_inv,
            &adj[3] * &unit_inv,
        ];
        let (inv_mat, inv_scale) = simplify(inv_mat, scale);
        let images = basis_images(&mat, scale)
            .ok_or_else(|| GridSynthError::grid_op("image of Z[ω] leaves the lattice"))?;
        let inv_images = basis_images(&inv_mat, inv_scale).ok_or_else(|| {
            GridSynthError::grid_op("image of Z[ω] under the inverse leaves the lattice")
        })?;
        Ok(Self {
            mat,
            scale,
            inv_mat,
            inv_scale,
            images,
            inv_images,
        })
    }

    /// The identity.
    pub fn identity() -> GridSynthResult<Self> {
        Self::new(
            [ZSqrt2::one(), ZSqrt2::zero(), ZSqrt2::zero(), ZSqrt2::one()],
            0,
        )
    }

    /// `R = 1/√2 [[1, -1], [1, 1]]`
    pub fn r() -> GridSynthResult<Self> {
        Self::new(
            [
                ZSqrt2::one(),
                -ZSqrt2::one(),
                ZSqrt2::one(),
                ZSqrt2::one(),
            ],
            1,
        )
    }

    /// `K = 1/√2 [[-λ⁻¹, -1], [λ, 1]]`
    pub fn k() -> GridSynthResult<Self> {
        Self::new(
            [
                ZSqrt2::new(1, -1),
                ZSqrt2::from_int(-1),
                ZSqrt2::new(1, 1),
                ZSqrt2::one(),
            ],
            1,
        )
    }

    /// `Aⁿ = [[1, -2n], [0, 1]]`
    pub fn a_pow(n: i64) -> GridSynthResult<Self> {
        Self::new(
            [
                ZSqrt2::one(),
                ZSqrt2::from_int(-2 * n),
                ZSqrt2::zero(),
                ZSqrt2::one(),
            ],
            0,
        )
    }

    /// `Bⁿ = [[1, n√2], [0, 1]]`
    pub fn b_pow(n: i64) -> GridSynthResult<Self> {
        Self::new(
            [
                ZSqrt2::one(),
                ZSqrt2::new(0, n),
                ZSqrt2::zero(),
                ZSqrt2::one(),
            ],
            0,
        )
    }

    /// `X = [[0, 1], [1, 0]]`
    pub fn x() -> GridSynthResult<Self> {
        Self::new(
            [ZSqrt2::zero(), ZSqrt2::one(), ZSqrt2::one(), ZSqrt2::zero()],
            0,
        )
    }

    /// `Z = [[1, 0], [0, -1]]`
    pub fn z() -> GridSynthResult<Self> {
        Self::new(
            [ZSqrt2::one(), ZSqrt2::zero(), ZSqrt2::zero(), -ZSqrt2::one()],
            0,
        )
    }

    /// Entries of `M` and the exponent `s` of `M/√2^s`.
    pub fn matrix(&self) -> (&[ZSqrt2; 4], u32) {
        (&self.mat, self.scale)
    }

    /// The determinant, a unit of `Z[√2]`.
    pub fn det(&self) -> ZSqrt2 {
        let mut d = det(&self.mat);
        for _ in 0..2 * self.scale {
            d = match d.div_sqrt2() {
                Some(x) => x,
                None => break,
            };
        }
        d
    }

    /// Apply to an element of `Z[ω]`.
    pub fn apply(&self, u: &ZOmega) -> ZOmega {
        act(&self.images, u)
    }

    /// Apply the inverse to an element of `Z[ω]`.
    pub fn apply_inverse(&self, u: &ZOmega) -> ZOmega {
        act(&self.inv_images, u)
    }

    /// The inverse operator.
    pub fn inverse(&self) -> Self {
        Self {
            mat: self.inv_mat.clone(),
            scale: self.inv_scale,
            inv_mat: self.mat.clone(),
            inv_scale: self.scale,
            images: self.inv_images.clone(),
            inv_images: self.images.clone(),
        }
    }

    /// The transposed operator.
    pub fn transpose(&self) -> GridSynthResult<Self> {
        let m = &self.mat;
        Self::new(
            [m[0].clone(), m[2].clone(), m[1].clone(), m[3].clone()],
            self.scale,
        )
    }

    /// The √2-conjugate `G•`, satisfying `G•(u•) = (G u)•`.
    pub fn conj_sqrt2(&self) -> Self {
        let conj = |m: &[ZSqrt2; 4], scale: u32| {
            let flip = |x: &ZSqrt2| {
                let c = x.conj_sqrt2();
                if scale % 2 == 1 {
                    -c
                } else {
                    c
                }
            };
            [flip(&m[0]), flip(&m[1]), flip(&m[2]), flip(&m[3])]
        };
        let conj_images = |imgs: &[ZOmega; 4]| {
            [
                imgs[0].conj_sqrt2(),
                -imgs[1].conj_sqrt2(),
                imgs[2].conj_sqrt2(),
                -imgs[3].conj_sqrt2(),
            ]
        };
        Self {
            mat: conj(&self.mat, self.scale),
            scale: self.scale,
            inv_mat: conj(&self.inv_mat, self.inv_scale),
            inv_scale: self.inv_scale,
            images: conj_images(&self.images),
            inv_images: conj_images(&self.inv_images),
        }
    }

    /// `diag(λᵏ, 1)·G·diag(λ⁻ᵏ, 1)`
    pub fn shift(&self, k: i64) -> GridSynthResult<Self> {
        if k == 0 {
            return Ok(self.clone());
        }
        let m = &self.mat;
        Self::new(
            [
                m[0].clone(),
                &m[1] * ZSqrt2::lambda_pow(k),
                &m[2] * ZSqrt2::lambda_pow(-k),
                m[3].clone(),
            ],
            self.scale,
        )
    }

    /// Compose with `other`, applying `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        let (mat, scale) = simplify(mat_mul(&self.mat, &other.mat), self.scale + other.scale);
        let (inv_mat, inv_scale) = simplify(
            mat_mul(&other.inv_mat, &self.inv_mat),
            self.inv_scale + other.inv_scale,
        );
        let images = [
            self.apply(&other.images[0]),
            self.apply(&other.images[1]),
            self.apply(&other.images[2]),
            self.apply(&other.images[3]),
        ];
        let inv_images = [
            other.apply_inverse(&self.inv_images[0]),
            other.apply_inverse(&self.inv_images[1]),
            other.apply_inverse(&self.inv_images[2]),
            other.apply_inverse(&self.inv_images[3]),
        ];
        Self {
            mat,
            scale,
            inv_mat,
            inv_scale,
            images,
            inv_images,
        }
    }

    /// The real matrix, row major.
    pub fn to_real(&self, ctx: &NumericContext) -> [Real; 4] {
        let s = ctx.pow_sqrt2(self.scale);
        let entry = |x: &ZSqrt2| ctx.round(&(x.to_real(ctx) / &s));
        [
            entry(&self.mat[0]),
            entry(&self.mat[1]),
            entry(&self.mat[2]),
            entry(&self.mat[3]),
        ]
    }
}

impl<'a, 'b> Mul<&'b GridOp> for &'a GridOp {
    type Output = GridOp;
    fn mul(self, rhs: &'b GridOp) -> GridOp {
        self.compose(rhs)
    }
}

impl Mul<GridOp> for GridOp {
    type Output = GridOp;
    fn mul(self, rhs: GridOp) -> GridOp {
        self.compose(&rhs)
    }
}
