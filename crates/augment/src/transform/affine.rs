use imageproc::geometric_transformations::Projection;

/// A 2x3 affine matrix, row-major. The single source of truth shared by a
/// transform's coordinate mapping and its raster warp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    pub m: [[f64; 3]; 2],
}

impl Affine2 {
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Shear by the given angles in degrees:
    /// `[[1, tan(angle_h), 0], [tan(angle_v), 1, 0]]`.
    pub fn shear(angle_h: f64, angle_v: f64) -> Self {
        Self {
            m: [
                [1.0, angle_h.to_radians().tan(), 0.0],
                [angle_v.to_radians().tan(), 1.0, 0.0],
            ],
        }
    }

    /// Rotation by `angle` degrees about `(cx, cy)`, canvas size unchanged.
    pub fn rotation_about(angle: f64, cx: f64, cy: f64) -> Self {
        let theta = angle.to_radians();
        let (sin, cos) = theta.sin_cos();
        Self {
            m: [
                [cos, sin, (1.0 - cos) * cx - sin * cy],
                [-sin, cos, sin * cx + (1.0 - cos) * cy],
            ],
        }
    }

    /// Independent axis scaling followed by translation.
    pub fn scale_translate(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            m: [[sx, 0.0, tx], [0.0, sy, ty]],
        }
    }

    /// Applies the matrix to one point in homogeneous form `(x, y, 1)`.
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        let [x, y] = p;
        [
            self.m[0][0] * x + self.m[0][1] * y + self.m[0][2],
            self.m[1][0] * x + self.m[1][1] * y + self.m[1][2],
        ]
    }

    /// The forward projection used to warp rasters. `None` when the matrix
    /// is singular and no resampling is possible.
    pub fn to_projection(&self) -> Option<Projection> {
        Projection::from_matrix([
            self.m[0][0] as f32,
            self.m[0][1] as f32,
            self.m[0][2] as f32,
            self.m[1][0] as f32,
            self.m[1][1] as f32,
            self.m[1][2] as f32,
            0.0,
            0.0,
            1.0,
        ])
    }
}
