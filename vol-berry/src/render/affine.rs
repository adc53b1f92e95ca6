//! 3D 仿射变换.

use crate::consts::axis::{NDIM, X, Y, Z};
use crate::{FigureError, FigureResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 3D 仿射变换, 以 3x4 矩阵 `[A | t]` 保存, 作用于列向量: `p' = A p + t`.
///
/// 构造方法都是 "后接" 语义: `t.rotate(..)` 表示先做 `t`, 再旋转.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Affine3 {
    m: [[f64; 4]; 3],
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine3 {
    /// 恒等变换.
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
        }
    }

    /// 由 3x4 矩阵直接构造.
    #[inline]
    pub const fn from_matrix(m: [[f64; 4]; 3]) -> Self {
        Self { m }
    }

    /// 3x4 矩阵.
    #[inline]
    pub const fn matrix(&self) -> &[[f64; 4]; 3] {
        &self.m
    }

    /// 绕轴 `axis` 旋转 `rad` 弧度 (右手系). 轴不是 0, 1 或 2 时返回
    /// `Err(FigureError::InvalidAxis)`.
    pub fn rotation(axis: usize, rad: f64) -> FigureResult<Self> {
        if axis >= NDIM {
            return Err(FigureError::InvalidAxis(axis));
        }
        Ok(Self::rotation_in_plane((axis + 1) % NDIM, (axis + 2) % NDIM, rad))
    }

    /// 论文插图使用的 "转台" 视角: 先绕 y 轴旋转 `yaw_deg` 度,
    /// 再绕 x 轴旋转 `pitch_deg` 度, 最后均匀缩放 `scale` 倍.
    pub fn turntable(yaw_deg: f64, pitch_deg: f64, scale: f64) -> Self {
        Self::rotation_in_plane(Z, X, yaw_deg.to_radians())
            .then(&Self::rotation_in_plane(Y, Z, pitch_deg.to_radians()))
            .scale(scale)
    }

    /// 在 `(a, b)` 平面内从 `a` 轴转向 `b` 轴.
    fn rotation_in_plane(a: usize, b: usize, rad: f64) -> Self {
        let (s, c) = rad.sin_cos();
        let mut r = Self::identity();
        r.m[a][a] = c;
        r.m[a][b] = -s;
        r.m[b][a] = s;
        r.m[b][b] = c;
        r
    }

    /// 在当前变换之后绕轴 `axis` 旋转 `rad` 弧度.
    pub fn rotate(self, axis: usize, rad: f64) -> FigureResult<Self> {
        Ok(self.then(&Self::rotation(axis, rad)?))
    }

    /// 同 [`Affine3::rotate`], 但以角度表示.
    pub fn rotate_deg(self, axis: usize, deg: f64) -> FigureResult<Self> {
        self.rotate(axis, deg.to_radians())
    }

    /// 在当前变换之后做均匀缩放.
    pub fn scale(self, s: f64) -> Self {
        let mut m = self.m;
        m.iter_mut().flatten().for_each(|v| *v *= s);
        Self { m }
    }

    /// 在当前变换之后做平移.
    pub fn translate(self, t: [f64; 3]) -> Self {
        let mut m = self.m;
        for (row, d) in m.iter_mut().zip(t) {
            row[3] += d;
        }
        Self { m }
    }

    /// 复合: 先做 `self`, 再做 `next`.
    pub fn then(&self, next: &Self) -> Self {
        let (a, b) = (&next.m, &self.m);
        let mut m = [[0.0; 4]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| a[i][k] * b[k][j]).sum();
            }
            row[3] += a[i][3];
        }
        Self { m }
    }

    /// 线性部分的行列式.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// 逆变换. 线性部分奇异时返回 `Err(FigureError::SingularTransform)`.
    pub fn inverse(&self) -> FigureResult<Self> {
        let det = self.determinant();
        if !det.is_normal() {
            return Err(FigureError::SingularTransform(det));
        }
        let m = &self.m;
        // 伴随矩阵 (余子式的转置) 除以行列式.
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0];
        let lin = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];

        let mut inv = [[0.0; 4]; 3];
        for i in 0..3 {
            for j in 0..3 {
                inv[i][j] = lin[i][j] / det;
            }
            inv[i][3] = -(0..3).map(|k| inv[i][k] * m[k][3]).sum::<f64>();
        }
        Ok(Self { m: inv })
    }

    /// 对点 `p` 施加变换.
    #[inline]
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [0, 1, 2].map(|i| m[i][0] * p[0] + m[i][1] * p[1] + m[i][2] * p[2] + m[i][3])
    }
}

#[cfg(test)]
mod tests {
    use super::Affine3;
    use crate::FigureError;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_rotation_is_right_handed() {
        let rz = Affine3::rotation(2, std::f64::consts::FRAC_PI_2).unwrap();
        assert!(close(rz.apply([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
        let rx = Affine3::identity().rotate_deg(0, 90.0).unwrap();
        assert!(close(rx.apply([0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]));
        let ry = Affine3::identity().rotate_deg(1, 90.0).unwrap();
        assert!(close(ry.apply([0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]));

        assert!(matches!(Affine3::rotation(3, 1.0), Err(FigureError::InvalidAxis(3))));
    }

    #[test]
    fn test_turntable_matches_rotate() {
        let a = Affine3::turntable(38.0, 15.0, 0.7);
        let b = Affine3::identity()
            .rotate_deg(1, 38.0)
            .unwrap()
            .rotate_deg(0, 15.0)
            .unwrap()
            .scale(0.7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_composition_order() {
        // 先平移再缩放, 与先缩放再平移不同.
        let a = Affine3::identity().translate([1.0, 0.0, 0.0]).scale(2.0);
        let b = Affine3::identity().scale(2.0).translate([1.0, 0.0, 0.0]);
        assert!(close(a.apply([1.0, 1.0, 1.0]), [4.0, 2.0, 2.0]));
        assert!(close(b.apply([1.0, 1.0, 1.0]), [3.0, 2.0, 2.0]));
    }

    #[test]
    fn test_inverse() {
        let t = Affine3::identity()
            .rotate_deg(1, 38.0)
            .unwrap()
            .rotate_deg(0, 15.0)
            .unwrap()
            .scale(0.7)
            .translate([3.0, -2.0, 5.5]);
        let inv = t.inverse().unwrap();
        for p in [[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [-7.5, 4.0, 100.0]] {
            assert!(close(inv.apply(t.apply(p)), p));
        }
        assert!(close(t.then(&inv).apply([9.0, 8.0, 7.0]), [9.0, 8.0, 7.0]));
        assert_eq!(Affine3::identity().inverse().unwrap(), Affine3::identity());

        assert!(matches!(
            Affine3::identity().scale(0.0).inverse(),
            Err(FigureError::SingularTransform(_))
        ));
    }
}
