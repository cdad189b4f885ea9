//! 单条边界环
//!
//! 一条环由基础顶点（形状）和加密后的点序列（参与剖分的实际点）组成。
//! 点包含测试只针对基础多边形进行，加密点不改变形状，
//! 因此分类阶段只需要基础环和它的包围矩形。

use crate::error::MeshError;
use crate::geometry::{Point2, Rect};

use super::generator::BoundaryPointGenerator;

/// 边界环：基础顶点 + 加密点 + 基础顶点在加密环中的偏移
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    id: u32,
    base: Vec<Point2>,
    points: Vec<Point2>,
    /// 每个基础顶点在 `points` 中的下标
    base_offsets: Vec<usize>,
    rect: Rect,
}

impl BoundaryLoop {
    /// 校验基础环并生成加密环
    ///
    /// # 参数
    /// - `base`: 基础顶点，按环方向排列，至少 3 个
    /// - `generator`: 加密点生成策略
    /// - `id`: 环编号（外环 0，孔洞 1..，由容器分配）
    ///
    /// # 错误
    /// - 基础顶点不足 3 个
    /// - 生成器输出没有按原顺序包含全部基础顶点
    pub fn new(
        base: &[Point2],
        generator: &dyn BoundaryPointGenerator,
        id: u32,
    ) -> Result<Self, MeshError> {
        if base.len() < 3 {
            return Err(MeshError::InvalidBoundary(
                "boundary loop needs at least 3 base vertices",
            ));
        }

        let points = generator.generate(base);
        if points.len() < base.len() {
            return Err(MeshError::InvalidBoundary(
                "generator produced fewer points than base vertices",
            ));
        }

        // 基础顶点必须按精确坐标、按原顺序出现在加密环中
        let mut base_offsets = Vec::with_capacity(base.len());
        let mut cursor = 0usize;
        for v in base {
            let found = points[cursor..].iter().position(|p| p == v);
            match found {
                Some(off) => {
                    base_offsets.push(cursor + off);
                    cursor += off + 1;
                }
                None => {
                    return Err(MeshError::InvalidBoundary(
                        "generator output does not contain base vertices in order",
                    ));
                }
            }
        }

        let rect = Rect::from_points(base);

        Ok(Self {
            id,
            base: base.to_vec(),
            points,
            base_offsets,
            rect,
        })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 基础顶点环
    #[inline]
    pub fn base(&self) -> &[Point2] {
        &self.base
    }

    /// 加密后的边界点环
    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn base_offsets(&self) -> &[usize] {
        &self.base_offsets
    }

    /// 基础顶点的包围矩形
    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::generator::EvenEdgeGenerator;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn test_loop_construction() {
        let l = BoundaryLoop::new(&square(), &EvenEdgeGenerator::new(1), 0).unwrap();
        assert_eq!(l.point_count(), 8);
        assert_eq!(l.base_offsets(), &[0, 2, 4, 6]);
        assert_eq!(l.rect().min, Point2::new(0.0, 0.0));
        assert_eq!(l.rect().max, Point2::new(4.0, 4.0));
    }

    #[test]
    fn test_too_few_vertices() {
        let base = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let err = BoundaryLoop::new(&base, &EvenEdgeGenerator::new(0), 0).unwrap_err();
        assert!(matches!(err, MeshError::InvalidBoundary(_)));
    }

    #[test]
    fn test_generator_breaking_subsequence_is_rejected() {
        struct Shuffler;
        impl BoundaryPointGenerator for Shuffler {
            fn generate(&self, base: &[Point2]) -> Vec<Point2> {
                let mut v = base.to_vec();
                v.reverse();
                v
            }
        }
        let err = BoundaryLoop::new(&square(), &Shuffler, 0).unwrap_err();
        assert!(matches!(err, MeshError::InvalidBoundary(_)));
    }
}
