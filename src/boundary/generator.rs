//! 边界加密点生成器
//!
//! 基础顶点只描述边界的形状；三角剖分希望边界边长与内部点间距
//! 相称，因此在每条基础边上按策略插入加密点。
//! 生成器只负责产出点序列，环结构的校验在 [`super::BoundaryLoop`] 中完成。

use crate::geometry::Point2;

/// 边界点生成策略
///
/// 实现必须保证：输出序列按环方向排列，且基础顶点以原坐标
/// 按原顺序出现在输出中（子序列不变式）。
pub trait BoundaryPointGenerator {
    /// 由基础顶点环生成加密后的边界点环
    fn generate(&self, base: &[Point2]) -> Vec<Point2>;
}

/// 每条边等距插入固定数量加密点的生成器
///
/// `points_per_edge` 为 0 时原样返回基础环。
///
/// # 示例
///
/// ```ignore
/// let gen = EvenEdgeGenerator::new(1);
/// let ring = gen.generate(&base);
/// // 每条边中点被插入，环长变为 2 倍
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EvenEdgeGenerator {
    pub points_per_edge: usize,
}

impl EvenEdgeGenerator {
    pub const fn new(points_per_edge: usize) -> Self {
        Self { points_per_edge }
    }
}

impl BoundaryPointGenerator for EvenEdgeGenerator {
    fn generate(&self, base: &[Point2]) -> Vec<Point2> {
        let k = self.points_per_edge;
        let mut out = Vec::with_capacity(base.len() * (k + 1));
        for (i, a) in base.iter().enumerate() {
            let b = &base[(i + 1) % base.len()];
            out.push(*a);
            for j in 1..=k {
                let t = j as f64 / (k + 1) as f64;
                out.push(Point2::new(
                    a.x + (b.x - a.x) * t,
                    a.y + (b.y - a.y) * t,
                ));
            }
        }
        out
    }
}
