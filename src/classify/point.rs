//! 点的区域分类与裁剪
//!
//! 射线计数法：从固定的外部参考点向被测点连线，数它与边界
//! 多边形的真穿越次数，奇数次在内、偶数次在外。参考点在
//! 构造时一次定死，整个裁剪阶段所有判定共用。
//!
//! 多边形测试只用基础顶点环，加密点不改变形状。顶点较多的
//! 环先用包围矩形粗筛。

use rayon::prelude::*;

use crate::boundary::{BoundaryContainer, BoundaryTable};
use crate::geometry::{predicates, Point2};
use crate::triangulation::PointStatus;

/// 区域分类器
///
/// 生命周期内边界与参考点都不变，可在多线程间只读共享。
pub struct AreaClassifier<'a> {
    container: &'a BoundaryContainer,
    reference: Point2,
}

impl<'a> AreaClassifier<'a> {
    /// 固定外部参考点并构造分类器
    ///
    /// 参考点 x 取点云与全部边界矩形最大 x 的 1.1 倍
    /// （边界可能伸出点云之外，参考点必须严格在外环右侧），
    /// y 取点云质心的 y。
    pub fn new(container: &'a BoundaryContainer, points: &[Point2]) -> Self {
        let mut max_x = f64::NEG_INFINITY;
        for p in points {
            max_x = max_x.max(p.x);
        }
        for r in container.rects() {
            max_x = max_x.max(r.max.x);
        }
        // 最大 x 非正时乘法不再向右移，改为加固定偏移
        let rx = if max_x > 0.0 { max_x * 1.1 } else { max_x + 1.0 };

        let ry = if points.is_empty() {
            (container.outer().rect().min.y + container.outer().rect().max.y) / 2.0
        } else {
            points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
        };

        Self {
            container,
            reference: Point2::new(rx, ry),
        }
    }

    #[inline]
    pub fn reference(&self) -> &Point2 {
        &self.reference
    }

    /// 从参考点到 `p` 的连线与多边形基础环的真穿越次数
    fn crossings(&self, p: &Point2, base: &[Point2]) -> usize {
        let mut count = 0;
        for (i, a) in base.iter().enumerate() {
            let b = &base[(i + 1) % base.len()];
            if predicates::segments_cross(&self.reference, p, a, b) {
                count += 1;
            }
        }
        count
    }

    /// 点是否位于有效区域（外环之内且不落入任何孔洞）
    pub fn is_in_area(&self, p: &Point2) -> bool {
        let outer = self.container.outer();

        // 顶点较多的外环先走矩形粗筛
        if outer.base().len() > 4 && !outer.rect().contains(p) {
            return false;
        }
        if self.crossings(p, outer.base()) % 2 == 0 {
            return false;
        }

        for hole in self.container.holes() {
            // 点在孔洞矩形之外时孔洞测试必然为“不在孔内”，直接跳过
            if hole.base().len() > 4 && !hole.rect().contains(p) {
                continue;
            }
            if self.crossings(p, hole.base()) % 2 == 1 {
                return false;
            }
        }

        true
    }

    /// 裁剪点云：区域外的点标记 External 并就地压缩移除
    ///
    /// `parallel` 打开时分类走 rayon 数据并行，存活数由各线程
    /// 局部计数归并求和；压缩始终串行（保持顺序）。
    /// 返回存活点数。对已裁剪过的点集重复调用是幂等的。
    pub fn clip(
        &self,
        points: &mut Vec<Point2>,
        statuses: &mut Vec<PointStatus>,
        parallel: bool,
    ) -> usize {
        let survivors = if parallel {
            let inside: Vec<bool> = points.par_iter().map(|p| self.is_in_area(p)).collect();
            let count: usize = inside.par_iter().map(|&b| b as usize).sum();
            for (s, &keep) in statuses.iter_mut().zip(&inside) {
                *s = if keep {
                    PointStatus::Internal
                } else {
                    PointStatus::External
                };
            }
            count
        } else {
            let mut count = 0;
            for (s, p) in statuses.iter_mut().zip(points.iter()) {
                if self.is_in_area(p) {
                    *s = PointStatus::Internal;
                    count += 1;
                } else {
                    *s = PointStatus::External;
                }
            }
            count
        };

        // 就地压缩，points 与 statuses 同步前移
        let mut w = 0;
        for r in 0..points.len() {
            if statuses[r] == PointStatus::Internal {
                points[w] = points[r];
                statuses[w] = statuses[r];
                w += 1;
            }
        }
        let removed = points.len() - w;
        points.truncate(w);
        statuses.truncate(w);

        debug_assert_eq!(w, survivors);
        log::debug!("裁剪移除 {removed} 个区域外点，存活 {survivors}");
        survivors
    }
}

/// 边界点并入点集
///
/// 所有环的加密点按环顺序追加到点集末尾，状态置为终态
/// `Boundary`，并以追加起点为基准建立环邻接表。
pub fn merge_boundary(
    points: &mut Vec<Point2>,
    statuses: &mut Vec<PointStatus>,
    container: &BoundaryContainer,
) -> BoundaryTable {
    let start = points.len() as u32;
    points.extend(container.iter_points());
    statuses.resize(points.len(), PointStatus::Boundary);
    log::debug!(
        "并入 {} 个边界点（{} 条环），起始下标 {start}",
        container.total_point_count(),
        container.loop_count()
    );
    container.build_table(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::EvenEdgeGenerator;

    fn fixture() -> BoundaryContainer {
        let outer = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let hole = [
            Point2::new(4.0, 4.0),
            Point2::new(6.0, 4.0),
            Point2::new(6.0, 6.0),
            Point2::new(4.0, 6.0),
        ];
        let gen = EvenEdgeGenerator::new(0);
        let mut c = BoundaryContainer::new(&outer, &gen).unwrap();
        c.add_hole(&hole, &gen).unwrap();
        c
    }

    #[test]
    fn test_reference_point_is_outside() {
        let c = fixture();
        let pts = [Point2::new(2.0, 3.0), Point2::new(7.0, 8.0)];
        let cls = AreaClassifier::new(&c, &pts);
        assert!(cls.reference().x > 10.0);
        assert!(!cls.is_in_area(cls.reference()));
    }

    #[test]
    fn test_is_in_area() {
        let c = fixture();
        let pts = [Point2::new(5.0, 5.0)];
        let cls = AreaClassifier::new(&c, &pts);

        // 外环内、孔洞外
        assert!(cls.is_in_area(&Point2::new(2.0, 2.0)));
        assert!(cls.is_in_area(&Point2::new(5.0, 8.0)));
        // 孔洞内
        assert!(!cls.is_in_area(&Point2::new(5.0, 5.0)));
        // 外环外
        assert!(!cls.is_in_area(&Point2::new(-1.0, 5.0)));
        assert!(!cls.is_in_area(&Point2::new(5.0, 11.0)));
    }

    #[test]
    fn test_clip_compacts_in_place() {
        let c = fixture();
        let mut pts = vec![
            Point2::new(2.0, 2.0),  // 内
            Point2::new(5.0, 5.0),  // 孔内
            Point2::new(12.0, 5.0), // 外
            Point2::new(8.0, 8.0),  // 内
        ];
        let mut statuses = vec![PointStatus::Internal; 4];
        let cls = AreaClassifier::new(&c, &pts);
        let n = cls.clip(&mut pts, &mut statuses, false);

        assert_eq!(n, 2);
        assert_eq!(pts, vec![Point2::new(2.0, 2.0), Point2::new(8.0, 8.0)]);
        assert_eq!(statuses, vec![PointStatus::Internal; 2]);

        // 幂等
        let n2 = cls.clip(&mut pts, &mut statuses, false);
        assert_eq!(n2, 2);
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_merge_boundary() {
        let c = fixture();
        let mut pts = vec![Point2::new(2.0, 2.0)];
        let mut statuses = vec![PointStatus::Internal];
        let table = merge_boundary(&mut pts, &mut statuses, &c);

        assert_eq!(pts.len(), 1 + 8);
        assert_eq!(table.start(), 1);
        assert_eq!(table.len(), 8);
        assert!(statuses[1..].iter().all(|&s| s == PointStatus::Boundary));
        assert!(table.is_protected(1, 2));
    }
}
