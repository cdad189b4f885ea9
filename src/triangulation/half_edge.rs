//! 半边网格数据结构
//!
//! 三个平行的扁平数组承载整个网格：
//! - `triangles`: 每 3 个元素是一个三角形的顶点下标，半边 e 的起点
//!   是 `triangles[e]`，终点是 `triangles[next_halfedge(e)]`
//! - `halfedges`: 半边 e 的对偶半边下标，壳边为 [`EMPTY`]
//! - `flags`: 每个三角形一个区域标记
//!
//! 三角形 t 的三条半边固定占据 `3t, 3t+1, 3t+2`，
//! 因此所有邻接导航都是模 3 的下标运算，不需要指针。

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryTable;
use crate::geometry::{predicates, Point2};

/// 空半边 / 无效下标哨兵
pub const EMPTY: u32 = u32::MAX;

// ============================================================
// 标记类型
// ============================================================

/// 点的区域状态
///
/// `Boundary` 是终态：边界点一旦标记，后续阶段不再改写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointStatus {
    /// 位于有效区域内部
    Internal,
    /// 位于有效区域外（或被剖分阶段跳过的近重复点）
    External,
    /// 边界环上的点
    Boundary,
}

/// 三角形的区域标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangleFlag {
    /// 尚未被洪泛分类覆盖
    Unclassified,
    /// 有效区域内
    Internal,
    /// 有效区域外（外环之外或孔洞之内）
    External,
    /// 已删除（槽位保留，遍历时跳过）
    Deleted,
}

// ============================================================
// 网格
// ============================================================

/// 三角网格（半边表示）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub points: Vec<Point2>,
    pub statuses: Vec<PointStatus>,
    /// 扁平三角形数组，长度 = 3 × 三角形数
    pub triangles: Vec<u32>,
    /// 半边对偶数组，与 `triangles` 等长
    pub halfedges: Vec<u32>,
    pub flags: Vec<TriangleFlag>,
    /// 凸壳点下标，沿壳方向排列
    pub hull: Vec<u32>,
    /// 边界环邻接表（无边界约束时为 None）
    pub boundary: Option<BoundaryTable>,
    /// 遍历时是否包含 External 三角形
    pub include_external: bool,
}

impl TriangleMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// 同一三角形内的下一条半边
    #[inline]
    pub fn next_halfedge(e: u32) -> u32 {
        if e % 3 == 2 {
            e - 2
        } else {
            e + 1
        }
    }

    /// 同一三角形内的上一条半边
    #[inline]
    pub fn prev_halfedge(e: u32) -> u32 {
        if e % 3 == 0 {
            e + 2
        } else {
            e - 1
        }
    }

    /// 半边的对偶半边（壳边返回 [`EMPTY`]）
    #[inline]
    pub fn twin(&self, e: u32) -> u32 {
        self.halfedges[e as usize]
    }

    /// 半边所在的三角形
    #[inline]
    pub fn triangle_of_edge(e: u32) -> usize {
        (e / 3) as usize
    }

    /// 三角形的三个顶点下标
    #[inline]
    pub fn triangle_vertices(&self, t: usize) -> [u32; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    /// 三角形的三个顶点坐标
    #[inline]
    pub fn triangle_points(&self, t: usize) -> [Point2; 3] {
        let [a, b, c] = self.triangle_vertices(t);
        [
            self.points[a as usize],
            self.points[b as usize],
            self.points[c as usize],
        ]
    }

    /// 三角形外接圆圆心
    pub fn circumcenter(&self, t: usize) -> Point2 {
        let [a, b, c] = self.triangle_points(t);
        predicates::circumcenter(&a, &b, &c)
    }

    /// 三角形重心
    pub fn centroid(&self, t: usize) -> Point2 {
        let [a, b, c] = self.triangle_points(t);
        Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    /// 与三角形共边的邻居三角形
    pub fn adjacent_triangles(&self, t: usize) -> impl Iterator<Item = usize> + '_ {
        (0..3).filter_map(move |i| {
            let twin = self.halfedges[3 * t + i];
            if twin == EMPTY {
                None
            } else {
                Some(Self::triangle_of_edge(twin))
            }
        })
    }

    /// 三角形在当前遍历口径下是否可见
    #[inline]
    fn is_visible(&self, t: usize) -> bool {
        match self.flags[t] {
            TriangleFlag::Deleted => false,
            TriangleFlag::External => self.include_external,
            _ => true,
        }
    }

    /// 网格单元遍历
    ///
    /// 恒跳过 Deleted；External 是否产出由 `include_external` 控制。
    pub fn elements(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count())
            .filter(move |&t| self.is_visible(t))
            .map(move |t| self.triangle_vertices(t))
    }

    /// 可见三角形的下标遍历
    pub fn element_ids(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.triangle_count()).filter(move |&t| self.is_visible(t))
    }

    // ============================================================
    // 校验
    // ============================================================

    /// 半边对偶对称性校验
    ///
    /// 每条非空半边的对偶必须指回自身。洪泛分类切断的边
    /// 两侧槽位会同时置空，对称性在切断后依然成立。
    pub fn validate_twins(&self) -> bool {
        self.halfedges.iter().enumerate().all(|(e, &h)| {
            h == EMPTY || (self.halfedges.get(h as usize) == Some(&(e as u32)))
        })
    }

    /// 空外接圆性质校验
    ///
    /// 对每个未删除、非 External 的三角形检查：没有其它有效点
    /// 严格落入其外接圆。带受保护边的三角形不检查
    /// （约束边两侧不要求全局 Delaunay）。
    pub fn validate_delaunay(&self) -> bool {
        for t in 0..self.triangle_count() {
            match self.flags[t] {
                TriangleFlag::Deleted | TriangleFlag::External => continue,
                _ => {}
            }
            if self.has_protected_edge(t) {
                continue;
            }
            let verts = self.triangle_vertices(t);
            let [a, b, c] = self.triangle_points(t);
            for (i, p) in self.points.iter().enumerate() {
                if verts.contains(&(i as u32)) {
                    continue;
                }
                if self.statuses[i] == PointStatus::External {
                    continue;
                }
                if predicates::in_circle(&a, &b, &c, p) {
                    log::debug!("三角形 {t} 外接圆包含点 {i}");
                    return false;
                }
            }
        }
        true
    }

    fn has_protected_edge(&self, t: usize) -> bool {
        let Some(table) = &self.boundary else {
            return false;
        };
        let verts = self.triangle_vertices(t);
        (0..3).any(|i| table.is_protected(verts[i], verts[(i + 1) % 3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 手工搭建的两三角形正方形网格：
    /// 三角形 0 = (0,1,2)，三角形 1 = (0,2,3)，对角线 0-2 共享
    fn square_mesh() -> TriangleMesh {
        TriangleMesh {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            statuses: vec![PointStatus::Internal; 4],
            triangles: vec![0, 1, 2, 0, 2, 3],
            halfedges: vec![EMPTY, EMPTY, 3, 2, EMPTY, EMPTY],
            flags: vec![TriangleFlag::Internal, TriangleFlag::External],
            hull: vec![0, 1, 2, 3],
            boundary: None,
            include_external: false,
        }
    }

    #[test]
    fn test_halfedge_arithmetic() {
        assert_eq!(TriangleMesh::next_halfedge(0), 1);
        assert_eq!(TriangleMesh::next_halfedge(2), 0);
        assert_eq!(TriangleMesh::next_halfedge(5), 3);
        assert_eq!(TriangleMesh::prev_halfedge(0), 2);
        assert_eq!(TriangleMesh::prev_halfedge(4), 3);
        assert_eq!(TriangleMesh::prev_halfedge(3), 5);
    }

    #[test]
    fn test_navigation() {
        let mesh = square_mesh();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle_vertices(1), [0, 2, 3]);
        assert_eq!(mesh.twin(2), 3);
        assert_eq!(mesh.twin(0), EMPTY);
        assert_eq!(mesh.adjacent_triangles(0).collect::<Vec<_>>(), vec![1]);
        assert!(mesh.validate_twins());

        let cc = mesh.circumcenter(0);
        assert!((cc.x - 0.5).abs() < 1e-12 && (cc.y - 0.5).abs() < 1e-12);
        let g = mesh.centroid(1);
        assert!((g.x - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_elements_filtering() {
        let mut mesh = square_mesh();
        assert_eq!(mesh.elements().count(), 1);
        mesh.include_external = true;
        assert_eq!(mesh.elements().count(), 2);
        mesh.flags[1] = TriangleFlag::Deleted;
        assert_eq!(mesh.elements().count(), 1);
    }

    #[test]
    fn test_broken_twins_detected() {
        let mut mesh = square_mesh();
        mesh.halfedges[3] = EMPTY;
        assert!(!mesh.validate_twins());
    }
}
