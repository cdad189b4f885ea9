//! 边界容器与环邻接表
//!
//! 容器持有一个外环与任意数量的孔洞环，环编号由容器分配：
//! 外环恒为 0，孔洞按加入顺序取 1..。没有外环的容器无法构造，
//! 这一错误在类型层面就被排除了。
//!
//! 邻接表 [`BoundaryTable`] 在边界点并入点集之后建立，
//! 以全局点下标记录每个边界点的前驱/后继。受保护边判定
//! 与环细分改写都以它为准。

use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::geometry::{Point2, Rect};

use super::generator::BoundaryPointGenerator;
use super::ring::BoundaryLoop;

// ============================================================
// 容器
// ============================================================

/// 边界容器：外环 + 孔洞环
#[derive(Debug, Clone)]
pub struct BoundaryContainer {
    loops: Vec<BoundaryLoop>,
}

impl BoundaryContainer {
    /// 以外环基础顶点构造容器（外环编号 0）
    pub fn new(
        outer_base: &[Point2],
        generator: &dyn BoundaryPointGenerator,
    ) -> Result<Self, MeshError> {
        let outer = BoundaryLoop::new(outer_base, generator, 0)?;
        Ok(Self { loops: vec![outer] })
    }

    /// 加入一个孔洞环，返回分配到的环编号
    pub fn add_hole(
        &mut self,
        base: &[Point2],
        generator: &dyn BoundaryPointGenerator,
    ) -> Result<u32, MeshError> {
        let id = self.loops.len() as u32;
        self.loops.push(BoundaryLoop::new(base, generator, id)?);
        Ok(id)
    }

    #[inline]
    pub fn outer(&self) -> &BoundaryLoop {
        &self.loops[0]
    }

    /// 孔洞环迭代器（不含外环）
    #[inline]
    pub fn holes(&self) -> impl Iterator<Item = &BoundaryLoop> {
        self.loops[1..].iter()
    }

    #[inline]
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// 按编号取环
    pub fn loop_at(&self, id: u32) -> Result<&BoundaryLoop, MeshError> {
        self.loops
            .get(id as usize)
            .ok_or(MeshError::IndexOutOfRange {
                index: id as usize,
                len: self.loops.len(),
            })
    }

    /// 全部环的加密点总数
    pub fn total_point_count(&self) -> usize {
        self.loops.iter().map(|l| l.point_count()).sum()
    }

    /// 所有环的加密点按环顺序串接
    pub fn iter_points(&self) -> impl Iterator<Item = &Point2> {
        self.loops.iter().flat_map(|l| l.points().iter())
    }

    /// 所有环（含外环）的包围矩形
    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.loops.iter().map(|l| l.rect())
    }

    /// 建立环邻接表
    ///
    /// `start` 是第一个边界点在全局点数组中的下标；各环的点
    /// 依照 [`Self::iter_points`] 的顺序依次排列。
    pub fn build_table(&self, start: u32) -> BoundaryTable {
        let mut edges = Vec::with_capacity(self.total_point_count());
        let mut offset = start;
        for l in &self.loops {
            let n = l.point_count() as u32;
            for i in 0..n {
                edges.push(BoundaryEdge {
                    point: offset + i,
                    prev: offset + (i + n - 1) % n,
                    next: offset + (i + 1) % n,
                    loop_id: l.id(),
                });
            }
            offset += n;
        }
        BoundaryTable { start, edges }
    }
}

// ============================================================
// 邻接表
// ============================================================

/// 单个边界点的环邻接记录（全局点下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryEdge {
    pub point: u32,
    pub prev: u32,
    pub next: u32,
    pub loop_id: u32,
}

/// 全部边界点的环邻接表
///
/// 边界点在全局点数组中占据 `[start, start + len)` 的连续区间，
/// 区间内的点终态恒为 `Boundary`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryTable {
    start: u32,
    edges: Vec<BoundaryEdge>,
}

impl BoundaryTable {
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// 全局下标是否是边界点
    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index < self.start + self.edges.len() as u32
    }

    /// 取边界点的邻接记录；非边界点返回 None
    #[inline]
    pub fn edge(&self, index: u32) -> Option<&BoundaryEdge> {
        if self.contains(index) {
            Some(&self.edges[(index - self.start) as usize])
        } else {
            None
        }
    }

    pub fn edges(&self) -> &[BoundaryEdge] {
        &self.edges
    }

    /// 两个边界点在同一条环上是否互为邻居
    #[inline]
    pub fn are_ring_neighbors(&self, a: u32, b: u32) -> bool {
        match self.edge(a) {
            Some(e) => e.next == b || e.prev == b,
            None => false,
        }
    }

    /// 受保护边判定：两端都是边界点且互为环邻居
    ///
    /// 合法化与洪泛分类共用此判定。
    #[inline]
    pub fn is_protected(&self, a: u32, b: u32) -> bool {
        self.contains(a) && self.contains(b) && self.are_ring_neighbors(a, b)
    }

    /// 环细分改写：在邻居 `a`、`b` 之间插入新点
    ///
    /// 后续加密阶段把一条边界边拆成两条时调用。新点必须刚好接在
    /// 邻接表末尾（即全局下标为 `start + len`），否则区间连续性被破坏。
    pub fn rewire_split(&mut self, a: u32, b: u32, inserted: u32) -> Result<(), MeshError> {
        if inserted != self.start + self.edges.len() as u32 {
            return Err(MeshError::IndexOutOfRange {
                index: inserted as usize,
                len: self.edges.len(),
            });
        }
        if !self.are_ring_neighbors(a, b) {
            return Err(MeshError::InvalidBoundary(
                "split endpoints are not ring neighbors",
            ));
        }
        // 统一成 a → inserted → b 的方向
        let (from, to) = if self.edges[(a - self.start) as usize].next == b {
            (a, b)
        } else {
            (b, a)
        };
        let loop_id = self.edges[(from - self.start) as usize].loop_id;
        self.edges[(from - self.start) as usize].next = inserted;
        self.edges[(to - self.start) as usize].prev = inserted;
        self.edges.push(BoundaryEdge {
            point: inserted,
            prev: from,
            next: to,
            loop_id,
        });
        Ok(())
    }
}
