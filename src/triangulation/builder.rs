//! 增量凸壳行走三角剖分
//!
//! 流程：选种子三角形 → 按到种子外接圆心的距离排序 →
//! 逐点找到可见壳边、贴三角形、沿壳正反向回填 → 翻边合法化。
//! 合法化使用显式栈，带边界约束时受保护边永不翻转。
//!
//! 半边数组的布局约定见 [`super::half_edge`]。

use crate::boundary::BoundaryTable;
use crate::error::MeshError;
use crate::geometry::{predicates, Point2};

use super::half_edge::{PointStatus, TriangleMesh, EMPTY};
use super::hull::Hull;

/// 近重复点判定阈值：x、y 差值都不超过该值的点不参与剖分
pub const EPSILON: f64 = f64::EPSILON * 2.0;

/// 剖分的裸输出：扁平数组 + 壳环
pub(crate) struct RawTriangulation {
    pub triangles: Vec<u32>,
    pub halfedges: Vec<u32>,
    pub hull: Vec<u32>,
}

/// 一次剖分的工作状态，`run` 之后即丢弃
pub(crate) struct Triangulator<'a> {
    points: &'a [Point2],
    /// 受保护边查询表（无边界约束时为 None）
    table: Option<&'a BoundaryTable>,
    triangles: Vec<u32>,
    halfedges: Vec<u32>,
    /// 合法化待检边栈，容量 ⌈√n⌉
    stack: Vec<u32>,
    stack_cap: usize,
}

impl<'a> Triangulator<'a> {
    pub fn new(points: &'a [Point2], table: Option<&'a BoundaryTable>) -> Self {
        let n = points.len();
        let max_triangles = if n > 2 { 2 * n - 5 } else { 0 };
        let stack_cap = (n as f64).sqrt().ceil() as usize;
        Self {
            points,
            table,
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            stack: Vec::with_capacity(stack_cap),
            stack_cap,
        }
    }

    /// 执行剖分
    ///
    /// 被跳过的近重复点在 `statuses` 中降级为 `External`
    /// （`Boundary` 是终态，不降级），调用方据此可以察觉输入里的重复。
    pub fn run(mut self, statuses: &mut [PointStatus]) -> Result<RawTriangulation, MeshError> {
        let n = self.points.len();
        if n < 3 {
            return Err(MeshError::InvalidPointSet { count: n });
        }

        let (i0, i1, i2) = self.find_seed_triangle()?;
        let center = predicates::circumcenter(
            &self.points[i0 as usize],
            &self.points[i1 as usize],
            &self.points[i2 as usize],
        );
        log::debug!("种子三角形 ({i0}, {i1}, {i2})，径向中心 ({:.3}, {:.3})", center.x, center.y);

        self.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);

        // 按到种子外接圆心的距离平方径向排序
        let dists: Vec<f64> = self.points.iter().map(|p| center.distance_sq(p)).collect();
        let mut ids: Vec<u32> = (0..n as u32).collect();
        quicksort(&mut ids, &dists, 0, n - 1);

        let mut hull = Hull::new(n, center, i0, i1, i2, self.points);
        let mut skipped = 0usize;

        for k in 0..n {
            let i = ids[k];
            let p = self.points[i as usize];

            if i == i0 || i == i1 || i == i2 {
                continue;
            }

            // 跳过与上一个排序点近重复的点
            if k > 0 {
                let prev = self.points[ids[k - 1] as usize];
                if (p.x - prev.x).abs() <= EPSILON && (p.y - prev.y).abs() <= EPSILON {
                    if statuses[i as usize] == PointStatus::Internal {
                        statuses[i as usize] = PointStatus::External;
                    }
                    skipped += 1;
                    continue;
                }
            }

            let (mut e, walk_back) = hull.find_visible_edge(&p, self.points);
            if e == EMPTY {
                // 绕壳一圈没有可见边，只可能是近重复点
                if statuses[i as usize] == PointStatus::Internal {
                    statuses[i as usize] = PointStatus::External;
                }
                skipped += 1;
                continue;
            }

            // 以可见边为底贴上第一个三角形
            let t = self.add_triangle(e, i, hull.next[e as usize], EMPTY, EMPTY, hull.tri[e as usize]);
            hull.tri[i as usize] = self.legalize(t + 2, &mut hull);
            hull.tri[e as usize] = t;

            // 沿壳正向前进，把所有仍可见的边都补成三角形
            let mut next = hull.next[e as usize];
            loop {
                let q = hull.next[next as usize];
                if !predicates::orient(&p, &self.points[next as usize], &self.points[q as usize]) {
                    break;
                }
                let t = self.add_triangle(next, i, q, hull.tri[i as usize], EMPTY, hull.tri[next as usize]);
                hull.tri[i as usize] = self.legalize(t + 2, &mut hull);
                hull.next[next as usize] = EMPTY; // 该点离开壳
                next = q;
            }

            // 行走从出发点绕回时还要沿壳反向回填
            if walk_back {
                loop {
                    let q = hull.prev[e as usize];
                    if !predicates::orient(&p, &self.points[q as usize], &self.points[e as usize]) {
                        break;
                    }
                    let t = self.add_triangle(q, i, e, EMPTY, hull.tri[e as usize], hull.tri[q as usize]);
                    self.legalize(t + 2, &mut hull);
                    hull.tri[q as usize] = t;
                    hull.next[e as usize] = EMPTY;
                    e = q;
                }
            }

            // 新点接入壳环，两条新壳边登记进哈希
            hull.prev[i as usize] = e;
            hull.next[i as usize] = next;
            hull.prev[next as usize] = i;
            hull.next[e as usize] = i;
            hull.start = e;

            hull.hash_edge(&p, i);
            hull.hash_edge(&self.points[e as usize], e);
        }

        if skipped > 0 {
            log::debug!("剖分跳过 {skipped} 个近重复点");
        }

        let hull_ring = hull.collect();
        self.triangles.shrink_to_fit();
        self.halfedges.shrink_to_fit();

        log::debug!(
            "剖分完成：{} 个三角形，壳长 {}",
            self.triangles.len() / 3,
            hull_ring.len()
        );

        Ok(RawTriangulation {
            triangles: self.triangles,
            halfedges: self.halfedges,
            hull: hull_ring,
        })
    }

    // ============================================================
    // 种子选择
    // ============================================================

    /// 距参考点最近的点（严格距离 > 0，重合点不算）
    fn find_closest_point(&self, origin: &Point2, points: &[Point2]) -> Option<u32> {
        let mut min_dist = f64::INFINITY;
        let mut k = 0u32;
        for (i, p) in points.iter().enumerate() {
            let d = origin.distance_sq(p);
            if d > 0.0 && d < min_dist {
                k = i as u32;
                min_dist = d;
            }
        }
        if min_dist.is_finite() {
            Some(k)
        } else {
            None
        }
    }

    /// 选取种子三角形：质心最近点、其最近邻、
    /// 与两者外接圆半径最小的第三点
    fn find_seed_triangle(&self) -> Result<(u32, u32, u32), MeshError> {
        let n = self.points.len() as f64;
        let centroid = {
            let (sx, sy) = self
                .points
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            Point2::new(sx / n, sy / n)
        };
        let i0 = self
            .find_closest_point(&centroid, self.points)
            .ok_or(MeshError::DegenerateInput)?;
        let p0 = self.points[i0 as usize];

        let i1 = self
            .find_closest_point(&p0, self.points)
            .ok_or(MeshError::DegenerateInput)?;
        let p1 = self.points[i1 as usize];

        let mut min_radius = f64::INFINITY;
        let mut i2 = 0u32;
        for (i, p) in self.points.iter().enumerate() {
            if i as u32 == i0 || i as u32 == i1 {
                continue;
            }
            let r = predicates::circumradius2(&p0, &p1, p);
            if r < min_radius {
                i2 = i as u32;
                min_radius = r;
            }
        }

        if !min_radius.is_finite() {
            // 全部共线（或除种子外全是重复点）
            return Err(MeshError::DegenerateInput);
        }

        // 调整顶点顺序使种子三角形与壳方向一致
        Ok(if predicates::orient(&p0, &p1, &self.points[i2 as usize]) {
            (i0, i2, i1)
        } else {
            (i0, i1, i2)
        })
    }

    // ============================================================
    // 三角形登记与合法化
    // ============================================================

    /// 登记一个三角形并双向链接已知的三条对偶半边
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32, a: u32, b: u32, c: u32) -> u32 {
        let t = self.triangles.len() as u32;

        self.triangles.push(i0);
        self.triangles.push(i1);
        self.triangles.push(i2);

        self.halfedges.push(a);
        self.halfedges.push(b);
        self.halfedges.push(c);

        if a != EMPTY {
            self.halfedges[a as usize] = t;
        }
        if b != EMPTY {
            self.halfedges[b as usize] = t + 1;
        }
        if c != EMPTY {
            self.halfedges[c as usize] = t + 2;
        }

        t
    }

    /// 对半边 `a` 及其翻边的连锁影响做合法化
    ///
    /// 两个相邻三角形不满足空外接圆条件时翻转公共边，
    /// 再检查翻转波及的边。受保护的边界边直接视为合法。
    /// 待检边保存在显式栈中，溢出时放弃该链并告警（软失败）。
    /// 返回值是最后检查的半边的前驱，调用方用它维护壳点的关联半边。
    fn legalize(&mut self, a: u32, hull: &mut Hull) -> u32 {
        let mut a = a;
        let mut ar;
        self.stack.clear();

        //           pl                    pl
        //          /||\                  /  \
        //       al/ || \bl            al/    \a
        //        /  ||  \              /      \
        //       /  a||b  \    翻转    /___ar___\
        //     p0\   ||   /p1   =>   p0\---bl---/p1
        //        \  ||  /              \      /
        //       ar\ || /br             b\    /br
        //          \||/                  \  /
        //           pr                    pr
        loop {
            let b = self.halfedges[a as usize];
            ar = TriangleMesh::prev_halfedge(a);

            if b == EMPTY {
                match self.stack.pop() {
                    Some(e) => {
                        a = e;
                        continue;
                    }
                    None => break,
                }
            }

            let al = TriangleMesh::next_halfedge(a);
            let bl = TriangleMesh::prev_halfedge(b);

            let p0 = self.triangles[ar as usize];
            let pr = self.triangles[a as usize];
            let pl = self.triangles[al as usize];
            let p1 = self.triangles[bl as usize];

            // 公共边 pr-pl 受保护时不翻
            let protected = self
                .table
                .map_or(false, |t| t.is_protected(pr, pl));
            let illegal = !protected
                && predicates::in_circle(
                    &self.points[p0 as usize],
                    &self.points[pr as usize],
                    &self.points[pl as usize],
                    &self.points[p1 as usize],
                );

            if illegal {
                self.triangles[a as usize] = p1;
                self.triangles[b as usize] = p0;

                let hbl = self.halfedges[bl as usize];
                let har = self.halfedges[ar as usize];

                // 翻转波及壳边（罕见）：修复壳点的关联半边
                if hbl == EMPTY {
                    let mut e = hull.start;
                    loop {
                        if hull.tri[e as usize] == bl {
                            hull.tri[e as usize] = a;
                            break;
                        }
                        e = hull.prev[e as usize];
                        if e == hull.start {
                            break;
                        }
                    }
                }

                self.halfedges[a as usize] = hbl;
                self.halfedges[b as usize] = har;
                self.halfedges[ar as usize] = bl;

                if hbl != EMPTY {
                    self.halfedges[hbl as usize] = a;
                }
                if har != EMPTY {
                    self.halfedges[har as usize] = b;
                }
                if bl != EMPTY {
                    self.halfedges[bl as usize] = ar;
                }

                let br = TriangleMesh::next_halfedge(b);
                if self.stack.len() < self.stack_cap {
                    self.stack.push(br);
                } else {
                    log::warn!("合法化栈溢出（容量 {}），放弃半边 {br} 的检查链", self.stack_cap);
                }
                // a 保持不变，翻转后的这条边要再查一次
            } else {
                match self.stack.pop() {
                    Some(e) => a = e,
                    None => break,
                }
            }
        }

        ar
    }
}

// ============================================================
// 径向排序
// ============================================================

/// 按 `dists[id]` 升序就地排列 `ids`
///
/// 三数取中快排，区间长度 ≤ 20 时退化为插入排序。
/// 点云已按径向大致有序时显著快于通用排序。
fn quicksort(ids: &mut [u32], dists: &[f64], left: usize, right: usize) {
    if right - left <= 20 {
        for i in (left + 1)..=right {
            let temp = ids[i];
            let temp_dist = dists[temp as usize];
            let mut j = i;
            while j > left && dists[ids[j - 1] as usize] > temp_dist {
                ids[j] = ids[j - 1];
                j -= 1;
            }
            ids[j] = temp;
        }
    } else {
        let median = (left + right) >> 1;
        let mut i = left + 1;
        let mut j = right;

        ids.swap(median, i);
        if dists[ids[left] as usize] > dists[ids[right] as usize] {
            ids.swap(left, right);
        }
        if dists[ids[i] as usize] > dists[ids[right] as usize] {
            ids.swap(i, right);
        }
        if dists[ids[left] as usize] > dists[ids[i] as usize] {
            ids.swap(left, i);
        }

        let temp = ids[i];
        let temp_dist = dists[temp as usize];
        loop {
            loop {
                i += 1;
                if dists[ids[i] as usize] >= temp_dist {
                    break;
                }
            }
            loop {
                j -= 1;
                if dists[ids[j] as usize] <= temp_dist {
                    break;
                }
            }
            if j < i {
                break;
            }
            ids.swap(i, j);
        }
        ids[left + 1] = ids[j];
        ids[j] = temp;

        // 先递归较大区间，较小区间留在浅层
        if right - i + 1 >= j - left {
            quicksort(ids, dists, i, right);
            quicksort(ids, dists, left, j - 1);
        } else {
            quicksort(ids, dists, left, j - 1);
            quicksort(ids, dists, i, right);
        }
    }
}
