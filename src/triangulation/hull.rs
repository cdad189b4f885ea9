//! 剖分过程中的凸壳状态
//!
//! 壳是一个以种子三角形为起点的双向链环，`tri` 记住每个壳点
//! 关联的一条壳半边（对偶待填）。为了快速定位新点附近的壳边，
//! 壳点按伪角哈希到 ⌈√n⌉ 个桶里，冲突时线性探测。
//! 剖分结束后壳环被导出为下标序列，此结构即被丢弃。

use crate::geometry::{predicates, Point2};

use super::half_edge::EMPTY;

/// 凸壳链环 + 伪角哈希
pub(crate) struct Hull {
    /// 沿壳方向的下一个壳点
    pub next: Vec<u32>,
    /// 沿壳方向的上一个壳点
    pub prev: Vec<u32>,
    /// 壳点关联的壳半边
    pub tri: Vec<u32>,
    hash: Vec<u32>,
    pub start: u32,
    center: Point2,
}

impl Hull {
    /// 以种子三角形初始化壳环
    ///
    /// `i0 → i1 → i2` 必须已按壳方向排好（由种子选择保证）。
    pub fn new(n: usize, center: Point2, i0: u32, i1: u32, i2: u32, points: &[Point2]) -> Self {
        let hash_len = (n as f64).sqrt().ceil() as usize;

        let mut hull = Self {
            next: vec![0; n],
            prev: vec![0; n],
            tri: vec![0; n],
            hash: vec![EMPTY; hash_len],
            start: i0,
            center,
        };

        hull.next[i0 as usize] = i1;
        hull.prev[i2 as usize] = i1;
        hull.next[i1 as usize] = i2;
        hull.prev[i0 as usize] = i2;
        hull.next[i2 as usize] = i0;
        hull.prev[i1 as usize] = i0;

        hull.tri[i0 as usize] = 0;
        hull.tri[i1 as usize] = 1;
        hull.tri[i2 as usize] = 2;

        hull.hash_edge(&points[i0 as usize], i0);
        hull.hash_edge(&points[i1 as usize], i1);
        hull.hash_edge(&points[i2 as usize], i2);

        hull
    }

    /// 点相对壳中心的伪角桶号
    ///
    /// 伪角是单调于极角的廉价替代（不调三角函数），
    /// 值域 [0, 1) 均匀铺到哈希桶上。
    fn hash_key(&self, p: &Point2) -> usize {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;

        let s = dx / (dx.abs() + dy.abs());
        let a = (if dy > 0.0 { 3.0 - s } else { 1.0 + s }) / 4.0;

        let len = self.hash.len();
        (((len as f64) * a).floor() as usize) % len
    }

    /// 把壳点登记到它当前伪角对应的桶
    pub fn hash_edge(&mut self, p: &Point2, i: u32) {
        let key = self.hash_key(p);
        self.hash[key] = i;
    }

    /// 找到新点 `p` 可见的第一条壳边
    ///
    /// 从 `p` 的伪角桶出发线性探测一个仍在壳上的点，退一步取其
    /// 前驱，然后沿壳前进直到遇到可见边。绕壳一整圈仍不可见
    /// （近重复点）返回 `(EMPTY, false)`。第二个返回值指示行走
    /// 是否绕回了出发点，调用方据此决定是否需要反向回填。
    pub fn find_visible_edge(&self, p: &Point2, points: &[Point2]) -> (u32, bool) {
        let mut start: u32 = 0;
        let key = self.hash_key(p);
        let len = self.hash.len();
        for j in 0..len {
            start = self.hash[(key + j) % len];
            if start != EMPTY && self.next[start as usize] != EMPTY {
                break;
            }
        }
        start = self.prev[start as usize];
        let mut e = start;

        // 沿壳前进，跳过所有背向 p 的边
        while !predicates::orient(
            p,
            &points[e as usize],
            &points[self.next[e as usize] as usize],
        ) {
            e = self.next[e as usize];
            if e == start {
                return (EMPTY, false);
            }
        }
        (e, e == start)
    }

    /// 导出壳环为点下标序列（沿壳方向）
    pub fn collect(&self) -> Vec<u32> {
        let mut out = Vec::new();
        let mut e = self.start;
        loop {
            out.push(e);
            e = self.next[e as usize];
            if e == self.start {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ring_is_closed() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let center = Point2::new(0.5, 0.33);
        let hull = Hull::new(3, center, 0, 1, 2, &points);
        assert_eq!(hull.collect(), vec![0, 1, 2]);
        assert_eq!(hull.prev[0], 2);
        assert_eq!(hull.next[2], 0);
    }

    #[test]
    fn test_hash_key_in_range() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let hull = Hull::new(64, Point2::new(0.5, 0.33), 0, 1, 2, &points);
        for i in 0..32 {
            let a = i as f64 * 0.196;
            let p = Point2::new(0.5 + a.cos() * 3.0, 0.33 + a.sin() * 3.0);
            assert!(hull.hash_key(&p) < hull.hash.len());
        }
    }
}
