//! 平面几何基础类型
//!
//! 全部计算使用 f64 坐标。谓词函数集中在 [`predicates`] 中，
//! 保证所有方向判定共用同一个叉积实现。

pub mod predicates;

use serde::{Deserialize, Serialize};

// ============================================================
// 二维点
// ============================================================

/// 二维平面点（f64 坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 到另一点的距离平方
    #[inline]
    pub fn distance_sq(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 向量长度平方（视为自原点出发的向量）
    #[inline]
    pub fn length_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

// ============================================================
// 轴对齐包围矩形
// ============================================================

/// 轴对齐包围矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    /// 由点集构造包围矩形
    ///
    /// 空集返回一个反向退化矩形（min = +∞, max = -∞），
    /// 对任意点的 `contains` 都为 false。
    pub fn from_points(points: &[Point2]) -> Self {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    /// 点是否落在矩形内（闭区间）
    #[inline]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance_sq(&b), 25.0);
    }

    #[test]
    fn test_rect_from_points() {
        let pts = [
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ];
        let r = Rect::from_points(&pts);
        assert_eq!(r.min, Point2::new(-2.0, -1.0));
        assert_eq!(r.max, Point2::new(4.0, 5.0));
        assert!(r.contains(&Point2::new(0.0, 0.0)));
        assert!(!r.contains(&Point2::new(5.0, 0.0)));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let r = Rect::from_points(&[]);
        assert!(!r.contains(&Point2::new(0.0, 0.0)));
    }
}
