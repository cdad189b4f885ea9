//! 几何谓词
//!
//! 三角剖分中所有的方向判定都必须走同一个 [`cross`]，
//! 否则浮点舍入会让可见性判断与合法化判断互相矛盾。
//! `in_circle` 与外接圆公式沿用 delaunator 的相对坐标形式，
//! 把被测点移到原点附近以减少精度损失。

use super::Point2;

/// 2 倍有向面积
///
/// 返回值 > 0 表示 `p → q → r` 为逆时针（左转）。
#[inline]
pub fn cross(p: &Point2, q: &Point2, r: &Point2) -> f64 {
    (q.x - p.x) * (r.y - q.y) - (q.y - p.y) * (r.x - q.x)
}

/// 方向谓词：`p → q → r` 是否严格逆时针
///
/// 共线返回 false。凸壳行走用它判断新点对壳边的可见性。
#[inline]
pub fn orient(p: &Point2, q: &Point2, r: &Point2) -> bool {
    cross(p, q, r) > 0.0
}

/// 空外接圆判定：点 `p` 是否严格位于三角形 `a b c` 的外接圆内部
///
/// 行列式的符号随顶点绕向翻转：`a b c` 必须按剖分输出的绕向
/// （y 轴向上坐标系中的顺时针）排列，反向排列时判定取反。
/// 恰好落在圆上视为合法（返回 false），避免共圆点集上的无限翻边。
#[inline]
pub fn in_circle(a: &Point2, b: &Point2, c: &Point2, p: &Point2) -> bool {
    let dx = a.x - p.x;
    let dy = a.y - p.y;
    let ex = b.x - p.x;
    let ey = b.y - p.y;
    let fx = c.x - p.x;
    let fy = c.y - p.y;

    let ap = dx * dx + dy * dy;
    let bp = ex * ex + ey * ey;
    let cp = fx * fx + fy * fy;

    dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx) < 0.0
}

/// 外接圆圆心相对顶点 `a` 的偏移
#[inline]
pub fn circumdelta(a: &Point2, b: &Point2, c: &Point2) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let ex = c.x - a.x;
    let ey = c.y - a.y;

    let bl = dx * dx + dy * dy;
    let cl = ex * ex + ey * ey;
    // 共线时分母为 0，偏移量变为 ±∞，由调用方按退化处理
    let d = 0.5 / (dx * ey - dy * ex);

    ((ey * bl - dy * cl) * d, (dx * cl - ex * bl) * d)
}

/// 外接圆半径平方（共线输入返回无穷大）
#[inline]
pub fn circumradius2(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let (x, y) = circumdelta(a, b, c);
    x * x + y * y
}

/// 外接圆圆心
#[inline]
pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    let (x, y) = circumdelta(a, b, c);
    Point2::new(a.x + x, a.y + y)
}

/// 线段 `a-b` 与 `p-q` 是否严格相交（真穿越）
///
/// 两条线段的端点互相严格跨立时才算相交；
/// 端点落在对方线段上不算。射线计数法依赖这一严格语义。
#[inline]
pub fn segments_cross(a: &Point2, b: &Point2, p: &Point2, q: &Point2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(a, b, q);
    let d3 = cross(p, q, a);
    let d4 = cross(p, q, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
