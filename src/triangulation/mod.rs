//! 三角剖分引擎
//!
//! [`triangulate`] 是无约束剖分的便捷入口；带边界约束的完整
//! 流水线走 [`crate::pipeline::MeshBuilder`]。

pub(crate) mod builder;
pub mod half_edge;
mod hull;


pub use builder::EPSILON;
pub use half_edge::{PointStatus, TriangleFlag, TriangleMesh, EMPTY};

use crate::error::MeshError;
use crate::geometry::Point2;

use builder::Triangulator;

/// 对点集做无约束 Delaunay 剖分
///
/// # 错误
/// - 点数不足 3 个
/// - 输入共线（没有有限外接圆半径的种子三角形）
pub fn triangulate(points: Vec<Point2>) -> Result<TriangleMesh, MeshError> {
    let mut statuses = vec![PointStatus::Internal; points.len()];
    let raw = Triangulator::new(&points, None).run(&mut statuses)?;
    let flags = vec![TriangleFlag::Unclassified; raw.triangles.len() / 3];

    Ok(TriangleMesh {
        points,
        statuses,
        triangles: raw.triangles,
        halfedges: raw.halfedges,
        flags,
        hull: raw.hull,
        boundary: None,
        include_external: true,
    })
}
