//! 受约束平面 Delaunay 三角剖分
//!
//! 增量凸壳行走剖分（壳点伪角哈希定位、显式栈合法化），
//! 支持带孔洞的多边形边界约束：区域外的点被裁剪，边界边
//! 在合法化中受保护不被翻转，成品网格按内外区域分类并在
//! 边界处切断半边邻接。
//!
//! # 快速上手
//!
//! ```ignore
//! use wangge::{BoundaryContainer, EvenEdgeGenerator, MeshBuilder, Point2};
//!
//! let outer = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(10.0, 10.0),
//!     Point2::new(0.0, 10.0),
//! ];
//! let container = BoundaryContainer::new(&outer, &EvenEdgeGenerator::new(1))?;
//! let mesh = MeshBuilder::new(points).boundary(&container).build()?;
//! for [a, b, c] in mesh.elements() {
//!     // 有效区域内的三角形
//! }
//! ```
//!
//! 无约束剖分直接用 [`triangulate`]。

#![warn(clippy::all, rust_2018_idioms)]

pub mod boundary;
pub mod classify;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod triangulation;

pub use boundary::{
    BoundaryContainer, BoundaryEdge, BoundaryLoop, BoundaryPointGenerator, BoundaryTable,
    EvenEdgeGenerator,
};
pub use classify::{AreaClassifier, RegionClassifier};
pub use error::MeshError;
pub use geometry::{Point2, Rect};
pub use pipeline::{MeshBuilder, TriangulateConfig};
pub use triangulation::{triangulate, PointStatus, TriangleFlag, TriangleMesh, EMPTY};
