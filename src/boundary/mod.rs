//! 边界定义：环、容器、加密点生成、环邻接表

pub mod container;
pub mod generator;
pub mod ring;

pub use container::{BoundaryContainer, BoundaryEdge, BoundaryTable};
pub use generator::{BoundaryPointGenerator, EvenEdgeGenerator};
pub use ring::BoundaryLoop;
