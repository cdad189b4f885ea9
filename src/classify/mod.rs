//! 区域分类：点的裁剪与三角形的洪泛标记

pub mod point;
pub mod region;

pub use point::{merge_boundary, AreaClassifier};
pub use region::RegionClassifier;
