//! 网格构建流水线
//!
//! 完整流程：输入校验 → 点裁剪 → 边界点并入 → 约束剖分 →
//! 区域洪泛分类 → 组装输出网格。各阶段开关见 [`TriangulateConfig`]。

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryContainer;
use crate::classify::{merge_boundary, AreaClassifier, RegionClassifier};
use crate::error::MeshError;
use crate::geometry::Point2;
use crate::triangulation::builder::Triangulator;
use crate::triangulation::{PointStatus, TriangleFlag, TriangleMesh};

/// 流水线配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangulateConfig {
    /// 遍历输出是否包含 External 三角形
    pub include_external_triangles: bool,
    /// 是否保持边界边不被翻转，并做区域洪泛分类
    pub restore_border: bool,
    /// 是否裁剪掉区域外的输入点
    pub use_clipping_points: bool,
    /// 裁剪分类是否并行
    pub parallel_clipping_points: bool,
}

impl Default for TriangulateConfig {
    fn default() -> Self {
        Self {
            include_external_triangles: false,
            restore_border: true,
            use_clipping_points: true,
            parallel_clipping_points: false,
        }
    }
}

/// 网格构建器
///
/// # 示例
///
/// ```ignore
/// let container = BoundaryContainer::new(&outer, &EvenEdgeGenerator::new(1))?;
/// let mesh = MeshBuilder::new(points)
///     .boundary(&container)
///     .config(TriangulateConfig::default())
///     .build()?;
/// ```
pub struct MeshBuilder<'a> {
    points: Vec<Point2>,
    boundary: Option<&'a BoundaryContainer>,
    config: TriangulateConfig,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points,
            boundary: None,
            config: TriangulateConfig::default(),
        }
    }

    pub fn boundary(mut self, container: &'a BoundaryContainer) -> Self {
        self.boundary = Some(container);
        self
    }

    pub fn config(mut self, config: TriangulateConfig) -> Self {
        self.config = config;
        self
    }

    /// 执行流水线
    pub fn build(self) -> Result<TriangleMesh, MeshError> {
        let cfg = self.config;
        let mut points = self.points;
        let mut statuses = vec![PointStatus::Internal; points.len()];

        if points.len() < 3 {
            return Err(MeshError::InvalidPointSet {
                count: points.len(),
            });
        }
        log::info!("网格构建开始：{} 个输入点", points.len());

        // 分类器在裁剪前构造，参考点对裁剪与区域分类保持一致
        let area = self.boundary.map(|c| AreaClassifier::new(c, &points));

        let mut table = None;
        if let (Some(container), Some(area)) = (self.boundary, area.as_ref()) {
            if cfg.use_clipping_points {
                let survivors = area.clip(&mut points, &mut statuses, cfg.parallel_clipping_points);
                log::info!("裁剪后存活 {survivors} 个点");
            }
            table = Some(merge_boundary(&mut points, &mut statuses, container));
        }

        let constraint = if cfg.restore_border {
            table.as_ref()
        } else {
            None
        };
        let raw = Triangulator::new(&points, constraint).run(&mut statuses)?;
        let flags = vec![TriangleFlag::Unclassified; raw.triangles.len() / 3];

        let mut mesh = TriangleMesh {
            points,
            statuses,
            triangles: raw.triangles,
            halfedges: raw.halfedges,
            flags,
            hull: raw.hull,
            boundary: table,
            include_external: cfg.include_external_triangles,
        };

        if cfg.restore_border {
            if let Some(area) = area.as_ref() {
                RegionClassifier::classify(&mut mesh, area);
            }
        }

        log::info!(
            "网格构建完成：{} 个三角形（可见 {}）",
            mesh.triangle_count(),
            mesh.element_ids().count()
        );
        Ok(mesh)
    }
}
