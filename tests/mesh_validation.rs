//! 流水线整体校验

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wangge::{
    AreaClassifier, BoundaryContainer, EvenEdgeGenerator, MeshBuilder, Point2, PointStatus,
    TriangleFlag, TriangulateConfig,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square_with_hole() -> BoundaryContainer {
    let outer = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(0.0, 10.0),
    ];
    let hole = [
        Point2::new(4.0, 4.0),
        Point2::new(6.0, 4.0),
        Point2::new(6.0, 6.0),
        Point2::new(4.0, 6.0),
    ];
    let gen = EvenEdgeGenerator::new(0);
    let mut c = BoundaryContainer::new(&outer, &gen).unwrap();
    c.add_hole(&hole, &gen).unwrap();
    c
}

fn random_cloud(count: usize, seed: u64) -> Vec<Point2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point2::new(
                rng.random_range(0.0..10.0),
                rng.random_range(0.0..10.0),
            )
        })
        .collect()
}

// ============================================================
// 场景：无边界的小网格
// ============================================================

#[test]
fn test_unit_square_with_centroid() {
    init_logger();
    let mesh = MeshBuilder::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(0.5, 0.5),
    ])
    .config(TriangulateConfig {
        restore_border: false,
        ..TriangulateConfig::default()
    })
    .build()
    .unwrap();

    // 中心点把正方形分成四个三角形
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.hull.len(), 4);
    assert!(mesh.validate_twins());
    assert!(mesh.validate_delaunay());
    // 没做区域分类，全部三角形可见
    assert_eq!(mesh.elements().count(), 4);
}

// ============================================================
// 场景：确定性稀疏点云 + 方孔边界
// ============================================================

/// 四个角落的内部点 + 外环与孔洞环。点距稀疏，
/// 每条环边都存在严格空圆，必然出现在剖分里。
fn sparse_fixture_mesh(config: TriangulateConfig) -> wangge::TriangleMesh {
    let container = square_with_hole();
    let points = vec![
        Point2::new(2.0, 2.0),
        Point2::new(8.0, 2.0),
        Point2::new(8.0, 8.0),
        Point2::new(2.0, 8.0),
    ];
    MeshBuilder::new(points)
        .boundary(&container)
        .config(config)
        .build()
        .unwrap()
}

#[test]
fn test_boundary_edges_are_preserved() {
    init_logger();
    let mesh = sparse_fixture_mesh(TriangulateConfig::default());
    let table = mesh.boundary.as_ref().unwrap();

    // 每条环边都要作为某个 Internal 三角形的边出现
    for edge in table.edges() {
        let (a, b) = (edge.point, edge.next);
        let mut found = false;
        for t in 0..mesh.triangle_count() {
            if mesh.flags[t] != TriangleFlag::Internal {
                continue;
            }
            let v = mesh.triangle_vertices(t);
            for i in 0..3 {
                if (v[i] == a && v[(i + 1) % 3] == b) || (v[i] == b && v[(i + 1) % 3] == a) {
                    found = true;
                }
            }
        }
        assert!(found, "环边 {a}-{b} 不在任何 Internal 三角形中");
    }
}

#[test]
fn test_hole_region_is_external() {
    init_logger();
    let mesh = sparse_fixture_mesh(TriangulateConfig::default());

    let mut hole_triangles = 0;
    for t in 0..mesh.triangle_count() {
        let c = mesh.centroid(t);
        let in_hole = c.x > 4.0 && c.x < 6.0 && c.y > 4.0 && c.y < 6.0;
        if in_hole {
            hole_triangles += 1;
            assert_eq!(
                mesh.flags[t],
                TriangleFlag::External,
                "孔洞内三角形 {t} 未标为 External"
            );
        }
    }
    // 方孔一定被剖出至少两个三角形
    assert!(hole_triangles >= 2);
    // 分类覆盖了全部三角形
    assert!(mesh
        .flags
        .iter()
        .all(|&f| f != TriangleFlag::Unclassified));
    // 切断后对偶仍然对称
    assert!(mesh.validate_twins());
}

#[test]
fn test_include_external_toggle() {
    init_logger();
    let hidden = sparse_fixture_mesh(TriangulateConfig::default());
    let shown = sparse_fixture_mesh(TriangulateConfig {
        include_external_triangles: true,
        ..TriangulateConfig::default()
    });

    assert_eq!(hidden.triangle_count(), shown.triangle_count());
    assert!(hidden.elements().count() < shown.elements().count());
    assert_eq!(shown.elements().count(), shown.triangle_count());
}

#[test]
fn test_point_statuses_after_build() {
    init_logger();
    let mesh = sparse_fixture_mesh(TriangulateConfig::default());
    let table = mesh.boundary.as_ref().unwrap();

    for (i, &s) in mesh.statuses.iter().enumerate() {
        if table.contains(i as u32) {
            assert_eq!(s, PointStatus::Boundary);
        } else {
            assert_eq!(s, PointStatus::Internal);
        }
    }
}

// ============================================================
// 场景：随机点云 + 裁剪
// ============================================================

#[test]
fn test_random_cloud_clipping() {
    init_logger();
    let container = square_with_hole();
    let cloud = random_cloud(50, 77);

    let mesh = MeshBuilder::new(cloud.clone())
        .boundary(&container)
        .build()
        .unwrap();

    let table = mesh.boundary.as_ref().unwrap();
    let cloud_count = table.start() as usize;

    // 存活的点云点全部位于有效区域
    let area = AreaClassifier::new(&container, &cloud);
    for p in &mesh.points[..cloud_count] {
        assert!(area.is_in_area(p), "裁剪后残留区域外点 ({}, {})", p.x, p.y);
    }
    // 被孔洞或外环裁掉的点不再出现
    let removed = cloud.iter().filter(|p| !area.is_in_area(p)).count();
    assert_eq!(cloud_count + removed, cloud.len());

    assert!(mesh.validate_twins());
    assert!(mesh
        .flags
        .iter()
        .all(|&f| f != TriangleFlag::Unclassified));
}

#[test]
fn test_internal_triangles_stay_out_of_hole() {
    init_logger();
    // 密集点云会挤掉长边界边，洪泛标签可能越界；
    // 复核降级后 Internal 三角形的重心必须全部落在有效区域内
    for seed in 0..10u64 {
        let container = square_with_hole();
        let cloud = random_cloud(50, seed);
        let area = AreaClassifier::new(&container, &cloud);

        let mesh = MeshBuilder::new(cloud)
            .boundary(&container)
            .build()
            .unwrap();

        for t in 0..mesh.triangle_count() {
            if mesh.flags[t] != TriangleFlag::Internal {
                continue;
            }
            let c = mesh.centroid(t);
            assert!(
                area.is_in_area(&c),
                "seed {seed}：Internal 三角形 {t} 重心 ({:.4}, {:.4}) 在区域外",
                c.x,
                c.y
            );
            assert!(
                !(c.x > 4.0 && c.x < 6.0 && c.y > 4.0 && c.y < 6.0),
                "seed {seed}：Internal 三角形 {t} 跨进了孔洞"
            );
        }
        assert!(mesh.validate_twins(), "seed {seed} 对偶不对称");
    }
}

#[test]
fn test_parallel_clip_matches_serial() {
    init_logger();
    let container = square_with_hole();
    let cloud = random_cloud(500, 3);

    let serial = MeshBuilder::new(cloud.clone())
        .boundary(&container)
        .config(TriangulateConfig {
            parallel_clipping_points: false,
            ..TriangulateConfig::default()
        })
        .build()
        .unwrap();
    let parallel = MeshBuilder::new(cloud)
        .boundary(&container)
        .config(TriangulateConfig {
            parallel_clipping_points: true,
            ..TriangulateConfig::default()
        })
        .build()
        .unwrap();

    // 并行裁剪不改变存活集合与顺序，两次剖分完全一致
    assert_eq!(serial.points, parallel.points);
    assert_eq!(serial.triangles, parallel.triangles);
    assert_eq!(serial.halfedges, parallel.halfedges);
    assert_eq!(serial.flags, parallel.flags);
}

#[test]
fn test_clipping_disabled_keeps_all_points() {
    init_logger();
    let container = square_with_hole();
    // 一个孔洞内的点、一个区域外的点
    let cloud = vec![
        Point2::new(2.0, 2.0),
        Point2::new(5.0, 5.0),
        Point2::new(12.0, 5.0),
        Point2::new(8.0, 8.0),
    ];

    let mesh = MeshBuilder::new(cloud.clone())
        .boundary(&container)
        .config(TriangulateConfig {
            use_clipping_points: false,
            ..TriangulateConfig::default()
        })
        .build()
        .unwrap();

    let table = mesh.boundary.as_ref().unwrap();
    assert_eq!(table.start() as usize, cloud.len());
    assert_eq!(mesh.points[..cloud.len()], cloud[..]);
}
