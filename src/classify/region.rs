//! 三角形区域洪泛分类与边界切断
//!
//! 剖分覆盖的是全部点的凸壳，其中可能包含外环之外、孔洞之内
//! 的三角形。洪泛从任意未分类三角形出发，用重心的点包含测试
//! 定标签，沿半边邻接扩散；越过受保护的边界边时标签翻转，
//! 同时把这条边两侧的对偶槽位切断，使内外区域在半边图上断开。
//!
//! 某条边界边没有出现在剖分里时（密集点云挤掉了长边界边），
//! 洪泛在那里拿不到可翻转的受保护边，标签会越过边界渗漏。
//! 洪泛之后按重心逐一复核 Internal 三角形，区域外的降级为
//! External 并告警（软失败）。最终 External 三角形的三条半边
//! 全部解链，Internal 三角形的重心必然落在有效区域内。

use crate::geometry::Point2;
use crate::triangulation::{TriangleFlag, TriangleMesh, EMPTY};

use super::point::AreaClassifier;

/// 区域洪泛分类器
pub struct RegionClassifier;

impl RegionClassifier {
    /// 对整个网格做区域分类
    ///
    /// 没有边界邻接表的网格不做任何事。
    pub fn classify(mesh: &mut TriangleMesh, area: &AreaClassifier<'_>) {
        let tri_count = mesh.triangles.len() / 3;
        let Some(table) = mesh.boundary.as_ref() else {
            return;
        };

        let mut stack: Vec<(usize, TriangleFlag)> = Vec::new();

        for seed in 0..tri_count {
            if mesh.flags[seed] != TriangleFlag::Unclassified {
                continue;
            }
            let label = if area.is_in_area(&centroid(&mesh.points, &mesh.triangles, seed)) {
                TriangleFlag::Internal
            } else {
                TriangleFlag::External
            };
            stack.push((seed, label));

            while let Some((t, label)) = stack.pop() {
                if mesh.flags[t] != TriangleFlag::Unclassified {
                    continue;
                }
                mesh.flags[t] = label;

                for i in 0..3 {
                    let e = (3 * t + i) as u32;
                    let twin = mesh.halfedges[e as usize];
                    if twin == EMPTY {
                        continue;
                    }
                    if mesh.halfedges[twin as usize] != e {
                        // 对偶不回指：邻接已被其它路径切断过
                        log::warn!("半边 {e} 的对偶 {twin} 不回指，跳过该邻接");
                        continue;
                    }

                    let u = mesh.triangles[e as usize];
                    let v = mesh.triangles[TriangleMesh::next_halfedge(e) as usize];
                    let neighbor = (twin / 3) as usize;

                    if table.is_protected(u, v) {
                        // 穿越边界：切断两侧槽位，标签翻转后继续扩散
                        mesh.halfedges[e as usize] = EMPTY;
                        mesh.halfedges[twin as usize] = EMPTY;
                        if mesh.flags[neighbor] == TriangleFlag::Unclassified {
                            stack.push((neighbor, toggle(label)));
                        }
                    } else if mesh.flags[neighbor] == TriangleFlag::Unclassified {
                        stack.push((neighbor, label));
                    }
                }
            }
        }

        // 重心复核：洪泛渗漏出的 Internal 标签降级
        let mut demoted = 0usize;
        for t in 0..tri_count {
            if mesh.flags[t] == TriangleFlag::Internal
                && !area.is_in_area(&centroid(&mesh.points, &mesh.triangles, t))
            {
                mesh.flags[t] = TriangleFlag::External;
                demoted += 1;
            }
        }
        if demoted > 0 {
            log::warn!("区域复核降级 {demoted} 个越过缺失边界边渗漏的 Internal 三角形");
        }

        // External 三角形与网格其余部分彻底断开
        let mut external = 0usize;
        for t in 0..tri_count {
            if mesh.flags[t] != TriangleFlag::External {
                continue;
            }
            external += 1;
            for i in 0..3 {
                let e = 3 * t + i;
                let twin = mesh.halfedges[e];
                if twin != EMPTY {
                    mesh.halfedges[twin as usize] = EMPTY;
                }
                mesh.halfedges[e] = EMPTY;
            }
        }

        log::debug!(
            "区域分类完成：{} 个三角形，其中 External {external}",
            tri_count
        );
    }
}

#[inline]
fn toggle(label: TriangleFlag) -> TriangleFlag {
    match label {
        TriangleFlag::Internal => TriangleFlag::External,
        TriangleFlag::External => TriangleFlag::Internal,
        other => other,
    }
}

#[inline]
fn centroid(points: &[Point2], triangles: &[u32], t: usize) -> Point2 {
    let a = points[triangles[3 * t] as usize];
    let b = points[triangles[3 * t + 1] as usize];
    let c = points[triangles[3 * t + 2] as usize];
    Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}
