//! 网格构建错误类型
//!
//! 所有输入校验错误都在算法阶段开始之前同步检测，对当前构建不可恢复：
//! 调用方需要修正输入后重试，不存在部分结果回退。
//! 合法化栈溢出、洪泛分类缺失邻接等内部问题按软失败处理，
//! 只通过 `log` 告警，不会中断构建。

use thiserror::Error;

/// 网格构建错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// 输入点数不足：三角剖分至少需要 3 个点
    #[error("invalid point set: need at least 3 points, got {count}")]
    InvalidPointSet { count: usize },

    /// 边界定义非法：基础顶点为空、少于 3 个，
    /// 或生成器输出没有按顺序包含全部基础顶点
    #[error("invalid boundary: {0}")]
    InvalidBoundary(&'static str),

    /// 退化输入：种子选择找不到有限的最小外接圆半径
    /// （输入共线或几乎全部重复）
    #[error("degenerate input: no finite minimal circumradius (collinear or duplicate-heavy input)")]
    DegenerateInput,

    /// 边界环查询索引越界
    #[error("loop index {index} out of range (loop count {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
