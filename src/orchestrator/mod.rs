//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量转换和结果输出，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量转换处理器
//! - 加载输入目录中的所有标记（Vec<SourceFile>）
//! - 控制并发数量（Semaphore）
//! - 写出警告和全局统计信息
//!
//! ### `test_assembler` - 考试文档组装器
//! - 按 (考试 ID, 文件名) 排序后拼接大题
//! - 检查输出冲突，写出 JSON
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SourceFile>)
//!     ↓
//! workflow::FileFlow (处理单个文件)
//!     ↓
//! services (能力层：分块 / 选项 / 排序题 / 材料 / 警告)
//!     ↓
//! markup (宽松标记树)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，test_assembler 管输出
//! 2. **向下依赖**：编排层 → workflow → services → markup
//! 3. **无业务逻辑**：只做调度和统计，不做具体题型判断

pub mod batch_processor;
pub mod test_assembler;

// 重新导出主要类型
pub use batch_processor::{App, RunStats};
pub use test_assembler::{assemble, output_path, write_test_document};
