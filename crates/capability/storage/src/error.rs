//! 存储层错误类型
//!
//! 定义统一的存储错误类型，按来源分类：
//! - 校验错误：非法属性名、非法整数/布尔值
//! - 不存在：楼宇、房间、设备或定义表记录缺失
//! - 完整性错误：影响行数异常、未定义的角色/电源状态、房间内设备重名
//! - SQL 执行错误：查询、执行、扫描、连接失败

use domain::AttributeError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Integrity(String),
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl StorageError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// 内存实现中锁中毒时使用
    pub(crate) fn lock_failed() -> Self {
        Self::Internal("lock failed".to_string())
    }
}

impl From<AttributeError> for StorageError {
    fn from(err: AttributeError) -> Self {
        Self::Validation(err.to_string())
    }
}
