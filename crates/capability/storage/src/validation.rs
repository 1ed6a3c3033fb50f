//! 验证辅助函数
//!
//! 提供 Postgres 与内存实现共用的校验逻辑：
//! - parse_attribute：属性名白名单 + 值类型校验
//! - ensure_single_row：修改语句影响行数必须恰好为 1
//! - ensure_defined：引用的定义（类型、类别、角色、电源状态）必须已存在

use crate::error::StorageError;
use crate::models::DeviceAttributeInfo;
use domain::DeviceAttributeUpdate;

/// 校验属性修改输入
///
/// 失败时返回 `StorageError::Validation`，调用方在此之前不得访问存储。
pub fn parse_attribute(info: &DeviceAttributeInfo) -> Result<DeviceAttributeUpdate, StorageError> {
    let update =
        DeviceAttributeUpdate::parse(info.device_id, &info.attribute_name, &info.attribute_value)?;
    Ok(update)
}

/// 验证影响行数
///
/// 0 行表示目标不存在，多于 1 行表示条件有歧义，两者都视为失败。
pub fn ensure_single_row(affected: u64) -> Result<(), StorageError> {
    if affected != 1 {
        return Err(StorageError::integrity(format!(
            "there was a problem updating the device: incorrect number of rows affected: {affected}"
        )));
    }
    Ok(())
}

/// 验证定义表记录存在
pub fn ensure_defined<T>(value: Option<T>, what: &str, name: &str) -> Result<T, StorageError> {
    value.ok_or_else(|| StorageError::integrity(format!("{what}: {name} does not exist")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_only() {
        assert!(ensure_single_row(1).is_ok());
        assert!(matches!(
            ensure_single_row(0),
            Err(StorageError::Integrity(_))
        ));
        assert!(matches!(
            ensure_single_row(2),
            Err(StorageError::Integrity(_))
        ));
    }

    #[test]
    fn undefined_reference_is_integrity_error() {
        let err = ensure_defined::<i32>(None, "device role definition", "Cooler").expect_err("err");
        assert_eq!(
            err.to_string(),
            "device role definition: Cooler does not exist"
        );
    }
}
