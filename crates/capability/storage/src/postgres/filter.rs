//! 过滤片段
//!
//! 聚合查询由固定的联表前缀 + 过滤片段组成。片段文本原样拼接在前缀之后，
//! 只有参数值走绑定，因此片段文本只能是 `&'static str`，不能来自请求输入。

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

/// 位置参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParam {
    Int(i32),
    Text(String),
}

/// 过滤片段：谓词文本 + 位置参数（`$1`, `$2` …）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFragment {
    clause: &'static str,
    params: Vec<FilterParam>,
}

impl FilterFragment {
    /// 不加过滤，返回全部记录
    pub fn all() -> Self {
        Self::new("")
    }

    pub fn new(clause: &'static str) -> Self {
        Self {
            clause,
            params: Vec::new(),
        }
    }

    pub fn int(mut self, value: i32) -> Self {
        self.params.push(FilterParam::Int(value));
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.params.push(FilterParam::Text(value.into()));
        self
    }

    pub fn clause(&self) -> &'static str {
        self.clause
    }

    pub fn params(&self) -> &[FilterParam] {
        &self.params
    }

    /// 拼接完整语句：前缀 + 片段 + 排序
    pub fn compose(&self, base: &str, order_by: &str) -> String {
        let mut sql = String::with_capacity(base.len() + self.clause.len() + order_by.len() + 2);
        sql.push_str(base);
        if !self.clause.is_empty() {
            sql.push(' ');
            sql.push_str(self.clause);
        }
        if !order_by.is_empty() {
            sql.push(' ');
            sql.push_str(order_by);
        }
        sql
    }

    /// 按顺序绑定参数
    pub fn bind<'q>(
        &'q self,
        mut query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        for param in &self.params {
            query = match param {
                FilterParam::Int(value) => query.bind(*value),
                FilterParam::Text(value) => query.bind(value.as_str()),
            };
        }
        query
    }
}
