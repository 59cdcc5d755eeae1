// ==========================================
// 热轧精整排产系统 - 对比数据来源
// ==========================================
// 职责: 抽象后端查询 (排产明细 / 产能池 / 版本信息)
// 说明: 返回未规范化的原始 JSON 记录, 由引擎层 Normalizer 统一处理
// ==========================================

use crate::domain::version::VersionLabelSource;
use crate::engine::normalizer::normalize_date_key;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 日期范围 (YYYY-MM-DD, 闭区间; None 表示不限)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// 日期是否落在范围内 (空日期只在不限范围时命中)
    pub fn contains(&self, date: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        if date.is_empty() {
            return false;
        }
        let after_from = self.from.as_deref().map_or(true, |from| date >= from);
        let before_to = self.to.as_deref().map_or(true, |to| date <= to);
        after_from && before_to
    }
}

// ==========================================
// Trait: ComparisonDataSource
// ==========================================
#[async_trait]
pub trait ComparisonDataSource: Send + Sync {
    /// 查询版本的排产明细
    async fn fetch_plan_items(&self, version_id: &str, range: &DateRange)
        -> anyhow::Result<Vec<Value>>;

    /// 查询版本的产能池阈值 (machines 为空表示不限机组)
    async fn fetch_capacity_pools(
        &self,
        version_id: &str,
        range: &DateRange,
        machines: &[String],
    ) -> anyhow::Result<Vec<Value>>;

    /// 查询版本信息 (版本不存在返回 None)
    async fn fetch_version(&self, version_id: &str) -> anyhow::Result<Option<VersionLabelSource>>;
}

// ==========================================
// StaticDataSource - 内存数据来源
// ==========================================
// 用途: 离线对比工具 / 测试
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    versions: HashMap<String, StaticVersion>,
}

#[derive(Debug, Clone)]
struct StaticVersion {
    label: VersionLabelSource,
    items: Vec<Value>,
    pools: Vec<Value>,
}

impl StaticDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册版本及其明细 (版本信息仅含ID)
    pub fn with_version(mut self, version_id: &str, items: Vec<Value>) -> Self {
        self.versions.insert(
            version_id.to_string(),
            StaticVersion {
                label: VersionLabelSource::from_id(version_id),
                items,
                pools: Vec::new(),
            },
        );
        self
    }

    /// 覆盖版本信息 (需先注册版本)
    pub fn with_label(mut self, label: VersionLabelSource) -> Self {
        if let Some(version) = self.versions.get_mut(&label.version_id) {
            version.label = label;
        }
        self
    }

    /// 设置版本的产能池记录 (需先注册版本)
    pub fn with_pools(mut self, version_id: &str, pools: Vec<Value>) -> Self {
        if let Some(version) = self.versions.get_mut(version_id) {
            version.pools = pools;
        }
        self
    }

    fn get(&self, version_id: &str) -> anyhow::Result<&StaticVersion> {
        self.versions
            .get(version_id)
            .ok_or_else(|| anyhow::anyhow!("版本{}未加载", version_id))
    }
}

fn raw_date(raw: &Value) -> String {
    raw.get("plan_date")
        .and_then(Value::as_str)
        .map(normalize_date_key)
        .unwrap_or_default()
}

#[async_trait]
impl ComparisonDataSource for StaticDataSource {
    async fn fetch_plan_items(
        &self,
        version_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Value>> {
        let version = self.get(version_id)?;
        Ok(version
            .items
            .iter()
            .filter(|raw| range.contains(&raw_date(raw)))
            .cloned()
            .collect())
    }

    async fn fetch_capacity_pools(
        &self,
        version_id: &str,
        range: &DateRange,
        machines: &[String],
    ) -> anyhow::Result<Vec<Value>> {
        let version = self.get(version_id)?;
        Ok(version
            .pools
            .iter()
            .filter(|raw| range.contains(&raw_date(raw)))
            .filter(|raw| {
                machines.is_empty()
                    || raw
                        .get("machine_code")
                        .and_then(Value::as_str)
                        .map_or(false, |m| machines.iter().any(|x| x == m.trim()))
            })
            .cloned()
            .collect())
    }

    async fn fetch_version(&self, version_id: &str) -> anyhow::Result<Option<VersionLabelSource>> {
        Ok(self.versions.get(version_id).map(|v| v.label.clone()))
    }
}
