//! 配置管理模块
//!
//! 遍历引擎的可调参数，支持 TOML 文件加载与保存

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 配置加载与校验错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("序列化配置失败: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("非法配置项: {0}")]
    Invalid(String),
}

/// 遍历引擎配置
///
/// 引擎内部不做防御性校验（非法深度等属于调用方编程错误），
/// 边界处通过 [`TraversalConfig::validate`] 一次性检查。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraversalConfig {
    /// 未显式指定时使用的最大搜索深度
    pub default_max_depth: usize,
    /// 超级节点阈值：单个节点产出的扩展数达到该值的整数倍时挂起让位
    pub supernode_threshold: usize,
    /// 多段拼接搜索的并行线程数上限
    pub stitcher_parallelism: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 15,
            supernode_threshold: 100,
            stitcher_parallelism: num_cpus::get(),
        }
    }
}

impl TraversalConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: TraversalConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 校验配置项取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_depth == 0 {
            return Err(ConfigError::Invalid(
                "default_max_depth 必须大于 0".to_string(),
            ));
        }
        if self.supernode_threshold == 0 {
            return Err(ConfigError::Invalid(
                "supernode_threshold 必须大于 0".to_string(),
            ));
        }
        if self.stitcher_parallelism == 0 {
            return Err(ConfigError::Invalid(
                "stitcher_parallelism 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}
