// ==========================================
// 公共采购流程管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）、StaticImportConfig（内存默认值）
pub trait ImportConfigReader: Send + Sync {
    /// 获取导入工作表名称
    ///
    /// # 返回
    /// - Some(String): 指定工作表（不区分大小写）
    /// - None: 使用第一个工作表
    ///
    /// # 默认值
    /// - None
    fn get_sheet_name(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// 获取金额最少小数位
    ///
    /// # 默认值
    /// - 2（小于 2 的配置按 2 处理）
    fn get_monetary_scale(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取逐行记录 WARN 日志的失败行上限
    ///
    /// # 默认值
    /// - 50
    ///
    /// # 用途
    /// - 超过上限后只在汇总日志中体现，避免大文件刷屏
    fn get_max_logged_failures(&self) -> Result<usize, Box<dyn Error>>;
}

// ==========================================
// StaticImportConfig - 内存配置
// ==========================================
// 用途: 无数据库场景（单元测试、纯内存导入）
#[derive(Debug, Clone)]
pub struct StaticImportConfig {
    pub sheet_name: Option<String>,
    pub monetary_scale: u32,
    pub max_logged_failures: usize,
}

impl Default for StaticImportConfig {
    fn default() -> Self {
        Self {
            sheet_name: None,
            monetary_scale: 2,
            max_logged_failures: 50,
        }
    }
}

impl ImportConfigReader for StaticImportConfig {
    fn get_sheet_name(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.sheet_name.clone())
    }

    fn get_monetary_scale(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.monetary_scale)
    }

    fn get_max_logged_failures(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.max_logged_failures)
    }
}
