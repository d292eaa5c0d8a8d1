//! 编译期配置
//!
//! 通过环境变量在构建时注入（`option_env!`），缺省值面向本地开发。

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_PAGE_SIZE: u32 = 3;
const DEFAULT_TOAST_MILLIS: u64 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// REST API 根地址，不带结尾斜杠
    pub api_url: String,
    /// 首页每页商品数
    pub page_size: u32,
    pub log_level: log::Level,
    /// 提示消息自动消失的时间
    pub toast_millis: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

impl AppConfig {
    /// 读取构建时的 `BANANA_*` 环境变量
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("BANANA_API_URL"),
            option_env!("BANANA_PAGE_SIZE"),
            option_env!("BANANA_LOG_LEVEL"),
            option_env!("BANANA_TOAST_MS"),
        )
    }

    /// 无法解析的值回退到缺省值
    pub fn from_values(
        api_url: Option<&str>,
        page_size: Option<&str>,
        log_level: Option<&str>,
        toast_millis: Option<&str>,
    ) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_url,
            page_size: page_size
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            log_level: log_level
                .and_then(|v| v.parse().ok())
                .unwrap_or(log::Level::Info),
            toast_millis: toast_millis
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOAST_MILLIS),
        }
    }

    /// 商品/分类图片地址
    pub fn image_url(&self, image: &str) -> String {
        format!("{}/uploads/{}", self.api_url, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://localhost:3333");
        assert_eq!(config.page_size, 3);
        assert_eq!(config.log_level, log::Level::Info);
        assert_eq!(config.toast_millis, 3000);
    }

    #[test]
    fn overrides_are_parsed_and_trailing_slash_dropped() {
        let config = AppConfig::from_values(
            Some("https://api.example.com/"),
            Some("12"),
            Some("debug"),
            Some("500"),
        );
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.log_level, log::Level::Debug);
        assert_eq!(config.toast_millis, 500);
        assert_eq!(
            config.image_url("a.png"),
            "https://api.example.com/uploads/a.png"
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_values(Some("  "), Some("0"), Some("loud"), Some("soon"));
        assert_eq!(config, AppConfig::default());
    }
}
