//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_console_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum ConsoleError {
            $($variant(String),)*
        }

        impl ConsoleError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ConsoleError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ConsoleError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ConsoleError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ConsoleError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ConsoleError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_console_errors! {
    Configuration("E001", "Configuration Error"),
    Storage("E002", "Local Storage Error"),
    Serialization("E003", "Serialization Error"),
    Transport("E004", "Transport Error"),
    Server("E005", "Server Error"),
    Validation("E006", "Validation Error"),
    Permission("E007", "Permission Error"),
    Authentication("E008", "Authentication Error"),
    NotFound("E009", "Resource Not Found"),
    DateParse("E010", "Date Parse Error"),
    FileOperation("E011", "File Operation Error"),
}

impl ConsoleError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否在发出网络请求之前就被拒绝（校验 / 权限）
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            ConsoleError::Validation(_) | ConsoleError::Permission(_)
        )
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ConsoleError {}

/// 字段级校验错误
///
/// `field` 为空表示表单级错误（不归属于某个字段）。
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn form<M: Into<String>>(message: M) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::Validation(err.to_string())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ConsoleError {
    fn from(err: chrono::ParseError) -> Self {
        ConsoleError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Transport(err.to_string())
    }
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
