//! Classroom Console - 班级管理系统的终端管理端
//!
//! 所有页面都是 REST 后端之上的一层薄视图：获取集合、显示表格、提交表单、重新获取。
//!
//! # 架构
//! - `client`: 唯一的 HTTP 出口（Bearer 令牌、错误消息提取）
//! - `config`: 配置管理
//! - `controllers`: 通用列表控制器与表单子控制器
//! - `errors`: 统一错误处理
//! - `models`: 与后端交换的数据结构
//! - `resources`: 各列表页面的资源配置
//! - `runtime`: 启动流程与后台清理任务
//! - `services`: 账号、统计导出、聊天助手
//! - `session`: 登录状态与本地持久化
//! - `shell`: 路由、导航与终端渲染
//! - `utils`: 工具函数

pub mod client;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod resources;
pub mod runtime;
pub mod services;
pub mod session;
pub mod shell;
pub mod utils;
