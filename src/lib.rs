//! ThriftHub - DutchThrift 客服后台服务
//!
//! 基于 Actix Web 构建，管理邮件收件箱、订单、退货、维修、待办、工单和采购单，
//! 并定时从 Shopify 同步订单。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `linking`: 邮件会话与订单、客户、退货、维修的自动关联
//! - `mail`: 邮件主题归一化、引用拆分与信息提取
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `shopify`: Shopify Admin API 客户端与订单映射
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod linking;
pub mod mail;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod shopify;
pub mod storage;
pub mod utils;
