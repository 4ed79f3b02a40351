//! # osumaps 共有ユーティリティ
//!
//! プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra）から依存され得る
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える

pub mod observability;
pub mod pagination;

pub use pagination::PageRequest;
