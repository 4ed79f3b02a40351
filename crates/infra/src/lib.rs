//! # osumaps インフラ層
//!
//! `beatmaps` テーブルへのアクセスを担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! リポジトリトレイトと、その MySQL 実装を提供する。接続プールは
//! 呼び出し元が作成してリポジトリに渡す（プロセス全体のグローバル状態には
//! 依存しない）。
//!
//! ## 責務
//!
//! - **データベース接続**: MySQL への接続プール作成と設定の読み込み
//! - **リポジトリ実装**: ビートマップの作成・取得・件数・一覧・更新・削除
//! - **エラー定義**: ストアのエラーを変換せずに保持するエラー型
//!
//! ## 依存関係
//!
//! ```text
//! infra → domain
//!    ↘
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - MySQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use osumaps_infra::{
//!     db::{self, DatabaseConfig},
//!     repository::{BeatmapRepository, MySqlBeatmapRepository},
//! };
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = db::create_pool(&config).await?;
//!
//!     let repo = MySqlBeatmapRepository::new(pool);
//!     let total = repo.fetch_count(&Default::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
