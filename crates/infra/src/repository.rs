//! # リポジトリ実装
//!
//! ## 設計方針
//!
//! - **依存性の注入**: 接続プールはコンストラクタで受け取る
//! - **データベース抽象化**: sqlx を使用し、MySQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でインメモリ実装に差し替え可能

pub mod beatmap_repository;

pub use beatmap_repository::{BeatmapRepository, MySqlBeatmapRepository};
