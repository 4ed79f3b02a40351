//! # osumaps ドメイン層
//!
//! ビートマップのメタデータを表現するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: データベースや外部サービスには一切依存しない
//! - **値オブジェクト**: 識別子やチェックサムは Newtype で型安全に扱う
//! - **プレーンなレコード**: `Beatmap` はテーブルの 1 行をそのまま表す
//!
//! ## 依存関係の方向
//!
//! ```text
//! infra → domain
//!    ↘
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`beatmap`] - ビートマップのエンティティ・キー・フィルタ・変更セット
//! - [`error`] - ドメイン層で発生するエラーの定義
//!
//! ## 使用例
//!
//! ```rust
//! use osumaps_domain::beatmap::{BeatmapId, BeatmapKey, BeatmapServer};
//!
//! let key = BeatmapKey::new(BeatmapServer::Osu, BeatmapId::new(315).unwrap());
//! assert_eq!(key.to_string(), "osu!/315");
//! ```

pub mod beatmap;
pub mod error;

pub use error::DomainError;
