//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use osumaps_domain::DomainError;
//!
//! fn validate_id(id: i32) -> Result<(), DomainError> {
//!     if id <= 0 {
//!         return Err(DomainError::Validation("ID は 1 以上です".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// 呼び出し境界での引数の形の不備を表す。
/// データベースに到達する前に検出される。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値が型の形に合わない場合に使用する。
    ///
    /// # 例
    ///
    /// - 0 以下のビートマップ ID
    /// - 32 文字の 16 進数ではない MD5
    /// - 未知のサーバー識別子
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
