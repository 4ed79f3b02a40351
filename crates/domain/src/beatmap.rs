//! # ビートマップ
//!
//! リズムゲームサーバーが管理するビートマップ（譜面）のメタデータ。
//!
//! ## 識別子
//!
//! ビートマップは `(server, id)` の組で一意に識別される。`server` は
//! 譜面の取得元（公式サーバー or プライベートサーバー）、`id` は取得元が
//! 割り当てた正の整数。`md5` はファイルのチェックサムで、全行を通して一意。
//!
//! ## 設計判断
//!
//! ### プレーンなレコード
//!
//! `Beatmap` はテーブルの 1 行をそのまま表す。フィールドは公開し、
//! 状態遷移などのビジネスルールは持たない。
//!
//! ### 部分更新とフィルタ
//!
//! - [`BeatmapChanges`]: `None` のフィールドは「変更しない」
//! - [`BeatmapFilter`]: `None` のフィールドは「絞り込まない」
//!
//! どちらも SQL の `COALESCE(?, column)` と同じ意味を持つ。
//! インメモリ実装のために [`BeatmapChanges::apply_to`] と
//! [`BeatmapFilter::matches`] で同じ意味を Rust 側でも提供する。

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

// =========================================================================
// BeatmapServer（取得元サーバー）
// =========================================================================

/// ビートマップの取得元サーバー
///
/// DB 上は `ENUM('osu!', 'private')` として保存される。
/// 順序は定義順で、MySQL の ENUM のソート順と一致する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
)]
pub enum BeatmapServer {
    /// 公式サーバー由来
    #[serde(rename = "osu!")]
    #[strum(serialize = "osu!")]
    Osu,
    /// プライベートサーバーで独自に登録された譜面
    #[serde(rename = "private")]
    #[strum(serialize = "private")]
    Private,
}

impl BeatmapServer {
    /// DB に保存する文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::str::FromStr for BeatmapServer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "osu!" => Ok(Self::Osu),
            "private" => Ok(Self::Private),
            _ => Err(DomainError::Validation(format!(
                "不正なサーバー識別子: {s}"
            ))),
        }
    }
}

// =========================================================================
// BeatmapId（取得元が割り当てた ID）
// =========================================================================

/// ビートマップ ID（値オブジェクト）
///
/// # 不変条件
///
/// - 1 以上の正整数（DB: `INT`）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(try_from = "i32")]
#[display("{_0}")]
pub struct BeatmapId(i32);

impl BeatmapId {
    /// ビートマップ ID を作成する
    ///
    /// # エラー
    ///
    /// 0 以下の場合は `DomainError::Validation` を返す。
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::Validation(format!(
                "ビートマップ ID は 1 以上である必要があります: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// 内部の i32 値を取得する
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for BeatmapId {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// =========================================================================
// BeatmapKey（複合主キー）
// =========================================================================

/// ビートマップの複合主キー `(server, id)`
///
/// ログ出力では `osu!/315` の形式で表示される。
/// 順序は `server`（定義順）、`id` の順で比較する。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{server}/{id}")]
pub struct BeatmapKey {
    pub server: BeatmapServer,
    pub id:     BeatmapId,
}

impl BeatmapKey {
    pub fn new(server: BeatmapServer, id: BeatmapId) -> Self {
        Self { server, id }
    }
}

// =========================================================================
// BeatmapMd5（譜面ファイルのチェックサム）
// =========================================================================

/// 譜面ファイルの MD5 チェックサム（値オブジェクト）
///
/// # 不変条件
///
/// - ちょうど 32 文字の 16 進数（DB: `CHAR(32)`）
/// - 大文字・小文字は与えられたまま保持する
///
/// デシリアライズ時も [`BeatmapMd5::new`] と同じ検証を行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String")]
#[display("{_0}")]
pub struct BeatmapMd5(String);

impl BeatmapMd5 {
    /// MD5 の文字数
    pub const LENGTH: usize = 32;

    /// チェックサムを作成する
    ///
    /// # エラー
    ///
    /// 32 文字の 16 進数でない場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.len() != Self::LENGTH || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::Validation(format!(
                "MD5 は {} 文字の 16 進数である必要があります: {value:?}",
                Self::LENGTH
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for BeatmapMd5 {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// =========================================================================
// RankedStatus（ランク状態）
// =========================================================================

/// ランク状態コード
///
/// `beatmaps.status` に整数で保存される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::Display)]
#[repr(i32)]
pub enum RankedStatus {
    NotSubmitted    = -1,
    Pending         = 0,
    UpdateAvailable = 1,
    Ranked          = 2,
    Approved        = 3,
    Qualified       = 4,
    Loved           = 5,
}

impl RankedStatus {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 整数コードから変換する。未知のコードは `None`
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::NotSubmitted),
            0 => Some(Self::Pending),
            1 => Some(Self::UpdateAvailable),
            2 => Some(Self::Ranked),
            3 => Some(Self::Approved),
            4 => Some(Self::Qualified),
            5 => Some(Self::Loved),
            _ => None,
        }
    }
}

// =========================================================================
// Beatmap（エンティティ）
// =========================================================================

/// ビートマップ（`beatmaps` テーブルの 1 行）
///
/// # 不変条件
///
/// - `(server, id)` はテーブル内で一意
/// - `md5` はテーブル内で一意
///
/// 一意性はストア側の制約で保証する。この型は検証しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    pub server:       BeatmapServer,
    pub id:           BeatmapId,
    pub set_id:       i32,
    pub status:       i32,
    pub md5:          BeatmapMd5,
    pub artist:       String,
    pub title:        String,
    pub version:      String,
    pub creator:      String,
    pub filename:     String,
    pub last_update:  DateTime<Utc>,
    pub total_length: i32,
    pub max_combo:    i32,
    pub frozen:       bool,
    pub plays:        i32,
    pub passes:       i32,
    pub mode:         i8,
    pub bpm:          f32,
    pub cs:           f32,
    pub ar:           f32,
    pub od:           f32,
    pub hp:           f32,
    pub diff:         f32,
}

impl Beatmap {
    /// 複合主キーを取得する
    pub fn key(&self) -> BeatmapKey {
        BeatmapKey::new(self.server, self.id)
    }

    /// `artist - title [version]`
    pub fn full_name(&self) -> String {
        format!("{} - {} [{}]", self.artist, self.title, self.version)
    }

    /// ランク状態を取得する。未知のコードは `None`
    pub fn ranked_status(&self) -> Option<RankedStatus> {
        RankedStatus::from_i32(self.status)
    }

    /// リーダーボードを持つ状態か
    pub fn has_leaderboard(&self) -> bool {
        matches!(
            self.ranked_status(),
            Some(
                RankedStatus::Qualified
                    | RankedStatus::Ranked
                    | RankedStatus::Approved
                    | RankedStatus::Loved
            )
        )
    }

    /// ランク pp が付与される状態か
    pub fn awards_ranked_pp(&self) -> bool {
        matches!(
            self.ranked_status(),
            Some(RankedStatus::Ranked | RankedStatus::Approved)
        )
    }
}

// =========================================================================
// BeatmapFilter（検索条件）
// =========================================================================

/// 一覧取得・件数取得の絞り込み条件
///
/// `None` のフィールドはその列で絞り込まない。
/// `Default` はすべての行に一致する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeatmapFilter {
    pub set_id:   Option<i32>,
    pub status:   Option<i32>,
    pub artist:   Option<String>,
    pub creator:  Option<String>,
    pub filename: Option<String>,
    pub mode:     Option<i8>,
    pub frozen:   Option<bool>,
}

impl BeatmapFilter {
    /// 指定したビートマップが条件に一致するか
    pub fn matches(&self, beatmap: &Beatmap) -> bool {
        fn eq<T: PartialEq + ?Sized>(filter: Option<&T>, value: &T) -> bool {
            filter.is_none_or(|f| f == value)
        }

        eq(self.set_id.as_ref(), &beatmap.set_id)
            && eq(self.status.as_ref(), &beatmap.status)
            && eq(self.artist.as_deref(), beatmap.artist.as_str())
            && eq(self.creator.as_deref(), beatmap.creator.as_str())
            && eq(self.filename.as_deref(), beatmap.filename.as_str())
            && eq(self.mode.as_ref(), &beatmap.mode)
            && eq(self.frozen.as_ref(), &beatmap.frozen)
    }
}

// =========================================================================
// BeatmapChanges（部分更新）
// =========================================================================

/// 部分更新の変更セット
///
/// `None` のフィールドは既存の値を保持する。
/// キー（`server`, `id`）は変更できない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatmapChanges {
    pub set_id:       Option<i32>,
    pub status:       Option<i32>,
    pub md5:          Option<BeatmapMd5>,
    pub artist:       Option<String>,
    pub title:        Option<String>,
    pub version:      Option<String>,
    pub creator:      Option<String>,
    pub filename:     Option<String>,
    pub last_update:  Option<DateTime<Utc>>,
    pub total_length: Option<i32>,
    pub max_combo:    Option<i32>,
    pub frozen:       Option<bool>,
    pub plays:        Option<i32>,
    pub passes:       Option<i32>,
    pub mode:         Option<i8>,
    pub bpm:          Option<f32>,
    pub cs:           Option<f32>,
    pub ar:           Option<f32>,
    pub od:           Option<f32>,
    pub hp:           Option<f32>,
    pub diff:         Option<f32>,
}

impl BeatmapChanges {
    /// 変更するフィールドが 1 つもないか
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 変更を適用した新しいビートマップを返す
    pub fn apply_to(&self, current: &Beatmap) -> Beatmap {
        let c = self.clone();
        Beatmap {
            server:       current.server,
            id:           current.id,
            set_id:       c.set_id.unwrap_or(current.set_id),
            status:       c.status.unwrap_or(current.status),
            md5:          c.md5.unwrap_or_else(|| current.md5.clone()),
            artist:       c.artist.unwrap_or_else(|| current.artist.clone()),
            title:        c.title.unwrap_or_else(|| current.title.clone()),
            version:      c.version.unwrap_or_else(|| current.version.clone()),
            creator:      c.creator.unwrap_or_else(|| current.creator.clone()),
            filename:     c.filename.unwrap_or_else(|| current.filename.clone()),
            last_update:  c.last_update.unwrap_or(current.last_update),
            total_length: c.total_length.unwrap_or(current.total_length),
            max_combo:    c.max_combo.unwrap_or(current.max_combo),
            frozen:       c.frozen.unwrap_or(current.frozen),
            plays:        c.plays.unwrap_or(current.plays),
            passes:       c.passes.unwrap_or(current.passes),
            mode:         c.mode.unwrap_or(current.mode),
            bpm:          c.bpm.unwrap_or(current.bpm),
            cs:           c.cs.unwrap_or(current.cs),
            ar:           c.ar.unwrap_or(current.ar),
            od:           c.od.unwrap_or(current.od),
            hp:           c.hp.unwrap_or(current.hp),
            diff:         c.diff.unwrap_or(current.diff),
        }
    }
}
