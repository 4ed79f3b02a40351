//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use osumaps_domain::beatmap::{Beatmap, BeatmapId, BeatmapKey, BeatmapMd5, BeatmapServer};
use osumaps_shared::observability::{DEFAULT_FILTER, init_tracing};

/// 番号から決まる 32 桁の md5
pub fn md5_of(n: u32) -> BeatmapMd5 {
   BeatmapMd5::new(format!("{n:032x}")).unwrap()
}

/// osu! サーバーの複合キー
pub fn osu_key(id: i32) -> BeatmapKey {
   BeatmapKey::new(BeatmapServer::Osu, BeatmapId::new(id).unwrap())
}

/// テスト用ビートマップを生成する
///
/// 浮動小数点の列は `FLOAT(4,2)` などで丸められないよう、
/// 2 進数で正確に表せる値にしている。日時も秒単位。
pub fn test_beatmap(id: i32, md5: BeatmapMd5) -> Beatmap {
   Beatmap {
      server: BeatmapServer::Osu,
      id: BeatmapId::new(id).unwrap(),
      set_id: 1000 + id,
      status: 2,
      md5,
      artist: "Camellia".to_string(),
      title: "Exit This Earth's Atomosphere".to_string(),
      version: format!("Diff {id}"),
      creator: "Mir".to_string(),
      filename: format!("Camellia - Exit This Earth's Atomosphere (Mir) [Diff {id}].osu"),
      last_update: Utc.with_ymd_and_hms(2020, 5, 17, 12, 30, 45).unwrap(),
      total_length: 312,
      max_combo: 1984,
      frozen: false,
      plays: 0,
      passes: 0,
      mode: 0,
      bpm: 172.5,
      cs: 4.5,
      ar: 9.25,
      od: 8.5,
      hp: 5.0,
      diff: 6.125,
   }
}

/// ErrorLayer 付きのトレーシングを初期化する
///
/// 複数のテストから呼ばれるため、2 回目以降の初期化エラーは無視する。
pub fn init_test_tracing() {
   let _ = init_tracing(DEFAULT_FILTER);
}
