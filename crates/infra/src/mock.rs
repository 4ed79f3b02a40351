//! # テスト用モックリポジトリ
//!
//! インメモリで動作する [`BeatmapRepository`] の実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! osumaps-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! MySQL 実装と同じく、`(server, id)` と md5 の重複は一意制約違反として扱う。
//! エラーは [`InfraErrorKind::Conflict`](crate::error::InfraErrorKind::Conflict) になる。

use std::{
   collections::BTreeMap,
   sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use osumaps_domain::beatmap::{Beatmap, BeatmapChanges, BeatmapFilter, BeatmapKey, BeatmapMd5};
use osumaps_shared::PageRequest;

use crate::{error::InfraError, repository::BeatmapRepository};

// ===== MockBeatmapRepository =====

#[derive(Clone, Default)]
pub struct MockBeatmapRepository {
   beatmaps: Arc<Mutex<BTreeMap<BeatmapKey, Beatmap>>>,
}

impl MockBeatmapRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 制約チェックを通さずにビートマップを登録する
   ///
   /// 同じキーの行があれば置き換える。
   pub fn add_beatmap(&self, beatmap: Beatmap) -> Result<(), InfraError> {
      self.lock()?.insert(beatmap.key(), beatmap);
      Ok(())
   }

   /// 登録済みの件数
   pub fn len(&self) -> usize {
      self.beatmaps.lock().map(|b| b.len()).unwrap_or_default()
   }

   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }

   fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<BeatmapKey, Beatmap>>, InfraError> {
      self
         .beatmaps
         .lock()
         .map_err(|e| InfraError::unexpected(format!("ロックの取得に失敗しました: {e}")))
   }
}

fn md5_taken(
   beatmaps: &BTreeMap<BeatmapKey, Beatmap>,
   md5: &BeatmapMd5,
   except: Option<&BeatmapKey>,
) -> bool {
   beatmaps
      .iter()
      .any(|(key, b)| Some(key) != except && b.md5.as_str().eq_ignore_ascii_case(md5.as_str()))
}

#[async_trait]
impl BeatmapRepository for MockBeatmapRepository {
   async fn create(&self, beatmap: &Beatmap) -> Result<Beatmap, InfraError> {
      let mut beatmaps = self.lock()?;
      let key = beatmap.key();

      if beatmaps.contains_key(&key) {
         return Err(InfraError::conflict("Beatmap", key.to_string()));
      }
      if md5_taken(&beatmaps, &beatmap.md5, None) {
         return Err(InfraError::conflict("Beatmap", beatmap.md5.as_str()));
      }

      beatmaps.insert(key, beatmap.clone());
      Ok(beatmap.clone())
   }

   async fn fetch_one(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError> {
      Ok(self.lock()?.get(key).cloned())
   }

   async fn fetch_by_md5(&self, md5: &BeatmapMd5) -> Result<Option<Beatmap>, InfraError> {
      Ok(self
         .lock()?
         .values()
         .find(|b| b.md5.as_str().eq_ignore_ascii_case(md5.as_str()))
         .cloned())
   }

   async fn fetch_count(&self, filter: &BeatmapFilter) -> Result<i64, InfraError> {
      let count = self.lock()?.values().filter(|b| filter.matches(b)).count();
      i64::try_from(count).map_err(|e| InfraError::unexpected(e.to_string()))
   }

   async fn fetch_many(
      &self,
      filter: &BeatmapFilter,
      page: Option<PageRequest>,
   ) -> Result<Vec<Beatmap>, InfraError> {
      let beatmaps = self.lock()?;
      let matched = beatmaps.values().filter(|b| filter.matches(b));

      let result = match page {
         Some(page) => {
            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
            matched.skip(offset).take(limit).cloned().collect()
         }
         None => matched.cloned().collect(),
      };

      Ok(result)
   }

   async fn update(
      &self,
      key: &BeatmapKey,
      changes: &BeatmapChanges,
   ) -> Result<Option<Beatmap>, InfraError> {
      let mut beatmaps = self.lock()?;
      let Some(current) = beatmaps.get(key) else {
         return Ok(None);
      };

      if let Some(md5) = &changes.md5
         && md5_taken(&beatmaps, md5, Some(key))
      {
         return Err(InfraError::conflict("Beatmap", md5.as_str()));
      }

      let updated = changes.apply_to(current);
      beatmaps.insert(*key, updated.clone());
      Ok(Some(updated))
   }

   async fn delete(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError> {
      Ok(self.lock()?.remove(key))
   }
}
