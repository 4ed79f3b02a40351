//! # BeatmapRepository
//!
//! `beatmaps` テーブルの CRUD を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 = 独立した文**: 複数の文をトランザクションで束ねない。
//!   作成・更新後の再取得、削除前の取得はそれぞれ独立した文として実行する
//! - **COALESCE による任意指定**: フィルタ・部分更新の `None` は `NULL` として
//!   バインドし、`col = COALESCE(?, col)` で「条件なし」「変更なし」を表す
//! - **エラーは変換しない**: 制約違反を含むストアのエラーはそのまま返す
//!
//! ## テーブル定義
//!
//! ```text
//! PRIMARY KEY (server, id)
//! UNIQUE KEY  (md5)
//! ```
//!
//! 詳細は `migrations/` の DDL を参照。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use osumaps_domain::beatmap::{
    Beatmap,
    BeatmapChanges,
    BeatmapFilter,
    BeatmapId,
    BeatmapKey,
    BeatmapMd5,
    BeatmapServer,
};
use osumaps_shared::PageRequest;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::error::InfraError;

/// 読み取り時に取得する列
const BEATMAP_COLUMNS: &str = "server, id, set_id, status, md5, artist, title, version, creator, \
     filename, last_update, total_length, max_combo, frozen, plays, passes, mode, bpm, cs, ar, \
     od, hp, diff";

/// ビートマップリポジトリトレイト
///
/// すべての操作は 1 回以上の独立した往復で完結し、呼び出しをまたいで
/// ロック・カーソル・トランザクションを保持しない。
#[async_trait]
pub trait BeatmapRepository: Send + Sync {
    /// ビートマップを挿入し、永続化された内容を返す
    ///
    /// 挿入後に複合キーで再取得する。ストア側のデフォルト値や型変換が
    /// 反映された値が返る。
    ///
    /// # エラー
    ///
    /// - md5 や `(server, id)` の重複: ストアの制約違反をそのまま返す
    /// - 挿入直後の再取得に失敗: `InfraErrorKind::Unexpected`
    async fn create(&self, beatmap: &Beatmap) -> Result<Beatmap, InfraError>;

    /// 複合キーでビートマップを取得する
    async fn fetch_one(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError>;

    /// md5 でビートマップを取得する
    async fn fetch_by_md5(&self, md5: &BeatmapMd5) -> Result<Option<Beatmap>, InfraError>;

    /// 条件に一致する件数を取得する
    async fn fetch_count(&self, filter: &BeatmapFilter) -> Result<i64, InfraError>;

    /// 条件に一致するビートマップ一覧を `(server, id)` 順で取得する
    ///
    /// `page` が `None` の場合は一致するすべての行を返す。
    /// 一致しない場合は空の Vec を返す。
    async fn fetch_many(
        &self,
        filter: &BeatmapFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Beatmap>, InfraError>;

    /// 部分更新し、更新後の内容を返す
    ///
    /// `changes` の `None` フィールドは既存の値を保持する。
    /// キーに一致する行がない場合は `None`（エラーではない）。
    /// バージョンチェックは行わず、同時更新は後勝ちになる。
    async fn update(
        &self,
        key: &BeatmapKey,
        changes: &BeatmapChanges,
    ) -> Result<Option<Beatmap>, InfraError>;

    /// 削除し、削除前の内容を返す
    ///
    /// 行がない場合は削除文を発行せずに `None` を返す。
    /// 取得と削除は別の文のため、間に他の削除が入ると削除件数 0 のまま
    /// 取得済みの内容が返る。
    async fn delete(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError>;
}

/// MySQL 実装の BeatmapRepository
#[derive(Debug, Clone)]
pub struct MySqlBeatmapRepository {
    pool: MySqlPool,
}

impl MySqlBeatmapRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// `beatmaps` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct BeatmapRow {
    server:       String,
    id:           i32,
    set_id:       i32,
    status:       i32,
    md5:          String,
    artist:       String,
    title:        String,
    version:      String,
    creator:      String,
    filename:     String,
    last_update:  DateTime<Utc>,
    total_length: i32,
    max_combo:    i32,
    frozen:       bool,
    plays:        i32,
    passes:       i32,
    mode:         i8,
    bpm:          f32,
    cs:           f32,
    ar:           f32,
    od:           f32,
    hp:           f32,
    diff:         f32,
}

impl TryFrom<BeatmapRow> for Beatmap {
    type Error = InfraError;

    fn try_from(row: BeatmapRow) -> Result<Self, Self::Error> {
        Ok(Self {
            server:       row
                .server
                .parse::<BeatmapServer>()
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            id:           BeatmapId::new(row.id)
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            set_id:       row.set_id,
            status:       row.status,
            md5:          BeatmapMd5::new(row.md5)
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            artist:       row.artist,
            title:        row.title,
            version:      row.version,
            creator:      row.creator,
            filename:     row.filename,
            last_update:  row.last_update,
            total_length: row.total_length,
            max_combo:    row.max_combo,
            frozen:       row.frozen,
            plays:        row.plays,
            passes:       row.passes,
            mode:         row.mode,
            bpm:          row.bpm,
            cs:           row.cs,
            ar:           row.ar,
            od:           row.od,
            hp:           row.hp,
            diff:         row.diff,
        })
    }
}

/// フィルタ条件の WHERE 句を追加する
///
/// 未指定の条件は `NULL` をバインドし、`col = COALESCE(NULL, col)` で常に真になる。
fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &BeatmapFilter) {
    builder
        .push(" WHERE set_id = COALESCE(")
        .push_bind(filter.set_id)
        .push(", set_id) AND status = COALESCE(")
        .push_bind(filter.status)
        .push(", status) AND artist = COALESCE(")
        .push_bind(filter.artist.clone())
        .push(", artist) AND creator = COALESCE(")
        .push_bind(filter.creator.clone())
        .push(", creator) AND filename = COALESCE(")
        .push_bind(filter.filename.clone())
        .push(", filename) AND mode = COALESCE(")
        .push_bind(filter.mode)
        .push(", mode) AND frozen = COALESCE(")
        .push_bind(filter.frozen)
        .push(", frozen)");
}

#[async_trait]
impl BeatmapRepository for MySqlBeatmapRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(key = %beatmap.key()))]
    async fn create(&self, beatmap: &Beatmap) -> Result<Beatmap, InfraError> {
        sqlx::query(
            r#"
            INSERT INTO beatmaps (
                server, id, set_id, status, md5, artist, title, version, creator, filename,
                last_update, total_length, max_combo, frozen, plays, passes, mode, bpm, cs,
                ar, od, hp, diff
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(beatmap.server.as_str())
        .bind(beatmap.id.as_i32())
        .bind(beatmap.set_id)
        .bind(beatmap.status)
        .bind(beatmap.md5.as_str())
        .bind(beatmap.artist.as_str())
        .bind(beatmap.title.as_str())
        .bind(beatmap.version.as_str())
        .bind(beatmap.creator.as_str())
        .bind(beatmap.filename.as_str())
        .bind(beatmap.last_update)
        .bind(beatmap.total_length)
        .bind(beatmap.max_combo)
        .bind(beatmap.frozen)
        .bind(beatmap.plays)
        .bind(beatmap.passes)
        .bind(beatmap.mode)
        .bind(beatmap.bpm)
        .bind(beatmap.cs)
        .bind(beatmap.ar)
        .bind(beatmap.od)
        .bind(beatmap.hp)
        .bind(beatmap.diff)
        .execute(&self.pool)
        .await?;

        let key = beatmap.key();
        self.fetch_one(&key).await?.ok_or_else(|| {
            InfraError::unexpected(format!("挿入直後のビートマップが見つかりません: {key}"))
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%key))]
    async fn fetch_one(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError> {
        let sql = format!("SELECT {BEATMAP_COLUMNS} FROM beatmaps WHERE server = ? AND id = ?");
        let row = sqlx::query_as::<_, BeatmapRow>(&sql)
            .bind(key.server.as_str())
            .bind(key.id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Beatmap::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%md5))]
    async fn fetch_by_md5(&self, md5: &BeatmapMd5) -> Result<Option<Beatmap>, InfraError> {
        let sql = format!("SELECT {BEATMAP_COLUMNS} FROM beatmaps WHERE md5 = ?");
        let row = sqlx::query_as::<_, BeatmapRow>(&sql)
            .bind(md5.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Beatmap::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(?filter))]
    async fn fetch_count(&self, filter: &BeatmapFilter) -> Result<i64, InfraError> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM beatmaps");
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(?filter, ?page))]
    async fn fetch_many(
        &self,
        filter: &BeatmapFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Beatmap>, InfraError> {
        let mut builder =
            QueryBuilder::<MySql>::new(format!("SELECT {BEATMAP_COLUMNS} FROM beatmaps"));
        push_filter(&mut builder, filter);
        // ページングの順序は主キー順で固定
        builder.push(" ORDER BY server ASC, id ASC");

        if let Some(page) = page {
            builder
                .push(" LIMIT ")
                .push_bind(page.limit())
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let rows = builder
            .build_query_as::<BeatmapRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Beatmap::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%key))]
    async fn update(
        &self,
        key: &BeatmapKey,
        changes: &BeatmapChanges,
    ) -> Result<Option<Beatmap>, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE beatmaps
               SET set_id = COALESCE(?, set_id),
                   status = COALESCE(?, status),
                   md5 = COALESCE(?, md5),
                   artist = COALESCE(?, artist),
                   title = COALESCE(?, title),
                   version = COALESCE(?, version),
                   creator = COALESCE(?, creator),
                   filename = COALESCE(?, filename),
                   last_update = COALESCE(?, last_update),
                   total_length = COALESCE(?, total_length),
                   max_combo = COALESCE(?, max_combo),
                   frozen = COALESCE(?, frozen),
                   plays = COALESCE(?, plays),
                   passes = COALESCE(?, passes),
                   mode = COALESCE(?, mode),
                   bpm = COALESCE(?, bpm),
                   cs = COALESCE(?, cs),
                   ar = COALESCE(?, ar),
                   od = COALESCE(?, od),
                   hp = COALESCE(?, hp),
                   diff = COALESCE(?, diff)
             WHERE server = ?
               AND id = ?
            "#,
        )
        .bind(changes.set_id)
        .bind(changes.status)
        .bind(changes.md5.as_ref().map(BeatmapMd5::as_str))
        .bind(changes.artist.as_deref())
        .bind(changes.title.as_deref())
        .bind(changes.version.as_deref())
        .bind(changes.creator.as_deref())
        .bind(changes.filename.as_deref())
        .bind(changes.last_update)
        .bind(changes.total_length)
        .bind(changes.max_combo)
        .bind(changes.frozen)
        .bind(changes.plays)
        .bind(changes.passes)
        .bind(changes.mode)
        .bind(changes.bpm)
        .bind(changes.cs)
        .bind(changes.ar)
        .bind(changes.od)
        .bind(changes.hp)
        .bind(changes.diff)
        .bind(key.server.as_str())
        .bind(key.id.as_i32())
        .execute(&self.pool)
        .await?;

        tracing::debug!(rows_affected = result.rows_affected(), "ビートマップを更新しました");

        self.fetch_one(key).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%key))]
    async fn delete(&self, key: &BeatmapKey) -> Result<Option<Beatmap>, InfraError> {
        let Some(beatmap) = self.fetch_one(key).await? else {
            return Ok(None);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM beatmaps
             WHERE server = ?
               AND id = ?
            "#,
        )
        .bind(key.server.as_str())
        .bind(key.id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("取得後に他の操作で削除済みでした");
        }

        Ok(Some(beatmap))
    }
}
