//! # トレーシング初期化
//!
//! リポジトリ層は `tracing::instrument` で debug レベルのスパンを張り、
//! `InfraError` の生成時に `SpanTrace` を捕捉する。捕捉されたトレースが
//! 空にならないよう、[`init_tracing`] は `tracing_error::ErrorLayer` を
//! 必ず登録する。
//!
//! subscriber の所有はアプリケーション側の責務。このクレートの関数は
//! 統合テストや小さなツールからの利用を想定している。

/// `RUST_LOG` 未設定時のフィルタ
///
/// リポジトリのスパンは debug レベルのため、osumaps のクレートだけ debug にする。
pub const DEFAULT_FILTER: &str = "info,osumaps=debug";

/// `RUST_LOG`、なければ `default_filter` からフィルタを作る
///
/// どちらも解釈できない場合は [`DEFAULT_FILTER`] を使う。
#[cfg(feature = "observability")]
pub fn env_filter(default_filter: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// グローバル subscriber を登録する
///
/// 構成は `EnvFilter` + fmt レイヤー + `ErrorLayer`。
/// 既に登録済みの場合はエラーを返し、既存の subscriber はそのまま残る。
#[cfg(feature = "observability")]
pub fn init_tracing(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(tracing_error::ErrorLayer::default())
        .try_init()
}

#[cfg(all(test, feature = "observability"))]
mod tests {
    use super::*;

    // グローバル subscriber はプロセスに 1 つのため、初期化の検証は 1 つのテストにまとめる
    #[test]
    fn test_初期化後のspan_traceはスパン名を含み再初期化はエラーになる() {
        let _ = init_tracing(DEFAULT_FILTER);

        let span = tracing::info_span!("fetch_one", key = "osu!/1");
        let _enter = span.enter();
        let trace = tracing_error::SpanTrace::capture().to_string();

        assert!(trace.contains("fetch_one"), "SpanTrace がスパン名を含むこと: {trace}");
        assert!(init_tracing(DEFAULT_FILTER).is_err());
    }
}
