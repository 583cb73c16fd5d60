use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};

use super::errors::EmoteError;
use super::fetcher::EmoteFetcher;
use crate::types::Emote;

/// エモート名 → エモートの辞書
type EmoteMap = HashMap<String, Emote>;

/// グローバル＋チャンネル別の二層エモートキャッシュ
///
/// - グローバルスコープ: 構築時にバックグラウンドで1回だけ全プロバイダ
///   から取得する。取得完了までの参照は単にミスになる（ブロックしない）。
/// - チャンネルスコープ: そのチャンネルへの初回参照時に遅延取得する。
///   同一チャンネルへの同時参照は1回の取得に収束する（single-flight）。
///
/// どちらのマップも有効期限を持たない。プロセス再起動が唯一の更新手段。
pub struct EmoteCache {
    fetcher: Arc<dyn EmoteFetcher>,
    /// グローバルエモート（全チャンネル共通）
    global: OnceCell<EmoteMap>,
    /// チャンネルID → チャンネルエモート
    ///
    /// エントリの存在が「取得開始済み」、OnceCellの初期化完了が
    /// 「取得完了」を意味する。取得済みエントリは二度と再取得しない。
    channels: RwLock<HashMap<String, Arc<OnceCell<EmoteMap>>>>,
}

impl EmoteCache {
    /// キャッシュを作成し、グローバルエモートの取得をバックグラウンドで開始する
    ///
    /// 内部で`tokio::spawn`するため、tokioランタイム上で呼ぶこと。
    pub fn new(fetcher: Arc<dyn EmoteFetcher>) -> Arc<Self> {
        let cache = Arc::new(Self::with_fetcher(fetcher));

        let cache_clone = Arc::clone(&cache);
        tokio::spawn(async move {
            cache_clone.populate_global_emotes().await;
        });

        cache
    }

    /// バックグラウンド取得を開始せずに作成する
    ///
    /// グローバルエモートが必要になる前に`populate_global_emotes`を
    /// 明示的にawaitする。取得タイミングを自分で制御したい場合用。
    pub fn with_fetcher(fetcher: Arc<dyn EmoteFetcher>) -> Self {
        Self {
            fetcher,
            global: OnceCell::new(),
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// グローバルエモートを全プロバイダから取得する
    ///
    /// 2回目以降の呼び出しは初回の結果を待つだけで、再取得はしない。
    pub async fn populate_global_emotes(&self) {
        self.global.get_or_init(|| self.fetch_global_emotes()).await;
    }

    /// 単語に対応するエモートを探す
    ///
    /// グローバル → チャンネルの順で参照する。チャンネルのエモートが
    /// 未取得ならこの呼び出しの中で取得する（同時呼び出しは1回に収束）。
    /// グローバル取得が完了していない間はグローバル分はヒットしない。
    pub async fn get_emote(&self, channel_id: &str, word: &str) -> Option<Emote> {
        if let Some(emote) = self.global.get().and_then(|map| map.get(word)) {
            log::debug!("Global emote cache hit: {}", word);
            return Some(emote.clone());
        }

        let cell = self.channel_cell(channel_id).await;
        let map = cell
            .get_or_init(|| self.fetch_channel_emotes(channel_id))
            .await;

        map.get(word).cloned()
    }

    /// グローバルエモートが取得済みかどうか
    pub fn is_global_populated(&self) -> bool {
        self.global.initialized()
    }

    /// チャンネルのエモートが取得済みかどうか
    pub async fn is_channel_populated(&self, channel_id: &str) -> bool {
        let channels = self.channels.read().await;
        channels
            .get(channel_id)
            .is_some_and(|cell| cell.initialized())
    }

    /// チャンネルに対応するOnceCellを返す（なければ登録する）
    ///
    /// 返ったOnceCellの`get_or_init`に同時に入ったタスクのうち、
    /// 実際に取得を走らせるのは1つだけになる。
    async fn channel_cell(&self, channel_id: &str) -> Arc<OnceCell<EmoteMap>> {
        // 通常パス: 読み取りロックだけで既存エントリを返す
        {
            let channels = self.channels.read().await;
            if let Some(cell) = channels.get(channel_id) {
                return Arc::clone(cell);
            }
        }

        // 書き込みロック取得までの間に他タスクが登録している可能性がある
        let mut channels = self.channels.write().await;
        Arc::clone(
            channels
                .entry(channel_id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    /// グローバルエモートを全プロバイダから取得してマージする
    async fn fetch_global_emotes(&self) -> EmoteMap {
        let (bttv, ffz, seventv) = futures::join!(
            self.fetcher.fetch_bttv_global_emotes(),
            self.fetcher.fetch_ffz_global_emotes(),
            self.fetcher.fetch_seventv_global_emotes(),
        );

        let map =
            merge_provider_results("global", [("BTTV", bttv), ("FFZ", ffz), ("7TV", seventv)]);
        log::info!("Populated {} global emotes", map.len());
        map
    }

    /// チャンネルエモートを全プロバイダから取得してマージする
    async fn fetch_channel_emotes(&self, channel_id: &str) -> EmoteMap {
        let (bttv, ffz, seventv) = futures::join!(
            self.fetcher.fetch_bttv_channel_emotes(channel_id),
            self.fetcher.fetch_ffz_channel_emotes(channel_id),
            self.fetcher.fetch_seventv_channel_emotes(channel_id),
        );

        let scope = format!("channel {}", channel_id);
        let map = merge_provider_results(&scope, [("BTTV", bttv), ("FFZ", ffz), ("7TV", seventv)]);
        log::info!("Populated {} emotes for channel {}", map.len(), channel_id);
        map
    }
}

impl fmt::Debug for EmoteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmoteCache")
            .field("global_populated", &self.global.initialized())
            .finish_non_exhaustive()
    }
}

/// 各プロバイダの取得結果をひとつの辞書へマージする
///
/// 失敗したプロバイダはwarnログを残してスキップする。全プロバイダが
/// 失敗しても空の辞書になるだけでエラーにはしない。名前が衝突した
/// 場合は後からマージした方が勝つ。
fn merge_provider_results(
    scope: &str,
    results: [(&str, Result<Vec<Emote>, EmoteError>); 3],
) -> EmoteMap {
    let mut map = EmoteMap::new();

    for (provider, result) in results {
        match result {
            Ok(emotes) => {
                for emote in emotes {
                    map.insert(emote.name.clone(), emote);
                }
            }
            Err(e) => {
                log::warn!("Failed to fetch {} emotes from {}: {}", scope, provider, e);
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmoteProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn test_emote(provider: EmoteProvider, id: &str, name: &str) -> Emote {
        Emote {
            provider,
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://example.com/{}", id),
        }
    }

    /// 固定データを返し、呼び出し回数を記録するモック
    struct MockFetcher {
        global_fetches: AtomicUsize,
        channel_fetches: AtomicUsize,
        fail_bttv: bool,
        fail_all: bool,
        channel_fetch_delay: Duration,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                global_fetches: AtomicUsize::new(0),
                channel_fetches: AtomicUsize::new(0),
                fail_bttv: false,
                fail_all: false,
                channel_fetch_delay: Duration::ZERO,
            }
        }

        fn failing_bttv() -> Self {
            Self {
                fail_bttv: true,
                ..Self::new()
            }
        }

        fn failing_all() -> Self {
            Self {
                fail_all: true,
                ..Self::new()
            }
        }

        /// チャンネル取得の応答を遅らせる（取得保留中の挙動を見るため）
        fn slow(channel_fetch_delay: Duration) -> Self {
            Self {
                channel_fetch_delay,
                ..Self::new()
            }
        }

        fn failure(&self) -> EmoteError {
            EmoteError::ApiError {
                status: 503,
                message: "mock failure".to_string(),
            }
        }
    }

    #[async_trait]
    impl EmoteFetcher for MockFetcher {
        async fn fetch_bttv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
            self.global_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_all || self.fail_bttv {
                return Err(self.failure());
            }
            Ok(vec![
                test_emote(EmoteProvider::Bttv, "b1", "bttvGlobal"),
                test_emote(EmoteProvider::Bttv, "b2", "sharedGlobal"),
            ])
        }

        async fn fetch_bttv_channel_emotes(
            &self,
            _channel_id: &str,
        ) -> Result<Vec<Emote>, EmoteError> {
            self.channel_fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.channel_fetch_delay).await;
            if self.fail_all || self.fail_bttv {
                return Err(self.failure());
            }
            Ok(vec![test_emote(EmoteProvider::Bttv, "bc1", "bttvChan")])
        }

        async fn fetch_ffz_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
            self.global_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_all {
                return Err(self.failure());
            }
            Ok(vec![
                test_emote(EmoteProvider::Ffz, "f1", "ffzGlobal"),
                test_emote(EmoteProvider::Ffz, "f2", "sharedGlobal"),
            ])
        }

        async fn fetch_ffz_channel_emotes(
            &self,
            _channel_id: &str,
        ) -> Result<Vec<Emote>, EmoteError> {
            self.channel_fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.channel_fetch_delay).await;
            if self.fail_all {
                return Err(self.failure());
            }
            Ok(vec![test_emote(EmoteProvider::Ffz, "fc1", "ffzChan")])
        }

        async fn fetch_seventv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
            self.global_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_all {
                return Err(self.failure());
            }
            Ok(vec![
                test_emote(EmoteProvider::SevenTv, "s1", "sevenGlobal"),
                test_emote(EmoteProvider::SevenTv, "s2", "sharedGlobal"),
            ])
        }

        async fn fetch_seventv_channel_emotes(
            &self,
            _channel_id: &str,
        ) -> Result<Vec<Emote>, EmoteError> {
            self.channel_fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.channel_fetch_delay).await;
            if self.fail_all {
                return Err(self.failure());
            }
            Ok(vec![test_emote(EmoteProvider::SevenTv, "sc1", "sevenChan")])
        }
    }

    // ========================================
    // グローバルスコープ
    // ========================================

    #[tokio::test]
    async fn test_global_lookup_after_population() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        cache.populate_global_emotes().await;

        let emote = cache.get_emote("123", "bttvGlobal").await;
        assert_eq!(emote.unwrap().provider, EmoteProvider::Bttv);
        // グローバルでヒットした場合はチャンネル取得は走らない
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_does_not_wait_for_global_population() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        // グローバル未取得のままの参照はグローバル分をミスして
        // チャンネル取得だけが走る
        let emote = cache.get_emote("123", "bttvGlobal").await;

        assert_eq!(emote, None);
        assert_eq!(fetcher.global_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_populate_global_is_idempotent() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        cache.populate_global_emotes().await;
        cache.populate_global_emotes().await;

        // 3プロバイダ × 1回のみ
        assert_eq!(fetcher.global_fetches.load(Ordering::SeqCst), 3);
        assert!(cache.is_global_populated());
    }

    #[tokio::test]
    async fn test_new_populates_global_in_background() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::new(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        // バックグラウンドタスクと同じOnceCellに収束するので、
        // 明示的にawaitすれば完了が保証される
        cache.populate_global_emotes().await;

        assert!(cache.is_global_populated());
        assert_eq!(fetcher.global_fetches.load(Ordering::SeqCst), 3);
        assert!(cache.get_emote("123", "ffzGlobal").await.is_some());
    }

    #[tokio::test]
    async fn test_global_name_collision_last_merge_wins() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        cache.populate_global_emotes().await;

        // BTTV → FFZ → 7TV の順でマージされるため後勝ちで7TVになる
        let emote = cache.get_emote("123", "sharedGlobal").await.unwrap();
        assert_eq!(emote.provider, EmoteProvider::SevenTv);
    }

    // ========================================
    // チャンネルスコープ
    // ========================================

    #[tokio::test]
    async fn test_channel_population_happens_once() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        assert!(cache.get_emote("123", "bttvChan").await.is_some());
        assert!(cache.get_emote("123", "ffzChan").await.is_some());
        assert!(cache.get_emote("123", "unknownWord").await.is_none());

        // 3プロバイダ × 1回のみ（2回目以降の参照では再取得しない）
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 3);
        assert!(cache.is_channel_populated("123").await);
    }

    #[tokio::test]
    async fn test_concurrent_first_lookups_collapse_to_single_fetch() {
        // プロバイダ応答を遅らせて、取得が保留中の時間窓を作る
        let fetcher = Arc::new(MockFetcher::slow(Duration::from_millis(100)));
        let cache = Arc::new(EmoteCache::with_fetcher(
            Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>
        ));

        let cache_clone = Arc::clone(&cache);
        let first = tokio::spawn(async move { cache_clone.get_emote("123", "bttvChan").await });

        // 1人目の取得が始まり、まだ完了していないうちに2人目が参照する
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 3);
        assert!(!cache.is_channel_populated("123").await);
        let second = cache.get_emote("123", "sevenChan").await;

        assert!(first.await.unwrap().is_some());
        assert!(second.is_some());
        // 取得保留中に参照が重なっても取得は3プロバイダ × 1回に収束する
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_channels_populate_independently() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        assert!(cache.get_emote("111", "bttvChan").await.is_some());
        assert!(cache.get_emote("222", "bttvChan").await.is_some());

        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 6);
        assert!(cache.is_channel_populated("111").await);
        assert!(cache.is_channel_populated("222").await);
        assert!(!cache.is_channel_populated("333").await);
    }

    // ========================================
    // プロバイダ障害
    // ========================================

    #[tokio::test]
    async fn test_partial_provider_failure_keeps_other_providers() {
        let fetcher = Arc::new(MockFetcher::failing_bttv());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        // BTTVが落ちていてもFFZ / 7TVのエモートは使える
        assert!(cache.get_emote("123", "bttvChan").await.is_none());
        assert!(cache.get_emote("123", "ffzChan").await.is_some());
        assert!(cache.get_emote("123", "sevenChan").await.is_some());
    }

    #[tokio::test]
    async fn test_total_failure_populates_empty_map_without_retry() {
        let fetcher = Arc::new(MockFetcher::failing_all());
        let cache = EmoteCache::with_fetcher(Arc::clone(&fetcher) as Arc<dyn EmoteFetcher>);

        assert!(cache.get_emote("123", "bttvChan").await.is_none());
        // 全滅しても「取得済み（空）」として確定し、再取得はしない
        assert!(cache.is_channel_populated("123").await);

        assert!(cache.get_emote("123", "ffzChan").await.is_none());
        assert_eq!(fetcher.channel_fetches.load(Ordering::SeqCst), 3);
    }
}
