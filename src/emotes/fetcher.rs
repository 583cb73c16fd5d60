use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

use super::errors::EmoteError;
use super::providers::{bttv, ffz, seventv};
use crate::config;
use crate::types::Emote;

/// エモートプロバイダAPIへのアクセスを抽象化するトレイト
///
/// EmoteCacheはこのトレイト経由でのみ外部APIに触れる。
/// テストではカウンタ付きのモック実装に差し替える。
#[async_trait]
pub trait EmoteFetcher: Send + Sync {
    /// BTTVのグローバルエモートを取得
    async fn fetch_bttv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError>;

    /// BTTVのチャンネルエモートを取得
    async fn fetch_bttv_channel_emotes(&self, channel_id: &str) -> Result<Vec<Emote>, EmoteError>;

    /// FFZのグローバルエモートを取得
    async fn fetch_ffz_global_emotes(&self) -> Result<Vec<Emote>, EmoteError>;

    /// FFZのチャンネルエモートを取得
    async fn fetch_ffz_channel_emotes(&self, channel_id: &str) -> Result<Vec<Emote>, EmoteError>;

    /// 7TVのグローバルエモートを取得
    async fn fetch_seventv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError>;

    /// 7TVのチャンネルエモートを取得
    async fn fetch_seventv_channel_emotes(
        &self,
        channel_id: &str,
    ) -> Result<Vec<Emote>, EmoteError>;
}

/// 本番用のEmoteFetcher実装
///
/// 全プロバイダで1つのreqwest::Clientを共有する。
#[derive(Debug)]
pub struct HttpEmoteFetcher {
    client: Client,
    bttv_base_url: String,
    ffz_base_url: String,
    seventv_base_url: String,
}

impl HttpEmoteFetcher {
    /// タイムアウト付きHTTPクライアントで作成する
    pub fn new() -> Result<Self, EmoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config::http_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            bttv_base_url: bttv::BTTV_API_BASE_URL.to_string(),
            ffz_base_url: ffz::FFZ_API_BASE_URL.to_string(),
            seventv_base_url: seventv::SEVENTV_API_BASE_URL.to_string(),
        })
    }

    /// ベースURLを差し替えて作成する（モックサーバ用）
    #[cfg(test)]
    fn with_base_urls(bttv: &str, ffz: &str, seventv: &str) -> Result<Self, EmoteError> {
        let mut fetcher = Self::new()?;
        fetcher.bttv_base_url = bttv.to_string();
        fetcher.ffz_base_url = ffz.to_string();
        fetcher.seventv_base_url = seventv.to_string();
        Ok(fetcher)
    }
}

#[async_trait]
impl EmoteFetcher for HttpEmoteFetcher {
    async fn fetch_bttv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
        bttv::fetch_global_emotes(&self.client, &self.bttv_base_url).await
    }

    async fn fetch_bttv_channel_emotes(&self, channel_id: &str) -> Result<Vec<Emote>, EmoteError> {
        bttv::fetch_channel_emotes(&self.client, &self.bttv_base_url, channel_id).await
    }

    async fn fetch_ffz_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
        ffz::fetch_global_emotes(&self.client, &self.ffz_base_url).await
    }

    async fn fetch_ffz_channel_emotes(&self, channel_id: &str) -> Result<Vec<Emote>, EmoteError> {
        ffz::fetch_channel_emotes(&self.client, &self.ffz_base_url, channel_id).await
    }

    async fn fetch_seventv_global_emotes(&self) -> Result<Vec<Emote>, EmoteError> {
        seventv::fetch_global_emotes(&self.client, &self.seventv_base_url).await
    }

    async fn fetch_seventv_channel_emotes(
        &self,
        channel_id: &str,
    ) -> Result<Vec<Emote>, EmoteError> {
        seventv::fetch_channel_emotes(&self.client, &self.seventv_base_url, channel_id).await
    }
}
