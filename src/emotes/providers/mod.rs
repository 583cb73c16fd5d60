// =============================================================================
// エモートプロバイダAPIアダプタ
// =============================================================================
// BTTV / FFZ / 7TV の各APIからエモート一覧を取得し、共通のEmote型へ
// 正規化する。CDN画像URLはこの層で組み立て済みの完成形にする。
// =============================================================================

pub mod bttv;
pub mod ffz;
pub mod seventv;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::errors::EmoteError;
use crate::config::HTTP_TIMEOUT_SECS;

/// JSONを返すGETリクエストの共通処理
///
/// タイムアウト・非2xxステータスをEmoteErrorへ変換する。
async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, EmoteError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            log::warn!(
                "Emote API request timed out after {}s: {}",
                HTTP_TIMEOUT_SECS,
                url
            );
            EmoteError::Timeout
        } else {
            EmoteError::HttpError(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        log::error!("Emote API error: {} - {} ({})", status, message, url);
        return Err(EmoteError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<T>().await?)
}
