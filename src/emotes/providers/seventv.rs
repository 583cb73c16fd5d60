// =============================================================================
// 7TV APIアダプタ
// =============================================================================
// 使用API: 7TV REST API v2
// https://7tv.io/docs
// =============================================================================

use reqwest::Client;
use serde::Deserialize;

use super::get_json;
use crate::emotes::errors::EmoteError;
use crate::types::{Emote, EmoteProvider};

/// 7TV APIのベースURL
pub const SEVENTV_API_BASE_URL: &str = "https://api.7tv.app";

/// 7TV CDNのベースURL
const SEVENTV_CDN_BASE_URL: &str = "https://cdn.7tv.app/emote";

/// 7TV APIのエモート1件
#[derive(Debug, Deserialize)]
struct SevenTvApiEmote {
    id: String,
    name: String,
    /// MIMEタイプ。APIレスポンスに含まれるがここでは未使用
    #[allow(dead_code)]
    mime: String,
}

/// 7TVのグローバルエモート一覧を取得する
pub async fn fetch_global_emotes(
    client: &Client,
    base_url: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/v2/emotes/global", base_url);
    let emotes: Vec<SevenTvApiEmote> = get_json(client, &url).await?;

    Ok(emotes.into_iter().map(convert_emote).collect())
}

/// 7TVのチャンネルエモート一覧を取得する
pub async fn fetch_channel_emotes(
    client: &Client,
    base_url: &str,
    channel_id: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/v2/users/{}/emotes", base_url, channel_id);
    let emotes: Vec<SevenTvApiEmote> = get_json(client, &url).await?;

    Ok(emotes.into_iter().map(convert_emote).collect())
}

/// APIレスポンスのエモートを共通のEmote型へ正規化する
fn convert_emote(emote: SevenTvApiEmote) -> Emote {
    let url = format!("{}/{}/1x", SEVENTV_CDN_BASE_URL, emote.id);
    Emote {
        provider: EmoteProvider::SevenTv,
        id: emote.id,
        name: emote.name,
        url,
    }
}
