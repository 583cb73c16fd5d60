// =============================================================================
// FFZ (FrankerFaceZ) APIアダプタ
// =============================================================================
// 使用API: FrankerFaceZ API v1
// https://api.frankerfacez.com/docs/
// =============================================================================

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;

use super::get_json;
use crate::emotes::errors::EmoteError;
use crate::types::{Emote, EmoteProvider};

/// FFZ APIのベースURL
pub const FFZ_API_BASE_URL: &str = "https://api.frankerfacez.com";

/// FFZ CDNのベースURL
const FFZ_CDN_BASE_URL: &str = "https://cdn.frankerfacez.com/emote";

/// FFZのグローバルエモートが入っているセットID
const FFZ_GLOBAL_SET_ID: u64 = 3;

/// FFZ APIのエモート1件（IDが数値なのに注意）
#[derive(Debug, Deserialize)]
struct FfzApiEmote {
    id: u64,
    name: String,
}

/// エモートセット（グローバルもチャンネルもセット単位で返ってくる）
#[derive(Debug, Deserialize)]
struct FfzApiEmoteSet {
    /// セットID。APIレスポンスに含まれるがここでは未使用
    #[allow(dead_code)]
    id: u64,
    emoticons: Vec<FfzApiEmote>,
}

/// グローバルセット取得APIのレスポンス
#[derive(Debug, Deserialize)]
struct FfzApiEmoteSetResponse {
    set: FfzApiEmoteSet,
}

/// チャンネル（room）エモート取得APIのレスポンス
///
/// セットID → セットのマップ。通常は1セットだが複数返ることもある。
#[derive(Debug, Deserialize)]
struct FfzApiRoomEmotesResponse {
    sets: BTreeMap<String, FfzApiEmoteSet>,
}

/// FFZのグローバルエモート一覧を取得する
pub async fn fetch_global_emotes(
    client: &Client,
    base_url: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/v1/set/{}", base_url, FFZ_GLOBAL_SET_ID);
    let response: FfzApiEmoteSetResponse = get_json(client, &url).await?;

    Ok(response
        .set
        .emoticons
        .into_iter()
        .map(convert_emote)
        .collect())
}

/// FFZのチャンネルエモート一覧を取得する
///
/// 全セットのエモートをフラットに連結して返す。
pub async fn fetch_channel_emotes(
    client: &Client,
    base_url: &str,
    channel_id: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/v1/room/id/{}", base_url, channel_id);
    let response: FfzApiRoomEmotesResponse = get_json(client, &url).await?;

    let emotes = response
        .sets
        .into_values()
        .flat_map(|set| set.emoticons)
        .map(convert_emote)
        .collect();

    Ok(emotes)
}

/// APIレスポンスのエモートを共通のEmote型へ正規化する
fn convert_emote(emote: FfzApiEmote) -> Emote {
    Emote {
        provider: EmoteProvider::Ffz,
        id: emote.id.to_string(),
        name: emote.name,
        url: format!("{}/{}/1", FFZ_CDN_BASE_URL, emote.id),
    }
}
