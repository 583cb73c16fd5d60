// =============================================================================
// BTTV (BetterTTV) APIアダプタ
// =============================================================================
// 使用API: BetterTTV API v3 (cached endpoints)
// https://betterttv.com/developers/api
// =============================================================================

use reqwest::Client;
use serde::Deserialize;

use super::get_json;
use crate::emotes::errors::EmoteError;
use crate::types::{Emote, EmoteProvider};

/// BTTV APIのベースURL
pub const BTTV_API_BASE_URL: &str = "https://api.betterttv.net";

/// BTTV CDNのベースURL
const BTTV_CDN_BASE_URL: &str = "https://cdn.betterttv.net/emote";

/// BTTV APIのエモート1件
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvApiEmote {
    id: String,
    /// チャット上でエモートに変換される単語
    code: String,
    /// 画像形式（png / gif）。APIレスポンスに含まれるがここでは未使用
    #[allow(dead_code)]
    image_type: String,
}

/// チャンネルエモート取得APIのレスポンス
///
/// チャンネル固有エモートと、他チャンネルから共有されたエモートが
/// 別のリストで返ってくる。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvChannelEmotesResponse {
    channel_emotes: Vec<BttvApiEmote>,
    shared_emotes: Vec<BttvApiEmote>,
}

/// BTTVのグローバルエモート一覧を取得する
pub async fn fetch_global_emotes(
    client: &Client,
    base_url: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/3/cached/emotes/global", base_url);
    let emotes: Vec<BttvApiEmote> = get_json(client, &url).await?;

    Ok(emotes.into_iter().map(convert_emote).collect())
}

/// BTTVのチャンネルエモート一覧を取得する
///
/// チャンネルがBTTV未登録の場合、APIは404を返す（ApiErrorになる）。
pub async fn fetch_channel_emotes(
    client: &Client,
    base_url: &str,
    channel_id: &str,
) -> Result<Vec<Emote>, EmoteError> {
    let url = format!("{}/3/cached/users/twitch/{}", base_url, channel_id);
    let response: BttvChannelEmotesResponse = get_json(client, &url).await?;

    // チャンネル固有 → 共有の順で連結
    let emotes = response
        .channel_emotes
        .into_iter()
        .chain(response.shared_emotes)
        .map(convert_emote)
        .collect();

    Ok(emotes)
}

/// APIレスポンスのエモートを共通のEmote型へ正規化する
/// TODO: 2x/3xの画像サイズに対応する（現状は1x固定）
fn convert_emote(emote: BttvApiEmote) -> Emote {
    let url = format!("{}/{}/1x", BTTV_CDN_BASE_URL, emote.id);
    Emote {
        provider: EmoteProvider::Bttv,
        id: emote.id,
        name: emote.code,
        url,
    }
}
