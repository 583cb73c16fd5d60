use std::collections::HashMap;
use std::sync::Arc;

use super::cache::EmoteCache;
use crate::types::{Emote, EmoteProvider, TwitchEmoteTags};

/// Twitch公式エモートCDNのベースURL
const TWITCH_CDN_BASE_URL: &str = "https://static-cdn.jtvnw.net/emoticons/v2";

/// 1メッセージ分のエモート解決器
///
/// メッセージ付属のIRCタグ（Twitch公式エモート）を最優先で参照し、
/// 見つからなければ共有キャッシュ（グローバル → チャンネル）へ
/// フォールバックする。メッセージごとに作り直す軽量なオブジェクト。
pub struct EmoteResolver {
    channel_id: String,
    /// このメッセージのIRCタグから復元したTwitch公式エモート
    inline_emotes: HashMap<String, Emote>,
    cache: Arc<EmoteCache>,
}

impl EmoteResolver {
    /// メッセージ1件に紐づく解決器を作る
    pub fn new(
        channel_id: &str,
        message: &str,
        emote_tags: &TwitchEmoteTags,
        cache: Arc<EmoteCache>,
    ) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            inline_emotes: decode_emote_tags(message, emote_tags),
            cache,
        }
    }

    /// 単語がエモートかどうか判定する
    pub async fn check_emote(&self, word: &str) -> Option<Emote> {
        if let Some(emote) = self.inline_emotes.get(word) {
            return Some(emote.clone());
        }

        self.cache.get_emote(&self.channel_id, word).await
    }
}

/// IRCタグのエモート情報を名前引きできる形へ展開する
///
/// 各エモートIDについて最初の出現範囲だけを使う（同じエモートは本文中の
/// どこに出ても同じ名前のため）。範囲はUTF-16コードユニット単位・両端
/// 含みで、JSのsubstring同様に文字列長へクランプする。不正な範囲は
/// 読み飛ばす。
fn decode_emote_tags(message: &str, emote_tags: &TwitchEmoteTags) -> HashMap<String, Emote> {
    let units: Vec<u16> = message.encode_utf16().collect();
    let mut emotes = HashMap::new();

    for (emote_id, ranges) in emote_tags {
        let Some(range) = ranges.first() else {
            continue;
        };

        let Some((start, end)) = parse_emote_range(range) else {
            log::debug!(
                "Skipping malformed emote range {:?} for emote {}",
                range,
                emote_id
            );
            continue;
        };

        let start = start.min(units.len());
        let end = end.saturating_add(1).min(units.len());
        if start >= end {
            continue;
        }

        let name = String::from_utf16_lossy(&units[start..end]);
        emotes.insert(
            name.clone(),
            Emote {
                provider: EmoteProvider::Twitch,
                id: emote_id.clone(),
                name,
                url: twitch_emote_url(emote_id),
            },
        );
    }

    emotes
}

/// `"start-end"`形式の範囲文字列をパースする
fn parse_emote_range(range: &str) -> Option<(usize, usize)> {
    let (start, end) = range.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Twitch公式エモートのCDN画像URLを組み立てる
fn twitch_emote_url(emote_id: &str) -> String {
    format!("{}/{}/default/light/1.0", TWITCH_CDN_BASE_URL, emote_id)
}
