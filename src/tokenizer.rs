// =============================================================================
// チャットトークナイザ
// =============================================================================
// チャットメッセージを単語単位で分類し、トークン列へ変換する
//
// 分類の優先順位:
// 1. メンション（@で始まる単語）
// 2. リンク（URLパターンに完全一致する単語）
// 3. エモート（IRCタグ → グローバル → チャンネルの順で解決）
// 4. テキスト（上記以外。連続する単語は1トークンへまとめる）
// =============================================================================

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::emotes::{EmoteCache, EmoteResolver};
use crate::types::{ChatToken, TwitchEmoteTags};

/// 単語全体がURLかどうか判定する正規表現
///
/// `http(s)://`付き、または`www.`で始まる形式だけをURLとみなす。
/// スキームなしの`example.com`は通常のテキスト扱い。ドメインラベルは
/// 英数字とハイフン（先頭・末尾は英数字）、ドットの後ろに2文字以上。
static URL_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://|www\.)[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?\.[^\s]{2,}$")
        .expect("Failed to compile URL regex")
});

/// チャットメッセージのトークナイザ
///
/// エモート辞書（グローバル＋チャンネル別）は全メッセージで共有される。
/// メッセージごとに状態を持たないので、1プロセスに1つ作って使い回す。
pub struct ChatTokenizer {
    cache: Arc<EmoteCache>,
}

impl ChatTokenizer {
    /// 共有エモートキャッシュを注入して作成する
    pub fn new(cache: Arc<EmoteCache>) -> Self {
        Self { cache }
    }

    /// メッセージを分類済みトークン列へ変換する
    ///
    /// 出力トークンの順序は本文の単語順と一致する。空文字・空白のみの
    /// メッセージは空のVecになる。
    pub async fn tokenize(
        &self,
        channel_id: &str,
        message: &str,
        emote_tags: &TwitchEmoteTags,
    ) -> Vec<ChatToken> {
        let words = split_into_words(message);
        if words.is_empty() {
            return Vec::new();
        }

        let resolver = EmoteResolver::new(channel_id, message, emote_tags, Arc::clone(&self.cache));

        let mut tokens = Vec::new();
        let mut buffer: Vec<&str> = Vec::new();

        for word in words {
            if is_mention(word) {
                flush_text_buffer(&mut tokens, &mut buffer);
                tokens.push(ChatToken::mention(word));
            } else if URL_EXPRESSION.is_match(word) {
                flush_text_buffer(&mut tokens, &mut buffer);
                tokens.push(ChatToken::link(word));
            } else if let Some(emote) = resolver.check_emote(word).await {
                flush_text_buffer(&mut tokens, &mut buffer);
                tokens.push(ChatToken::emote(emote));
            } else {
                buffer.push(word);
            }
        }

        flush_text_buffer(&mut tokens, &mut buffer);
        tokens
    }
}

/// メッセージを空白区切りの単語リストへ分割する
fn split_into_words(message: &str) -> Vec<&str> {
    message.split_whitespace().collect()
}

/// `@`で始まる単語はメンション
fn is_mention(word: &str) -> bool {
    word.starts_with('@')
}

/// 溜まっているテキスト単語を1つのトークンとして出力する
///
/// 単語は半角スペース1つで連結する。元の空白の種類や個数は保持しない
/// （レンダラ側で再レイアウトされる前提）。
fn flush_text_buffer(tokens: &mut Vec<ChatToken>, buffer: &mut Vec<&str>) {
    if buffer.is_empty() {
        return;
    }

    tokens.push(ChatToken::text(&buffer.join(" ")));
    buffer.clear();
}
