use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// エモートの提供元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmoteProvider {
    Twitch,
    Bttv,
    Ffz,
    #[serde(rename = "7tv")]
    SevenTv,
}

impl fmt::Display for EmoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmoteProvider::Twitch => "twitch",
            EmoteProvider::Bttv => "bttv",
            EmoteProvider::Ffz => "ffz",
            EmoteProvider::SevenTv => "7tv",
        };
        write!(f, "{}", name)
    }
}

/// チャットメッセージ中の1エモート
///
/// `name` はチャット上でエモートに変換される単語（大文字小文字を区別）、
/// `url` は取得済みのCDN画像URL。同一性は (provider, id) で決まる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub provider: EmoteProvider,
    pub id: String,
    pub name: String,
    pub url: String,
}

/// IRCタグ由来のTwitch公式エモート情報
///
/// エモートID → `"start-end"` 形式の出現範囲リスト。範囲はUTF-16
/// コードユニット単位・両端含む（Twitch IRCの仕様）。
pub type TwitchEmoteTags = HashMap<String, Vec<String>>;

/// トークンの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatTokenType {
    Text,
    Emote,
    Link,
    Mention,
}

/// トークナイズ結果の1トークン
///
/// `language` / `pronunciation` は翻訳側が後から埋めるフィールドで、
/// トークナイザ自身は常に `None` のまま返す。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatToken {
    #[serde(rename = "type")]
    pub token_type: ChatTokenType,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emote: Option<Emote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<Pronunciation>,
}

impl ChatToken {
    /// テキストトークン
    pub fn text(text: &str) -> Self {
        Self {
            token_type: ChatTokenType::Text,
            text: text.to_string(),
            emote: None,
            language: None,
            pronunciation: None,
        }
    }

    /// エモートトークン（textはエモート名そのまま）
    pub fn emote(emote: Emote) -> Self {
        Self {
            token_type: ChatTokenType::Emote,
            text: emote.name.clone(),
            emote: Some(emote),
            language: None,
            pronunciation: None,
        }
    }

    /// リンクトークン
    pub fn link(url: &str) -> Self {
        Self {
            token_type: ChatTokenType::Link,
            text: url.to_string(),
            emote: None,
            language: None,
            pronunciation: None,
        }
    }

    /// メンショントークン（`@` を含む単語全体）
    pub fn mention(text: &str) -> Self {
        Self {
            token_type: ChatTokenType::Mention,
            text: text.to_string(),
            emote: None,
            language: None,
            pronunciation: None,
        }
    }
}

/// 読み仮名情報（翻訳側で付与される）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romaji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hanja: Option<String>,
}
