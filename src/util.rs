// =============================================================================
// 汎用ユーティリティ
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ChatToken, ChatTokenType};

/// ASCII表示名に含まれる文字（英字・アンダースコア）
static ASCII_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z_]").expect("Failed to compile ASCII name regex"));

/// 表示名がローカライズ名かどうか判定する
///
/// Twitchの表示名はASCIIのログイン名か各言語のローカライズ名の
/// どちらか。ASCII英字とアンダースコアを1文字も含まなければ
/// ローカライズ名とみなす。
///
/// # Examples
///
/// ```
/// use twitch_chat_tokenizer::util::is_localized_name;
///
/// assert!(is_localized_name("日本語太郎"));
/// assert!(!is_localized_name("english_name"));
/// ```
pub fn is_localized_name(name: &str) -> bool {
    !ASCII_NAME_PATTERN.is_match(name)
}

/// トークン列が翻訳対象になり得るかどうか
///
/// テキストトークンを1つも含まないメッセージ（エモートやリンクだけの
/// メッセージ）は翻訳に回す価値がない。
pub fn is_translatable(tokens: &[ChatToken]) -> bool {
    tokens
        .iter()
        .any(|token| token.token_type == ChatTokenType::Text)
}

/// トークン列に付与された言語を返す
///
/// 言語情報付きの最初のテキストトークンの言語を採用する。
/// TODO: 複数言語が混在するメッセージで「主要な」言語を選ぶ
pub fn detected_language(tokens: &[ChatToken]) -> Option<&str> {
    tokens
        .iter()
        .filter(|token| token.token_type == ChatTokenType::Text)
        .find_map(|token| token.language.as_deref())
}
