//! Twitchチャットのトークナイザ
//!
//! チャットメッセージを単語単位で分類（テキスト / エモート / リンク /
//! メンション）し、描画や翻訳にそのまま使えるトークン列へ変換する。
//! エモートはメッセージ付属のIRCタグ（Twitch公式）と、BTTV / FFZ / 7TV
//! の3プロバイダから解決する。
//!
//! ## 使い方
//!
//! ```no_run
//! use std::sync::Arc;
//! use twitch_chat_tokenizer::{ChatTokenizer, EmoteCache, HttpEmoteFetcher};
//!
//! # async fn example() -> Result<(), twitch_chat_tokenizer::EmoteError> {
//! // グローバルエモートの取得がバックグラウンドで始まる
//! let fetcher = Arc::new(HttpEmoteFetcher::new()?);
//! let cache = EmoteCache::new(fetcher);
//!
//! // トークナイザは1プロセスに1つ作って使い回す
//! let tokenizer = ChatTokenizer::new(cache);
//! let tokens = tokenizer
//!     .tokenize("123456", "Hello Kappa www.twitch.tv", &Default::default())
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod emotes;
pub mod tokenizer;
pub mod types;
pub mod util;

pub use emotes::{EmoteCache, EmoteError, EmoteFetcher, EmoteResolver, HttpEmoteFetcher};
pub use tokenizer::ChatTokenizer;
pub use types::{ChatToken, ChatTokenType, Emote, EmoteProvider, Pronunciation, TwitchEmoteTags};
