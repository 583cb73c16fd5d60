// =============================================================================
// エモート解決モジュール
// =============================================================================
// Twitch公式エモート（IRCタグ由来）とBTTV / FFZ / 7TVの外部エモートを
// 統一的に解決する
//
// 機能:
// - グローバル／チャンネル別エモートの二層キャッシュ（無期限）
// - チャンネルエモートの遅延取得とsingle-flight化
// - メッセージ付属IRCタグからのTwitch公式エモート復元
// - プロバイダ障害時の部分継続（取れたプロバイダの分だけ使う）
// =============================================================================

mod cache;
mod errors;
mod fetcher;
mod providers;
mod resolver;

pub use cache::EmoteCache;
pub use errors::EmoteError;
pub use fetcher::{EmoteFetcher, HttpEmoteFetcher};
pub use resolver::EmoteResolver;
