// =============================================================================
// 共通設定・定数モジュール
// =============================================================================
// クレート全体で使用する共通の設定値・定数を定義
// =============================================================================

use std::time::Duration;

/// HTTPリクエストのデフォルトタイムアウト（秒）
///
/// BTTV / FFZ / 7TV など外部エモートAPIへのリクエストで使用。
/// エモート取得はチャット表示のブロッカーになり得るため、
/// ネットワーク状況が悪い場合は諦めて先へ進む。
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// HTTPリクエストのデフォルトタイムアウト（Duration）
///
/// HTTPクライアント構築時に直接使用可能
pub fn http_timeout() -> Duration {
    Duration::from_secs(HTTP_TIMEOUT_SECS)
}
