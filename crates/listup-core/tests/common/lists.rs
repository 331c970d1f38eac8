//! Sample filter lists for integration tests.

use listup_core::checksum::{compute_checksum, Sha256Hasher};

/// Prefix `body` with a `! Checksum:` line that matches it.
pub fn signed(body: &str) -> String {
    format!("! Checksum: {}\n{body}", compute_checksum(body, &Sha256Hasher))
}

pub fn easylist_v1() -> String {
    signed(
        "[Adblock Plus 2.0]\n\
         ! Title: EasyList Sample\n\
         ! Homepage: https://easylist.example\n\
         ! Expires: 4 days (update frequency)\n\
         ||ads.example^\n\
         @@||ads.example/allowed.js\n\
         example.com##.banner\n",
    )
}

pub fn easylist_v2() -> String {
    signed(
        "[Adblock Plus 2.0]\n\
         ! Title: EasyList Sample\n\
         ! Expires: 4 days (update frequency)\n\
         ||ads.example^\n\
         ||tracker.example^\n\
         @@||ads.example/allowed.js\n\
         example.com##.banner\n",
    )
}
