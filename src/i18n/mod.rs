//! Internationalization (i18n) support for trendlens
//!
//! Console messages are translated with `rust-i18n`. Supported languages:
//! English (en) and Turkish (tr).
//!
//! # Environment Variables
//!
//! - `TRENDLENS_LANG`: Set the preferred language (en, tr). Defaults to English.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trendlens::i18n::{t, set_locale};
//!
//! set_locale("tr");
//! let msg = t!("session.done");
//! ```

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

/// Set the current locale for translations
///
/// # Arguments
///
/// * `locale` - Language code (en, tr, or a variant such as `tr-TR`)
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(normalized);
}

/// Initialize i18n from environment variables
///
/// Reads `TRENDLENS_LANG` to set the locale, falling back to English.
pub fn init_from_env() {
    let locale = std::env::var("TRENDLENS_LANG").unwrap_or_else(|_| "en".to_string());
    set_locale(&locale);
}

/// Normalize locale code to supported format
///
/// - tr-TR, tr_TR, turkish -> tr
/// - anything else -> en
fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();

    if lower.starts_with("tr") || lower == "turkish" {
        "tr"
    } else {
        "en"
    }
}

/// Translate a key with optional parameters
///
/// This is a re-export of rust_i18n::t! for convenience.
///
/// ```rust,ignore
/// let msg = t!("session.fetch.shape", rows = 52);
/// ```
#[doc(inline)]
pub use rust_i18n::t;
