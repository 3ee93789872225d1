//! Locale detection
//!
//! Rust strings are always UTF-8, so there is nothing to switch at process
//! level. What matters is whether the operator's locale agrees, since the
//! argument vector is expected to be UTF-8 as well.

use std::env::{self, VarError};
use std::sync::OnceLock;

use crate::error::{SuiteError, SuiteResult};

/// Locale variables in POSIX precedence order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

static LOCALE: OnceLock<LocaleInfo> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    /// Effective locale name, `None` for the implicit "C" locale
    pub name: Option<String>,
    pub utf8: bool,
}

impl LocaleInfo {
    /// Build from the value of the first set locale variable.
    pub fn from_name(name: Option<String>) -> Self {
        let utf8 = name.as_deref().is_some_and(is_utf8_locale);
        Self { name, utf8 }
    }
}

/// Whether a locale name selects a UTF-8 codeset (`en_US.UTF-8`, `C.utf8`).
pub fn is_utf8_locale(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, codeset)| {
            let codeset = codeset.split('@').next().unwrap_or(codeset);
            codeset.eq_ignore_ascii_case("utf-8") || codeset.eq_ignore_ascii_case("utf8")
        })
        .unwrap_or(false)
}

/// Detect the locale once per process.
///
/// Repeated calls return the cached result. Fails only when a locale
/// variable holds bytes that are not text.
pub fn initialize() -> SuiteResult<&'static LocaleInfo> {
    if let Some(info) = LOCALE.get() {
        return Ok(info);
    }
    let info = detect()?;
    Ok(LOCALE.get_or_init(|| info))
}

fn detect() -> SuiteResult<LocaleInfo> {
    for var in LOCALE_VARS {
        match env::var(var) {
            Ok(value) if !value.is_empty() => return Ok(LocaleInfo::from_name(Some(value))),
            Ok(_) | Err(VarError::NotPresent) => continue,
            Err(VarError::NotUnicode(raw)) => {
                return Err(SuiteError::options(format!(
                    "locale setting {}={} is not valid text",
                    var,
                    raw.to_string_lossy()
                )))
            }
        }
    }
    Ok(LocaleInfo::from_name(None))
}
