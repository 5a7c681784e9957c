//! Session identity model and its persisted JSON shape.
//!
//! The on-disk record under [`SESSION_KEY`] keeps the field names the web
//! client has always written (`anonymousId` / `walletAddress` / `isAnonymous`
//! / `tokenBalance`), so existing browser profiles keep working.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// The single localStorage key holding the session record.
pub const SESSION_KEY: &str = "safeVoiceUser";

/// How the current user is identified. Exactly one variant is ever active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// Generated display name, e.g. `BraveOwl417`.
    Anonymous(String),
    /// Wallet address supplied by the connector.
    Wallet(String),
}

impl Identity {
    pub fn label(&self) -> &str {
        match self {
            Identity::Anonymous(name) => name,
            Identity::Wallet(address) => address,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous(_))
    }

    pub fn is_wallet(&self) -> bool {
        matches!(self, Identity::Wallet(_))
    }
}

/// The persisted identity plus token balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSession {
    pub identity: Identity,
    pub token_balance: u64,
}

impl UserSession {
    pub fn to_json(&self) -> String {
        let stored = StoredSession::from(self);
        serde_json::to_string(&stored).unwrap_or_else(|_| String::new())
    }

    /// Parse and validate a persisted record. Any structural problem is an
    /// error; callers treat that as "no session" and drop the record.
    pub fn from_json(raw: &str) -> Result<UserSession> {
        let stored: StoredSession = serde_json::from_str(raw)?;
        stored.into_session()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anonymous_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wallet_address: Option<String>,
    is_anonymous: bool,
    #[serde(default)]
    token_balance: u64,
}

impl From<&UserSession> for StoredSession {
    fn from(session: &UserSession) -> Self {
        match &session.identity {
            Identity::Anonymous(name) => StoredSession {
                anonymous_id: Some(name.clone()),
                wallet_address: None,
                is_anonymous: true,
                token_balance: session.token_balance,
            },
            Identity::Wallet(address) => StoredSession {
                anonymous_id: None,
                wallet_address: Some(address.clone()),
                is_anonymous: false,
                token_balance: session.token_balance,
            },
        }
    }
}

impl StoredSession {
    fn into_session(self) -> Result<UserSession> {
        let identity = match (self.is_anonymous, self.anonymous_id, self.wallet_address) {
            (true, Some(name), None) if !name.is_empty() => Identity::Anonymous(name),
            (false, None, Some(address)) if !address.is_empty() => Identity::Wallet(address),
            _ => bail!("session record mode flag does not match its identifier fields"),
        };
        Ok(UserSession {
            identity,
            token_balance: self.token_balance,
        })
    }
}

/// Head…tail ellipsis form used wherever a full address would be noise.
/// Char-based so multi-byte input can never split a code point.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 11 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_record_roundtrip() {
        let session = UserSession {
            identity: Identity::Anonymous("BraveOwl417".into()),
            token_balance: 52,
        };
        let raw = session.to_json();
        assert!(raw.contains("\"anonymousId\":\"BraveOwl417\""));
        assert!(raw.contains("\"isAnonymous\":true"));
        assert!(raw.contains("\"tokenBalance\":52"));
        assert!(!raw.contains("walletAddress"));
        assert_eq!(UserSession::from_json(&raw).unwrap(), session);
    }

    #[test]
    fn wallet_record_roundtrip() {
        let session = UserSession {
            identity: Identity::Wallet("0xabc0000000000000000000000000000000001234".into()),
            token_balance: 152,
        };
        let parsed = UserSession::from_json(&session.to_json()).unwrap();
        assert_eq!(parsed, session);
        assert!(parsed.identity.is_wallet());
    }

    #[test]
    fn missing_balance_defaults_to_zero() {
        let parsed =
            UserSession::from_json(r#"{"anonymousId":"CalmFox100","isAnonymous":true}"#).unwrap();
        assert_eq!(parsed.token_balance, 0);
    }

    #[test]
    fn mode_mismatch_is_rejected() {
        // Flag says anonymous but only a wallet address is present.
        let raw = r#"{"walletAddress":"0x1","isAnonymous":true,"tokenBalance":10}"#;
        assert!(UserSession::from_json(raw).is_err());

        // Both identifier fields populated.
        let raw = r#"{"anonymousId":"A","walletAddress":"0x1","isAnonymous":false,"tokenBalance":0}"#;
        assert!(UserSession::from_json(raw).is_err());

        // Empty identifier.
        let raw = r#"{"anonymousId":"","isAnonymous":true,"tokenBalance":0}"#;
        assert!(UserSession::from_json(raw).is_err());
    }

    #[test]
    fn negative_or_fractional_balance_is_rejected() {
        let raw = r#"{"anonymousId":"A","isAnonymous":true,"tokenBalance":-5}"#;
        assert!(UserSession::from_json(raw).is_err());
        let raw = r#"{"anonymousId":"A","isAnonymous":true,"tokenBalance":1.5}"#;
        assert!(UserSession::from_json(raw).is_err());
    }

    #[test]
    fn short_address_keeps_small_and_shortens_long() {
        assert_eq!(short_address("0xabc1234"), "0xabc1234");
        assert_eq!(
            short_address("0xabcdef0123456789abcdef0123456789abcdef12"),
            "0xabcd\u{2026}ef12"
        );
        // Must not split a multi-byte char even on odd input.
        assert_eq!(short_address("0xABC\u{2026}1234AAAA"), "0xABC\u{2026}\u{2026}AAAA");
    }
}
