//! The closed set of credential keys chatrig understands.

use serde::{Deserialize, Serialize};

/// How values for a key are merged across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// The first source with a non-empty value wins.
    FirstNonEmpty,
    /// Resolved together with the other positional key from a single source,
    /// so URL and key lists stay index-aligned.
    PositionalZip,
}

/// Whether a name matched a key's canonical spelling or one of its aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    Canonical,
    Alias,
}

/// A logical credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialKey {
    /// Default provider key; its endpoint is always listed first.
    OpenAiApiKey,
    /// Secondary provider without a native front-end driver (served via the proxy).
    AnthropicApiKey,
    /// Auxiliary model provider (served via the proxy).
    GeminiApiKey,
    /// Aggregator endpoint key.
    OpenRouterApiKey,
    /// Aggregator endpoint base URL override.
    OpenRouterBaseUrl,
    /// Proxy master key.
    LiteLlmMasterKey,
    /// Proxy client key, used when no master key is set.
    LiteLlmApiKey,
    /// `;`-separated endpoint keys, index-aligned with [`Self::OpenAiApiBaseUrls`].
    OpenAiApiKeys,
    /// `;`-separated endpoint base URLs.
    OpenAiApiBaseUrls,
}

impl CredentialKey {
    /// Every key, in a stable order.
    pub const ALL: [Self; 9] = [
        Self::OpenAiApiKey,
        Self::AnthropicApiKey,
        Self::GeminiApiKey,
        Self::OpenRouterApiKey,
        Self::OpenRouterBaseUrl,
        Self::LiteLlmMasterKey,
        Self::LiteLlmApiKey,
        Self::OpenAiApiKeys,
        Self::OpenAiApiBaseUrls,
    ];

    /// The name written in credential files and generated env files.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::OpenAiApiKey => "OPENAI_API_KEY",
            Self::AnthropicApiKey => "ANTHROPIC_API_KEY",
            Self::GeminiApiKey => "GEMINI_API_KEY",
            Self::OpenRouterApiKey => "OPENROUTER_API_KEY",
            Self::OpenRouterBaseUrl => "OPENROUTER_BASE_URL",
            Self::LiteLlmMasterKey => "LITELLM_MASTER_KEY",
            Self::LiteLlmApiKey => "LITELLM_API_KEY",
            Self::OpenAiApiKeys => "OPENAI_API_KEYS",
            Self::OpenAiApiBaseUrls => "OPENAI_API_BASE_URLS",
        }
    }

    /// Alternate spellings honoured only when the canonical name is unset.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::AnthropicApiKey => &["CLAUDE_API_KEY"],
            Self::GeminiApiKey => &["GOOGLE_API_KEY"],
            _ => &[],
        }
    }

    pub const fn merge_rule(self) -> MergeRule {
        match self {
            Self::OpenAiApiKeys | Self::OpenAiApiBaseUrls => MergeRule::PositionalZip,
            _ => MergeRule::FirstNonEmpty,
        }
    }

    /// Look up a key by any of its spellings.
    pub fn from_name(name: &str) -> Option<(Self, KeyName)> {
        Self::ALL.into_iter().find_map(|key| {
            if key.canonical_name() == name {
                Some((key, KeyName::Canonical))
            } else if key.aliases().contains(&name) {
                Some((key, KeyName::Alias))
            } else {
                None
            }
        })
    }
}

impl std::fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}
