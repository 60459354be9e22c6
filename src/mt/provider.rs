//! Provider identities and provider selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A translation service known to the orchestrator.
///
/// Variants are declared in priority order: when results from several
/// providers are listed, they are listed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    MyMemory,
    Microsoft,
    DeepL,
}

impl Provider {
    /// All providers, in priority order
    pub const ALL: [Provider; 4] = [
        Provider::Google,
        Provider::MyMemory,
        Provider::Microsoft,
        Provider::DeepL,
    ];

    /// Short identifier used on the wire and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::MyMemory => "mymemory",
            Provider::Microsoft => "microsoft",
            Provider::DeepL => "deepl",
        }
    }

    /// Human readable service name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google Translate",
            Provider::MyMemory => "MyMemory Translation",
            Provider::Microsoft => "Microsoft Translator",
            Provider::DeepL => "DeepL Translator",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| format!("Unknown translation provider: {}", s))
    }
}

/// Which providers a request should be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderSelection {
    Single(Provider),
    All,
}

impl ProviderSelection {
    /// The provider used when each target language gets exactly one call.
    ///
    /// `All` collapses to Google here: multi-target requests never fan out
    /// to every provider.
    pub fn sequential_provider(&self) -> Provider {
        match self {
            ProviderSelection::Single(provider) => *provider,
            ProviderSelection::All => Provider::Google,
        }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::Single(Provider::Google)
    }
}

impl fmt::Display for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSelection::Single(provider) => f.write_str(provider.id()),
            ProviderSelection::All => f.write_str("all"),
        }
    }
}

impl FromStr for ProviderSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(ProviderSelection::All)
        } else {
            s.parse().map(ProviderSelection::Single)
        }
    }
}

impl TryFrom<String> for ProviderSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProviderSelection> for String {
    fn from(selection: ProviderSelection) -> Self {
        selection.to_string()
    }
}
