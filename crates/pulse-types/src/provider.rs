use serde::{Deserialize, Serialize};

/// One provider and the models it offers for a single capability
/// (chat, embedding, TTS or STT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// All providers the platform exposes for one capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCatalog {
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

impl ProviderCatalog {
    /// Flatten into `provider/model` composite keys, in catalog order.
    pub fn model_keys(&self) -> Vec<String> {
        self.providers
            .iter()
            .flat_map(|p| p.models.iter().map(move |m| format!("{}/{}", p.name, m)))
            .collect()
    }
}

/// A `provider/model` composite key selecting one concrete model.
/// Parsing requires exactly one separator between two non-empty parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelKey {
    pub provider: String,
    pub model: String,
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

impl std::str::FromStr for ModelKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((provider, model))
                if !provider.is_empty() && !model.is_empty() && !model.contains('/') =>
            {
                Ok(Self {
                    provider: provider.to_string(),
                    model: model.to_string(),
                })
            }
            _ => Err(anyhow::anyhow!(
                "model key must be provider/model, got: {s:?}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_key_roundtrip() {
        let key: ModelKey = "openai/gpt-4o".parse().unwrap();
        assert_eq!(key.provider, "openai");
        assert_eq!(key.model, "gpt-4o");
        assert_eq!(key.to_string(), "openai/gpt-4o");
    }

    #[test]
    fn model_key_rejects_wrong_arity() {
        for bad in ["gpt-4o", "a/b/c", "/gpt-4o", "openai/", "/", ""] {
            assert!(bad.parse::<ModelKey>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn catalog_flattens_in_order() {
        let catalog = ProviderCatalog {
            providers: vec![
                ProviderEntry {
                    name: "openai".into(),
                    models: vec!["gpt-4o".into(), "gpt-4o-mini".into()],
                },
                ProviderEntry {
                    name: "ollama".into(),
                    models: vec!["llama3".into()],
                },
            ],
        };
        assert_eq!(
            catalog.model_keys(),
            vec!["openai/gpt-4o", "openai/gpt-4o-mini", "ollama/llama3"]
        );
    }
}
