use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SextantConfig {
    pub network: NetworkConfig,
    pub mirror: MirrorConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkConfig {
    pub horizon_url: String,
    pub network_passphrase: String,
    #[serde(default = "default_base_fee")]
    pub base_fee: u64,
    #[serde(default = "default_tx_window_secs")]
    pub tx_window_secs: u64,
}

fn default_base_fee() -> u64 {
    crate::trustline::envelope::BASE_FEE
}

fn default_tx_window_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MirrorConfig {
    /// Base URL of the hosted trustline table. Leave empty if no mirror is deployed;
    /// lookups and writes then degrade to the non-fatal failure path.
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    pub keystore_file: String,
    pub log_level: String,
    #[serde(default = "default_trust_limit")]
    pub default_trust_limit: String,
}

fn default_trust_limit() -> String {
    "10000".to_string()
}

impl Default for SextantConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                horizon_url: "https://horizon-testnet.stellar.org".to_string(),
                network_passphrase: "Test SDF Network ; September 2015".to_string(),
                base_fee: default_base_fee(),
                tx_window_secs: 30,
            },
            mirror: MirrorConfig {
                url: String::new(),
                api_key: None,
            },
            client: ClientConfig {
                keystore_file: "keystore.json".to_string(),
                log_level: "info".to_string(),
                default_trust_limit: "10000".to_string(),
            },
        }
    }
}

impl SextantConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => {
                        println!("Config loaded from {}", path);
                        c
                    }
                    Err(e) => {
                        eprintln!("Error parsing config: {}. Using Defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading config: {}. Using Defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            if let Ok(s) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, s);
            }
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_testnet() {
        let config = SextantConfig::default();
        assert!(config.network.horizon_url.contains("testnet"));
        assert_eq!(config.network.base_fee, 100);
        assert_eq!(config.network.tx_window_secs, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [network]
            horizon_url = "http://localhost:8000"
            network_passphrase = "Standalone Network ; February 2017"

            [mirror]
            url = ""

            [client]
            keystore_file = "keystore.json"
            log_level = "debug"
        "#;
        let config: SextantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.base_fee, 100);
        assert_eq!(config.client.default_trust_limit, "10000");
        assert!(config.mirror.api_key.is_none());
    }
}
