use std::{fs::File, path::Path};

use anyhow::Result;
use m3u_stream_rs::ParserOptions;
use serde::Deserialize;

use crate::transfer::MAX_CHANNEL_DEPTH;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Records the producer may be ahead of the consumer
    pub channel_depth: Option<usize>,
    pub carry_metadata: Option<bool>,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub timeout_secs: Option<u16>,
}

impl Config {
    pub fn channel_depth(&self) -> usize {
        self.channel_depth
            .unwrap_or(1)
            .clamp(1, MAX_CHANNEL_DEPTH)
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            carry_metadata: self
                .carry_metadata
                .unwrap_or(ParserOptions::default().carry_metadata),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let file = File::open(path.as_ref())?;
    let config: Config = serde_yaml::from_reader(file)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{Config, load_config, transfer::MAX_CHANNEL_DEPTH};

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.channel_depth(), 1);
        assert!(config.parser_options().carry_metadata);
        assert!(config.http.proxy.is_none());
    }

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
channelDepth: 0
carryMetadata: false
http:
  userAgent: "VLC/3.0.20"
  timeoutSecs: 10
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.channel_depth(), 1);
        assert!(!config.parser_options().carry_metadata);
        assert_eq!(config.http.user_agent.as_deref(), Some("VLC/3.0.20"));
        assert_eq!(config.http.timeout_secs, Some(10));
    }

    #[test]
    fn test_channel_depth_upper_bound() {
        let config: Config = serde_yaml::from_str("channelDepth: 18446744073709551615").unwrap();
        assert_eq!(config.channel_depth(), MAX_CHANNEL_DEPTH);

        let config: Config = serde_yaml::from_str("channelDepth: 8").unwrap();
        assert_eq!(config.channel_depth(), 8);
    }

    #[test]
    fn test_missing_config() {
        assert!(load_config("does-not-exist.yml").is_err());
    }
}
