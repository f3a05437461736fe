use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub holds: HoldRules,
    pub database: Option<DatabaseConfig>,
    pub kafka: Option<KafkaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HoldRules {
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
}

impl HoldRules {
    pub fn hold_ttl(&self) -> Duration {
        Duration::from_secs(self.hold_seconds)
    }
}

impl Default for HoldRules {
    fn default() -> Self {
        Self { hold_seconds: default_hold_seconds() }
    }
}

fn default_hold_seconds() -> u64 { 120 }

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_topic() -> String { "seats.status".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SEATLOCK_REDIS__URL=redis://cache/` sets `redis.url`
            .add_source(config::Environment::with_prefix("SEATLOCK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_optional_sections() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 8080\n[redis]\nurl = \"redis://127.0.0.1/\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let cfg: Config = s.try_deserialize().unwrap();
        assert_eq!(cfg.holds.hold_ttl(), Duration::from_secs(120));
        assert!(cfg.database.is_none());
        assert!(cfg.kafka.is_none());
    }

    #[test]
    fn test_kafka_topic_default() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 1\n[redis]\nurl = \"x\"\n[kafka]\nbrokers = \"b:9092\"\n[holds]\nhold_seconds = 30\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let cfg: Config = s.try_deserialize().unwrap();
        assert_eq!(cfg.kafka.unwrap().topic, "seats.status");
        assert_eq!(cfg.holds.hold_seconds, 30);
    }
}
