use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movies CSV file
    #[serde(default = "default_movies_csv")]
    pub movies_csv: String,

    /// Path to the credits CSV file (cast and crew)
    #[serde(default = "default_credits_csv")]
    pub credits_csv: String,

    /// Number of similar films returned per recommendation
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Minimum vote count before vote figures are reported for a title
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u64,

    /// Build the similarity index at startup instead of on first request
    #[serde(default)]
    pub eager_index: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_movies_csv() -> String {
    "data/movies.csv".to_string()
}

fn default_credits_csv() -> String {
    "data/credits.csv".to_string()
}

fn default_recommendation_count() -> usize {
    5
}

fn default_min_vote_count() -> u64 {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.recommendation_count == 0 {
            anyhow::bail!("RECOMMENDATION_COUNT must be at least 1");
        }

        Ok(config)
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.movies_csv, "data/movies.csv");
        assert_eq!(config.credits_csv, "data/credits.csv");
        assert_eq!(config.recommendation_count, 5);
        assert_eq!(config.min_vote_count, 2000);
        assert!(!config.eager_index);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_from_env_pairs() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("RECOMMENDATION_COUNT".to_string(), "10".to_string()),
            ("EAGER_INDEX".to_string(), "true".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.recommendation_count, 10);
        assert!(config.eager_index);
    }
}
