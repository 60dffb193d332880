use confique::Config;

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone, Config)]
pub struct AuthdConfig {
    /// Port the server listens on
    #[config(env = "AUTHD_PORT", default = 7600)]
    pub port: u16,

    /// Lifetime of issued tokens, in seconds
    #[config(env = "AUTHD_TOKEN_TTL_SECS", default = 86400)]
    pub token_ttl_secs: u64,
}

impl AuthdConfig {
    pub fn load() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }
}

impl Default for AuthdConfig {
    fn default() -> Self {
        Self {
            port: 7600,
            token_ttl_secs: 86_400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_load_without_env() {
        let config = AuthdConfig::default();
        assert_eq!(config.port, 7600);
        assert_eq!(config.token_ttl_secs, 86_400);
    }
}
