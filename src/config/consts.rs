/// Agent contacted when neither the command line nor the settings file names one
pub const DEFAULT_AGENT_URL: &str = "http://localhost:13740";
/// Username sent to agents when none is configured
pub const DEFAULT_USERNAME: &str = "user";
/// Number of concurrent workers used to cook a recipe
pub const DEFAULT_WORKER_COUNT: usize = 2;
/// Environment variable consulted for the agent password
pub const PASSWORD_ENV_VAR: &str = "SOUS_CHEF_PASSWORD";
/// Environment variable naming the settings file when `--config` is absent
pub const CONFIG_ENV_VAR: &str = "SOUS_CHEF_CONFIG";
