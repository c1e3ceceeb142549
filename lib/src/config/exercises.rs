use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExercisesConfig {
    pub host: String,
    pub port: u16,
    /// Public base path of the service, advertised in the OpenAPI document.
    pub server: String,
    #[serde(default)]
    pub submissions: SubmissionsConfig,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionsConfig {
    /// Maximum number of answers accepted in a single submission.
    #[serde(default = "default_max_answers")]
    pub max_answers: usize,
}

impl Default for SubmissionsConfig {
    fn default() -> Self {
        Self {
            max_answers: default_max_answers(),
        }
    }
}

fn default_max_answers() -> usize {
    256
}
