use poem_openapi::{Object, Union};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed content configuration of an exercise, selected by its type.
#[derive(Debug, Clone, PartialEq, Union)]
#[oai(discriminator_name = "kind", one_of)]
pub enum ExerciseContent {
    #[oai(mapping = "form")]
    Form(FormStructure),
    #[oai(mapping = "spotplayer")]
    Spotplayer(SpotplayerConfig),
    #[oai(mapping = "arvan_video")]
    ArvanVideo(ArvanVideoConfig),
    #[oai(mapping = "negavid")]
    Negavid(NegavidConfig),
    #[oai(mapping = "media")]
    Media(MediaConfig),
    #[oai(mapping = "embed")]
    Embed(EmbedConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Object, Serialize, Deserialize)]
pub struct FormStructure {
    /// The question definitions of the form. Each question is an object with
    /// at least an `id`; `correct_answer` and `required` are optional.
    #[oai(default)]
    #[serde(default)]
    pub questions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct SpotplayerConfig {
    /// The SpotPlayer course the exercise plays.
    pub spotplayer_course_id: String,
    /// A specific item within the SpotPlayer course.
    pub spotplayer_item_id: Option<String>,
    /// A pre-issued license key.
    pub spotplayer_license_key: Option<String>,
    /// Whether a license should be created for students automatically.
    pub auto_create_license: bool,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct ArvanVideoConfig {
    /// The video id at ArvanCloud VOD.
    pub arvan_video_id: String,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct NegavidConfig {
    /// The video id at Negavid.
    pub negavid_video_id: String,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct MediaConfig {
    /// Directly playable url of a video or audio file.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct EmbedConfig {
    /// HTML fragment (usually an iframe) to embed.
    pub html: String,
}
