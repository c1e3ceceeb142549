//! Typed views of the loosely structured `metadata` and `form_structure`
//! columns.
//!
//! Stored values may be missing, JSON encoded strings, objects written by an
//! older schema or objects belonging to a different exercise type. None of the
//! functions in this module fail; unusable data degrades to "no data".

use entity::sea_orm_active_enums::ExercisesExerciseType;
use schemas::exercises::content::{
    ArvanVideoConfig, EmbedConfig, ExerciseContent, FormStructure, MediaConfig, NegavidConfig,
    SpotplayerConfig,
};
use serde_json::{Map, Value};

/// Outcome of a normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    /// The exercise is of a different type.
    NotApplicable,
    /// The exercise has the right type but no usable configuration.
    NoData,
    Config(T),
}

impl<T> Normalized<T> {
    pub fn config(self) -> Option<T> {
        match self {
            Self::Config(config) => Some(config),
            _ => None,
        }
    }
}

pub fn normalize_spotplayer(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
) -> Normalized<SpotplayerConfig> {
    normalize(exercise_type, ExercisesExerciseType::Spotplayer, metadata, |obj| {
        Some(SpotplayerConfig {
            spotplayer_course_id: identifier(obj, "spotplayer_course_id")?,
            spotplayer_item_id: identifier(obj, "spotplayer_item_id"),
            spotplayer_license_key: identifier(obj, "spotplayer_license_key"),
            auto_create_license: obj
                .get("auto_create_license")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    })
}

pub fn normalize_arvan_video(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
) -> Normalized<ArvanVideoConfig> {
    normalize(exercise_type, ExercisesExerciseType::ArvanVideo, metadata, |obj| {
        Some(ArvanVideoConfig {
            arvan_video_id: identifier(obj, "arvan_video_id")?,
        })
    })
}

pub fn normalize_negavid(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
) -> Normalized<NegavidConfig> {
    normalize(exercise_type, ExercisesExerciseType::Negavid, metadata, |obj| {
        let id = obj.get("negavid_video_id")?.as_str()?.trim();
        (!id.is_empty()).then(|| NegavidConfig {
            negavid_video_id: id.into(),
        })
    })
}

/// Plain `video` and `audio` exercises carry the url of the file to play.
pub fn normalize_media(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
) -> Normalized<MediaConfig> {
    let expected = match exercise_type {
        ExercisesExerciseType::Video | ExercisesExerciseType::Audio => exercise_type,
        _ => return Normalized::NotApplicable,
    };
    normalize(exercise_type, expected, metadata, |obj| {
        let url = obj.get("url")?.as_str()?.trim();
        (!url.is_empty()).then(|| MediaConfig { url: url.into() })
    })
}

pub fn normalize_embed(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
) -> Normalized<EmbedConfig> {
    normalize(exercise_type, ExercisesExerciseType::Iframe, metadata, |obj| {
        let html = obj.get("html")?.as_str()?;
        (!html.trim().is_empty()).then(|| EmbedConfig { html: html.into() })
    })
}

/// Returns the stored form structure if it holds a `questions` array, and an
/// empty form otherwise.
pub fn normalize_form_structure(form_structure: Option<&Value>) -> FormStructure {
    parse_object(form_structure)
        .and_then(|obj| match obj.get("questions") {
            Some(Value::Array(questions)) => Some(FormStructure {
                questions: questions.clone(),
            }),
            _ => None,
        })
        .unwrap_or_default()
}

/// Picks the normalizer matching the exercise type.
pub fn exercise_content(
    exercise_type: ExercisesExerciseType,
    metadata: Option<&Value>,
    form_structure: Option<&Value>,
) -> Option<ExerciseContent> {
    use ExercisesExerciseType as T;
    match exercise_type {
        T::Form => Some(ExerciseContent::Form(normalize_form_structure(
            form_structure,
        ))),
        T::Spotplayer => normalize_spotplayer(exercise_type, metadata)
            .config()
            .map(ExerciseContent::Spotplayer),
        T::ArvanVideo => normalize_arvan_video(exercise_type, metadata)
            .config()
            .map(ExerciseContent::ArvanVideo),
        T::Negavid => normalize_negavid(exercise_type, metadata)
            .config()
            .map(ExerciseContent::Negavid),
        T::Video | T::Audio => normalize_media(exercise_type, metadata)
            .config()
            .map(ExerciseContent::Media),
        T::Iframe => normalize_embed(exercise_type, metadata)
            .config()
            .map(ExerciseContent::Embed),
        T::Simple => None,
    }
}

fn normalize<T>(
    exercise_type: ExercisesExerciseType,
    expected: ExercisesExerciseType,
    metadata: Option<&Value>,
    extract: impl FnOnce(&Map<String, Value>) -> Option<T>,
) -> Normalized<T> {
    if exercise_type != expected {
        return Normalized::NotApplicable;
    }
    match parse_object(metadata).as_ref().and_then(extract) {
        Some(config) => Normalized::Config(config),
        None => Normalized::NoData,
    }
}

/// Unwraps JSON encoded strings and returns the value if it is an object.
fn parse_object(value: Option<&Value>) -> Option<Map<String, Value>> {
    match value? {
        Value::Object(obj) => Some(obj.clone()),
        Value::String(raw) => match serde_json::from_str(raw).ok()? {
            Value::Object(obj) => Some(obj),
            _ => None,
        },
        _ => None,
    }
}

/// Reads an identifier that may have been stored as a string or a number.
fn identifier(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    use ExercisesExerciseType as T;

    const ALL_TYPES: [T; 8] = [
        T::ArvanVideo,
        T::Audio,
        T::Form,
        T::Iframe,
        T::Negavid,
        T::Simple,
        T::Spotplayer,
        T::Video,
    ];

    #[test]
    fn test_spotplayer() {
        let metadata = json!({"spotplayer_course_id": "c1"});
        assert_eq!(
            normalize_spotplayer(T::Spotplayer, Some(&metadata)),
            Normalized::Config(SpotplayerConfig {
                spotplayer_course_id: "c1".into(),
                spotplayer_item_id: None,
                spotplayer_license_key: None,
                auto_create_license: false,
            })
        );
        let metadata = json!({
            "spotplayer_course_id": "c1",
            "spotplayer_item_id": 42,
            "spotplayer_license_key": "key",
            "auto_create_license": true,
        });
        assert_eq!(
            normalize_spotplayer(T::Spotplayer, Some(&metadata)),
            Normalized::Config(SpotplayerConfig {
                spotplayer_course_id: "c1".into(),
                spotplayer_item_id: Some("42".into()),
                spotplayer_license_key: Some("key".into()),
                auto_create_license: true,
            })
        );
    }

    #[test]
    fn test_spotplayer_from_string() {
        let metadata = json!(r#"{"spotplayer_course_id": "c1"}"#);
        assert!(matches!(
            normalize_spotplayer(T::Spotplayer, Some(&metadata)),
            Normalized::Config(SpotplayerConfig { spotplayer_course_id, .. }) if spotplayer_course_id == "c1"
        ));
    }

    #[test]
    fn test_wrong_type_is_not_applicable() {
        let metadata = json!({"spotplayer_course_id": "c1"});
        assert_eq!(
            normalize_spotplayer(T::Video, Some(&metadata)),
            Normalized::NotApplicable
        );
        assert_eq!(
            normalize_arvan_video(T::Spotplayer, None),
            Normalized::NotApplicable
        );
        assert_eq!(normalize_media(T::Form, None), Normalized::NotApplicable);
    }

    #[test]
    fn test_unusable_metadata_is_no_data() {
        for metadata in [
            None,
            Some(json!(null)),
            Some(json!("not json at all {")),
            Some(json!("[1, 2]")),
            Some(json!(17)),
            Some(json!([])),
            Some(json!({})),
            Some(json!({"spotplayer_course_id": null})),
            Some(json!({"spotplayer_course_id": ""})),
        ] {
            assert_eq!(
                normalize_spotplayer(T::Spotplayer, metadata.as_ref()),
                Normalized::NoData,
                "{metadata:?}"
            );
        }
    }

    #[test]
    fn test_negavid_trims_identifier() {
        assert_eq!(
            normalize_negavid(T::Negavid, Some(&json!({"negavid_video_id": "   "}))),
            Normalized::NoData
        );
        assert_eq!(
            normalize_negavid(T::Negavid, Some(&json!({"negavid_video_id": " v7 "}))),
            Normalized::Config(NegavidConfig {
                negavid_video_id: "v7".into()
            })
        );
    }

    #[test]
    fn test_media_and_embed() {
        let metadata = json!({"url": "https://cdn.example/a.mp3"});
        assert_eq!(
            normalize_media(T::Audio, Some(&metadata)),
            Normalized::Config(MediaConfig {
                url: "https://cdn.example/a.mp3".into()
            })
        );
        assert_eq!(
            normalize_embed(T::Iframe, Some(&json!({"html": ""}))),
            Normalized::NoData
        );
        assert_eq!(
            normalize_arvan_video(T::ArvanVideo, Some(&json!({"arvan_video_id": "a1"}))),
            Normalized::Config(ArvanVideoConfig {
                arvan_video_id: "a1".into()
            })
        );
    }

    #[test]
    fn test_form_structure() {
        let empty = FormStructure::default();
        assert_eq!(normalize_form_structure(None), empty);
        assert_eq!(normalize_form_structure(Some(&json!("{oops"))), empty);
        assert_eq!(normalize_form_structure(Some(&json!({"x": 1}))), empty);
        assert_eq!(
            normalize_form_structure(Some(&json!({"questions": "nope"}))),
            empty
        );

        let questions = vec![json!({"id": "q1", "correct_answer": "a"})];
        let stored = json!({ "questions": questions });
        let expected = FormStructure {
            questions: questions.clone(),
        };
        assert_eq!(normalize_form_structure(Some(&stored)), expected);
        let encoded = json!(stored.to_string());
        assert_eq!(normalize_form_structure(Some(&encoded)), expected);
    }

    #[test]
    fn test_normalizers_are_idempotent() {
        let metadata = json!({"spotplayer_course_id": "c1", "auto_create_license": true});
        let Normalized::Config(first) = normalize_spotplayer(T::Spotplayer, Some(&metadata)) else {
            panic!("expected config");
        };
        let again = json!({
            "spotplayer_course_id": first.spotplayer_course_id,
            "spotplayer_item_id": first.spotplayer_item_id,
            "spotplayer_license_key": first.spotplayer_license_key,
            "auto_create_license": first.auto_create_license,
        });
        assert_eq!(
            normalize_spotplayer(T::Spotplayer, Some(&again)),
            Normalized::Config(first)
        );

        let form = json!({"questions": [{"id": "q1"}]});
        let once = normalize_form_structure(Some(&form));
        let twice = normalize_form_structure(Some(&json!({ "questions": once.questions })));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_exercise_content_is_total() {
        let inputs = [
            None,
            Some(json!(null)),
            Some(json!("garbage")),
            Some(json!(3.5)),
            Some(json!({"questions": 1, "url": 7, "html": null})),
            Some(json!({
                "spotplayer_course_id": "c",
                "arvan_video_id": "a",
                "negavid_video_id": "n",
                "url": "u",
                "html": "<iframe/>",
                "questions": [],
            })),
        ];
        for exercise_type in ALL_TYPES {
            for metadata in &inputs {
                let content = exercise_content(exercise_type, metadata.as_ref(), metadata.as_ref());
                match exercise_type {
                    T::Form => assert!(matches!(content, Some(ExerciseContent::Form(_)))),
                    T::Simple => assert!(content.is_none()),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_exercise_content_dispatch() {
        let metadata = json!({
            "spotplayer_course_id": "c",
            "negavid_video_id": "n",
            "url": "u",
        });
        assert!(matches!(
            exercise_content(T::Spotplayer, Some(&metadata), None),
            Some(ExerciseContent::Spotplayer(_))
        ));
        assert!(matches!(
            exercise_content(T::Negavid, Some(&metadata), None),
            Some(ExerciseContent::Negavid(_))
        ));
        assert!(matches!(
            exercise_content(T::Video, Some(&metadata), None),
            Some(ExerciseContent::Media(_))
        ));
        assert_eq!(exercise_content(T::ArvanVideo, Some(&metadata), None), None);
    }
}
