//! Record types for the IGDB resources this client exposes.
//!
//! # Design
//! Records are decode-only. Every struct carries `#[serde(default)]` because
//! the `fields` option lets the server omit anything not asked for; a missing
//! field decodes to its zero value (or `None` for enums). Timestamps are unix
//! epoch seconds, as sent.

use serde::Deserialize;

/// A URL as returned by the API.
pub type Url = String;

/// A tag number packing a tag type and an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub i64);

/// A gaming platform: console, handheld, operating system, ...
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Platform {
    pub id: i64,
    pub abbreviation: String,
    pub alternative_name: String,
    pub category: Option<PlatformCategory>,
    pub created_at: i64,
    pub generation: i64,
    pub name: String,
    pub platform_logo: i64,
    pub product_family: i64,
    pub slug: String,
    pub summary: String,
    pub updated_at: i64,
    pub url: Url,
    pub versions: Vec<i64>,
    pub websites: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
pub enum PlatformCategory {
    Console = 1,
    Arcade = 2,
    Platform = 3,
    OperatingSystem = 4,
    PortableConsole = 5,
    Computer = 6,
}

impl TryFrom<i64> for PlatformCategory {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => PlatformCategory::Console,
            2 => PlatformCategory::Arcade,
            3 => PlatformCategory::Platform,
            4 => PlatformCategory::OperatingSystem,
            5 => PlatformCategory::PortableConsole,
            6 => PlatformCategory::Computer,
            other => return Err(format!("unknown platform category {other}")),
        })
    }
}

/// A group of pulse articles about the same topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PulseGroup {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub url: Url,
    pub created_at: i64,
    pub updated_at: i64,
    pub tags: Vec<Tag>,
    pub pulses: Vec<i64>,
    pub game: Vec<i64>,
}

/// The API's test resource, exercising every field type it supports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestDummy {
    pub id: i64,
    pub bool_value: bool,
    pub created_at: i64,
    pub enum_test: Option<TestDummyEnum>,
    pub float_value: f64,
    pub game: i64,
    pub integer_array: Vec<i64>,
    pub integer_value: i64,
    pub name: String,
    pub new_integer_value: i64,
    pub private: bool,
    pub slug: String,
    pub string_array: Vec<String>,
    pub test_dummies: Vec<i64>,
    pub test_dummy: i64,
    pub updated_at: i64,
    pub url: Url,
    pub user: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
pub enum TestDummyEnum {
    Enum1 = 1,
    Enum2 = 2,
}

impl TryFrom<i64> for TestDummyEnum {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TestDummyEnum::Enum1),
            2 => Ok(TestDummyEnum::Enum2),
            other => Err(format!("unknown test dummy enum {other}")),
        }
    }
}

/// Envelope of a `count` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Count {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_platform_decodes_with_defaults() {
        let p: Platform = serde_json::from_str(r#"{"id":8,"name":"PlayStation 2"}"#).unwrap();
        assert_eq!(p.id, 8);
        assert_eq!(p.name, "PlayStation 2");
        assert!(p.category.is_none());
        assert!(p.versions.is_empty());
    }

    #[test]
    fn platform_category_decodes_from_integer() {
        let p: Platform = serde_json::from_str(r#"{"id":6,"category":4}"#).unwrap();
        assert_eq!(p.category, Some(PlatformCategory::OperatingSystem));
    }

    #[test]
    fn unknown_enum_value_is_a_decode_error() {
        let result: Result<TestDummy, _> = serde_json::from_str(r#"{"enum_test":9}"#);
        assert!(result.is_err());
    }

    #[test]
    fn pulse_group_tags_are_plain_integers() {
        let g: PulseGroup =
            serde_json::from_str(r#"{"id":1,"tags":[1,268435462],"game":[1020]}"#).unwrap();
        assert_eq!(g.tags, vec![Tag(1), Tag(268435462)]);
        assert_eq!(g.game, vec![1020]);
    }

    #[test]
    fn count_requires_count_key() {
        assert!(serde_json::from_str::<Count>(r#"{"total":3}"#).is_err());
        assert_eq!(
            serde_json::from_str::<Count>(r#"{"count":3}"#).unwrap(),
            Count { count: 3 }
        );
    }
}
