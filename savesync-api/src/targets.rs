use std::collections::BTreeMap;

use savesync_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr, EnumString, EnumIter};

use crate::{Validator, FieldErrors};

mod resolve;
pub use resolve::{resolve, TargetForm};

/// form and wire representation of a config before it is resolved
pub type RawFields = BTreeMap<String, String>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    StrumAsRefStr, EnumString, EnumIter,
    Serialize, Deserialize
)]
pub enum TargetType {
    #[serde(rename = "local")]
    #[strum(serialize = "local")]
    Local,
    #[serde(rename = "s3_generic")]
    #[strum(serialize = "s3_generic")]
    S3Generic,
    #[serde(rename = "s3_aws")]
    #[strum(serialize = "s3_aws")]
    S3Aws,
    #[serde(rename = "sftp")]
    #[strum(serialize = "sftp")]
    Sftp,
}

impl TargetType {
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            TargetType::Local => &["path"],
            TargetType::S3Generic => &["endpoint", "bucket", "access_key", "secret_key"],
            TargetType::S3Aws => &["bucket", "region", "access_key", "secret_key"],
            TargetType::Sftp => &["host", "user", "path"],
        }
    }

    pub fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            TargetType::Local => &[],
            TargetType::S3Generic => &["region", "path_style", "use_tls"],
            TargetType::S3Aws => &[],
            TargetType::Sftp => &["password"],
        }
    }

    pub fn accepts_field(&self, key: &str) -> bool {
        self.required_fields().contains(&key) || self.optional_fields().contains(&key)
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3GenericConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
    pub use_tls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3AwsConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SftpConfig {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetConfig {
    Local(LocalConfig),
    S3Generic(S3GenericConfig),
    S3Aws(S3AwsConfig),
    Sftp(SftpConfig),
}

impl TargetConfig {
    pub fn target_type(&self) -> TargetType {
        match self {
            TargetConfig::Local(_) => TargetType::Local,
            TargetConfig::S3Generic(_) => TargetType::S3Generic,
            TargetConfig::S3Aws(_) => TargetType::S3Aws,
            TargetConfig::Sftp(_) => TargetType::Sftp,
        }
    }

    /// flattens the config back into the string map the backend stores
    pub fn to_fields(&self) -> RawFields {
        let mut fields = RawFields::new();

        match self {
            TargetConfig::Local(local) => {
                fields.insert("path".into(), local.path.clone());
            },
            TargetConfig::S3Generic(s3) => {
                fields.insert("endpoint".into(), s3.endpoint.clone());
                fields.insert("bucket".into(), s3.bucket.clone());

                if let Some(region) = &s3.region {
                    fields.insert("region".into(), region.clone());
                }

                fields.insert("access_key".into(), s3.access_key.clone());
                fields.insert("secret_key".into(), s3.secret_key.clone());
                fields.insert("path_style".into(), s3.path_style.to_string());
                fields.insert("use_tls".into(), s3.use_tls.to_string());
            },
            TargetConfig::S3Aws(s3) => {
                fields.insert("bucket".into(), s3.bucket.clone());
                fields.insert("region".into(), s3.region.clone());
                fields.insert("access_key".into(), s3.access_key.clone());
                fields.insert("secret_key".into(), s3.secret_key.clone());
            },
            TargetConfig::Sftp(sftp) => {
                fields.insert("host".into(), sftp.host.clone());
                fields.insert("user".into(), sftp.user.clone());

                if let Some(password) = &sftp.password {
                    fields.insert("password".into(), password.clone());
                }

                fields.insert("path".into(), sftp.path.clone());
            },
        }

        fields
    }
}

#[derive(Serialize, Deserialize)]
struct TargetRecord {
    id: ids::TargetId,
    name: String,
    #[serde(rename = "type")]
    type_: TargetType,
    #[serde(default, deserialize_with = "crate::serde::lenient_string_map")]
    config: RawFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetRecord", into = "TargetRecord")]
pub struct Target {
    pub id: ids::TargetId,
    pub name: String,
    pub config: TargetConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        self.config.target_type()
    }
}

impl TryFrom<TargetRecord> for Target {
    type Error = String;

    fn try_from(record: TargetRecord) -> Result<Self, Self::Error> {
        let config = resolve(record.type_, &record.config)
            .map_err(|errors| format!(
                "target {} has an invalid {} config: {}",
                record.id,
                record.type_,
                errors
            ))?;

        Ok(Target {
            id: record.id,
            name: record.name,
            config,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<Target> for TargetRecord {
    fn from(target: Target) -> Self {
        TargetRecord {
            id: target.id,
            name: target.name,
            type_: target.config.target_type(),
            config: target.config.to_fields(),
            created_at: target.created_at,
            updated_at: target.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TargetBody {
    name: String,
    #[serde(rename = "type")]
    type_: TargetType,
    #[serde(default, deserialize_with = "crate::serde::lenient_string_map")]
    config: RawFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetBody", into = "TargetBody")]
pub struct CreateTarget {
    pub name: String,
    pub config: TargetConfig,
}

/// updates replace the whole record, same shape as a create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetBody", into = "TargetBody")]
pub struct UpdateTarget {
    pub name: String,
    pub config: TargetConfig,
}

fn validate_name(name: &str) -> Result<(), FieldErrors> {
    let mut invalid = FieldErrors::new();

    if name.is_empty() {
        invalid.missing("name");
    } else if !savesync_lib::validation::name_valid(name) {
        invalid.invalid("name");
    }

    invalid.into_result()
}

impl Validator for CreateTarget {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name(&self.name)
    }
}

impl Validator for UpdateTarget {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name(&self.name)
    }
}

macro_rules! target_body_conversions {
    ($t:ident) => {
        impl TryFrom<TargetBody> for $t {
            type Error = String;

            fn try_from(body: TargetBody) -> Result<Self, Self::Error> {
                let config = resolve(body.type_, &body.config)
                    .map_err(|errors| format!("invalid {} config: {}", body.type_, errors))?;

                Ok($t {
                    name: body.name,
                    config,
                })
            }
        }

        impl From<$t> for TargetBody {
            fn from(given: $t) -> Self {
                TargetBody {
                    name: given.name,
                    type_: given.config.target_type(),
                    config: given.config.to_fields(),
                }
            }
        }
    };
}

target_body_conversions!(CreateTarget);
target_body_conversions!(UpdateTarget);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_into_variant() {
        let target: Target = serde_json::from_str(r#"{
            "id": 2,
            "name": "garage",
            "type": "s3_generic",
            "config": {
                "endpoint": "https://garage.lan:3900",
                "bucket": "backups",
                "access_key": "GK123",
                "secret_key": "s3cr3t",
                "path_style": "false"
            },
            "created_at": "2025-01-21T10:00:00Z",
            "updated_at": "2025-01-21T10:00:00Z"
        }"#).unwrap();

        let TargetConfig::S3Generic(s3) = &target.config else {
            panic!("expected s3_generic config, got {:?}", target.config);
        };

        assert_eq!(s3.bucket, "backups");
        assert_eq!(s3.region, None);
        assert!(!s3.path_style);
        assert!(s3.use_tls);
    }

    #[test]
    fn decodes_scalar_config_values() {
        let target: Target = serde_json::from_str(r#"{
            "id": 3,
            "name": "minio",
            "type": "s3_generic",
            "config": {
                "endpoint": "http://minio:9000",
                "bucket": "b",
                "access_key": "a",
                "secret_key": "s",
                "use_tls": false,
                "region": null
            },
            "created_at": "2025-01-21T10:00:00Z",
            "updated_at": "2025-01-21T10:00:00Z"
        }"#).unwrap();

        let TargetConfig::S3Generic(s3) = target.config else {
            panic!("expected s3_generic config");
        };

        assert!(!s3.use_tls);
        assert_eq!(s3.region, None);
    }

    #[test]
    fn rejects_config_missing_required_fields() {
        let given = serde_json::from_str::<Target>(r#"{
            "id": 4,
            "name": "nas",
            "type": "sftp",
            "config": {"host": "nas.lan"},
            "created_at": "2025-01-21T10:00:00Z",
            "updated_at": "2025-01-21T10:00:00Z"
        }"#);

        assert!(given.is_err());
    }

    #[test]
    fn null_config_reads_as_empty_fields() {
        let given = serde_json::from_str::<Target>(r#"{
            "id": 6,
            "name": "bare",
            "type": "local",
            "config": null,
            "created_at": "2025-01-21T10:00:00Z",
            "updated_at": "2025-01-21T10:00:00Z"
        }"#);

        let msg = given.unwrap_err().to_string();

        assert!(msg.contains("target 6 has an invalid local config"), "{}", msg);
        assert!(msg.contains("path (Missing)"), "{}", msg);
    }

    #[test]
    fn rejects_unknown_type() {
        let given = serde_json::from_str::<Target>(r#"{
            "id": 5,
            "name": "old",
            "type": "s3",
            "config": {"bucket": "b"},
            "created_at": "2025-01-21T10:00:00Z",
            "updated_at": "2025-01-21T10:00:00Z"
        }"#);

        assert!(given.is_err());
    }

    #[test]
    fn create_body_wire_shape() {
        let body = CreateTarget {
            name: String::from("usb"),
            config: TargetConfig::Local(LocalConfig {
                path: String::from("/mnt/usb"),
            }),
        };

        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({
            "name": "usb",
            "type": "local",
            "config": {"path": "/mnt/usb"},
        }));
    }

    #[test]
    fn type_names() {
        use std::str::FromStr;

        assert_eq!(TargetType::S3Generic.to_string(), "s3_generic");
        assert_eq!(TargetType::S3Aws.to_string(), "s3_aws");
        assert_eq!(TargetType::from_str("sftp").unwrap(), TargetType::Sftp);
        assert_eq!(serde_json::to_string(&TargetType::S3Aws).unwrap(), "\"s3_aws\"");
    }
}
