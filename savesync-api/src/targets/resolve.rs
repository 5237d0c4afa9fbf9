use crate::FieldErrors;

use super::{
    RawFields,
    TargetType,
    TargetConfig,
    LocalConfig,
    S3GenericConfig,
    S3AwsConfig,
    SftpConfig,
    Target,
    CreateTarget,
    UpdateTarget,
    validate_name,
};

struct FieldReader<'a> {
    fields: &'a RawFields,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a RawFields) -> Self {
        FieldReader {
            fields,
            errors: FieldErrors::new(),
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.fields.get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn required(&mut self, key: &str) -> String {
        if let Some(value) = self.optional(key) {
            value
        } else {
            self.errors.missing(key);

            String::new()
        }
    }

    fn flag(&mut self, key: &str, default: bool) -> bool {
        let Some(value) = self.optional(key) else {
            return default;
        };

        if value.eq_ignore_ascii_case("true") {
            true
        } else if value.eq_ignore_ascii_case("false") {
            false
        } else {
            self.errors.invalid(key);

            default
        }
    }

    fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result()?;

        Ok(value)
    }
}

/// builds the typed config for a target type from a raw string map.
///
/// only the fields the type declares are read, anything else in the map is
/// ignored. blank values are treated the same as missing ones.
pub fn resolve(type_: TargetType, fields: &RawFields) -> Result<TargetConfig, FieldErrors> {
    let mut reader = FieldReader::new(fields);

    let config = match type_ {
        TargetType::Local => TargetConfig::Local(LocalConfig {
            path: reader.required("path"),
        }),
        TargetType::S3Generic => TargetConfig::S3Generic(S3GenericConfig {
            endpoint: reader.required("endpoint"),
            bucket: reader.required("bucket"),
            region: reader.optional("region"),
            access_key: reader.required("access_key"),
            secret_key: reader.required("secret_key"),
            path_style: reader.flag("path_style", true),
            use_tls: reader.flag("use_tls", true),
        }),
        TargetType::S3Aws => TargetConfig::S3Aws(S3AwsConfig {
            bucket: reader.required("bucket"),
            region: reader.required("region"),
            access_key: reader.required("access_key"),
            secret_key: reader.required("secret_key"),
        }),
        TargetType::Sftp => TargetConfig::Sftp(SftpConfig {
            host: reader.required("host"),
            user: reader.required("user"),
            password: reader.optional("password"),
            path: reader.required("path"),
        }),
    };

    reader.finish(config)
}

/// edit state for creating or updating a target.
///
/// switching the type always discards every entered field so values from
/// one storage backend never end up in the config of another.
#[derive(Debug, Clone)]
pub struct TargetForm {
    name: String,
    type_: TargetType,
    fields: RawFields,
}

impl TargetForm {
    pub fn new(type_: TargetType) -> Self {
        TargetForm {
            name: String::new(),
            type_,
            fields: RawFields::new(),
        }
    }

    pub fn from_target(target: &Target) -> Self {
        TargetForm {
            name: target.name.clone(),
            type_: target.target_type(),
            fields: target.config.to_fields(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<N>(&mut self, name: N)
    where
        N: Into<String>
    {
        self.name = name.into();
    }

    pub fn target_type(&self) -> TargetType {
        self.type_
    }

    pub fn set_type(&mut self, type_: TargetType) {
        self.type_ = type_;
        self.fields.clear();
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.as_str())
    }

    pub fn set_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn fields(&self) -> &RawFields {
        &self.fields
    }

    pub fn resolve(&self) -> Result<TargetConfig, FieldErrors> {
        resolve(self.type_, &self.fields)
    }

    pub fn build(&self) -> Result<CreateTarget, FieldErrors> {
        let (name, config) = self.checked()?;

        Ok(CreateTarget { name, config })
    }

    pub fn build_update(&self) -> Result<UpdateTarget, FieldErrors> {
        let (name, config) = self.checked()?;

        Ok(UpdateTarget { name, config })
    }

    fn checked(&self) -> Result<(String, TargetConfig), FieldErrors> {
        let mut errors = match validate_name(&self.name) {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors,
        };

        match self.resolve() {
            Ok(config) if errors.is_empty() => Ok((self.name.clone(), config)),
            Ok(_) => Err(errors),
            Err(config_errors) => {
                errors.merge(config_errors);

                Err(errors)
            }
        }
    }
}
