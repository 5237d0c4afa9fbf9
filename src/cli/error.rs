use savesync_lib::context_trait;

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// error surfaced to the terminal: what was being attempted plus the
/// underlying cause, if any
#[derive(Debug, Default)]
pub struct Error {
    context: Option<String>,
    src: Option<BoxDynError>,
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    pub fn new() -> Error {
        Error::default()
    }

    pub fn context<C>(mut self, cxt: C) -> Error
    where
        C: Into<String>
    {
        self.context = Some(cxt.into());
        self
    }

    pub fn source<S>(mut self, src: S) -> Error
    where
        S: Into<BoxDynError>
    {
        self.src = Some(src.into());
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut wrote = false;

        if let Some(cxt) = &self.context {
            write!(f, "{}", cxt)?;
            wrote = true;
        }

        let mut next = self.src.as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static));

        while let Some(err) = next {
            if wrote {
                write!(f, ": ")?;
            }

            write!(f, "{}", err)?;
            wrote = true;

            next = err.source();
        }

        if !wrote {
            write!(f, "unknown error")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.src.as_ref().map(|v| & **v as _)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new().context(msg)
    }
}

context_trait!(Error);

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<BoxDynError>
{
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.map_err(|err| Error::new().context(cxt).source(err))
    }
}

impl<T> Context<T, ()> for std::option::Option<T> {
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.ok_or_else(|| Error::new().context(cxt))
    }
}

macro_rules! simple_catch {
    ($e:path) => {
        impl From<$e> for Error {
            fn from(err: $e) -> Self {
                Error::new().source(err)
            }
        }
    };
}

simple_catch!(std::io::Error);
simple_catch!(url::ParseError);

impl From<savesync::Error> for Error {
    fn from(err: savesync::Error) -> Self {
        match err {
            savesync::Error::Authentication => Error::new()
                .context("not logged in. use \"login\" to start a session"),
            savesync::Error::Validation(fields) => Error::new()
                .context("invalid input")
                .source(fields),
            err => Error::new().source(err)
        }
    }
}

impl From<savesync::api::FieldErrors> for Error {
    fn from(err: savesync::api::FieldErrors) -> Self {
        Error::new()
            .context("invalid input")
            .source(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_joins_context_and_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Result = Err(io).context("failed to open config file");

        assert_eq!(
            err.unwrap_err().to_string(),
            "failed to open config file: no such file"
        );
    }

    #[test]
    fn missing_option_uses_context() {
        let err = None::<u8>.context("source not found").unwrap_err();

        assert_eq!(err.to_string(), "source not found");
    }

    #[test]
    fn empty_error() {
        assert_eq!(Error::new().to_string(), "unknown error");
    }
}
