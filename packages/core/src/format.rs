//! Names of the wire formats a codec can be asked for.

use std::borrow::Cow;
use std::fmt;

/// A wire format, named by its media type.
///
/// Codecs compare against the constants below; other names are carried
/// through so a router can report them in [`Error::UnsupportedFormat`].
///
/// [`Error::UnsupportedFormat`]: crate::Error::UnsupportedFormat
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format(Cow<'static, str>);

impl Format {
    pub const JSON: Format = Format::from_static("application/json");
    pub const YAML: Format = Format::from_static("application/yaml");
    pub const PROTOBUF: Format = Format::from_static("application/protobuf");

    pub const fn from_static(media_type: &'static str) -> Self {
        Format(Cow::Borrowed(media_type))
    }

    pub fn new(media_type: impl Into<String>) -> Self {
        Format(Cow::Owned(media_type.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
