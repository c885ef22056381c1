use std::path::Path;

use bytes::Bytes;

use crate::attribute::Attribute;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::io;
use crate::options::Options;

/// Encodes attribute trees to bytes and decodes bytes back into them.
///
/// Each backend provides one codec. A codec asked for a format it does not
/// support returns [`Error::UnsupportedFormat`].
pub trait Codec: Send + Sync {
    /// Encode `attr` as `format`.
    fn encode(&self, attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes>;

    /// Decode `bytes` in `format` into `attr`.
    fn decode(&self, bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()>;

    /// Check if this codec supports a format.
    fn supports(&self, format: &Format) -> bool;

    fn encode_file(
        &self,
        attr: &dyn Attribute,
        format: &Format,
        options: Options,
        path: &Path,
    ) -> Result<()> {
        let bytes = self.encode(attr, format, options)?;
        io::write_file(path, &bytes)
    }

    fn decode_file(&self, path: &Path, format: &Format, attr: &mut dyn Attribute) -> Result<()> {
        let bytes = io::read_file(path)?;
        self.decode(&bytes, format, attr)
    }
}

/// A codec that doesn't support any formats.
pub struct NoCodec;

impl Codec for NoCodec {
    fn encode(&self, _attr: &dyn Attribute, format: &Format, _options: Options) -> Result<Bytes> {
        Err(Error::UnsupportedFormat(format.clone()))
    }

    fn decode(&self, _bytes: &[u8], format: &Format, _attr: &mut dyn Attribute) -> Result<()> {
        Err(Error::UnsupportedFormat(format.clone()))
    }

    fn supports(&self, _format: &Format) -> bool {
        false
    }
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn encode(&self, attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes> {
        (**self).encode(attr, format, options)
    }

    fn decode(&self, bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()> {
        (**self).decode(bytes, format, attr)
    }

    fn supports(&self, format: &Format) -> bool {
        (**self).supports(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Int32;

    #[test]
    fn no_codec_rejects_everything() {
        let mut v = Int32::new(3);
        assert!(!NoCodec.supports(&Format::JSON));
        assert!(matches!(
            NoCodec.encode(&v, &Format::JSON, Options::empty()),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            NoCodec.decode(b"3", &Format::JSON, &mut v),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn file_helpers_surface_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = Int32::new(3);
        let boxed: Box<dyn Codec> = Box::new(NoCodec);
        let err = boxed
            .decode_file(&dir.path().join("absent"), &Format::JSON, &mut v)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
