//! Ordered release of layered streams.
//!
//! An archive is a stack of streams: file, gzip, tar. Each outer layer must be finished before
//! the layer beneath it, otherwise the gzip or tar trailer is lost. [`Closeable::close`] finishes
//! one layer and hands back the one beneath, so the success path reads as a chain of `?`, and
//! [`close_stream`] does the same on failure paths where the primary error must win.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

/// A stream layer that is finished explicitly, yielding the layer it wraps.
pub trait Closeable: Sized {
    /// The layer beneath this one
    type Inner;

    /// Layer name used in errors and logs
    const LAYER: &'static str;

    /// Flush and finish this layer.
    fn close(self) -> io::Result<Self::Inner>;
}

impl<W: Write> Closeable for tar::Builder<W> {
    type Inner = W;
    const LAYER: &'static str = "tar";

    fn close(self) -> io::Result<W> {
        self.into_inner()
    }
}

impl<W: Write> Closeable for GzEncoder<W> {
    type Inner = W;
    const LAYER: &'static str = "gzip";

    fn close(self) -> io::Result<W> {
        self.finish()
    }
}

impl<W: Write> Closeable for BufWriter<W> {
    type Inner = W;
    const LAYER: &'static str = "buffered file";

    fn close(self) -> io::Result<W> {
        self.into_inner().map_err(|e| e.into_error())
    }
}

impl Closeable for File {
    type Inner = ();
    const LAYER: &'static str = "file";

    fn close(self) -> io::Result<()> {
        self.sync_all()
    }
}

impl<R: Read> Closeable for tar::Archive<R> {
    type Inner = R;
    const LAYER: &'static str = "tar";

    fn close(self) -> io::Result<R> {
        Ok(self.into_inner())
    }
}

impl<R: Read> Closeable for GzDecoder<R> {
    type Inner = R;
    const LAYER: &'static str = "gzip";

    fn close(self) -> io::Result<R> {
        Ok(self.into_inner())
    }
}

/// Closes `stream`, passing a failure to `on_error` instead of returning it.
///
/// Returns the inner layer when the close succeeded. When it failed the inner layer has already
/// been dropped, which releases it on its own.
pub fn close_stream<C: Closeable>(
    stream: C,
    on_error: Option<&dyn Fn(&'static str, io::Error)>,
) -> Option<C::Inner> {
    match stream.close() {
        Ok(inner) => Some(inner),
        Err(e) => {
            if let Some(callback) = on_error {
                callback(C::LAYER, e);
            }
            None
        }
    }
}
