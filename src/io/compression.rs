#[cfg(feature = "compression")]
mod inner {
    use std::fs::File;
    use std::io::{copy, Seek, SeekFrom};
    use std::path::Path;

    use polars::io::mmap::MmapBytesReader;
    use tempfile::tempfile;

    /// Compression of the raw GTF input stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Compression {
        #[default]
        None,
        Gz,
        Zstd,
    }

    impl Compression {
        /// Guesses the compression from the file extension.
        pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
            match path
                .as_ref()
                .extension()
                .and_then(|e| e.to_str())
            {
                Some("gz") | Some("gzip") => Compression::Gz,
                Some("zst") | Some("zstd") => Compression::Zstd,
                _ => Compression::None,
            }
        }

        pub fn name(&self) -> &str {
            match self {
                Compression::None => "none",
                Compression::Gz => "gzip",
                Compression::Zstd => "zstd",
            }
        }

        /// Decodes the stream into a temporary file so the CSV reader
        /// can still mmap its input.
        pub fn get_decoder(
            &self,
            handle: File,
        ) -> std::io::Result<Box<dyn MmapBytesReader>> {
            match self {
                Compression::None => Ok(Box::new(handle)),
                Compression::Gz => {
                    let mut temp_file = tempfile()?;
                    let mut decoder = flate2::read::MultiGzDecoder::new(handle);
                    copy(&mut decoder, &mut temp_file)?;
                    temp_file.seek(SeekFrom::Start(0))?;
                    Ok(Box::new(temp_file))
                },
                Compression::Zstd => {
                    let mut temp_file = tempfile()?;
                    let mut decoder = zstd::Decoder::new(handle)?;
                    copy(&mut decoder, &mut temp_file)?;
                    temp_file.seek(SeekFrom::Start(0))?;
                    Ok(Box::new(temp_file))
                },
            }
        }
    }
}

#[cfg(feature = "compression")]
pub use inner::*;
