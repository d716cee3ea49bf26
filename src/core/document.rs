/*
 * Ownership of a single opened document: the path it was opened from, the
 * header summaries extracted from it, and the parser resource backing them.
 * The session holds at most one of these at a time and never reuses one;
 * closing or replacing a document releases the resource and discards the
 * handle.
 */
use super::models::{FileHeaderSummary, OptionalHeaderSummary};
use super::parser::{self, ImageParserOperations, ParsedImageOperations};
use std::path::{Path, PathBuf};

pub struct DocumentHandle {
    path: PathBuf,
    file_name: String,
    file_header: FileHeaderSummary,
    optional_header: OptionalHeaderSummary,
    image: Option<Box<dyn ParsedImageOperations>>,
}

impl DocumentHandle {
    /*
     * Opens `path` through the parser service and captures both header
     * summaries. The parser resource stays alive inside the handle until
     * `release` is called (or the handle is dropped, which releases as a
     * backstop).
     */
    pub fn acquire(parser: &dyn ImageParserOperations, path: &Path) -> parser::Result<Self> {
        let image = parser.open(path)?;
        let file_header = image.file_header();
        let optional_header = image.optional_header();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(DocumentHandle {
            path: path.to_path_buf(),
            file_name,
            file_header,
            optional_header,
            image: Some(image),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The display name used as the navigation tree root label.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_header(&self) -> &FileHeaderSummary {
        &self.file_header
    }

    pub fn optional_header(&self) -> &OptionalHeaderSummary {
        &self.optional_header
    }

    /*
     * Releases the parser resource. Idempotent; the header summaries remain
     * readable afterwards since they are owned copies.
     */
    pub fn release(&mut self) -> parser::Result<()> {
        match self.image.take() {
            Some(mut image) => image.release(),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub fn is_released(&self) -> bool {
        self.image.is_none()
    }
}

impl Drop for DocumentHandle {
    fn drop(&mut self) {
        if self.image.is_some() {
            // Release failures are non-fatal everywhere, including here.
            if let Err(e) = self.release() {
                log::warn!(
                    "DocumentHandle: Failed to release parser resource for {:?} during drop: {e}",
                    self.path
                );
            }
        }
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("path", &self.path)
            .field("file_header", &self.file_header)
            .field("optional_header", &self.optional_header)
            .field("released", &self.image.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        Characteristics, DataDirectory, ImageMagic,
    };
    use std::sync::{Arc, Mutex};

    struct CountingImage {
        file_header: FileHeaderSummary,
        optional_header: OptionalHeaderSummary,
        release_count: Arc<Mutex<u32>>,
    }

    impl ParsedImageOperations for CountingImage {
        fn file_header(&self) -> FileHeaderSummary {
            self.file_header
        }
        fn optional_header(&self) -> OptionalHeaderSummary {
            self.optional_header
        }
        fn release(&mut self) -> parser::Result<()> {
            *self.release_count.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct CountingParser {
        release_count: Arc<Mutex<u32>>,
    }

    impl ImageParserOperations for CountingParser {
        fn open(&self, _path: &Path) -> parser::Result<Box<dyn ParsedImageOperations>> {
            Ok(Box::new(CountingImage {
                file_header: FileHeaderSummary {
                    machine: 0x8664,
                    section_count: 3,
                    timestamp: 0,
                    characteristics: Characteristics::EXECUTABLE_IMAGE,
                },
                optional_header: OptionalHeaderSummary {
                    magic: ImageMagic::Pe64,
                    entry_point: 0x1000,
                    image_base: 0x1_4000_0000,
                    export: DataDirectory::ZERO,
                    import: DataDirectory::ZERO,
                    resource: DataDirectory::ZERO,
                    debug: DataDirectory::ZERO,
                    load_config: DataDirectory::ZERO,
                },
                release_count: Arc::clone(&self.release_count),
            }))
        }
    }

    #[test]
    fn test_release_is_idempotent_and_keeps_summaries() {
        // Arrange
        let release_count = Arc::new(Mutex::new(0));
        let parser = CountingParser {
            release_count: Arc::clone(&release_count),
        };
        let mut document =
            DocumentHandle::acquire(&parser, Path::new("/bin/sample.exe")).unwrap();

        // Act
        document.release().unwrap();
        document.release().unwrap();

        // Assert: the underlying resource saw exactly one release, and the
        // summaries survive it.
        assert_eq!(*release_count.lock().unwrap(), 1);
        assert!(document.is_released());
        assert_eq!(document.file_header().section_count, 3);
        assert_eq!(document.file_name(), "sample.exe");
    }

    #[test]
    fn test_drop_releases_as_backstop() {
        let release_count = Arc::new(Mutex::new(0));
        let parser = CountingParser {
            release_count: Arc::clone(&release_count),
        };

        {
            let _document =
                DocumentHandle::acquire(&parser, Path::new("/bin/sample.exe")).unwrap();
        }

        assert_eq!(*release_count.lock().unwrap(), 1);
    }
}
