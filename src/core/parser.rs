/*
 * The boundary to the external PE parsing component. The session core never
 * walks the image format itself; it asks this service to open a file and
 * hand back the two header summaries, and it releases the parser resource
 * when the document is closed or replaced.
 *
 * A trait (`ImageParserOperations`) abstracts the parser so the session
 * logic can be tested against mocks. The concrete implementation
 * (`PeliteImageParser`) maps a file into memory and reads the headers with
 * the `pelite` crate, which stays the sole source of header truth.
 */
use super::models::{
    Characteristics, DataDirectory, FileHeaderSummary, ImageMagic, OptionalHeaderSummary,
};
use pelite::image::{
    IMAGE_DATA_DIRECTORY, IMAGE_DIRECTORY_ENTRY_DEBUG, IMAGE_DIRECTORY_ENTRY_EXPORT,
    IMAGE_DIRECTORY_ENTRY_IMPORT, IMAGE_DIRECTORY_ENTRY_LOAD_CONFIG,
    IMAGE_DIRECTORY_ENTRY_RESOURCE,
};
use pelite::FileMap;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ParserError {
    Io(io::Error),
    Pe(pelite::Error),
}

impl From<io::Error> for ParserError {
    fn from(err: io::Error) -> Self {
        ParserError::Io(err)
    }
}

impl From<pelite::Error> for ParserError {
    fn from(err: pelite::Error) -> Self {
        ParserError::Pe(err)
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserError::Io(e) => write!(f, "Could not read file: {e}"),
            ParserError::Pe(e) => write!(f, "Not a valid PE image: {e}"),
        }
    }
}

impl std::error::Error for ParserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParserError::Io(e) => Some(e),
            ParserError::Pe(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

/*
 * An opened image as the session core sees it: the two header summaries and
 * a `release` operation for the underlying parser resource. Release is
 * explicit so the session controls exactly when the resource goes away;
 * calling it more than once is a no-op.
 */
pub trait ParsedImageOperations {
    fn file_header(&self) -> FileHeaderSummary;
    fn optional_header(&self) -> OptionalHeaderSummary;
    fn release(&mut self) -> Result<()>;
}

pub trait ImageParserOperations: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn ParsedImageOperations>>;
}

pub struct PeliteImageParser {}

impl PeliteImageParser {
    pub fn new() -> Self {
        PeliteImageParser {}
    }
}

impl Default for PeliteImageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageParserOperations for PeliteImageParser {
    /*
     * Maps the file and extracts both header summaries up front. The summaries
     * are plain copies, so the mapping is kept only as the resource to be
     * released; nothing re-reads it afterwards.
     */
    fn open(&self, path: &Path) -> Result<Box<dyn ParsedImageOperations>> {
        log::trace!("PeliteImageParser: Opening image {path:?}");
        let map = FileMap::open(path)?;
        let (file_header, optional_header) = extract_summaries(map.as_ref())?;
        log::debug!(
            "PeliteImageParser: Opened {path:?} ({}, {} sections)",
            optional_header.magic,
            file_header.section_count
        );
        Ok(Box::new(PeliteParsedImage {
            file_header,
            optional_header,
            map: Some(map),
        }))
    }
}

struct PeliteParsedImage {
    file_header: FileHeaderSummary,
    optional_header: OptionalHeaderSummary,
    // The mapped file, held only so its lifetime is under session control.
    map: Option<FileMap>,
}

impl ParsedImageOperations for PeliteParsedImage {
    fn file_header(&self) -> FileHeaderSummary {
        self.file_header
    }

    fn optional_header(&self) -> OptionalHeaderSummary {
        self.optional_header
    }

    fn release(&mut self) -> Result<()> {
        if self.map.take().is_some() {
            log::trace!("PeliteImageParser: Released file mapping.");
        }
        Ok(())
    }
}

// PE32+ is tried first; a PeMagic mismatch means the optional header is the
// 32-bit variant instead.
fn extract_summaries(data: &[u8]) -> Result<(FileHeaderSummary, OptionalHeaderSummary)> {
    use pelite::pe64::Pe as _;

    match pelite::pe64::PeFile::from_bytes(data) {
        Ok(file) => {
            let optional = file.optional_header();
            Ok((
                file_header_summary(file.file_header()),
                optional_header_summary(
                    ImageMagic::Pe64,
                    optional.AddressOfEntryPoint,
                    optional.ImageBase,
                    file.data_directory(),
                ),
            ))
        }
        Err(pelite::Error::PeMagic) => extract_summaries_pe32(data),
        Err(e) => Err(e.into()),
    }
}

fn extract_summaries_pe32(data: &[u8]) -> Result<(FileHeaderSummary, OptionalHeaderSummary)> {
    use pelite::pe32::Pe as _;

    let file = pelite::pe32::PeFile::from_bytes(data)?;
    let optional = file.optional_header();
    Ok((
        file_header_summary(file.file_header()),
        optional_header_summary(
            ImageMagic::Pe32,
            optional.AddressOfEntryPoint,
            optional.ImageBase as u64,
            file.data_directory(),
        ),
    ))
}

fn file_header_summary(raw: &pelite::image::IMAGE_FILE_HEADER) -> FileHeaderSummary {
    FileHeaderSummary {
        machine: raw.Machine,
        section_count: raw.NumberOfSections,
        timestamp: raw.TimeDateStamp,
        characteristics: Characteristics::from_bits_retain(raw.Characteristics),
    }
}

fn optional_header_summary(
    magic: ImageMagic,
    entry_point: u32,
    image_base: u64,
    directories: &[IMAGE_DATA_DIRECTORY],
) -> OptionalHeaderSummary {
    OptionalHeaderSummary {
        magic,
        entry_point,
        image_base,
        export: directory_entry(directories, IMAGE_DIRECTORY_ENTRY_EXPORT),
        import: directory_entry(directories, IMAGE_DIRECTORY_ENTRY_IMPORT),
        resource: directory_entry(directories, IMAGE_DIRECTORY_ENTRY_RESOURCE),
        debug: directory_entry(directories, IMAGE_DIRECTORY_ENTRY_DEBUG),
        load_config: directory_entry(directories, IMAGE_DIRECTORY_ENTRY_LOAD_CONFIG),
    }
}

// Images with a truncated directory table simply lack the trailing entries.
fn directory_entry(directories: &[IMAGE_DATA_DIRECTORY], index: usize) -> DataDirectory {
    directories
        .get(index)
        .map(|entry| DataDirectory {
            virtual_address: entry.VirtualAddress,
            size: entry.Size,
        })
        .unwrap_or(DataDirectory::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_missing_file_is_io_error() {
        let parser = PeliteImageParser::new();
        match parser.open(Path::new("/no/such/file.dll")) {
            Err(ParserError::Io(_)) => {}
            Err(other) => panic!("Expected Io error for missing file, got {other:?}"),
            Ok(_) => panic!("Expected Io error for missing file, got a parsed image"),
        }
    }

    #[test]
    fn test_open_non_pe_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not an executable image")
            .unwrap();
        file.flush().unwrap();

        let parser = PeliteImageParser::new();
        match parser.open(file.path()) {
            Err(ParserError::Pe(_)) => {}
            Err(other) => panic!("Expected Pe error for malformed file, got {other:?}"),
            Ok(_) => panic!("Expected Pe error for malformed file, got a parsed image"),
        }
    }
}
