use bitflags::bitflags;

bitflags! {
    // The COFF file header characteristics word. The session core only ever
    // branches on `DLL`, but the full word is kept so the general view can
    // display it verbatim.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Characteristics: u16 {
        const RELOCS_STRIPPED = 0x0001;
        const EXECUTABLE_IMAGE = 0x0002;
        const LINE_NUMS_STRIPPED = 0x0004;
        const LOCAL_SYMS_STRIPPED = 0x0008;
        const LARGE_ADDRESS_AWARE = 0x0020;
        const MACHINE_32BIT = 0x0100;
        const DEBUG_STRIPPED = 0x0200;
        const SYSTEM = 0x1000;
        const DLL = 0x2000;
    }
}

// Optional header magic: classic PE32 or PE32+ (64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMagic {
    Pe32,
    Pe64,
}

impl std::fmt::Display for ImageMagic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageMagic::Pe32 => write!(f, "PE32"),
            ImageMagic::Pe64 => write!(f, "PE32+"),
        }
    }
}

/*
 * The data directory kinds this tool derives navigation from. The optional
 * header carries more directories than these; only the ones that map to a
 * view are summarized. The declaration order here is the order in which the
 * navigation tree appends directory-backed nodes, so it is significant.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Export,
    Import,
    Resource,
    Debug,
    LoadConfig,
}

impl DirectoryKind {
    pub const ALL: [DirectoryKind; 5] = [
        DirectoryKind::Export,
        DirectoryKind::Import,
        DirectoryKind::Resource,
        DirectoryKind::Debug,
        DirectoryKind::LoadConfig,
    ];
}

// One address+size pair from the optional header's directory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataDirectory {
    pub virtual_address: u32,
    pub size: u32,
}

impl DataDirectory {
    pub const ZERO: DataDirectory = DataDirectory {
        virtual_address: 0,
        size: 0,
    };

    // Presence is an address test only; a zero-sized directory at a nonzero
    // address still counts as present.
    pub fn is_present(&self) -> bool {
        self.virtual_address != 0
    }
}

// Summary of the COFF file header, extracted once when a document is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeaderSummary {
    pub machine: u16,
    pub section_count: u16,
    pub timestamp: u32,
    pub characteristics: Characteristics,
}

impl FileHeaderSummary {
    pub fn is_dll(&self) -> bool {
        self.characteristics.contains(Characteristics::DLL)
    }

    pub fn machine_name(&self) -> &'static str {
        match self.machine {
            0x014c => "x86",
            0x8664 => "x64",
            0x01c4 => "ARM Thumb-2",
            0xaa64 => "ARM64",
            _ => "unknown",
        }
    }
}

/*
 * Summary of the optional (extended) header: the image-wide fields the
 * general view displays, plus one directory entry per `DirectoryKind`.
 * Everything here is a plain copy; the parser resource can be released
 * without invalidating it.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalHeaderSummary {
    pub magic: ImageMagic,
    pub entry_point: u32,
    pub image_base: u64,
    pub export: DataDirectory,
    pub import: DataDirectory,
    pub resource: DataDirectory,
    pub debug: DataDirectory,
    pub load_config: DataDirectory,
}

impl OptionalHeaderSummary {
    pub fn directory(&self, kind: DirectoryKind) -> DataDirectory {
        match kind {
            DirectoryKind::Export => self.export,
            DirectoryKind::Import => self.import,
            DirectoryKind::Resource => self.resource,
            DirectoryKind::Debug => self.debug,
            DirectoryKind::LoadConfig => self.load_config,
        }
    }
}

/*
 * Identifies the navigable views of an opened document. `General` and
 * `Sections` exist for every document; the directory-backed views exist only
 * when the corresponding directory is present, and `Dependencies` only for
 * DLL images.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    General,
    Sections,
    Exports,
    Imports,
    Resources,
    Debug,
    LoadConfig,
    Dependencies,
}

impl ViewId {
    pub const ALL: [ViewId; 8] = [
        ViewId::General,
        ViewId::Sections,
        ViewId::Exports,
        ViewId::Imports,
        ViewId::Resources,
        ViewId::Debug,
        ViewId::LoadConfig,
        ViewId::Dependencies,
    ];

    // The view backed by a given data directory.
    pub fn for_directory(kind: DirectoryKind) -> ViewId {
        match kind {
            DirectoryKind::Export => ViewId::Exports,
            DirectoryKind::Import => ViewId::Imports,
            DirectoryKind::Resource => ViewId::Resources,
            DirectoryKind::Debug => ViewId::Debug,
            DirectoryKind::LoadConfig => ViewId::LoadConfig,
        }
    }

    /*
     * Parses the name a user types at the CLI (`view exports`) into a view
     * identifier. Matching is case-insensitive and accepts the short names
     * only, not the decorated tab titles.
     */
    pub fn parse_cli_name(name: &str) -> Option<ViewId> {
        match name.to_ascii_lowercase().as_str() {
            "general" => Some(ViewId::General),
            "sections" => Some(ViewId::Sections),
            "exports" => Some(ViewId::Exports),
            "imports" => Some(ViewId::Imports),
            "resources" => Some(ViewId::Resources),
            "debug" => Some(ViewId::Debug),
            "loadconfig" | "load-config" => Some(ViewId::LoadConfig),
            "dependencies" => Some(ViewId::Dependencies),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dll_flag_detection() {
        let header = FileHeaderSummary {
            machine: 0x8664,
            section_count: 4,
            timestamp: 0,
            characteristics: Characteristics::EXECUTABLE_IMAGE | Characteristics::DLL,
        };
        assert!(header.is_dll());

        let exe = FileHeaderSummary {
            characteristics: Characteristics::EXECUTABLE_IMAGE,
            ..header
        };
        assert!(!exe.is_dll());
    }

    #[test]
    fn test_directory_presence_is_address_test() {
        let with_addr = DataDirectory {
            virtual_address: 0x1000,
            size: 0,
        };
        assert!(with_addr.is_present());
        assert!(!DataDirectory::ZERO.is_present());
    }

    #[test]
    fn test_view_id_cli_names_round_trip() {
        assert_eq!(ViewId::parse_cli_name("Exports"), Some(ViewId::Exports));
        assert_eq!(
            ViewId::parse_cli_name("load-config"),
            Some(ViewId::LoadConfig)
        );
        assert_eq!(ViewId::parse_cli_name("sections"), Some(ViewId::Sections));
        assert_eq!(ViewId::parse_cli_name("clr"), None);
    }

    #[test]
    fn test_directory_kind_order_matches_tab_order() {
        // The append order of directory-backed navigation nodes is derived
        // from this array; keep it stable.
        assert_eq!(
            DirectoryKind::ALL,
            [
                DirectoryKind::Export,
                DirectoryKind::Import,
                DirectoryKind::Resource,
                DirectoryKind::Debug,
                DirectoryKind::LoadConfig,
            ]
        );
    }
}
