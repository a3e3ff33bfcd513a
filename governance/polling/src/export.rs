//! Raw poll document export

use {
    crate::state::poll::Poll,
    log::info,
    std::{
        fs,
        io,
        path::{Path, PathBuf},
    },
};

/// Raw poll document named after its content identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDocument {
    /// Content identifier, e.g. the document's multihash
    pub identifier: String,

    /// Document text, exported verbatim
    pub contents: String,
}

impl RawDocument {
    /// Raw document of the poll, None when the poll has no raw data
    pub fn from_poll(poll: &Poll) -> Option<Self> {
        poll.raw_data.as_ref().map(|raw_data| Self {
            identifier: poll.multi_hash.clone(),
            contents: raw_data.clone(),
        })
    }

    /// Name of the downloadable artifact
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.identifier)
    }

    /// Writes the document into the directory and returns the file path
    pub fn write_to(&self, directory: &Path) -> io::Result<PathBuf> {
        let path = directory.join(self.file_name());
        fs::write(&path, self.contents.as_bytes())?;
        info!("Raw document written to {}", path.display());
        Ok(path)
    }
}
