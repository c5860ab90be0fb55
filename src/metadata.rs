//! Section-granular model of a service metadata file.
//!
//! The vendor CLI keeps per-profile service settings in a second file whose
//! sections contain nested, indentation-significant blocks an INI
//! round-trip would destroy. This model splits the file into raw section
//! blocks keyed by header name: deleting or replacing one section leaves
//! every other byte of the file exactly as it was.

use crate::error::ProvisionError;
use std::fs;
use std::path::Path;

/// A metadata file as an ordered list of `(section name, raw block)` pairs
/// plus any content preceding the first section header.
#[derive(Debug, Clone, Default)]
pub struct ServiceMetadataFile {
    prelude: String,
    sections: Vec<(String, String)>,
}

impl ServiceMetadataFile {
    /// Load from disk; a missing file is an empty model (first-time
    /// configuration).
    pub fn load(path: &Path) -> Result<Self, ProvisionError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ProvisionError::io(
                format!("failed reading {}", path.display()),
                e,
            )),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut prelude = String::new();
        let mut sections: Vec<(String, String)> = Vec::new();

        for line in text.split_inclusive('\n') {
            if let Some(name) = header_name(line) {
                sections.push((name, line.to_string()));
            } else if let Some((_, block)) = sections.last_mut() {
                block.push_str(line);
            } else {
                prelude.push_str(line);
            }
        }
        ServiceMetadataFile { prelude, sections }
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Remove the named section, nested content included. Returns whether
    /// anything was removed.
    pub fn delete_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|(n, _)| n != name);
        self.sections.len() != before
    }

    /// Replace (or append) the named section with a freshly rendered block.
    pub fn upsert_section(&mut self, name: &str, body: &str) {
        self.delete_section(name);
        let mut block = format!("[{name}]\n");
        block.push_str(body);
        if !block.ends_with('\n') {
            block.push('\n');
        }
        self.sections.push((name.to_string(), block));
    }

    pub fn render(&self) -> String {
        let mut out = self.prelude.clone();
        for (_, block) in &self.sections {
            out.push_str(block);
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<(), ProvisionError> {
        fs::write(path, self.render()).map_err(|e| {
            ProvisionError::io(format!("failed writing {}", path.display()), e)
        })
    }
}

/// A section header is an unindented `[name]` line; nested block lines are
/// indented and can never look like one.
fn header_name(line: &str) -> Option<String> {
    let trimmed = line.trim_end();
    if line.starts_with('[') && trimmed.ends_with(']') {
        Some(trimmed[1..trimmed.len() - 1].to_string())
    } else {
        None
    }
}
